//! Result presentation controller for the Waylight launcher popup.
//!
//! The popup is a text input above a list of results. This crate turns
//! keystrokes into debounced searches, keeps the result set and selection,
//! renders rows, and keeps the sliding selector, preview slot and container
//! height in step with what is shown. Drawing is delegated to a [`Surface`].
//!
//! # Architecture
//!
//! - [`dispatcher`]: Input text and search debounce
//! - [`store`]: Result set and selection state machine
//! - [`render`]: Pure row rendering with escaped markup
//! - [`sync`]: Preview slot and selector placement
//! - [`animator`]: Two-phase container height animation
//! - [`surface`]: The drawing seam and a recording implementation
//! - [`controller`]: The state machine that ties it together
//! - [`runtime`]: Async event loop around the controller
//! - [`config`]: Popup settings
//!
//! # Example
//!
//! ```no_run
//! use waylight_popup::{PopupConfig, PopupController, RecordingSurface, UiEvent, runtime};
//! use tokio::sync::mpsc;
//!
//! # async fn example() {
//! let config = PopupConfig::default();
//! let connection = waylight_bridge::connect(None, config.mock_delay()).await;
//! let mut controller = PopupController::new(RecordingSurface::new(), connection.handle, &config);
//!
//! let (events_tx, events_rx) = mpsc::unbounded_channel();
//! events_tx.send(UiEvent::Input("fire".to_string())).ok();
//! runtime::run(&mut controller, events_rx, connection.inbound).await;
//! # }
//! ```

pub mod animator;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod escape;
pub mod event;
pub mod glyph;
pub mod render;
pub mod runtime;
pub mod store;
pub mod surface;
pub mod sync;
pub mod timer;

pub use animator::{HeightAnimator, HeightChange};
pub use config::PopupConfig;
pub use controller::PopupController;
pub use dispatcher::{InputAction, InputEdit, QueryDispatcher};
pub use error::{Error, Result};
pub use escape::escape_html;
pub use event::{Key, KeyOutcome, UiEvent};
pub use glyph::{Glyph, initial};
pub use render::{IconSlot, RenderedList, ResultRow, Row, RowLayout, render};
pub use store::{ResultStore, SelectionState};
pub use surface::{HeightConstraint, RecordingSurface, RowGeometry, Surface, SurfaceCall};
pub use sync::{Preview, SelectorPlacement, preview_for};
pub use timer::PendingTimer;
