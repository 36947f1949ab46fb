//! Backend bridge for the Waylight popup.
//!
//! The popup never talks to the search backend directly. It holds a
//! [`BridgeHandle`] for fire-and-forget outbound messages and reads inbound
//! messages from a separate channel, so requests and responses are two
//! independent asynchronous streams.
//!
//! # Architecture
//!
//! - [`transport`]: Length-prefixed JSON codec for message framing
//! - [`client`]: Unix socket connection to an external backend
//! - [`mock`]: Deterministic offline fallback
//! - [`error`]: Error type and `Result` alias
//!
//! # Example
//!
//! ```no_run
//! use waylight_bridge::{connect, mock::DEFAULT_MOCK_DELAY};
//! use waylight_types::Outbound;
//!
//! # async fn example() {
//! let mut connection = connect(None, DEFAULT_MOCK_DELAY).await;
//! connection.handle.send(Outbound::Search { query: "fire".to_string() });
//! let reply = connection.inbound.recv().await;
//! # }
//! ```

pub mod client;
pub mod error;
pub mod mock;
pub mod transport;

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};
use waylight_types::{Inbound, Outbound};

pub use client::{connect_to, socket_path};
pub use error::{Error, Result};
pub use mock::MockBackend;
pub use transport::{BackendCodec, CodecError, FrameCodec, PopupCodec};

/// Sending half of the bridge.
///
/// Sends never block and never fail loudly: a closed bridge drops the message
/// with a warning.
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl BridgeHandle {
    /// Create a handle together with the queue it feeds.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a message for the backend.
    pub fn send(&self, message: Outbound) {
        let method = message.method();
        if self.try_send(message).is_err() {
            warn!("Bridge closed, dropping '{}' message", method);
        }
    }

    /// Queue a message, reporting a closed bridge to the caller.
    ///
    /// # Errors
    ///
    /// Returns `Error::Disconnected` if the receiving side has been dropped.
    pub fn try_send(&self, message: Outbound) -> Result<()> {
        self.tx.send(message).map_err(|_| Error::Disconnected)
    }
}

/// Which backend a [`Connection`] ended up with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendMode {
    Socket(PathBuf),
    Offline,
}

/// Both halves of an established bridge
#[derive(Debug)]
pub struct Connection {
    pub handle: BridgeHandle,
    pub inbound: mpsc::UnboundedReceiver<Inbound>,
    pub mode: BackendMode,
}

/// Start the offline mock backend on the current runtime.
#[must_use]
pub fn offline(delay: Duration) -> Connection {
    let (handle, outbound_rx) = BridgeHandle::channel();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    tokio::spawn(MockBackend::new(delay, inbound_tx).serve(outbound_rx));

    Connection {
        handle,
        inbound: inbound_rx,
        mode: BackendMode::Offline,
    }
}

/// Connect to the backend socket, falling back to the mock backend.
///
/// Uses `socket` if given, otherwise [`socket_path`]. A failed connection is
/// not an error: it is logged and the offline backend takes over.
pub async fn connect(socket: Option<PathBuf>, mock_delay: Duration) -> Connection {
    let path = socket.unwrap_or_else(socket_path);
    match connect_to(&path).await {
        Ok(connection) => {
            info!("Connected to backend at {}", path.display());
            connection
        }
        Err(e) => {
            warn!(
                "Backend not available at {} ({}), using mock data",
                path.display(),
                e
            );
            offline(mock_delay)
        }
    }
}
