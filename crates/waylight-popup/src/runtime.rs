//! Event loop driving a [`PopupController`].

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};
use waylight_types::Inbound;

use crate::controller::PopupController;
use crate::event::UiEvent;
use crate::surface::Surface;

/// Why [`run`] returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user cancelled the popup
    Closed,
    /// The host stopped delivering events
    EventsEnded,
}

/// Drive `controller` until the popup is closed or the host goes away.
///
/// UI events and backend messages are applied in arrival order; between them
/// the loop sleeps until the controller's next deadline. The surface is
/// presented after every iteration.
pub async fn run<S: Surface>(
    controller: &mut PopupController<S>,
    mut events: mpsc::UnboundedReceiver<UiEvent>,
    mut inbound: mpsc::UnboundedReceiver<Inbound>,
) -> Exit {
    controller.start();
    controller.surface_mut().present();
    let mut backend_open = true;

    loop {
        let deadline = controller.next_deadline(Instant::now());
        let wake = async move {
            match deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    debug!("UI event stream ended");
                    return Exit::EventsEnded;
                };
                controller.handle(event, Instant::now());
            }
            message = inbound.recv(), if backend_open => {
                match message {
                    Some(message) => controller.on_inbound(message, Instant::now()),
                    None => {
                        warn!("Backend disconnected, no further results will arrive");
                        backend_open = false;
                    }
                }
            }
            () = wake => {}
        }

        controller.tick(Instant::now());
        controller.surface_mut().present();

        if controller.close_requested() {
            return Exit::Closed;
        }
    }
}
