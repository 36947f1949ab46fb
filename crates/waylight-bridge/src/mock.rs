//! Deterministic offline backend.
//!
//! Used when no search backend is reachable so the popup stays operable: every
//! `search` is answered with the same demonstration result set after a fixed
//! delay, regardless of the query.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};
use waylight_types::{Inbound, Outbound, ResultItem};

/// Delay before the mock answers a search
pub const DEFAULT_MOCK_DELAY: Duration = Duration::from_millis(50);

/// The fixed demonstration result set.
#[must_use]
pub fn demo_results() -> Vec<ResultItem> {
    vec![
        ResultItem::app("Firefox")
            .with_icon("🌐")
            .with_description("Web Browser"),
        ResultItem::app("Terminal")
            .with_icon("⌨️")
            .with_description("Command Line"),
        ResultItem::app("Files")
            .with_icon("📁")
            .with_description("File Manager"),
    ]
}

/// Offline stand-in for the search backend
#[derive(Debug, Clone)]
pub struct MockBackend {
    delay: Duration,
    inbound: mpsc::UnboundedSender<Inbound>,
}

impl MockBackend {
    #[must_use]
    pub fn new(delay: Duration, inbound: mpsc::UnboundedSender<Inbound>) -> Self {
        Self { delay, inbound }
    }

    /// React to one outbound message.
    ///
    /// Searches schedule a delayed reply on the current runtime; everything
    /// else is only logged.
    pub fn handle(&self, message: &Outbound) {
        match message {
            Outbound::Search { query } => {
                debug!("Mock backend answering search '{}'", query);
                let inbound = self.inbound.clone();
                let delay = self.delay;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = inbound.send(Inbound::Results {
                        results: demo_results(),
                    });
                });
            }
            Outbound::Select { result } => {
                info!("Mock backend: selected {:?}", result);
            }
            Outbound::Close => {
                info!("Mock backend: close requested");
            }
        }
    }

    /// Serve outbound messages until the queue closes.
    pub async fn serve(self, mut outbound: mpsc::UnboundedReceiver<Outbound>) {
        while let Some(message) = outbound.recv().await {
            self.handle(&message);
        }
        debug!("Outbound queue closed, stopping mock backend");
    }
}
