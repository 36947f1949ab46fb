//! Socket client connecting the popup to an external search backend.
//!
//! The connection is split into two tasks: a writer draining the bridge's
//! outbound queue into the socket and a reader forwarding decoded inbound
//! messages, in arrival order, to the popup's inbound channel.

use std::path::{Path, PathBuf};

use futures_util::{SinkExt, StreamExt};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, error};

use crate::error::Result;
use crate::transport::PopupCodec;
use crate::{BackendMode, BridgeHandle, Connection};

fn runtime_dir() -> PathBuf {
    std::env::var("XDG_RUNTIME_DIR").map_or_else(|_| std::env::temp_dir(), PathBuf::from)
}

/// Get the default socket path of the search backend.
///
/// On Linux, prefers `$XDG_RUNTIME_DIR` for proper runtime file handling.
/// Falls back to the system temp directory for cross-platform compatibility.
#[must_use]
pub fn socket_path() -> PathBuf {
    runtime_dir().join("waylight.sock")
}

/// Connect to a backend listening on `path`.
///
/// # Errors
///
/// Returns `Error::Io` if the socket connection fails.
pub async fn connect_to(path: &Path) -> Result<Connection> {
    let stream = UnixStream::connect(path).await?;
    let framed = Framed::new(stream, PopupCodec::new());
    let (mut sink, mut stream) = framed.split();

    let (handle, mut outbound_rx) = BridgeHandle::channel();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            let method = message.method();
            if let Err(e) = sink.send(message).await {
                error!("Failed to send '{}' to backend: {}", method, e);
                break;
            }
        }
        debug!("Outbound queue closed, stopping backend writer");
    });

    tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(message) => {
                    if inbound_tx.send(message).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Backend stream error: {}", e);
                    break;
                }
            }
        }
        debug!("Backend stream closed");
    });

    Ok(Connection {
        handle,
        inbound: inbound_rx,
        mode: BackendMode::Socket(path.to_path_buf()),
    })
}
