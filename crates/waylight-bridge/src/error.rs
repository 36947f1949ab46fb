//! Error types for the waylight-bridge crate.

use crate::transport::CodecError;

/// Unified error type for bridge operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Bridge disconnected")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, Error>;
