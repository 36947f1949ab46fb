//! Length-prefixed transport codec for bridge messages.
//!
//! Every message is a JSON object framed with a 4-byte big-endian length
//! prefix so it can be delimited reliably on a stream socket.
//!
//! Frame format:
//! ```text
//! +----------------+------------------+
//! |  4 bytes       |  N bytes         |
//! |  (length BE)   |  (JSON payload)  |
//! +----------------+------------------+
//! ```
//!
//! The codec is generic over the decoded and encoded message types so the
//! popup side ([`PopupCodec`]) and the backend side ([`BackendCodec`]) share
//! one framing implementation.

use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io;
use std::marker::PhantomData;
use tokio_util::codec::{Decoder, Encoder};
use waylight_types::{Inbound, Outbound};

/// Maximum message size (16 MB)
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

/// Length prefix size in bytes
const LENGTH_PREFIX_SIZE: usize = 4;

/// Codec for length-prefixed JSON messages, decoding `D` and encoding `E`
#[derive(Debug)]
pub struct FrameCodec<D, E> {
    current_length: Option<usize>,
    _marker: PhantomData<fn() -> (D, E)>,
}

/// Codec used by the popup: reads [`Inbound`], writes [`Outbound`]
pub type PopupCodec = FrameCodec<Inbound, Outbound>;

/// Codec used by a backend: reads [`Outbound`], writes [`Inbound`]
pub type BackendCodec = FrameCodec<Outbound, Inbound>;

impl<D, E> FrameCodec<D, E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_length: None,
            _marker: PhantomData,
        }
    }
}

impl<D, E> Default for FrameCodec<D, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DeserializeOwned, E> Decoder for FrameCodec<D, E> {
    type Item = D;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<D>, CodecError> {
        let length = match self.current_length {
            Some(length) => length,
            None if src.len() < LENGTH_PREFIX_SIZE => return Ok(None),
            None => {
                let length = src.get_u32() as usize;
                if length > MAX_MESSAGE_SIZE {
                    return Err(CodecError::MessageTooLarge(length));
                }
                self.current_length = Some(length);
                length
            }
        };

        if src.len() < length {
            src.reserve(length - src.len());
            return Ok(None);
        }

        let body = src.split_to(length);
        self.current_length = None;
        let text = std::str::from_utf8(&body)?;
        Ok(Some(serde_json::from_str(text)?))
    }
}

impl<D, E: Serialize> Encoder<E> for FrameCodec<D, E> {
    type Error = CodecError;

    fn encode(&mut self, item: E, dst: &mut BytesMut) -> Result<(), CodecError> {
        let body = serde_json::to_vec(&item)?;
        let length = u32::try_from(body.len())
            .ok()
            .filter(|_| body.len() <= MAX_MESSAGE_SIZE)
            .ok_or(CodecError::MessageTooLarge(body.len()))?;

        dst.reserve(LENGTH_PREFIX_SIZE + body.len());
        dst.put_u32(length);
        dst.extend_from_slice(&body);
        Ok(())
    }
}

/// Framing failures on the bridge socket
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Message too large: {0} bytes (max: {MAX_MESSAGE_SIZE})")]
    MessageTooLarge(usize),
}
