//! Codecs for the chat stream

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::frame::OutboundFrame;

/// Largest chunk handed out per decoded item (one socket read)
pub const MAX_CHUNK_SIZE: usize = 1024;

/// Protocol codec error
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encoder for everything the client writes
#[derive(Debug, Default)]
pub struct OutboundCodec;

impl OutboundCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<OutboundFrame> for OutboundCodec {
    type Error = CodecError;

    fn encode(&mut self, item: OutboundFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        item.write_to(dst);
        Ok(())
    }
}

/// Pass-through decoder for inbound data
///
/// The server does not frame what it sends, so there is nothing to
/// reassemble: whatever a read produced is handed out as-is, capped at
/// [`MAX_CHUNK_SIZE`]. A chunk may hold part of a message or several
/// messages. We assume the server writes one logical message per read.
#[derive(Debug, Default)]
pub struct ChunkCodec;

impl ChunkCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for ChunkCodec {
    type Item = Bytes;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }
        let len = src.len().min(MAX_CHUNK_SIZE);
        Ok(Some(src.split_to(len).freeze()))
    }
}
