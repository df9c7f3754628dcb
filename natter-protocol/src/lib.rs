//! natter-protocol: Wire definitions for the natter chat protocol
//!
//! The protocol is plain text over TCP with no length prefixes:
//!
//! - Handshake: the raw UTF-8 username, sent once right after connect
//! - Text frame: `"<username>: <text>"`, no terminator
//! - Attachment frame: `IMAGE@(<username>)@(<filename>)@(<base64>)\n`
//!
//! Inbound data is not framed at all. The client surfaces each socket
//! read as one chunk, see [`ChunkCodec`].

pub mod codec;
pub mod frame;

// Re-export main types at crate root
pub use codec::{ChunkCodec, CodecError, OutboundCodec, MAX_CHUNK_SIZE};
pub use frame::{basename, Attachment, FrameError, OutboundFrame, TextMessage, ATTACHMENT_TAG};
