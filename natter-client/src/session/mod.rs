//! Chat session management
//!
//! Provides the TCP connection to the chat server, the background
//! receive task and the outbound framing, with every outcome reported
//! through an [`EventSink`].

mod client;
mod config;
mod event;
mod receive;
mod sink;
mod state;


pub use client::{Session, StreamTrait};
pub use config::{SessionConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_USERNAME};
pub use event::{Notice, SessionEvent};
pub use sink::{CallbackSink, ChannelSink, EventSink};
pub use state::ConnectionState;
