//! natter client library
//!
//! The chat [`Session`](session::Session) plus the pieces the `natter`
//! binary wraps around it: configuration loading, command-line parsing and
//! the console front-end.

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod session;

pub use session::{
    CallbackSink, ChannelSink, ConnectionState, EventSink, Notice, Session, SessionConfig,
    SessionEvent,
};
