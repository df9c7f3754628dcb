//! Error types for natter
//!
//! Provides a unified error type used across all natter crates.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Main error type for natter operations
#[derive(Debug, thiserror::Error)]
pub enum NatterError {
    // === IO Errors ===

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: io::Error,
    },

    // === Connection Errors ===

    #[error("Connection refused by {addr}")]
    ConnectionRefused { addr: String },

    #[error("Connection reset by peer")]
    ConnectionReset,

    #[error("Connection timeout after {millis}ms")]
    ConnectionTimeout { millis: u64 },

    #[error("Connection closed unexpectedly")]
    ConnectionClosed,

    // === Input Errors ===

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // === Configuration Errors ===

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    // === Internal Errors ===

    #[error("Internal error: {0}")]
    Internal(String),
}

impl NatterError {
    /// Classify a socket-level IO error by its kind
    ///
    /// Only refused and reset connections get their own variant; every
    /// other kind stays `Io` so the OS message is kept. `addr` is only used
    /// for refused connections.
    pub fn from_io(err: io::Error, addr: &str) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused {
                addr: addr.to_string(),
            },
            io::ErrorKind::ConnectionReset => Self::ConnectionReset,
            _ => Self::Io(err),
        }
    }

    /// Timeout error for an elapsed `limit`, saturating at `u64::MAX` ms
    pub fn timeout(limit: Duration) -> Self {
        Self::ConnectionTimeout {
            millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this error leaves the connection unusable
    ///
    /// Local validation failures and file errors do not touch the socket.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::ConnectionReset
                | Self::ConnectionTimeout { .. }
                | Self::ConnectionClosed
        )
    }
}

/// Result type alias using NatterError
pub type Result<T> = std::result::Result<T, NatterError>;
