//! Error types for bloomkv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for bloomkv operations
#[derive(Debug, Error)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Server Errors
    // -------------------------------------------------------------------------
    /// The server rejected the command. Carries the server's message verbatim.
    #[error("Server error: {0}")]
    Server(String),

    // -------------------------------------------------------------------------
    // Reply Errors
    // -------------------------------------------------------------------------
    /// The reply did not have the shape the operation expects.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Dump Archive Errors
    // -------------------------------------------------------------------------
    #[error("Dump corruption detected: {0}")]
    Corrupt(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error was reported by the server rather than raised locally
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Server(_))
    }
}
