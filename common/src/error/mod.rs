//! Error types for the market simulator
//!
//! This module provides a unified error handling system for the simulator
//! services. Every failure a tick can produce maps onto one of these
//! variants so that callers can contain a failed tick without guessing at
//! error provenance.

use std::fmt::Display;
use thiserror::Error;

/// Market simulator error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error when a symbol has no record in the price store
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// Error when a price mutation cannot be committed
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    /// Error when a committed event cannot be handed to the bus
    #[error("Publish failed: {0}")]
    PublishFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            let context = context_fn().to_string();
            match e {
                Error::SymbolNotFound(msg) => {
                    Error::SymbolNotFound(format!("{}: {}", context, msg))
                }
                Error::CommitFailed(msg) => Error::CommitFailed(format!("{}: {}", context, msg)),
                Error::PublishFailed(msg) => Error::PublishFailed(format!("{}: {}", context, msg)),
                Error::ConfigurationError(msg) => {
                    Error::ConfigurationError(format!("{}: {}", context, msg))
                }
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context, msg)),
            }
        })
    }
}

/// Convert string messages into an error
impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Internal(message)
    }
}

/// Convert static string references into an error
impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Internal(message.to_string())
    }
}
