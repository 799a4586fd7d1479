//! Unified error types for mnemo.
//!
//! All components validate their inputs at the boundary and fail fast: no
//! operation may leave a card, session, or progress record in a state
//! inconsistent with exactly one of "before" or "after" the triggering event.
//! Errors carry a stable kind plus human-readable detail.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for mnemo operations.
#[derive(Error, Debug)]
pub enum MnemoError {
    /// Referenced card, session, or progress record does not exist, or does
    /// not belong to the requesting owner.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Input rejected at a validation boundary (bad rating, negative time,
    /// closing an already-closed session).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The atomic write could not complete because a competing update changed
    /// the record between read and write. Callers should retry the whole
    /// submission against fresh state.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// I/O errors from the file-backed store.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },
}

/// A specialized Result type for mnemo operations.
pub type Result<T> = std::result::Result<T, MnemoError>;

impl MnemoError {
    /// Create a not-found error for a named entity kind.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether retrying the whole operation against fresh state may succeed.
    ///
    /// Only conflicts are retryable; validation and lookup failures are not.
    /// Note the idempotency caveat: a blind retry of a submission that did
    /// commit double-counts the review, so callers must deduplicate by
    /// review-attempt identity before retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

impl From<io::Error> for MnemoError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for MnemoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}
