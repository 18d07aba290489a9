// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Chatline webhook bot.

use thiserror::Error;

/// The primary error type used across all Chatline adapter traits and core operations.
#[derive(Debug, Error)]
pub enum ChatlineError {
    /// Configuration errors (invalid TOML, missing secrets, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage errors (event log file unwritable, serialization failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging channel errors (delivery failure, malformed webhook body).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Completion or embedding API errors.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The webhook signature header was missing or did not match the body.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// Corpus index construction or search failed.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ChatlineError {
    /// Returns true for failures of an upstream service (completion, embedding,
    /// search, or a timeout waiting on one of them).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ChatlineError::Provider { .. }
                | ChatlineError::Retrieval(_)
                | ChatlineError::Timeout { .. }
        )
    }
}

impl From<std::io::Error> for ChatlineError {
    fn from(err: std::io::Error) -> Self {
        ChatlineError::Storage {
            source: Box::new(err),
        }
    }
}
