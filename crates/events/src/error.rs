//! Error types for the events crate.

use thiserror::Error;

/// Result type alias for event operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Event error types.
///
/// Sequencing itself is total; these cover the publisher seam and the wire
/// encoding helpers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("publish to stream '{stream}' failed: {reason}")]
    PublishFailed { stream: String, reason: String },

    #[error("publisher channel closed")]
    ChannelClosed,

    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

impl Error {
    /// Create a publish failed error.
    pub fn publish_failed(stream: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PublishFailed {
            stream: stream.into(),
            reason: reason.into(),
        }
    }

    /// Create a serialization error.
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization {
            reason: reason.into(),
        }
    }
}
