//! Error types for envelope encoding and decoding.
//!
//! Decode failures are expected traffic, not bugs: a peer speaking a newer
//! protocol revision may send kinds we do not know. Callers log and drop
//! the frame rather than treating it as fatal.

use thiserror::Error;

/// Errors produced by the envelope codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Event could not be serialized into a JSON envelope.
    #[error("envelope encode failed: {0}")]
    Encode(String),

    /// Inbound frame was not a valid envelope: bad JSON, unknown event
    /// kind, or a payload of the wrong shape for its kind.
    #[error("envelope decode failed: {0}")]
    Decode(String),

    /// Inbound frame exceeded the size limit.
    #[error("frame too large: {size} bytes exceeds {max}")]
    FrameTooLarge {
        /// Size of the rejected frame in bytes.
        size: usize,
        /// Maximum accepted size in bytes.
        max: usize,
    },
}
