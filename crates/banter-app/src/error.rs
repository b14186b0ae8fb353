//! Error types for the transport and engine layers.
//!
//! Small by design: the wire protocol is fire-and-forget and the state
//! machine is infallible, so errors only exist at construction time
//! (a malformed endpoint); everything at runtime degrades to a logged
//! drop instead.

use thiserror::Error;

/// Transport-layer errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint string is not a valid WebSocket URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Engine construction errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The transport session could not be set up.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
