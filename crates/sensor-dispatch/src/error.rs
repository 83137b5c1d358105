//! Capture and Dispatch Error Types

use thiserror::Error;

/// Errors from the capture loop's lifecycle operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    /// Enable called while already decoding
    #[error("capture loop is already enabled")]
    AlreadyEnabled,

    /// Disable called while not decoding
    #[error("capture loop is already disabled")]
    AlreadyDisabled,

    /// Lifecycle operation after teardown
    #[error("capture loop has been shut down")]
    ShutDown,

    /// The capture thread could not be spawned
    #[error("failed to spawn capture thread: {0}")]
    Spawn(String),
}

/// Errors surfaced by the dispatcher
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The byte source failed to connect
    #[error("byte source error: {0}")]
    Source(String),

    /// A capture-loop precondition was violated
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

impl From<std::io::Error> for DispatchError {
    fn from(err: std::io::Error) -> Self {
        DispatchError::Source(err.to_string())
    }
}
