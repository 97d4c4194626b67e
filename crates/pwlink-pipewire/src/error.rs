//! PipeWire error types.

use std::time::Duration;

use thiserror::Error;

/// PipeWire error type.
#[derive(Debug, Error)]
pub enum PwError {
    #[error("Failed to spawn command: {0}")]
    SpawnFailed(String),

    #[error("Command `{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("Failed to read {stream} of `{command}`: {reason}")]
    ReadFailed { command: String, stream: &'static str, reason: String },

    #[error("Command `{command}` failed with status {status:?}: {stderr}")]
    CommandFailed { command: String, status: Option<i32>, stderr: String },

    #[error("Port not found: {0}")]
    PortNotFound(String),

    #[error(transparent)]
    Core(#[from] pwlink_core::Error),
}

/// Result type for PipeWire operations.
pub type PwResult<T> = Result<T, PwError>;
