//! Error types for pwlink core.

use thiserror::Error;

use crate::command::LinkAction;
use crate::port::Direction;

/// Core error type for port and link operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(
        "Cannot {action} an {direction} {} another {direction}: {first} / {second}",
        .action.preposition()
    )]
    InvalidLink {
        action: LinkAction,
        /// Direction both ports share
        direction: Direction,
        first: String,
        second: String,
    },

    #[error("Port {port} has the wrong direction (expected {expected})")]
    DirectionMismatch { port: String, expected: Direction },

    #[error("Stereo group must have at least one channel")]
    EmptyStereoGroup,

    #[error("No channel pairs to {action} between {first} and {second}")]
    NoChannelPairs { action: LinkAction, first: String, second: String },
}

/// Result type alias for pwlink core operations.
pub type Result<T> = std::result::Result<T, Error>;
