//! pwlink PipeWire - `pw-link` invocation and graph queries.
//!
//! This crate handles all interactions with the PipeWire linking tool:
//! - Running `pw-link` as a child process, with an optional timeout
//! - Listing input ports, output ports and links
//! - Connecting and disconnecting ports and stereo groups

pub mod client;
pub mod error;
pub mod runner;

pub use client::PwLink;
pub use error::{PwError, PwResult};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
