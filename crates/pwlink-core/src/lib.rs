//! pwlink Core - Port/link model and `pw-link` listing reconstruction.
//!
//! This crate turns the line-oriented output of `pw-link` into typed ports
//! and links, pairs mono ports into stereo groups, groups links, and builds
//! the argument vectors for connecting and disconnecting. It performs no
//! I/O of its own.

pub mod command;
pub mod error;
pub mod graph;
pub mod grouping;
pub mod link;
pub mod listing;
pub mod port;
pub mod stereo;

pub use command::{LinkAction, Listing, build_args, channel_pairs};
pub use error::{Error, Result};
pub use graph::GraphSnapshot;
pub use grouping::{group_by_endpoint, group_links};
pub use link::{Link, LinkEntry, LinkGroup, StereoLink, dedup_links};
pub use listing::{parse_links, parse_ports};
pub use port::{Direction, ObjectId, Port};
pub use stereo::{PortEntry, StereoGroup, audio_only, pair_ports};
