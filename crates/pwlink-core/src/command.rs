//! Argument vectors for `pw-link` invocations.
//!
//! Listing and linking are both driven through the same tool; this module
//! only produces the arguments. Running them is up to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::port::{Direction, Port};
use crate::stereo::StereoGroup;

/// Default name of the linking tool.
pub const PW_LINK_COMMAND: &str = "pw-link";

/// Flag that turns a link invocation into an unlink.
pub const DISCONNECT_FLAG: &str = "--disconnect";

/// Flag that makes listings print object IDs.
pub const ID_FLAG: &str = "--id";

/// A mutation of the link graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkAction {
    /// Create a link
    Connect,
    /// Remove a link
    Disconnect,
}

impl LinkAction {
    /// Preposition used when describing the action ("connect to").
    #[must_use]
    pub fn preposition(self) -> &'static str {
        match self {
            Self::Connect => "to",
            Self::Disconnect => "from",
        }
    }
}

impl fmt::Display for LinkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
        })
    }
}

/// A listing query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    /// Input ports
    Inputs,
    /// Output ports
    Outputs,
    /// Links
    Links,
}

impl Listing {
    /// Listing of the ports with the given direction.
    #[must_use]
    pub fn ports(direction: Direction) -> Self {
        match direction {
            Direction::Input => Self::Inputs,
            Direction::Output => Self::Outputs,
        }
    }

    /// Arguments for this listing, with IDs enabled.
    #[must_use]
    pub fn args(self) -> [&'static str; 2] {
        let flag = match self {
            Self::Inputs => "--input",
            Self::Outputs => "--output",
            Self::Links => "--links",
        };
        [flag, ID_FLAG]
    }
}

/// Build the arguments that connect or disconnect two ports.
///
/// The ports may be given in either order: the output's `device:name`
/// always comes first, then the input's. Disconnecting appends
/// [`DISCONNECT_FLAG`].
///
/// # Errors
/// Returns [`Error::InvalidLink`] when both ports have the same direction.
pub fn build_args(this: &Port, other: &Port, action: LinkAction) -> Result<Vec<String>> {
    let (output, input) = match (this.direction(), other.direction()) {
        (Direction::Output, Direction::Input) => (this, other),
        (Direction::Input, Direction::Output) => (other, this),
        (direction, _) => {
            return Err(Error::InvalidLink {
                action,
                direction,
                first: this.to_string(),
                second: other.to_string(),
            });
        }
    };

    let mut args = vec![output.qualified_name(), input.qualified_name()];
    if action == LinkAction::Disconnect {
        args.push(DISCONNECT_FLAG.to_string());
    }
    Ok(args)
}

/// Match the channels of two stereo groups, left with left and right with
/// right. Channels missing on either side are left out.
///
/// # Errors
/// Returns [`Error::InvalidLink`] when both groups have the same direction.
pub fn channel_pairs<'a>(
    this: &'a StereoGroup,
    other: &'a StereoGroup,
    action: LinkAction,
) -> Result<Vec<(&'a Port, &'a Port)>> {
    if this.direction() == other.direction() {
        return Err(Error::InvalidLink {
            action,
            direction: this.direction(),
            first: this.to_string(),
            second: other.to_string(),
        });
    }

    let pairs = [(this.left(), other.left()), (this.right(), other.right())]
        .into_iter()
        .filter_map(|pair| match pair {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        })
        .collect();
    Ok(pairs)
}
