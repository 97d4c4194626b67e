//! Links between an output port and an input port, and their aggregates.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::port::{Direction, ObjectId, Port};
use crate::stereo::StereoGroup;

/// A directed connection from one output port to one input port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Link object ID, only known when parsed from a link listing
    id: Option<ObjectId>,
    /// Receiving port
    input: Port,
    /// Sending port
    output: Port,
}

impl Link {
    /// Create a link, checking both endpoint directions.
    pub fn new(id: Option<ObjectId>, input: Port, output: Port) -> Result<Self> {
        if !input.is_input() {
            return Err(Error::DirectionMismatch {
                port: input.to_string(),
                expected: Direction::Input,
            });
        }
        if !output.is_output() {
            return Err(Error::DirectionMismatch {
                port: output.to_string(),
                expected: Direction::Output,
            });
        }
        Ok(Self { id, input, output })
    }

    /// Create a link from two ports given in either order.
    pub fn between(id: Option<ObjectId>, a: Port, b: Port) -> Result<Self> {
        if a.is_output() { Self::new(id, b, a) } else { Self::new(id, a, b) }
    }

    #[must_use]
    pub fn id(&self) -> Option<&ObjectId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn input(&self) -> &Port {
        &self.input
    }

    #[must_use]
    pub fn output(&self) -> &Port {
        &self.output
    }

    /// The endpoint on the given side of the link.
    #[must_use]
    pub fn endpoint(&self, side: Direction) -> &Port {
        match side {
            Direction::Input => &self.input,
            Direction::Output => &self.output,
        }
    }

    /// Whether the link touches `device` on either side.
    #[must_use]
    pub fn involves_device(&self, device: &str) -> bool {
        self.input.device() == device || self.output.device() == device
    }

    /// Whether both links join the same pair of endpoints.
    #[must_use]
    pub fn same_endpoints(&self, other: &Link) -> bool {
        self.input.same_endpoint(&other.input) && self.output.same_endpoint(&other.output)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.output.qualified_name(), self.input.qualified_name())
    }
}

/// A left/right pair of links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StereoLink {
    /// Link carrying the left channel
    left: Link,
    /// Link carrying the right channel
    right: Link,
}

impl StereoLink {
    #[must_use]
    pub fn new(left: Link, right: Link) -> Self {
        Self { left, right }
    }

    #[must_use]
    pub fn left(&self) -> &Link {
        &self.left
    }

    #[must_use]
    pub fn right(&self) -> &Link {
        &self.right
    }

    /// Input side of the pair as a stereo group.
    #[must_use]
    pub fn inputs(&self) -> StereoGroup {
        StereoGroup::paired(self.left.input.clone(), self.right.input.clone())
    }

    /// Output side of the pair as a stereo group.
    #[must_use]
    pub fn outputs(&self) -> StereoGroup {
        StereoGroup::paired(self.left.output.clone(), self.right.output.clone())
    }
}

/// Links that share one endpoint port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkGroup {
    /// Device of the shared endpoint
    common_device: String,
    /// Port name of the shared endpoint
    common_name: String,
    /// Side of the links the common endpoint sits on
    side: Direction,
    /// Member links in discovery order
    links: Vec<Link>,
}

impl LinkGroup {
    pub(crate) fn new(side: Direction, first: Link) -> Self {
        let endpoint = first.endpoint(side);
        Self {
            common_device: endpoint.device().to_string(),
            common_name: endpoint.name().to_string(),
            side,
            links: vec![first],
        }
    }

    pub(crate) fn push(&mut self, link: Link) {
        self.links.push(link);
    }

    #[must_use]
    pub fn common_device(&self) -> &str {
        &self.common_device
    }

    #[must_use]
    pub fn common_name(&self) -> &str {
        &self.common_name
    }

    #[must_use]
    pub fn side(&self) -> Direction {
        self.side
    }

    /// Member links in discovery order.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// One entry of a grouped link listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LinkEntry {
    /// Left/right links between two devices
    Stereo(StereoLink),
    /// Links fanning in or out of one port
    Group(LinkGroup),
    /// Anything else
    Single(Link),
}

impl LinkEntry {
    /// All links in this entry.
    #[must_use]
    pub fn links(&self) -> Vec<&Link> {
        match self {
            Self::Stereo(stereo) => vec![stereo.left(), stereo.right()],
            Self::Group(group) => group.links().iter().collect(),
            Self::Single(link) => vec![link],
        }
    }
}

/// Remove repeated links.
///
/// `pw-link --links` prints every link twice, once under its output port
/// and once under its input port. The first occurrence is kept. Links are
/// the same when their IDs match, or when neither has an ID and they join
/// the same endpoints.
#[must_use]
pub fn dedup_links(links: Vec<Link>) -> Vec<Link> {
    let mut seen_ids = HashSet::new();
    let mut unique: Vec<Link> = Vec::with_capacity(links.len());

    for link in links {
        let duplicate = match link.id() {
            Some(id) => !seen_ids.insert(id.clone()),
            None => unique.iter().any(|kept| kept.id().is_none() && kept.same_endpoints(&link)),
        };
        if !duplicate {
            unique.push(link);
        }
    }

    unique
}
