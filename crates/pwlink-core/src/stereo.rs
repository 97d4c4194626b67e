//! Stereo channel groups and the adjacency-based pairing heuristic.
//!
//! `pw-link` lists the ports of one device next to each other, so two
//! consecutive ports of the same device whose names mention `FL`/`FR` are
//! taken to be a stereo pair. Devices with more than two channels, or with
//! left and right reversed relative to listing order, are not paired
//! correctly; such ports come out as mono entries.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::error::{Error, Result};
use crate::port::{Direction, Port};

/// Channel position inferred from a port or link name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Front left
    Left,
    /// Front right
    Right,
}

/// Infer a channel position from a name (`FL` wins over `FR`).
#[must_use]
pub fn channel_of(name: &str) -> Option<Channel> {
    let upper = name.to_uppercase();
    if upper.contains("FL") {
        Some(Channel::Left)
    } else if upper.contains("FR") {
        Some(Channel::Right)
    } else {
        None
    }
}

/// Left/right grouping of same-direction ports.
///
/// Either side may be absent; a group always has at least one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StereoGroup {
    /// Direction shared by both members
    direction: Direction,
    /// Left channel port
    left: Option<Port>,
    /// Right channel port
    right: Option<Port>,
}

impl StereoGroup {
    /// Build a group, checking that the members share a direction.
    pub fn new(left: Option<Port>, right: Option<Port>) -> Result<Self> {
        let direction = match (&left, &right) {
            (None, None) => return Err(Error::EmptyStereoGroup),
            (Some(l), Some(r)) if l.direction() != r.direction() => {
                return Err(Error::DirectionMismatch {
                    port: r.to_string(),
                    expected: l.direction(),
                });
            }
            (Some(port), _) | (None, Some(port)) => port.direction(),
        };
        Ok(Self { direction, left, right })
    }

    /// A group with only a left (mono) channel.
    #[must_use]
    pub fn mono(port: Port) -> Self {
        Self { direction: port.direction(), left: Some(port), right: None }
    }

    /// Pair two ports already known to share a direction.
    pub(crate) fn paired(left: Port, right: Port) -> Self {
        debug_assert_eq!(left.direction(), right.direction());
        Self { direction: left.direction(), left: Some(left), right: Some(right) }
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn left(&self) -> Option<&Port> {
        self.left.as_ref()
    }

    #[must_use]
    pub fn right(&self) -> Option<&Port> {
        self.right.as_ref()
    }

    /// Whether both channels are present.
    #[must_use]
    pub fn is_stereo(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Device shared by the members.
    ///
    /// `None` when left and right belong to different devices.
    #[must_use]
    pub fn device(&self) -> Option<&str> {
        match (&self.left, &self.right) {
            (Some(l), Some(r)) if l.device() == r.device() => Some(l.device()),
            (Some(_), Some(_)) | (None, None) => None,
            (Some(port), None) | (None, Some(port)) => Some(port.device()),
        }
    }

    /// Members in left, right order.
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.left.iter().chain(self.right.iter())
    }
}

impl fmt::Display for StereoGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |port: Option<&Port>| port.map_or_else(|| "-".to_string(), Port::qualified_name);
        write!(f, "[{} | {}]", side(self.left()), side(self.right()))
    }
}

/// One entry of a paired port listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PortEntry {
    /// Two ports paired into left and right
    Stereo(StereoGroup),
    /// A port with no partner
    Mono(Port),
}

impl PortEntry {
    #[must_use]
    pub fn direction(&self) -> Direction {
        match self {
            Self::Stereo(group) => group.direction(),
            Self::Mono(port) => port.direction(),
        }
    }

    #[must_use]
    pub fn device(&self) -> Option<&str> {
        match self {
            Self::Stereo(group) => group.device(),
            Self::Mono(port) => Some(port.device()),
        }
    }

    /// Whether any member is a MIDI port.
    #[must_use]
    pub fn is_midi(&self) -> bool {
        match self {
            Self::Stereo(group) => group.ports().any(Port::is_midi),
            Self::Mono(port) => port.is_midi(),
        }
    }

    /// View this entry as a group; a mono port becomes the left channel.
    #[must_use]
    pub fn into_stereo(self) -> StereoGroup {
        match self {
            Self::Stereo(group) => group,
            Self::Mono(port) => StereoGroup::mono(port),
        }
    }
}

/// Pair adjacent ports of the same device into stereo groups.
///
/// The scan walks the ports in listing order. When the next port belongs
/// to the same device (and direction) and its name mentions `FL`, it becomes
/// the left channel of a pair with the current port; if it mentions `FR` it
/// becomes the right channel. Anything else is emitted as a mono entry.
#[must_use]
pub fn pair_ports(ports: &[Port]) -> Vec<PortEntry> {
    let mut entries = Vec::with_capacity(ports.len());
    let mut i = 0;

    while i < ports.len() {
        let current = &ports[i];
        let next = ports
            .get(i + 1)
            .filter(|next| next.device() == current.device())
            .filter(|next| next.direction() == current.direction());

        if let Some(next) = next {
            let pair = match channel_of(next.name()) {
                Some(Channel::Left) => Some((next, current)),
                Some(Channel::Right) => Some((current, next)),
                None => None,
            };
            if let Some((left, right)) = pair {
                entries.push(PortEntry::Stereo(StereoGroup::paired(left.clone(), right.clone())));
                i += 2;
                continue;
            }
        }

        trace!(id = %current.id(), device = %current.device(), name = %current.name(), "Mono port");
        entries.push(PortEntry::Mono(current.clone()));
        i += 1;
    }

    entries
}

/// Drop entries that carry MIDI ports.
#[must_use]
pub fn audio_only(entries: Vec<PortEntry>) -> Vec<PortEntry> {
    entries.into_iter().filter(|entry| !entry.is_midi()).collect()
}
