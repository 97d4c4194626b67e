//! Ports as reported by `pw-link --input/--output --id`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Input port (receives audio)
    Input,
    /// Output port (sends audio)
    Output,
}

impl Direction {
    /// The other direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Input => Self::Output,
            Self::Output => Self::Input,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Input => "input",
            Self::Output => "output",
        })
    }
}

/// Object identifier as printed by the listing tool.
///
/// PipeWire prints numeric global IDs, but the token is kept verbatim so
/// that listings with non-numeric identifiers still parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Create an identifier from a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric view of the token, `None` when it is not a number.
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for ObjectId {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl PartialEq<&str> for ObjectId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A single named, directioned connection point on a device.
///
/// Ports are value snapshots of one listing call and never change after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    /// Port object ID
    id: ObjectId,
    /// Device (client) namespace
    device: String,
    /// Channel name, stored verbatim
    name: String,
    /// Port direction
    direction: Direction,
    /// Whether the device or name mentions MIDI
    is_midi: bool,
}

impl Port {
    /// Create a port. MIDI detection is derived from the device and name.
    #[must_use]
    pub fn new(
        id: impl Into<ObjectId>,
        device: impl Into<String>,
        name: impl Into<String>,
        direction: Direction,
    ) -> Self {
        let device = device.into();
        let name = name.into();
        let is_midi = looks_like_midi(&device) || looks_like_midi(&name);
        Self { id: id.into(), device, name, direction, is_midi }
    }

    /// Identifier reported by the listing tool.
    #[must_use]
    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// Device (client) namespace, the part before the first colon.
    #[must_use]
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Channel name, the part after the first colon.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether this port carries MIDI rather than audio.
    #[must_use]
    pub fn is_midi(&self) -> bool {
        self.is_midi
    }

    #[must_use]
    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }

    #[must_use]
    pub fn is_output(&self) -> bool {
        self.direction == Direction::Output
    }

    /// The `device:name` token the linking tool accepts.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.device, self.name)
    }

    /// Whether this port is the same endpoint as `other` (device and name).
    #[must_use]
    pub fn same_endpoint(&self, other: &Port) -> bool {
        self.device == other.device && self.name == other.name
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} (id {})", self.device, self.name, self.id)
    }
}

fn looks_like_midi(s: &str) -> bool {
    s.to_ascii_lowercase().contains("midi")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_and_display() {
        let device = "alsa_output.pci-0000_00.1.analog-stereo";
        let port = Port::new("83", device, "playback_FL", Direction::Input);

        assert_eq!(port.qualified_name(), "alsa_output.pci-0000_00.1.analog-stereo:playback_FL");
        assert_eq!(
            port.to_string(),
            "alsa_output.pci-0000_00.1.analog-stereo:playback_FL (id 83)"
        );
        assert!(port.is_input());
        assert!(!port.is_output());
    }

    #[test]
    fn test_object_id_numeric_view() {
        assert_eq!(ObjectId::from("83").as_u32(), Some(83));
        assert_eq!(ObjectId::from("node-a").as_u32(), None);
        assert_eq!(ObjectId::from("node-a"), "node-a");
    }

    #[test]
    fn test_midi_detection() {
        let name = "Midi Through:(capture_0) Midi Through Port-0";
        let midi = Port::new("32", "Midi-Bridge", name, Direction::Output);
        let audio = Port::new("40", "firefox", "output_FL", Direction::Output);

        assert!(midi.is_midi());
        assert!(!audio.is_midi());
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Input.opposite(), Direction::Output);
        assert_eq!(Direction::Output.opposite(), Direction::Input);
    }

    #[test]
    fn test_port_serializes_id_as_plain_string() {
        let port = Port::new("7", "dev", "FL", Direction::Output);
        let json = serde_json::to_value(&port).unwrap();

        assert_eq!(json["id"], "7");
        assert_eq!(json["direction"], "output");
        assert_eq!(json["is_midi"], false);
    }
}
