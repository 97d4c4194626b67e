//! Parsers for `pw-link` listing output.
//!
//! Port listings (`--input --id`, `--output --id`) print one port per line:
//!
//! ```text
//!   83 alsa_output.pci-0000_00.1.analog-stereo:playback_FL
//! ```
//!
//! Link listings (`--links --id`) print an anchor port followed by one
//! relation line per link, where `|->` means "flows to" and `|<-` means
//! "flows from":
//!
//! ```text
//!   83 alsa_output.pci-0000_00.1.analog-stereo:playback_FL
//!  102   |<-   98 firefox:output_FL
//! ```
//!
//! Both parsers are tolerant: lines that don't fit are skipped and an empty
//! listing is a valid result.

use tracing::{debug, trace};

use crate::link::Link;
use crate::port::{Direction, ObjectId, Port};

/// Relation glyph printed in link listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    /// `|->`, the anchor feeds the peer
    FlowsTo,
    /// `|<-`, the anchor is fed by the peer
    FlowsFrom,
}

impl Glyph {
    const FLOWS_TO: &'static str = "|->";
    const FLOWS_FROM: &'static str = "|<-";

    fn parse(token: &str) -> Option<Self> {
        match token {
            Self::FLOWS_TO => Some(Self::FlowsTo),
            Self::FLOWS_FROM => Some(Self::FlowsFrom),
            _ => None,
        }
    }

    /// Split a leading glyph off `text`.
    fn strip(text: &str) -> Option<(Self, &str)> {
        if let Some(rest) = text.strip_prefix(Self::FLOWS_TO) {
            Some((Self::FlowsTo, rest))
        } else {
            text.strip_prefix(Self::FLOWS_FROM).map(|rest| (Self::FlowsFrom, rest))
        }
    }

    /// Direction of the anchor port for this glyph.
    fn anchor_direction(self) -> Direction {
        match self {
            Self::FlowsTo => Direction::Output,
            Self::FlowsFrom => Direction::Input,
        }
    }
}

/// Split a line into an identifier token and the rest of the line.
fn split_record(line: &str) -> Option<(&str, &str)> {
    let (id, rest) = line.trim_start().split_once(char::is_whitespace)?;
    let rest = rest.trim();
    (!rest.is_empty()).then_some((id, rest))
}

/// Split a `device:name` token at its first colon.
fn split_target(text: &str) -> Option<(&str, &str)> {
    let (device, name) = text.split_once(':')?;
    (!device.is_empty() && !name.is_empty()).then_some((device, name))
}

/// Parse a port listing into ports of the given direction.
#[must_use]
pub fn parse_ports(raw: &str, direction: Direction) -> Vec<Port> {
    let mut ports = Vec::new();

    for line in raw.lines() {
        let parsed = split_record(line)
            .filter(|(id, _)| Glyph::parse(id).is_none())
            .and_then(|(id, text)| split_target(text).map(|(device, name)| (id, device, name)));

        match parsed {
            Some((id, device, name)) => ports.push(Port::new(id, device, name, direction)),
            None if !line.trim().is_empty() => trace!(line, "Skipping unparsable port line"),
            None => {}
        }
    }

    debug!(count = ports.len(), %direction, "Parsed port listing");
    ports
}

/// A classified line of a link listing.
#[derive(Debug)]
enum Record<'a> {
    /// `<id> <device>:<name>`
    Anchor { id: &'a str, device: &'a str, name: &'a str },
    /// `[<link id>] |-> <peer id> <device>:<name>`
    Relation {
        link_id: Option<&'a str>,
        glyph: Glyph,
        peer_id: &'a str,
        device: &'a str,
        name: &'a str,
    },
    /// A line carrying a glyph whose peer could not be parsed
    BrokenRelation(&'a str),
    /// Any other non-blank line
    Other(&'a str),
}

impl<'a> Record<'a> {
    /// Classify a line, `None` for blank lines.
    fn parse(line: &'a str) -> Option<Self> {
        if line.trim().is_empty() {
            return None;
        }
        let Some((id, text)) = split_record(line) else {
            if Glyph::strip(line.trim_start()).is_some() {
                return Some(Self::BrokenRelation(line));
            }
            return Some(Self::Other(line));
        };

        // Without `--id` the relation line starts with the glyph itself.
        let relation = if let Some(glyph) = Glyph::parse(id) {
            Some((None, glyph, text))
        } else {
            Glyph::strip(text).map(|(glyph, rest)| (Some(id), glyph, rest))
        };
        if let Some((link_id, glyph, text)) = relation {
            return Some(Self::relation(link_id, glyph, text).unwrap_or(Self::BrokenRelation(line)));
        }

        Some(match split_target(text) {
            Some((device, name)) => Self::Anchor { id, device, name },
            None => Self::Other(line),
        })
    }

    fn relation(link_id: Option<&'a str>, glyph: Glyph, text: &'a str) -> Option<Self> {
        let (peer_id, target) = split_record(text)?;
        let (device, name) = split_target(target)?;
        Some(Self::Relation { link_id, glyph, peer_id, device, name })
    }
}

/// Parse a link listing into one link per relation line.
///
/// The direction of each anchor is taken from the glyph of its first
/// relation line; every peer gets the opposite direction. The relation run
/// of an anchor ends at the next line that is not a relation, so relation
/// lines below an unparsable line are orphans and are ignored.
#[must_use]
pub fn parse_links(raw: &str) -> Vec<Link> {
    let records: Vec<Record<'_>> = raw.lines().filter_map(Record::parse).collect();
    let mut links = Vec::new();
    let mut i = 0;

    while i < records.len() {
        let Record::Anchor { id, device, name } = records[i] else {
            trace!(record = ?records[i], "Skipping line outside an anchor");
            i += 1;
            continue;
        };
        i += 1;

        let mut anchor: Option<(Glyph, Port)> = None;
        loop {
            match records.get(i) {
                Some(&Record::Relation {
                    link_id,
                    glyph,
                    peer_id,
                    device: peer_device,
                    name: peer_name,
                }) => {
                    let (anchor_glyph, anchor_port) = anchor.get_or_insert_with(|| {
                        (glyph, Port::new(id, device, name, glyph.anchor_direction()))
                    });
                    if glyph != *anchor_glyph {
                        debug!(
                            anchor = %anchor_port,
                            peer_id,
                            "Relation glyph disagrees with anchor direction"
                        );
                    }

                    let direction = anchor_port.direction().opposite();
                    let peer = Port::new(peer_id, peer_device, peer_name, direction);
                    match Link::between(link_id.map(ObjectId::from), anchor_port.clone(), peer) {
                        Ok(link) => links.push(link),
                        Err(e) => debug!(error = %e, "Skipping inconsistent link"),
                    }
                }
                Some(Record::BrokenRelation(line)) => trace!(line, "Skipping malformed relation"),
                _ => break,
            }
            i += 1;
        }
    }

    debug!(count = links.len(), "Parsed link listing");
    links
}
