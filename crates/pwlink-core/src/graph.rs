//! Point-in-time view of the port/link graph.

use serde::Serialize;

use crate::grouping::group_links;
use crate::link::{Link, LinkEntry, dedup_links};
use crate::port::{Direction, Port};
use crate::stereo::{PortEntry, pair_ports};

/// Ports and links captured by one round of listings.
///
/// A snapshot is never updated; re-query to observe changes made by
/// connect or disconnect calls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphSnapshot {
    /// Input ports in listing order
    inputs: Vec<Port>,
    /// Output ports in listing order
    outputs: Vec<Port>,
    /// Unique links, duplicates from the listing removed
    links: Vec<Link>,
}

impl GraphSnapshot {
    /// Build a snapshot from parsed listings.
    #[must_use]
    pub fn new(inputs: Vec<Port>, outputs: Vec<Port>, links: Vec<Link>) -> Self {
        Self { inputs, outputs, links: dedup_links(links) }
    }

    #[must_use]
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    #[must_use]
    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Ports with the given direction.
    #[must_use]
    pub fn ports(&self, direction: Direction) -> &[Port] {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }

    /// Find a port by its `device:name` token.
    #[must_use]
    pub fn find_port(&self, target: &str, direction: Direction) -> Option<&Port> {
        self.ports(direction).iter().find(|p| p.qualified_name() == target)
    }

    /// Find a port by its `device:name` token, outputs first.
    #[must_use]
    pub fn find_any_port(&self, target: &str) -> Option<&Port> {
        self.find_port(target, Direction::Output)
            .or_else(|| self.find_port(target, Direction::Input))
    }

    /// All ports of a device, outputs first.
    #[must_use]
    pub fn ports_for_device(&self, device: &str) -> Vec<&Port> {
        self.outputs.iter().chain(&self.inputs).filter(|p| p.device() == device).collect()
    }

    /// Links touching a device on either side.
    #[must_use]
    pub fn links_for_device(&self, device: &str) -> Vec<&Link> {
        self.links.iter().filter(|l| l.involves_device(device)).collect()
    }

    /// Check if a link exists from `output` to `input`.
    #[must_use]
    pub fn has_link(&self, output: &Port, input: &Port) -> bool {
        self.links
            .iter()
            .any(|l| l.output().same_endpoint(output) && l.input().same_endpoint(input))
    }

    /// Inputs paired into stereo groups.
    #[must_use]
    pub fn paired_inputs(&self) -> Vec<PortEntry> {
        pair_ports(&self.inputs)
    }

    /// Outputs paired into stereo groups.
    #[must_use]
    pub fn paired_outputs(&self) -> Vec<PortEntry> {
        pair_ports(&self.outputs)
    }

    /// Links grouped into stereo pairs and shared-endpoint groups.
    #[must_use]
    pub fn grouped_links(&self) -> Vec<LinkEntry> {
        group_links(&self.links)
    }
}
