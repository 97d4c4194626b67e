//! `pw-link` client: graph queries and link mutations.

use tracing::{debug, info, warn};

use pwlink_core::command::{PW_LINK_COMMAND, build_args, channel_pairs};
use pwlink_core::{
    Direction, Error, GraphSnapshot, Link, LinkAction, LinkEntry, Listing, Port, PortEntry,
    StereoGroup, StereoLink, pair_ports, parse_links, parse_ports,
};

use crate::error::PwResult;
use crate::runner::CommandRunner;

/// Queries and mutates the link graph through the `pw-link` tool.
///
/// Every query runs the tool again and returns a fresh snapshot; nothing is
/// cached between calls.
pub struct PwLink<R> {
    /// Executes the tool
    runner: R,
    /// Tool binary, `pw-link` unless configured
    tool: String,
}

impl<R: CommandRunner> PwLink<R> {
    /// Create a client that invokes `pw-link` from `PATH`.
    pub fn new(runner: R) -> Self {
        Self::with_tool(runner, PW_LINK_COMMAND)
    }

    /// Create a client that invokes a specific tool binary.
    pub fn with_tool(runner: R, tool: impl Into<String>) -> Self {
        Self { runner, tool: tool.into() }
    }

    /// The tool binary this client invokes.
    pub fn tool(&self) -> &str {
        &self.tool
    }

    fn invoke<S: AsRef<str>>(&self, args: &[S]) -> PwResult<String> {
        let argv: Vec<String> = std::iter::once(self.tool.clone())
            .chain(args.iter().map(|a| a.as_ref().to_string()))
            .collect();
        let output = self.runner.run(&argv)?;
        Ok(output.stdout)
    }

    /// List the ports with the given direction, in listing order.
    pub fn list_ports(&self, direction: Direction) -> PwResult<Vec<Port>> {
        let stdout = self.invoke(&Listing::ports(direction).args())?;
        Ok(parse_ports(&stdout, direction))
    }

    /// List input ports paired into stereo groups.
    pub fn list_inputs(&self) -> PwResult<Vec<PortEntry>> {
        Ok(pair_ports(&self.list_ports(Direction::Input)?))
    }

    /// List output ports paired into stereo groups.
    pub fn list_outputs(&self) -> PwResult<Vec<PortEntry>> {
        Ok(pair_ports(&self.list_ports(Direction::Output)?))
    }

    /// List links, one per relation line of the listing.
    pub fn list_links(&self) -> PwResult<Vec<Link>> {
        let stdout = self.invoke(&Listing::Links.args())?;
        Ok(parse_links(&stdout))
    }

    /// Capture inputs, outputs and links in one snapshot.
    pub fn snapshot(&self) -> PwResult<GraphSnapshot> {
        let inputs = self.list_ports(Direction::Input)?;
        let outputs = self.list_ports(Direction::Output)?;
        let links = self.list_links()?;
        debug!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            links = links.len(),
            "Captured graph snapshot"
        );
        Ok(GraphSnapshot::new(inputs, outputs, links))
    }

    /// Connect two ports given in either order.
    ///
    /// The returned link carries no ID; list links again to see it.
    pub fn connect_ports(&self, this: &Port, other: &Port) -> PwResult<Link> {
        let args = build_args(this, other, LinkAction::Connect)?;
        self.invoke(&args)?;
        info!(output = %args[0], input = %args[1], "Connected ports");
        Ok(Link::between(None, this.clone(), other.clone())?)
    }

    /// Disconnect two ports given in either order.
    pub fn disconnect_ports(&self, this: &Port, other: &Port) -> PwResult<()> {
        let args = build_args(this, other, LinkAction::Disconnect)?;
        self.invoke(&args)?;
        info!(output = %args[0], input = %args[1], "Disconnected ports");
        Ok(())
    }

    /// Connect two groups channel by channel.
    ///
    /// Channels present on only one side are skipped. Fails only when no
    /// channel could be connected; returns a stereo link when both channels
    /// were, a single link otherwise.
    pub fn connect_groups(&self, this: &StereoGroup, other: &StereoGroup) -> PwResult<LinkEntry> {
        let pairs = channel_pairs(this, other, LinkAction::Connect)?;
        let mut linked = Vec::with_capacity(pairs.len());
        let mut last_error = None;

        for (a, b) in pairs {
            match self.connect_ports(a, b) {
                Ok(link) => linked.push(link),
                Err(e) => {
                    warn!(error = %e, "Channel connect failed");
                    last_error = Some(e);
                }
            }
        }

        let mut linked = linked.into_iter();
        match (linked.next(), linked.next()) {
            (Some(left), Some(right)) => Ok(LinkEntry::Stereo(StereoLink::new(left, right))),
            (Some(link), None) => Ok(LinkEntry::Single(link)),
            (None, _) => Err(last_error.unwrap_or_else(|| {
                Error::NoChannelPairs {
                    action: LinkAction::Connect,
                    first: this.to_string(),
                    second: other.to_string(),
                }
                .into()
            })),
        }
    }

    /// Disconnect two groups channel by channel.
    ///
    /// Returns the number of channels disconnected. Fails only when every
    /// attempted channel failed.
    pub fn disconnect_groups(&self, this: &StereoGroup, other: &StereoGroup) -> PwResult<usize> {
        let pairs = channel_pairs(this, other, LinkAction::Disconnect)?;
        self.disconnect_pairs(pairs)
    }

    /// Remove a parsed link.
    pub fn disconnect_link(&self, link: &Link) -> PwResult<()> {
        self.disconnect_ports(link.output(), link.input())
    }

    /// Remove both channels of a stereo link.
    pub fn disconnect_stereo_link(&self, stereo: &StereoLink) -> PwResult<usize> {
        let pairs = [stereo.left(), stereo.right()].map(|link| (link.output(), link.input()));
        self.disconnect_pairs(pairs)
    }

    /// Remove every link of a grouped entry.
    pub fn disconnect_entry(&self, entry: &LinkEntry) -> PwResult<usize> {
        let links = entry.links();
        self.disconnect_pairs(links.into_iter().map(|link| (link.output(), link.input())))
    }

    fn disconnect_pairs<'a>(
        &self,
        pairs: impl IntoIterator<Item = (&'a Port, &'a Port)>,
    ) -> PwResult<usize> {
        let mut disconnected = 0;
        let mut last_error = None;

        for (a, b) in pairs {
            match self.disconnect_ports(a, b) {
                Ok(()) => disconnected += 1,
                Err(e) => {
                    warn!(error = %e, "Channel disconnect failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if disconnected == 0 => Err(e),
            _ => Ok(disconnected),
        }
    }
}
