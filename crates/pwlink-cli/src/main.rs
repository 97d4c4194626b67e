//! pwlink - list and patch PipeWire ports through `pw-link`.
//!
//! Ports are shown paired into stereo groups and links are shown grouped,
//! the way they are reconstructed by `pwlink-core`.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use pwlink_core::{Direction, GraphSnapshot, Port, dedup_links, group_links, pair_ports};
use pwlink_pipewire::{ProcessRunner, PwError, PwLink};

#[derive(Parser)]
#[command(name = "pwlink")]
#[command(author, version, about = "List and patch PipeWire ports", long_about = None)]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Linking tool to invoke (overrides the config file)
    #[arg(long, global = true)]
    tool: Option<String>,

    /// Kill the linking tool after this many milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List input ports
    Inputs {
        /// Don't pair ports into stereo groups
        #[arg(long)]
        raw: bool,
    },

    /// List output ports
    Outputs {
        /// Don't pair ports into stereo groups
        #[arg(long)]
        raw: bool,
    },

    /// List links
    Links {
        /// Don't group links
        #[arg(long)]
        raw: bool,
    },

    /// Connect two ports, given as `device:name` in either order
    Connect { first: String, second: String },

    /// Disconnect two ports, given as `device:name` in either order
    Disconnect { first: String, second: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config()?;

    // Logs go to stderr so listings on stdout stay machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("pwlink_cli={}", config.logging.level).parse()?)
                .add_directive(format!("pwlink_core={}", config.logging.level).parse()?)
                .add_directive(format!("pwlink_pipewire={}", config.logging.level).parse()?),
        )
        .init();

    debug!(version = env!("CARGO_PKG_VERSION"), ?config, "Starting pwlink");

    let tool = cli.tool.unwrap_or_else(|| config.tool.command.clone());
    let timeout = cli.timeout_ms.map(Duration::from_millis).or(config.tool.timeout());
    let runner = match timeout {
        Some(timeout) => ProcessRunner::with_timeout(timeout),
        None => ProcessRunner::new(),
    };
    debug!(%tool, timeout = ?runner.timeout(), "Using linking tool");
    let client = PwLink::with_tool(runner, tool);

    match cli.command {
        Commands::Inputs { raw } => list_ports(&client, Direction::Input, raw, cli.json),
        Commands::Outputs { raw } => list_ports(&client, Direction::Output, raw, cli.json),
        Commands::Links { raw } => list_links(&client, raw, cli.json),
        Commands::Connect { first, second } => {
            let (a, b) = resolve_pair(&client.snapshot()?, &first, &second)?;
            let link = client.connect_ports(&a, &b).context("Failed to connect ports")?;
            info!(%link, "Linked");
            println!("{link}");
            Ok(())
        }
        Commands::Disconnect { first, second } => {
            let (a, b) = resolve_pair(&client.snapshot()?, &first, &second)?;
            client.disconnect_ports(&a, &b).context("Failed to disconnect ports")?;
            Ok(())
        }
    }
}

fn list_ports(
    client: &PwLink<ProcessRunner>,
    direction: Direction,
    raw: bool,
    json: bool,
) -> Result<()> {
    let ports = client.list_ports(direction).context("Failed to list ports")?;
    if raw {
        emit(&ports, json, || render::ports(&ports))
    } else {
        let entries = pair_ports(&ports);
        emit(&entries, json, || render::port_entries(&entries))
    }
}

fn list_links(client: &PwLink<ProcessRunner>, raw: bool, json: bool) -> Result<()> {
    let links = dedup_links(client.list_links().context("Failed to list links")?);
    if raw {
        emit(&links, json, || render::links(&links))
    } else {
        let entries = group_links(&links);
        emit(&entries, json, || render::link_entries(&entries))
    }
}

fn emit<T: Serialize + ?Sized>(value: &T, json: bool, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

/// Resolve two `device:name` tokens, preferring opposite directions.
fn resolve_pair(graph: &GraphSnapshot, first: &str, second: &str) -> Result<(Port, Port)> {
    let a = graph
        .find_any_port(first)
        .ok_or_else(|| PwError::PortNotFound(first.to_string()))?;
    let b = graph
        .find_port(second, a.direction().opposite())
        .or_else(|| graph.find_any_port(second))
        .ok_or_else(|| PwError::PortNotFound(second.to_string()))?;
    Ok((a.clone(), b.clone()))
}
