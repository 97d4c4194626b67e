//! Plain-text rendering of listings.

use std::fmt::Write;

use pwlink_core::{Link, LinkEntry, Port, PortEntry};

fn port_line(out: &mut String, port: &Port) {
    let _ = writeln!(out, "{:>6} {}", port.id(), port.qualified_name());
}

pub fn ports(ports: &[Port]) -> String {
    let mut out = String::new();
    for port in ports {
        port_line(&mut out, port);
    }
    out
}

pub fn port_entries(entries: &[PortEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry {
            PortEntry::Stereo(group) => {
                let _ = writeln!(out, "stereo {}", group.device().unwrap_or("(mixed devices)"));
                for (label, port) in [("L", group.left()), ("R", group.right())] {
                    if let Some(port) = port {
                        let _ = writeln!(out, "  {label} {:>6} {}", port.id(), port.name());
                    }
                }
            }
            PortEntry::Mono(port) => {
                let _ = writeln!(out, "mono   {}", port.device());
                let _ = writeln!(out, "    {:>6} {}", port.id(), port.name());
            }
        }
    }
    out
}

fn link_line(out: &mut String, indent: &str, link: &Link) {
    let id = link.id().map_or_else(|| "-".to_string(), ToString::to_string);
    let _ = writeln!(out, "{indent}{id:>6} {link}");
}

pub fn links(links: &[Link]) -> String {
    let mut out = String::new();
    for link in links {
        link_line(&mut out, "", link);
    }
    out
}

pub fn link_entries(entries: &[LinkEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match entry {
            LinkEntry::Stereo(stereo) => {
                let _ = writeln!(out, "stereo");
                link_line(&mut out, "  L ", stereo.left());
                link_line(&mut out, "  R ", stereo.right());
            }
            LinkEntry::Group(group) => {
                let _ = writeln!(
                    out,
                    "group  {}:{} ({} links, shared {})",
                    group.common_device(),
                    group.common_name(),
                    group.len(),
                    group.side()
                );
                for link in group.links() {
                    link_line(&mut out, "    ", link);
                }
            }
            LinkEntry::Single(link) => link_line(&mut out, "", link),
        }
    }
    out
}
