//! Grouping of parsed links into stereo pairs and shared-endpoint groups.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::link::{Link, LinkEntry, LinkGroup, StereoLink};
use crate::port::Direction;
use crate::stereo::{Channel, channel_of};

/// Length of the run of links at the start of `links` that pass through the
/// same endpoint port, checking the output side first.
fn shared_endpoint_run(links: &[Link]) -> Option<(Direction, usize)> {
    let first = links.first()?;
    [Direction::Output, Direction::Input].into_iter().find_map(|side| {
        let anchor = first.endpoint(side);
        let len = links.iter().take_while(|link| link.endpoint(side).same_endpoint(anchor)).count();
        (len >= 2).then_some((side, len))
    })
}

/// Group consecutive links.
///
/// Runs of links through one endpoint port become a [`LinkGroup`]. Otherwise
/// two consecutive links whose matching side shares a device are paired with
/// the `FL`/`FR` heuristic used for ports. The matching side is the input
/// side once the current link's input device has been seen, the output side
/// before that. Anything left over is a single link.
#[must_use]
pub fn group_links(links: &[Link]) -> Vec<LinkEntry> {
    let mut entries = Vec::new();
    let mut seen_devices: HashSet<&str> = HashSet::new();
    let mut i = 0;

    while i < links.len() {
        let current = &links[i];

        if let Some((side, len)) = shared_endpoint_run(&links[i..]) {
            let run = &links[i..i + len];
            let mut group = LinkGroup::new(side, current.clone());
            for link in &run[1..] {
                group.push(link.clone());
            }
            seen_devices.extend(run.iter().map(|link| link.input().device()));
            entries.push(LinkEntry::Group(group));
            i += len;
            continue;
        }

        let side = if seen_devices.contains(current.input().device()) {
            Direction::Input
        } else {
            Direction::Output
        };
        seen_devices.insert(current.input().device());

        if let Some(next) = links.get(i + 1) {
            let (ours, theirs) = (current.endpoint(side), next.endpoint(side));
            if ours.device() == theirs.device() {
                let stereo = match channel_of(theirs.name()) {
                    Some(Channel::Left) => Some(StereoLink::new(next.clone(), current.clone())),
                    Some(Channel::Right) => Some(StereoLink::new(current.clone(), next.clone())),
                    None => None,
                };
                if let Some(stereo) = stereo {
                    seen_devices.insert(next.input().device());
                    entries.push(LinkEntry::Stereo(stereo));
                    i += 2;
                    continue;
                }
            }
        }

        trace!(link = %current, "Ungrouped link");
        entries.push(LinkEntry::Single(current.clone()));
        i += 1;
    }

    entries
}

/// Aggregate links by the endpoint on `side`, in discovery order.
#[must_use]
pub fn group_by_endpoint(links: &[Link], side: Direction) -> Vec<LinkGroup> {
    let mut groups: Vec<LinkGroup> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for link in links {
        let endpoint = link.endpoint(side);
        match index.get(&(endpoint.device(), endpoint.name())) {
            Some(&at) => groups[at].push(link.clone()),
            None => {
                index.insert((endpoint.device(), endpoint.name()), groups.len());
                groups.push(LinkGroup::new(side, link.clone()));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::listing::parse_links;
    use crate::port::Port;

    fn link(out: (&str, &str, &str), inp: (&str, &str, &str)) -> Link {
        Link::new(
            None,
            Port::new(inp.0, inp.1, inp.2, Direction::Input),
            Port::new(out.0, out.1, out.2, Direction::Output),
        )
        .unwrap()
    }

    #[test]
    fn test_stereo_pair_by_output_device() {
        let links = [
            link(("1", "firefox", "output_FL"), ("3", "speakers", "playback_FL")),
            link(("2", "firefox", "output_FR"), ("4", "speakers", "playback_FR")),
        ];

        let entries = group_links(&links);

        assert_eq!(entries.len(), 1);
        let LinkEntry::Stereo(stereo) = &entries[0] else { panic!("expected stereo link") };
        assert_eq!(stereo.left().output().name(), "output_FL");
        assert_eq!(stereo.right().output().name(), "output_FR");
    }

    #[test]
    fn test_stereo_pair_reversed_listing_order() {
        let links = [
            link(("2", "firefox", "output_FR"), ("4", "speakers", "playback_FR")),
            link(("1", "firefox", "output_FL"), ("3", "speakers", "playback_FL")),
        ];

        let entries = group_links(&links);

        let LinkEntry::Stereo(stereo) = &entries[0] else { panic!("expected stereo link") };
        assert_eq!(stereo.left().input().name(), "playback_FL");
        assert_eq!(stereo.right().input().name(), "playback_FR");
    }

    #[test]
    fn test_fan_out_becomes_link_group() {
        let links = [
            link(("1", "firefox", "output_FL"), ("3", "speakers", "playback_FL")),
            link(("1", "firefox", "output_FL"), ("5", "recorder", "input_FL")),
            link(("1", "firefox", "output_FL"), ("7", "monitor", "input_FL")),
        ];

        let entries = group_links(&links);

        assert_eq!(entries.len(), 1);
        let LinkEntry::Group(group) = &entries[0] else { panic!("expected link group") };
        assert_eq!(group.common_device(), "firefox");
        assert_eq!(group.common_name(), "output_FL");
        assert_eq!(group.side(), Direction::Output);
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn test_fan_in_groups_by_input() {
        let links = [
            link(("1", "firefox", "output_FL"), ("3", "speakers", "playback_FL")),
            link(("8", "mpv", "output_FL"), ("3", "speakers", "playback_FL")),
        ];

        let entries = group_links(&links);

        assert_matches!(
            &entries[..],
            [LinkEntry::Group(group)] if group.side() == Direction::Input
        );
    }

    #[test]
    fn test_unrelated_links_stay_single() {
        let links = [
            link(("1", "firefox", "output_FL"), ("3", "speakers", "playback_FL")),
            link(("9", "mic", "capture_MONO"), ("11", "recorder", "input_MONO")),
        ];

        let entries = group_links(&links);

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| matches!(e, LinkEntry::Single(_))));
    }

    #[test]
    fn test_group_listing_with_both_sections() {
        let raw = "\
  66 firefox:output_FL
 102   |->   83 speakers:playback_FL
  67 firefox:output_FR
 103   |->   84 speakers:playback_FR
  83 speakers:playback_FL
 102   |<-   66 firefox:output_FL
  84 speakers:playback_FR
 103   |<-   67 firefox:output_FR
";
        let entries = group_links(&parse_links(raw));

        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| matches!(e, LinkEntry::Stereo(_))));
        let total: usize = entries.iter().map(|e| e.links().len()).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_group_by_endpoint_keeps_discovery_order() {
        let links = [
            link(("1", "firefox", "output_FL"), ("3", "speakers", "playback_FL")),
            link(("2", "firefox", "output_FR"), ("4", "speakers", "playback_FR")),
            link(("8", "mpv", "output_FL"), ("3", "speakers", "playback_FL")),
        ];

        let groups = group_by_endpoint(&links, Direction::Input);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].common_name(), "playback_FL");
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0].links()[1].output().device(), "mpv");
        assert_eq!(groups[1].common_name(), "playback_FR");
    }

    #[test]
    fn test_empty_links() {
        assert!(group_links(&[]).is_empty());
        assert!(group_by_endpoint(&[], Direction::Output).is_empty());
    }
}
