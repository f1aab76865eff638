use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use crate::ir::{Edge, Node};
use crate::layout::GraphLinks;

static TEMPORAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)date|time|when").unwrap());
static PROCESS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)step|process|action").unwrap());
static ORG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)manager|director|ceo|employee").unwrap());
static PART_WHOLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)part|component|element").unwrap());

/// A shape a node can suggest about the diagram it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Temporal,
    Process,
    Organization,
    PartWhole,
    Cause,
    Effect,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::Temporal,
        Facet::Process,
        Facet::Organization,
        Facet::PartWhole,
        Facet::Cause,
        Facet::Effect,
    ];

    pub fn matches(self, node: &Node) -> bool {
        let data = &node.data;
        let label = data.label.as_str();
        match self {
            Facet::Temporal => !data.temporal.is_empty() || TEMPORAL_RE.is_match(label),
            Facet::Process => data.category_is("process") || PROCESS_RE.is_match(label),
            Facet::Organization => !data.org.is_empty() || ORG_RE.is_match(label),
            Facet::PartWhole => !data.part_whole.is_empty() || PART_WHOLE_RE.is_match(label),
            Facet::Cause => data.category_is("cause"),
            Facet::Effect => data.category_is("effect"),
        }
    }
}

pub fn facets_of(node: &Node) -> impl Iterator<Item = Facet> + '_ {
    Facet::ALL.into_iter().filter(move |facet| facet.matches(node))
}

pub fn is_temporal(node: &Node) -> bool {
    Facet::Temporal.matches(node)
}

pub fn count_facet(nodes: &[Node], facet: Facet) -> usize {
    nodes.iter().filter(|node| facet.matches(node)).count()
}

/// Longest downward path from any parentless node, in edges. Parent links
/// come from edge direction and `parentId`. A link back into the path being
/// walked closes a cycle and is not followed, so cyclic graphs still give a
/// finite depth.
pub fn hierarchy_depth(nodes: &[Node], edges: &[Edge]) -> usize {
    let links = GraphLinks::build(nodes, edges, false);
    // longest path below each finished node
    let mut height: Vec<Option<usize>> = vec![None; nodes.len()];
    let mut on_path = vec![false; nodes.len()];
    let mut deepest = 0;
    for root in (0..nodes.len()).filter(|&idx| nodes[idx].data.parent_id.is_none()) {
        if height[root].is_none() {
            on_path[root] = true;
            let mut stack = vec![(root, 0usize)];
            while let Some(frame) = stack.last_mut() {
                let (idx, cursor) = *frame;
                if let Some(&child) = links.children[idx].get(cursor) {
                    frame.1 += 1;
                    if height[child].is_none() && !on_path[child] {
                        on_path[child] = true;
                        stack.push((child, 0));
                    }
                    continue;
                }
                stack.pop();
                on_path[idx] = false;
                height[idx] = Some(
                    links.children[idx]
                        .iter()
                        .filter_map(|&child| height[child])
                        .map(|h| h + 1)
                        .max()
                        .unwrap_or(0),
                );
            }
        }
        deepest = deepest.max(height[root].unwrap_or(0));
    }
    deepest
}

/// Edges touching a node tagged `cause` or `effect`.
pub fn cause_effect_count(nodes: &[Node], edges: &[Edge]) -> usize {
    let tagged: HashSet<&str> = nodes
        .iter()
        .filter(|node| Facet::Cause.matches(node) || Facet::Effect.matches(node))
        .map(|node| node.id.as_str())
        .collect();
    edges
        .iter()
        .filter(|edge| {
            tagged.contains(edge.source.as_str()) || tagged.contains(edge.target.as_str())
        })
        .count()
}

/// Every heuristic measured once over a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphProfile {
    pub node_count: usize,
    pub edge_count: usize,
    pub depth: usize,
    pub cause_effect: usize,
    pub temporal: usize,
    pub process: usize,
    pub organization: usize,
    pub part_whole: usize,
}

impl GraphProfile {
    pub fn analyze(nodes: &[Node], edges: &[Edge]) -> Self {
        Self {
            node_count: nodes.len(),
            edge_count: edges.len(),
            depth: hierarchy_depth(nodes, edges),
            cause_effect: cause_effect_count(nodes, edges),
            temporal: count_facet(nodes, Facet::Temporal),
            process: count_facet(nodes, Facet::Process),
            organization: count_facet(nodes, Facet::Organization),
            part_whole: count_facet(nodes, Facet::PartWhole),
        }
    }

    /// Edges per node.
    pub fn edge_density(&self) -> f32 {
        if self.node_count == 0 {
            0.0
        } else {
            self.edge_count as f32 / self.node_count as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{OrgHints, TemporalHints};

    #[test]
    fn temporal_from_hints_or_label() {
        let mut hinted = Node::new("a", "Kickoff");
        hinted.data.temporal = TemporalHints {
            milestone: Some(true),
            ..TemporalHints::default()
        };
        assert!(is_temporal(&hinted));
        assert!(is_temporal(&Node::new("b", "Due DATE")));
        assert!(is_temporal(&Node::new("c", "When do we ship?")));
        assert!(!is_temporal(&Node::new("d", "Budget")));
    }

    #[test]
    fn label_keywords_match_as_substrings() {
        // "department" contains "part"
        let node = Node::new("x", "Department");
        let facets: Vec<Facet> = facets_of(&node).collect();
        assert_eq!(facets, vec![Facet::PartWhole]);

        let mut boss = Node::new("y", "Alice");
        boss.data.org = OrgHints {
            role: Some("lead".into()),
            ..OrgHints::default()
        };
        assert!(Facet::Organization.matches(&boss));
        assert!(Facet::Process.matches(&Node::new("z", "Review").with_category("Process")));
    }

    #[test]
    fn depth_follows_edges_and_parent_links() {
        let nodes = vec![
            Node::new("a", "A"),
            Node::new("b", "B"),
            Node::new("c", "C").with_parent("b"),
            Node::new("d", "D"),
        ];
        let edges = vec![Edge::new("a", "b"), Edge::new("c", "d")];
        // b has no parentId, so it is a root too; a -> b -> c -> d is deepest
        assert_eq!(hierarchy_depth(&nodes, &edges), 3);
        assert_eq!(hierarchy_depth(&nodes, &[]), 1);
        assert_eq!(hierarchy_depth(&[], &[]), 0);
    }

    #[test]
    fn depth_counts_the_longest_path_not_the_shortest() {
        let nodes: Vec<Node> = ["a", "b", "c", "d"].iter().map(|id| Node::new(*id, *id)).collect();
        // the shortcut a -> d must not hide the three-edge path
        let edges = vec![
            Edge::new("a", "b"),
            Edge::new("b", "c"),
            Edge::new("c", "d"),
            Edge::new("a", "d"),
        ];
        assert_eq!(hierarchy_depth(&nodes, &edges), 3);
    }

    #[test]
    fn depth_handles_very_long_chains() {
        let nodes: Vec<Node> = (0..5000).map(|i| Node::new(format!("n{i}"), "Step")).collect();
        let edges: Vec<Edge> = (1..5000)
            .map(|i| Edge::new(format!("n{}", i - 1), format!("n{i}")))
            .collect();
        assert_eq!(hierarchy_depth(&nodes, &edges), 4999);
    }

    #[test]
    fn depth_terminates_on_cycles() {
        let nodes = vec![Node::new("a", "A"), Node::new("b", "B")];
        let edges = vec![Edge::new("a", "b"), Edge::new("b", "a")];
        assert_eq!(hierarchy_depth(&nodes, &edges), 1);
    }

    #[test]
    fn cause_effect_counts_edges_touching_tagged_nodes() {
        let nodes = vec![
            Node::new("p", "Problem").with_category("effect"),
            Node::new("c1", "Cause one").with_category("Cause"),
            Node::new("x", "Other"),
            Node::new("y", "Other"),
        ];
        let edges = vec![
            Edge::new("c1", "p"),
            Edge::new("x", "p"),
            Edge::new("x", "y"),
        ];
        assert_eq!(cause_effect_count(&nodes, &edges), 2);
    }

    #[test]
    fn profile_gathers_every_measure() {
        let nodes = vec![
            Node::new("ceo", "CEO"),
            Node::new("m", "Manager").with_parent("ceo"),
            Node::new("s1", "Step 1").with_parent("m"),
        ];
        let profile = GraphProfile::analyze(&nodes, &[]);
        assert_eq!(profile.node_count, 3);
        assert_eq!(profile.depth, 2);
        assert_eq!(profile.organization, 2);
        assert_eq!(profile.process, 1);
        assert_eq!(profile.edge_density(), 0.0);
    }
}
