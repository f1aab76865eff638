use crate::config::LayoutType;
use crate::ir::{Bounds, Edge, Node};
use crate::layout::LayoutOutcome;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub layout: LayoutType,
    pub error: Option<String>,
    pub overlaps_before: usize,
    pub overlaps_after: usize,
    pub disconnected: usize,
    pub bounds: Option<Bounds>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub moved: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    /// Straight-line length; absent when an endpoint is missing.
    pub length: Option<f32>,
}

impl LayoutDump {
    pub fn from_outcome(outcome: &LayoutOutcome, input: &[Node], edges: &[Edge]) -> Self {
        let nodes = outcome
            .nodes
            .iter()
            .zip(input)
            .map(|(node, before)| NodeDump {
                id: node.id.clone(),
                x: node.position.x,
                y: node.position.y,
                moved: node.position != before.position,
            })
            .collect();

        let positions: HashMap<&str, _> = outcome
            .nodes
            .iter()
            .map(|node| (node.id.as_str(), node.position))
            .collect();
        let edges = edges
            .iter()
            .map(|edge| EdgeDump {
                from: edge.source.clone(),
                to: edge.target.clone(),
                length: positions
                    .get(edge.source.as_str())
                    .zip(positions.get(edge.target.as_str()))
                    .map(|(a, b)| a.distance(*b)),
            })
            .collect();

        LayoutDump {
            layout: outcome.layout,
            error: outcome.error.as_ref().map(ToString::to_string),
            overlaps_before: outcome.overlaps_before,
            overlaps_after: outcome.overlaps_after,
            disconnected: outcome.disconnected,
            bounds: Bounds::enclosing(outcome.nodes.iter().map(|node| node.position)),
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    outcome: &LayoutOutcome,
    input: &[Node],
    edges: &[Edge],
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_outcome(outcome, input, edges);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
