use serde::Serialize;

use crate::config::LayoutType;
use crate::error::LayoutError;
use crate::ir::Node;

/// Result of one layout pass together with what happened during it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutcome {
    pub nodes: Vec<Node>,
    pub layout: LayoutType,
    /// Set when the strategy failed and `nodes` are the untouched input.
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "error_message")]
    pub error: Option<LayoutError>,
    pub overlaps_before: usize,
    pub overlaps_after: usize,
    /// Nodes placed in the side cluster because the root cannot reach them.
    pub disconnected: usize,
}

impl LayoutOutcome {
    pub(crate) fn unchanged(nodes: &[Node], layout: LayoutType) -> Self {
        Self {
            nodes: nodes.to_vec(),
            layout,
            error: None,
            overlaps_before: 0,
            overlaps_after: 0,
            disconnected: 0,
        }
    }

    pub fn is_soft_failure(&self) -> bool {
        self.error.is_some()
    }
}

fn error_message<S: serde::Serializer>(
    error: &Option<LayoutError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.serialize_str(&err.to_string()),
        None => serializer.serialize_none(),
    }
}
