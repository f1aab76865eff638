use serde::Serialize;

use crate::analysis::GraphProfile;
use crate::config::LayoutType;
use crate::ir::{Edge, Node};

const DEPTH_THRESHOLD: usize = 3;
const CAUSE_EFFECT_THRESHOLD: usize = 5;
const TEMPORAL_THRESHOLD: usize = 3;
const PROCESS_THRESHOLD: usize = 4;
const ORG_THRESHOLD: usize = 3;
const PART_WHOLE_THRESHOLD: usize = 3;
const DENSE_EDGE_RATIO: f32 = 1.5;
const DENSE_MIN_NODES: usize = 8;
const DEFAULT_MIN_NODES: usize = 5;

const FISHBONE_MIN_CAUSE_EFFECT: usize = 2;
const ORG_CHART_MIN_ORG: usize = 1;

/// Which measurement produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionTrigger {
    Depth,
    CauseEffect,
    Temporal,
    Process,
    Organization,
    PartWhole,
    Density,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSuggestion {
    pub layout: LayoutType,
    pub reason: String,
    pub confidence: f32,
    pub trigger: SuggestionTrigger,
}

impl LayoutSuggestion {
    fn new(
        layout: LayoutType,
        trigger: SuggestionTrigger,
        confidence: f32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            layout,
            reason: reason.into(),
            confidence,
            trigger,
        }
    }
}

/// Layouts that fit the graph's shape, most confident first. Equal
/// confidences keep rule order.
pub fn suggest_layout(nodes: &[Node], edges: &[Edge]) -> Vec<LayoutSuggestion> {
    let profile = GraphProfile::analyze(nodes, edges);
    let mut suggestions = suggestions_for(&profile);
    suggestions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    tracing::debug!(
        nodes = profile.node_count,
        suggestions = suggestions.len(),
        "layout suggestions ranked"
    );
    suggestions
}

fn suggestions_for(profile: &GraphProfile) -> Vec<LayoutSuggestion> {
    use SuggestionTrigger as T;

    let mut out = Vec::new();
    if profile.depth > DEPTH_THRESHOLD {
        out.push(LayoutSuggestion::new(
            LayoutType::Hierarchical,
            T::Depth,
            0.75,
            format!("Deep hierarchy detected ({} levels)", profile.depth),
        ));
    }
    if profile.cause_effect > CAUSE_EFFECT_THRESHOLD {
        out.push(LayoutSuggestion::new(
            LayoutType::Fishbone,
            T::CauseEffect,
            0.85,
            format!(
                "Cause and effect relationships detected ({} links)",
                profile.cause_effect
            ),
        ));
    }
    if profile.temporal > TEMPORAL_THRESHOLD {
        out.push(LayoutSuggestion::new(
            LayoutType::Timeline,
            T::Temporal,
            0.9,
            format!("Time-based content detected ({} nodes)", profile.temporal),
        ));
    }
    if profile.process > PROCESS_THRESHOLD {
        out.push(LayoutSuggestion::new(
            LayoutType::Flowchart,
            T::Process,
            0.8,
            format!("Process flow detected ({} steps)", profile.process),
        ));
    }
    if profile.organization > ORG_THRESHOLD {
        out.push(LayoutSuggestion::new(
            LayoutType::OrgChart,
            T::Organization,
            0.85,
            format!(
                "Organizational structure detected ({} people)",
                profile.organization
            ),
        ));
    }
    if profile.part_whole > PART_WHOLE_THRESHOLD {
        out.push(LayoutSuggestion::new(
            LayoutType::Brace,
            T::PartWhole,
            0.7,
            format!("Part-whole relationships detected ({} parts)", profile.part_whole),
        ));
    }
    if profile.node_count > DENSE_MIN_NODES && profile.edge_density() > DENSE_EDGE_RATIO {
        out.push(LayoutSuggestion::new(
            LayoutType::ForceDirected,
            T::Density,
            0.65,
            format!(
                "Densely connected graph ({} edges across {} nodes)",
                profile.edge_count, profile.node_count
            ),
        ));
    }
    if out.is_empty() && profile.node_count > DEFAULT_MIN_NODES {
        out.push(LayoutSuggestion::new(
            LayoutType::Radial,
            T::Default,
            0.5,
            "General purpose layout for interconnected ideas",
        ));
    }
    out
}

/// Cheap applicability check; layouts without a precondition always pass.
pub fn validate_layout(nodes: &[Node], edges: &[Edge], layout: LayoutType) -> bool {
    let profile = GraphProfile::analyze(nodes, edges);
    match layout {
        LayoutType::Timeline => profile.temporal > 0,
        LayoutType::Fishbone => profile.cause_effect > FISHBONE_MIN_CAUSE_EFFECT,
        LayoutType::OrgChart => profile.organization > ORG_CHART_MIN_ORG,
        _ => true,
    }
}
