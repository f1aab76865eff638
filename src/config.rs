use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ir::{Bounds, Size};

/// Largest node dimension, padding or spacing the engine works with.
pub(crate) const MAX_DIMENSION: f32 = 100_000.0;

/// Every placement strategy the engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayoutType {
    #[default]
    Radial,
    TreeHorizontal,
    TreeVertical,
    OrgChart,
    Flowchart,
    Hierarchical,
    Organic,
    Spiral,
    ForceDirected,
    Hexagonal,
    Fractal,
    Galaxy,
    Neural,
    Molecular,
    Timeline,
    Fishbone,
    Brace,
    Freeform,
}

/// How a strategy picks the node it grows the layout from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootRule {
    /// Parentless node, preferring one without incoming edges.
    Hierarchy,
    /// Highest edge degree.
    Connectivity,
}

impl LayoutType {
    pub const ALL: [LayoutType; 18] = [
        LayoutType::Radial,
        LayoutType::TreeHorizontal,
        LayoutType::TreeVertical,
        LayoutType::OrgChart,
        LayoutType::Flowchart,
        LayoutType::Hierarchical,
        LayoutType::Organic,
        LayoutType::Spiral,
        LayoutType::ForceDirected,
        LayoutType::Hexagonal,
        LayoutType::Fractal,
        LayoutType::Galaxy,
        LayoutType::Neural,
        LayoutType::Molecular,
        LayoutType::Timeline,
        LayoutType::Fishbone,
        LayoutType::Brace,
        LayoutType::Freeform,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutType::Radial => "radial",
            LayoutType::TreeHorizontal => "tree-horizontal",
            LayoutType::TreeVertical => "tree-vertical",
            LayoutType::OrgChart => "org-chart",
            LayoutType::Flowchart => "flowchart",
            LayoutType::Hierarchical => "hierarchical",
            LayoutType::Organic => "organic",
            LayoutType::Spiral => "spiral",
            LayoutType::ForceDirected => "force-directed",
            LayoutType::Hexagonal => "hexagonal",
            LayoutType::Fractal => "fractal",
            LayoutType::Galaxy => "galaxy",
            LayoutType::Neural => "neural",
            LayoutType::Molecular => "molecular",
            LayoutType::Timeline => "timeline",
            LayoutType::Fishbone => "fishbone",
            LayoutType::Brace => "brace",
            LayoutType::Freeform => "freeform",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        LayoutType::ALL
            .into_iter()
            .find(|layout| layout.as_str().eq_ignore_ascii_case(token))
    }

    /// Lenient parse: unknown identifiers fall back to [`LayoutType::Radial`].
    pub fn resolve(token: &str) -> Self {
        match Self::from_token(token) {
            Some(layout) => layout,
            None => {
                tracing::warn!(layout = token, "unknown layout type, falling back to radial");
                LayoutType::Radial
            }
        }
    }

    /// Hierarchy strategies grow from a parentless node along edge
    /// direction. Connectivity strategies grow from the best-connected node
    /// and walk edges both ways, so their disconnected cluster holds only
    /// nodes with no path at all to the root, not every node unreachable
    /// along outgoing edges.
    pub fn root_rule(self) -> RootRule {
        match self {
            LayoutType::TreeHorizontal
            | LayoutType::TreeVertical
            | LayoutType::OrgChart
            | LayoutType::Flowchart
            | LayoutType::Hierarchical
            | LayoutType::Timeline
            | LayoutType::Fishbone
            | LayoutType::Brace => RootRule::Hierarchy,
            _ => RootRule::Connectivity,
        }
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout type `{0}`")]
pub struct UnknownLayout(pub String);

impl FromStr for LayoutType {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| UnknownLayout(s.to_string()))
    }
}

impl From<String> for LayoutType {
    fn from(value: String) -> Self {
        LayoutType::resolve(&value)
    }
}

impl From<LayoutType> for String {
    fn from(value: LayoutType) -> Self {
        value.as_str().to_string()
    }
}

/// Iteration budgets and strengths of the relaxation passes. Empirical
/// defaults, not convergence guarantees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelaxationConfig {
    pub overlap_iterations: usize,
    pub overlap_damping: f32,
    pub force_iterations: usize,
    pub force_damping: f32,
    pub repulsion: f32,
    pub attraction: f32,
    pub safe_position_attempts: usize,
    pub spiral_angle_step: f32,
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            overlap_iterations: 100,
            overlap_damping: 0.5,
            force_iterations: 120,
            force_damping: 0.85,
            repulsion: 1.0,
            attraction: 0.02,
            safe_position_attempts: 60,
            spiral_angle_step: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    #[serde(rename = "type")]
    pub layout: LayoutType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f32>,
    pub node_size: Size,
    pub padding: f32,
    pub animation: bool,
    pub auto_fit: bool,
    pub bounds: Bounds,
    pub seed: u64,
    pub relaxation: RelaxationConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layout: LayoutType::Radial,
            spacing: None,
            node_size: Size::default(),
            padding: 40.0,
            animation: true,
            auto_fit: true,
            bounds: Bounds::default(),
            seed: 0x5eed_1a70,
            relaxation: RelaxationConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn for_layout(layout: LayoutType) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SizeFile {
    width: Option<f32>,
    height: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct BoundsFile {
    min_x: Option<f32>,
    min_y: Option<f32>,
    max_x: Option<f32>,
    max_y: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RelaxationFile {
    overlap_iterations: Option<usize>,
    overlap_damping: Option<f32>,
    force_iterations: Option<usize>,
    force_damping: Option<f32>,
    repulsion: Option<f32>,
    attraction: Option<f32>,
    safe_position_attempts: Option<usize>,
    spiral_angle_step: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(rename = "type")]
    layout: Option<String>,
    spacing: Option<f32>,
    node_size: Option<SizeFile>,
    padding: Option<f32>,
    animation: Option<bool>,
    auto_fit: Option<bool>,
    bounds: Option<BoundsFile>,
    seed: Option<u64>,
    relaxation: Option<RelaxationFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Apply a JSON/JSON5 document of optional overrides on top of the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<LayoutConfig> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(_) => json5::from_str(contents)?,
    };
    let mut config = LayoutConfig::default();

    if let Some(v) = parsed.layout.as_deref() {
        config.layout = LayoutType::resolve(v);
    }
    if let Some(v) = parsed.spacing {
        anyhow::ensure!(v > 0.0 && v.is_finite(), "spacing must be positive, got {v}");
        config.spacing = Some(v.min(MAX_DIMENSION));
    }
    if let Some(size) = parsed.node_size {
        if let Some(v) = size.width {
            config.node_size.width = v.max(1.0).min(MAX_DIMENSION);
        }
        if let Some(v) = size.height {
            config.node_size.height = v.max(1.0).min(MAX_DIMENSION);
        }
    }
    if let Some(v) = parsed.padding {
        config.padding = v.max(0.0).min(MAX_DIMENSION);
    }
    if let Some(v) = parsed.animation {
        config.animation = v;
    }
    if let Some(v) = parsed.auto_fit {
        config.auto_fit = v;
    }
    if let Some(bounds) = parsed.bounds {
        if let Some(v) = bounds.min_x {
            config.bounds.min_x = v;
        }
        if let Some(v) = bounds.min_y {
            config.bounds.min_y = v;
        }
        if let Some(v) = bounds.max_x {
            config.bounds.max_x = v;
        }
        if let Some(v) = bounds.max_y {
            config.bounds.max_y = v;
        }
        let b = &config.bounds;
        anyhow::ensure!(
            [b.min_x, b.min_y, b.max_x, b.max_y].iter().all(|v| v.is_finite()),
            "canvas bounds must be finite"
        );
        anyhow::ensure!(
            b.max_x > b.min_x && b.max_y > b.min_y,
            "canvas bounds are empty"
        );
    }
    if let Some(v) = parsed.seed {
        config.seed = v;
    }
    if let Some(relax) = parsed.relaxation {
        let target = &mut config.relaxation;
        if let Some(v) = relax.overlap_iterations {
            target.overlap_iterations = v;
        }
        if let Some(v) = relax.overlap_damping {
            target.overlap_damping = v.clamp(0.01, 1.0);
        }
        if let Some(v) = relax.force_iterations {
            target.force_iterations = v;
        }
        if let Some(v) = relax.force_damping {
            target.force_damping = v.clamp(0.01, 1.0);
        }
        if let Some(v) = relax.repulsion {
            target.repulsion = v.max(0.0);
        }
        if let Some(v) = relax.attraction {
            target.attraction = v.max(0.0);
        }
        if let Some(v) = relax.safe_position_attempts {
            target.safe_position_attempts = v;
        }
        if let Some(v) = relax.spiral_angle_step {
            target.spiral_angle_step = v;
        }
    }

    Ok(config)
}
