use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point at `radius` from `self` in direction `angle` (radians).
    pub fn polar(self, radius: f32, angle: f32) -> Point {
        Point::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Default for Size {
    fn default() -> Self {
        Self {
            width: 150.0,
            height: 50.0,
        }
    }
}

/// Axis-aligned rectangle in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min_x: -5000.0,
            min_y: -5000.0,
            max_x: 5000.0,
            max_y: 5000.0,
        }
    }
}

impl Bounds {
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.max(self.min_x).min(self.max_x.max(self.min_x)),
            point.y.max(self.min_y).min(self.max_y.max(self.min_y)),
        )
    }

    /// Shrunk by `margin` on every side, at most a quarter of each dimension.
    pub fn inset(&self, margin: f32) -> Bounds {
        let mx = margin.min(self.width() / 4.0).max(0.0);
        let my = margin.min(self.height() / 4.0).max(0.0);
        Bounds {
            min_x: self.min_x + mx,
            min_y: self.min_y + my,
            max_x: self.max_x - mx,
            max_y: self.max_y - my,
        }
    }

    /// Smallest rectangle enclosing every point, `None` when empty.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Bounds> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in iter {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub milestone: Option<bool>,
}

impl TemporalHints {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none() && self.duration.is_none() && self.milestone.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports_to: Option<String>,
}

impl OrgHints {
    pub fn is_empty(&self) -> bool {
        self.role.is_none() && self.department.is_none() && self.reports_to.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartWholeHints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl PartWholeHints {
    pub fn is_empty(&self) -> bool {
        self.part_of.is_none() && self.group.is_none()
    }
}

/// Domain attributes of a node. Only `position` of the owning [`Node`] is
/// ever rewritten by the engine; everything here round-trips untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub temporal: TemporalHints,
    #[serde(flatten)]
    pub org: OrgHints,
    #[serde(flatten)]
    pub part_whole: PartWholeHints,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl NodeData {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn category_is(&self, name: &str) -> bool {
        self.category
            .as_deref()
            .map(|c| c.trim().eq_ignore_ascii_case(name))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: Point::default(),
            data: NodeData::labeled(label),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.data.parent_id = Some(parent.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.data.category = Some(category.into());
        self
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.position = Point::new(x, y);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{source}->{target}"),
            source,
            target,
        }
    }
}

/// Node/edge graph as exchanged with hosts (CLI input, wasm bridge).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    pub fn parse(input: &str) -> anyhow::Result<Self> {
        match serde_json::from_str(input) {
            Ok(doc) => Ok(doc),
            Err(_) => Ok(json5::from_str(input)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_data_round_trips_hints_and_unknown_fields() {
        let raw = r##"{
            "id": "n1",
            "position": {"x": 10, "y": 20},
            "data": {
                "label": "Kickoff",
                "parentId": "root",
                "date": "2024-01-01",
                "reportsTo": "ceo",
                "partOf": "engine",
                "color": "#ff0000"
            }
        }"##;
        let node: Node = serde_json::from_str(raw).unwrap();
        assert_eq!(node.data.parent_id.as_deref(), Some("root"));
        assert_eq!(node.data.temporal.date.as_deref(), Some("2024-01-01"));
        assert_eq!(node.data.org.reports_to.as_deref(), Some("ceo"));
        assert_eq!(node.data.part_whole.part_of.as_deref(), Some("engine"));
        assert_eq!(
            node.data.extra.get("color"),
            Some(&serde_json::Value::String("#ff0000".to_string()))
        );

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["data"]["reportsTo"], "ceo");
        assert_eq!(back["data"]["color"], "#ff0000");
        assert!(back["data"].get("time").is_none());
    }

    #[test]
    fn graph_document_accepts_json5() {
        let doc = GraphDocument::parse(
            "{nodes: [{id: 'a'}, {id: 'b'}], edges: [{source: 'a', target: 'b'},],}",
        )
        .unwrap();
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.edges[0].target, "b");
    }

    #[test]
    fn bounds_clamp_and_enclose() {
        let bounds = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 50.0,
        };
        assert_eq!(bounds.clamp(Point::new(-5.0, 70.0)), Point::new(0.0, 50.0));
        assert_eq!(bounds.center(), Point::new(50.0, 25.0));
        let enclosing =
            Bounds::enclosing([Point::new(1.0, 2.0), Point::new(-3.0, 8.0)]).unwrap();
        assert_eq!(enclosing.min_x, -3.0);
        assert_eq!(enclosing.max_y, 8.0);
        assert!(Bounds::enclosing(std::iter::empty()).is_none());
    }
}
