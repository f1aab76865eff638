mod collision;
mod fishbone;
mod flowchart;
mod force;
mod grid;
mod radial;
mod rings;
mod sector;
mod timeline;
mod tree;
pub(crate) mod types;
pub use collision::{
    check_collision, count_overlaps, find_safe_position, min_node_distance, resolve_overlaps,
};
pub use types::*;
use fishbone::*;
use flowchart::*;
use force::*;
use grid::*;
use radial::*;
use rings::*;
use sector::*;
use timeline::*;
use tree::*;

use crate::config::{LayoutConfig, LayoutType, MAX_DIMENSION, RootRule};
use crate::error::{LayoutError, Result};
use crate::ir::{Bounds, Edge, Node, Point, Size};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{HashMap, VecDeque};
use std::f32::consts::{PI, TAU};

const BASE_SPACING: f32 = 200.0;
const DENSITY_REFERENCE: f32 = 20.0;
const DENSITY_MIN: f32 = 0.35;
const CLUSTER_GAP_FACTOR: f32 = 2.0;
const FRAME_MARGIN: f32 = 0.5;
const MAX_LANES: usize = 8;
const LANE_SLACK: f32 = 1.1;
const FAN_DEPTH_GROWTH: f32 = 0.25;
const FAN_MAX_GROWTH: f32 = 2.0;
const FAN_MIN_SPREAD: f32 = PI / 6.0;

/// Scale multiplier that shrinks spacing as graphs grow; 1.0 up to 20 nodes,
/// never below 0.35.
pub fn density_factor(node_count: usize) -> f32 {
    (DENSITY_REFERENCE / node_count.max(1) as f32)
        .sqrt()
        .clamp(DENSITY_MIN, 1.0)
}

/// Configured node box, with unusable dimensions replaced by the default.
pub(crate) fn node_extent(config: &LayoutConfig) -> Size {
    let fallback = Size::default();
    let pick = |value: f32, default: f32| {
        if value.is_finite() && value > 0.0 {
            value.min(MAX_DIMENSION)
        } else {
            default
        }
    };
    Size {
        width: pick(config.node_size.width, fallback.width),
        height: pick(config.node_size.height, fallback.height),
    }
}

/// Working distances shared by every strategy of one pass.
#[derive(Debug, Clone)]
pub(crate) struct Metrics {
    pub spacing: f32,
    pub min_distance: f32,
    pub density: f32,
    pub node_width: f32,
    pub node_height: f32,
    pub center: Point,
    pub bounds: Bounds,
    /// Canvas bounds pulled in by half a minimum distance; grid-like
    /// strategies fit their arrangement inside it.
    pub frame: Bounds,
}

impl Metrics {
    fn new(node_count: usize, config: &LayoutConfig) -> Self {
        let min_distance = min_node_distance(node_count, config);
        let density = density_factor(node_count);
        let base = config
            .spacing
            .filter(|s| s.is_finite())
            .unwrap_or(BASE_SPACING)
            .clamp(1.0, MAX_DIMENSION);
        let spacing = (base * density).max(min_distance);
        let node = node_extent(config);
        Self {
            spacing,
            min_distance,
            density,
            node_width: node.width,
            node_height: node.height,
            center: config.bounds.center(),
            bounds: config.bounds,
            frame: config.bounds.inset(min_distance * FRAME_MARGIN),
        }
    }

    /// Node width shrunk with the graph's density.
    pub fn slot_width(&self) -> f32 {
        self.node_width * self.density
    }

    pub fn slot_height(&self) -> f32 {
        self.node_height * self.density
    }
}

/// Factor that squeezes `extent` into `room`; 1.0 when it already fits.
pub(crate) fn squeeze(extent: f32, room: f32) -> f32 {
    if extent > room && extent > 0.0 && room > 0.0 {
        room / extent
    } else {
        1.0
    }
}

/// Distance between neighbouring lanes, a little over the minimum distance.
pub(crate) fn lane_gap(min_distance: f32) -> f32 {
    min_distance * LANE_SLACK
}

/// Number of lanes neighbours `pitch` apart need, once squeezed by `scale`,
/// to stay clear of each other when consecutive neighbours alternate lanes.
pub(crate) fn lane_count(pitch: f32, scale: f32, min_distance: f32) -> usize {
    let squeezed = pitch * scale;
    let needed = lane_gap(min_distance);
    if !squeezed.is_finite() || squeezed <= 0.0 || squeezed >= needed {
        return 1;
    }
    ((needed / squeezed).ceil() as usize).clamp(1, MAX_LANES)
}

/// Maps offsets measured from an anchor onto `[min, max]`: unchanged when
/// the span fits, slid inwards when it only hangs over one side, squeezed
/// uniformly when it is wider than the range.
#[derive(Debug, Clone, Copy)]
struct AxisFit {
    start: f32,
    low: f32,
    scale: f32,
}

impl AxisFit {
    fn new(low: f32, high: f32, anchor: f32, min: f32, max: f32) -> Self {
        let extent = (high - low).max(0.0);
        let room = (max - min).max(0.0);
        let scale = squeeze(extent, room);
        let start = if scale < 1.0 {
            min
        } else {
            (anchor + low).max(min).min(max - extent)
        };
        Self { start, low, scale }
    }

    fn map(&self, offset: f32) -> f32 {
        self.start + (offset - self.low) * self.scale
    }
}

/// Place `cells`, given as offsets from `anchor`, so the whole arrangement
/// lands inside the frame instead of being clamped node by node.
pub(crate) fn place_fitted(
    ctx: &LayoutContext,
    placement: &mut Placement,
    anchor: Point,
    cells: &[(usize, Point)],
) {
    let Some(extent) = Bounds::enclosing(cells.iter().map(|&(_, offset)| offset)) else {
        return;
    };
    let frame = &ctx.metrics.frame;
    let fit_x = AxisFit::new(extent.min_x, extent.max_x, anchor.x, frame.min_x, frame.max_x);
    let fit_y = AxisFit::new(extent.min_y, extent.max_y, anchor.y, frame.min_y, frame.max_y);
    for &(idx, offset) in cells {
        placement.set(idx, Point::new(fit_x.map(offset.x), fit_y.map(offset.y)));
    }
}

/// Largest radius around the centre that stays inside the frame.
pub(crate) fn frame_radius(m: &Metrics) -> f32 {
    let f = &m.frame;
    (m.center.x - f.min_x)
        .min(f.max_x - m.center.x)
        .min(m.center.y - f.min_y)
        .min(f.max_y - m.center.y)
        .max(0.0)
}

/// Breadth-first spanning tree grown from the root over parent -> child links.
#[derive(Debug, Clone)]
pub(crate) struct SpanningTree {
    pub order: Vec<usize>,
    pub children: Vec<Vec<usize>>,
    pub depth: Vec<Option<usize>>,
    /// Nodes in each subtree, the node itself included.
    pub subtree_size: Vec<usize>,
}

impl SpanningTree {
    fn build(root: usize, links: &[Vec<usize>]) -> Self {
        let count = links.len();
        let mut children = vec![Vec::new(); count];
        let mut depth = vec![None; count];
        let mut order = Vec::with_capacity(count);
        let mut queue = VecDeque::new();
        depth[root] = Some(0);
        queue.push_back(root);
        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            let level = depth[idx].unwrap_or(0);
            for &child in &links[idx] {
                if depth[child].is_some() {
                    continue;
                }
                depth[child] = Some(level + 1);
                children[idx].push(child);
                queue.push_back(child);
            }
        }
        let mut subtree_size = vec![1; count];
        for &idx in order.iter().rev() {
            let below: usize = children[idx].iter().map(|&c| subtree_size[c]).sum();
            subtree_size[idx] += below;
        }
        Self {
            order,
            children,
            depth,
            subtree_size,
        }
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.depth[idx].is_some()
    }

    pub fn max_depth(&self) -> usize {
        self.depth.iter().flatten().copied().max().unwrap_or(0)
    }
}

/// Read-only view of the graph a strategy works from.
pub(crate) struct LayoutContext<'a> {
    pub nodes: &'a [Node],
    pub config: &'a LayoutConfig,
    pub root: usize,
    pub tree: SpanningTree,
    pub metrics: Metrics,
}

impl<'a> LayoutContext<'a> {
    pub fn new(nodes: &'a [Node], edges: &[Edge], config: &'a LayoutConfig) -> Self {
        let rule = config.layout.root_rule();
        let links = GraphLinks::build(nodes, edges, rule == RootRule::Connectivity);
        let root = find_root(nodes, &links, rule);
        let tree = SpanningTree::build(root, &links.children);
        Self {
            nodes,
            config,
            root,
            tree,
            metrics: Metrics::new(nodes.len(), config),
        }
    }

    /// Nodes reachable from the root, root first, breadth-first.
    pub fn reachable(&self) -> &[usize] {
        &self.tree.order
    }

    pub fn children(&self, idx: usize) -> &[usize] {
        &self.tree.children[idx]
    }
}

/// Parent -> child adjacency from edges and `parentId`, by input index.
/// Connectivity layouts read edges in both directions. Dangling references
/// are skipped.
pub(crate) struct GraphLinks {
    pub children: Vec<Vec<usize>>,
    pub incoming: Vec<usize>,
    pub degree: Vec<usize>,
}

impl GraphLinks {
    pub fn build(nodes: &[Node], edges: &[Edge], undirected: bool) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for (idx, node) in nodes.iter().enumerate() {
            index.entry(node.id.as_str()).or_insert(idx);
        }
        let mut links = Self {
            children: vec![Vec::new(); nodes.len()],
            incoming: vec![0; nodes.len()],
            degree: vec![0; nodes.len()],
        };
        for edge in edges {
            let (Some(&from), Some(&to)) = (
                index.get(edge.source.as_str()),
                index.get(edge.target.as_str()),
            ) else {
                continue;
            };
            if from == to {
                continue;
            }
            links.degree[from] += 1;
            links.degree[to] += 1;
            links.link(from, to);
            if undirected {
                links.link(to, from);
            }
        }
        for (idx, node) in nodes.iter().enumerate() {
            let Some(parent) = node.data.parent_id.as_deref() else {
                continue;
            };
            if let Some(&parent_idx) = index.get(parent) {
                links.link(parent_idx, idx);
            }
        }
        links
    }

    fn link(&mut self, from: usize, to: usize) {
        if from == to || self.children[from].contains(&to) {
            return;
        }
        self.children[from].push(to);
        self.incoming[to] += 1;
    }
}

pub(crate) fn find_root(nodes: &[Node], links: &GraphLinks, rule: RootRule) -> usize {
    if nodes.is_empty() {
        return 0;
    }
    match rule {
        RootRule::Connectivity => links
            .degree
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
            .map(|(idx, _)| idx)
            .unwrap_or(0),
        RootRule::Hierarchy => {
            let parentless: Vec<usize> = (0..nodes.len())
                .filter(|&idx| nodes[idx].data.parent_id.is_none())
                .collect();
            parentless
                .iter()
                .copied()
                .find(|&idx| links.incoming[idx] == 0 && !links.children[idx].is_empty())
                .or_else(|| {
                    parentless
                        .iter()
                        .copied()
                        .find(|&idx| links.incoming[idx] == 0)
                })
                .or_else(|| parentless.first().copied())
                .unwrap_or(0)
        }
    }
}

/// Positions under construction for one pass, indexed like the input nodes.
pub(crate) struct Placement {
    positions: Vec<Option<Point>>,
    placed: Vec<Point>,
    pub rng: ChaCha8Rng,
}

impl Placement {
    fn new(node_count: usize, seed: u64) -> Self {
        Self {
            positions: vec![None; node_count],
            placed: Vec::with_capacity(node_count),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn set(&mut self, idx: usize, point: Point) {
        if self.positions[idx].is_none() {
            self.placed.push(point);
        }
        self.positions[idx] = Some(point);
    }

    pub fn get(&self, idx: usize) -> Option<Point> {
        self.positions[idx]
    }

    pub fn is_placed(&self, idx: usize) -> bool {
        self.positions[idx].is_some()
    }

    /// Place `idx` at the closest collision-free point to `desired`.
    pub fn set_safely(&mut self, ctx: &LayoutContext, idx: usize, desired: Point) -> Point {
        let point = find_safe_position(
            desired,
            &self.placed,
            ctx.metrics.min_distance,
            ctx.config.relaxation.safe_position_attempts,
            ctx.config,
            &mut self.rng,
        );
        self.set(idx, point);
        point
    }

    fn placed_bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.positions.iter().flatten().copied())
    }
}

/// How a fan of descendants is perturbed around its ideal spots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FanStyle {
    Plain,
    Jitter,
    Wave,
}

/// Spread the spanning-tree descendants of `parent` outward from it. Each
/// child gets a share of the fan proportional to its subtree, and every
/// generation steps further out, far enough for its siblings to sit side by
/// side on their arc.
pub(crate) fn fan_out_descendants(
    ctx: &LayoutContext,
    placement: &mut Placement,
    parent: usize,
    angle: f32,
    spread: f32,
    style: FanStyle,
) {
    let m = &ctx.metrics;
    let sizes = &ctx.tree.subtree_size;
    let mut stack = vec![(parent, angle, spread, 0usize)];
    while let Some((node, angle, spread, depth)) = stack.pop() {
        let Some(origin) = placement.get(node) else {
            continue;
        };
        let children = ctx.children(node);
        if children.is_empty() {
            continue;
        }
        let total: usize = children.iter().map(|&c| sizes[c]).sum();
        let growth = (1.0 + FAN_DEPTH_GROWTH * depth as f32).min(FAN_MAX_GROWTH);
        let arc = children.len() as f32 * m.min_distance / spread.max(FAN_MIN_SPREAD);
        let step = (m.spacing * growth).max(arc);
        let mut start = angle - spread / 2.0;
        for (i, &child) in children.iter().enumerate() {
            let share = spread * sizes[child] as f32 / total.max(1) as f32;
            let mut child_angle = start + share / 2.0;
            start += share;
            if placement.is_placed(child) {
                continue;
            }
            let mut distance = step;
            match style {
                FanStyle::Plain => {}
                FanStyle::Jitter => {
                    child_angle += placement.rng.gen_range(-0.08..0.08);
                    distance += placement.rng.gen_range(-0.15..0.15) * step;
                }
                FanStyle::Wave => {
                    distance += (i as f32 * 1.7 + depth as f32).sin() * step * 0.2;
                }
            }
            placement.set_safely(ctx, child, origin.polar(distance, child_angle));
            stack.push((child, child_angle, share.max(FAN_MIN_SPREAD), depth + 1));
        }
    }
}

/// Grid placement of every node the strategy left unplaced, beside the main
/// layout. Returns how many nodes went there.
fn cluster_unplaced(ctx: &LayoutContext, placement: &mut Placement) -> usize {
    let pending: Vec<usize> = (0..ctx.nodes.len())
        .filter(|&idx| !placement.is_placed(idx))
        .collect();
    if pending.is_empty() {
        return 0;
    }
    let m = &ctx.metrics;
    let cell_w = m.node_width + m.spacing * 0.5;
    let cell_h = m.node_height + m.spacing * 0.5;
    let cols = (pending.len() as f32).sqrt().ceil().max(1.0) as usize;
    let rows = pending.len().div_ceil(cols);
    let grid_w = cell_w * (cols.saturating_sub(1)) as f32;
    let grid_h = cell_h * (rows.saturating_sub(1)) as f32;
    let gap = m.spacing * CLUSTER_GAP_FACTOR + m.node_width;

    let main = placement.placed_bounds().unwrap_or(Bounds {
        min_x: m.center.x,
        min_y: m.center.y,
        max_x: m.center.x,
        max_y: m.center.y,
    });
    // Prefer right of the main layout, then below, then left.
    let origin = if main.max_x + gap + grid_w <= m.bounds.max_x {
        Point::new(main.max_x + gap, main.min_y)
    } else if main.max_y + gap + grid_h <= m.bounds.max_y {
        Point::new(main.min_x, main.max_y + gap)
    } else {
        Point::new(main.min_x - gap - grid_w, main.min_y)
    };

    for (i, &idx) in pending.iter().enumerate() {
        let col = i % cols;
        let row = i / cols;
        let point = Point::new(origin.x + col as f32 * cell_w, origin.y + row as f32 * cell_h);
        placement.set(idx, m.bounds.clamp(point));
    }
    pending.len()
}

struct PlacedNodes {
    positions: Vec<Point>,
    disconnected: usize,
}

fn place_nodes(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Result<PlacedNodes> {
    let ctx = LayoutContext::new(nodes, edges, config);
    let mut placement = Placement::new(nodes.len(), config.seed);
    match config.layout {
        LayoutType::Radial => place_radial_layout(&ctx, &mut placement)?,
        LayoutType::Spiral => place_spiral_layout(&ctx, &mut placement)?,
        LayoutType::TreeHorizontal => place_tree_layout(&ctx, &mut placement, TreeAxis::Horizontal)?,
        LayoutType::TreeVertical => place_tree_layout(&ctx, &mut placement, TreeAxis::Vertical)?,
        LayoutType::OrgChart => place_org_chart_layout(&ctx, &mut placement)?,
        LayoutType::Hierarchical => place_hierarchical_layout(&ctx, &mut placement)?,
        LayoutType::Flowchart => place_flowchart_layout(&ctx, &mut placement)?,
        LayoutType::Organic => place_organic_layout(&ctx, &mut placement)?,
        LayoutType::Neural => place_neural_layout(&ctx, &mut placement)?,
        LayoutType::ForceDirected => place_force_directed_layout(&ctx, &mut placement)?,
        LayoutType::Hexagonal => place_hexagonal_layout(&ctx, &mut placement)?,
        LayoutType::Fractal => place_fractal_layout(&ctx, &mut placement)?,
        LayoutType::Galaxy => place_galaxy_layout(&ctx, &mut placement)?,
        LayoutType::Molecular => place_molecular_layout(&ctx, &mut placement)?,
        LayoutType::Timeline => place_timeline_layout(&ctx, &mut placement)?,
        LayoutType::Fishbone => place_fishbone_layout(&ctx, &mut placement)?,
        LayoutType::Brace => place_brace_layout(&ctx, &mut placement)?,
        LayoutType::Freeform => {
            for (idx, node) in nodes.iter().enumerate() {
                placement.set(idx, node.position);
            }
        }
    }
    let disconnected = cluster_unplaced(&ctx, &mut placement);

    let mut positions = Vec::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        match placement.get(idx) {
            Some(point) if point.is_finite() => positions.push(point),
            _ => {
                return Err(LayoutError::NonFinitePosition {
                    node_id: node.id.clone(),
                });
            }
        }
    }
    Ok(PlacedNodes {
        positions,
        disconnected,
    })
}

fn with_positions(nodes: &[Node], positions: &[Point]) -> Vec<Node> {
    nodes
        .iter()
        .zip(positions)
        .map(|(node, &position)| Node {
            position,
            ..node.clone()
        })
        .collect()
}

/// Run the configured strategy, including disconnected clustering, without
/// the overlap post-pass.
pub fn apply_strategy(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Result<Vec<Node>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }
    let placed = place_nodes(nodes, edges, config)?;
    Ok(with_positions(nodes, &placed.positions))
}

/// Lay out `nodes` with the configured strategy. Never fails: on a strategy
/// error the input nodes come back unchanged and the error is recorded.
pub fn calculate_positions_with_report(
    nodes: &[Node],
    edges: &[Edge],
    config: &LayoutConfig,
) -> LayoutOutcome {
    if nodes.is_empty() {
        tracing::warn!(layout = %config.layout, "layout requested for an empty node list");
        return LayoutOutcome::unchanged(nodes, config.layout);
    }
    if config.layout == LayoutType::Freeform {
        return LayoutOutcome::unchanged(nodes, config.layout);
    }

    let placed = match place_nodes(nodes, edges, config) {
        Ok(placed) => placed,
        Err(err) => {
            tracing::error!(layout = %config.layout, error = %err, "layout failed, keeping input positions");
            let mut outcome = LayoutOutcome::unchanged(nodes, config.layout);
            outcome.error = Some(err);
            return outcome;
        }
    };

    let mut positions = placed.positions;
    let min_distance = min_node_distance(nodes.len(), config);
    let overlaps_before = count_overlaps(&positions, min_distance);
    let overlaps_after = resolve_overlaps(&mut positions, config);
    tracing::debug!(
        layout = %config.layout,
        nodes = nodes.len(),
        disconnected = placed.disconnected,
        overlaps_before,
        overlaps_after,
        "layout pass complete"
    );

    LayoutOutcome {
        nodes: with_positions(nodes, &positions),
        layout: config.layout,
        error: None,
        overlaps_before,
        overlaps_after,
        disconnected: placed.disconnected,
    }
}

pub fn calculate_positions(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Vec<Node> {
    calculate_positions_with_report(nodes, edges, config).nodes
}

/// Strict structural check: unique ids and no dangling edge endpoints.
pub fn validate_graph(nodes: &[Node], edges: &[Edge]) -> Result<()> {
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
    for (idx, node) in nodes.iter().enumerate() {
        if seen.insert(node.id.as_str(), idx).is_some() {
            return Err(LayoutError::DuplicateNodeId {
                node_id: node.id.clone(),
            });
        }
    }
    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            if !seen.contains_key(endpoint.as_str()) {
                return Err(LayoutError::MissingNode {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Angle of the `i`th of `count` slots evenly spaced around a full turn.
pub(crate) fn slot_angle(i: usize, count: usize, offset: f32) -> f32 {
    offset + TAU * i as f32 / count.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(ids: &[&str]) -> (Vec<Node>, Vec<Edge>) {
        let nodes = ids.iter().map(|id| Node::new(*id, *id)).collect();
        let edges = ids.windows(2).map(|w| Edge::new(w[0], w[1])).collect();
        (nodes, edges)
    }

    #[test]
    fn density_factor_is_bounded() {
        assert_eq!(density_factor(1), 1.0);
        assert_eq!(density_factor(20), 1.0);
        assert!(density_factor(80) < 1.0);
        assert_eq!(density_factor(10_000), DENSITY_MIN);
    }

    #[test]
    fn hierarchy_root_prefers_parentless_source() {
        let nodes = vec![
            Node::new("leaf", "Leaf").with_parent("top"),
            Node::new("top", "Top"),
            Node::new("loner", "Loner"),
        ];
        let edges = vec![Edge::new("top", "leaf")];
        let links = GraphLinks::build(&nodes, &edges, false);
        assert_eq!(find_root(&nodes, &links, RootRule::Hierarchy), 1);
    }

    #[test]
    fn connectivity_root_is_highest_degree_first_on_ties() {
        let nodes: Vec<Node> = ["a", "b", "c", "d"].iter().map(|id| Node::new(*id, *id)).collect();
        let edges = vec![Edge::new("b", "a"), Edge::new("b", "c"), Edge::new("d", "a")];
        let links = GraphLinks::build(&nodes, &edges, true);
        // a and b both have degree 2; a comes first.
        assert_eq!(find_root(&nodes, &links, RootRule::Connectivity), 0);
    }

    #[test]
    fn links_skip_dangling_edges_and_self_loops() {
        let nodes = vec![Node::new("a", "A"), Node::new("b", "B")];
        let edges = vec![
            Edge::new("a", "ghost"),
            Edge::new("a", "a"),
            Edge::new("a", "b"),
            Edge::new("a", "b"),
        ];
        let links = GraphLinks::build(&nodes, &edges, false);
        assert_eq!(links.children[0], vec![1]);
        assert_eq!(links.incoming[1], 1);
        assert_eq!(links.degree, vec![2, 2]);
    }

    #[test]
    fn spanning_tree_survives_cycles() {
        let (nodes, mut edges) = chain(&["a", "b", "c"]);
        edges.push(Edge::new("c", "a"));
        let links = GraphLinks::build(&nodes, &edges, false);
        let tree = SpanningTree::build(0, &links.children);
        assert_eq!(tree.order, vec![0, 1, 2]);
        assert_eq!(tree.max_depth(), 2);
        assert!(tree.children[2].is_empty());
    }

    #[test]
    fn unreachable_nodes_are_clustered_beside_the_layout() {
        let (mut nodes, edges) = chain(&["a", "b", "c"]);
        nodes.push(Node::new("x", "Isolated"));
        let config = LayoutConfig::for_layout(LayoutType::Spiral);
        let placed = place_nodes(&nodes, &edges, &config).unwrap();
        assert_eq!(placed.disconnected, 1);
        let main_max_x = placed.positions[..3].iter().map(|p| p.x).fold(f32::MIN, f32::max);
        assert!(placed.positions[3].x > main_max_x);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let config = LayoutConfig::default();
        assert!(calculate_positions(&[], &[], &config).is_empty());
        assert!(apply_strategy(&[], &[], &config).unwrap().is_empty());
    }

    #[test]
    fn freeform_keeps_positions_and_skips_relaxation() {
        let nodes = vec![Node::new("a", "A").at(1.0, 1.0), Node::new("b", "B").at(2.0, 2.0)];
        let outcome = calculate_positions_with_report(
            &nodes,
            &[],
            &LayoutConfig::for_layout(LayoutType::Freeform),
        );
        assert_eq!(outcome.nodes, nodes);
        assert_eq!(outcome.overlaps_after, 0);
    }

    #[test]
    fn validate_graph_reports_structure_problems() {
        let nodes = vec![Node::new("a", "A"), Node::new("a", "Again")];
        assert_eq!(
            validate_graph(&nodes, &[]),
            Err(LayoutError::DuplicateNodeId {
                node_id: "a".to_string()
            })
        );
        let nodes = vec![Node::new("a", "A")];
        let err = validate_graph(&nodes, &[Edge::new("a", "zzz")]).unwrap_err();
        assert!(matches!(err, LayoutError::MissingNode { node_id, .. } if node_id == "zzz"));
    }

    #[test]
    fn unusable_sizes_fall_back_to_defaults() {
        let (nodes, edges) = chain(&["a", "b", "c"]);
        let mut config = LayoutConfig::for_layout(LayoutType::Spiral);
        config.spacing = Some(f32::NAN);
        config.node_size.width = f32::INFINITY;
        assert_eq!(node_extent(&config).width, Size::default().width);
        let outcome = calculate_positions_with_report(&nodes, &edges, &config);
        assert!(!outcome.is_soft_failure());
        assert!(outcome.nodes.iter().all(|n| n.position.is_finite()));
    }

    fn branching(count: usize, fanout: usize) -> (Vec<Node>, Vec<Edge>) {
        let nodes: Vec<Node> = (0..count).map(|i| Node::new(format!("n{i}"), "Topic")).collect();
        let edges = (1..count)
            .map(|i| Edge::new(format!("n{}", (i - 1) / fanout), format!("n{i}")))
            .collect();
        (nodes, edges)
    }

    #[test]
    fn oversized_node_boxes_still_lay_out() {
        let config = crate::config::parse_config(
            r#"{"type": "radial", "nodeSize": {"width": 3e38, "height": 3e38}, "padding": 3e38}"#,
        )
        .unwrap();
        let (nodes, edges) = chain(&["a", "b", "c"]);
        let outcome = calculate_positions_with_report(&nodes, &edges, &config);
        assert!(!outcome.is_soft_failure());
        for node in &outcome.nodes {
            assert!(node.position.is_finite());
            assert!(config.bounds.contains(node.position));
        }
    }

    #[test]
    fn fanned_descendants_do_not_pile_up() {
        let (nodes, edges) = branching(200, 4);
        for layout in [LayoutType::Organic, LayoutType::Neural, LayoutType::Radial] {
            let config = LayoutConfig::for_layout(layout);
            let outcome = calculate_positions_with_report(&nodes, &edges, &config);
            let points: Vec<Point> = outcome.nodes.iter().map(|n| n.position).collect();
            let min_distance = min_node_distance(nodes.len(), &config);
            assert_eq!(outcome.overlaps_after, count_overlaps(&points, min_distance));
            assert!(
                outcome.overlaps_before == 0 || outcome.overlaps_after < outcome.overlaps_before,
                "{layout}: {} -> {}",
                outcome.overlaps_before,
                outcome.overlaps_after
            );
        }
    }

    #[test]
    fn connectivity_layouts_only_cluster_truly_disconnected_nodes() {
        // c points back at b, so it is unreachable downward but still linked
        let nodes: Vec<Node> = ["a", "b", "c", "x"].iter().map(|id| Node::new(*id, *id)).collect();
        let edges = vec![Edge::new("a", "b"), Edge::new("c", "b")];
        let radial = LayoutConfig::for_layout(LayoutType::Radial);
        assert_eq!(radial.layout.root_rule(), RootRule::Connectivity);
        assert_eq!(calculate_positions_with_report(&nodes, &edges, &radial).disconnected, 1);
        let tree = LayoutConfig::for_layout(LayoutType::TreeVertical);
        assert_eq!(tree.layout.root_rule(), RootRule::Hierarchy);
        assert_eq!(calculate_positions_with_report(&nodes, &edges, &tree).disconnected, 2);
    }
}
