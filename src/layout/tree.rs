use super::*;

const SIBLING_GAP: f32 = 0.5;
const ORG_LEVEL_GAP: f32 = 0.75;
const HIERARCHY_WIDTH_GROWTH: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TreeAxis {
    /// Levels grow downwards, siblings spread along x.
    Vertical,
    /// Levels grow rightwards, siblings spread along y.
    Horizontal,
}

/// Breadth offsets of a tidy tree, measured from its leading edge.
#[derive(Debug, Clone)]
struct TidyTree {
    extent: f32,
    offset: Vec<f32>,
}

/// Every subtree as wide as its children side by side and never narrower
/// than `breadth`; every parent centred over its first and last child.
/// Widths are measured leaves first, then offsets handed down from the root.
fn tidy_tree(ctx: &LayoutContext, breadth: f32, gap: f32) -> TidyTree {
    let count = ctx.nodes.len();
    let mut extent = vec![breadth; count];
    let mut center = vec![breadth / 2.0; count];
    // leading edge of a child's subtree inside its parent's subtree
    let mut shift = vec![0.0f32; count];
    for &idx in ctx.reachable().iter().rev() {
        let children = ctx.children(idx);
        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            continue;
        };
        let mut cursor = 0.0f32;
        for &child in children {
            shift[child] = cursor;
            cursor += extent[child] + gap;
        }
        let span = cursor - gap;
        let mut own = (shift[first] + center[first] + shift[last] + center[last]) / 2.0;
        if breadth > span {
            let pad = (breadth - span) / 2.0;
            for &child in children {
                shift[child] += pad;
            }
            own += pad;
            extent[idx] = breadth;
        } else {
            extent[idx] = span;
        }
        center[idx] = own;
    }

    let mut lead = vec![0.0f32; count];
    let mut offset = vec![0.0f32; count];
    for &idx in ctx.reachable() {
        offset[idx] = lead[idx] + center[idx];
        for &child in ctx.children(idx) {
            lead[child] = lead[idx] + shift[child];
        }
    }
    TidyTree {
        extent: extent[ctx.root],
        offset,
    }
}

/// Rank of every reachable node among the nodes of its level, by `key`.
fn rank_within_levels(ctx: &LayoutContext, key: &[f32]) -> Vec<usize> {
    let mut levels: Vec<Vec<usize>> = vec![Vec::new(); ctx.tree.max_depth() + 1];
    for &idx in ctx.reachable() {
        if let Some(depth) = ctx.tree.depth[idx] {
            levels[depth].push(idx);
        }
    }
    let mut rank = vec![0; ctx.nodes.len()];
    for level in &mut levels {
        level.sort_by(|&a, &b| key[a].total_cmp(&key[b]));
        for (r, &idx) in level.iter().enumerate() {
            rank[idx] = r;
        }
    }
    rank
}

/// Lay levels out from `along` (breadth offsets) and the level step. When the
/// breadth had to be squeezed by `scale`, consecutive nodes of a level
/// alternate between lanes a minimum distance apart, and the level step
/// grows to hold them.
fn place_levels(
    ctx: &LayoutContext,
    placement: &mut Placement,
    axis: TreeAxis,
    along: &[f32],
    pitch: f32,
    scale: f32,
    level_step: f32,
) {
    let m = &ctx.metrics;
    let lanes = lane_count(pitch, scale, m.min_distance);
    let gap = lane_gap(m.min_distance);
    let level_step = level_step.max(lanes as f32 * gap);
    let rank = rank_within_levels(ctx, along);
    let cells: Vec<(usize, Point)> = ctx
        .reachable()
        .iter()
        .map(|&idx| {
            let level = ctx.tree.depth[idx].unwrap_or(0) as f32;
            let lane = (rank[idx] % lanes) as f32;
            let down = level * level_step + lane * gap;
            let offset = match axis {
                TreeAxis::Vertical => Point::new(along[idx], down),
                TreeAxis::Horizontal => Point::new(down, along[idx]),
            };
            (idx, offset)
        })
        .collect();
    place_fitted(ctx, placement, m.center, &cells);
}

fn breadth_room(m: &Metrics, axis: TreeAxis) -> f32 {
    match axis {
        TreeAxis::Vertical => m.frame.width(),
        TreeAxis::Horizontal => m.frame.height(),
    }
}

/// Classic tidy tree: every parent centred over the span of its children,
/// each subtree as wide as its children together.
pub(super) fn place_tree_layout(
    ctx: &LayoutContext,
    placement: &mut Placement,
    axis: TreeAxis,
) -> Result<()> {
    let m = &ctx.metrics;
    let gap = m.spacing * SIBLING_GAP;
    let (breadth, level_step) = match axis {
        TreeAxis::Vertical => (m.slot_width(), m.slot_height() + m.spacing),
        TreeAxis::Horizontal => (m.slot_height(), m.slot_width() + m.spacing * 0.5),
    };
    let breadth = breadth.max(m.min_distance - gap);
    let tidy = tidy_tree(ctx, breadth, gap);
    let root_offset = tidy.offset[ctx.root];
    let along: Vec<f32> = tidy.offset.iter().map(|o| o - root_offset).collect();
    let scale = squeeze(tidy.extent, breadth_room(m, axis));
    place_levels(ctx, placement, axis, &along, breadth + gap, scale, level_step);
    Ok(())
}

/// Org chart: subtree widths measured bottom-up first, then children laid
/// out directly beneath their manager one fixed level at a time.
pub(super) fn place_org_chart_layout(
    ctx: &LayoutContext,
    placement: &mut Placement,
) -> Result<()> {
    let m = &ctx.metrics;
    let slot = (m.slot_width() + m.spacing * SIBLING_GAP).max(m.min_distance);
    let level_step = m.slot_height() + m.spacing * ORG_LEVEL_GAP;

    let mut widths = vec![slot; ctx.nodes.len()];
    for &idx in ctx.reachable().iter().rev() {
        let children = ctx.children(idx);
        if !children.is_empty() {
            let total: f32 = children.iter().map(|&c| widths[c]).sum();
            widths[idx] = total.max(slot);
        }
    }

    let mut along = vec![0.0f32; ctx.nodes.len()];
    for &idx in ctx.reachable() {
        let children = ctx.children(idx);
        let total: f32 = children.iter().map(|&c| widths[c]).sum();
        let mut left = along[idx] - total / 2.0;
        for &child in children {
            along[child] = left + widths[child] / 2.0;
            left += widths[child];
        }
    }
    let scale = squeeze(widths[ctx.root], m.frame.width());
    place_levels(ctx, placement, TreeAxis::Vertical, &along, slot, scale, level_step);
    Ok(())
}

/// Level-by-level placement: every level spread evenly across a width that
/// grows with the number of nodes on it and with depth.
pub(super) fn place_hierarchical_layout(
    ctx: &LayoutContext,
    placement: &mut Placement,
) -> Result<()> {
    let m = &ctx.metrics;
    let base_cell = (m.slot_width() + m.spacing * SIBLING_GAP).max(m.min_distance);

    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut level_nodes = vec![ctx.root];
    while !level_nodes.is_empty() {
        let next: Vec<usize> = level_nodes
            .iter()
            .flat_map(|&idx| ctx.children(idx).iter().copied())
            .collect();
        rows.push(std::mem::replace(&mut level_nodes, next));
    }

    let cell = |level: usize| base_cell * (1.0 + level as f32 * HIERARCHY_WIDTH_GROWTH);
    let widest = rows
        .iter()
        .enumerate()
        .map(|(level, row)| cell(level) * row.len() as f32)
        .fold(0.0f32, f32::max);
    let scale = squeeze(widest, m.frame.width());

    let mut along = vec![0.0f32; ctx.nodes.len()];
    for (level, row) in rows.iter().enumerate() {
        let width = cell(level) * row.len() as f32;
        for (i, &idx) in row.iter().enumerate() {
            along[idx] = -width / 2.0 + (i as f32 + 0.5) * cell(level);
        }
    }
    let level_step = m.slot_height() + m.spacing;
    place_levels(ctx, placement, TreeAxis::Vertical, &along, base_cell, scale, level_step);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        layout: LayoutType,
        nodes: &[Node],
        edges: &[Edge],
        place: impl Fn(&LayoutContext, &mut Placement) -> Result<()>,
    ) -> Vec<Point> {
        let config = LayoutConfig::for_layout(layout);
        let ctx = LayoutContext::new(nodes, edges, &config);
        let mut placement = Placement::new(nodes.len(), config.seed);
        place(&ctx, &mut placement).unwrap();
        (0..nodes.len()).map(|i| placement.get(i).unwrap()).collect()
    }

    fn sample() -> (Vec<Node>, Vec<Edge>) {
        let nodes = ["ceo", "cto", "cfo", "dev1", "dev2", "acct"]
            .iter()
            .map(|id| Node::new(*id, *id))
            .collect();
        let edges = vec![
            Edge::new("ceo", "cto"),
            Edge::new("ceo", "cfo"),
            Edge::new("cto", "dev1"),
            Edge::new("cto", "dev2"),
            Edge::new("cfo", "acct"),
        ];
        (nodes, edges)
    }

    #[test]
    fn vertical_tree_centres_parent_over_children() {
        let (nodes, edges) = sample();
        let pos = run(LayoutType::TreeVertical, &nodes, &edges, |c, p| {
            place_tree_layout(c, p, TreeAxis::Vertical)
        });
        // cto over dev1/dev2
        assert!((pos[1].x - (pos[3].x + pos[4].x) / 2.0).abs() < 1e-3);
        assert!(pos[3].y > pos[1].y && pos[1].y > pos[0].y);
        assert!(pos[3].x < pos[4].x && pos[4].x < pos[5].x);
    }

    #[test]
    fn horizontal_tree_grows_rightwards() {
        let (nodes, edges) = sample();
        let pos = run(LayoutType::TreeHorizontal, &nodes, &edges, |c, p| {
            place_tree_layout(c, p, TreeAxis::Horizontal)
        });
        assert!(pos[1].x > pos[0].x);
        assert!(pos[3].x > pos[1].x);
        assert_eq!(pos[1].x, pos[2].x);
        assert!((pos[0].y - (pos[1].y + pos[2].y) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn subtree_extent_is_sum_of_children() {
        let (nodes, edges) = sample();
        let config = LayoutConfig::for_layout(LayoutType::TreeVertical);
        let ctx = LayoutContext::new(&nodes, &edges, &config);
        let tree = tidy_tree(&ctx, 10.0, 2.0);
        // three leaves of 10 with two gaps between cto's pair and cfo's single leaf
        assert_eq!(tree.extent, 10.0 * 3.0 + 2.0 * 2.0);
        // cto centred over 0..22, cfo over 24..34, ceo between them
        assert_eq!(tree.offset[1], 11.0);
        assert_eq!(tree.offset[2], 29.0);
        assert_eq!(tree.offset[0], 20.0);
    }

    #[test]
    fn org_chart_keeps_fixed_level_spacing() {
        let (nodes, edges) = sample();
        let pos = run(LayoutType::OrgChart, &nodes, &edges, place_org_chart_layout);
        let step = pos[1].y - pos[0].y;
        assert!(step > 0.0);
        assert!((pos[2].y - pos[0].y - step).abs() < 1e-3);
        assert!((pos[3].y - pos[1].y - step).abs() < 1e-3);
        assert!(pos[1].x < pos[0].x && pos[0].x < pos[2].x);
        // cto's team is wider than cfo's, so the managers are not mirrored.
        assert!((pos[2].x - pos[0].x) > (pos[0].x - pos[1].x));
    }

    #[test]
    fn hierarchical_levels_widen_with_depth() {
        let (nodes, edges) = sample();
        let pos = run(LayoutType::Hierarchical, &nodes, &edges, place_hierarchical_layout);
        assert_eq!(pos[1].y, pos[2].y);
        assert_eq!(pos[3].y, pos[5].y);
        let level1_gap = pos[2].x - pos[1].x;
        let level2_gap = pos[4].x - pos[3].x;
        assert!(level2_gap > level1_gap);
    }

    fn chain(len: usize) -> (Vec<Node>, Vec<Edge>) {
        let ids: Vec<String> = (0..len).map(|i| format!("n{i}")).collect();
        let nodes = ids.iter().map(|id| Node::new(id.clone(), id.clone())).collect();
        let edges = ids.windows(2).map(|w| Edge::new(&w[0], &w[1])).collect();
        (nodes, edges)
    }

    /// Root with `fanout` children per node, breadth-first ids.
    fn bushy(count: usize, fanout: usize) -> (Vec<Node>, Vec<Edge>) {
        let nodes = (0..count).map(|i| Node::new(format!("t{i}"), "Topic")).collect();
        let edges = (1..count)
            .map(|i| Edge::new(format!("t{}", (i - 1) / fanout), format!("t{i}")))
            .collect();
        (nodes, edges)
    }

    #[test]
    fn very_deep_chains_still_lay_out() {
        let (nodes, edges) = chain(1500);
        for layout in [
            LayoutType::TreeVertical,
            LayoutType::TreeHorizontal,
            LayoutType::OrgChart,
            LayoutType::Hierarchical,
        ] {
            let config = LayoutConfig::for_layout(layout);
            let outcome = calculate_positions_with_report(&nodes, &edges, &config);
            assert!(outcome.error.is_none(), "{layout}: {:?}", outcome.error);
            assert!(outcome.nodes.iter().all(|n| config.bounds.contains(n.position)));
            // the chain keeps its order along the level axis
            assert!(outcome.nodes[1499].position != outcome.nodes[0].position, "{layout}");
        }
    }

    fn vertical(c: &LayoutContext, p: &mut Placement) -> Result<()> {
        place_tree_layout(c, p, TreeAxis::Vertical)
    }

    fn horizontal(c: &LayoutContext, p: &mut Placement) -> Result<()> {
        place_tree_layout(c, p, TreeAxis::Horizontal)
    }

    #[test]
    fn wide_trees_are_fitted_inside_the_canvas() {
        let (nodes, edges) = bushy(500, 3);
        let cases: [(LayoutType, fn(&LayoutContext, &mut Placement) -> Result<()>); 4] = [
            (LayoutType::TreeVertical, vertical),
            (LayoutType::TreeHorizontal, horizontal),
            (LayoutType::OrgChart, place_org_chart_layout),
            (LayoutType::Hierarchical, place_hierarchical_layout),
        ];
        for (layout, place) in cases {
            let config = LayoutConfig::for_layout(layout);
            let b = config.bounds;
            let ctx = LayoutContext::new(&nodes, &edges, &config);
            let pos = run(layout, &nodes, &edges, place);
            for p in &pos {
                assert!(
                    p.x > b.min_x && p.x < b.max_x && p.y > b.min_y && p.y < b.max_y,
                    "{layout}: {p:?} on or past the canvas edge"
                );
            }
            // squeezed levels alternate lanes, so nothing collides before relaxation
            assert_eq!(count_overlaps(&pos, ctx.metrics.min_distance), 0, "{layout}");
        }
    }
}
