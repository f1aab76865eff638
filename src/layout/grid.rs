use super::*;

const BRACE_COLUMNS: usize = 4;
const CELL_GAP: f32 = 0.5;

/// Plain row-major grid of the root's component in input order, centred on
/// the canvas. A grid too tall for the canvas is squeezed, with alternate
/// rows shifted sideways into lanes.
pub(super) fn place_brace_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    let m = &ctx.metrics;
    let mut members: Vec<usize> = ctx.reachable().to_vec();
    members.sort_unstable();
    if members.is_empty() {
        return Ok(());
    }
    let cols = BRACE_COLUMNS.min(members.len());
    let rows = members.len().div_ceil(cols);
    let cell_h = (m.slot_height() + m.spacing * CELL_GAP).max(m.min_distance);
    let scale = squeeze(cell_h * (rows - 1) as f32, m.frame.height());
    let lanes = lane_count(cell_h, scale, m.min_distance);
    let gap = lane_gap(m.min_distance);
    let cell_w = (m.slot_width() + m.spacing * CELL_GAP)
        .max(m.min_distance)
        .max(lanes as f32 * gap);

    let cells: Vec<(usize, Point)> = members
        .iter()
        .enumerate()
        .map(|(i, &idx)| {
            let (row, col) = (i / cols, i % cols);
            let lane = (row % lanes) as f32;
            (idx, Point::new(col as f32 * cell_w + lane * gap, row as f32 * cell_h))
        })
        .collect();
    let anchor = Point::new(
        m.center.x - cell_w * (cols - 1) as f32 / 2.0,
        m.center.y - cell_h * (rows - 1) as f32 / 2.0,
    );
    place_fitted(ctx, placement, anchor, &cells);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brace_fills_rows_of_four_ignoring_edge_direction() {
        let nodes: Vec<Node> = (0..6).map(|i| Node::new(format!("p{i}"), "Part")).collect();
        let edges: Vec<Edge> = (1..6).map(|i| Edge::new(format!("p{i}"), "p0")).collect();
        let config = LayoutConfig::for_layout(LayoutType::Brace);
        let ctx = LayoutContext::new(&nodes, &edges, &config);
        // p0 has no outgoing edges, so the root is p1 and only p0 is reachable
        assert_eq!(ctx.root, 1);
        let mut placement = Placement::new(nodes.len(), config.seed);
        place_brace_layout(&ctx, &mut placement).unwrap();
        assert!(placement.is_placed(0) && placement.is_placed(1));
        assert!(!placement.is_placed(2));

        let edges: Vec<Edge> = (1..6).map(|i| Edge::new("p0", format!("p{i}"))).collect();
        let ctx = LayoutContext::new(&nodes, &edges, &config);
        let mut placement = Placement::new(nodes.len(), config.seed);
        place_brace_layout(&ctx, &mut placement).unwrap();
        let pos: Vec<Point> = (0..6).map(|i| placement.get(i).unwrap()).collect();
        assert_eq!(pos[0].y, pos[3].y);
        assert!(pos[4].y > pos[0].y);
        assert_eq!(pos[4].x, pos[0].x);
    }

    #[test]
    fn tall_grids_stay_inside_a_short_canvas() {
        let nodes: Vec<Node> = (0..120).map(|i| Node::new(format!("p{i}"), "Part")).collect();
        let edges: Vec<Edge> = (1..120).map(|i| Edge::new("p0", format!("p{i}"))).collect();
        let mut config = LayoutConfig::for_layout(LayoutType::Brace);
        config.bounds.min_y = -300.0;
        config.bounds.max_y = 300.0;
        let ctx = LayoutContext::new(&nodes, &edges, &config);
        let mut placement = Placement::new(nodes.len(), config.seed);
        place_brace_layout(&ctx, &mut placement).unwrap();
        let pos: Vec<Point> = (0..nodes.len()).map(|i| placement.get(i).unwrap()).collect();
        assert!(pos.iter().all(|p| config.bounds.contains(*p)));
        assert_eq!(count_overlaps(&pos, ctx.metrics.min_distance), 0);
    }
}
