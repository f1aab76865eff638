use super::*;

const FLOW_MAX_EXTENT_SHARE: f32 = 0.4;
const FLOW_MIN_COLUMNS: usize = 2;
const FLOW_ROW_STEP: f32 = 0.5;

/// Cells of the flow as offsets from its top-left node, with each node's row
/// inside its column.
fn arrange_bands(
    columns: &[Vec<usize>],
    max_columns: usize,
    column_step: f32,
    row_step: f32,
    band_gap: f32,
) -> Vec<(usize, Point, usize)> {
    let mut cells = Vec::new();
    let mut band_top = 0.0f32;
    for band in columns.chunks(max_columns.max(1)) {
        let tallest = band.iter().map(Vec::len).max().unwrap_or(1);
        for (col, members) in band.iter().enumerate() {
            for (row, &idx) in members.iter().enumerate() {
                let offset = Point::new(col as f32 * column_step, band_top + row as f32 * row_step);
                cells.push((idx, offset, row));
            }
        }
        band_top += tallest as f32 * row_step + band_gap;
    }
    cells
}

/// Columns by breadth-first distance from the root along edge direction.
/// When the flow would grow wider than the allowed extent it wraps into a
/// new band below. Columns too tall for the canvas alternate their rows
/// between lanes inside a widened column.
pub(super) fn place_flowchart_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    let m = &ctx.metrics;
    let row_step = (m.slot_height() + m.spacing * FLOW_ROW_STEP).max(m.min_distance);
    let max_columns_for = |step: f32| {
        ((m.frame.width() * FLOW_MAX_EXTENT_SHARE) / step)
            .floor()
            .max(FLOW_MIN_COLUMNS as f32) as usize
    };

    let mut columns: Vec<Vec<usize>> = vec![Vec::new(); ctx.tree.max_depth() + 1];
    for &idx in ctx.reachable() {
        if let Some(depth) = ctx.tree.depth[idx] {
            columns[depth].push(idx);
        }
    }

    let gap = lane_gap(m.min_distance);
    let mut column_step = m.slot_width() + m.spacing;
    let mut lanes = 1;
    let mut cells;
    // wider columns can mean fewer per band and a taller flow, so settle the
    // lane count before placing
    loop {
        cells = arrange_bands(&columns, max_columns_for(column_step), column_step, row_step, m.spacing);
        let height = cells.iter().map(|(_, p, _)| p.y).fold(0.0f32, f32::max);
        let needed = lane_count(row_step, squeeze(height, m.frame.height()), m.min_distance);
        if needed <= lanes {
            break;
        }
        lanes = needed;
        column_step = column_step.max(lanes as f32 * gap);
    }

    let visible_columns = columns.len().min(max_columns_for(column_step));
    let anchor = Point::new(
        m.center.x - (visible_columns.saturating_sub(1)) as f32 * column_step / 2.0,
        m.center.y,
    );
    let cells: Vec<(usize, Point)> = cells
        .into_iter()
        .map(|(idx, offset, row)| {
            let lane = (row % lanes) as f32;
            (idx, Point::new(offset.x + lane * gap, offset.y))
        })
        .collect();
    place_fitted(ctx, placement, anchor, &cells);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(nodes: &[Node], edges: &[Edge], config: &LayoutConfig) -> Vec<Point> {
        let ctx = LayoutContext::new(nodes, edges, config);
        let mut placement = Placement::new(nodes.len(), config.seed);
        place_flowchart_layout(&ctx, &mut placement).unwrap();
        (0..nodes.len())
            .map(|i| placement.get(i).unwrap_or_default())
            .collect()
    }

    #[test]
    fn flow_steps_advance_in_columns() {
        let nodes: Vec<Node> = ["start", "check", "yes", "no"]
            .iter()
            .map(|id| Node::new(*id, *id))
            .collect();
        let edges = vec![
            Edge::new("start", "check"),
            Edge::new("check", "yes"),
            Edge::new("check", "no"),
        ];
        let pos = run(&nodes, &edges, &LayoutConfig::for_layout(LayoutType::Flowchart));
        assert!(pos[1].x > pos[0].x);
        assert!(pos[2].x > pos[1].x);
        assert_eq!(pos[2].x, pos[3].x);
        assert!(pos[3].y > pos[2].y);
    }

    #[test]
    fn long_flows_wrap_into_bands() {
        let ids: Vec<String> = (0..12).map(|i| format!("step{i}")).collect();
        let nodes: Vec<Node> = ids.iter().map(|id| Node::new(id.clone(), id.clone())).collect();
        let edges: Vec<Edge> = ids.windows(2).map(|w| Edge::new(&w[0], &w[1])).collect();
        let mut config = LayoutConfig::for_layout(LayoutType::Flowchart);
        config.bounds.min_x = -1000.0;
        config.bounds.max_x = 1000.0;
        let pos = run(&nodes, &edges, &config);
        // 754 units of flow width fit two 350-unit columns.
        assert_eq!(pos[2].x, pos[0].x);
        assert!(pos[2].y > pos[0].y);
        assert!(pos.iter().all(|p| config.bounds.contains(*p)));
    }

    #[test]
    fn tall_columns_split_into_lanes_inside_the_canvas() {
        // one decision fanning out to 400 branches
        let mut nodes = vec![Node::new("start", "Start")];
        let mut edges = Vec::new();
        for i in 0..400 {
            let id = format!("b{i}");
            edges.push(Edge::new("start", &id));
            nodes.push(Node::new(id.clone(), id));
        }
        let config = LayoutConfig::for_layout(LayoutType::Flowchart);
        let pos = run(&nodes, &edges, &config);
        let ctx = LayoutContext::new(&nodes, &edges, &config);
        assert!(pos.iter().all(|p| config.bounds.contains(*p)));
        assert_eq!(count_overlaps(&pos, ctx.metrics.min_distance), 0);
        let columns: std::collections::HashSet<u32> = pos[1..].iter().map(|p| p.x.to_bits()).collect();
        assert!(columns.len() > 1);
    }
}
