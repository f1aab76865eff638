use super::*;
use crate::analysis::is_temporal;

const EVENT_GAP: f32 = 0.5;
const GRID_GAP: f32 = 0.5;

/// Temporal nodes on one horizontal row through the centre, in input order.
/// The root's other descendants go in a square-ish grid below the row. A row
/// too long for the canvas is squeezed, with neighbouring events staggered
/// into lanes.
pub(super) fn place_timeline_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    let m = &ctx.metrics;
    let (events, rest): (Vec<usize>, Vec<usize>) = (0..ctx.nodes.len())
        .filter(|&idx| is_temporal(&ctx.nodes[idx]) || ctx.tree.contains(idx))
        .partition(|&idx| is_temporal(&ctx.nodes[idx]));

    let gap = lane_gap(m.min_distance);
    let step = (m.slot_width() + m.spacing * EVENT_GAP).max(m.min_distance);
    let span = step * events.len().saturating_sub(1) as f32;
    let lanes = lane_count(step, squeeze(span, m.frame.width()), m.min_distance);
    let mut cells: Vec<(usize, Point)> = events
        .iter()
        .enumerate()
        .map(|(i, &idx)| {
            let lane = (i % lanes) as f32;
            (idx, Point::new(step * i as f32 - span / 2.0, lane * gap))
        })
        .collect();

    if !rest.is_empty() {
        let cols = (rest.len() as f32).sqrt().ceil().max(1.0) as usize;
        let cell_w = (m.slot_width() + m.spacing * GRID_GAP).max(m.min_distance);
        let cell_h = (m.slot_height() + m.spacing * GRID_GAP).max(m.min_distance);
        let top = if events.is_empty() {
            0.0
        } else {
            (lanes - 1) as f32 * gap + m.slot_height() + m.spacing
        };
        let left = -cell_w * (cols - 1) as f32 / 2.0;
        cells.extend(rest.iter().enumerate().map(|(i, &idx)| {
            let point = Point::new(
                left + (i % cols) as f32 * cell_w,
                top + (i / cols) as f32 * cell_h,
            );
            (idx, point)
        }));
    }
    place_fitted(ctx, placement, m.center, &cells);
    Ok(())
}
