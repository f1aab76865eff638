use super::*;

const RING_STEP: f32 = 1.3;
const RING_STAGGER: f32 = 0.3;
const SPIRAL_TURN_GAP: f32 = 1.1;

fn ring_capacity(node_count: usize, ring: usize) -> usize {
    let base = ((node_count as f32).sqrt().ceil() as usize * 2).max(6);
    base * ring
}

/// Root at the canvas centre, everything else on concentric rings in
/// breadth-first order so parents sit inside their children.
pub(super) fn place_radial_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    let m = &ctx.metrics;
    placement.set(ctx.root, m.center);

    let others: Vec<usize> = ctx.reachable().iter().copied().skip(1).collect();
    let total = ctx.reachable().len();
    let mut cursor = 0;
    let mut ring = 1;
    while cursor < others.len() {
        let capacity = ring_capacity(total, ring);
        let count = capacity.min(others.len() - cursor);
        let radius = (m.spacing * RING_STEP * ring as f32)
            .max(capacity as f32 * m.spacing / TAU);
        for i in 0..count {
            let angle = slot_angle(i, count, ring as f32 * RING_STAGGER);
            placement.set_safely(ctx, others[cursor + i], m.center.polar(radius, angle));
        }
        cursor += count;
        ring += 1;
    }
    Ok(())
}

/// Archimedean spiral `r = a + b * theta` around the root, in input order,
/// with the angle advanced so consecutive nodes sit about one spacing apart.
pub(super) fn place_spiral_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    let m = &ctx.metrics;
    placement.set(ctx.root, m.center);

    let a = m.spacing;
    let b = m.spacing * SPIRAL_TURN_GAP / TAU;
    let mut theta = 0.0f32;
    let mut others: Vec<usize> = ctx
        .reachable()
        .iter()
        .copied()
        .filter(|&idx| idx != ctx.root)
        .collect();
    others.sort_unstable();
    for idx in others {
        let radius = a + b * theta;
        placement.set(idx, m.bounds.clamp(m.center.polar(radius, theta)));
        theta += (m.spacing / radius).clamp(0.05, 1.2);
    }
    Ok(())
}
