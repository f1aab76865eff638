use super::*;

const FIRST_RING: f32 = 1.6;
const UNCATEGORIZED: &str = "";

/// Root's children bucketed by category, buckets in first-seen order.
pub(super) fn category_groups(ctx: &LayoutContext, members: &[usize]) -> Vec<Vec<usize>> {
    let mut keys: Vec<String> = Vec::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &idx in members {
        let key = ctx.nodes[idx]
            .data
            .category
            .as_deref()
            .map(|c| c.trim().to_ascii_lowercase())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        match keys.iter().position(|k| *k == key) {
            Some(pos) => groups[pos].push(idx),
            None => {
                keys.push(key);
                groups.push(vec![idx]);
            }
        }
    }
    groups
}

/// Root in the middle, its children in one angular sector per category,
/// deeper generations fanned outward from their parent.
pub(super) fn place_category_sectors(
    ctx: &LayoutContext,
    placement: &mut Placement,
    style: FanStyle,
) -> Result<()> {
    let m = &ctx.metrics;
    placement.set(ctx.root, m.center);
    let children = ctx.children(ctx.root);
    if children.is_empty() {
        return Ok(());
    }
    let groups = category_groups(ctx, children);
    let sector = TAU / groups.len() as f32;
    let ring = (m.spacing * FIRST_RING).max(children.len() as f32 * m.spacing / TAU);

    let mut placed_children = Vec::with_capacity(children.len());
    for (g, group) in groups.iter().enumerate() {
        let start = sector * g as f32;
        let count = group.len();
        let slot = sector / count as f32;
        for (j, &idx) in group.iter().enumerate() {
            let mut angle = start + slot * (j as f32 + 0.5);
            let mut radius = ring;
            match style {
                FanStyle::Plain => {}
                FanStyle::Jitter => {
                    angle += placement.rng.gen_range(-0.1..0.1) * slot;
                    radius += placement.rng.gen_range(-0.15..0.15) * m.spacing;
                }
                FanStyle::Wave => {
                    radius += (j as f32 * 1.3 + g as f32).sin() * m.spacing * 0.3;
                }
            }
            placement.set_safely(ctx, idx, m.center.polar(radius, angle));
            placed_children.push((idx, angle, slot));
        }
    }
    for (idx, angle, slot) in placed_children {
        fan_out_descendants(ctx, placement, idx, angle, slot.max(PI / 4.0), style);
    }
    Ok(())
}

/// Category sectors with per-node random jitter for a hand-drawn look.
pub(super) fn place_organic_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    place_category_sectors(ctx, placement, FanStyle::Jitter)
}

/// Category sectors with a sinusoidal radial offset per node.
pub(super) fn place_neural_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    place_category_sectors(ctx, placement, FanStyle::Wave)
}
