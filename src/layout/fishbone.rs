use super::*;

pub(crate) const FISHBONE_CATEGORIES: [&str; 6] = [
    "People",
    "Process",
    "Equipment",
    "Materials",
    "Environment",
    "Management",
];

const BRANCH_START: f32 = 1.4;
const BRANCH_FAN: f32 = PI / 3.0;

/// Direction of branch `b`: six bones from straight up, through the left,
/// to straight down, 36 degrees apart.
fn branch_direction(branch: usize) -> (f32, f32) {
    let theta = (-90.0 + 36.0 * branch as f32).to_radians();
    (-theta.cos(), theta.sin())
}

/// The problem node in the middle, its causes strung along six angled bones
/// on the left side, deeper causes fanned out from each cause.
pub(super) fn place_fishbone_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    let m = &ctx.metrics;
    placement.set(ctx.root, m.center);

    let causes = ctx.children(ctx.root);
    let mut placed = Vec::with_capacity(causes.len());
    for (i, &idx) in causes.iter().enumerate() {
        let branch = i % FISHBONE_CATEGORIES.len();
        let slot = (i / FISHBONE_CATEGORIES.len()) as f32;
        let (dx, dy) = branch_direction(branch);
        let distance = m.spacing * (BRANCH_START + slot);
        let desired = Point::new(m.center.x + dx * distance, m.center.y + dy * distance);
        tracing::trace!(
            node = %ctx.nodes[idx].id,
            category = FISHBONE_CATEGORIES[branch],
            "fishbone cause"
        );
        placement.set_safely(ctx, idx, desired);
        placed.push((idx, dy.atan2(dx)));
    }
    for (idx, angle) in placed {
        fan_out_descendants(ctx, placement, idx, angle, BRANCH_FAN, FanStyle::Plain);
    }
    Ok(())
}
