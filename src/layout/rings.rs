use super::*;

const HEX_RING_STEP: f32 = 1.2;
const HEX_SIDES: usize = 6;
const FRACTAL_BASE: f32 = 0.8;
const FRACTAL_GROWTH: f32 = 1.5;
const FRACTAL_EXPONENTIAL_RINGS: usize = 6;
const GOLDEN_ANGLE: f32 = 2.399_963;
const GALAXY_ARMS: usize = 4;
const GALAXY_TWIST: f32 = 0.45;
const GALAXY_ARM_STEP: f32 = 0.9;
const MOLECULE_SHELL: usize = 6;
const MOLECULE_SHELL_TWIST: f32 = 0.5;
const MOLECULE_SHELL_STEP: f32 = 0.9;
const INNER_RADIUS: f32 = 1.2;
const OUTER_SHARE: f32 = 0.9;
const SWAY: f32 = 0.2;

/// Reachable nodes other than the root, breadth-first.
fn satellites(ctx: &LayoutContext) -> Vec<usize> {
    ctx.reachable()
        .iter()
        .copied()
        .filter(|&idx| idx != ctx.root)
        .collect()
}

/// Walk `others` ring by ring; ring `k` holds `6k` nodes. `spot` maps
/// (ring, slot, ring size) to a position.
fn fill_rings(
    ctx: &LayoutContext,
    placement: &mut Placement,
    others: &[usize],
    spot: impl Fn(usize, usize, usize) -> Point,
) {
    let mut cursor = 0;
    let mut ring = 1;
    while cursor < others.len() {
        let count = (HEX_SIDES * ring).min(others.len() - cursor);
        for slot in 0..count {
            placement.set_safely(ctx, others[cursor + slot], spot(ring, slot, count));
        }
        cursor += count;
        ring += 1;
    }
}

/// Point at `t` (0..6) along the perimeter of a hexagon with the given
/// circumradius, starting at the corner at `rotation`.
fn hexagon_perimeter(center: Point, radius: f32, rotation: f32, t: f32) -> Point {
    let side = t.floor();
    let frac = t - side;
    let step = TAU / HEX_SIDES as f32;
    let from = center.polar(radius, rotation + side * step);
    let to = center.polar(radius, rotation + (side + 1.0) * step);
    Point::new(from.x + (to.x - from.x) * frac, from.y + (to.y - from.y) * frac)
}

/// Root in the middle, then hexagonal rings of `6 * ring` nodes walked
/// along the hexagon's edges, each ring rotated a twelfth turn further.
pub(super) fn place_hexagonal_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    let m = &ctx.metrics;
    placement.set(ctx.root, m.center);
    let others = satellites(ctx);
    fill_rings(ctx, placement, &others, |ring, slot, count| {
        let radius = m.spacing * HEX_RING_STEP * ring as f32;
        let rotation = ring as f32 * PI / HEX_SIDES as f32;
        let t = HEX_SIDES as f32 * slot as f32 / count as f32;
        hexagon_perimeter(m.center, radius, rotation, t)
    });
    Ok(())
}

fn fractal_radius(spacing: f32, ring: usize) -> f32 {
    let capped = ring.min(FRACTAL_EXPONENTIAL_RINGS);
    let exponential = spacing * FRACTAL_BASE * FRACTAL_GROWTH.powi(capped as i32);
    // past the cap, rings keep a constant gap
    exponential + (ring - capped) as f32 * spacing * FRACTAL_GROWTH
}

/// Circular rings like the hexagonal layout, with radii growing by half
/// each ring for the first rings and the ring start turned by the golden
/// angle.
pub(super) fn place_fractal_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    let m = &ctx.metrics;
    placement.set(ctx.root, m.center);
    let others = satellites(ctx);
    fill_rings(ctx, placement, &others, |ring, slot, count| {
        let radius = fractal_radius(m.spacing, ring);
        m.center
            .polar(radius, slot_angle(slot, count, ring as f32 * GOLDEN_ANGLE))
    });
    Ok(())
}

/// Radial distance between successive turns, shrunk below `spacing * growth`
/// when `last` steps would carry the outermost node past the frame.
fn outward_step(m: &Metrics, growth: f32, last: f32) -> f32 {
    let reach = frame_radius(m) * OUTER_SHARE - m.spacing * (INNER_RADIUS + SWAY);
    (m.spacing * growth).min(reach / last.max(1.0)).max(0.0)
}

/// Round-robin over four spiral arms; each arm winds outward linearly with a
/// small sinusoidal wobble.
pub(super) fn place_galaxy_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    let m = &ctx.metrics;
    placement.set(ctx.root, m.center);
    let others = satellites(ctx);
    let last_along = (others.len().saturating_sub(1) / GALAXY_ARMS) as f32;
    let step = outward_step(m, GALAXY_ARM_STEP, last_along);
    for (i, idx) in others.into_iter().enumerate() {
        let arm = i % GALAXY_ARMS;
        let along = (i / GALAXY_ARMS) as f32;
        let angle = slot_angle(arm, GALAXY_ARMS, 0.0) + GALAXY_TWIST * along;
        let wobble = (along * 0.9).sin() * m.spacing * SWAY;
        let radius = m.spacing * INNER_RADIUS + step * along + wobble;
        placement.set_safely(ctx, idx, m.center.polar(radius, angle));
    }
    Ok(())
}

/// One pass over the satellites at ever increasing angle; every sixth node
/// starts a wider shell, with a cosine ripple on the radius.
pub(super) fn place_molecular_layout(ctx: &LayoutContext, placement: &mut Placement) -> Result<()> {
    let m = &ctx.metrics;
    placement.set(ctx.root, m.center);
    let others = satellites(ctx);
    let last_shell = (others.len().saturating_sub(1) / MOLECULE_SHELL) as f32;
    let step = outward_step(m, MOLECULE_SHELL_STEP, last_shell);
    for (i, idx) in others.into_iter().enumerate() {
        let shell = (i / MOLECULE_SHELL) as f32;
        let angle = slot_angle(i, MOLECULE_SHELL, shell * MOLECULE_SHELL_TWIST);
        let ripple = (i as f32 * 0.8).cos() * m.spacing * SWAY;
        let radius = m.spacing * INNER_RADIUS + step * shell + ripple;
        placement.set_safely(ctx, idx, m.center.polar(radius, angle));
    }
    Ok(())
}
