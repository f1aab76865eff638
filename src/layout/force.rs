use super::*;

const REPULSION_BASE: f32 = 0.1;
const CLOSE_RANGE_BOOST: f32 = 3.0;
const MAX_STEP: f32 = 0.5;
const PAIR_BUDGET: f32 = 2.0e6;

fn force_iterations(node_count: usize, config: &LayoutConfig) -> usize {
    // Keep iterations * pairs roughly bounded on big graphs.
    let pairs = (node_count * node_count.saturating_sub(1) / 2).max(1) as f32;
    let affordable = (PAIR_BUDGET / pairs).ceil() as usize;
    config.relaxation.force_iterations.min(affordable.max(10))
}

/// Category sectors as the starting arrangement, then damped relaxation with
/// inverse-square repulsion between all pairs and a weak pull toward the
/// pinned root.
pub(super) fn place_force_directed_layout(
    ctx: &LayoutContext,
    placement: &mut Placement,
) -> Result<()> {
    place_category_sectors(ctx, placement, FanStyle::Plain)?;

    let members: Vec<usize> = ctx
        .reachable()
        .iter()
        .copied()
        .filter(|&idx| placement.is_placed(idx))
        .collect();
    let mut points: Vec<Point> = members
        .iter()
        .map(|&idx| placement.get(idx).unwrap_or(ctx.metrics.center))
        .collect();
    relax(ctx, &members, &mut points);
    for (&idx, &point) in members.iter().zip(&points) {
        placement.set(idx, point);
    }
    Ok(())
}

fn relax(ctx: &LayoutContext, members: &[usize], points: &mut [Point]) {
    let n = points.len();
    if n < 2 {
        return;
    }
    let m = &ctx.metrics;
    let relax_cfg = &ctx.config.relaxation;
    let k = REPULSION_BASE * relax_cfg.repulsion * m.spacing.powi(3);
    let damping = relax_cfg.force_damping.clamp(0.01, 1.0);
    let root = m.center;
    let iterations = force_iterations(n, ctx.config);
    let mut velocity = vec![(0.0f32, 0.0f32); n];
    let mut force = vec![(0.0f32, 0.0f32); n];

    for iter in 0..iterations {
        force.iter_mut().for_each(|f| *f = (0.0, 0.0));
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = points[i].x - points[j].x;
                let dy = points[i].y - points[j].y;
                let dist = (dx * dx + dy * dy).sqrt().max(1.0);
                let mut push = (k / (dist * dist)).min(m.spacing);
                if dist < m.min_distance {
                    push *= CLOSE_RANGE_BOOST;
                }
                let (ux, uy) = (dx / dist, dy / dist);
                force[i].0 += ux * push;
                force[i].1 += uy * push;
                force[j].0 -= ux * push;
                force[j].1 -= uy * push;
            }
        }
        let cooling = 1.0 - iter as f32 / iterations as f32;
        let max_step = m.spacing * MAX_STEP * cooling + 1.0;
        for i in 0..n {
            if members[i] == ctx.root {
                continue;
            }
            let pull_x = (root.x - points[i].x) * relax_cfg.attraction;
            let pull_y = (root.y - points[i].y) * relax_cfg.attraction;
            velocity[i].0 = (velocity[i].0 + force[i].0 + pull_x) * damping;
            velocity[i].1 = (velocity[i].1 + force[i].1 + pull_y) * damping;
            let speed = (velocity[i].0 * velocity[i].0 + velocity[i].1 * velocity[i].1).sqrt();
            let scale = if speed > max_step { max_step / speed } else { 1.0 };
            points[i] = m.bounds.clamp(Point::new(
                points[i].x + velocity[i].0 * scale,
                points[i].y + velocity[i].1 * scale,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_budget_shrinks_for_large_graphs() {
        let config = LayoutConfig::default();
        assert_eq!(force_iterations(10, &config), config.relaxation.force_iterations);
        assert!(force_iterations(1000, &config) < config.relaxation.force_iterations);
        assert!(force_iterations(100_000, &config) >= 10);
    }

    #[test]
    fn relaxation_pins_root_and_separates_crowded_nodes() {
        let mut nodes = vec![Node::new("hub", "Hub")];
        let mut edges = Vec::new();
        for i in 0..12 {
            let id = format!("n{i}");
            edges.push(Edge::new("hub", &id));
            nodes.push(Node::new(id.clone(), id));
        }
        let config = LayoutConfig::for_layout(LayoutType::ForceDirected);
        let ctx = LayoutContext::new(&nodes, &edges, &config);
        let mut placement = Placement::new(nodes.len(), config.seed);
        place_force_directed_layout(&ctx, &mut placement).unwrap();
        let center = placement.get(0).unwrap();
        assert_eq!(center, config.bounds.center());
        let points: Vec<Point> = (0..nodes.len()).map(|i| placement.get(i).unwrap()).collect();
        assert_eq!(count_overlaps(&points, ctx.metrics.min_distance), 0);
        // the pull keeps the cloud from drifting off
        assert!(points.iter().all(|p| p.distance(center) < ctx.metrics.spacing * 10.0));
    }
}
