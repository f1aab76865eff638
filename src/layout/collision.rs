// Pairwise spacing checks, safe-position probing and the global overlap
// relaxation that runs after every non-freeform layout.

use rand::Rng;

use super::{density_factor, node_extent};
use crate::config::{LayoutConfig, MAX_DIMENSION};
use crate::ir::Point;

const SAFE_DENSITY_REFERENCE: f32 = 60.0;
const SAFE_SCALE_MIN: f32 = 0.5;
const RANDOM_SAMPLES: usize = 30;
const OVERLAP_REFERENCE_NODES: f32 = 100.0;
const OVERLAP_MIN_ITERATIONS: usize = 5;
const OVERLAP_SCALE_MIN: f32 = 0.5;
const MAX_STEP_SHARE: f32 = 0.5;
// pairs are pushed a little past the minimum so they settle clear of it
const PUSH_SLACK: f32 = 1.05;

pub fn check_collision(a: Point, b: Point, min_distance: f32) -> bool {
    a.distance(b) < min_distance
}

/// Minimum centre distance two nodes should keep in a graph of
/// `node_count` nodes.
pub fn min_node_distance(node_count: usize, config: &LayoutConfig) -> f32 {
    let node = node_extent(config);
    let padding = if config.padding.is_finite() {
        config.padding.clamp(0.0, MAX_DIMENSION)
    } else {
        0.0
    };
    (node.width.max(node.height) * 0.5 + padding) * density_factor(node_count).max(OVERLAP_SCALE_MIN)
}

/// Number of node pairs closer than `min_distance`.
pub fn count_overlaps(positions: &[Point], min_distance: f32) -> usize {
    let mut count = 0;
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if check_collision(positions[i], positions[j], min_distance) {
                count += 1;
            }
        }
    }
    count
}

fn collides_with_any(point: Point, existing: &[Point], min_distance: f32) -> bool {
    existing
        .iter()
        .any(|&other| check_collision(point, other, min_distance))
}

/// Closest point to `desired` keeping `min_distance` from every point in
/// `existing`. The distance shrinks as `existing` grows. Always returns, even
/// when nothing free was found.
pub fn find_safe_position<R: Rng>(
    desired: Point,
    existing: &[Point],
    min_distance: f32,
    max_attempts: usize,
    config: &LayoutConfig,
    rng: &mut R,
) -> Point {
    let bounds = &config.bounds;
    let scale = (1.0 / (1.0 + existing.len() as f32 / SAFE_DENSITY_REFERENCE)).max(SAFE_SCALE_MIN);
    let distance = min_distance * scale;
    // the random fallback samples out to three times the distance
    if !(distance * 3.0).is_finite() || distance <= 0.0 {
        return bounds.clamp(desired);
    }

    let is_free = |p: Point| bounds.contains(p) && !collides_with_any(p, existing, distance);
    if is_free(desired) {
        return desired;
    }

    let angle_step = config.relaxation.spiral_angle_step;
    let mut angle = 0.0f32;
    for attempt in 1..=max_attempts {
        angle += angle_step;
        let radius = distance * 0.5 * attempt as f32;
        let candidate = bounds.clamp(desired.polar(radius, angle));
        if is_free(candidate) {
            return candidate;
        }
    }

    for _ in 0..RANDOM_SAMPLES {
        let radius = rng.gen_range(distance..distance * 3.0);
        let theta = rng.gen_range(0.0..std::f32::consts::TAU);
        let candidate = bounds.clamp(desired.polar(radius, theta));
        if is_free(candidate) {
            return candidate;
        }
    }

    let jitter = Point::new(
        rng.gen_range(-distance..distance),
        rng.gen_range(-distance..distance),
    );
    bounds.clamp(Point::new(desired.x + jitter.x, desired.y + jitter.y))
}

fn overlap_iterations(node_count: usize, config: &LayoutConfig) -> usize {
    let scale = (OVERLAP_REFERENCE_NODES / node_count.max(1) as f32).min(1.0);
    let scaled = (config.relaxation.overlap_iterations as f32 * scale).ceil() as usize;
    scaled.max(OVERLAP_MIN_ITERATIONS.min(config.relaxation.overlap_iterations))
}

/// Push apart every pair closer than the dynamic minimum distance, for a
/// bounded number of sweeps. Each sweep sums the pushes from all of a node's
/// overlapping neighbours against the positions at the start of the sweep, so
/// one move cannot shove a node into the next pair. Keeps the best
/// arrangement seen, so the overlap count never ends higher than it started.
/// Returns that count.
pub fn resolve_overlaps(positions: &mut [Point], config: &LayoutConfig) -> usize {
    let n = positions.len();
    let min_distance = min_node_distance(n, config);
    let mut best = count_overlaps(positions, min_distance);
    if best == 0 || n < 2 {
        return best;
    }
    let damping = config.relaxation.overlap_damping.clamp(0.01, 0.99);
    let max_step = min_distance * MAX_STEP_SHARE;
    let bounds = config.bounds;
    let mut best_positions = positions.to_vec();
    let mut deltas = vec![Point::default(); n];

    for _ in 0..overlap_iterations(n, config) {
        deltas.fill(Point::default());
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (positions[i], positions[j]);
                let distance = a.distance(b);
                if distance >= min_distance {
                    continue;
                }
                let (dx, dy) = if distance > 1e-3 {
                    ((b.x - a.x) / distance, (b.y - a.y) / distance)
                } else {
                    // Coincident: pick a direction from the pair itself.
                    let theta = ((i * 31 + j * 17) % 360) as f32 * std::f32::consts::PI / 180.0;
                    (theta.cos(), theta.sin())
                };
                let push = (min_distance * PUSH_SLACK - distance) * 0.5;
                deltas[i].x -= dx * push;
                deltas[i].y -= dy * push;
                deltas[j].x += dx * push;
                deltas[j].y += dy * push;
            }
        }
        for (point, delta) in positions.iter_mut().zip(&deltas) {
            let length = delta.x.hypot(delta.y) * damping;
            if length <= 0.0 {
                continue;
            }
            let factor = damping * (max_step / length).min(1.0);
            *point = bounds.clamp(Point::new(point.x + delta.x * factor, point.y + delta.y * factor));
        }
        let current = count_overlaps(positions, min_distance);
        if current <= best {
            best = current;
            best_positions.copy_from_slice(positions);
        }
        if current == 0 {
            break;
        }
    }

    positions.copy_from_slice(&best_positions);
    best
}
