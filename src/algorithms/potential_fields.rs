use crate::algorithms::common::{ExpansionLog, SearchResult};
use crate::geometry::heuristic_distance;
use crate::grid::Grid;
use crate::rng::Mulberry32;
use rustc_hash::FxHashSet;
use tracing::warn;

/// Obstacles farther than this (per axis) exert no push.
const REPULSION_RADIUS: isize = 3;
const REPULSION_STRENGTH: f64 = 5.0;
const REVISIT_PENALTY: f64 = 2.0;
const TIE_EPSILON: f64 = 1e-9;
const STEPS_PER_CELL: usize = 6;

/// Sum of `5 / d²` over blocked cells in the square window of radius 3 around `cell`.
pub fn obstacle_repulsion(grid: &Grid, cell: usize) -> f64 {
    let (row, col) = grid.coords(cell);
    let mut repulsion = 0.0;
    for dr in -REPULSION_RADIUS..=REPULSION_RADIUS {
        for dc in -REPULSION_RADIUS..=REPULSION_RADIUS {
            if (dr, dc) == (0, 0) || !grid.in_bounds(row + dr, col + dc) {
                continue;
            }
            if grid.is_blocked_at(row + dr, col + dc) {
                repulsion += REPULSION_STRENGTH / (dr * dr + dc * dc) as f64;
            }
        }
    }
    repulsion
}

/// Greedy descent over an attractive goal field plus obstacle repulsion.
///
/// Ties at the best score are broken with `rng`. When no neighbour improves on the
/// current cell the walker hops to a random unvisited neighbour; with none left it
/// gives up. The walk is capped at `cells * 6` steps.
pub fn potential_fields(grid: &Grid, rng: &mut Mulberry32) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    let potential =
        |cell: usize| heuristic_distance(grid, cell, end) + obstacle_repulsion(grid, cell);

    let mut log = ExpansionLog::new(grid.len());
    let mut path = vec![start];
    let mut seen = FxHashSet::default();
    seen.insert(start);
    let mut current = start;

    for _ in 0..grid.len() * STEPS_PER_CELL {
        log.record(current);
        if current == end {
            break;
        }
        let neighbors = grid.neighbors(current);
        if neighbors.is_empty() {
            break;
        }

        let mut best_score = f64::INFINITY;
        let mut best = Vec::new();
        for &next in &neighbors {
            let penalty = if seen.contains(&next) { REVISIT_PENALTY } else { 0.0 };
            let score = potential(next) + penalty;
            if score < best_score - TIE_EPSILON {
                best_score = score;
                best.clear();
                best.push(next);
            } else if (score - best_score).abs() < TIE_EPSILON {
                best.push(next);
            }
        }

        let mut step = best[rng.next_index(best.len())];
        if best_score >= potential(current) {
            let unvisited: Vec<usize> =
                neighbors.into_iter().filter(|n| !seen.contains(n)).collect();
            if unvisited.is_empty() {
                warn!(cell = current, "potential field walk trapped in a local minimum");
                break;
            }
            step = unvisited[rng.next_index(unvisited.len())];
        }

        path.push(step);
        seen.insert(step);
        current = step;
    }

    if path.last() != Some(&end) {
        path.clear();
    }
    SearchResult::new(log.into_order(), path)
}
