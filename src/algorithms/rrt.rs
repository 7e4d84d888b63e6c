//! Rapidly-exploring random trees over grid cells.

use crate::algorithms::common::SearchResult;
use crate::geometry::{densify, heuristic_distance, line_of_sight};
use crate::grid::Grid;
use crate::path::reconstruct;
use crate::rng::Mulberry32;
use tracing::{debug, warn};

const STEP_SIZE: f64 = 2.0;
/// A tree node this close to the goal, with sight to it, completes the route.
const GOAL_TOLERANCE: f64 = 2.0;
const REWIRE_RADIUS: f64 = 6.0;
const COST_EPSILON: f64 = 1e-9;

const RRT_GOAL_BIAS: f64 = 0.12;
const RRT_MIN_ITERATIONS: usize = 2_500;
const RRT_STAR_GOAL_BIAS: f64 = 0.14;
const RRT_STAR_MIN_ITERATIONS: usize = 2_800;
const ITERATIONS_PER_CELL: usize = 2;

/// Moves from `from` towards `to` by at most `step` cells, rounding to the nearest cell.
///
/// Returns `from` when the two coincide or the rounded target leaves the grid.
pub fn steer(grid: &Grid, from: usize, to: usize, step: f64) -> usize {
    let (r1, c1) = grid.coords(from);
    let (r2, c2) = grid.coords(to);
    let dr = (r2 - r1) as f64;
    let dc = (c2 - c1) as f64;
    let len = (dr * dr + dc * dc).sqrt();
    if len < 1e-9 {
        return from;
    }
    let scale = (step / len).min(1.0);
    let row = (r1 as f64 + dr * scale + 0.5).floor() as isize;
    let col = (c1 as f64 + dc * scale + 0.5).floor() as isize;
    grid.index_at(row, col).unwrap_or(from)
}

/// First node in `nodes` closest to `target`.
fn nearest_node(grid: &Grid, nodes: &[usize], target: usize) -> usize {
    let mut best = nodes[0];
    let mut best_dist = heuristic_distance(grid, best, target);
    for &node in &nodes[1..] {
        let dist = heuristic_distance(grid, node, target);
        if dist < best_dist {
            best_dist = dist;
            best = node;
        }
    }
    best
}

fn sample(grid: &Grid, free: &[usize], rng: &mut Mulberry32, goal_bias: f64) -> usize {
    if rng.next_unit() < goal_bias {
        grid.end()
    } else {
        free[rng.next_index(free.len())]
    }
}

/// Growing tree rooted at the start cell.
struct Tree {
    nodes: Vec<usize>,
    parent: Vec<Option<usize>>,
    in_tree: Vec<bool>,
}

impl Tree {
    fn rooted_at(root: usize, cells: usize) -> Self {
        let mut in_tree = vec![false; cells];
        in_tree[root] = true;
        Tree {
            nodes: vec![root],
            parent: vec![None; cells],
            in_tree,
        }
    }

    /// Steers towards a fresh sample and returns `(nearest, candidate)` when the
    /// candidate is a new, traversable cell in sight of its nearest tree node.
    fn extend(
        &self,
        grid: &Grid,
        free: &[usize],
        rng: &mut Mulberry32,
        goal_bias: f64,
    ) -> Option<(usize, usize)> {
        let target = sample(grid, free, rng, goal_bias);
        let nearest = nearest_node(grid, &self.nodes, target);
        let candidate = steer(grid, nearest, target, STEP_SIZE);
        if candidate == nearest
            || grid.is_blocked(candidate)
            || !line_of_sight(grid, nearest, candidate)
            || self.in_tree[candidate]
        {
            return None;
        }
        Some((nearest, candidate))
    }

    fn insert(&mut self, node: usize, parent: usize) {
        self.in_tree[node] = true;
        self.parent[node] = Some(parent);
        self.nodes.push(node);
    }

    /// Route through the tree, expanded into adjacent cells.
    fn route(&self, grid: &Grid) -> Vec<usize> {
        densify(grid, &reconstruct(&self.parent, grid.end(), grid.start()))
    }
}

/// Plain RRT: stops as soon as a new node can see the goal from close range.
pub fn rrt(grid: &Grid, rng: &mut Mulberry32) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    if start == end {
        return SearchResult::trivial(start);
    }
    let free = grid.free_cells();
    let mut tree = Tree::rooted_at(start, grid.len());
    let mut expanded = Vec::new();
    let iterations = RRT_MIN_ITERATIONS.max(grid.len() * ITERATIONS_PER_CELL);

    for iteration in 0..iterations {
        let Some((nearest, node)) = tree.extend(grid, &free, rng, RRT_GOAL_BIAS) else {
            continue;
        };
        tree.insert(node, nearest);
        expanded.push(node);
        if node == end {
            debug!(iteration, nodes = tree.nodes.len(), "rrt reached goal");
            return SearchResult::new(expanded, tree.route(grid));
        }
        if heuristic_distance(grid, node, end) <= GOAL_TOLERANCE && line_of_sight(grid, node, end) {
            tree.insert(end, node);
            expanded.push(end);
            debug!(iteration, nodes = tree.nodes.len(), "rrt connected to goal");
            return SearchResult::new(expanded, tree.route(grid));
        }
    }

    warn!(iterations, nodes = tree.nodes.len(), "rrt iteration budget exhausted");
    SearchResult::new(expanded, Vec::new())
}

/// RRT*: each new node picks the cheapest visible parent within the rewire radius, and
/// nearby nodes are re-parented through it when that strictly lowers their cost.
///
/// Runs the whole iteration budget. If the goal was never connected, the tree node
/// with the lowest `cost + distance` that can see the goal is used instead.
pub fn rrt_star(grid: &Grid, rng: &mut Mulberry32) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    if start == end {
        return SearchResult::trivial(start);
    }
    let free = grid.free_cells();
    let mut tree = Tree::rooted_at(start, grid.len());
    let mut cost = vec![f64::INFINITY; grid.len()];
    cost[start] = 0.0;
    let mut expanded = Vec::new();
    let iterations = RRT_STAR_MIN_ITERATIONS.max(grid.len() * ITERATIONS_PER_CELL);

    for _ in 0..iterations {
        let Some((nearest, node)) = tree.extend(grid, &free, rng, RRT_STAR_GOAL_BIAS) else {
            continue;
        };

        let near: Vec<usize> = tree
            .nodes
            .iter()
            .copied()
            .filter(|&n| {
                heuristic_distance(grid, n, node) <= REWIRE_RADIUS && line_of_sight(grid, n, node)
            })
            .collect();

        let mut best_parent = nearest;
        let mut best_cost = cost[nearest] + heuristic_distance(grid, nearest, node);
        for &n in &near {
            let c = cost[n] + heuristic_distance(grid, n, node);
            if c < best_cost {
                best_cost = c;
                best_parent = n;
            }
        }
        tree.insert(node, best_parent);
        cost[node] = best_cost;
        expanded.push(node);

        for &n in &near {
            let rewired = cost[node] + heuristic_distance(grid, node, n);
            if n != start && rewired + COST_EPSILON < cost[n] && line_of_sight(grid, node, n) {
                tree.parent[n] = Some(node);
                cost[n] = rewired;
            }
        }

        if node != end
            && heuristic_distance(grid, node, end) <= GOAL_TOLERANCE
            && line_of_sight(grid, node, end)
        {
            let through = cost[node] + heuristic_distance(grid, node, end);
            if through < cost[end] {
                tree.parent[end] = Some(node);
                tree.in_tree[end] = true;
                cost[end] = through;
            }
        }
    }

    if tree.parent[end].is_none() {
        let fallback = tree
            .nodes
            .iter()
            .copied()
            .filter(|&n| n != end && line_of_sight(grid, n, end))
            .map(|n| (n, cost[n] + heuristic_distance(grid, n, end)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((node, score)) = fallback {
            warn!(node, score, "rrt* never reached the goal; using best visible tree node");
            tree.parent[end] = Some(node);
        }
    }

    SearchResult::new(expanded, tree.route(grid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Position, Topology};
    use crate::path::is_valid_path;

    fn walled(topology: Topology) -> Grid {
        let walls: Vec<Position> = (0..9).map(|r| Position::new(r, 6)).collect();
        Grid::new(12, 12, topology, Position::new(0, 0), Position::new(2, 11), &walls).unwrap()
    }

    #[test]
    fn steer_caps_the_step_and_stays_on_grid() {
        let grid = walled(Topology::Orthogonal);
        let from = grid.index(Position::new(5, 0));
        let (far, near) = (grid.index(Position::new(5, 11)), grid.index(Position::new(5, 1)));
        assert_eq!(steer(&grid, from, far, 2.0), grid.index(Position::new(5, 2)));
        assert_eq!(steer(&grid, from, near, 2.0), near);
        assert_eq!(steer(&grid, from, from, 2.0), from);
    }

    #[test]
    fn rrt_routes_are_valid_and_seeded() {
        for topology in [Topology::Orthogonal, Topology::HexOddRow] {
            let grid = walled(topology);
            let a = rrt(&grid, &mut Mulberry32::new(99));
            let b = rrt(&grid, &mut Mulberry32::new(99));
            assert_eq!(a, b);
            assert!(a.found());
            assert!(is_valid_path(&grid, &a.path));
        }
    }

    #[test]
    fn rrt_star_routes_are_valid_and_seeded() {
        let grid = walled(Topology::Orthogonal);
        let a = rrt_star(&grid, &mut Mulberry32::from_label("star"));
        let b = rrt_star(&grid, &mut Mulberry32::from_label("star"));
        assert_eq!(a, b);
        assert!(a.found());
        assert!(is_valid_path(&grid, &a.path));
    }

    #[test]
    fn separated_goal_has_no_route() {
        let walls: Vec<Position> = (0..6).map(|r| Position::new(r, 3)).collect();
        let grid = Grid::new(
            6,
            6,
            Topology::Orthogonal,
            Position::new(0, 0),
            Position::new(5, 5),
            &walls,
        )
        .unwrap();
        assert!(rrt(&grid, &mut Mulberry32::new(3)).path.is_empty());
        let star = rrt_star(&grid, &mut Mulberry32::new(3));
        assert!(star.path.is_empty());
        assert!(star.expanded.len() <= 18);
    }
}
