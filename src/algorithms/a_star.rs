use crate::algorithms::common::SearchResult;
use crate::geometry::heuristic_distance;
use crate::grid::Grid;
use crate::path::reconstruct;
use crate::queue::MinHeap;

/// Heuristic weight that turns the best-first core into uniform-cost search.
pub const DIJKSTRA_WEIGHT: f64 = 0.0;
/// Heuristic weight for plain, admissible A*.
pub const A_STAR_WEIGHT: f64 = 1.0;
/// Heuristic weight for the inflated, faster but inadmissible variant.
pub const WEIGHTED_A_STAR_WEIGHT: f64 = 1.8;

/// Best-first search ordered by `g + weight * h`, unit step cost.
///
/// Cells are closed on their first pop; stale heap entries for closed cells are skipped.
pub fn weighted(grid: &Grid, weight: f64) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    let mut came_from = vec![None; grid.len()];
    let mut g_score = vec![f64::INFINITY; grid.len()];
    let mut closed = vec![false; grid.len()];
    let mut expanded = Vec::new();
    let mut open = MinHeap::new();

    g_score[start] = 0.0;
    open.push(start, weight * heuristic_distance(grid, start, end));

    while let Some((current, _)) = open.pop() {
        if closed[current] {
            continue;
        }
        closed[current] = true;
        expanded.push(current);
        if current == end {
            break;
        }
        for next in grid.neighbors(current) {
            if closed[next] {
                continue;
            }
            let tentative = g_score[current] + 1.0;
            if tentative < g_score[next] {
                g_score[next] = tentative;
                came_from[next] = Some(current);
                open.push(next, tentative + weight * heuristic_distance(grid, next, end));
            }
        }
    }

    SearchResult::new(expanded, reconstruct(&came_from, end, start))
}

/// Finds the shortest route from the grid's start to its end with Dijkstra's algorithm.
///
/// # Arguments
///
/// * `grid` - The map to search, including its start, end and obstacles.
///
/// # Returns
///
/// A `SearchResult` whose `expanded` lists cells in the order they were closed and whose
/// `path` runs start to end, or is empty when the end cannot be reached.
pub fn dijkstra(grid: &Grid) -> SearchResult {
    weighted(grid, DIJKSTRA_WEIGHT)
}

/// Finds a route from the grid's start to its end using the A* algorithm.
///
/// # Arguments
///
/// * `grid` - The map to search.
///
/// # Returns
///
/// A `SearchResult` with the closed cells in order and the route, empty if none exists.
/// The route is the shortest one on orthogonal grids.
pub fn a_star(grid: &Grid) -> SearchResult {
    weighted(grid, A_STAR_WEIGHT)
}

/// A* with the heuristic scaled by [`WEIGHTED_A_STAR_WEIGHT`].
///
/// # Returns
///
/// A `SearchResult` like [`a_star`], usually after fewer expansions and possibly with a
/// longer route.
pub fn weighted_a_star(grid: &Grid) -> SearchResult {
    weighted(grid, WEIGHTED_A_STAR_WEIGHT)
}

/// Greedy best-first: ordered by the heuristic alone, each cell is queued at most once.
///
/// Cells are marked visited when discovered and never relaxed, so the route is usually
/// short but not guaranteed to be the shortest.
pub fn greedy_best_first(grid: &Grid) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    let mut came_from = vec![None; grid.len()];
    let mut visited = vec![false; grid.len()];
    let mut expanded = Vec::new();
    let mut open = MinHeap::new();

    visited[start] = true;
    open.push(start, heuristic_distance(grid, start, end));

    while let Some((current, _)) = open.pop() {
        expanded.push(current);
        if current == end {
            break;
        }
        for next in grid.neighbors(current) {
            if visited[next] {
                continue;
            }
            visited[next] = true;
            came_from[next] = Some(current);
            open.push(next, heuristic_distance(grid, next, end));
        }
    }

    SearchResult::new(expanded, reconstruct(&came_from, end, start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::bfs::breadth_first;
    use crate::grid::{Position, Topology};
    use crate::path::is_valid_path;

    fn maze() -> Grid {
        let walls: Vec<Position> = [
            (1, 0),
            (1, 1),
            (1, 2),
            (1, 3),
            (3, 1),
            (3, 2),
            (3, 3),
            (3, 4),
            (3, 5),
            (5, 0),
            (5, 1),
            (5, 3),
        ]
        .iter()
        .map(|&(r, c)| Position::new(r, c))
        .collect();
        Grid::new(
            7,
            6,
            Topology::Orthogonal,
            Position::new(0, 0),
            Position::new(6, 5),
            &walls,
        )
        .unwrap()
    }

    #[test]
    fn dijkstra_and_a_star_are_optimal_on_unit_grid() {
        let grid = maze();
        let shortest = breadth_first(&grid).path_length();
        for result in [dijkstra(&grid), a_star(&grid)] {
            assert!(is_valid_path(&grid, &result.path));
            assert_eq!(result.path_length(), shortest);
        }
    }

    #[test]
    fn inflated_heuristics_never_beat_a_star() {
        let grid = maze();
        let optimal = a_star(&grid).path_length();
        assert!(optimal <= weighted_a_star(&grid).path_length());
        assert!(optimal <= greedy_best_first(&grid).path_length());
    }

    #[test]
    fn a_star_explores_no_more_than_dijkstra() {
        let grid = Grid::new(
            12,
            12,
            Topology::Orthogonal,
            Position::new(0, 0),
            Position::new(11, 11),
            &[],
        )
        .unwrap();
        assert!(a_star(&grid).expanded.len() <= dijkstra(&grid).expanded.len());
    }

    #[test]
    fn expanded_cells_are_unique() {
        let grid = maze();
        for result in [weighted_a_star(&grid), greedy_best_first(&grid)] {
            let mut cells = result.expanded.clone();
            cells.sort();
            cells.dedup();
            assert_eq!(cells.len(), result.expanded.len());
        }
    }
}
