use crate::algorithms::common::SearchResult;
use crate::geometry::{densify, heuristic_distance, line_of_sight};
use crate::grid::Grid;
use crate::path::reconstruct;
use crate::queue::MinHeap;

/// Any-angle A*: a neighbour is attached straight to the current cell's parent whenever
/// that parent can see it, which pulls routes off the grid axes.
///
/// The waypoint path is densified so consecutive cells stay adjacent.
pub fn theta_star(grid: &Grid) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    let mut parent: Vec<Option<usize>> = vec![None; grid.len()];
    let mut g_score = vec![f64::INFINITY; grid.len()];
    let mut closed = vec![false; grid.len()];
    let mut expanded = Vec::new();
    let mut open = MinHeap::new();

    g_score[start] = 0.0;
    open.push(start, heuristic_distance(grid, start, end));

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
            let mut best_parent = current;
            let mut best_cost = g_score[current] + 1.0;
            if let Some(grandparent) = parent[current] {
                if line_of_sight(grid, grandparent, next) {
                    let shortcut =
                        g_score[grandparent] + heuristic_distance(grid, grandparent, next);
                    if shortcut < best_cost {
                        best_cost = shortcut;
                        best_parent = grandparent;
                    }
                }
            }
            if best_cost < g_score[next] {
                g_score[next] = best_cost;
                parent[next] = Some(best_parent);
                open.push(next, best_cost + heuristic_distance(grid, next, end));
            }
        }
    }

    let waypoints = reconstruct(&parent, end, start);
    SearchResult::new(expanded, densify(grid, &waypoints))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Position, Topology};
    use crate::path::{is_valid_path, path_cost};

    fn grid(
        topology: Topology,
        (rows, cols): (usize, usize),
        start: (usize, usize),
        end: (usize, usize),
        walls: &[Position],
    ) -> Grid {
        Grid::new(
            rows,
            cols,
            topology,
            Position::new(start.0, start.1),
            Position::new(end.0, end.1),
            walls,
        )
        .unwrap()
    }

    #[test]
    fn open_field_route_is_valid() {
        for topology in [Topology::Orthogonal, Topology::HexOddRow] {
            let grid = grid(topology, (9, 9), (8, 0), (0, 7), &[]);
            let result = theta_star(&grid);
            assert!(result.found());
            assert!(is_valid_path(&grid, &result.path));
        }
    }

    #[test]
    fn hex_diagonal_between_walls_is_taken_directly() {
        let walls = [Position::new(1, 2), Position::new(2, 1)];
        let grid = grid(Topology::HexOddRow, (3, 3), (2, 2), (1, 1), &walls);
        let result = theta_star(&grid);
        assert_eq!(result.path, vec![grid.start(), grid.end()]);
        assert!(is_valid_path(&grid, &result.path));
    }

    #[test]
    fn hex_routes_through_scattered_walls_stay_valid() {
        let walls: Vec<Position> = [(1, 1), (1, 3), (2, 2), (3, 1), (3, 4), (4, 3), (5, 2), (5, 5)]
            .iter()
            .map(|&(r, c)| Position::new(r, c))
            .collect();
        let grid = grid(Topology::HexOddRow, (7, 7), (0, 0), (6, 6), &walls);
        let result = theta_star(&grid);
        assert!(result.found());
        assert!(is_valid_path(&grid, &result.path));
    }

    #[test]
    fn detours_around_a_wall() {
        let walls: Vec<Position> = (0..6).map(|r| Position::new(r, 4)).collect();
        let grid = grid(Topology::Orthogonal, (8, 9), (0, 0), (0, 8), &walls);
        let result = theta_star(&grid);
        assert!(is_valid_path(&grid, &result.path));
        assert!(result.path.iter().any(|&c| grid.position(c).row >= 6));
        assert!(path_cost(&grid, &result.path) >= 8.0);
    }

    #[test]
    fn sealed_goal_has_no_route() {
        let walls = [Position::new(0, 1), Position::new(1, 1), Position::new(1, 0)];
        let grid = grid(Topology::Orthogonal, (4, 4), (3, 3), (0, 0), &walls);
        let result = theta_star(&grid);
        assert!(result.path.is_empty());
        assert!(result.expanded.len() <= 12);
    }
}
