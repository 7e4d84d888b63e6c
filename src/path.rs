use crate::geometry::heuristic_distance;
use crate::grid::Grid;

/// Extra steps allowed on top of the cell count before a parent chain is declared cyclic.
const CHAIN_SLACK: usize = 5;

/// Walks `parent` back from `end` to `start` and returns the path in forward order.
///
/// A missing link, or a chain longer than the grid could ever need, yields an empty
/// path instead of looping.
pub fn reconstruct(parent: &[Option<usize>], end: usize, start: usize) -> Vec<usize> {
    if start == end {
        return vec![start];
    }
    let mut path = vec![end];
    let mut current = end;
    let mut guard = 0;
    while current != start {
        if guard > parent.len() + CHAIN_SLACK {
            return Vec::new();
        }
        match parent.get(current).copied().flatten() {
            Some(prev) => {
                current = prev;
                path.push(current);
            }
            None => return Vec::new(),
        }
        guard += 1;
    }
    path.reverse();
    path
}

/// Number of moves in a path (cells minus one; zero for an empty path).
pub fn path_length(path: &[usize]) -> usize {
    path.len().saturating_sub(1)
}

/// Sum of straight-line step lengths along the path.
pub fn path_cost(grid: &Grid, path: &[usize]) -> f64 {
    path.windows(2)
        .map(|w| heuristic_distance(grid, w[0], w[1]))
        .sum()
}

/// Checks the shape every non-empty search path must have: starts at the grid start,
/// ends at the grid end, never enters an obstacle, and only takes single moves.
pub fn is_valid_path(grid: &Grid, path: &[usize]) -> bool {
    if path.is_empty() {
        return true;
    }
    path.first() == Some(&grid.start())
        && path.last() == Some(&grid.end())
        && path.iter().all(|&cell| grid.is_free(cell))
        && path.windows(2).all(|w| grid.are_adjacent(w[0], w[1]))
}
