//! Jump point search restricted to the four axis directions.
//!
//! Horizontal runs stop at the goal or at a forced neighbour (a perpendicular cell that
//! opens up right after a blocked one). Vertical runs stop at the same conditions and
//! additionally at any cell from which a horizontal run would stop, so every turn of an
//! optimal four-connected route lands on a jump point.

use crate::algorithms::common::SearchResult;
use crate::geometry::{densify, heuristic_distance};
use crate::grid::Grid;
use crate::path::reconstruct;
use crate::queue::MinHeap;

const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

struct Jumper<'a> {
    grid: &'a Grid,
    goal: (isize, isize),
}

impl Jumper<'_> {
    fn open(&self, row: isize, col: isize) -> bool {
        !self.grid.is_blocked_at(row, col)
    }

    fn has_forced_neighbor(&self, row: isize, col: isize, dr: isize, dc: isize) -> bool {
        if dr == 0 {
            [-1, 1]
                .iter()
                .any(|&side| self.open(row + side, col) && !self.open(row + side, col - dc))
        } else {
            [-1, 1]
                .iter()
                .any(|&side| self.open(row, col + side) && !self.open(row - dr, col + side))
        }
    }

    /// Whether a horizontal run from `(row, col)` towards `dc` meets a stopping cell.
    fn horizontal_run_stops(&self, row: isize, mut col: isize, dc: isize) -> bool {
        col += dc;
        while self.open(row, col) {
            if (row, col) == self.goal || self.has_forced_neighbor(row, col, 0, dc) {
                return true;
            }
            col += dc;
        }
        false
    }

    /// Next jump point from `(row, col)` in direction `(dr, dc)`, if any.
    fn jump(&self, mut row: isize, mut col: isize, dr: isize, dc: isize) -> Option<usize> {
        row += dr;
        col += dc;
        while self.open(row, col) {
            if (row, col) == self.goal || self.has_forced_neighbor(row, col, dr, dc) {
                return self.grid.index_at(row, col);
            }
            if dr != 0
                && (self.horizontal_run_stops(row, col, 1)
                    || self.horizontal_run_stops(row, col, -1))
            {
                return self.grid.index_at(row, col);
            }
            row += dr;
            col += dc;
        }
        None
    }
}

/// Finds a route with four-direction jump point search.
///
/// # Arguments
///
/// * `grid` - The map to search. Only its row and column axes are scanned, whatever the
///   topology.
///
/// # Returns
///
/// A `SearchResult` whose `expanded` holds the jump points in the order they were closed
/// and whose `path` is densified into single moves, or empty when no route is found.
pub fn jump_point_search(grid: &Grid) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    let jumper = Jumper {
        grid,
        goal: grid.coords(end),
    };
    let mut came_from = vec![None; grid.len()];
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
        let (row, col) = grid.coords(current);
        for (dr, dc) in DIRECTIONS {
            let Some(jump_point) = jumper.jump(row, col, dr, dc) else {
                continue;
            };
            if closed[jump_point] {
                continue;
            }
            let tentative = g_score[current] + heuristic_distance(grid, current, jump_point);
            if tentative < g_score[jump_point] {
                g_score[jump_point] = tentative;
                came_from[jump_point] = Some(current);
                open.push(jump_point, tentative + heuristic_distance(grid, jump_point, end));
            }
        }
    }

    // Jump points share a row or column, so walking between them fills in straight runs.
    let jump_path = reconstruct(&came_from, end, start);
    SearchResult::new(expanded, densify(grid, &jump_path))
}
