use crate::error::MapError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

/// Neighbour layout of the grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Topology {
    /// Four axis-aligned moves, no diagonals.
    #[serde(rename = "orthogonal")]
    Orthogonal,
    /// Six moves on an "odd-r" offset hex layout: odd rows are shifted right by half a cell.
    #[default]
    #[serde(rename = "hex", alias = "hex_odd_row")]
    #[value(name = "hex")]
    HexOddRow,
}

const ORTHOGONAL_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const HEX_EVEN_ROW_OFFSETS: [(isize, isize); 6] =
    [(-1, -1), (-1, 0), (0, -1), (0, 1), (1, -1), (1, 0)];
const HEX_ODD_ROW_OFFSETS: [(isize, isize); 6] =
    [(-1, 0), (-1, 1), (0, -1), (0, 1), (1, 0), (1, 1)];

impl Topology {
    /// Row/column offsets of the adjacent cells for a cell on `row`.
    pub fn offsets(self, row: usize) -> &'static [(isize, isize)] {
        match self {
            Topology::Orthogonal => &ORTHOGONAL_OFFSETS,
            Topology::HexOddRow if row % 2 == 0 => &HEX_EVEN_ROW_OFFSETS,
            Topology::HexOddRow => &HEX_ODD_ROW_OFFSETS,
        }
    }
}

/// Largest number of cells a grid may hold.
pub const MAX_CELLS: usize = 1 << 24;

/// Immutable obstacle view over a `rows x cols` index space.
///
/// Cells are addressed by `index = row * cols + col`. The start and end cells
/// are always traversable, even when the obstacle list flags them.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    topology: Topology,
    blocked: Vec<bool>,
    start: usize,
    end: usize,
}

impl Grid {
    /// Builds a grid, failing fast on an empty index space or out-of-range cells.
    ///
    /// `start == end` is accepted here; refusing coincident endpoints is the job of the
    /// map handoff layer (`MapSpec::into_grid`).
    pub fn new(
        rows: usize,
        cols: usize,
        topology: Topology,
        start: Position,
        end: Position,
        obstacles: &[Position],
    ) -> Result<Self, MapError> {
        if rows == 0 || cols == 0 {
            return Err(MapError::EmptyGrid { rows, cols });
        }
        let cells = match rows.checked_mul(cols) {
            Some(cells) if cells <= MAX_CELLS => cells,
            _ => return Err(MapError::TooLarge { rows, cols }),
        };
        for (what, pos) in [("start", start), ("end", end)] {
            if pos.row >= rows || pos.col >= cols {
                return Err(MapError::OutOfBounds {
                    what,
                    row: pos.row,
                    col: pos.col,
                    rows,
                    cols,
                });
            }
        }

        let mut blocked = vec![false; cells];
        for obstacle in obstacles {
            if obstacle.row >= rows || obstacle.col >= cols {
                return Err(MapError::ObstacleOutOfBounds {
                    row: obstacle.row,
                    col: obstacle.col,
                });
            }
            blocked[obstacle.row * cols + obstacle.col] = true;
        }

        Ok(Grid {
            rows,
            cols,
            topology,
            blocked,
            start: start.row * cols + start.col,
            end: end.row * cols + end.col,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    pub fn position(&self, index: usize) -> Position {
        Position {
            row: index / self.cols,
            col: index % self.cols,
        }
    }

    /// Signed row/column of a cell, for geometry that steps outside the grid.
    pub fn coords(&self, index: usize) -> (isize, isize) {
        ((index / self.cols) as isize, (index % self.cols) as isize)
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Index of `(row, col)`, or `None` when it falls outside the grid.
    pub fn index_at(&self, row: isize, col: isize) -> Option<usize> {
        if self.in_bounds(row, col) {
            Some(row as usize * self.cols + col as usize)
        } else {
            None
        }
    }

    pub fn is_blocked(&self, index: usize) -> bool {
        index != self.start && index != self.end && self.blocked[index]
    }

    /// Like [`Grid::is_blocked`], but anything outside the grid counts as blocked.
    pub fn is_blocked_at(&self, row: isize, col: isize) -> bool {
        match self.index_at(row, col) {
            Some(index) => self.is_blocked(index),
            None => true,
        }
    }

    pub fn is_free(&self, index: usize) -> bool {
        !self.is_blocked(index)
    }

    /// In-bounds, traversable cells adjacent to `index` under the grid's topology.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        let (row, col) = self.coords(index);
        self.topology
            .offsets(row as usize)
            .iter()
            .filter_map(|&(dr, dc)| self.index_at(row + dr, col + dc))
            .filter(|&next| self.is_free(next))
            .collect()
    }

    /// Whether `a` and `b` are one move apart, ignoring obstacles.
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        let (ar, ac) = self.coords(a);
        let (br, bc) = self.coords(b);
        self.topology
            .offsets(ar as usize)
            .iter()
            .any(|&(dr, dc)| ar + dr == br && ac + dc == bc)
    }

    /// Every traversable cell in index order, start and end included.
    pub fn free_cells(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.is_free(i)).collect()
    }

    pub fn obstacle_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_blocked(i)).count()
    }

    /// Text picture of the grid. `overlay` may replace the glyph of any non-obstacle cell.
    pub fn render_with(&self, overlay: impl Fn(usize) -> Option<char>) -> String {
        let mut out = String::with_capacity(self.len() * 2 + self.rows * 4);
        for row in 0..self.rows {
            if self.topology == Topology::HexOddRow && row % 2 == 1 {
                out.push(' ');
            }
            for col in 0..self.cols {
                let index = row * self.cols + col;
                let glyph = if index == self.start {
                    'S'
                } else if index == self.end {
                    'G'
                } else if self.is_blocked(index) {
                    '#'
                } else {
                    overlay(index).unwrap_or('.')
                };
                out.push(glyph);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(rows: usize, cols: usize, topology: Topology) -> Grid {
        Grid::new(
            rows,
            cols,
            topology,
            Position::new(0, 0),
            Position::new(rows - 1, cols - 1),
            &[],
        )
        .unwrap()
    }

    #[test]
    fn index_round_trips_through_position() {
        let grid = open(3, 7, Topology::Orthogonal);
        assert_eq!(grid.index(Position::new(2, 5)), 19);
        assert_eq!(grid.position(19), Position::new(2, 5));
    }

    #[test]
    fn orthogonal_corner_has_two_neighbors() {
        let grid = open(4, 4, Topology::Orthogonal);
        let mut n = grid.neighbors(0);
        n.sort();
        assert_eq!(n, vec![1, 4]);
        assert_eq!(grid.neighbors(5).len(), 4);
    }

    #[test]
    fn hex_neighbors_depend_on_row_parity() {
        let grid = open(5, 5, Topology::HexOddRow);
        // even row 2, col 2
        let mut even = grid.neighbors(grid.index(Position::new(2, 2)));
        even.sort();
        let expected: Vec<usize> = [(1, 1), (1, 2), (2, 1), (2, 3), (3, 1), (3, 2)]
            .iter()
            .map(|&(r, c)| grid.index(Position::new(r, c)))
            .collect();
        assert_eq!(even, expected);

        // odd row 1, col 2
        let mut odd = grid.neighbors(grid.index(Position::new(1, 2)));
        odd.sort();
        let expected: Vec<usize> = [(0, 2), (0, 3), (1, 1), (1, 3), (2, 2), (2, 3)]
            .iter()
            .map(|&(r, c)| grid.index(Position::new(r, c)))
            .collect();
        assert_eq!(odd, expected);
    }

    #[test]
    fn start_and_end_are_never_blocked() {
        let start = Position::new(0, 0);
        let end = Position::new(1, 1);
        let grid = Grid::new(2, 2, Topology::Orthogonal, start, end, &[start, end]).unwrap();
        assert!(!grid.is_blocked(0));
        assert!(!grid.is_blocked(3));
        assert!(grid.neighbors(1).contains(&3));
    }

    #[test]
    fn blocked_cells_are_not_neighbors() {
        let grid = Grid::new(
            3,
            3,
            Topology::Orthogonal,
            Position::new(0, 0),
            Position::new(2, 2),
            &[Position::new(0, 1)],
        )
        .unwrap();
        assert_eq!(grid.neighbors(0), vec![3]);
        assert!(grid.is_blocked_at(0, 1));
        assert!(grid.is_blocked_at(-1, 0));
        assert_eq!(grid.free_cells().len(), 8);
    }

    #[test]
    fn rejects_bad_dimensions_and_endpoints() {
        let origin = Position::new(0, 0);
        assert!(matches!(
            Grid::new(0, 3, Topology::Orthogonal, origin, origin, &[]),
            Err(MapError::EmptyGrid { .. })
        ));
        assert!(matches!(
            Grid::new(3, 3, Topology::Orthogonal, origin, Position::new(3, 0), &[]),
            Err(MapError::OutOfBounds { what: "end", .. })
        ));
        assert!(matches!(
            Grid::new(
                3,
                3,
                Topology::Orthogonal,
                origin,
                Position::new(2, 2),
                &[Position::new(5, 5)]
            ),
            Err(MapError::ObstacleOutOfBounds { row: 5, col: 5 })
        ));
    }

    #[test]
    fn rejects_oversized_dimensions() {
        let origin = Position::new(0, 0);
        assert!(matches!(
            Grid::new(usize::MAX, 2, Topology::Orthogonal, origin, origin, &[]),
            Err(MapError::TooLarge { .. })
        ));
        assert!(matches!(
            Grid::new(100_000, 100_000, Topology::HexOddRow, origin, origin, &[]),
            Err(MapError::TooLarge { rows: 100_000, cols: 100_000 })
        ));
        assert!(Grid::new(4096, 4096, Topology::Orthogonal, origin, origin, &[]).is_ok());
    }

    #[test]
    fn adjacency_matches_neighbor_offsets() {
        let grid = open(4, 4, Topology::HexOddRow);
        let centre = grid.index(Position::new(1, 1));
        assert!(grid.are_adjacent(centre, grid.index(Position::new(0, 2))));
        assert!(!grid.are_adjacent(centre, grid.index(Position::new(0, 0))));
    }

    #[test]
    fn render_marks_endpoints_and_walls() {
        let grid = Grid::new(
            2,
            3,
            Topology::Orthogonal,
            Position::new(0, 0),
            Position::new(1, 2),
            &[Position::new(0, 1)],
        )
        .unwrap();
        let picture = grid.render_with(|i| (i == 3).then_some('*'));
        assert_eq!(picture, "S # . \n* . G \n");
    }
}
