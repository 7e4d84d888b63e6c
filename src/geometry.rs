use crate::grid::Grid;

/// Straight-line distance between two cell centres in row/column units.
///
/// This is the single heuristic used by every informed search in the crate.
pub fn heuristic_distance(grid: &Grid, a: usize, b: usize) -> f64 {
    let (ar, ac) = grid.coords(a);
    let (br, bc) = grid.coords(b);
    let dr = (ar - br) as f64;
    let dc = (ac - bc) as f64;
    (dr * dr + dc * dc).sqrt()
}

/// Cells crossed by the segment `a -> b`, both endpoints included.
///
/// Each step moves along exactly one axis, picking the axis whose error term is
/// further behind, so consecutive cells are orthogonally adjacent. Axis moves are
/// adjacent under the hex topology too, which makes the walk usable for both.
pub fn line_walk(grid: &Grid, a: usize, b: usize) -> Vec<usize> {
    let (mut r, mut c) = grid.coords(a);
    let (r1, c1) = grid.coords(b);
    let dr = (r1 - r).abs();
    let dc = (c1 - c).abs();
    let sr = if r1 >= r { 1 } else { -1 };
    let sc = if c1 >= c { 1 } else { -1 };

    let mut cells = Vec::with_capacity((dr + dc + 1) as usize);
    cells.push(a);
    let (mut ir, mut ic) = (0, 0);
    while ir < dr || ic < dc {
        // Compare (0.5 + ic) / dc against (0.5 + ir) / dr without dividing.
        if (1 + 2 * ic) * dr < (1 + 2 * ir) * dc {
            c += sc;
            ic += 1;
        } else {
            r += sr;
            ir += 1;
        }
        cells.push(r as usize * grid.cols() + c as usize);
    }
    cells
}

/// True when no cell strictly between `a` and `b` on the [`line_walk`] is blocked.
pub fn line_of_sight(grid: &Grid, a: usize, b: usize) -> bool {
    line_walk(grid, a, b)
        .into_iter()
        .filter(|&cell| cell != a && cell != b)
        .all(|cell| grid.is_free(cell))
}

/// Expands a waypoint path into a step-by-step path by walking each segment.
///
/// Adjacent waypoints are kept as a single move, so a hex diagonal never detours
/// through the cell beside it. Other pairs must have line of sight for the result to
/// avoid obstacles.
pub fn densify(grid: &Grid, waypoints: &[usize]) -> Vec<usize> {
    let Some(&first) = waypoints.first() else {
        return Vec::new();
    };
    let mut dense = vec![first];
    for pair in waypoints.windows(2) {
        if grid.are_adjacent(pair[0], pair[1]) {
            dense.push(pair[1]);
        } else {
            dense.extend(line_walk(grid, pair[0], pair[1]).into_iter().skip(1));
        }
    }
    dense
}
