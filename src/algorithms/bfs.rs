use crate::algorithms::common::SearchResult;
use crate::grid::Grid;
use crate::path::reconstruct;
use std::collections::VecDeque;

/// Breadth-first search. Cells are marked when enqueued so none is queued twice.
pub fn breadth_first(grid: &Grid) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    let mut came_from = vec![None; grid.len()];
    let mut visited = vec![false; grid.len()];
    let mut expanded = Vec::new();
    let mut queue = VecDeque::from([start]);
    visited[start] = true;

    while let Some(current) = queue.pop_front() {
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
            queue.push_back(next);
        }
    }

    SearchResult::new(expanded, reconstruct(&came_from, end, start))
}

/// One side of a bidirectional search.
struct Frontier {
    queue: VecDeque<usize>,
    depth: Vec<Option<usize>>,
    parent: Vec<Option<usize>>,
}

impl Frontier {
    fn rooted_at(root: usize, cells: usize) -> Self {
        let mut depth = vec![None; cells];
        depth[root] = Some(0);
        Frontier {
            queue: VecDeque::from([root]),
            depth,
            parent: vec![None; cells],
        }
    }

    /// Expands every cell of the current layer and records the cheapest cell where this
    /// side touches `other` as `(total_depth, cell)`.
    ///
    /// Whole layers are expanded so that the first touch is also the shortest one.
    fn expand_layer(
        &mut self,
        grid: &Grid,
        other: &Frontier,
        expanded: &mut Vec<usize>,
        meet: &mut Option<(usize, usize)>,
    ) {
        for _ in 0..self.queue.len() {
            let Some(current) = self.queue.pop_front() else {
                break;
            };
            expanded.push(current);
            let depth = self.depth[current].unwrap_or(0) + 1;
            for next in grid.neighbors(current) {
                if self.depth[next].is_some() {
                    continue;
                }
                self.depth[next] = Some(depth);
                self.parent[next] = Some(current);
                self.queue.push_back(next);
                if let Some(across) = other.depth[next] {
                    let total = depth + across;
                    if meet.map_or(true, |(best, _)| total < best) {
                        *meet = Some((total, next));
                    }
                }
            }
        }
    }

    /// Cells from `meet` back to this side's root, `meet` first.
    fn chain(&self, meet: usize, root: usize) -> Option<Vec<usize>> {
        let mut cells = vec![meet];
        let mut current = meet;
        while current != root {
            current = self.parent[current]?;
            cells.push(current);
        }
        Some(cells)
    }
}

/// Two breadth-first frontiers grown alternately, a layer at a time, from start and end.
///
/// Stops after the layer in which the frontiers first touch; if either side runs out of
/// cells before that, there is no path.
pub fn bidirectional(grid: &Grid) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    if start == end {
        return SearchResult::trivial(start);
    }
    let mut forward = Frontier::rooted_at(start, grid.len());
    let mut backward = Frontier::rooted_at(end, grid.len());
    let mut expanded = Vec::new();
    let mut meet = None;
    let mut forward_turn = true;

    while meet.is_none() && !forward.queue.is_empty() && !backward.queue.is_empty() {
        if forward_turn {
            forward.expand_layer(grid, &backward, &mut expanded, &mut meet);
        } else {
            backward.expand_layer(grid, &forward, &mut expanded, &mut meet);
        }
        forward_turn = !forward_turn;
    }

    let Some((_, meet)) = meet else {
        return SearchResult::new(expanded, Vec::new());
    };
    let path = match (forward.chain(meet, start), backward.chain(meet, end)) {
        (Some(mut left), Some(right)) => {
            left.reverse();
            left.extend(right.into_iter().skip(1));
            left
        }
        _ => Vec::new(),
    };
    SearchResult::new(expanded, path)
}
