use crate::algorithms::common::SearchResult;
use crate::geometry::{densify, heuristic_distance, line_of_sight};
use crate::grid::Grid;
use crate::queue::MinHeap;
use crate::rng::Mulberry32;
use tracing::debug;

const MIN_SAMPLES: usize = 260;
const MAX_SAMPLES: usize = 900;
/// Sample draws per grid cell, before clamping to the bounds above.
const SAMPLE_DENSITY: f64 = 0.1;
const NEIGHBORS_PER_NODE: usize = 12;

/// Roadmap node slots of the two endpoints.
const START_SLOT: usize = 0;
const END_SLOT: usize = 1;

/// Directed roadmap: `edges[i]` lists `(j, length)` for the nodes `i` connects to.
struct Roadmap {
    nodes: Vec<usize>,
    edges: Vec<Vec<(usize, f64)>>,
}

impl Roadmap {
    /// Links every node to its nearest visible nodes, up to the per-node limit.
    fn connect(grid: &Grid, nodes: Vec<usize>) -> Self {
        let edges = (0..nodes.len())
            .map(|i| {
                let mut by_distance: Vec<(usize, f64)> = (0..nodes.len())
                    .filter(|&j| j != i)
                    .map(|j| (j, heuristic_distance(grid, nodes[i], nodes[j])))
                    .collect();
                by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));
                by_distance
                    .into_iter()
                    .filter(|&(j, _)| line_of_sight(grid, nodes[i], nodes[j]))
                    .take(NEIGHBORS_PER_NODE)
                    .collect()
            })
            .collect();
        Roadmap { nodes, edges }
    }

    /// Dijkstra from `from` to `to` over roadmap slots; returns the slot sequence.
    fn shortest(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        let mut dist = vec![f64::INFINITY; self.nodes.len()];
        let mut prev = vec![None; self.nodes.len()];
        let mut done = vec![false; self.nodes.len()];
        let mut open = MinHeap::new();
        dist[from] = 0.0;
        open.push(from, 0.0);

        while let Some((slot, _)) = open.pop() {
            if done[slot] {
                continue;
            }
            done[slot] = true;
            if slot == to {
                break;
            }
            for &(next, length) in &self.edges[slot] {
                let candidate = dist[slot] + length;
                if candidate < dist[next] {
                    dist[next] = candidate;
                    prev[next] = Some(slot);
                    open.push(next, candidate);
                }
            }
        }

        prev[to]?;
        let mut slots = vec![to];
        let mut current = to;
        while let Some(p) = prev[current] {
            slots.push(p);
            current = p;
        }
        slots.reverse();
        Some(slots)
    }
}

/// Probabilistic roadmap: sample free cells, connect nearby visible pairs, then run
/// Dijkstra over the roadmap from start to end.
pub fn prm(grid: &Grid, rng: &mut Mulberry32) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    if start == end {
        return SearchResult::trivial(start);
    }
    let free = grid.free_cells();
    let mut used = vec![false; grid.len()];
    used[start] = true;
    used[end] = true;
    let mut nodes = vec![start, end];
    let mut expanded = Vec::new();

    let draws = ((grid.len() as f64 * SAMPLE_DENSITY) as usize).clamp(MIN_SAMPLES, MAX_SAMPLES);
    for _ in 0..draws {
        let cell = free[rng.next_index(free.len())];
        if used[cell] {
            continue;
        }
        used[cell] = true;
        nodes.push(cell);
        expanded.push(cell);
    }

    let roadmap = Roadmap::connect(grid, nodes);
    let edges: usize = roadmap.edges.iter().map(Vec::len).sum();
    debug!(nodes = roadmap.nodes.len(), edges, "prm roadmap built");

    let path = match roadmap.shortest(START_SLOT, END_SLOT) {
        Some(slots) => {
            let waypoints: Vec<usize> = slots.into_iter().map(|s| roadmap.nodes[s]).collect();
            densify(grid, &waypoints)
        }
        None => Vec::new(),
    };
    SearchResult::new(expanded, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Position, Topology};
    use crate::path::is_valid_path;

    #[test]
    fn roadmap_route_is_valid() {
        let walls: Vec<Position> = (2..14).map(|r| Position::new(r, 8)).collect();
        for topology in [Topology::Orthogonal, Topology::HexOddRow] {
            let grid = Grid::new(
                16,
                16,
                topology,
                Position::new(8, 0),
                Position::new(8, 15),
                &walls,
            )
            .unwrap();
            let result = prm(&grid, &mut Mulberry32::new(5));
            assert!(result.found());
            assert!(is_valid_path(&grid, &result.path));
        }
    }

    #[test]
    fn samples_are_unique_free_cells() {
        let grid = Grid::new(
            10,
            10,
            Topology::Orthogonal,
            Position::new(0, 0),
            Position::new(9, 9),
            &[Position::new(4, 4)],
        )
        .unwrap();
        let result = prm(&grid, &mut Mulberry32::new(11));
        let mut cells = result.expanded.clone();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), result.expanded.len());
        assert!(result
            .expanded
            .iter()
            .all(|&c| grid.is_free(c) && c != grid.start() && c != grid.end()));
    }

    #[test]
    fn same_seed_same_roadmap() {
        let grid = Grid::new(
            12,
            12,
            Topology::HexOddRow,
            Position::new(0, 0),
            Position::new(11, 11),
            &[Position::new(5, 5), Position::new(6, 6)],
        )
        .unwrap();
        assert_eq!(prm(&grid, &mut Mulberry32::new(8)), prm(&grid, &mut Mulberry32::new(8)));
    }
}
