use crate::algorithms::common::{ExpansionLog, SearchResult};
use crate::geometry::heuristic_distance;
use crate::grid::Grid;
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

const MIN_EXPANSION_BUDGET: usize = 50_000;
const EXPANSIONS_PER_CELL: usize = 30;

/// Outcome of one bounded depth-first descent.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Descent {
    /// The goal was reached; the route is on the search stack.
    Found,
    /// Smallest `g + h` that exceeded the bound (infinite when nothing did).
    Bound(f64),
    /// The expansion budget ran out.
    Exhausted,
}

struct Deepening<'a> {
    grid: &'a Grid,
    end: usize,
    log: ExpansionLog,
    expansions: usize,
    budget: usize,
    on_path: FxHashSet<usize>,
    stack: Vec<usize>,
}

impl Deepening<'_> {
    fn estimate(&self, cell: usize) -> f64 {
        heuristic_distance(self.grid, cell, self.end)
    }

    fn descend(&mut self, node: usize, g: f64, bound: f64) -> Descent {
        let f = g + self.estimate(node);
        if f > bound {
            return Descent::Bound(f);
        }
        self.log.record(node);
        self.expansions += 1;
        if self.expansions > self.budget {
            return Descent::Exhausted;
        }
        if node == self.end {
            return Descent::Found;
        }

        let mut neighbors = self.grid.neighbors(node);
        neighbors.sort_by(|&a, &b| self.estimate(a).total_cmp(&self.estimate(b)));

        let mut next_bound = f64::INFINITY;
        for next in neighbors {
            if !self.on_path.insert(next) {
                continue;
            }
            self.stack.push(next);
            match self.descend(next, g + 1.0, bound) {
                Descent::Bound(t) => next_bound = next_bound.min(t),
                done => return done,
            }
            self.stack.pop();
            self.on_path.remove(&next);
        }
        Descent::Bound(next_bound)
    }
}

/// Iterative-deepening A*: repeated depth-first descents under a rising `g + h` bound,
/// neighbours tried closest-to-goal first.
///
/// Gives up, reporting no path, once the total number of expansions passes
/// `max(50_000, cells * 30)`.
pub fn ida_star(grid: &Grid) -> SearchResult {
    let (start, end) = (grid.start(), grid.end());
    let mut search = Deepening {
        grid,
        end,
        log: ExpansionLog::new(grid.len()),
        expansions: 0,
        budget: MIN_EXPANSION_BUDGET.max(grid.len() * EXPANSIONS_PER_CELL),
        on_path: FxHashSet::default(),
        stack: Vec::new(),
    };
    let mut threshold = heuristic_distance(grid, start, end);

    let path = loop {
        search.on_path.clear();
        search.on_path.insert(start);
        search.stack.clear();
        search.stack.push(start);
        match search.descend(start, 0.0, threshold) {
            Descent::Found => break std::mem::take(&mut search.stack),
            Descent::Bound(next) if next.is_finite() => {
                debug!(threshold = next, "ida* raising bound");
                threshold = next;
            }
            Descent::Bound(_) => break Vec::new(),
            Descent::Exhausted => {
                warn!(budget = search.budget, "ida* expansion budget exhausted");
                break Vec::new();
            }
        }
    };

    SearchResult::new(search.log.into_order(), path)
}
