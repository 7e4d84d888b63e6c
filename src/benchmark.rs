//! Timing comparison of every algorithm on one grid.

use crate::algorithms::Algorithm;
use crate::grid::Grid;
use serde::Serialize;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub key: &'static str,
    pub label: &'static str,
    pub explored_count: usize,
    /// Moves on the found path; 0 when no path was found.
    pub path_length: usize,
    pub median_time_ms: f64,
}

/// Median of `samples`; the mean of the two middle values for an even count, 0 when empty.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Benchmark {
    /// Timed runs per algorithm.
    pub runs: usize,
    /// `compare_all` hands progress back to its caller after this many algorithms.
    pub yield_every: usize,
}

impl Default for Benchmark {
    fn default() -> Self {
        Benchmark {
            runs: 5,
            yield_every: 3,
        }
    }
}

impl Benchmark {
    pub fn new(runs: usize) -> Self {
        Benchmark {
            runs,
            ..Self::default()
        }
    }

    /// One run for the explored/path metrics, one untimed warm-up, then `runs` timed runs.
    pub fn measure(&self, algorithm: Algorithm, grid: &Grid, seed: u32) -> Metric {
        let result = algorithm.run(grid, seed);
        let _ = algorithm.run(grid, seed);

        let samples: Vec<f64> = (0..self.runs)
            .map(|_| {
                let started = Instant::now();
                let _ = algorithm.run(grid, seed);
                started.elapsed().as_secs_f64() * 1_000.0
            })
            .collect();

        Metric {
            key: algorithm.key(),
            label: algorithm.label(),
            explored_count: result.expanded.len(),
            path_length: result.path_length(),
            median_time_ms: median(&samples),
        }
    }

    /// Lazily measures `algorithms` in order, one per `next()`.
    pub fn compare<'a>(
        &'a self,
        grid: &'a Grid,
        seed: u32,
        algorithms: &'a [Algorithm],
    ) -> Comparison<'a> {
        Comparison {
            benchmark: self,
            grid,
            seed,
            pending: algorithms.iter(),
        }
    }

    /// Measures every algorithm, calling `on_yield` with the metrics gathered so far after
    /// every `yield_every` algorithms so the caller can refresh its display.
    pub fn compare_all(
        &self,
        grid: &Grid,
        seed: u32,
        mut on_yield: impl FnMut(&[Metric]),
    ) -> Vec<Metric> {
        let every = self.yield_every.max(1);
        let mut metrics = Vec::with_capacity(Algorithm::ALL.len());
        for metric in self.compare(grid, seed, &Algorithm::ALL) {
            metrics.push(metric);
            if metrics.len() % every == 0 {
                on_yield(&metrics);
            }
        }
        info!(algorithms = metrics.len(), runs = self.runs, "comparison finished");
        metrics
    }
}

pub struct Comparison<'a> {
    benchmark: &'a Benchmark,
    grid: &'a Grid,
    seed: u32,
    pending: std::slice::Iter<'a, Algorithm>,
}

impl Iterator for Comparison<'_> {
    type Item = Metric;

    fn next(&mut self) -> Option<Metric> {
        let algorithm = *self.pending.next()?;
        Some(self.benchmark.measure(algorithm, self.grid, self.seed))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pending.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Position, Topology};

    #[test]
    fn median_handles_odd_even_and_empty() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn measure_reports_search_metrics() {
        let grid = Grid::new(
            5,
            5,
            Topology::Orthogonal,
            Position::new(0, 0),
            Position::new(4, 4),
            &[],
        )
        .unwrap();
        let metric = Benchmark::new(2).measure(Algorithm::Bfs, &grid, 1);
        assert_eq!(metric.key, "bfs");
        assert_eq!(metric.path_length, 8);
        assert_eq!(metric.explored_count, 25);
        assert!(metric.median_time_ms >= 0.0);
    }

    #[test]
    fn compare_all_yields_in_groups() {
        let grid = Grid::new(
            6,
            6,
            Topology::HexOddRow,
            Position::new(0, 0),
            Position::new(5, 5),
            &[],
        )
        .unwrap();
        let benchmark = Benchmark {
            runs: 1,
            yield_every: 3,
        };
        let mut progress = Vec::new();
        let metrics = benchmark.compare_all(&grid, 9, |so_far| progress.push(so_far.len()));
        assert_eq!(metrics.len(), Algorithm::ALL.len());
        assert_eq!(progress, vec![3, 6, 9, 12]);
        let keys: Vec<_> = metrics.iter().map(|m| m.key).collect();
        let expected: Vec<_> = Algorithm::ALL.iter().map(|a| a.key()).collect();
        assert_eq!(keys, expected);
    }
}
