use crate::algorithms::{Algorithm, SearchResult};
use crate::benchmark::Metric;
use std::fmt;
use std::time::Duration;

/// What the runner reports after one algorithm has been loaded for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub label: &'static str,
    pub explored: usize,
    pub path_length: usize,
    pub found: bool,
    pub compute: Duration,
    pub note: Option<String>,
}

impl RunSummary {
    pub fn new(algorithm: Algorithm, result: &SearchResult, compute: Duration) -> Self {
        RunSummary {
            label: algorithm.label(),
            explored: result.expanded.len(),
            path_length: result.path_length(),
            found: result.found(),
            compute,
            note: result.note.clone(),
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.found {
            write!(
                f,
                "{} finished. Explored {} nodes, path length {}.",
                self.label, self.explored, self.path_length
            )?;
        } else {
            write!(f, "{}: no path found after exploring {} nodes.", self.label, self.explored)?;
        }
        write!(f, " Compute {:.2?}.", self.compute)?;
        if let Some(note) = &self.note {
            write!(f, " {}", note)?;
        }
        Ok(())
    }
}

/// Comparison printout: one row per metric, then the best-path and fastest lines.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonTable<'a>(pub &'a [Metric]);

impl fmt::Display for ComparisonTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<20} {:>10} {:>12} {:>12}",
            "Algorithm", "Explored", "Path length", "Median ms"
        )?;
        writeln!(f, "{}", "-".repeat(57))?;
        for metric in self.0 {
            let path = if metric.path_length > 0 {
                metric.path_length.to_string()
            } else {
                "-".to_string()
            };
            writeln!(
                f,
                "{:<20} {:>10} {:>12} {:>12.3}",
                metric.label, metric.explored_count, path, metric.median_time_ms
            )?;
        }

        let shortest = self
            .0
            .iter()
            .filter(|m| m.path_length > 0)
            .min_by_key(|m| m.path_length);
        if let Some(best) = shortest {
            writeln!(f, "Shortest path: {} ({} moves)", best.label, best.path_length)?;
        }
        let fastest = self
            .0
            .iter()
            .min_by(|a, b| a.median_time_ms.total_cmp(&b.median_time_ms));
        if let Some(best) = fastest {
            writeln!(f, "Fastest: {} ({:.3} ms)", best.label, best.median_time_ms)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_mentions_counts() {
        let result = SearchResult::new(vec![0, 1, 2, 3], vec![0, 1, 3]);
        let summary = RunSummary::new(Algorithm::AStar, &result, Duration::from_millis(2));
        let text = summary.to_string();
        assert!(text.starts_with("A* finished. Explored 4 nodes, path length 2."));
    }

    #[test]
    fn summary_reports_failure_and_note() {
        let result = SearchResult::new(vec![0, 1], Vec::new()).with_note("budget exhausted");
        let text = RunSummary::new(Algorithm::IdaStar, &result, Duration::ZERO).to_string();
        assert!(text.contains("no path found after exploring 2 nodes"));
        assert!(text.ends_with("budget exhausted"));
    }

    #[test]
    fn table_picks_shortest_and_fastest() {
        let metrics = vec![
            Metric {
                key: "bfs",
                label: "BFS",
                explored_count: 40,
                path_length: 8,
                median_time_ms: 0.2,
            },
            Metric {
                key: "greedy",
                label: "Greedy Best-First",
                explored_count: 9,
                path_length: 10,
                median_time_ms: 0.05,
            },
            Metric {
                key: "rrt",
                label: "RRT",
                explored_count: 100,
                path_length: 0,
                median_time_ms: 0.01,
            },
        ];
        let text = ComparisonTable(&metrics).to_string();
        assert!(text.contains("Shortest path: BFS (8 moves)"));
        assert!(text.contains("Fastest: RRT"));
        assert_eq!(text.lines().count(), 2 + 3 + 2);
    }
}
