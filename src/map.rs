use crate::error::MapError;
use crate::grid::{Grid, Position, Topology};
use pathfinding::prelude::bfs;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Map generation gives up after this many layouts with an unreachable end.
pub const MAX_GENERATION_ATTEMPTS: usize = 32;

/// The map record exchanged with the editor: coordinates are `(row, col)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSpec {
    pub width: usize,
    pub height: usize,
    pub start: (usize, usize),
    pub end: (usize, usize),
    #[serde(default)]
    pub obstacles: Vec<(usize, usize)>,
    #[serde(default)]
    pub topology: Topology,
}

impl MapSpec {
    /// Validates the record and builds the search grid from it.
    pub fn into_grid(&self) -> Result<Grid, MapError> {
        let obstacles: Vec<Position> =
            self.obstacles.iter().map(|&(r, c)| Position::new(r, c)).collect();
        let grid = Grid::new(
            self.height,
            self.width,
            self.topology,
            Position::new(self.start.0, self.start.1),
            Position::new(self.end.0, self.end.1),
            &obstacles,
        )?;
        if grid.start() == grid.end() {
            return Err(MapError::StartEqualsEnd);
        }
        Ok(grid)
    }

    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn from_json(text: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Random map with the start in the top-left quadrant and the end in the
    /// bottom-right one. Walls are scattered with at most `walls * 3` placement
    /// attempts; layouts whose end cannot be reached are thrown away.
    pub fn generate<R: Rng>(
        rows: usize,
        cols: usize,
        walls: usize,
        topology: Topology,
        rng: &mut R,
    ) -> Result<Self, MapError> {
        if rows == 0 || cols == 0 {
            return Err(MapError::EmptyGrid { rows, cols });
        }
        if rows.saturating_mul(cols) < 2 {
            return Err(MapError::StartEqualsEnd);
        }

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let start = (rng.gen_range(0..(rows / 2).max(1)), rng.gen_range(0..(cols / 2).max(1)));
            let end = (rng.gen_range(rows / 2..rows), rng.gen_range(cols / 2..cols));
            if start == end {
                continue;
            }

            let mut placed = FxHashSet::default();
            let mut obstacles = Vec::new();
            let mut tries = 0;
            while obstacles.len() < walls && tries < walls * 3 {
                let cell = (rng.gen_range(0..rows), rng.gen_range(0..cols));
                if cell != start && cell != end && placed.insert(cell) {
                    obstacles.push(cell);
                }
                tries += 1;
            }

            let map = MapSpec {
                width: cols,
                height: rows,
                start,
                end,
                obstacles,
                topology,
            };
            let grid = map.into_grid()?;
            if let Some(length) = reference_route_length(&grid) {
                debug!(attempt, walls = map.obstacles.len(), route = length, "generated map");
                return Ok(map);
            }
        }
        Err(MapError::Unreachable {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }
}

/// Fewest moves from start to end, computed with the `pathfinding` crate so it stays
/// independent of this crate's own searches. `None` when the end is unreachable.
pub fn reference_route_length(grid: &Grid) -> Option<usize> {
    bfs(&grid.start(), |&cell| grid.neighbors(cell), |&cell| cell == grid.end())
        .map(|route| route.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record() -> MapSpec {
        MapSpec {
            width: 5,
            height: 4,
            start: (0, 0),
            end: (3, 4),
            obstacles: vec![(1, 1), (2, 2)],
            topology: Topology::Orthogonal,
        }
    }

    #[test]
    fn json_uses_pair_arrays() {
        let json = serde_json::to_string(&record()).unwrap();
        assert!(json.contains("\"start\":[0,0]"));
        assert!(json.contains("\"obstacles\":[[1,1],[2,2]]"));
        assert_eq!(MapSpec::from_json(&json).unwrap(), record());
    }

    #[test]
    fn topology_defaults_to_hex() {
        let parsed =
            MapSpec::from_json(r#"{"width":3,"height":3,"start":[0,0],"end":[2,2]}"#).unwrap();
        assert_eq!(parsed.topology, Topology::HexOddRow);
        assert!(parsed.obstacles.is_empty());
    }

    #[test]
    fn rejects_bad_records() {
        let mut same = record();
        same.end = same.start;
        assert!(matches!(same.into_grid(), Err(MapError::StartEqualsEnd)));

        let mut outside = record();
        outside.obstacles.push((9, 9));
        assert!(matches!(outside.into_grid(), Err(MapError::ObstacleOutOfBounds { .. })));

        let mut empty = record();
        empty.width = 0;
        assert!(matches!(empty.into_grid(), Err(MapError::EmptyGrid { .. })));

        assert!(matches!(MapSpec::from_json("{"), Err(MapError::Parse(_))));
    }

    #[test]
    fn oversized_record_is_an_error() {
        let json = r#"{"width":8589934592,"height":8589934592,"start":[0,0],"end":[1,1]}"#;
        let map = MapSpec::from_json(json).unwrap();
        assert!(matches!(map.into_grid(), Err(MapError::TooLarge { .. })));

        let mut rng = StdRng::seed_from_u64(1);
        let generated = MapSpec::generate(usize::MAX, 3, 0, Topology::Orthogonal, &mut rng);
        assert!(matches!(generated, Err(MapError::TooLarge { .. })));
    }

    #[test]
    fn generated_maps_are_solvable_and_reproducible() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let first = MapSpec::generate(20, 20, 50, Topology::Orthogonal, &mut a).unwrap();
        let second = MapSpec::generate(20, 20, 50, Topology::Orthogonal, &mut b).unwrap();
        assert_eq!(first, second);
        assert!(first.start.0 < 10 && first.start.1 < 10);
        assert!(first.end.0 >= 10 && first.end.1 >= 10);
        assert!(first.obstacles.len() <= 50);
        let grid = first.into_grid().unwrap();
        assert!(reference_route_length(&grid).is_some());
    }

    #[test]
    fn reference_length_counts_moves() {
        let grid = record().into_grid().unwrap();
        assert_eq!(reference_route_length(&grid), Some(7));
    }

    #[test]
    fn save_and_load_through_a_file() {
        let name = format!("pathfinding-lab-map-{}.json", std::process::id());
        let path = std::env::temp_dir().join(name);
        record().save(&path).unwrap();
        assert_eq!(MapSpec::load(&path).unwrap(), record());
        let _ = fs::remove_file(&path);
    }
}
