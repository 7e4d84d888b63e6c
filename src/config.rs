use crate::error::ConfigError;
use crate::grid::Topology;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Grid pathfinding lab: run, replay and compare search algorithms",
    long_about = None
)]
pub struct Config {
    /// JSON map to load; a random map is generated when absent.
    #[arg(long)]
    pub map: Option<PathBuf>,

    #[arg(long, default_value_t = 20)]
    pub grid_size: usize,

    #[arg(long, default_value_t = 50)]
    pub num_walls: usize,

    /// Overrides the topology stored in the map file.
    #[arg(long, value_enum)]
    pub topology: Option<Topology>,

    /// Algorithm key, or "all" to compare every algorithm.
    #[arg(long, default_value = "a_star")]
    pub algorithm: String,

    /// Seed for map generation.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Text hashed into the seed of the sampling planners.
    #[arg(long, default_value = "pathfinding-lab")]
    pub planner_seed: String,

    #[arg(long, default_value_t = 5)]
    pub runs: usize,

    /// Playback events applied per tick.
    #[arg(long, default_value_t = 8)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Writes the map in use to this file.
    #[arg(long)]
    pub export_map: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        if self.runs == 0 {
            return Err(ConfigError::ZeroRuns);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }

    pub fn compares_all(&self) -> bool {
        self.algorithm == "all"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_runner() {
        let config = Config::parse_from(["pathfinding_lab"]);
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.num_walls, 50);
        assert_eq!(config.algorithm, "a_star");
        assert_eq!(config.runs, 5);
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.topology, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_topology_and_all() {
        let config =
            Config::parse_from(["pathfinding_lab", "--topology", "hex", "--algorithm", "all"]);
        assert_eq!(config.topology, Some(Topology::HexOddRow));
        assert!(config.compares_all());
    }

    #[test]
    fn zero_values_are_rejected() {
        let config = Config::parse_from(["pathfinding_lab", "--runs", "0"]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroRuns));
        let config = Config::parse_from(["pathfinding_lab", "--batch-size", "0"]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroBatchSize));
        let config = Config::parse_from(["pathfinding_lab", "--grid-size", "0"]);
        assert_eq!(config.validate(), Err(ConfigError::ZeroGridSize));
    }
}
