//! The search and planning algorithms, and a registry that runs them by key.

pub mod a_star;
pub mod bfs;
pub mod common;
pub mod d_star_lite;
pub mod ida_star;
pub mod jps;
pub mod potential_fields;
pub mod prm;
pub mod rrt;
pub mod theta_star;

pub use common::SearchResult;

use crate::grid::Grid;
use crate::rng::Mulberry32;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bfs,
    BidirectionalBfs,
    Dijkstra,
    AStar,
    WeightedAStar,
    Greedy,
    ThetaStar,
    Jps,
    IdaStar,
    DStarLite,
    PotentialFields,
    Rrt,
    RrtStar,
    Prm,
}

impl Algorithm {
    pub const ALL: [Algorithm; 14] = [
        Algorithm::Bfs,
        Algorithm::BidirectionalBfs,
        Algorithm::Dijkstra,
        Algorithm::AStar,
        Algorithm::WeightedAStar,
        Algorithm::Greedy,
        Algorithm::ThetaStar,
        Algorithm::Jps,
        Algorithm::IdaStar,
        Algorithm::DStarLite,
        Algorithm::PotentialFields,
        Algorithm::Rrt,
        Algorithm::RrtStar,
        Algorithm::Prm,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::BidirectionalBfs => "bidirectional_bfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "a_star",
            Algorithm::WeightedAStar => "weighted_a_star",
            Algorithm::Greedy => "greedy",
            Algorithm::ThetaStar => "theta_star",
            Algorithm::Jps => "jps",
            Algorithm::IdaStar => "ida_star",
            Algorithm::DStarLite => "d_star_lite",
            Algorithm::PotentialFields => "potential_fields",
            Algorithm::Rrt => "rrt",
            Algorithm::RrtStar => "rrt_star",
            Algorithm::Prm => "prm",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::BidirectionalBfs => "Bidirectional BFS",
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::AStar => "A*",
            Algorithm::WeightedAStar => "Weighted A*",
            Algorithm::Greedy => "Greedy Best-First",
            Algorithm::ThetaStar => "Theta*",
            Algorithm::Jps => "Jump Point Search",
            Algorithm::IdaStar => "IDA*",
            Algorithm::DStarLite => "D* Lite (static)",
            Algorithm::PotentialFields => "Potential Fields",
            Algorithm::Rrt => "RRT",
            Algorithm::RrtStar => "RRT*",
            Algorithm::Prm => "PRM",
        }
    }

    /// Whether the algorithm draws from the seeded generator.
    pub fn is_sampling(self) -> bool {
        matches!(
            self,
            Algorithm::PotentialFields | Algorithm::Rrt | Algorithm::RrtStar | Algorithm::Prm
        )
    }

    /// Runs the algorithm on `grid`. `seed` only matters for sampling algorithms, each
    /// of which gets its own generator so runs never share random state.
    pub fn run(self, grid: &Grid, seed: u32) -> SearchResult {
        if grid.start() == grid.end() {
            return SearchResult::trivial(grid.start());
        }
        let mut rng = Mulberry32::new(seed);
        let result = match self {
            Algorithm::Bfs => bfs::breadth_first(grid),
            Algorithm::BidirectionalBfs => bfs::bidirectional(grid),
            Algorithm::Dijkstra => a_star::dijkstra(grid),
            Algorithm::AStar => a_star::a_star(grid),
            Algorithm::WeightedAStar => a_star::weighted_a_star(grid),
            Algorithm::Greedy => a_star::greedy_best_first(grid),
            Algorithm::ThetaStar => theta_star::theta_star(grid),
            Algorithm::Jps => jps::jump_point_search(grid),
            Algorithm::IdaStar => ida_star::ida_star(grid),
            Algorithm::DStarLite => d_star_lite::static_d_star_lite(grid),
            Algorithm::PotentialFields => potential_fields::potential_fields(grid, &mut rng),
            Algorithm::Rrt => rrt::rrt(grid, &mut rng),
            Algorithm::RrtStar => rrt::rrt_star(grid, &mut rng),
            Algorithm::Prm => prm::prm(grid, &mut rng),
        };
        debug!(
            algorithm = self.key(),
            explored = result.expanded.len(),
            path_len = result.path_length(),
            "search finished"
        );
        result
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown algorithm '{0}' (expected all, bfs, bidirectional_bfs, dijkstra, a_star, \
     weighted_a_star, greedy, theta_star, jps, ida_star, d_star_lite, potential_fields, rrt, \
     rrt_star or prm)"
)]
pub struct UnknownAlgorithm(pub String);

impl FromStr for Algorithm {
    type Err = UnknownAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.key() == s)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}
