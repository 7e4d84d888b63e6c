//! Grid pathfinding lab: classic searches and sampling planners over 4- and
//! 6-connected grids, with a benchmark harness and a scrubbable playback engine.

pub mod algorithms;
pub mod benchmark;
pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod map;
pub mod path;
pub mod playback;
pub mod queue;
pub mod rng;
pub mod session;
pub mod statistics;
