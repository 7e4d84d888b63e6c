use thiserror::Error;

/// Problems with a map handed over by the editor or produced by the generator.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("a {rows}x{cols} grid exceeds the supported cell count")]
    TooLarge { rows: usize, cols: usize },

    #[error("{what} ({row}, {col}) lies outside the {rows}x{cols} grid")]
    OutOfBounds {
        what: &'static str,
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("start and end must be different cells")]
    StartEqualsEnd,

    #[error("obstacle ({row}, {col}) lies outside the grid")]
    ObstacleOutOfBounds { row: usize, col: usize },

    #[error("could not generate a solvable map after {attempts} attempts")]
    Unreachable { attempts: usize },

    #[error("malformed map record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("map file i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no search result is loaded")]
    NothingLoaded,
}

#[derive(Debug, Error)]
pub enum SessionError {
    /// A playback is currently playing; pause or stop it before starting new work.
    #[error("a playback is still running")]
    Busy,

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

/// Command-line values the runner cannot work with.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("--grid-size must be at least 1")]
    ZeroGridSize,

    #[error("--runs must be at least 1")]
    ZeroRuns,

    #[error("--batch-size must be at least 1")]
    ZeroBatchSize,
}
