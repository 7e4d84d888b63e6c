use crate::algorithms::{Algorithm, SearchResult};
use crate::benchmark::{Benchmark, Metric};
use crate::error::SessionError;
use crate::grid::Grid;
use crate::map::MapSpec;
use crate::playback::{Playback, TickOutcome, TickTicket};
use crate::statistics::RunSummary;
use std::time::Instant;
use tracing::info;

/// One open map: its grid, the playback showing the last run, and the planner seed.
///
/// New work is refused while the playback is playing; pause or stop it first.
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    playback: Playback,
    seed: u32,
    last: Option<(Algorithm, SearchResult)>,
}

impl Session {
    pub fn new(grid: Grid, seed: u32, batch_size: usize) -> Self {
        Session {
            grid,
            playback: Playback::new(batch_size),
            seed,
            last: None,
        }
    }

    pub fn from_map(map: &MapSpec, seed: u32, batch_size: usize) -> Result<Self, SessionError> {
        Ok(Self::new(map.into_grid()?, seed, batch_size))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn is_busy(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn last_run(&self) -> Option<(Algorithm, &SearchResult)> {
        self.last.as_ref().map(|(algorithm, result)| (*algorithm, result))
    }

    /// Runs `algorithm` and loads its events for playback, replacing any previous run.
    pub fn run(&mut self, algorithm: Algorithm) -> Result<RunSummary, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        self.playback.stop();
        let started = Instant::now();
        let result = algorithm.run(&self.grid, self.seed);
        let summary = RunSummary::new(algorithm, &result, started.elapsed());
        self.playback.load(&result, &self.grid);
        info!(
            algorithm = algorithm.key(),
            events = self.playback.len(),
            found = summary.found,
            "run loaded for playback"
        );
        self.last = Some((algorithm, result));
        Ok(summary)
    }

    pub fn play(&mut self) -> Result<TickTicket, SessionError> {
        Ok(self.playback.play()?)
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn toggle(&mut self) -> Result<Option<TickTicket>, SessionError> {
        Ok(self.playback.toggle()?)
    }

    pub fn tick(&mut self, ticket: TickTicket) -> TickOutcome {
        self.playback.tick(ticket)
    }

    pub fn seek(&mut self, target: usize) -> Result<usize, SessionError> {
        Ok(self.playback.seek(target)?)
    }

    pub fn stop(&mut self) {
        self.playback.stop();
    }

    /// Benchmarks every algorithm on the session's grid. The playback is cleared first.
    pub fn compare(
        &mut self,
        benchmark: &Benchmark,
        on_yield: impl FnMut(&[Metric]),
    ) -> Result<Vec<Metric>, SessionError> {
        if self.is_busy() {
            return Err(SessionError::Busy);
        }
        self.playback.stop();
        Ok(benchmark.compare_all(&self.grid, self.seed, on_yield))
    }
}
