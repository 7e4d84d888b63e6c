//! Replayable, scrubbable timeline of a search.
//!
//! The engine never schedules anything itself. A driver (frame loop, timer, test)
//! calls [`Playback::tick`] with the [`TickTicket`] returned by [`Playback::play`];
//! every state change that should silence pending ticks bumps the generation, so a
//! ticket from before a pause, seek, reload or stop comes back as [`TickOutcome::Stale`].

use crate::algorithms::SearchResult;
use crate::error::PlaybackError;
use crate::grid::Grid;
use serde::Serialize;

pub const DEFAULT_BATCH_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Explored,
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackEvent {
    pub cell: usize,
    pub kind: EventKind,
}

/// Explored cells in visitation order, then path cells in route order.
/// The start and end cells are left out of both.
pub fn build_events(result: &SearchResult, grid: &Grid) -> Vec<PlaybackEvent> {
    let interior = |cell: &usize| *cell != grid.start() && *cell != grid.end();
    let explored = result.expanded.iter().filter(|c| interior(c)).map(|&cell| PlaybackEvent {
        cell,
        kind: EventKind::Explored,
    });
    let path = result.path.iter().filter(|c| interior(c)).map(|&cell| PlaybackEvent {
        cell,
        kind: EventKind::Path,
    });
    explored.chain(path).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Ready,
    Playing,
    Paused,
    Finished,
}

/// Permission for one chain of scheduled ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Events `from..to` were applied and more remain; schedule another tick.
    Advanced { from: usize, to: usize },
    /// Events `from..to` were applied and the timeline is complete.
    Finished { from: usize, to: usize },
    /// The ticket predates a pause, seek, reload or stop; nothing changed.
    Stale,
    /// The playback is not playing; nothing changed.
    Inactive,
}

#[derive(Debug, Clone)]
pub struct Playback {
    events: Vec<PlaybackEvent>,
    position: usize,
    status: PlaybackStatus,
    batch_size: usize,
    marks: Vec<Option<EventKind>>,
    generation: u64,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

impl Playback {
    pub fn new(batch_size: usize) -> Self {
        Playback {
            events: Vec::new(),
            position: 0,
            status: PlaybackStatus::Idle,
            batch_size: batch_size.max(1),
            marks: Vec::new(),
            generation: 0,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[PlaybackEvent] {
        &self.events
    }

    /// Rendered state: the mark of every cell after applying events `0..position`.
    pub fn marks(&self) -> &[Option<EventKind>] {
        &self.marks
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.batch_size = batch_size.max(1);
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Replaces the timeline with the events of `result` and rewinds to the start.
    pub fn load(&mut self, result: &SearchResult, grid: &Grid) {
        self.invalidate();
        self.events = build_events(result, grid);
        self.marks = vec![None; grid.len()];
        self.position = 0;
        self.status = PlaybackStatus::Ready;
    }

    /// Starts or resumes playing. A finished timeline restarts from position 0.
    pub fn play(&mut self) -> Result<TickTicket, PlaybackError> {
        if self.status == PlaybackStatus::Idle {
            return Err(PlaybackError::NothingLoaded);
        }
        if self.position >= self.events.len() {
            self.render_to(0);
        }
        self.invalidate();
        self.status = PlaybackStatus::Playing;
        Ok(TickTicket {
            generation: self.generation,
        })
    }

    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.invalidate();
            self.status = PlaybackStatus::Paused;
        }
    }

    /// Play/pause button: pauses a running playback, otherwise plays (restarting when finished).
    pub fn toggle(&mut self) -> Result<Option<TickTicket>, PlaybackError> {
        if self.is_playing() {
            self.pause();
            Ok(None)
        } else {
            self.play().map(Some)
        }
    }

    /// Applies the next batch of events.
    pub fn tick(&mut self, ticket: TickTicket) -> TickOutcome {
        if ticket.generation != self.generation {
            return TickOutcome::Stale;
        }
        if self.status != PlaybackStatus::Playing {
            return TickOutcome::Inactive;
        }
        let from = self.position;
        let to = (from + self.batch_size).min(self.events.len());
        for i in from..to {
            self.apply(i);
        }
        self.position = to;
        if to >= self.events.len() {
            self.status = PlaybackStatus::Finished;
            TickOutcome::Finished { from, to }
        } else {
            TickOutcome::Advanced { from, to }
        }
    }

    /// Jumps to `target` (clamped to the timeline) by replaying from scratch, and pauses.
    pub fn seek(&mut self, target: usize) -> Result<usize, PlaybackError> {
        if self.status == PlaybackStatus::Idle {
            return Err(PlaybackError::NothingLoaded);
        }
        self.invalidate();
        let target = target.min(self.events.len());
        self.render_to(target);
        self.status = PlaybackStatus::Paused;
        Ok(target)
    }

    /// Drops the timeline and returns to `Idle`; outstanding tickets become stale.
    pub fn stop(&mut self) {
        self.invalidate();
        self.events.clear();
        self.marks.clear();
        self.position = 0;
        self.status = PlaybackStatus::Idle;
    }

    fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    fn render_to(&mut self, target: usize) {
        self.marks.iter_mut().for_each(|m| *m = None);
        for i in 0..target {
            self.apply(i);
        }
        self.position = target;
    }

    fn apply(&mut self, index: usize) {
        let event = self.events[index];
        let Some(mark) = self.marks.get_mut(event.cell) else {
            return;
        };
        // a path mark is never downgraded back to explored
        if *mark != Some(EventKind::Path) {
            *mark = Some(event.kind);
        }
    }
}
