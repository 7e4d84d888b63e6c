use anyhow::{Context, Result};
use clap::Parser;
use pathfinding_lab::algorithms::Algorithm;
use pathfinding_lab::benchmark::Benchmark;
use pathfinding_lab::config::Config;
use pathfinding_lab::map::{reference_route_length, MapSpec};
use pathfinding_lab::playback::{EventKind, TickOutcome, TickTicket};
use pathfinding_lab::rng::hash_seed;
use pathfinding_lab::session::Session;
use pathfinding_lab::statistics::ComparisonTable;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::thread;
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    init_tracing();
    let config = Config::parse();
    config.validate()?;

    let map = load_map(&config)?;
    if let Some(path) = &config.export_map {
        map.save(path)
            .with_context(|| format!("exporting map to {}", path.display()))?;
    }

    let mut session = Session::from_map(&map, hash_seed(&config.planner_seed), config.batch_size)?;
    let grid = session.grid();
    if !config.quiet {
        println!("Grid: {}x{} ({:?})", grid.rows(), grid.cols(), grid.topology());
        println!("Obstacles: {}", grid.obstacle_count());
        match reference_route_length(grid) {
            Some(length) => println!("Optimal route: {} moves", length),
            None => println!("End is unreachable"),
        }
        println!();
    }

    if config.compares_all() {
        compare(&mut session, &config)
    } else {
        let algorithm: Algorithm = config.algorithm.parse()?;
        run_single(&mut session, algorithm, &config)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_map(config: &Config) -> Result<MapSpec> {
    let map = match &config.map {
        Some(path) => MapSpec::load(path)
            .with_context(|| format!("loading map from {}", path.display()))?,
        None => {
            let mut rng = match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            MapSpec::generate(
                config.grid_size,
                config.grid_size,
                config.num_walls,
                config.topology.unwrap_or_default(),
                &mut rng,
            )
            .context("generating a random map")?
        }
    };
    Ok(match config.topology {
        Some(topology) => map.with_topology(topology),
        None => map,
    })
}

fn compare(session: &mut Session, config: &Config) -> Result<()> {
    let benchmark = Benchmark::new(config.runs);
    let quiet = config.quiet;
    let metrics = session.compare(&benchmark, |so_far| {
        if !quiet {
            println!("Measured {}/{} algorithms...", so_far.len(), Algorithm::ALL.len());
        }
    })?;
    println!("\n=== ALGORITHM COMPARISON ===");
    print!("{}", ComparisonTable(&metrics));
    Ok(())
}

fn run_single(session: &mut Session, algorithm: Algorithm, config: &Config) -> Result<()> {
    let summary = session.run(algorithm)?;
    if config.no_visualization {
        println!("{}", summary);
        return Ok(());
    }

    info!(delay_ms = config.delay_ms, "starting playback");
    let ticket = session.play()?;
    let delay = Duration::from_millis(config.delay_ms);
    play_out(session, ticket, |session| {
        if !config.quiet {
            draw_frame(session);
        }
        thread::sleep(delay);
    });
    println!("{}", summary);
    Ok(())
}

/// Ticks the playback until it finishes or is paused, stopped or superseded.
/// Returns the number of ticks that advanced.
fn play_out(
    session: &mut Session,
    ticket: TickTicket,
    mut on_frame: impl FnMut(&Session),
) -> usize {
    let mut advanced = 0;
    loop {
        match session.tick(ticket) {
            TickOutcome::Advanced { .. } => {
                advanced += 1;
                on_frame(session);
            }
            TickOutcome::Finished { .. } => {
                on_frame(session);
                return advanced;
            }
            TickOutcome::Stale | TickOutcome::Inactive => return advanced,
        }
    }
}

fn draw_frame(session: &Session) {
    let marks = session.playback().marks();
    let frame = session.grid().render_with(|cell| match marks.get(cell).copied().flatten() {
        Some(EventKind::Path) => Some('*'),
        Some(EventKind::Explored) => Some('o'),
        None => None,
    });
    print!("\x1B[2J\x1B[1;1H");
    println!("{}", frame);
    println!("{}/{} events", session.playback().position(), session.playback().len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathfinding_lab::grid::{Grid, Position, Topology};
    use pathfinding_lab::playback::PlaybackStatus;

    fn session() -> Session {
        let grid = Grid::new(
            4,
            4,
            Topology::Orthogonal,
            Position::new(0, 0),
            Position::new(3, 3),
            &[],
        )
        .unwrap();
        let mut session = Session::new(grid, 1, 2);
        session.run(Algorithm::Bfs).unwrap();
        session
    }

    #[test]
    fn plays_to_the_end() {
        let mut session = session();
        let ticket = session.play().unwrap();
        let mut frames = 0;
        play_out(&mut session, ticket, |_| frames += 1);
        assert_eq!(session.playback().status(), PlaybackStatus::Finished);
        assert_eq!(session.playback().position(), session.playback().len());
        assert!(frames > 0);
    }

    #[test]
    fn paused_playback_is_not_restarted() {
        let mut session = session();
        let ticket = session.play().unwrap();
        session.pause();
        let advanced = play_out(&mut session, ticket, |_| {});
        assert_eq!(advanced, 0);
        assert_eq!(session.playback().status(), PlaybackStatus::Paused);
        assert_eq!(session.playback().position(), 0);
    }

    #[test]
    fn stopped_playback_ends_the_loop() {
        let mut session = session();
        let ticket = session.play().unwrap();
        session.stop();
        assert_eq!(play_out(&mut session, ticket, |_| {}), 0);
        assert_eq!(session.playback().status(), PlaybackStatus::Idle);
    }
}
