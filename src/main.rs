//! Headless harness
//!
//! Plays the simulation with a scripted autopilot, or runs a timed benchmark
//! against a prepared scene and reports frame-time statistics.
//!
//! Usage:
//!   space-impact [--duration SEC]
//!   space-impact --benchmark [--duration SEC] [--warmup SEC] [--density 0-100] [--json]

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use space_impact::consts::SCREEN_HEIGHT;
use space_impact::sim::{self, Direction, GameRng, SimulationState};
use space_impact::{FixedStep, FrameStats, Settings};

#[derive(Parser, Debug)]
#[command(name = "space-impact", version)]
#[command(about = "Headless side-scrolling shooter simulation and benchmark")]
struct Args {
    /// Run the sustained-load benchmark instead of an autopilot game
    #[arg(long)]
    benchmark: bool,

    /// Seconds to run (wall clock for benchmarks, game time otherwise)
    #[arg(long)]
    duration: Option<f32>,

    /// Unmeasured seconds before the benchmark starts recording
    #[arg(long)]
    warmup: Option<f32>,

    /// Benchmark pool occupancy in percent (clamped to 0..=100)
    #[arg(long, allow_negative_numbers = true)]
    density: Option<i32>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

/// Outcome of an autopilot game
#[derive(Debug, Serialize)]
struct RunSummary {
    score: u32,
    level: u32,
    lives: u32,
    ticks: u64,
    game_over: bool,
    sim_secs: f32,
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    log::info!("Space Impact starting (seed {:#x})", settings.seed);

    let mut rng = sim::seeded_rng(settings.seed);
    let mut state = SimulationState::new();

    if args.benchmark {
        let stats = run_benchmark(&mut state, &mut rng, &settings)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            println!("\nBenchmark results\n{}", stats);
        }
    } else {
        let summary = run_autopilot(&mut state, &mut rng, &settings)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!(
                "Score: {}  Level: {}  Lives: {}  Ticks: {}{}",
                summary.score,
                summary.level,
                summary.lives,
                summary.ticks,
                if summary.game_over { "  (game over)" } else { "" }
            );
        }
    }

    Ok(())
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Settings::default(),
    };

    if let Some(duration) = args.duration {
        settings.duration_secs = duration;
    }
    if let Some(warmup) = args.warmup {
        settings.warmup_secs = warmup;
    }
    if let Some(density) = args.density {
        settings.density = density;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    Ok(settings.sanitized())
}

/// Sweep up and down the playfield while holding the trigger
fn autopilot(state: &mut SimulationState) {
    let player = &mut state.player;
    let top = player.size.y / 2.0;
    let bottom = SCREEN_HEIGHT - player.size.y;
    player.direction = match player.direction {
        Direction::Up if player.pos.y <= top => Direction::Down,
        Direction::Down if player.pos.y >= bottom => Direction::Up,
        Direction::Up | Direction::Down => player.direction,
        _ => Direction::Down,
    };
    sim::fire(state);
}

/// Real-time autopilot game: frames are paced at the fixed step and the
/// accumulator turns wall time into simulation steps
fn run_autopilot(state: &mut SimulationState, rng: &mut GameRng, settings: &Settings) -> Result<RunSummary> {
    sim::init(state);
    let mut clock = FixedStep::new(settings.fixed_dt, settings.max_substeps);
    let frame = Duration::from_secs_f32(settings.fixed_dt);
    let mut sim_secs = 0.0f32;
    let mut last = Instant::now();

    log::info!("Autopilot run for {:.1}s of game time", settings.duration_secs);
    while !state.game_over && sim_secs < settings.duration_secs {
        thread::sleep(frame);
        let now = Instant::now();
        let elapsed = now.duration_since(last).as_secs_f32();
        last = now;

        let steps = clock.advance(elapsed, |dt| {
            autopilot(state);
            sim::step(state, rng, dt)
        })?;
        sim_secs += steps as f32 * clock.dt();
    }

    Ok(RunSummary {
        score: state.player.score,
        level: state.level.number,
        lives: state.player.lives,
        ticks: state.ticks,
        game_over: state.game_over,
        sim_secs,
    })
}

/// Unthrottled benchmark: one fixed step per frame against a prepared scene
fn run_benchmark(state: &mut SimulationState, rng: &mut GameRng, settings: &Settings) -> Result<FrameStats> {
    sim::init(state);
    sim::prepare_benchmark_scene(state, rng, settings.density);
    state.spawn_band = settings.spawn_band;

    println!(
        "[Benchmark] density={}, warmup={:.2}s, duration={:.2}s",
        settings.density, settings.warmup_secs, settings.duration_secs
    );

    let start = Instant::now();
    let warmup_end = start + Duration::from_secs_f32(settings.warmup_secs);
    let bench_end = warmup_end + Duration::from_secs_f32(settings.duration_secs);
    let mut durations = Vec::new();
    let mut last = start;

    loop {
        sim::step(state, rng, settings.fixed_dt)?;

        let now = Instant::now();
        if now >= warmup_end && now <= bench_end {
            durations.push(now - last);
        }
        last = now;
        if now >= bench_end {
            break;
        }
    }

    log::info!(
        "Benchmark finished after {} ticks with {} enemies active",
        state.ticks,
        state.enemies.active_count()
    );
    Ok(FrameStats::from_durations(&durations))
}
