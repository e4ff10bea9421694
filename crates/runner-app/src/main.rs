//! Lane Runner launcher.
//!
//! Usage: `lane-runner [CONFIG.json] [--seed N] [--headless [SECONDS]]`
//! (`--help` lists the options.)
//!
//! Without `--headless` a window opens with keyboard controls. Headless mode
//! runs the fixed-step simulation as fast as possible with a simple
//! autopilot and logs a summary.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use bevy::prelude::*;
use clap::Parser;
use runner_core::bevy::{
    CommandQueue, GameCommand, PlayerIntent, RunPhase, RunnerHeadlessPlugin, RunnerSession,
    RunnerUnifiedPlugin,
};
use runner_core::{
    FIXED_DT, Lane, MotionState, RunSnapshot, RunnerConfig, RunnerGame, SpawnKind,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_SEED: u64 = 12345;

/// How far ahead the autopilot reacts, in world units.
const AUTOPILOT_LOOKAHEAD: f32 = 7.0;

#[derive(Parser, Debug)]
#[command(name = "lane-runner", version, about = "Three-lane endless runner")]
struct Args {
    /// Track configuration (JSON). Defaults to the built-in classic track.
    config: Option<PathBuf>,
    /// Seed for spawn lanes
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Run without a window for the given number of seconds
    #[arg(long, value_name = "SECONDS", num_args = 0..=1, default_missing_value = "60")]
    headless: Option<f32>,
}

fn load_config(path: Option<&PathBuf>) -> Result<RunnerConfig> {
    let Some(path) = path else {
        return Ok(RunnerConfig::default_classic());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = RunnerConfig::from_json(&json)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;

    match args.headless {
        Some(seconds) => run_headless(config, args.seed, seconds),
        None => {
            run_windowed(config, args.seed);
            Ok(())
        }
    }
}

fn run_windowed(config: RunnerConfig, seed: u64) {
    tracing::info!("Starting windowed run (seed={})", seed);

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Lane Runner".to_string(),
                    ..default()
                }),
                ..default()
            })
            .disable::<bevy::log::LogPlugin>(),
    );
    app.add_plugins(RunnerUnifiedPlugin::new(config, seed));
    app.run();
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn run_headless(config: RunnerConfig, seed: u64, seconds: f32) -> Result<()> {
    if !seconds.is_finite() || seconds <= 0.0 {
        bail!("Headless duration must be positive, got {seconds}");
    }
    let frames = (seconds / FIXED_DT).ceil() as u64;
    tracing::info!("Starting headless run: seed={}, frames={}", seed, frames);

    let command_queue = CommandQueue::new();
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(bevy::state::app::StatesPlugin);
    app.add_plugins(bevy::input::InputPlugin);
    app.add_plugins(RunnerHeadlessPlugin {
        seed,
        config,
        command_queue: Some(command_queue.clone()),
    });
    app.world_mut().resource_mut::<Time<Virtual>>().pause();
    app.update();

    let dt = Duration::from_secs_f64(f64::from(FIXED_DT));
    for _ in 0..frames {
        // Wait for the previous decision to reach the simulation
        let pending = !app.world().resource::<PlayerIntent>().0.is_empty();
        if command_queue.is_empty() && !pending {
            let session = app.world().resource::<RunnerSession>();
            for command in autopilot(&session.game) {
                command_queue.push(command);
            }
        }

        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .accumulate_overstep(dt);
        app.update();

        if *app.world().resource::<State<RunPhase>>().get() == RunPhase::GameOver {
            break;
        }
    }

    let game = &app.world().resource::<RunnerSession>().game;
    let snapshot = RunSnapshot::capture(game);
    tracing::info!(
        "Headless run finished: phase={:?}, frame={}, distance={:.1}, money={}, hash={:016x}",
        game.phase(),
        game.current_frame(),
        game.state().distance(),
        game.state().money(),
        snapshot.compute_hash()
    );
    Ok(())
}

/// Picks commands to avoid the nearest threat in the player's lane.
fn autopilot(game: &RunnerGame) -> Vec<GameCommand> {
    if !game.is_running() || game.player().motion() != MotionState::Grounded {
        return Vec::new();
    }
    let lane_width = game.config().world.lane_width;
    let blocked = |lane: Lane| {
        game.entities().any(|e| {
            matches!(e.kind, SpawnKind::Obstacle | SpawnKind::Enemy)
                && (e.position.x - lane.world_x(lane_width)).abs() < lane_width * 0.5
                && e.position.z > -1.0
                && e.position.z < AUTOPILOT_LOOKAHEAD
        })
    };

    let lane = game.state().lane();
    let threat = game.entities().find(|e| {
        e.lane == Some(lane) && e.position.z > 0.0 && e.position.z < AUTOPILOT_LOOKAHEAD
    });
    match threat.map(|e| e.kind) {
        Some(SpawnKind::Enemy) => vec![GameCommand::Slide],
        Some(SpawnKind::Obstacle) => {
            let escape = [lane.shifted(-1), lane.shifted(1)]
                .into_iter()
                .find(|&candidate| candidate != lane && !blocked(candidate));
            match escape {
                Some(target) => vec![GameCommand::ShiftLane {
                    delta: target.index() - lane.index(),
                }],
                None => vec![GameCommand::Jump],
            }
        }
        _ => Vec::new(),
    }
}
