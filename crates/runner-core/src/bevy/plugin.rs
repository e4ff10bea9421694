//! Bevy plugins for the runner.
//!
//! Provides:
//! - `RunnerHeadlessPlugin`: Logic-only plugin (no rendering/window dependencies) for headless runs and tests
//! - `RunnerUnifiedPlugin`: Full plugin including `RunnerHeadlessPlugin` + rendering systems

use bevy::prelude::*;

use crate::bevy::events::*;
use crate::bevy::resources::*;
use crate::bevy::systems;
use crate::bevy::MainCamera;
use crate::config::RunnerConfig;
use crate::game::{FIXED_DT, RunnerGame};

/// Whether a run is in progress or showing its game over screen.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunPhase {
    #[default]
    Running,
    GameOver,
}

// ============================================================================
// Headless Plugin (logic only, no rendering/window dependencies)
// ============================================================================

/// Headless plugin containing all game logic without rendering or window dependencies.
///
/// Use this plugin with `MinimalPlugins`, `StatesPlugin` and `InputPlugin`
/// to run the simulation without a windowing or rendering backend.
pub struct RunnerHeadlessPlugin {
    pub seed: u64,
    pub config: RunnerConfig,
    pub command_queue: Option<CommandQueue>,
}

impl Default for RunnerHeadlessPlugin {
    fn default() -> Self {
        Self {
            seed: 12345,
            config: RunnerConfig::default_classic(),
            command_queue: None,
        }
    }
}

impl RunnerHeadlessPlugin {
    fn build_session(&self) -> RunnerSession {
        match RunnerSession::new(self.config.clone(), self.seed) {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("[runner] Invalid config ({}), using the classic track", e);
                RunnerSession::from_game(RunnerGame::classic(self.seed))
            }
        }
    }
}

impl Plugin for RunnerHeadlessPlugin {
    fn build(&self, app: &mut App) {
        // ====================================================================
        // States
        // ====================================================================
        app.init_state::<RunPhase>();

        // ====================================================================
        // Fixed timestep
        // ====================================================================
        app.insert_resource(Time::<Fixed>::from_seconds(f64::from(FIXED_DT)));

        // ====================================================================
        // Resources
        // ====================================================================
        app.insert_resource(self.build_session())
            .insert_resource(PlayerIntent::default())
            .insert_resource(EntityIndex::default())
            .insert_resource(ScoreBoardRes::default())
            .insert_resource(self.command_queue.clone().unwrap_or_default());

        // ====================================================================
        // Messages
        // ====================================================================
        app.add_message::<TileRecycledEvent>()
            .add_message::<EntitySpawnedEvent>()
            .add_message::<EntityDespawnedEvent>()
            .add_message::<CoinCollectedEvent>()
            .add_message::<EnemyDestroyedEvent>()
            .add_message::<RunEndedEvent>()
            .add_message::<RestartRunEvent>();

        // ====================================================================
        // Systems
        // ====================================================================
        app.add_systems(Startup, systems::spawn_player);

        app.add_systems(
            FixedUpdate,
            systems::run_fixed_tick.run_if(in_state(RunPhase::Running)),
        );

        // Input and phase control
        app.add_systems(
            Update,
            (
                systems::process_commands,
                systems::handle_keyboard_input,
                systems::enter_game_over,
                systems::handle_restart,
            )
                .chain(),
        );

        // ECS mirror, camera and score
        app.add_systems(
            Update,
            (
                systems::sync_tiles,
                systems::sync_spawned_entities,
                systems::sync_player,
                systems::follow_player,
                systems::update_scoreboard,
            )
                .chain()
                .after(systems::handle_restart),
        );
    }
}

// ============================================================================
// Unified Plugin (headless + rendering)
// ============================================================================

/// Unified plugin: `RunnerHeadlessPlugin` plus camera, gizmo rendering and
/// HUD text.
pub struct RunnerUnifiedPlugin {
    pub seed: u64,
    pub config: RunnerConfig,
    pub command_queue: Option<CommandQueue>,
}

impl Default for RunnerUnifiedPlugin {
    fn default() -> Self {
        Self::new(RunnerConfig::default_classic(), 12345)
    }
}

impl RunnerUnifiedPlugin {
    pub fn new(config: RunnerConfig, seed: u64) -> Self {
        Self {
            seed,
            config,
            command_queue: None,
        }
    }
}

impl Plugin for RunnerUnifiedPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RunnerHeadlessPlugin {
            seed: self.seed,
            config: self.config.clone(),
            command_queue: self.command_queue.clone(),
        });

        app.insert_resource(ClearColor(Color::srgb(0.08, 0.09, 0.11)));

        app.add_systems(Startup, (setup_camera, systems::spawn_hud));

        app.add_systems(
            Update,
            (
                systems::render_track,
                systems::render_spawned,
                systems::render_player,
            )
                .after(systems::sync_player),
        );
        app.add_systems(
            Update,
            systems::update_hud_text
                .after(systems::update_scoreboard)
                .after(systems::follow_player),
        );

        app.add_systems(OnEnter(RunPhase::GameOver), systems::spawn_game_over_text);
        app.add_systems(OnExit(RunPhase::GameOver), systems::despawn_game_over_text);
    }
}

fn setup_camera(mut commands: Commands) {
    tracing::info!("[runner] camera spawned");
    commands.spawn((Camera2d, MainCamera));
}
