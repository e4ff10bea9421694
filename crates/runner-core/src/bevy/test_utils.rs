//! Test utilities for headless Bevy integration tests.
//!
//! Provides `TestApp`, a wrapper around `bevy::app::App` that uses
//! `MinimalPlugins` + `RunnerHeadlessPlugin` for testing game logic
//! without a rendering or windowing backend.

use std::time::Duration;

use bevy::prelude::*;

use crate::bevy::plugin::{RunPhase, RunnerHeadlessPlugin};
use crate::bevy::resources::{CommandQueue, GameCommand, RunnerSession};
use crate::config::RunnerConfig;
use crate::game::FIXED_DT;

/// Messages of type `T` read since recording started.
#[derive(Resource)]
pub(crate) struct Recorded<T: Message>(pub Vec<T>);

fn record_messages<T: Message + Clone>(
    mut reader: MessageReader<T>,
    mut log: ResMut<Recorded<T>>,
) {
    log.0.extend(reader.read().cloned());
}

/// A headless Bevy app wrapper for testing.
pub(crate) struct TestApp {
    pub app: App,
}

impl TestApp {
    /// Create a new test app on the classic track.
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default_classic(), 12345)
    }

    /// Create a new test app with a specific config and RNG seed.
    pub fn with_config(config: RunnerConfig, seed: u64) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(bevy::state::app::StatesPlugin);
        app.add_plugins(bevy::input::InputPlugin);
        app.add_plugins(RunnerHeadlessPlugin {
            seed,
            config,
            command_queue: None,
        });
        // Pause virtual time so that only step_physics advances the
        // simulation.
        app.world_mut().resource_mut::<Time<Virtual>>().pause();
        // Run one update to initialize all resources and state
        app.update();
        Self { app }
    }

    /// Run a single frame update.
    pub fn update(&mut self) {
        self.app.update();
    }

    /// Advance the simulation by exactly `n` fixed timesteps.
    ///
    /// Feeds time directly into the fixed-timestep accumulator, bypassing
    /// virtual time.
    pub fn step_physics(&mut self, n: usize) {
        let dt = Duration::from_secs_f64(f64::from(FIXED_DT));
        for _ in 0..n {
            self.app
                .world_mut()
                .resource_mut::<Time<Fixed>>()
                .accumulate_overstep(dt);
            self.app.update();
        }
    }

    /// Push a command to the command queue.
    pub fn push_command(&mut self, cmd: GameCommand) {
        self.app.world().resource::<CommandQueue>().push(cmd);
    }

    /// Start collecting every message of type `T`.
    pub fn record<T: Message + Clone>(&mut self) {
        self.app.insert_resource(Recorded::<T>(Vec::new()));
        self.app.add_systems(Update, record_messages::<T>);
    }

    /// Messages collected since [`TestApp::record`].
    pub fn recorded<T: Message + Clone>(&self) -> &[T] {
        &self.app.world().resource::<Recorded<T>>().0
    }

    pub fn session(&self) -> &RunnerSession {
        self.app.world().resource::<RunnerSession>()
    }

    pub fn phase(&self) -> RunPhase {
        *self.app.world().resource::<State<RunPhase>>().get()
    }

    /// Number of entities carrying component `T`.
    pub fn count<T: Component>(&mut self) -> usize {
        let world = self.app.world_mut();
        world.query_filtered::<(), With<T>>().iter(world).count()
    }

    /// Get a reference to the World.
    pub fn world(&self) -> &World {
        self.app.world()
    }

    /// Get a mutable reference to the World.
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}
