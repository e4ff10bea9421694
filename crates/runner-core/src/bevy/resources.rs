//! ECS Resources for the runner.
//!
//! These resources hold the simulation and the glue between input and the
//! fixed-step tick.

use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::*;
use parking_lot::Mutex;

use crate::config::RunnerConfig;
use crate::error::ConfigError;
use crate::game::{RunnerGame, TickReport};
use crate::hud::ScoreBoard;
use crate::player::{CharacterMover, FlatGroundMover, PlayerInput};
use crate::spawner::EntityId;
use crate::tiles::TileId;

/// The running simulation and the mover it drives.
#[derive(Resource, Debug)]
pub struct RunnerSession {
    pub game: RunnerGame,
    pub mover: FlatGroundMover,
}

impl RunnerSession {
    pub fn new(config: RunnerConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self::from_game(RunnerGame::new(config, seed)?))
    }

    pub fn from_game(game: RunnerGame) -> Self {
        Self {
            game,
            mover: FlatGroundMover::default(),
        }
    }

    pub fn tick(&mut self, input: PlayerInput, dt: f32) -> TickReport {
        self.game.tick(input, dt, &mut self.mover)
    }

    /// Starts a new run and puts the mover back on the center lane.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.game.restart()?;
        self.mover = FlatGroundMover::new(self.mover.ground_y());
        Ok(())
    }

    pub fn player_position(&self) -> Vec3 {
        self.mover.position()
    }
}

/// Input gathered during `Update` and consumed by the next fixed tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PlayerIntent(pub PlayerInput);

impl PlayerIntent {
    pub fn add(&mut self, input: PlayerInput) {
        self.0.merge(input);
    }

    pub fn take(&mut self) -> PlayerInput {
        std::mem::take(&mut self.0)
    }
}

/// Maps simulation ids to their mirror entities.
#[derive(Resource, Debug, Default)]
pub struct EntityIndex {
    pub tiles: HashMap<TileId, Entity>,
    pub spawned: HashMap<EntityId, Entity>,
}

impl EntityIndex {
    pub fn clear_spawned(&mut self) {
        self.spawned.clear();
    }
}

/// Latest score display.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreBoardRes(pub ScoreBoard);

/// Commands that can be sent from outside the ECS (scripts, tests, a host shell).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    /// Move `delta` lanes (negative is left).
    ShiftLane { delta: i32 },
    Jump,
    Slide,
    /// Start a new run.
    Restart,
    /// Frame boundary marker - commands after this are processed in the next frame.
    Yield,
}

/// Thread-safe command queue shared with code outside the app.
#[derive(Resource, Clone)]
pub struct CommandQueue {
    inner: Arc<Mutex<VecDeque<GameCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Push a command to be processed.
    pub fn push(&self, command: GameCommand) {
        self.inner.lock().push_back(command);
    }

    /// Drain all pending commands, including frame markers.
    pub fn drain(&self) -> Vec<GameCommand> {
        self.inner.lock().drain(..).collect()
    }

    /// Drain commands until Yield or empty.
    ///
    /// Returns commands up to (not including) Yield.
    /// Yield itself is consumed but not returned.
    pub fn drain_until_yield(&self) -> Vec<GameCommand> {
        let mut guard = self.inner.lock();
        let mut commands = Vec::new();

        while let Some(cmd) = guard.pop_front() {
            if cmd == GameCommand::Yield {
                tracing::debug!("[command] Yield - deferring remaining commands to next frame");
                break;
            }
            commands.push(cmd);
        }

        commands
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if there are pending commands.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
