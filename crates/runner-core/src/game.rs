//! Run loop and phase management.
//!
//! [`RunnerGame`] owns every subsystem of a run and advances them in a fixed
//! order each tick: player, world scroll, contacts, spawners, camera.

use bevy::math::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::camera::CameraRig;
use crate::collision::{self, ContactOutcome, EndCause};
use crate::config::RunnerConfig;
use crate::error::ConfigError;
use crate::player::{CharacterMover, PlayerController, PlayerInput, PlayerTick};
use crate::spawner::{EntityId, EntityIds, SpawnedEntity, Spawner};
use crate::state::RunState;
use crate::tiles::{TileId, TilePool, resolve_tile_length};

/// Simulation step (60Hz).
pub const FIXED_DT: f32 = 1.0 / 60.0;

/// Longest step a single tick simulates. Longer frames are clamped.
pub const MAX_DT: f32 = 0.25;

/// Phase of the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Running,
    GameOver { cause: EndCause },
}

/// Everything that changed during one tick.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub player: PlayerTick,
    pub recycled_tiles: Vec<TileId>,
    pub spawned: Vec<EntityId>,
    pub despawned: Vec<EntityId>,
    pub collected: Vec<EntityId>,
    pub destroyed: Vec<EntityId>,
    pub ended: Option<EndCause>,
}

/// Subsystems rebuilt from config at the start of every run.
struct RunParts {
    tiles: TilePool,
    spawners: Vec<Spawner>,
    player: PlayerController,
    camera: CameraRig,
}

impl RunParts {
    fn build(config: &RunnerConfig) -> Result<Self, ConfigError> {
        let world = &config.world;
        let tile_length = resolve_tile_length(world.tile_length);
        let tiles = TilePool::new(
            world.tile_count,
            tile_length,
            world.recycle_threshold,
            world.back_offset,
        )?;
        let spawners = config
            .spawners
            .iter()
            .cloned()
            .map(Spawner::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tiles,
            spawners,
            player: PlayerController::new(config.player.clone(), world.lane_width),
            camera: CameraRig::new(&config.camera),
        })
    }
}

/// A single endless run.
#[derive(Debug)]
pub struct RunnerGame {
    config: RunnerConfig,
    seed: u64,
    restarts: u64,
    rng: ChaCha8Rng,
    state: RunState,
    tiles: TilePool,
    spawners: Vec<Spawner>,
    ids: EntityIds,
    player: PlayerController,
    player_position: Vec3,
    camera: CameraRig,
    speed: f32,
    frame: u64,
    phase: GamePhase,
}

impl RunnerGame {
    pub fn new(config: RunnerConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let parts = RunParts::build(&config)?;
        info!(
            "Run started: seed={}, tiles={}, spawners={}",
            seed,
            parts.tiles.len(),
            parts.spawners.len()
        );

        Ok(Self {
            speed: config.world.speed,
            config,
            seed,
            restarts: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            state: RunState::new(),
            tiles: parts.tiles,
            spawners: parts.spawners,
            ids: EntityIds::default(),
            player: parts.player,
            player_position: Vec3::ZERO,
            camera: parts.camera,
            frame: 0,
            phase: GamePhase::Running,
        })
    }

    /// Game on the built-in classic track.
    pub fn classic(seed: u64) -> Self {
        Self::new(RunnerConfig::default_classic(), seed).expect("Default preset must be valid")
    }

    /// Advances the run by `dt` seconds. Does nothing once the run is over.
    pub fn tick(
        &mut self,
        input: PlayerInput,
        dt: f32,
        mover: &mut impl CharacterMover,
    ) -> TickReport {
        let mut report = TickReport::default();
        if self.phase != GamePhase::Running {
            return report;
        }
        let dt = if dt.is_finite() && dt > 0.0 { dt.min(MAX_DT) } else { 0.0 };

        report.player = self.player.tick(input, &mut self.state, dt, mover);
        self.player_position = mover.position();

        // World scroll
        let delta = self.speed * dt;
        self.state.advance(delta);
        report.recycled_tiles = self.tiles.scroll(delta);
        for spawner in &mut self.spawners {
            spawner.scroll(delta);
        }
        let world = &self.config.world;
        self.speed = (self.speed + world.acceleration * dt).clamp(0.0, world.max_speed);

        // Contacts see everything that scrolled past this tick, before culling.
        self.resolve_overlaps(delta, &mut report);

        let distance = self.state.distance();
        let lane_width = self.config.world.lane_width;
        for spawner in &mut self.spawners {
            let tick = spawner.cull_and_spawn(distance, lane_width, &mut self.rng, &mut self.ids);
            report.spawned.extend(tick.spawned);
            report.despawned.extend(tick.despawned);
        }

        self.camera.follow(self.player_position);
        self.frame += 1;
        report
    }

    fn resolve_overlaps(&mut self, sweep: f32, report: &mut TickReport) {
        let bounds = collision::player_bounds(
            self.player_position,
            self.player.half_width(),
            self.player.current_height(),
        );
        let touching = collision::overlapping(
            &bounds,
            self.spawners.iter().flat_map(Spawner::entities),
            sweep,
        );

        for id in touching {
            match self.resolve_contact(id) {
                ContactOutcome::Collected => report.collected.push(id),
                ContactOutcome::EnemyDestroyed => report.destroyed.push(id),
                ContactOutcome::RunEnded(cause) => {
                    report.ended = Some(cause);
                    break;
                }
                ContactOutcome::Ignored => {}
            }
        }
    }

    /// Applies the contact rule for the player touching entity `id`.
    ///
    /// Unknown ids and contacts after the run ended are ignored.
    pub fn resolve_contact(&mut self, id: EntityId) -> ContactOutcome {
        if self.phase != GamePhase::Running {
            return ContactOutcome::Ignored;
        }
        let Some(spawner) = self.spawners.iter_mut().find(|s| s.get(id).is_some()) else {
            return ContactOutcome::Ignored;
        };

        let outcome = collision::contact_outcome(spawner.kind(), self.player.is_sliding());
        match outcome {
            ContactOutcome::Collected => {
                spawner.remove(id);
                self.state.add_money(1);
                debug!("Coin {} collected, money={}", id, self.state.money());
            }
            ContactOutcome::EnemyDestroyed => {
                spawner.remove(id);
                debug!("Enemy {} destroyed by slide", id);
            }
            ContactOutcome::RunEnded(cause) => {
                self.state.stop();
                self.phase = GamePhase::GameOver { cause };
                info!(
                    "Run over ({:?}) at distance {:.1}, money={}",
                    cause,
                    self.state.distance(),
                    self.state.money()
                );
            }
            ContactOutcome::Ignored => {}
        }
        outcome
    }

    /// Starts a new run from the stored config, keeping the best score.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let parts = RunParts::build(&self.config)?;
        self.restarts += 1;
        self.rng = ChaCha8Rng::seed_from_u64(self.seed.wrapping_add(self.restarts));
        self.state = self.state.next_run();
        self.tiles = parts.tiles;
        self.spawners = parts.spawners;
        self.ids = EntityIds::default();
        self.player = parts.player;
        self.player_position = Vec3::ZERO;
        self.camera = parts.camera;
        self.speed = self.config.world.speed;
        self.frame = 0;
        self.phase = GamePhase::Running;
        info!(
            "Run restarted (#{}), best={:.1}",
            self.restarts,
            self.state.best_score()
        );
        Ok(())
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn restarts(&self) -> u64 {
        self.restarts
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn tiles(&self) -> &TilePool {
        &self.tiles
    }

    pub fn spawners(&self) -> &[Spawner] {
        &self.spawners
    }

    /// All live spawned entities across spawners.
    pub fn entities(&self) -> impl Iterator<Item = &SpawnedEntity> {
        self.spawners.iter().flat_map(Spawner::entities)
    }

    pub fn entity(&self, id: EntityId) -> Option<&SpawnedEntity> {
        self.spawners.iter().find_map(|s| s.get(id))
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    /// Player feet position after the last tick.
    pub fn player_position(&self) -> Vec3 {
        self.player_position
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpawnerConfig;
    use crate::lane::Lane;
    use crate::player::{FlatGroundMover, MotionState};
    use crate::spawner::{SpawnKind, SpawnPattern};

    /// Config with only the given spawners, so tests control what appears on the track.
    fn config_with(spawners: Vec<SpawnerConfig>) -> RunnerConfig {
        RunnerConfig {
            spawners,
            ..RunnerConfig::default()
        }
    }

    /// One entity straight ahead in the center lane at world distance `start_z`.
    fn center_line(kind: SpawnKind, start_z: f32) -> SpawnerConfig {
        SpawnerConfig {
            name: format!("{kind:?}"),
            kind,
            prefab: Some("test".to_string()),
            start_z,
            spacing: 1000.0,
            lookahead: 40.0,
            despawn_z: -10.0,
            height: 0.0,
            pattern: SpawnPattern::Line { offsets: vec![0.0] },
        }
    }

    fn run_frames(game: &mut RunnerGame, mover: &mut FlatGroundMover, frames: u32) {
        for _ in 0..frames {
            game.tick(PlayerInput::NONE, FIXED_DT, mover);
        }
    }

    #[test]
    fn test_new_game_layout() {
        let game = RunnerGame::new(RunnerConfig::default_classic(), 42).unwrap();

        assert_eq!(game.tiles().len(), 6);
        assert_eq!(game.spawners().len(), 4);
        assert_eq!(game.state().lane(), Lane::Center);
        assert_eq!(game.current_frame(), 0);
        assert!(game.is_running());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = RunnerConfig::default();
        config.world.tile_count = 0;
        assert!(matches!(
            RunnerGame::new(config, 0),
            Err(ConfigError::EmptyTilePool)
        ));
    }

    #[test]
    fn test_distance_non_decreasing_and_tiles_constant() {
        let mut game = RunnerGame::new(RunnerConfig::default_classic(), 1).unwrap();
        let mut mover = FlatGroundMover::default();

        let mut last = game.state().distance();
        for frame in 0..3000 {
            let input = match frame % 50 {
                0 => PlayerInput::left(),
                10 => PlayerInput::right(),
                20 => PlayerInput::jump(),
                _ => PlayerInput::NONE,
            };
            game.tick(input, FIXED_DT, &mut mover);
            if !game.is_running() {
                break;
            }
            assert!(game.state().distance() >= last);
            assert_eq!(game.tiles().len(), 6);
            last = game.state().distance();
        }
    }

    #[test]
    fn test_speed_ramp_capped() {
        let mut config = config_with(Vec::new());
        config.world.acceleration = 100.0;
        let mut game = RunnerGame::new(config, 0).unwrap();
        let mut mover = FlatGroundMover::default();

        run_frames(&mut game, &mut mover, 60);

        assert_eq!(game.speed(), game.config().world.max_speed);
    }

    #[test]
    fn test_negative_acceleration_rejected() {
        let config = RunnerConfig::from_json(r#"{ "world": { "acceleration": -5.0 } }"#);
        assert!(matches!(config, Err(ConfigError::Negative { .. })));

        let mut config = config_with(Vec::new());
        config.world.acceleration = -5.0;
        assert!(RunnerGame::new(config, 0).is_err());
    }

    #[test]
    fn test_speed_and_tiles_only_move_forward() {
        let mut config = config_with(Vec::new());
        config.world.acceleration = 0.0;
        let mut game = RunnerGame::new(config, 0).unwrap();
        let mut mover = FlatGroundMover::default();

        run_frames(&mut game, &mut mover, 600);

        assert!(game.speed() >= 0.0);
        assert_eq!(game.speed(), game.config().world.speed);
        // The pool stays around the player instead of drifting ahead.
        assert!(game.tiles().min_z() >= game.tiles().recycle_threshold());
        assert!(game.tiles().min_z() <= 0.0);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut game = RunnerGame::new(config_with(Vec::new()), 0).unwrap();
        let mut mover = FlatGroundMover::default();
        let speed = game.speed();

        game.tick(PlayerInput::NONE, 1.0e9, &mut mover);

        assert!((game.state().distance() - speed * MAX_DT).abs() < 1e-4);
        assert_eq!(game.tiles().len(), 6);
    }

    #[test]
    fn test_fast_obstacle_cannot_skip_past_player() {
        // At 200 units/s an obstacle moves 3.3 units per tick, more than the
        // overlap window, and never sits on the player at a tick boundary.
        let mut config = config_with(vec![center_line(SpawnKind::Obstacle, 51.5)]);
        config.world.speed = 200.0;
        config.world.max_speed = 200.0;
        let mut game = RunnerGame::new(config, 0).unwrap();
        let mut mover = FlatGroundMover::default();

        run_frames(&mut game, &mut mover, 60);

        assert_eq!(
            game.phase(),
            GamePhase::GameOver {
                cause: EndCause::HitObstacle
            }
        );
    }

    #[test]
    fn test_non_finite_dt_is_ignored() {
        let mut game = RunnerGame::new(config_with(Vec::new()), 0).unwrap();
        let mut mover = FlatGroundMover::default();

        game.tick(PlayerInput::NONE, f32::NAN, &mut mover);
        game.tick(PlayerInput::NONE, -1.0, &mut mover);

        assert_eq!(game.state().distance(), 0.0);
        assert_eq!(game.current_frame(), 2);
    }

    #[test]
    fn test_enemy_contact_ends_run() {
        let mut game =
            RunnerGame::new(config_with(vec![center_line(SpawnKind::Enemy, 20.0)]), 0).unwrap();
        let mut mover = FlatGroundMover::default();

        let mut ended = None;
        for _ in 0..600 {
            if let Some(cause) = game.tick(PlayerInput::NONE, FIXED_DT, &mut mover).ended {
                ended = Some(cause);
                break;
            }
        }

        assert_eq!(ended, Some(EndCause::HitEnemy));
        assert_eq!(
            game.phase(),
            GamePhase::GameOver {
                cause: EndCause::HitEnemy
            }
        );
        assert!(!game.state().is_running());

        // Frozen after game over
        let frame = game.current_frame();
        let report = game.tick(PlayerInput::NONE, FIXED_DT, &mut mover);
        assert!(report.spawned.is_empty());
        assert_eq!(game.current_frame(), frame);
    }

    #[test]
    fn test_sliding_destroys_enemy() {
        let mut game =
            RunnerGame::new(config_with(vec![center_line(SpawnKind::Enemy, 20.0)]), 0).unwrap();
        let mut mover = FlatGroundMover::default();

        let mut destroyed = Vec::new();
        for _ in 0..600 {
            let close = game.entities().any(|e| e.position.z < 4.0);
            let input = if close && game.player().motion() == MotionState::Grounded {
                PlayerInput::slide()
            } else {
                PlayerInput::NONE
            };
            let report = game.tick(input, FIXED_DT, &mut mover);
            assert!(report.ended.is_none(), "slide should not end the run");
            destroyed.extend(report.destroyed);
            if game.state().distance() > 30.0 {
                break;
            }
        }

        assert_eq!(destroyed.len(), 1);
        assert_eq!(game.entities().count(), 0);
        assert!(game.is_running());
    }

    #[test]
    fn test_obstacle_contact_ends_run() {
        let mut game =
            RunnerGame::new(config_with(vec![center_line(SpawnKind::Obstacle, 10.0)]), 0)
                .unwrap();
        let mut mover = FlatGroundMover::default();

        run_frames(&mut game, &mut mover, 120);

        assert_eq!(
            game.phase(),
            GamePhase::GameOver {
                cause: EndCause::HitObstacle
            }
        );
    }

    #[test]
    fn test_lane_change_avoids_obstacle() {
        let mut game =
            RunnerGame::new(config_with(vec![center_line(SpawnKind::Obstacle, 10.0)]), 0)
                .unwrap();
        let mut mover = FlatGroundMover::default();

        game.tick(PlayerInput::right(), FIXED_DT, &mut mover);
        run_frames(&mut game, &mut mover, 240);

        assert!(game.is_running());
        assert_eq!(game.state().lane(), Lane::Right);
    }

    #[test]
    fn test_coin_collected_once() {
        let mut coin = center_line(SpawnKind::Coin, 10.0);
        coin.height = 1.0;
        let mut game = RunnerGame::new(config_with(vec![coin]), 0).unwrap();
        let mut mover = FlatGroundMover::default();

        let mut collected = Vec::new();
        for _ in 0..240 {
            collected.extend(game.tick(PlayerInput::NONE, FIXED_DT, &mut mover).collected);
        }

        assert_eq!(collected.len(), 1);
        assert_eq!(game.state().money(), 1);
        assert!(game.entity(collected[0]).is_none());
        assert!(game.is_running());
    }

    #[test]
    fn test_buoy_contact_ignored() {
        let mut game =
            RunnerGame::new(config_with(vec![center_line(SpawnKind::Buoy, 10.0)]), 0).unwrap();
        let mut mover = FlatGroundMover::default();
        let id = game.tick(PlayerInput::NONE, FIXED_DT, &mut mover).spawned[0];

        assert_eq!(game.resolve_contact(id), ContactOutcome::Ignored);
        assert!(game.entity(id).is_some());
        assert_eq!(game.resolve_contact(9999), ContactOutcome::Ignored);
    }

    #[test]
    fn test_camera_follows_player() {
        let mut game = RunnerGame::new(config_with(Vec::new()), 0).unwrap();
        let mut mover = FlatGroundMover::default();

        game.tick(PlayerInput::right(), FIXED_DT, &mut mover);
        run_frames(&mut game, &mut mover, 30);

        assert_eq!(
            game.camera().position(),
            game.player_position() + game.camera().offset()
        );
        assert!((game.player_position().x - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_restart_keeps_best_score() {
        let mut game =
            RunnerGame::new(config_with(vec![center_line(SpawnKind::Obstacle, 10.0)]), 5)
                .unwrap();
        let mut mover = FlatGroundMover::default();
        run_frames(&mut game, &mut mover, 120);
        assert!(!game.is_running());
        let best = game.state().best_score();
        assert!(best > 0.0);

        game.restart().unwrap();

        assert!(game.is_running());
        assert_eq!(game.restarts(), 1);
        assert_eq!(game.state().distance(), 0.0);
        assert_eq!(game.state().money(), 0);
        assert_eq!(game.state().lane(), Lane::Center);
        assert_eq!(game.state().best_score(), best);
        assert_eq!(game.current_frame(), 0);
        assert_eq!(game.speed(), game.config().world.speed);
    }
}
