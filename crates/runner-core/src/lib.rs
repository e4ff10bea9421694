//! Lane Runner Core Library
//!
//! Deterministic simulation for a three-lane endless runner: a recycled
//! ground tile pool, distance-driven spawners, a jump/slide/lane-change
//! player controller and the shared run state they all update.
//!
//! The simulation is plain Rust driven by [`RunnerGame::tick`]; the
//! [`bevy`](crate::bevy) module wraps it in ECS plugins for headless and
//! windowed play.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod camera;
pub mod collision;
pub mod config;
pub mod error;
pub mod game;
pub mod hud;
pub mod lane;
pub mod player;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tiles;

// Bevy integration
pub mod bevy;

pub use camera::CameraRig;
pub use collision::{Aabb, ContactOutcome, EndCause};
pub use config::{CameraConfig, PlayerConfig, RunnerConfig, SpawnerConfig, WorldConfig};
pub use error::{ConfigError, SnapshotError};
pub use game::{FIXED_DT, GamePhase, MAX_DT, RunnerGame, TickReport};
pub use hud::ScoreBoard;
pub use lane::{LANE_COUNT, Lane};
pub use player::{CharacterMover, FlatGroundMover, MotionState, PlayerController, PlayerInput};
pub use snapshot::RunSnapshot;
pub use spawner::{EntityId, SpawnKind, SpawnPattern, Spawner};
pub use state::RunState;
pub use tiles::{DEFAULT_TILE_LENGTH, Tile, TileId, TilePool};
