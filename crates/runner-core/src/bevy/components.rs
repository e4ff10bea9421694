//! ECS Components for the runner.
//!
//! Entities mirror the simulation owned by [`RunnerSession`](super::RunnerSession);
//! their `Transform`s carry world-space positions (x lateral, y up, z ahead).

use bevy::prelude::*;

use crate::player::MotionState;
use crate::spawner::{EntityId, SpawnKind};
use crate::tiles::TileId;

/// Marker for pooled ground tiles.
#[derive(Component, Debug, Clone, Copy)]
pub struct TileMarker {
    pub id: TileId,
}

/// Marker for entities created by a spawner.
#[derive(Component, Debug, Clone, Copy)]
pub struct SpawnedMarker {
    pub id: EntityId,
    pub kind: SpawnKind,
}

/// The player entity.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerMarker {
    pub motion: MotionState,
    /// Collider height for the current motion.
    pub height: f32,
}

/// Marker for the main camera entity.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MainCamera;

/// Score overlay text.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct HudText;

/// Text shown while the run is over.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GameOverText;
