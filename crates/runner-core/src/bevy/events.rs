//! ECS Events (Messages) for the runner.
//!
//! Simulation messages are written from `FixedUpdate` and read in `Update`.

use bevy::prelude::*;

use crate::collision::EndCause;
use crate::spawner::{EntityId, SpawnKind};
use crate::tiles::TileId;

/// Message fired when a tile is moved to the front of the pool.
#[derive(Message, Debug, Clone)]
pub struct TileRecycledEvent {
    pub tile_id: TileId,
    /// New view-space Z of the tile.
    pub z: f32,
}

/// Message fired when a spawner creates an entity.
#[derive(Message, Debug, Clone)]
pub struct EntitySpawnedEvent {
    pub id: EntityId,
    pub kind: SpawnKind,
}

/// Message fired when an entity scrolls behind the despawn cutoff.
#[derive(Message, Debug, Clone)]
pub struct EntityDespawnedEvent {
    pub id: EntityId,
}

/// Message fired when the player picks up a coin.
#[derive(Message, Debug, Clone)]
pub struct CoinCollectedEvent {
    pub id: EntityId,
    /// Money after the pickup.
    pub money: u32,
}

/// Message fired when a sliding player destroys an enemy.
#[derive(Message, Debug, Clone)]
pub struct EnemyDestroyedEvent {
    pub id: EntityId,
}

/// Message fired when the run ends.
#[derive(Message, Debug, Clone)]
pub struct RunEndedEvent {
    pub cause: EndCause,
    pub distance: f32,
    pub score: f32,
}

/// Message to request a fresh run.
#[derive(Message, Debug, Clone, Default)]
pub struct RestartRunEvent;
