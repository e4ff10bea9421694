//! Trigger overlap tests between the player and spawned entities.
//!
//! Only overlap detection lives here; blocking collision stays with the
//! [`CharacterMover`](crate::player::CharacterMover).

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::spawner::{EntityId, SpawnKind, SpawnedEntity};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Boxes that only touch on a face do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

/// Player bounds. `position` is the feet position, `height` the current collider height.
pub fn player_bounds(position: Vec3, half_width: f32, height: f32) -> Aabb {
    let half = Vec3::new(half_width, height * 0.5, half_width);
    Aabb::from_center_half_extents(position + Vec3::new(0.0, height * 0.5, 0.0), half)
}

/// Half extents of each entity kind, with the entity position at the bottom center.
pub fn entity_half_extents(kind: SpawnKind) -> Vec3 {
    match kind {
        SpawnKind::Obstacle => Vec3::new(1.2, 0.5, 0.5),
        SpawnKind::Coin => Vec3::new(0.4, 0.4, 0.4),
        SpawnKind::Enemy => Vec3::new(0.8, 0.9, 0.8),
        SpawnKind::Buoy => Vec3::new(0.25, 0.6, 0.25),
    }
}

pub fn entity_bounds(entity: &SpawnedEntity) -> Aabb {
    let half = entity_half_extents(entity.kind);
    Aabb::from_center_half_extents(entity.position + Vec3::new(0.0, half.y, 0.0), half)
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndCause {
    HitObstacle,
    HitEnemy,
}

/// Result of the player touching an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Coin picked up; the coin is removed.
    Collected,
    /// Enemy hit while sliding; the enemy is removed.
    EnemyDestroyed,
    /// The run is over.
    RunEnded(EndCause),
    /// Nothing happens.
    Ignored,
}

/// Contact rules by entity kind.
pub fn contact_outcome(kind: SpawnKind, sliding: bool) -> ContactOutcome {
    match kind {
        SpawnKind::Coin => ContactOutcome::Collected,
        SpawnKind::Enemy if sliding => ContactOutcome::EnemyDestroyed,
        SpawnKind::Enemy => ContactOutcome::RunEnded(EndCause::HitEnemy),
        SpawnKind::Obstacle => ContactOutcome::RunEnded(EndCause::HitObstacle),
        SpawnKind::Buoy => ContactOutcome::Ignored,
    }
}

/// Bounds covering everything an entity passed through while scrolling
/// back by `sweep` this tick.
pub fn swept_entity_bounds(entity: &SpawnedEntity, sweep: f32) -> Aabb {
    let mut bounds = entity_bounds(entity);
    if sweep.is_finite() && sweep > 0.0 {
        bounds.max.z += sweep;
    }
    bounds
}

/// Ids of entities whose swept bounds overlap the player, in iteration order.
///
/// Pass `sweep = 0.0` for a plain overlap test.
pub fn overlapping<'a>(
    player: &Aabb,
    entities: impl IntoIterator<Item = &'a SpawnedEntity>,
    sweep: f32,
) -> Vec<EntityId> {
    entities
        .into_iter()
        .filter(|e| player.overlaps(&swept_entity_bounds(e, sweep)))
        .map(|e| e.id)
        .collect()
}
