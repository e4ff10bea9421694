//! Distance-driven spawners for obstacles, coins, enemies and buoys.
//!
//! Each spawner keeps a monotonically increasing next spawn Z. Whenever the
//! world distance plus the lookahead passes it, one batch is spawned and the
//! spawn Z advances by a fixed spacing. Tracked entities scroll backward with
//! the world and are destroyed once they fall behind the cutoff.

use bevy::math::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SpawnerConfig;
use crate::error::ConfigError;
use crate::lane::Lane;

/// Identifier of a spawned entity, unique within a run.
pub type EntityId = u32;

/// What a spawner produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    Obstacle,
    Coin,
    Enemy,
    Buoy,
}

/// How a batch is laid out across the track.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpawnPattern {
    /// One entity in a uniformly chosen lane.
    #[default]
    RandomLane,
    /// One entity per lateral offset (buoy lines).
    Line { offsets: Vec<f32> },
}

/// Hands out entity ids shared by all spawners of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityIds {
    next: EntityId,
}

impl EntityIds {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// An entity created by a spawner.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedEntity {
    pub id: EntityId,
    pub kind: SpawnKind,
    /// World distance the entity was spawned at.
    pub spawn_z: f32,
    /// View-space position; Z decreases as the world scrolls.
    pub position: Vec3,
    /// Lane for lane-bound entities, `None` for line patterns.
    pub lane: Option<Lane>,
}

/// Entities created and destroyed during one spawner tick.
#[derive(Debug, Clone, Default)]
pub struct SpawnerTick {
    pub spawned: Vec<EntityId>,
    pub despawned: Vec<EntityId>,
}

/// A single spawner and the entities it owns.
#[derive(Debug, Clone)]
pub struct Spawner {
    config: SpawnerConfig,
    next_spawn_z: f32,
    entities: Vec<SpawnedEntity>,
    warned_missing_prefab: bool,
}

impl Spawner {
    pub fn new(config: SpawnerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            next_spawn_z: config.start_z,
            config,
            entities: Vec::new(),
            warned_missing_prefab: false,
        })
    }

    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    pub fn kind(&self) -> SpawnKind {
        self.config.kind
    }

    pub fn next_spawn_z(&self) -> f32 {
        self.next_spawn_z
    }

    pub fn entities(&self) -> &[SpawnedEntity] {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Option<&SpawnedEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Removes a tracked entity (collected coin, destroyed enemy).
    pub fn remove(&mut self, id: EntityId) -> Option<SpawnedEntity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Scrolls, culls and spawns for one frame.
    ///
    /// `world_distance` must already include this frame's `scroll_delta`.
    pub fn tick(
        &mut self,
        world_distance: f32,
        scroll_delta: f32,
        lane_width: f32,
        rng: &mut ChaCha8Rng,
        ids: &mut EntityIds,
    ) -> SpawnerTick {
        self.scroll(scroll_delta);
        self.cull_and_spawn(world_distance, lane_width, rng, ids)
    }

    /// Moves every tracked entity back with the world.
    pub fn scroll(&mut self, scroll_delta: f32) {
        if scroll_delta.is_finite() && scroll_delta > 0.0 {
            for entity in &mut self.entities {
                entity.position.z -= scroll_delta;
            }
        }
    }

    /// Destroys entities behind the cutoff, then spawns every batch the
    /// lookahead has reached.
    pub fn cull_and_spawn(
        &mut self,
        world_distance: f32,
        lane_width: f32,
        rng: &mut ChaCha8Rng,
        ids: &mut EntityIds,
    ) -> SpawnerTick {
        let mut result = SpawnerTick::default();

        let despawn_z = self.config.despawn_z;
        self.entities.retain(|entity| {
            if entity.position.z < despawn_z {
                debug!(
                    "[{}] Destroying entity {} at z={:.2}",
                    self.config.name, entity.id, entity.position.z
                );
                result.despawned.push(entity.id);
                false
            } else {
                true
            }
        });

        if self.config.prefab.is_none() {
            if !self.warned_missing_prefab {
                warn!("[{}] No prefab assigned, spawner disabled", self.config.name);
                self.warned_missing_prefab = true;
            }
            return result;
        }

        self.skip_culled_batches(world_distance);
        while world_distance + self.config.lookahead > self.next_spawn_z {
            let spawn_z = self.next_spawn_z;
            self.spawn_batch(spawn_z, world_distance, lane_width, rng, ids, &mut result);
            self.next_spawn_z += self.config.spacing;
        }

        result
    }

    /// Advances past batches that would land behind the cutoff and be
    /// destroyed on the next cull.
    fn skip_culled_batches(&mut self, world_distance: f32) {
        let behind = world_distance + self.config.despawn_z - self.next_spawn_z;
        if behind <= 0.0 {
            return;
        }
        let skipped = (behind / self.config.spacing).ceil();
        debug!(
            "[{}] Skipping {} batches behind the cutoff",
            self.config.name, skipped
        );
        self.next_spawn_z += skipped * self.config.spacing;
    }

    fn spawn_batch(
        &mut self,
        spawn_z: f32,
        world_distance: f32,
        lane_width: f32,
        rng: &mut ChaCha8Rng,
        ids: &mut EntityIds,
        result: &mut SpawnerTick,
    ) {
        let view_z = spawn_z - world_distance;
        let height = self.config.height;

        match &self.config.pattern {
            SpawnPattern::RandomLane => {
                let lane = Lane::ALL[rng.random_range(0..Lane::ALL.len())];
                let id = ids.next_id();
                debug!(
                    "[{}] Spawning {:?} {} in {:?} at z={:.2}",
                    self.config.name, self.config.kind, id, lane, spawn_z
                );
                self.entities.push(SpawnedEntity {
                    id,
                    kind: self.config.kind,
                    spawn_z,
                    position: Vec3::new(lane.world_x(lane_width), height, view_z),
                    lane: Some(lane),
                });
                result.spawned.push(id);
            }
            SpawnPattern::Line { offsets } => {
                for &x in offsets {
                    let id = ids.next_id();
                    self.entities.push(SpawnedEntity {
                        id,
                        kind: self.config.kind,
                        spawn_z,
                        position: Vec3::new(x, height, view_z),
                        lane: None,
                    });
                    result.spawned.push(id);
                }
                debug!(
                    "[{}] Spawning line of {} at z={:.2}",
                    self.config.name,
                    offsets.len(),
                    spawn_z
                );
            }
        }
    }
}
