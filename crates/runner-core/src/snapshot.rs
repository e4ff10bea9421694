//! Run snapshots for replay checks and debugging.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::game::{GamePhase, RunnerGame};
use crate::lane::Lane;
use crate::spawner::{EntityId, SpawnKind};
use crate::state::RunState;
use crate::tiles::Tile;

/// A spawned entity flattened for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: SpawnKind,
    pub spawn_z: f32,
    pub position: [f32; 3],
    pub lane: Option<Lane>,
}

/// Point-in-time copy of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub frame: u64,
    pub seed: u64,
    pub restarts: u64,
    pub phase: GamePhase,
    pub state: RunState,
    pub speed: f32,
    pub player_position: [f32; 3],
    pub tiles: Vec<Tile>,
    pub entities: Vec<EntitySnapshot>,
}

impl RunSnapshot {
    pub fn capture(game: &RunnerGame) -> Self {
        Self {
            frame: game.current_frame(),
            seed: game.seed(),
            restarts: game.restarts(),
            phase: game.phase(),
            state: game.state().clone(),
            speed: game.speed(),
            player_position: game.player_position().to_array(),
            tiles: game.tiles().tiles().to_vec(),
            entities: game
                .entities()
                .map(|e| EntitySnapshot {
                    id: e.id,
                    kind: e.kind,
                    spawn_z: e.spawn_z,
                    position: e.position.to_array(),
                    lane: e.lane,
                })
                .collect(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, SnapshotError> {
        Ok(postcard::from_bytes(data)?)
    }

    /// Hash over frame, run state, tile and entity positions.
    ///
    /// Floats are hashed by bit pattern, so equal hashes mean bit-identical runs.
    pub fn compute_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.frame.hash(&mut hasher);
        self.restarts.hash(&mut hasher);
        hash_f32(self.state.distance(), &mut hasher);
        hash_f32(self.state.score(), &mut hasher);
        self.state.lane().hash(&mut hasher);
        self.state.money().hash(&mut hasher);
        hash_f32(self.speed, &mut hasher);
        for v in self.player_position {
            hash_f32(v, &mut hasher);
        }

        for tile in &self.tiles {
            tile.id.hash(&mut hasher);
            hash_f32(tile.z, &mut hasher);
        }

        for entity in &self.entities {
            entity.id.hash(&mut hasher);
            entity.kind.hash(&mut hasher);
            for v in entity.position {
                hash_f32(v, &mut hasher);
            }
        }

        hasher.finish()
    }
}

impl RunnerGame {
    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot::capture(self)
    }
}

fn hash_f32(value: f32, hasher: &mut impl Hasher) {
    value.to_bits().hash(hasher);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunnerConfig;
    use crate::game::FIXED_DT;
    use crate::player::{FlatGroundMover, PlayerInput};

    fn scripted_run(seed: u64, frames: u32) -> RunnerGame {
        let mut game = RunnerGame::new(RunnerConfig::default_classic(), seed).unwrap();
        let mut mover = FlatGroundMover::default();
        for frame in 0..frames {
            let input = match frame % 90 {
                0 => PlayerInput::left(),
                30 => PlayerInput::jump(),
                60 => PlayerInput::right(),
                _ => PlayerInput::NONE,
            };
            game.tick(input, FIXED_DT, &mut mover);
        }
        game
    }

    #[test]
    fn test_same_seed_same_hash() {
        let a = scripted_run(1234, 600).snapshot();
        let b = scripted_run(1234, 600).snapshot();

        assert_eq!(a.compute_hash(), b.compute_hash());
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_hash() {
        let a = scripted_run(1, 600).snapshot();
        let b = scripted_run(2, 600).snapshot();

        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_bytes_preserve_hash() {
        let snapshot = scripted_run(99, 300).snapshot();

        let bytes = snapshot.to_bytes().unwrap();
        let decoded = RunSnapshot::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.compute_hash(), snapshot.compute_hash());
        assert_eq!(decoded.frame, snapshot.frame);
    }

    #[test]
    fn test_truncated_bytes_rejected() {
        let bytes = scripted_run(3, 60).snapshot().to_bytes().unwrap();
        assert!(RunSnapshot::from_bytes(&bytes[..bytes.len() / 2]).is_err());
    }
}
