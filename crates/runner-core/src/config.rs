//! Run configuration.
//!
//! All tunables for the world scroller, player controller, camera rig and
//! spawners. Loaded from JSON; every field has a default so partial files
//! are accepted.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ensure_non_negative, ensure_positive};
use crate::spawner::{SpawnKind, SpawnPattern};

/// Ground tile and scroll speed settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of tiles kept alive in the pool.
    pub tile_count: usize,
    /// Measured tile length. `None` (no measurable bounds) falls back to
    /// [`DEFAULT_TILE_LENGTH`](crate::tiles::DEFAULT_TILE_LENGTH).
    pub tile_length: Option<f32>,
    /// Z below which a tile is recycled. Defaults to `-tile_length`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recycle_threshold: Option<f32>,
    /// Initial backward shift of the whole pool, to cover the area behind the player.
    pub back_offset: f32,
    /// Starting scroll speed in units per second.
    pub speed: f32,
    /// Speed gained per second.
    pub acceleration: f32,
    pub max_speed: f32,
    /// Distance between lane centers.
    pub lane_width: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            tile_count: 6,
            tile_length: Some(30.0),
            recycle_threshold: None,
            back_offset: 0.0,
            speed: 10.0,
            acceleration: 0.1,
            max_speed: 25.0,
            lane_width: 3.0,
        }
    }
}

/// Player movement tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Vertical velocity applied on jump.
    pub jump_force: f32,
    /// Vertical acceleration while airborne (negative is down).
    pub gravity: f32,
    /// Vertical velocity held while grounded so the mover keeps ground contact.
    pub ground_stick: f32,
    /// Seconds a slide lasts.
    pub slide_duration: f32,
    /// Maximum horizontal speed while changing lanes.
    pub lane_change_speed: f32,
    pub height: f32,
    pub slide_height: f32,
    pub half_width: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            jump_force: 8.0,
            gravity: -25.0,
            ground_stick: -2.0,
            slide_duration: 0.8,
            lane_change_speed: 15.0,
            height: 2.0,
            slide_height: 1.0,
            half_width: 0.5,
        }
    }
}

/// Camera follow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fixed offset from the player.
    pub offset: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 5.0, -8.0],
        }
    }
}

/// One spawner definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerConfig {
    pub name: String,
    pub kind: SpawnKind,
    /// Prefab key used by the presentation layer. A spawner without a prefab never spawns.
    #[serde(default)]
    pub prefab: Option<String>,
    /// World distance of the first spawn.
    pub start_z: f32,
    /// Distance added to the next spawn Z after each spawn.
    pub spacing: f32,
    /// How far ahead of the current distance entities are spawned.
    pub lookahead: f32,
    /// View-space Z below which entities are destroyed.
    #[serde(default = "default_despawn_z")]
    pub despawn_z: f32,
    /// Y coordinate of spawned entities.
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub pattern: SpawnPattern,
}

fn default_despawn_z() -> f32 {
    -10.0
}

impl SpawnerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("spawner.spacing", self.spacing)?;
        ensure_positive("spawner.lookahead", self.lookahead)?;
        if let SpawnPattern::Line { offsets } = &self.pattern {
            if offsets.is_empty() {
                return Err(ConfigError::EmptyLinePattern {
                    name: self.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunnerConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub spawners: Vec<SpawnerConfig>,
}

impl RunnerConfig {
    /// Loads a configuration from a JSON string and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The default track: obstacles, coins, enemies and buoy lines.
    /// Loaded from presets/default.json at compile time.
    pub fn default_classic() -> Self {
        const DEFAULT_PRESET_JSON: &str = include_str!("../presets/default.json");
        Self::from_json(DEFAULT_PRESET_JSON).expect("Failed to parse default preset JSON")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if world.tile_count == 0 {
            return Err(ConfigError::EmptyTilePool);
        }
        if let Some(threshold) = world.recycle_threshold {
            if !threshold.is_finite() || threshold >= 0.0 {
                return Err(ConfigError::ThresholdAhead { threshold });
            }
        }
        ensure_positive("world.speed", world.speed)?;
        ensure_positive("world.max_speed", world.max_speed)?;
        ensure_non_negative("world.acceleration", world.acceleration)?;
        ensure_positive("world.lane_width", world.lane_width)?;

        let player = &self.player;
        ensure_positive("player.jump_force", player.jump_force)?;
        ensure_positive("player.gravity (magnitude)", -player.gravity)?;
        ensure_positive("player.slide_duration", player.slide_duration)?;
        ensure_positive("player.lane_change_speed", player.lane_change_speed)?;
        ensure_positive("player.height", player.height)?;
        ensure_positive("player.slide_height", player.slide_height)?;
        ensure_positive("player.half_width", player.half_width)?;

        for spawner in &self.spawners {
            spawner.validate()?;
        }
        Ok(())
    }

    /// Returns the spawner definitions of the given kind.
    pub fn spawners_of(&self, kind: SpawnKind) -> impl Iterator<Item = &SpawnerConfig> {
        self.spawners.iter().filter(move |s| s.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_classic_preset() {
        let config = RunnerConfig::default_classic();

        assert_eq!(config.world.tile_count, 6);
        assert_eq!(config.world.tile_length, Some(30.0));
        assert_eq!(config.spawners_of(SpawnKind::Obstacle).count(), 1);
        assert_eq!(config.spawners_of(SpawnKind::Coin).count(), 1);
        assert_eq!(config.spawners_of(SpawnKind::Enemy).count(), 1);

        let buoys: Vec<_> = config.spawners_of(SpawnKind::Buoy).collect();
        assert_eq!(buoys.len(), 1);
        match &buoys[0].pattern {
            SpawnPattern::Line { offsets } => assert_eq!(offsets.len(), 4),
            SpawnPattern::RandomLane => panic!("buoys should use a line pattern"),
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "world": { "tile_count": 4 },
            "spawners": [
                {
                    "name": "rocks",
                    "kind": "obstacle",
                    "prefab": "rock",
                    "start_z": 30,
                    "spacing": 15,
                    "lookahead": 40
                }
            ]
        }"#;

        let config = RunnerConfig::from_json(json).expect("valid config");
        assert_eq!(config.world.tile_count, 4);
        assert_eq!(config.world.lane_width, 3.0);
        assert_eq!(config.player.jump_force, 8.0);
        assert_eq!(config.spawners[0].despawn_z, -10.0);
        assert!(matches!(config.spawners[0].pattern, SpawnPattern::RandomLane));
    }

    #[test]
    fn test_rejects_invalid_values() {
        let json = r#"{ "world": { "tile_count": 0 } }"#;
        assert!(matches!(
            RunnerConfig::from_json(json),
            Err(ConfigError::EmptyTilePool)
        ));

        let json = r#"{ "world": { "recycle_threshold": 5.0 } }"#;
        assert!(matches!(
            RunnerConfig::from_json(json),
            Err(ConfigError::ThresholdAhead { .. })
        ));

        let json = r#"{
            "spawners": [
                { "name": "buoys", "kind": "buoy", "prefab": "buoy", "start_z": 0,
                  "spacing": 10, "lookahead": 40, "pattern": { "type": "line", "offsets": [] } }
            ]
        }"#;
        assert!(matches!(
            RunnerConfig::from_json(json),
            Err(ConfigError::EmptyLinePattern { .. })
        ));

        assert!(matches!(
            RunnerConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_negative_acceleration() {
        let json = r#"{ "world": { "acceleration": -5.0 } }"#;
        assert!(matches!(
            RunnerConfig::from_json(json),
            Err(ConfigError::Negative {
                field: "world.acceleration",
                ..
            })
        ));

        // A constant speed is fine.
        let json = r#"{ "world": { "acceleration": 0.0 } }"#;
        assert!(RunnerConfig::from_json(json).is_ok());
    }

    #[test]
    fn test_json_roundtrip_keeps_spawners() {
        let config = RunnerConfig::default_classic();
        let json = config.to_json().expect("Failed to serialize");
        let loaded = RunnerConfig::from_json(&json).expect("Failed to deserialize");

        assert_eq!(loaded.spawners.len(), config.spawners.len());
        assert_eq!(loaded.world.tile_count, config.world.tile_count);
    }
}
