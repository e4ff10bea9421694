//! The three discrete lanes the player can occupy.

use serde::{Deserialize, Serialize};

/// Number of lanes on the track.
pub const LANE_COUNT: i32 = 3;

/// A lane index, always in `0..LANE_COUNT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    /// Builds a lane from any integer, clamping to the valid range.
    pub fn from_index_clamped(index: i32) -> Self {
        match index.clamp(0, LANE_COUNT - 1) {
            0 => Self::Left,
            1 => Self::Center,
            _ => Self::Right,
        }
    }

    pub const fn index(self) -> i32 {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }

    /// Returns the lane `delta` steps away, clamped at the outer lanes.
    pub fn shifted(self, delta: i32) -> Self {
        Self::from_index_clamped(self.index().saturating_add(delta))
    }

    /// World X coordinate of the lane center. The center lane sits on `x = 0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn world_x(self, lane_width: f32) -> f32 {
        (self.index() - 1) as f32 * lane_width
    }
}
