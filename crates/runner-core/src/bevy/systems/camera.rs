//! Follow camera.
//!
//! The scene is drawn top-down: world X maps to screen X and world Z
//! (distance ahead) maps to screen Y.

use bevy::prelude::*;

use crate::bevy::{MainCamera, RunnerSession};

/// Screen pixels per world unit.
pub const PIXELS_PER_UNIT: f32 = 16.0;

/// Projects a world position onto the top-down screen plane.
pub fn top_down(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z) * PIXELS_PER_UNIT
}

/// System to place the main camera at the rig position.
pub fn follow_player(
    session: Res<RunnerSession>,
    mut cameras: Query<&mut Transform, With<MainCamera>>,
) {
    let target = top_down(session.game.camera().position());
    for mut transform in cameras.iter_mut() {
        transform.translation.x = target.x;
        transform.translation.y = target.y;
    }
}
