//! Gizmo rendering of the track, spawned entities and the player.

use bevy::prelude::*;

use crate::bevy::systems::camera::{PIXELS_PER_UNIT, top_down};
use crate::bevy::{PlayerMarker, RunnerSession, SpawnedMarker, TileMarker};
use crate::collision::entity_half_extents;
use crate::lane::Lane;
use crate::player::MotionState;
use crate::spawner::SpawnKind;

const TILE_COLORS: [Color; 2] = [Color::srgb(0.22, 0.24, 0.28), Color::srgb(0.27, 0.29, 0.33)];

fn kind_color(kind: SpawnKind) -> Color {
    match kind {
        SpawnKind::Obstacle => Color::srgb(0.85, 0.25, 0.2),
        SpawnKind::Coin => Color::srgb(1.0, 0.85, 0.1),
        SpawnKind::Enemy => Color::srgb(0.65, 0.3, 0.9),
        SpawnKind::Buoy => Color::srgb(1.0, 0.55, 0.1),
    }
}

/// System to draw ground tiles and lane dividers.
#[allow(clippy::cast_precision_loss)]
pub fn render_track(
    mut gizmos: Gizmos,
    session: Res<RunnerSession>,
    tiles: Query<(&TileMarker, &Transform)>,
) {
    let world = &session.game.config().world;
    let tile_length = session.game.tiles().tile_length();
    let width = world.lane_width * Lane::ALL.len() as f32;

    for (marker, transform) in tiles.iter() {
        let center = transform.translation + Vec3::new(0.0, 0.0, tile_length * 0.5);
        let color = TILE_COLORS[usize::from(marker.id % 2 == 1)];
        gizmos.rect_2d(
            Isometry2d::from_translation(top_down(center)),
            Vec2::new(width, tile_length) * PIXELS_PER_UNIT,
            color,
        );
    }

    // Dividers between lanes, over the visible pool
    let tiles = session.game.tiles();
    for lane in [Lane::Left, Lane::Center] {
        let x = lane.world_x(world.lane_width) + world.lane_width * 0.5;
        let start = top_down(Vec3::new(x, 0.0, tiles.min_z()));
        let end = top_down(Vec3::new(x, 0.0, tiles.max_z() + tile_length));
        gizmos.line_2d(start, end, Color::srgba(1.0, 1.0, 1.0, 0.25));
    }
}

/// System to draw spawned entities.
pub fn render_spawned(mut gizmos: Gizmos, entities: Query<(&SpawnedMarker, &Transform)>) {
    for (marker, transform) in entities.iter() {
        let pos = top_down(transform.translation);
        let half = entity_half_extents(marker.kind);
        let color = kind_color(marker.kind);
        match marker.kind {
            SpawnKind::Obstacle => {
                gizmos.rect_2d(
                    Isometry2d::from_translation(pos),
                    Vec2::new(half.x, half.z) * 2.0 * PIXELS_PER_UNIT,
                    color,
                );
            }
            SpawnKind::Coin | SpawnKind::Enemy | SpawnKind::Buoy => {
                gizmos.circle_2d(Isometry2d::from_translation(pos), half.x * PIXELS_PER_UNIT, color);
            }
        }
    }
}

/// System to draw the player.
///
/// Airborne players get a larger outline over a ground shadow; sliding
/// players are drawn as a box as long as their collider is tall.
pub fn render_player(mut gizmos: Gizmos, players: Query<(&PlayerMarker, &Transform)>) {
    for (marker, transform) in players.iter() {
        let ground = top_down(transform.translation);
        let radius = 0.5 * PIXELS_PER_UNIT;
        let color = Color::srgb(0.2, 0.6, 1.0);

        match marker.motion {
            MotionState::Grounded => {
                gizmos.circle_2d(Isometry2d::from_translation(ground), radius, color);
            }
            MotionState::Sliding => {
                gizmos.rect_2d(
                    Isometry2d::from_translation(ground),
                    Vec2::new(2.0 * radius, marker.height * 0.5 * PIXELS_PER_UNIT),
                    color,
                );
            }
            MotionState::Airborne => {
                let lift = 1.0 + transform.translation.y * 0.3;
                gizmos.circle_2d(
                    Isometry2d::from_translation(ground),
                    radius,
                    Color::srgba(0.0, 0.0, 0.0, 0.4),
                );
                gizmos.circle_2d(Isometry2d::from_translation(ground), radius * lift, color);
            }
        }
    }
}
