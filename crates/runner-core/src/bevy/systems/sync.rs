//! ECS mirroring of the simulation.
//!
//! Tiles, spawned entities and the player each get one entity whose
//! `Transform` tracks the simulation. Tile entities are reused across
//! recycling, so their count always equals the pool size.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::bevy::{EntityIndex, PlayerMarker, RunnerSession, SpawnedMarker, TileMarker};

/// Spawns the player entity.
pub fn spawn_player(mut commands: Commands, session: Res<RunnerSession>) {
    commands.spawn((
        Name::new("Player"),
        PlayerMarker {
            motion: session.game.player().motion(),
            height: session.game.player().current_height(),
        },
        Transform::from_translation(session.player_position()),
    ));
}

/// Moves tile entities to their pooled positions, creating any that are missing.
pub fn sync_tiles(
    mut commands: Commands,
    session: Res<RunnerSession>,
    mut index: ResMut<EntityIndex>,
    mut tiles: Query<&mut Transform, With<TileMarker>>,
) {
    for tile in session.game.tiles().tiles() {
        let translation = Vec3::new(0.0, 0.0, tile.z);
        let existing = index.tiles.get(&tile.id).copied();
        match existing.and_then(|entity| tiles.get_mut(entity).ok()) {
            Some(mut transform) => transform.translation = translation,
            None => {
                let entity = commands
                    .spawn((
                        Name::new(format!("Tile {}", tile.id)),
                        TileMarker { id: tile.id },
                        Transform::from_translation(translation),
                    ))
                    .id();
                index.tiles.insert(tile.id, entity);
            }
        }
    }
}

/// Spawns, moves and despawns mirror entities for spawner output.
pub fn sync_spawned_entities(
    mut commands: Commands,
    session: Res<RunnerSession>,
    mut index: ResMut<EntityIndex>,
    mut spawned: Query<&mut Transform, With<SpawnedMarker>>,
) {
    let mut live = HashSet::new();

    for entity in session.game.entities() {
        live.insert(entity.id);
        let existing = index.spawned.get(&entity.id).copied();
        match existing.and_then(|e| spawned.get_mut(e).ok()) {
            Some(mut transform) => transform.translation = entity.position,
            None => {
                let mirror = commands
                    .spawn((
                        Name::new(format!("{:?} {}", entity.kind, entity.id)),
                        SpawnedMarker {
                            id: entity.id,
                            kind: entity.kind,
                        },
                        Transform::from_translation(entity.position),
                    ))
                    .id();
                index.spawned.insert(entity.id, mirror);
            }
        }
    }

    index.spawned.retain(|id, mirror| {
        if live.contains(id) {
            true
        } else {
            commands.entity(*mirror).despawn();
            false
        }
    });
}

/// Copies the player position and motion state.
pub fn sync_player(session: Res<RunnerSession>, mut players: Query<(&mut PlayerMarker, &mut Transform)>) {
    let player = session.game.player();
    for (mut marker, mut transform) in players.iter_mut() {
        marker.motion = player.motion();
        marker.height = player.current_height();
        transform.translation = session.player_position();
    }
}
