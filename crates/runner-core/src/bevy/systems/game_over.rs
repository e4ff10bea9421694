//! Game over and restart.

use bevy::prelude::*;

use crate::bevy::plugin::RunPhase;
use crate::bevy::{
    EntityIndex, GameOverText, MainCamera, PlayerIntent, RestartRunEvent,
    RunEndedEvent, RunnerSession, SpawnedMarker,
};

/// System to switch to [`RunPhase::GameOver`] when the run ends.
pub fn enter_game_over(
    mut events: MessageReader<RunEndedEvent>,
    mut next_phase: ResMut<NextState<RunPhase>>,
) {
    for event in events.read() {
        tracing::info!(
            "[game_over] {:?}: distance={:.1}, score={:.0}",
            event.cause,
            event.distance,
            event.score
        );
        next_phase.set(RunPhase::GameOver);
    }
}

/// System to start a new run on request.
///
/// Spawned mirror entities are dropped immediately; tiles and the player
/// are moved back by the sync systems.
pub fn handle_restart(
    mut commands: Commands,
    mut events: MessageReader<RestartRunEvent>,
    mut session: ResMut<RunnerSession>,
    mut intent: ResMut<PlayerIntent>,
    mut index: ResMut<EntityIndex>,
    spawned: Query<Entity, With<SpawnedMarker>>,
    mut next_phase: ResMut<NextState<RunPhase>>,
) {
    if events.read().count() == 0 {
        return;
    }

    if let Err(e) = session.restart() {
        tracing::error!("[game_over] Restart failed: {}", e);
        return;
    }

    for entity in spawned.iter() {
        commands.entity(entity).despawn();
    }
    index.clear_spawned();
    intent.take();
    next_phase.set(RunPhase::Running);
}

/// Shows the game over banner.
pub fn spawn_game_over_text(
    mut commands: Commands,
    session: Res<RunnerSession>,
    cameras: Query<&Transform, With<MainCamera>>,
) {
    let anchor = cameras
        .iter()
        .next()
        .map_or(Vec3::ZERO, |t| t.translation);
    let state = session.game.state();

    commands.spawn((
        GameOverText,
        Text2d::new(format!(
            "GAME OVER\nDistance: {:.0}  Coins: {}\nPress R to restart",
            state.distance(),
            state.money()
        )),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.3, 0.3)),
        Transform::from_xyz(anchor.x, anchor.y, 20.0),
    ));
}

pub fn despawn_game_over_text(mut commands: Commands, texts: Query<Entity, With<GameOverText>>) {
    for entity in texts.iter() {
        commands.entity(entity).despawn();
    }
}
