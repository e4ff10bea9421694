//! Score display systems.

use bevy::prelude::*;

use crate::bevy::{HudText, MainCamera, RunnerSession, ScoreBoardRes};
use crate::hud::ScoreBoard;

/// HUD anchor relative to the camera, in pixels.
const HUD_OFFSET: Vec2 = Vec2::new(-260.0, 200.0);

/// System to refresh [`ScoreBoardRes`] when the run state changes.
pub fn update_scoreboard(session: Res<RunnerSession>, mut scoreboard: ResMut<ScoreBoardRes>) {
    let board = ScoreBoard::from_state(session.game.state());
    // Avoid triggering change detection every frame
    if scoreboard.0 != board {
        scoreboard.0 = board;
    }
}

/// Spawns the HUD text entity.
pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        HudText,
        Text2d::new(""),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_xyz(HUD_OFFSET.x, HUD_OFFSET.y, 10.0),
    ));
}

/// Writes the scoreboard into the HUD text and pins it to the camera.
pub fn update_hud_text(
    scoreboard: Res<ScoreBoardRes>,
    cameras: Query<&Transform, (With<MainCamera>, Without<HudText>)>,
    mut texts: Query<(&mut Text2d, &mut Transform), With<HudText>>,
) {
    let anchor = cameras
        .iter()
        .next()
        .map_or(Vec2::ZERO, |t| t.translation.truncate());

    for (mut text, mut transform) in texts.iter_mut() {
        if scoreboard.is_changed() {
            let board = &scoreboard.0;
            text.0 = format!("{}\n{}\n{}", board.score_text, board.coins_text, board.best_text);
        }
        transform.translation.x = anchor.x + HUD_OFFSET.x;
        transform.translation.y = anchor.y + HUD_OFFSET.y;
    }
}
