//! Keyboard controls.
//!
//! Arrows or WASD steer, Space also jumps, R or Enter restarts after a game over.

use bevy::prelude::*;

use crate::bevy::plugin::RunPhase;
use crate::bevy::{PlayerIntent, RestartRunEvent};
use crate::player::PlayerInput;

/// Movement input for the keys pressed this frame.
pub fn input_from_keys(keys: &ButtonInput<KeyCode>) -> PlayerInput {
    let mut input = PlayerInput::NONE;
    if keys.any_just_pressed([KeyCode::ArrowLeft, KeyCode::KeyA]) {
        input.lane_shift -= 1;
    }
    if keys.any_just_pressed([KeyCode::ArrowRight, KeyCode::KeyD]) {
        input.lane_shift += 1;
    }
    input.jump = keys.any_just_pressed([KeyCode::ArrowUp, KeyCode::KeyW, KeyCode::Space]);
    input.slide = keys.any_just_pressed([KeyCode::ArrowDown, KeyCode::KeyS]);
    input
}

/// Feeds keyboard input into the pending [`PlayerIntent`].
pub fn handle_keyboard_input(
    keys: Res<ButtonInput<KeyCode>>,
    phase: Res<State<RunPhase>>,
    mut intent: ResMut<PlayerIntent>,
    mut restart_events: MessageWriter<RestartRunEvent>,
) {
    match phase.get() {
        RunPhase::Running => {
            let input = input_from_keys(&keys);
            if !input.is_empty() {
                intent.add(input);
            }
        }
        RunPhase::GameOver => {
            if keys.any_just_pressed([KeyCode::KeyR, KeyCode::Enter]) {
                restart_events.write(RestartRunEvent);
            }
        }
    }
}
