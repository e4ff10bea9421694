//! Command processing system.
//!
//! Processes commands pushed through the shared [`CommandQueue`].

use bevy::prelude::*;

use crate::bevy::{CommandQueue, GameCommand, PlayerIntent, RestartRunEvent};
use crate::player::PlayerInput;

/// System to process commands from the external command queue.
///
/// Handles commands until a Yield is encountered.
/// Commands after Yield are processed in the next frame.
pub fn process_commands(
    command_queue: Res<CommandQueue>,
    mut intent: ResMut<PlayerIntent>,
    mut restart_events: MessageWriter<RestartRunEvent>,
) {
    for command in command_queue.drain_until_yield() {
        match command {
            GameCommand::ShiftLane { delta } => {
                tracing::info!("[command] ShiftLane: {}", delta);
                intent.add(PlayerInput {
                    lane_shift: delta,
                    ..PlayerInput::NONE
                });
            }
            GameCommand::Jump => {
                tracing::info!("[command] Jump");
                intent.add(PlayerInput::jump());
            }
            GameCommand::Slide => {
                tracing::info!("[command] Slide");
                intent.add(PlayerInput::slide());
            }
            GameCommand::Restart => {
                tracing::info!("[command] Restart");
                restart_events.write(RestartRunEvent);
            }
            // Yield is consumed by drain_until_yield(), should not reach here
            GameCommand::Yield => {}
        }
    }
}
