//! Bevy integration for the runner.
//!
//! This module wraps the core simulation in ECS resources, drives it from
//! `FixedUpdate`, mirrors it into entities, and provides gizmo rendering
//! for windowed play.

pub mod components;
pub mod events;
pub mod plugin;
pub mod resources;
pub mod systems;

#[cfg(test)]
pub(crate) mod test_utils;

pub use components::*;
pub use events::*;
pub use plugin::{RunPhase, RunnerHeadlessPlugin, RunnerUnifiedPlugin};
pub use resources::*;
