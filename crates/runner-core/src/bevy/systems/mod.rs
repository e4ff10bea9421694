//! Systems for the runner.
//!
//! Organized by functionality:
//! - command: Command queue processing
//! - input: Keyboard controls
//! - simulation: Fixed-step run tick and message forwarding
//! - sync: Mirror tiles, spawned entities and the player into the ECS
//! - camera: Follow camera
//! - hud: Scoreboard and HUD text
//! - game_over: Phase transitions and restart
//! - rendering: Gizmo drawing

pub mod camera;
pub mod command;
pub mod game_over;
pub mod hud;
pub mod input;
pub mod rendering;
pub mod simulation;
pub mod sync;

pub use camera::*;
pub use command::*;
pub use game_over::*;
pub use hud::*;
pub use input::*;
pub use rendering::*;
pub use simulation::*;
pub use sync::*;
