//! Player movement controller.
//!
//! A small state machine over grounded, airborne and sliding motion. Lane
//! changes go through [`RunState`] so the lane clamp lives in one place.
//! Collision resolution is left to a [`CharacterMover`]; the controller only
//! submits one combined move per tick.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::PlayerConfig;
use crate::lane::Lane;
use crate::state::RunState;

/// Player motion state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    #[default]
    Grounded,
    Airborne,
    Sliding,
}

/// Input gathered for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Requested lane step: negative is left, positive is right.
    pub lane_shift: i32,
    pub jump: bool,
    pub slide: bool,
}

impl PlayerInput {
    pub const NONE: Self = Self {
        lane_shift: 0,
        jump: false,
        slide: false,
    };

    pub fn left() -> Self {
        Self {
            lane_shift: -1,
            ..Self::NONE
        }
    }

    pub fn right() -> Self {
        Self {
            lane_shift: 1,
            ..Self::NONE
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Self::NONE
        }
    }

    pub fn slide() -> Self {
        Self {
            slide: true,
            ..Self::NONE
        }
    }

    /// Combines input collected across several frames.
    pub fn merge(&mut self, other: PlayerInput) {
        self.lane_shift = self.lane_shift.saturating_add(other.lane_shift);
        self.jump |= other.jump;
        self.slide |= other.slide;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Collision-aware mover the controller submits its moves to.
pub trait CharacterMover {
    /// Applies a movement delta, resolving collisions as the mover sees fit.
    fn move_by(&mut self, delta: Vec3);

    /// Current position after the last move.
    fn position(&self) -> Vec3;

    /// Whether the mover reports ground contact.
    fn is_grounded(&self) -> bool;
}

/// Mover for a flat ground plane. Used by headless runs and tests.
#[derive(Debug, Clone)]
pub struct FlatGroundMover {
    position: Vec3,
    ground_y: f32,
    grounded: bool,
}

impl FlatGroundMover {
    pub fn new(ground_y: f32) -> Self {
        Self {
            position: Vec3::new(0.0, ground_y, 0.0),
            ground_y,
            grounded: true,
        }
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }
}

impl Default for FlatGroundMover {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl CharacterMover for FlatGroundMover {
    fn move_by(&mut self, delta: Vec3) {
        self.position += delta;
        if self.position.y <= self.ground_y {
            self.position.y = self.ground_y;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }
}

/// What happened during a controller tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTick {
    pub jumped: bool,
    pub landed: bool,
    pub slide_started: bool,
    pub slide_ended: bool,
    pub lane_changed: Option<Lane>,
}

/// Player controller state.
#[derive(Debug, Clone)]
pub struct PlayerController {
    config: PlayerConfig,
    lane_width: f32,
    motion: MotionState,
    vertical_velocity: f32,
    slide_timer: f32,
}

impl PlayerController {
    pub fn new(config: PlayerConfig, lane_width: f32) -> Self {
        Self {
            vertical_velocity: config.ground_stick,
            config,
            lane_width,
            motion: MotionState::Grounded,
            slide_timer: 0.0,
        }
    }

    pub fn motion(&self) -> MotionState {
        self.motion
    }

    pub fn is_sliding(&self) -> bool {
        self.motion == MotionState::Sliding
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn slide_timer(&self) -> f32 {
        self.slide_timer
    }

    /// Collider height for the current motion state.
    pub fn current_height(&self) -> f32 {
        if self.is_sliding() {
            self.config.slide_height
        } else {
            self.config.height
        }
    }

    pub fn half_width(&self) -> f32 {
        self.config.half_width
    }

    /// Advances the controller by `dt` seconds and submits one move.
    pub fn tick(
        &mut self,
        input: PlayerInput,
        state: &mut RunState,
        dt: f32,
        mover: &mut impl CharacterMover,
    ) -> PlayerTick {
        let mut result = PlayerTick::default();
        let grounded = mover.is_grounded();

        // Vertical integration and landing
        match self.motion {
            MotionState::Airborne => {
                if grounded && self.vertical_velocity <= 0.0 {
                    self.motion = MotionState::Grounded;
                    self.vertical_velocity = self.config.ground_stick;
                    result.landed = true;
                    debug!("Player landed");
                } else {
                    self.vertical_velocity += self.config.gravity * dt;
                }
            }
            MotionState::Grounded | MotionState::Sliding => {
                self.vertical_velocity = self.config.ground_stick;
            }
        }

        if self.motion == MotionState::Sliding {
            self.slide_timer -= dt;
            if self.slide_timer <= 0.0 {
                self.slide_timer = 0.0;
                self.motion = MotionState::Grounded;
                result.slide_ended = true;
            }
        }

        if input.lane_shift != 0 {
            let before = state.lane();
            let after = state.shift_lane(input.lane_shift);
            if after != before {
                result.lane_changed = Some(after);
            }
        }

        if input.jump && self.motion == MotionState::Grounded {
            self.vertical_velocity = self.config.jump_force;
            self.motion = MotionState::Airborne;
            result.jumped = true;
            debug!("Player jumped with velocity {}", self.vertical_velocity);
        } else if input.slide && self.motion == MotionState::Grounded {
            self.motion = MotionState::Sliding;
            self.slide_timer = self.config.slide_duration;
            result.slide_started = true;
            debug!("Player started sliding for {}s", self.slide_timer);
        }

        // Bounded-rate approach to the lane center, never overshooting
        let target_x = state.lane().world_x(self.lane_width);
        let max_step = self.config.lane_change_speed * dt;
        let dx = (target_x - mover.position().x).clamp(-max_step, max_step);

        mover.move_by(Vec3::new(dx, self.vertical_velocity * dt, 0.0));
        result
    }
}
