//! Camera rig that keeps a fixed offset to the player.

use bevy::math::Vec3;

use crate::config::CameraConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    offset: Vec3,
    position: Vec3,
}

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        let offset = Vec3::from_array(config.offset);
        Self {
            offset,
            position: offset,
        }
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn follow(&mut self, target: Vec3) {
        self.position = target + self.offset;
    }
}
