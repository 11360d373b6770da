//! Keyboard-driven camera movement.
//!
//! Continuous mode: while movement keys are held, a velocity is recomputed and
//! applied every frame, scaled by the frame's elapsed time. Pan moves along
//! world axes; zoom moves along the camera's current facing.

use glam::Vec3;

use super::router::{HeldKeys, MoveKey};
use super::CameraRig;

/// Converts the held-key set into camera and target displacement.
#[derive(Debug, Clone, Copy)]
pub struct MotionController {
    /// Pan speed in world units per second
    pub move_speed: f32,
    /// Zoom speed in world units per second
    pub zoom_speed: f32,
}

impl MotionController {
    pub fn new(move_speed: f32, zoom_speed: f32) -> Self {
        Self {
            move_speed,
            zoom_speed,
        }
    }

    /// Velocity for the given held keys and camera facing.
    ///
    /// Contributions are summed without normalization, so diagonal movement is
    /// faster than movement along a single axis. Keys are summed in a fixed
    /// order, so the result does not depend on the order they were pressed.
    pub fn compute_velocity(&self, held: &HeldKeys, forward: Vec3) -> Vec3 {
        held.iter().fold(Vec3::ZERO, |velocity, key| {
            velocity
                + match key {
                    MoveKey::Up => Vec3::Y * self.move_speed,
                    MoveKey::Down => Vec3::NEG_Y * self.move_speed,
                    MoveKey::Left => Vec3::NEG_X * self.move_speed,
                    MoveKey::Right => Vec3::X * self.move_speed,
                    MoveKey::ZoomIn => forward * self.zoom_speed,
                    MoveKey::ZoomOut => -forward * self.zoom_speed,
                }
        })
    }

    /// Displace camera position and target together by one frame of motion.
    ///
    /// Returns the displacement applied; the rig is untouched when it is zero.
    pub fn apply(&self, dt: f32, held: &HeldKeys, rig: &mut dyn CameraRig) -> Vec3 {
        if held.is_empty() {
            return Vec3::ZERO;
        }

        let displacement = self.compute_velocity(held, rig.forward_direction()) * dt;
        if displacement == Vec3::ZERO {
            return displacement;
        }

        rig.set_camera_position(rig.camera_position() + displacement);
        rig.set_target(rig.target() + displacement);
        displacement
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(super::MOVE_SPEED, super::ZOOM_SPEED)
    }
}
