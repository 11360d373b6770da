//! Mouse input for the orbit camera.
//!
//! Drag and scroll events queue rotate, pan and zoom deltas on the
//! [`OrbitCamera`]; the camera feeds them in through damping when it settles.
//! Keyboard controls live in [`crate::controls`].

use winit::event::{ElementState, MouseButton, MouseScrollDelta};

use crate::renderer::camera::OrbitCamera;

/// Sensitivity constants for mouse handling.
pub struct MouseConfig {
    /// Mouse rotation sensitivity (radians per pixel)
    pub rotate_sensitivity: f32,
    /// Mouse pan sensitivity (fraction of distance per pixel)
    pub pan_sensitivity: f32,
    /// Scroll zoom sensitivity (log-distance per scroll line)
    pub zoom_sensitivity: f32,
}

impl Default for MouseConfig {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.005,
            pan_sensitivity: 0.02,
            zoom_sensitivity: 0.2,
        }
    }
}

/// Tracks mouse state for drag operations.
#[derive(Default)]
pub struct MouseState {
    /// Left mouse button held
    pub left_pressed: bool,
    /// Right mouse button held
    pub right_pressed: bool,
    /// Shift key held
    pub shift_pressed: bool,
    /// Last mouse position (for computing delta)
    pub last_mouse_pos: Option<(f32, f32)>,
}

impl MouseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotating: left drag without shift
    pub fn is_rotating(&self) -> bool {
        self.left_pressed && !self.shift_pressed
    }

    /// Panning: right drag, or shift+left drag
    pub fn is_panning(&self) -> bool {
        self.right_pressed || (self.left_pressed && self.shift_pressed)
    }
}

/// Turns mouse events into orbit camera input.
#[derive(Default)]
pub struct MouseController {
    pub config: MouseConfig,
    pub state: MouseState,
}

impl MouseController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle mouse button press/release.
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.state.left_pressed = pressed,
            MouseButton::Right => self.state.right_pressed = pressed,
            _ => {}
        }
    }

    /// Track shift for shift+drag panning.
    pub fn handle_shift(&mut self, pressed: bool) {
        self.state.shift_pressed = pressed;
    }

    /// Handle mouse movement. Returns true if the camera received input.
    pub fn handle_mouse_move(&mut self, x: f32, y: f32, camera: &mut OrbitCamera) -> bool {
        let mut updated = false;

        if let Some((last_x, last_y)) = self.state.last_mouse_pos {
            let dx = x - last_x;
            let dy = y - last_y;

            if self.state.is_rotating() {
                self.rotate_camera(camera, dx, dy);
                updated = true;
            } else if self.state.is_panning() {
                self.pan_camera(camera, dx, dy);
                updated = true;
            }
        }

        self.state.last_mouse_pos = Some((x, y));
        updated
    }

    /// Handle mouse scroll for zooming.
    pub fn handle_scroll(&mut self, delta: MouseScrollDelta, camera: &mut OrbitCamera) {
        let scroll_amount = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
        };

        camera.dolly(scroll_amount * self.config.zoom_sensitivity);
    }

    /// Dragging right spins the scene right; dragging down tilts toward the top view.
    fn rotate_camera(&self, camera: &mut OrbitCamera, dx: f32, dy: f32) {
        camera.rotate(
            -dx * self.config.rotate_sensitivity,
            -dy * self.config.rotate_sensitivity,
        );
    }

    /// Pan camera and target in screen space.
    fn pan_camera(&self, camera: &mut OrbitCamera, dx: f32, dy: f32) {
        let forward = (camera.target - camera.position).normalize_or_zero();
        let right = forward.cross(glam::Vec3::Y).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        // Scale pan by distance (feels more natural)
        let scale = camera.distance() * self.config.pan_sensitivity * 0.1;

        camera.pan((-right * dx + up * dy) * scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_state_default() {
        let state = MouseState::new();
        assert!(!state.left_pressed);
        assert!(!state.is_rotating());
        assert!(!state.is_panning());
    }

    #[test]
    fn test_rotation_detection() {
        let mut state = MouseState::new();
        state.left_pressed = true;
        assert!(state.is_rotating());
        assert!(!state.is_panning());

        state.shift_pressed = true;
        assert!(!state.is_rotating());
        assert!(state.is_panning());
    }

    #[test]
    fn test_right_drag_pans() {
        let mut state = MouseState::new();
        state.right_pressed = true;
        assert!(state.is_panning());
        assert!(!state.is_rotating());
    }

    #[test]
    fn test_mouse_button_handling() {
        let mut controller = MouseController::new();

        controller.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.state.left_pressed);

        controller.handle_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!controller.state.left_pressed);
    }

    #[test]
    fn test_first_move_only_records_position() {
        let mut controller = MouseController::new();
        let mut camera = OrbitCamera::new();
        controller.state.left_pressed = true;

        assert!(!controller.handle_mouse_move(10.0, 10.0, &mut camera));
        assert!(!camera.is_settling());
        assert!(controller.handle_mouse_move(20.0, 10.0, &mut camera));
        assert!(camera.is_settling());
    }

    #[test]
    fn test_drag_without_button_does_nothing() {
        let mut controller = MouseController::new();
        let mut camera = OrbitCamera::new();
        controller.handle_mouse_move(0.0, 0.0, &mut camera);
        assert!(!controller.handle_mouse_move(50.0, 50.0, &mut camera));
        assert!(!camera.is_settling());
    }

    #[test]
    fn test_scroll_zooms_after_settling() {
        let mut controller = MouseController::new();
        let mut camera = OrbitCamera::new();
        let before = camera.distance();

        controller.handle_scroll(MouseScrollDelta::LineDelta(0.0, 1.0), &mut camera);
        for _ in 0..300 {
            camera.settle();
        }
        assert!(camera.distance() < before);
        assert!(camera.distance() >= camera.min_distance);
    }

    #[test]
    fn test_pan_keeps_view_direction() {
        let mut controller = MouseController::new();
        let mut camera = OrbitCamera::new();
        camera.damping_factor = 1.0;
        let before = camera.position - camera.target;

        controller.state.right_pressed = true;
        controller.handle_mouse_move(0.0, 0.0, &mut camera);
        controller.handle_mouse_move(30.0, -10.0, &mut camera);
        camera.settle();

        let after = camera.position - camera.target;
        assert!((after - before).length() < 1e-3);
        assert_ne!(camera.target, glam::Vec3::ZERO);
    }
}
