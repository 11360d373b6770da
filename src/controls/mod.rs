//! Keyboard camera controls: focus-on-body animation and manual movement.
//!
//! This module provides:
//! - [`CameraRig`] - The camera/orbit-target seam the controllers write through
//! - [`FocusController`] - Animated, interruptible focus transitions
//! - [`MotionController`] - Continuous movement from held keys
//! - [`InputRouter`] - Splits key events into held keys and focus requests
//! - [`CameraDirector`] - Per-frame driver that fixes the write order
//!
//! Within one frame the camera is written in this order:
//!
//! 1. key events have already updated the held-key set
//! 2. manual motion displaces camera and target
//! 3. the rig settles (orbit damping, distance clamp)
//! 4. an active focus transition overwrites position and target
//!
//! While a focus transition runs, manual motion therefore has no visible
//! effect; free control resumes once it completes.

pub mod easing;
pub mod focus;
pub mod keybinds;
pub mod motion;
pub mod router;

use glam::Vec3;
use winit::event::ElementState;
use winit::keyboard::Key;

use crate::catalog::Catalog;
use crate::scene::BodyPositions;

pub use focus::{FocusController, Transition, FOCUS_DISTANCE_FACTOR, FOCUS_DURATION};
pub use keybinds::Keybinds;
pub use motion::MotionController;
pub use router::{FocusRequest, HeldKeys, InputRouter, MoveKey};

/// Pan speed from arrow keys, world units per second.
pub const MOVE_SPEED: f32 = 100.0;

/// Zoom speed from `+`/`-`, world units per second.
pub const ZOOM_SPEED: f32 = 20.0;

/// Longest frame step fed to the controllers, in seconds.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Camera position and orbit target, as seen by the controllers.
pub trait CameraRig {
    fn camera_position(&self) -> Vec3;
    fn set_camera_position(&mut self, position: Vec3);
    fn target(&self) -> Vec3;
    fn set_target(&mut self, target: Vec3);
    /// Unit vector from the camera toward its target.
    fn forward_direction(&self) -> Vec3;
    /// One damping step of the orbit interaction.
    fn settle(&mut self);
}

/// Tunables for the keyboard controls.
#[derive(Debug, Clone, Copy)]
pub struct ControlsConfig {
    /// Arrow-key pan speed (units per second)
    pub move_speed: f32,
    /// `+`/`-` zoom speed (units per second)
    pub zoom_speed: f32,
    /// Focus distance in body radii
    pub focus_distance_factor: f32,
    /// Focus animation length (seconds)
    pub focus_duration: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            zoom_speed: ZOOM_SPEED,
            focus_distance_factor: FOCUS_DISTANCE_FACTOR,
            focus_duration: FOCUS_DURATION,
        }
    }
}

/// Owns the keyboard controllers and runs them in a fixed order each frame.
#[derive(Debug, Clone)]
pub struct CameraDirector {
    pub focus: FocusController,
    pub motion: MotionController,
    router: InputRouter,
}

impl CameraDirector {
    pub fn new(catalog: &Catalog, config: &ControlsConfig) -> Self {
        Self {
            focus: FocusController::new(config.focus_distance_factor, config.focus_duration),
            motion: MotionController::new(config.move_speed, config.zoom_speed),
            router: InputRouter::new(Keybinds::from_catalog(catalog)),
        }
    }

    pub fn keybinds(&self) -> &Keybinds {
        self.router.keybinds()
    }

    pub fn held(&self) -> &HeldKeys {
        self.router.held()
    }

    /// Currently selected body, for display.
    pub fn selected(&self) -> Option<&str> {
        self.focus.selected()
    }

    /// Drop all held keys.
    pub fn release_all(&mut self) {
        self.router.clear();
    }

    /// Handle one key event.
    ///
    /// Focus requests are dropped when `rig` is `None` (camera not built yet).
    /// Returns `true` when a focus transition was started.
    pub fn handle_key(
        &mut self,
        key: &Key,
        state: ElementState,
        repeat: bool,
        catalog: &Catalog,
        bodies: &dyn BodyPositions,
        rig: Option<&dyn CameraRig>,
    ) -> bool {
        let Some(request) = self.router.route(key, state, repeat) else {
            return false;
        };
        let Some(rig) = rig else {
            log::debug!("Ignoring focus on '{}': camera not ready", request.body);
            return false;
        };
        self.focus.request_focus(&request.body, catalog, bodies, rig)
    }

    /// Run one frame of camera control.
    ///
    /// `dt` is the real time since the previous frame in seconds; it is
    /// clamped to [`MAX_FRAME_DT`] so a stalled frame cannot teleport the camera.
    pub fn frame(&mut self, dt: f32, rig: &mut dyn CameraRig) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        self.motion.apply(dt, self.router.held(), rig);
        rig.settle();
        self.focus.advance(dt, rig);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use glam::Vec3;

    use super::CameraRig;
    use crate::scene::BodyPositions;

    /// Body positions that only change when a test says so.
    pub struct FixedPositions {
        positions: HashMap<String, Vec3>,
    }

    impl FixedPositions {
        pub fn new(entries: &[(&str, Vec3)]) -> Self {
            Self {
                positions: entries
                    .iter()
                    .map(|(name, pos)| (name.to_string(), *pos))
                    .collect(),
            }
        }

        pub fn set(&mut self, name: &str, position: Vec3) {
            self.positions.insert(name.to_string(), position);
        }
    }

    impl BodyPositions for FixedPositions {
        fn world_position(&self, name: &str) -> Option<Vec3> {
            self.positions.get(name).copied()
        }
    }

    /// Undamped rig that records writes and settle calls.
    pub struct TestRig {
        pub position: Vec3,
        pub target: Vec3,
        pub writes: usize,
        pub settles: usize,
    }

    impl TestRig {
        pub fn at(position: Vec3, target: Vec3) -> Self {
            Self {
                position,
                target,
                writes: 0,
                settles: 0,
            }
        }
    }

    impl CameraRig for TestRig {
        fn camera_position(&self) -> Vec3 {
            self.position
        }

        fn set_camera_position(&mut self, position: Vec3) {
            self.position = position;
            self.writes += 1;
        }

        fn target(&self) -> Vec3 {
            self.target
        }

        fn set_target(&mut self, target: Vec3) {
            self.target = target;
            self.writes += 1;
        }

        fn forward_direction(&self) -> Vec3 {
            (self.target - self.position)
                .try_normalize()
                .unwrap_or(Vec3::NEG_Z)
        }

        fn settle(&mut self) {
            self.settles += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{FixedPositions, TestRig};
    use super::*;
    use crate::renderer::camera::OrbitCamera;
    use crate::scene::SolarScene;
    use winit::keyboard::NamedKey;

    fn setup() -> (Catalog, FixedPositions, CameraDirector) {
        let catalog = Catalog::solar_system();
        let bodies = FixedPositions::new(&[
            ("earth", Vec3::new(100.0, 0.0, 0.0)),
            ("mars", Vec3::new(0.0, 0.0, 130.0)),
        ]);
        let director = CameraDirector::new(&catalog, &ControlsConfig::default());
        (catalog, bodies, director)
    }

    fn press(
        director: &mut CameraDirector,
        key: Key,
        catalog: &Catalog,
        bodies: &FixedPositions,
        rig: &TestRig,
    ) -> bool {
        director.handle_key(&key, ElementState::Pressed, false, catalog, bodies, Some(rig))
    }

    #[test]
    fn test_key_selects_synchronously() {
        let (catalog, bodies, mut director) = setup();
        let rig = TestRig::at(Vec3::new(0.0, 100.0, 200.0), Vec3::ZERO);

        assert!(press(&mut director, Key::Character("4".into()), &catalog, &bodies, &rig));
        assert_eq!(director.selected(), Some("earth"));
        assert!(director.focus.is_transitioning());
    }

    #[test]
    fn test_focus_ignored_without_rig() {
        let (catalog, bodies, mut director) = setup();
        let started = director.handle_key(
            &Key::Character("4".into()),
            ElementState::Pressed,
            false,
            &catalog,
            &bodies,
            None,
        );
        assert!(!started);
        assert_eq!(director.selected(), None);
    }

    #[test]
    fn test_movement_keys_need_no_rig() {
        let (catalog, bodies, mut director) = setup();
        director.handle_key(
            &Key::Named(NamedKey::ArrowUp),
            ElementState::Pressed,
            false,
            &catalog,
            &bodies,
            None,
        );
        assert!(director.held().contains(MoveKey::Up));
    }

    #[test]
    fn test_frame_runs_motion_then_settle() {
        let (catalog, bodies, mut director) = setup();
        let mut rig = TestRig::at(Vec3::new(0.0, 100.0, 200.0), Vec3::ZERO);
        press(&mut director, Key::Named(NamedKey::ArrowRight), &catalog, &bodies, &rig);

        director.frame(0.05, &mut rig);
        assert_eq!(rig.position, Vec3::new(5.0, 100.0, 200.0));
        assert_eq!(rig.target, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(rig.settles, 1);
    }

    #[test]
    fn test_focus_wins_over_manual_motion() {
        let (catalog, bodies, mut director) = setup();
        let mut rig = TestRig::at(Vec3::new(0.0, 100.0, 200.0), Vec3::ZERO);

        press(&mut director, Key::Character("4".into()), &catalog, &bodies, &rig);
        press(&mut director, Key::Named(NamedKey::ArrowUp), &catalog, &bodies, &rig);
        press(&mut director, Key::Named(NamedKey::ArrowLeft), &catalog, &bodies, &rig);

        let expected = {
            let mut shadow = director.focus.clone();
            let mut shadow_rig = TestRig::at(rig.position, rig.target);
            shadow.advance(0.05, &mut shadow_rig);
            (shadow_rig.position, shadow_rig.target)
        };

        director.frame(0.05, &mut rig);
        assert_eq!((rig.position, rig.target), expected);
    }

    #[test]
    fn test_manual_motion_resumes_after_transition() {
        let (catalog, bodies, mut director) = setup();
        let mut rig = TestRig::at(Vec3::new(0.0, 100.0, 200.0), Vec3::ZERO);
        press(&mut director, Key::Character("4".into()), &catalog, &bodies, &rig);

        for _ in 0..20 {
            director.frame(0.1, &mut rig);
        }
        assert!(!director.focus.is_transitioning());
        assert_eq!(rig.position, Vec3::new(140.0, 20.0, 40.0));

        press(&mut director, Key::Named(NamedKey::ArrowUp), &catalog, &bodies, &rig);
        director.frame(0.1, &mut rig);
        assert!((rig.position - Vec3::new(140.0, 30.0, 40.0)).length() < 1e-4);
        assert!((rig.target - Vec3::new(100.0, 10.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_frame_dt_is_clamped() {
        let (catalog, bodies, mut director) = setup();
        let mut rig = TestRig::at(Vec3::ZERO, Vec3::NEG_Z);
        press(&mut director, Key::Named(NamedKey::ArrowRight), &catalog, &bodies, &rig);

        director.frame(5.0, &mut rig);
        assert!((rig.position.x - MOVE_SPEED * MAX_FRAME_DT).abs() < 1e-4);
    }

    #[test]
    fn test_supersede_mid_flight() {
        let (catalog, bodies, mut director) = setup();
        let mut rig = TestRig::at(Vec3::new(0.0, 100.0, 200.0), Vec3::ZERO);

        press(&mut director, Key::Character("4".into()), &catalog, &bodies, &rig);
        for _ in 0..15 {
            director.frame(0.05, &mut rig);
        }
        let midway = rig.position;

        press(&mut director, Key::Character("5".into()), &catalog, &bodies, &rig);
        assert_eq!(director.selected(), Some("mars"));
        let transition = director.focus.transition().unwrap();
        assert_eq!(transition.start_position, midway);
    }

    #[test]
    fn test_with_real_scene_and_camera() {
        let catalog = Catalog::solar_system();
        let scene = SolarScene::new(&catalog, 1.0);
        let mut camera = OrbitCamera::new();
        let mut director = CameraDirector::new(&catalog, &ControlsConfig::default());

        director.handle_key(
            &Key::Character("4".into()),
            ElementState::Pressed,
            false,
            &catalog,
            &scene,
            Some(&camera),
        );
        for _ in 0..40 {
            director.frame(1.0 / 20.0, &mut camera);
        }

        assert!(!director.focus.is_transitioning());
        assert_eq!(camera.position, Vec3::new(140.0, 20.0, 40.0));
        assert_eq!(camera.target, Vec3::new(100.0, 0.0, 0.0));

        // Settling afterwards keeps the framing: 60 units is within range
        director.frame(1.0 / 60.0, &mut camera);
        assert_eq!(camera.position, Vec3::new(140.0, 20.0, 40.0));
    }
}
