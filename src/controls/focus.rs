//! Focus-on-body camera animation.
//!
//! A focus request fixes its destination at request time: the body's current
//! world position plus an offset scaled by its radius. The camera then tweens
//! there over a fixed duration even if the body keeps orbiting.

use glam::Vec3;

use super::easing::ease_in_out_cubic;
use super::CameraRig;
use crate::catalog::Catalog;
use crate::scene::BodyPositions;

/// Camera distance from a focused body, in body radii.
pub const FOCUS_DISTANCE_FACTOR: f32 = 4.0;

/// Length of a focus animation in seconds.
pub const FOCUS_DURATION: f32 = 1.5;

/// One in-flight camera tween.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub start_position: Vec3,
    pub end_position: Vec3,
    pub start_target: Vec3,
    pub end_target: Vec3,
    pub elapsed: f32,
    pub duration: f32,
}

impl Transition {
    /// Normalized linear progress in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Camera position and target at the current progress.
    pub fn sample(&self) -> (Vec3, Vec3) {
        let p = self.progress();
        if p >= 1.0 {
            return (self.end_position, self.end_target);
        }
        let e = ease_in_out_cubic(p);
        (
            self.start_position.lerp(self.end_position, e),
            self.start_target.lerp(self.end_target, e),
        )
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Tracks the selected body and drives the focus tween.
///
/// Two states: idle (no transition) and transitioning. A new request always
/// replaces the current transition; requests are never queued.
#[derive(Debug, Clone)]
pub struct FocusController {
    selected: Option<String>,
    transition: Option<Transition>,
    distance_factor: f32,
    duration: f32,
}

impl FocusController {
    pub fn new(distance_factor: f32, duration: f32) -> Self {
        Self {
            selected: None,
            transition: None,
            distance_factor,
            duration,
        }
    }

    /// Currently selected body, updated as soon as a request is accepted.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Linear progress of the active transition, if any.
    pub fn progress(&self) -> Option<f32> {
        self.transition.as_ref().map(Transition::progress)
    }

    /// Camera offset from a body of the given radius when focused on it.
    pub fn focus_offset(&self, radius: f32) -> Vec3 {
        let d = radius * self.distance_factor;
        Vec3::new(d, 0.5 * d, d)
    }

    /// Start a transition toward `name`.
    ///
    /// Returns `false` and changes nothing when the body is not in the catalog
    /// or has no live position yet.
    pub fn request_focus(
        &mut self,
        name: &str,
        catalog: &Catalog,
        bodies: &dyn BodyPositions,
        rig: &dyn CameraRig,
    ) -> bool {
        let Some(body) = catalog.get(name) else {
            log::debug!("Ignoring focus request for unknown body '{}'", name);
            return false;
        };
        let Some(body_position) = bodies.world_position(name) else {
            log::debug!("Ignoring focus request for '{}': no scene position yet", name);
            return false;
        };

        let end_position = body_position + self.focus_offset(body.radius);
        if self.transition.is_some() {
            log::debug!("Focus on '{}' supersedes the active transition", name);
        }
        self.transition = Some(Transition {
            start_position: rig.camera_position(),
            end_position,
            start_target: rig.target(),
            end_target: body_position,
            elapsed: 0.0,
            duration: self.duration,
        });
        self.selected = Some(body.name.clone());

        log::info!("Focusing on {}", body.display_name());
        true
    }

    /// Advance the active transition by `dt` seconds and write the result into
    /// the rig. Does nothing when idle.
    pub fn advance(&mut self, dt: f32, rig: &mut dyn CameraRig) {
        let Some(transition) = self.transition.as_mut() else {
            return;
        };

        transition.elapsed += dt.max(0.0);
        let (position, target) = transition.sample();
        rig.set_camera_position(position);
        rig.set_target(target);

        if transition.is_finished() {
            log::debug!(
                "Focus transition to '{}' complete",
                self.selected.as_deref().unwrap_or("?")
            );
            self.transition = None;
        }
    }
}

impl Default for FocusController {
    fn default() -> Self {
        Self::new(FOCUS_DISTANCE_FACTOR, FOCUS_DURATION)
    }
}
