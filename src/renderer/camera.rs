use glam::{Mat4, Vec3};

use crate::controls::CameraRig;

/// Keeps the polar angle away from the poles so `look_at` stays defined.
const POLAR_EPSILON: f32 = 1e-3;

/// Pending deltas smaller than this are dropped.
const SETTLE_EPSILON: f32 = 1e-5;

/// Damped orbit camera: a free position looking at a target point.
///
/// Mouse interaction does not move the camera directly; it queues rotate,
/// pan and zoom deltas that [`OrbitCamera::settle`] feeds in a fraction at a
/// time.
pub struct OrbitCamera {
    /// Camera position in world space
    pub position: Vec3,
    /// Look-at target point
    pub target: Vec3,
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Fraction of pending input applied per settle, in (0, 1]
    pub damping_factor: f32,
    /// Minimum camera-to-target distance
    pub min_distance: f32,
    /// Maximum camera-to-target distance
    pub max_distance: f32,

    pending_azimuth: f32,
    pending_elevation: f32,
    pending_zoom: f32,
    pending_pan: Vec3,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 100.0, 200.0),
            target: Vec3::ZERO,
            fov: 75.0,
            near: 0.1,
            far: 2000.0,
            damping_factor: 0.05,
            min_distance: 10.0,
            max_distance: 500.0,
            pending_azimuth: 0.0,
            pending_elevation: 0.0,
            pending_zoom: 0.0,
            pending_pan: Vec3::ZERO,
        }
    }

    /// Current camera-to-target distance
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Queue an orbit around the target (radians).
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.pending_azimuth += d_azimuth;
        self.pending_elevation += d_elevation;
    }

    /// Queue a world-space translation of camera and target together.
    pub fn pan(&mut self, delta: Vec3) {
        self.pending_pan += delta;
    }

    /// Queue a zoom; positive values move toward the target.
    pub fn dolly(&mut self, amount: f32) {
        self.pending_zoom += amount;
    }

    /// Whether any mouse input is still being fed in.
    pub fn is_settling(&self) -> bool {
        self.pending_azimuth != 0.0
            || self.pending_elevation != 0.0
            || self.pending_zoom != 0.0
            || self.pending_pan != Vec3::ZERO
    }

    /// Drop queued mouse input.
    pub fn stop(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_elevation = 0.0;
        self.pending_zoom = 0.0;
        self.pending_pan = Vec3::ZERO;
    }

    /// Apply one damping step and clamp the distance into range.
    pub fn settle(&mut self) {
        let distance = self.distance();
        let in_range = distance >= self.min_distance && distance <= self.max_distance;
        if !self.is_settling() && in_range {
            return;
        }

        let d = self.damping_factor.clamp(f32::EPSILON, 1.0);
        let mut offset = self.position - self.target;

        if self.pending_azimuth != 0.0 || self.pending_elevation != 0.0 {
            let radius = offset.length();
            let theta = offset.x.atan2(offset.z) + self.pending_azimuth * d;
            let phi = if radius > 0.0 {
                (offset.y / radius).clamp(-1.0, 1.0).acos()
            } else {
                std::f32::consts::FRAC_PI_2
            };
            let phi = (phi + self.pending_elevation * d)
                .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
            offset = radius * Vec3::new(phi.sin() * theta.sin(), phi.cos(), phi.sin() * theta.cos());
        }

        if self.pending_zoom != 0.0 {
            offset *= (-self.pending_zoom * d).exp();
        }

        self.target += self.pending_pan * d;

        let length = offset.length();
        if length > 0.0 {
            let clamped = length.clamp(self.min_distance, self.max_distance);
            if clamped != length {
                offset *= clamped / length;
            }
        } else {
            offset = Vec3::Z * self.min_distance;
        }
        self.position = self.target + offset;

        let decay = 1.0 - d;
        self.pending_azimuth = decayed(self.pending_azimuth, decay);
        self.pending_elevation = decayed(self.pending_elevation, decay);
        self.pending_zoom = decayed(self.pending_zoom, decay);
        self.pending_pan *= decay;
        if self.pending_pan.length() < SETTLE_EPSILON {
            self.pending_pan = Vec3::ZERO;
        }
    }

    /// Build view matrix (camera transform)
    pub fn build_view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// Build perspective projection matrix
    pub fn build_projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }

    /// Combined view-projection matrix
    pub fn build_view_projection_matrix(&self, aspect: f32) -> Mat4 {
        self.build_projection_matrix(aspect) * self.build_view_matrix()
    }
}

fn decayed(value: f32, decay: f32) -> f32 {
    let next = value * decay;
    if next.abs() < SETTLE_EPSILON {
        0.0
    } else {
        next
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig for OrbitCamera {
    fn camera_position(&self) -> Vec3 {
        self.position
    }

    fn set_camera_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn forward_direction(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    fn settle(&mut self) {
        OrbitCamera::settle(self);
    }
}
