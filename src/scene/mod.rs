//! Live scene state: where every body is right now.
//!
//! This module provides:
//! - [`BodyPositions`] - Read-only position lookup consumed by the camera controls
//! - [`SolarScene`] - Per-body transforms advanced by the orbital-motion updater
//! - [`Starfield`] - Background star points
//! - [`SphereMesh`] / [`orbit_ring`] - GPU-ready geometry

pub mod colors;
pub mod mesh;
pub mod starfield;

use glam::Vec3;

use crate::catalog::Catalog;

pub use mesh::{orbit_ring, ColorVertex, SphereMesh, Vertex};
pub use starfield::Starfield;

/// Rates in the catalog are expressed per frame at this frequency.
const REFERENCE_FPS: f32 = 60.0;

/// Source of current body world positions.
pub trait BodyPositions {
    /// Current world position of `name`, or `None` when the body is unknown.
    fn world_position(&self, name: &str) -> Option<Vec3>;
}

/// Appearance settings for scene construction.
#[derive(Debug, Clone, Copy)]
pub struct SceneConfig {
    /// Number of background stars
    pub star_count: usize,
    /// Side length of the star cube
    pub star_spread: f32,
    /// Seed for star placement
    pub star_seed: u64,
    /// Multiplier applied to orbital speed (1.0 = catalog speed)
    pub time_scale: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            star_count: 15_000,
            star_spread: 2000.0,
            star_seed: 0x5EED,
            time_scale: 1.0,
        }
    }
}

/// A translucent shell drawn around the sun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowShell {
    /// Radius relative to the sun
    pub scale: f32,
    pub color: [f32; 3],
    pub opacity: f32,
    /// Rotation about (Y, Z) in radians
    pub rotation: [f32; 2],
    /// Rotation rate about (Y, Z) per 60 Hz frame
    pub spin: [f32; 2],
}

impl GlowShell {
    fn inner() -> Self {
        Self {
            scale: 1.2,
            color: colors::hex_to_rgb(0xffdd66),
            opacity: 0.4,
            rotation: [0.0; 2],
            spin: [0.003, 0.002],
        }
    }

    fn outer() -> Self {
        Self {
            scale: 1.4,
            color: colors::hex_to_rgb(0xff8833),
            opacity: 0.2,
            rotation: [0.0; 2],
            spin: [-0.002, -0.003],
        }
    }
}

/// Live transform of one body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
    pub name: String,
    pub position: Vec3,
    /// Spin about the body's own Y axis in radians
    pub spin: f32,
    pub radius: f32,
    pub color: [f32; 3],
    pub emissive: Option<f32>,
    distance: f32,
    rotation_speed: f32,
}

/// Scene graph for the solar system.
///
/// Bodies follow circular orbits in the XZ plane; the updater is deliberately
/// simple and runs independently of the camera controls.
pub struct SolarScene {
    bodies: Vec<BodyState>,
    pub glow_shells: [GlowShell; 2],
    time_scale: f32,
}

impl SolarScene {
    /// Place every body on the +X axis at its orbital distance.
    pub fn new(catalog: &Catalog, time_scale: f32) -> Self {
        let bodies = catalog
            .iter()
            .map(|body| BodyState {
                name: body.name.clone(),
                position: Vec3::new(body.distance, 0.0, 0.0),
                spin: 0.0,
                radius: body.radius,
                color: body.color,
                emissive: body.emissive,
                distance: body.distance,
                rotation_speed: body.rotation_speed,
            })
            .collect();

        Self {
            bodies,
            glow_shells: [GlowShell::inner(), GlowShell::outer()],
            time_scale,
        }
    }

    /// Advance orbits to `elapsed` seconds since start and spin everything by
    /// `dt` seconds worth of rotation.
    pub fn update(&mut self, elapsed: f32, dt: f32) {
        let frames = dt * REFERENCE_FPS;

        for body in &mut self.bodies {
            if body.distance > 0.0 {
                let angle = elapsed * self.time_scale * body.rotation_speed;
                body.position = Vec3::new(
                    angle.cos() * body.distance,
                    0.0,
                    angle.sin() * body.distance,
                );
            }
            body.spin = (body.spin + body.rotation_speed * frames) % std::f32::consts::TAU;
        }

        for shell in &mut self.glow_shells {
            shell.rotation[0] += shell.spin[0] * frames;
            shell.rotation[1] += shell.spin[1] * frames;
        }
    }

    pub fn bodies(&self) -> &[BodyState] {
        &self.bodies
    }

    /// Body that carries the glow shells (the first emissive one).
    pub fn star(&self) -> Option<&BodyState> {
        self.bodies.iter().find(|b| b.emissive.is_some())
    }

    /// Orbital distances of every orbiting body, for ring geometry.
    pub fn orbit_distances(&self) -> impl Iterator<Item = f32> + '_ {
        self.bodies
            .iter()
            .map(|b| b.distance)
            .filter(|d| *d > 0.0)
    }
}

impl BodyPositions for SolarScene {
    fn world_position(&self, name: &str) -> Option<Vec3> {
        self.bodies
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.position)
    }
}
