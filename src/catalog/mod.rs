//! Celestial catalog: the static description of every body in the system.
//!
//! This module provides:
//! - [`CelestialBody`] - Size, orbit and appearance of one body
//! - [`Catalog`] - Ordered, name-keyed collection of bodies
//! - [`load_catalog`] - Parser for catalog override files

pub mod loader;

pub use loader::{load_catalog, parse_catalog, CatalogError};

/// Static description of a single body.
///
/// Created once at startup and never mutated. Live positions are owned by
/// [`crate::scene::SolarScene`].
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    /// Unique key (lowercase, e.g. `"earth"`)
    pub name: String,
    /// Sphere radius in world units, always > 0
    pub radius: f32,
    /// Orbital distance from the origin, >= 0
    pub distance: f32,
    /// Spin per 60 Hz frame in radians, also the orbital angular speed
    pub rotation_speed: f32,
    /// Base surface color (linear RGB)
    pub color: [f32; 3],
    /// Emissive intensity for self-lit bodies (the sun)
    pub emissive: Option<f32>,
}

impl CelestialBody {
    pub fn new(name: &str, radius: f32, distance: f32, rotation_speed: f32, color: u32) -> Self {
        Self {
            name: name.to_string(),
            radius,
            distance,
            rotation_speed,
            color: crate::scene::colors::hex_to_rgb(color),
            emissive: None,
        }
    }

    pub fn with_emissive(mut self, intensity: f32) -> Self {
        self.emissive = Some(intensity);
        self
    }

    /// Display name with the first letter capitalised.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Ordered collection of bodies. Iteration order is catalog order, which also
/// drives the digit keybinds.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    bodies: Vec<CelestialBody>,
}

impl Catalog {
    /// Build a catalog from bodies in the given order.
    ///
    /// # Example
    ///
    /// ```
    /// use orrery::catalog::{Catalog, CelestialBody};
    ///
    /// let catalog = Catalog::new(vec![CelestialBody::new("earth", 10.0, 100.0, 0.002, 0x2a6bd4)]);
    /// assert_eq!(catalog.len(), 1);
    /// assert_eq!(catalog.get("earth").map(|b| b.radius), Some(10.0));
    /// ```
    pub fn new(bodies: Vec<CelestialBody>) -> Self {
        Self { bodies }
    }

    /// The built-in sun and eight planets.
    pub fn solar_system() -> Self {
        Self::new(vec![
            CelestialBody::new("sun", 20.0, 0.0, 0.004, 0xffd54a).with_emissive(0.6),
            CelestialBody::new("mercury", 3.8, 40.0, 0.004, 0x9e9690),
            CelestialBody::new("venus", 9.5, 70.0, 0.002, 0xe3c27f),
            CelestialBody::new("earth", 10.0, 100.0, 0.002, 0x2a6bd4),
            CelestialBody::new("mars", 5.3, 130.0, 0.0018, 0xc1440e),
            CelestialBody::new("jupiter", 15.0, 180.0, 0.004, 0xd8ca9d),
            CelestialBody::new("saturn", 12.0, 230.0, 0.0038, 0xe3d59b),
            CelestialBody::new("uranus", 8.0, 280.0, 0.003, 0x9fd6e0),
            CelestialBody::new("neptune", 7.5, 320.0, 0.0028, 0x3f54ba),
        ])
    }

    pub fn get(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CelestialBody> {
        self.bodies.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.iter().map(|b| b.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Largest orbital distance, used to size the scene.
    pub fn max_distance(&self) -> f32 {
        self.bodies.iter().map(|b| b.distance).fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solar_system_order() {
        let catalog = Catalog::solar_system();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(
            names,
            vec!["sun", "mercury", "venus", "earth", "mars", "jupiter", "saturn", "uranus", "neptune"]
        );
    }

    #[test]
    fn test_solar_system_values() {
        let catalog = Catalog::solar_system();
        let earth = catalog.get("earth").unwrap();
        assert_eq!(earth.radius, 10.0);
        assert_eq!(earth.distance, 100.0);

        let sun = catalog.get("sun").unwrap();
        assert_eq!(sun.distance, 0.0);
        assert_eq!(sun.emissive, Some(0.6));
        assert!(catalog.iter().all(|b| b.radius > 0.0));
    }

    #[test]
    fn test_get_unknown() {
        let catalog = Catalog::solar_system();
        assert!(catalog.get("pluto").is_none());
    }

    #[test]
    fn test_display_name() {
        let body = CelestialBody::new("jupiter", 15.0, 180.0, 0.004, 0);
        assert_eq!(body.display_name(), "Jupiter");
    }

    #[test]
    fn test_max_distance() {
        assert_eq!(Catalog::solar_system().max_distance(), 320.0);
        assert_eq!(Catalog::default().max_distance(), 0.0);
    }
}
