//! Background starfield: random points in a cube around the system.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::colors::hsl_to_rgb;
use super::mesh::ColorVertex;

/// Star opacity, shared by every point.
const STAR_OPACITY: f32 = 0.8;

/// Generated star points ready for GPU upload.
pub struct Starfield {
    pub points: Vec<ColorVertex>,
}

impl Starfield {
    /// Scatter `count` stars uniformly in a cube of side `spread` centred at the
    /// origin. The same seed always yields the same sky.
    pub fn generate(count: usize, spread: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let half = spread * 0.5;

        let points = (0..count)
            .map(|_| {
                let position = [
                    (rng.random::<f32>() - 0.5) * spread,
                    (rng.random::<f32>() - 0.5) * spread,
                    (rng.random::<f32>() - 0.5) * spread,
                ];
                debug_assert!(position.iter().all(|c| c.abs() <= half));

                let hue = rng.random_range(0.5..0.7);
                let lightness = rng.random_range(0.8..1.0);
                let [r, g, b] = hsl_to_rgb(hue, 0.2, lightness);
                ColorVertex {
                    position,
                    color: [r, g, b, STAR_OPACITY],
                }
            })
            .collect();

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_count() {
        let stars = Starfield::generate(500, 2000.0, 7);
        assert_eq!(stars.len(), 500);
        assert!(Starfield::generate(0, 2000.0, 7).is_empty());
    }

    #[test]
    fn test_stars_within_spread() {
        let stars = Starfield::generate(1000, 2000.0, 1);
        for star in &stars.points {
            assert!(star.position.iter().all(|c| c.abs() <= 1000.0));
        }
    }

    #[test]
    fn test_same_seed_same_sky() {
        let a = Starfield::generate(64, 2000.0, 42);
        let b = Starfield::generate(64, 2000.0, 42);
        for (sa, sb) in a.points.iter().zip(b.points.iter()) {
            assert_eq!(sa.position, sb.position);
            assert_eq!(sa.color, sb.color);
        }
    }

    #[test]
    fn test_star_colors_are_bright() {
        let stars = Starfield::generate(200, 2000.0, 3);
        for star in &stars.points {
            assert!(star.color[..3].iter().all(|c| *c >= 0.75));
            assert_eq!(star.color[3], STAR_OPACITY);
        }
    }
}
