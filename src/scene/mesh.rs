use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

/// Vertex data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Colored point for line and point-list geometry (orbit rings, stars)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl ColorVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColorVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Unit UV sphere shared by every body; scaled per instance.
pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl SphereMesh {
    /// Generate a unit sphere with `stacks` latitude bands and `slices`
    /// longitude segments. Values below 2 and 3 are raised to those minimums.
    pub fn new(stacks: u32, slices: u32) -> Self {
        let stacks = stacks.max(2);
        let slices = slices.max(3);

        let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
        let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);

        for i in 0..=stacks {
            let phi = PI * i as f32 / stacks as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for j in 0..=slices {
                let theta = TAU * j as f32 / slices as f32;
                let (sin_theta, cos_theta) = theta.sin_cos();
                let p = [sin_phi * cos_theta, cos_phi, sin_phi * sin_theta];
                vertices.push(Vertex {
                    position: p,
                    normal: p,
                });
            }
        }

        // Two triangles per quad, counter-clockwise seen from outside
        let row = slices + 1;
        for i in 0..stacks {
            for j in 0..slices {
                let a = i * row + j;
                let b = a + row;
                indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }

        Self { vertices, indices }
    }
}

/// Line-list circle of radius `distance` in the XZ plane.
pub fn orbit_ring(distance: f32, segments: u32, color: [f32; 4]) -> Vec<ColorVertex> {
    let segments = segments.max(3);
    let point = |k: u32| {
        let angle = TAU * k as f32 / segments as f32;
        ColorVertex {
            position: [angle.cos() * distance, 0.0, angle.sin() * distance],
            color,
        }
    };

    (0..segments).flat_map(|k| [point(k), point(k + 1)]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_counts() {
        let mesh = SphereMesh::new(4, 8);
        assert_eq!(mesh.vertices.len(), 5 * 9);
        assert_eq!(mesh.indices.len(), 4 * 8 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_sphere_is_unit() {
        let mesh = SphereMesh::new(8, 16);
        for v in &mesh.vertices {
            let len = v.position.iter().map(|c| c * c).sum::<f32>().sqrt();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_minimum_resolution() {
        let mesh = SphereMesh::new(0, 0);
        assert_eq!(mesh.vertices.len(), 3 * 4);
    }

    #[test]
    fn test_orbit_ring_radius() {
        let ring = orbit_ring(100.0, 64, [1.0; 4]);
        // Line list: two vertices per segment
        assert_eq!(ring.len(), 128);
        for v in &ring {
            let r = (v.position[0].powi(2) + v.position[2].powi(2)).sqrt();
            assert!((r - 100.0).abs() < 1e-3);
            assert_eq!(v.position[1], 0.0);
        }
    }
}
