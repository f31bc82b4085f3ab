//! Mesh generation for the sphere and the ground grid

use std::f32::consts::PI;

use super::vertex::{LineVertex, MeshVertex};

/// Grayscale shade of the grid's two center lines
const GRID_CENTER_SHADE: f32 = 0.27;
/// Grayscale shade of the remaining grid lines
const GRID_LINE_SHADE: f32 = 0.53;

/// Generate an indexed UV sphere.
///
/// Rings run pole to pole over `stacks` steps, `sectors` points per ring.
/// The seam column is duplicated so indexing stays a plain grid.
pub fn uv_sphere(radius: f32, sectors: u32, stacks: u32) -> (Vec<MeshVertex>, Vec<u16>) {
    let mut vertices = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
    let mut indices = Vec::with_capacity((stacks * sectors * 6) as usize);

    for stack in 0..=stacks {
        let phi = PI * stack as f32 / stacks as f32;
        let y = radius * phi.cos();
        let ring_r = radius * phi.sin();

        for sector in 0..=sectors {
            let theta = 2.0 * PI * sector as f32 / sectors as f32;
            vertices.push(MeshVertex::new(
                ring_r * theta.cos(),
                y,
                ring_r * theta.sin(),
            ));
        }
    }

    let row = sectors + 1;
    for stack in 0..stacks {
        for sector in 0..sectors {
            let a = (stack * row + sector) as u16;
            let b = a + row as u16;

            // Two triangles per quad; the degenerate ones at the poles
            // rasterize to nothing and aren't worth special-casing
            indices.extend_from_slice(&[a, b, a + 1]);
            indices.extend_from_slice(&[a + 1, b, b + 1]);
        }
    }

    (vertices, indices)
}

/// Generate a square grid of lines on the y = `height` plane.
///
/// `size` is the full side length, `divisions` the cell count per side. The
/// two lines through the center get their own shade.
pub fn grid(size: f32, divisions: u32, height: f32) -> Vec<LineVertex> {
    let half = size / 2.0;
    let step = size / divisions as f32;
    let mut vertices = Vec::with_capacity(((divisions + 1) * 4) as usize);

    for i in 0..=divisions {
        let offset = -half + i as f32 * step;
        let shade = if i * 2 == divisions {
            GRID_CENTER_SHADE
        } else {
            GRID_LINE_SHADE
        };

        // Line parallel to x
        vertices.push(LineVertex::new(-half, height, offset, shade));
        vertices.push(LineVertex::new(half, height, offset, shade));
        // Line parallel to z
        vertices.push(LineVertex::new(offset, height, -half, shade));
        vertices.push(LineVertex::new(offset, height, half, shade));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_counts() {
        let (vertices, indices) = uv_sphere(0.7, 32, 16);
        assert_eq!(vertices.len(), 33 * 17);
        assert_eq!(indices.len(), (32 * 16 * 6) as usize);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
    }

    #[test]
    fn test_sphere_on_surface() {
        let radius = 0.7;
        let (vertices, _) = uv_sphere(radius, 16, 8);
        for v in &vertices {
            let r = (v.position[0].powi(2) + v.position[1].powi(2) + v.position[2].powi(2)).sqrt();
            assert!((r - radius).abs() < 1e-5);
        }
    }

    #[test]
    fn test_grid_counts_and_extent() {
        let vertices = grid(20.0, 20, -1.0);
        assert_eq!(vertices.len(), 21 * 4);
        for v in &vertices {
            assert_eq!(v.position[1], -1.0);
            assert!(v.position[0].abs() <= 10.0 && v.position[2].abs() <= 10.0);
        }
    }
}
