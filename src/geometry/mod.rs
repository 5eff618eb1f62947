//! Procedural geometry.
//!
//! Everything in here runs on the CPU and produces [`GeometryData`], an
//! indexed triangle list that [`Mesh::from_geometry`](crate::data_structures::model::Mesh::from_geometry)
//! uploads later. Keeping the builders GPU-free makes them testable without an
//! adapter.
//!
//! - `curve` contains arc-length parametrised Bezier curves, lines and paths
//! - `lathe` revolves a profile around the Y axis
//! - `parametric` samples an arbitrary `(u, v) -> point` surface
//! - `primitives` holds spheres, tori, boxes and planes

pub mod curve;
pub mod lathe;
pub mod parametric;
pub mod primitives;

use cgmath::{InnerSpace, Vector3, Zero};

use crate::data_structures::model::ModelVertex;

/// An indexed triangle list with counter-clockwise front faces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryData {
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /**
     * Area-weighted smooth normals: every triangle adds its unnormalised
     * face normal to its three corners, the sums are normalised at the end.
     * Vertices that belong to no (non-degenerate) triangle keep a zero normal.
     */
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3::<f32>::zero(); self.vertices.len()];
        for c in self.indices.chunks(3) {
            if c.len() < 3 {
                continue;
            }
            let (a, b, d) = (c[0] as usize, c[1] as usize, c[2] as usize);
            let pa: Vector3<f32> = self.vertices[a].position.into();
            let pb: Vector3<f32> = self.vertices[b].position.into();
            let pc: Vector3<f32> = self.vertices[d].position.into();
            let face = (pc - pb).cross(pa - pb);
            normals[a] += face;
            normals[b] += face;
            normals[d] += face;
        }
        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            vertex.normal = if normal.magnitude2() > 0.0 {
                normal.normalize().into()
            } else {
                [0.0; 3]
            };
        }
    }
}

/// Linearly remap `value` from `[s_min, s_max]` to `[d_min, d_max]`.
pub fn map_range(value: f32, s_min: f32, s_max: f32, d_min: f32, d_max: f32) -> f32 {
    d_min + ((value - s_min) / (s_max - s_min)) * (d_max - d_min)
}

/// Point on a circle in the XZ plane: `(radius * cos(angle), radius * sin(angle))`.
pub fn polar(angle: f32, radius: f32) -> (f32, f32) {
    (radius * angle.cos(), radius * angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(position: [f32; 3]) -> ModelVertex {
        ModelVertex {
            position,
            ..Default::default()
        }
    }

    #[test]
    fn map_range_remaps_linearly() {
        assert_eq!(map_range(0.5, 0.0, 1.0, 10.0, 20.0), 15.0);
        assert_eq!(map_range(0.0, 0.0, 50.0, 0.01, 3.0), 0.01);
        // extrapolates outside the source range
        assert_eq!(map_range(2.0, 0.0, 1.0, 0.0, 10.0), 20.0);
    }

    #[test]
    fn polar_lies_on_circle() {
        let (x, z) = polar(1.2, 3.0);
        assert!(((x * x + z * z).sqrt() - 3.0).abs() < 1e-5);
        assert_eq!(polar(0.0, 2.0), (2.0, 0.0));
    }

    #[test]
    fn ccw_triangle_normal_points_towards_viewer() {
        let mut geometry = GeometryData {
            vertices: vec![
                vertex([0.0, 0.0, 0.0]),
                vertex([1.0, 0.0, 0.0]),
                vertex([0.0, 1.0, 0.0]),
            ],
            indices: vec![0, 1, 2],
        };
        geometry.compute_vertex_normals();
        for v in &geometry.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn unreferenced_vertices_keep_zero_normal() {
        let mut geometry = GeometryData {
            vertices: vec![vertex([0.0; 3]), vertex([1.0, 0.0, 0.0])],
            indices: vec![],
        };
        geometry.compute_vertex_normals();
        assert!(geometry.vertices.iter().all(|v| v.normal == [0.0; 3]));
        assert!(geometry.is_empty());
    }
}
