use std::f32::consts::TAU;

use cgmath::{InnerSpace, Vector3};

use crate::{data_structures::model::ModelVertex, geometry::GeometryData};

/**
 * Revolve a profile around the Y axis over a full turn.
 *
 * Each profile point is `(radius, height)` taken from the x and y components.
 * Column `i` of the output holds the whole profile rotated by
 * `i / segments * TAU`; the first and the last column coincide and their
 * normals are averaged so the seam does not show.
 */
pub fn lathe(points: &[Vector3<f32>], segments: u32) -> GeometryData {
    if points.len() < 2 || segments == 0 {
        return GeometryData::default();
    }
    let rows = points.len();
    let mut vertices = Vec::with_capacity((segments as usize + 1) * rows);

    for i in 0..=segments {
        let phi = i as f32 / segments as f32 * TAU;
        let (sin, cos) = phi.sin_cos();
        for (j, point) in points.iter().enumerate() {
            vertices.push(ModelVertex {
                position: [point.x * sin, point.y, point.x * cos],
                tex_coords: [
                    i as f32 / segments as f32,
                    j as f32 / (rows - 1) as f32,
                ],
                normal: [0.0; 3],
            });
        }
    }

    let mut indices = Vec::with_capacity(segments as usize * (rows - 1) * 6);
    for i in 0..segments as usize {
        for j in 0..rows - 1 {
            let base = (j + i * rows) as u32;
            let a = base;
            let b = base + rows as u32;
            let c = base + rows as u32 + 1;
            let d = base + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    let mut geometry = GeometryData { vertices, indices };
    geometry.compute_vertex_normals();

    let seam = segments as usize * rows;
    for j in 0..rows {
        let first: Vector3<f32> = geometry.vertices[j].normal.into();
        let last: Vector3<f32> = geometry.vertices[seam + j].normal.into();
        let sum = first + last;
        if sum.magnitude2() > 0.0 {
            let averaged: [f32; 3] = sum.normalize().into();
            geometry.vertices[j].normal = averaged;
            geometry.vertices[seam + j].normal = averaged;
        }
    }
    geometry
}
