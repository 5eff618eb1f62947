//! Spheres, tori, boxes and planes with texture coordinates laid out so a
//! single image wraps each shape once.

use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};

use crate::{data_structures::model::ModelVertex, geometry::GeometryData};

/// Sphere patch around the origin.
///
/// `phi` sweeps around the Y axis, `theta` runs from the north pole
/// (`0`) to the south pole (`PI`). Triangles that would collapse into a pole
/// are only dropped where the patch actually touches that pole.
pub fn sphere(
    radius: f32,
    width_segments: u32,
    height_segments: u32,
    phi_start: f32,
    phi_length: f32,
    theta_start: f32,
    theta_length: f32,
) -> GeometryData {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let theta_end = (theta_start + theta_length).min(PI);

    let mut vertices = Vec::new();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);
    let mut index = 0;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let u_offset = if iy == 0 && theta_start == 0.0 {
            0.5 / width_segments as f32
        } else if iy == height_segments && theta_end == PI {
            -0.5 / width_segments as f32
        } else {
            0.0
        };
        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = phi_start + u * phi_length;
            let theta = theta_start + v * theta_length;
            let position = Vector3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            let normal = if position.magnitude2() > 0.0 {
                position.normalize()
            } else {
                position
            };
            vertices.push(ModelVertex {
                position: position.into(),
                tex_coords: [u + u_offset, 1.0 - v],
                normal: normal.into(),
            });
            row.push(index);
            index += 1;
        }
        grid.push(row);
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 || theta_start > 0.0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 || theta_end < PI {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    GeometryData { vertices, indices }
}

/// A full sphere.
pub fn full_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    sphere(radius, width_segments, height_segments, 0.0, TAU, 0.0, PI)
}

/// Ring of radius `radius` around the Z axis, i.e. lying in the XY plane.
pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> GeometryData {
    let mut vertices = Vec::with_capacity(((radial_segments + 1) * (tubular_segments + 1)) as usize);
    for j in 0..=radial_segments {
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let v = j as f32 / radial_segments as f32 * TAU;
            let position = Vector3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vector3::new(radius * u.cos(), radius * u.sin(), 0.0);
            vertices.push(ModelVertex {
                position: position.into(),
                tex_coords: [
                    i as f32 / tubular_segments as f32,
                    j as f32 / radial_segments as f32,
                ],
                normal: (position - center).normalize().into(),
            });
        }
    }

    let mut indices = Vec::with_capacity((radial_segments * tubular_segments * 6) as usize);
    let stride = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    GeometryData { vertices, indices }
}

/// Axis aligned box centred on the origin with one quad per face.
pub fn cuboid(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut geometry = GeometryData::default();
    // (u axis, v axis, w axis, u dir, v dir, face width, face height, face depth)
    let faces = [
        (2, 1, 0, -1.0, -1.0, depth, height, width),
        (2, 1, 0, 1.0, -1.0, depth, height, -width),
        (0, 2, 1, 1.0, 1.0, width, depth, height),
        (0, 2, 1, 1.0, -1.0, width, depth, -height),
        (0, 1, 2, 1.0, -1.0, width, height, depth),
        (0, 1, 2, -1.0, -1.0, width, height, -depth),
    ];
    for (u, v, w, u_dir, v_dir, face_width, face_height, face_depth) in faces {
        box_face(
            &mut geometry,
            [u, v, w],
            [u_dir, v_dir],
            [face_width, face_height, face_depth],
        );
    }
    geometry
}

fn box_face(geometry: &mut GeometryData, axes: [usize; 3], dirs: [f32; 2], size: [f32; 3]) {
    let [u, v, w] = axes;
    let [width, height, depth] = size;
    let start = geometry.vertices.len() as u32;

    for iy in 0..2 {
        let y = iy as f32 * height - height / 2.0;
        for ix in 0..2 {
            let x = ix as f32 * width - width / 2.0;
            let mut position = [0.0; 3];
            position[u] = x * dirs[0];
            position[v] = y * dirs[1];
            position[w] = depth / 2.0;
            let mut normal = [0.0; 3];
            normal[w] = if depth > 0.0 { 1.0 } else { -1.0 };
            geometry.vertices.push(ModelVertex {
                position,
                tex_coords: [ix as f32, 1.0 - iy as f32],
                normal,
            });
        }
    }

    let (a, b, c, d) = (start, start + 2, start + 3, start + 1);
    geometry.indices.extend_from_slice(&[a, b, d, b, c, d]);
}

/// Plane in the XY plane facing +Z.
pub fn plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let grid_x = width_segments.max(1);
    let grid_y = height_segments.max(1);
    let segment_width = width / grid_x as f32;
    let segment_height = height / grid_y as f32;

    let mut vertices = Vec::with_capacity(((grid_x + 1) * (grid_y + 1)) as usize);
    for iy in 0..=grid_y {
        let y = iy as f32 * segment_height - height / 2.0;
        for ix in 0..=grid_x {
            let x = ix as f32 * segment_width - width / 2.0;
            vertices.push(ModelVertex {
                position: [x, -y, 0.0],
                tex_coords: [ix as f32 / grid_x as f32, 1.0 - iy as f32 / grid_y as f32],
                normal: [0.0, 0.0, 1.0],
            });
        }
    }

    let stride = grid_x + 1;
    let mut indices = Vec::with_capacity((grid_x * grid_y * 6) as usize);
    for iy in 0..grid_y {
        for ix in 0..grid_x {
            let a = ix + stride * iy;
            let b = ix + stride * (iy + 1);
            let c = ix + 1 + stride * (iy + 1);
            let d = ix + 1 + stride * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    GeometryData { vertices, indices }
}
