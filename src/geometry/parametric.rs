use cgmath::{InnerSpace, Vector3};

use crate::{data_structures::model::ModelVertex, geometry::GeometryData};

const EPS: f32 = 0.00001;

/**
 * Sample `func(u, v)` on a `(slices + 1) x (stacks + 1)` grid.
 *
 * Normals are the cross product of finite difference tangents along u and v.
 * Near the lower edge the difference is taken forwards so `func` is never
 * evaluated below zero.
 */
pub fn parametric<F>(func: F, slices: u32, stacks: u32) -> GeometryData
where
    F: Fn(f32, f32) -> Vector3<f32>,
{
    if slices == 0 || stacks == 0 {
        return GeometryData::default();
    }
    let slice_count = slices + 1;
    let mut vertices = Vec::with_capacity(((stacks + 1) * slice_count) as usize);

    for i in 0..=stacks {
        let v = i as f32 / stacks as f32;
        for j in 0..=slices {
            let u = j as f32 / slices as f32;
            let p0 = func(u, v);
            let pu = if u - EPS >= 0.0 {
                p0 - func(u - EPS, v)
            } else {
                func(u + EPS, v) - p0
            };
            let pv = if v - EPS >= 0.0 {
                p0 - func(u, v - EPS)
            } else {
                func(u, v + EPS) - p0
            };
            let normal = pu.cross(pv);
            let normal = if normal.magnitude2() > 0.0 {
                normal.normalize()
            } else {
                normal
            };
            vertices.push(ModelVertex {
                position: p0.into(),
                tex_coords: [u, v],
                normal: normal.into(),
            });
        }
    }

    let mut indices = Vec::with_capacity((slices * stacks * 6) as usize);
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * slice_count + j;
            let b = i * slice_count + j + 1;
            let c = (i + 1) * slice_count + j + 1;
            let d = (i + 1) * slice_count + j;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    GeometryData { vertices, indices }
}
