//! Render composition and draw ordering.
//!
//! Scene nodes hand out [`Drawable`]s. A [`Render`] sorts them into the
//! opaque and transparent batches; [`draw`] issues the opaque batch in scene
//! order and the transparent batch back to front, switching pipelines only
//! when the material asks for a different one.

use cgmath::{MetricSpace, Point3};

use crate::{
    camera::CameraResources,
    data_structures::model::{DrawModel, Material, Mesh},
    pipelines::{PipelineKind, Pipelines},
};

/// One mesh with everything needed to draw it once.
#[derive(Clone, Copy, Debug)]
pub struct Drawable<'a> {
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub instance: &'a wgpu::Buffer,
    /// World-space origin of the node, used to order blended meshes.
    pub world_position: Point3<f32>,
}

/// Specifies how scene objects should be rendered.
///
/// - `None` renders nothing
/// - `Opaque` renders a single mesh that replaces what is behind it
/// - `Transparent` renders a single blended mesh
/// - `Composed` recursively renders a composition of multiple renders
pub enum Render<'a> {
    None,
    Opaque(Drawable<'a>),
    Transparent(Drawable<'a>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    /// Classify drawables by their material.
    pub fn from_drawables(drawables: Vec<Drawable<'a>>) -> Self {
        Render::Composed(
            drawables
                .into_iter()
                .map(|drawable| {
                    if drawable.material.is_transparent() {
                        Render::Transparent(drawable)
                    } else {
                        Render::Opaque(drawable)
                    }
                })
                .collect(),
        )
    }

    pub(crate) fn collect(
        self,
        opaque: &mut Vec<Drawable<'a>>,
        transparent: &mut Vec<Drawable<'a>>,
    ) {
        match self {
            Render::None => (),
            Render::Opaque(drawable) => opaque.push(drawable),
            Render::Transparent(drawable) => transparent.push(drawable),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.collect(opaque, transparent)),
        }
    }
}

/// Stable sort by decreasing distance from `eye`: the farthest item comes
/// first, items at equal distance keep their scene order.
pub fn back_to_front<T>(eye: Point3<f32>, items: &mut [T], position: impl Fn(&T) -> Point3<f32>) {
    items.sort_by(|a, b| {
        let da = eye.distance2(position(a));
        let db = eye.distance2(position(b));
        db.total_cmp(&da)
    });
}

/// Draw `render` into an already open pass.
pub fn draw(
    render_pass: &mut wgpu::RenderPass<'_>,
    pipelines: &Pipelines,
    camera: &CameraResources,
    render: Render<'_>,
) {
    let mut opaque = Vec::new();
    let mut transparent = Vec::new();
    render.collect(&mut opaque, &mut transparent);
    back_to_front(camera.camera.eye, &mut transparent, |d| d.world_position);

    let mut bound: Option<PipelineKind> = None;
    for drawable in opaque.into_iter().chain(transparent) {
        if drawable.mesh.num_elements == 0 {
            log::warn!("skipping empty mesh {}", drawable.mesh.name);
            continue;
        }
        let kind = drawable.material.pipeline;
        if bound != Some(kind) {
            render_pass.set_pipeline(pipelines.get(kind));
            bound = Some(kind);
        }
        render_pass.draw_mesh(
            drawable.mesh,
            drawable.material,
            drawable.instance,
            &camera.bind_group,
        );
    }
}

/// Clear `msaa` and `depth`, draw `render` into them and resolve the
/// samples into `target`.
#[allow(clippy::too_many_arguments)]
pub fn record(
    encoder: &mut wgpu::CommandEncoder,
    msaa: &wgpu::TextureView,
    target: &wgpu::TextureView,
    depth: &wgpu::TextureView,
    clear_colour: wgpu::Color,
    pipelines: &Pipelines,
    camera: &CameraResources,
    render: Render<'_>,
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Render Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: msaa,
            resolve_target: Some(target),
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear_colour),
                // only the resolved frame is kept
                store: wgpu::StoreOp::Discard,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        occlusion_query_set: None,
        timestamp_writes: None,
        multiview_mask: None,
    });
    draw(&mut render_pass, pipelines, camera, render);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(eye: (f32, f32, f32), items: &[(&'static str, (f32, f32, f32))]) -> Vec<&'static str> {
        let mut items = items.to_vec();
        back_to_front(eye.into(), &mut items, |(_, p)| Point3::from(*p));
        items.into_iter().map(|(name, _)| name).collect()
    }

    #[test]
    fn farthest_items_come_first() {
        let order = sorted(
            (0.0, 0.0, 100.0),
            &[("near", (0.0, 0.0, 50.0)), ("far", (0.0, 0.0, -50.0)), ("middle", (0.0, 0.0, 0.0))],
        );
        assert_eq!(order, ["far", "middle", "near"]);
    }

    #[test]
    fn ties_keep_scene_order() {
        let order = sorted(
            (0.0, 0.0, 0.0),
            &[("a", (1.0, 0.0, 0.0)), ("b", (0.0, 1.0, 0.0)), ("c", (0.0, 0.0, 1.0))],
        );
        assert_eq!(order, ["a", "b", "c"]);
    }

    #[test]
    fn moving_the_eye_flips_the_order() {
        let items = [("left", (-10.0, 0.0, 0.0)), ("right", (10.0, 0.0, 0.0))];
        assert_eq!(sorted((50.0, 0.0, 0.0), &items), ["left", "right"]);
        assert_eq!(sorted((-50.0, 0.0, 0.0), &items), ["right", "left"]);
    }
}
