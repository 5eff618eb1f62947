//! Render pipelines.
//!
//! - `basic` holds the unlit, textured, environment mapped material
//! - `transparent` is the alpha blended variant of `basic`
//! - `animated` builds one pipeline per liquid shader
//! - `time` is the clock uniform the liquids animate with

pub mod animated;
pub mod basic;
pub mod time;
pub mod transparent;

use animated::{ShaderKind, mk_animated_pipeline};
use basic::{OPAQUE, material_layout, mk_basic_pipeline};
use transparent::mk_transparent_pipeline;

/// MSAA samples per pixel for every pipeline and attachment.
pub const SAMPLE_COUNT: u32 = 4;

/// Which pipeline a material is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Opaque { double_sided: bool },
    Transparent,
    Animated(ShaderKind),
}

impl PipelineKind {
    /// Blended materials are drawn after the opaque ones, back to front.
    pub fn is_transparent(&self) -> bool {
        matches!(self, PipelineKind::Transparent | PipelineKind::Animated(_))
    }
}

#[derive(Debug)]
pub struct Pipelines {
    pub opaque: wgpu::RenderPipeline,
    pub opaque_front: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
    /// Indexed by `ShaderKind as usize`.
    pub animated: [wgpu::RenderPipeline; 4],
    pub material_layout: wgpu::BindGroupLayout,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        time_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let material_layout = material_layout(device);
        let opaque = mk_basic_pipeline(
            device,
            format,
            &material_layout,
            camera_bind_group_layout,
            OPAQUE,
            None,
        );
        let opaque_front = mk_basic_pipeline(
            device,
            format,
            &material_layout,
            camera_bind_group_layout,
            OPAQUE,
            Some(wgpu::Face::Back),
        );
        let transparent =
            mk_transparent_pipeline(device, format, &material_layout, camera_bind_group_layout);
        let animated = ShaderKind::ALL.map(|kind| {
            mk_animated_pipeline(
                device,
                format,
                kind,
                time_bind_group_layout,
                camera_bind_group_layout,
            )
        });
        Self {
            opaque,
            opaque_front,
            transparent,
            animated,
            material_layout,
        }
    }

    pub fn get(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Opaque { double_sided: true } => &self.opaque,
            PipelineKind::Opaque { double_sided: false } => &self.opaque_front,
            PipelineKind::Transparent => &self.transparent,
            PipelineKind::Animated(shader) => &self.animated[shader as usize],
        }
    }
}

#[cfg(test)]
pub(crate) fn validate_wgsl(source: &str) {
    let module = naga::front::wgsl::parse_str(source)
        .unwrap_or_else(|e| panic!("{}", e.emit_to_string(source)));
    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::default(),
    )
    .validate(&module)
    .unwrap_or_else(|e| panic!("{}", e.emit_to_string(source)));
}
