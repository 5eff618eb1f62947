//! Time driven liquid shaders.
//!
//! Every [`ShaderKind`] compiles to its own pipeline. The WGSL module is the
//! shared prelude followed by whatever snippets the fragment body needs.

use crate::{
    data_structures::{
        instance::InstanceRaw,
        model::{ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::mk_render_pipeline,
};

const COMMON: &str = include_str!("common.wgsl");
const NOISE: &str = include_str!("noise.wgsl");
const POTION: &str = include_str!("potion.wgsl");

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderKind {
    Beaker,
    Bottle,
    Dish,
    Pot,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 4] = [
        ShaderKind::Beaker,
        ShaderKind::Bottle,
        ShaderKind::Dish,
        ShaderKind::Pot,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ShaderKind::Beaker => "Beaker Shader",
            ShaderKind::Bottle => "Bottle Shader",
            ShaderKind::Dish => "Dish Shader",
            ShaderKind::Pot => "Pot Shader",
        }
    }

    fn fragment(&self) -> &'static str {
        match self {
            ShaderKind::Beaker => include_str!("beaker.wgsl"),
            ShaderKind::Bottle => include_str!("bottle.wgsl"),
            ShaderKind::Dish => include_str!("dish.wgsl"),
            ShaderKind::Pot => include_str!("pot.wgsl"),
        }
    }

    /// Whether the fragment body builds on the noise swirl.
    fn uses_noise(&self) -> bool {
        matches!(self, ShaderKind::Beaker | ShaderKind::Pot)
    }

    /// The complete WGSL module for this kind.
    pub fn source(&self) -> String {
        let mut source = String::from(COMMON);
        if self.uses_noise() {
            source.push('\n');
            source.push_str(NOISE);
            source.push('\n');
            source.push_str(POTION);
        }
        source.push('\n');
        source.push_str(self.fragment());
        source
    }
}

/**
 * Group 0 is the shared clock, group 1 the camera. All liquids blend and
 * are visible from both sides.
 */
pub fn mk_animated_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    kind: ShaderKind,
    time_bind_group_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Animated Pipeline Layout"),
        bind_group_layouts: &[Some(time_bind_group_layout), Some(camera_bind_group_layout)],
        immediate_size: 0,
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some(kind.label()),
        source: wgpu::ShaderSource::Wgsl(kind.source().into()),
    };
    mk_render_pipeline(
        device,
        &layout,
        format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        None,
        Some(Texture::DEPTH_FORMAT),
        &[ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}
