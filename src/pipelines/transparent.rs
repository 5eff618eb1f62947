use crate::pipelines::basic::mk_basic_pipeline;

/**
 * Basic material pipeline with alpha blending and both faces rasterised.
 *
 * Used for the glassware: the same shader as the opaque variants, the
 * material's opacity ends up in the output alpha.
 */
pub fn mk_transparent_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    material_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    mk_basic_pipeline(
        device,
        format,
        material_layout,
        camera_bind_group_layout,
        wgpu::BlendState::ALPHA_BLENDING,
        None,
    )
}
