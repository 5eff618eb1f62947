//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around WGPU GPU texture resources,
//! and helper methods for creating depth textures, solid fallback textures and
//! colour textures from decoded images.

use image::GenericImageView;

/// A GPU texture with its default view.
///
/// Textures are used for colour maps, the environment map, the depth buffer
/// and the multisampled colour target. Samplers are owned by the materials.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// # Arguments
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `sample_count` must match the pipelines drawing into it
    /// * `label` is used as a debug label for the GPU resource
    pub fn create_depth_texture(
        device: &wgpu::Device,
        size: [u32; 2],
        sample_count: u32,
        label: &str,
    ) -> Self {
        Self::create_render_target(device, size, Self::DEPTH_FORMAT, sample_count, label)
    }

    /// Create the multisampled colour attachment that resolves into the frame.
    pub fn create_msaa_target(
        device: &wgpu::Device,
        size: [u32; 2],
        format: wgpu::TextureFormat,
        sample_count: u32,
        label: &str,
    ) -> Self {
        Self::create_render_target(device, size, format, sample_count, label)
    }

    fn create_render_target(
        device: &wgpu::Device,
        size: [u32; 2],
        format: wgpu::TextureFormat,
        sample_count: u32,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }

    /// Create a one-colour sRGB texture.
    ///
    /// Stands in for colour maps on untextured materials and for images that
    /// failed to load, so the material pipeline never has to change.
    pub fn create_solid(
        rgba: [u8; 4],
        label: &str,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Texture {
        let size = wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Texture { texture, view }
    }

    /// Upload a decoded image as an sRGB colour texture.
    ///
    /// Images larger than the device allows are scaled down first.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        img: &image::DynamicImage,
        label: Option<&str>,
    ) -> Self {
        let max_dimension = device.limits().max_texture_dimension_2d;
        let rgba = match fit_within(img, max_dimension) {
            Some(smaller) => {
                log::warn!(
                    "{} is {}x{}, scaling it to {}x{} for this device",
                    label.unwrap_or("texture"),
                    img.width(),
                    img.height(),
                    smaller.width(),
                    smaller.height()
                );
                smaller.to_rgba8()
            }
            None => img.to_rgba8(),
        };
        let dimensions = rgba.dimensions();

        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * dimensions.0),
                rows_per_image: Some(dimensions.1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self { texture, view }
    }
}

/// The image scaled to fit in `max_dimension` on both sides, keeping its
/// aspect ratio. `None` when it already fits.
pub fn fit_within(img: &image::DynamicImage, max_dimension: u32) -> Option<image::DynamicImage> {
    let (width, height) = img.dimensions();
    if width <= max_dimension && height <= max_dimension {
        return None;
    }
    Some(img.resize(
        max_dimension,
        max_dimension,
        image::imageops::FilterType::Triangle,
    ))
}

pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        ..Default::default()
    })
}

/// Sampler for equirectangular environment maps: wraps around the horizon,
/// clamps at the poles.
pub fn create_equirect_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Environment sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(width: u32, height: u32) -> image::DynamicImage {
        image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height))
    }

    #[test]
    fn images_within_the_limit_are_left_alone() {
        assert!(fit_within(&blank(64, 32), 64).is_none());
        assert!(fit_within(&blank(1, 1), 2048).is_none());
    }

    #[test]
    fn oversized_images_shrink_to_the_limit() {
        let wide = fit_within(&blank(400, 200), 100).unwrap();
        assert_eq!(wide.dimensions(), (100, 50));

        let tall = fit_within(&blank(30, 120), 60).unwrap();
        assert_eq!(tall.dimensions(), (15, 60));
    }

    #[test]
    fn an_equirect_map_fits_webgl() {
        let env = fit_within(&blank(4096, 2048), 2048).unwrap();
        assert_eq!(env.dimensions(), (2048, 1024));
    }
}
