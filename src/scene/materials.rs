//! The material looks of the scene and their GPU counterparts.

use std::{collections::HashMap, sync::Arc};

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        model::Material,
        texture::{Texture, create_default_sampler, create_equirect_sampler},
    },
    pipelines::{PipelineKind, animated::ShaderKind, basic::MaterialUniform},
    resources::SceneImages,
};

/// Tint of every glass surface, as sRGB hex.
pub const GLASS_COLOUR: u32 = 0xefb08c;

const RUST_FALLBACK: [u8; 4] = [112, 66, 20, 255];
const WOOD_FALLBACK: [u8; 4] = [133, 94, 66, 255];
const PAGE_FALLBACK: [u8; 4] = [222, 207, 170, 255];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    Rust,
    /// Rust stretched ten times around a ring.
    RustBand,
    Wood,
    /// One of the four paper sheets.
    Page(u8),
    Glass,
    GlassRim,
    Liquid(ShaderKind),
}

impl Surface {
    pub fn pipeline(&self) -> PipelineKind {
        match self {
            Surface::Rust | Surface::RustBand | Surface::Wood => {
                PipelineKind::Opaque { double_sided: true }
            }
            Surface::Page(_) => PipelineKind::Opaque {
                double_sided: false,
            },
            Surface::Glass | Surface::GlassRim => PipelineKind::Transparent,
            Surface::Liquid(kind) => PipelineKind::Animated(*kind),
        }
    }

    pub fn uniform(&self) -> MaterialUniform {
        let glass = |opacity| {
            let [r, g, b] = hex_to_linear(GLASS_COLOUR);
            MaterialUniform {
                color: [r, g, b, opacity],
                ..Default::default()
            }
        };
        match self {
            Surface::RustBand => MaterialUniform {
                uv_repeat: [10.0, 1.0],
                ..Default::default()
            },
            Surface::Page(_) => MaterialUniform {
                use_env: 0.0,
                ..Default::default()
            },
            Surface::Glass => glass(0.5),
            Surface::GlassRim => glass(0.8),
            Surface::Rust | Surface::Wood | Surface::Liquid(_) => MaterialUniform::default(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Surface::Liquid(kind) => kind.label().to_string(),
            Surface::Page(page) => format!("Page {page}"),
            other => format!("{other:?}"),
        }
    }
}

/// sRGB hex colour to linear RGB.
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Turns surfaces into GPU materials, creating each one at most once.
#[derive(Debug)]
pub struct MaterialLibrary {
    layout: wgpu::BindGroupLayout,
    time_bind_group: wgpu::BindGroup,
    environment: Texture,
    rust: Texture,
    wood: Texture,
    pages: [Texture; 4],
    white: Texture,
    sampler: wgpu::Sampler,
    env_sampler: wgpu::Sampler,
    cache: HashMap<Surface, Arc<Material>>,
}

impl MaterialLibrary {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_layout: &wgpu::BindGroupLayout,
        time_bind_group: &wgpu::BindGroup,
        images: &SceneImages,
    ) -> Self {
        let upload = |image: &Option<image::DynamicImage>, label: &str, fallback: [u8; 4]| match image {
            Some(image) => Texture::from_image(device, queue, image, Some(label)),
            None => {
                log::warn!("{label} is missing, using a solid colour instead");
                Texture::create_solid(fallback, label, device, queue)
            }
        };
        let [page_1, page_2, page_3, page_4] = &images.pages;
        Self {
            layout: material_layout.clone(),
            time_bind_group: time_bind_group.clone(),
            // white keeps the multiply neutral
            environment: upload(&images.environment, "environment", [255; 4]),
            rust: upload(&images.rust, "rust", RUST_FALLBACK),
            wood: upload(&images.wood, "wood", WOOD_FALLBACK),
            pages: [
                upload(page_1, "page 1", PAGE_FALLBACK),
                upload(page_2, "page 2", PAGE_FALLBACK),
                upload(page_3, "page 3", PAGE_FALLBACK),
                upload(page_4, "page 4", PAGE_FALLBACK),
            ],
            white: Texture::create_solid([255; 4], "white", device, queue),
            sampler: create_default_sampler(device),
            env_sampler: create_equirect_sampler(device),
            cache: HashMap::new(),
        }
    }

    fn map_for(&self, surface: Surface) -> &Texture {
        match surface {
            Surface::Rust | Surface::RustBand => &self.rust,
            Surface::Wood => &self.wood,
            Surface::Page(page) => &self.pages[page as usize % self.pages.len()],
            Surface::Glass | Surface::GlassRim | Surface::Liquid(_) => &self.white,
        }
    }

    pub fn get(&mut self, device: &wgpu::Device, surface: Surface) -> Arc<Material> {
        if let Some(material) = self.cache.get(&surface) {
            return material.clone();
        }
        let material = Arc::new(self.create(device, surface));
        self.cache.insert(surface, material.clone());
        material
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn create(&self, device: &wgpu::Device, surface: Surface) -> Material {
        let name = surface.label();
        let pipeline = surface.pipeline();
        if let PipelineKind::Animated(_) = pipeline {
            return Material {
                name,
                pipeline,
                bind_group: self.time_bind_group.clone(),
            };
        }

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Material Buffer", name)),
            contents: bytemuck::cast_slice(&[surface.uniform()]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let map = self.map_for(surface);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&self.environment.view),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.env_sampler),
                },
            ],
            label: Some(&name),
        });
        Material {
            name,
            pipeline,
            bind_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glass_is_tinted_and_translucent() {
        let body = Surface::Glass.uniform();
        let rim = Surface::GlassRim.uniform();
        assert_eq!(body.color[3], 0.5);
        assert_eq!(rim.color[3], 0.8);
        assert_eq!(body.color[..3], rim.color[..3]);
        // #efb08c is a warm tint: red > green > blue
        assert!(body.color[0] > body.color[1] && body.color[1] > body.color[2]);
        assert!(Surface::Glass.pipeline().is_transparent());
    }

    #[test]
    fn hex_colours_are_linearised() {
        assert!(hex_to_linear(0xffffff).iter().all(|c| (c - 1.0).abs() < 1e-5));
        assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let [r, g, b] = hex_to_linear(GLASS_COLOUR);
        assert!((r - 0.863).abs() < 1e-3);
        assert!((g - 0.434).abs() < 1e-3);
        assert!((b - 0.262).abs() < 1e-3);
    }

    #[test]
    fn only_the_band_repeats_its_map() {
        assert_eq!(Surface::RustBand.uniform().uv_repeat, [10.0, 1.0]);
        assert_eq!(Surface::Rust.uniform().uv_repeat, [1.0, 1.0]);
        assert_eq!(Surface::Wood.uniform().uv_repeat, [1.0, 1.0]);
    }

    #[test]
    fn papers_ignore_the_environment_and_cull_back_faces() {
        let page = Surface::Page(2);
        assert_eq!(page.uniform().use_env, 0.0);
        assert_eq!(page.pipeline(), PipelineKind::Opaque { double_sided: false });
        assert_eq!(Surface::Wood.uniform().use_env, 1.0);
        assert_eq!(Surface::Wood.pipeline(), PipelineKind::Opaque { double_sided: true });
    }

    #[test]
    fn liquids_use_their_shader() {
        for kind in ShaderKind::ALL {
            assert_eq!(Surface::Liquid(kind).pipeline(), PipelineKind::Animated(kind));
            assert_eq!(Surface::Liquid(kind).label(), kind.label());
        }
    }
}
