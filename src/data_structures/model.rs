//! GPU meshes, materials and the draw helpers used by the render pass.
//!
//! A [`Mesh`] is an indexed vertex buffer uploaded from a
//! [`GeometryData`](crate::geometry::GeometryData). A [`Material`] pairs a
//! pipeline with the bind group that feeds it.

use wgpu::util::DeviceExt;

use crate::{geometry::GeometryData, pipelines::PipelineKind};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

/// Vertex layout shared by every pipeline.
///
/// Texture coordinates have their origin in the bottom-left corner (v grows
/// upwards). Shaders that sample images flip v themselves so the procedural
/// shaders can work with the unflipped value.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl Mesh {
    pub fn from_geometry(device: &wgpu::Device, name: &str, geometry: &GeometryData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", name)),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            name: name.to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: geometry.indices.len() as u32,
        }
    }
}

/// A pipeline selection plus the bind group bound at slot 0.
///
/// Basic materials bind their own uniform and textures; animated materials
/// all share the time bind group.
#[derive(Debug)]
pub struct Material {
    pub name: String,
    pub pipeline: PipelineKind,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn is_transparent(&self) -> bool {
        self.pipeline.is_transparent()
    }
}

pub trait DrawModel {
    fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        material: &Material,
        instance: &wgpu::Buffer,
        camera_bind_group: &wgpu::BindGroup,
    );
}

impl DrawModel for wgpu::RenderPass<'_> {
    fn draw_mesh(
        &mut self,
        mesh: &Mesh,
        material: &Material,
        instance: &wgpu::Buffer,
        camera_bind_group: &wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_vertex_buffer(1, instance.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, &material.bind_group, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, 0..1);
    }
}
