//! Scene graph and hierarchical scene organization.
//!
//! Nodes carry a local [`Instance`] transform and cache their world matrix.
//! [`ContainerNode`] only groups children, [`MeshNode`] additionally owns a
//! mesh, a shared material and a one-element instance buffer holding its world
//! transform.

use std::sync::Arc;

use cgmath::{Matrix4, Point3, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        instance::{Instance, InstanceRaw},
        model::{Material, Mesh},
    },
    render::Drawable,
};

pub trait SceneNode {
    fn name(&self) -> &str;

    fn get_local_transform(&self) -> &Instance;

    fn set_local_transform(&mut self, instance: Instance);

    fn get_world_transform(&self) -> Matrix4<f32>;

    /// Recompute this node's world matrix from `parent` and recurse.
    fn update_world_transforms(&mut self, parent: &Matrix4<f32>);

    fn update_world_transform_all(&mut self) {
        self.update_world_transforms(&Matrix4::identity());
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>>;

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>>;

    fn add_child(&mut self, child: Box<dyn SceneNode>);

    /// Upload world transforms of this node and all of its descendants.
    fn write_to_buffers(&mut self, queue: &wgpu::Queue);

    /// Every mesh below (and including) this node, in depth-first order.
    fn get_render(&self) -> Vec<Drawable<'_>>;
}

/// Depth-first count of nodes for which `filter` holds, `node` included.
pub fn count_nodes(node: &dyn SceneNode, filter: &dyn Fn(&dyn SceneNode) -> bool) -> usize {
    let own = usize::from(filter(node));
    own + node
        .get_children()
        .iter()
        .map(|child| count_nodes(child.as_ref(), filter))
        .sum::<usize>()
}

pub struct ContainerNode {
    name: String,
    local: Instance,
    world: Matrix4<f32>,
    pub children: Vec<Box<dyn SceneNode>>,
}

impl ContainerNode {
    pub fn new(name: &str, local: Instance) -> Self {
        Self {
            name: name.to_string(),
            world: local.to_matrix(),
            local,
            children: Vec::new(),
        }
    }
}

impl SceneNode for ContainerNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_local_transform(&self) -> &Instance {
        &self.local
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn get_world_transform(&self) -> Matrix4<f32> {
        self.world
    }

    fn update_world_transforms(&mut self, parent: &Matrix4<f32>) {
        self.world = parent * self.local.to_matrix();
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_render(&self) -> Vec<Drawable<'_>> {
        self.children
            .iter()
            .flat_map(|child| child.get_render())
            .collect()
    }
}

pub struct MeshNode {
    name: String,
    local: Instance,
    world: Matrix4<f32>,
    children: Vec<Box<dyn SceneNode>>,
    mesh: Mesh,
    material: Arc<Material>,
    instance_buffer: wgpu::Buffer,
}

impl MeshNode {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        mesh: Mesh,
        material: Arc<Material>,
        local: Instance,
    ) -> Self {
        let world = local.to_matrix();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Instance Buffer", name)),
            contents: bytemuck::cast_slice(&[InstanceRaw::from_matrix(world)]),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });
        Self {
            name: name.to_string(),
            local,
            world,
            children: Vec::new(),
            mesh,
            material,
            instance_buffer,
        }
    }
}

impl SceneNode for MeshNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn get_local_transform(&self) -> &Instance {
        &self.local
    }

    fn set_local_transform(&mut self, instance: Instance) {
        self.local = instance;
    }

    fn get_world_transform(&self) -> Matrix4<f32> {
        self.world
    }

    fn update_world_transforms(&mut self, parent: &Matrix4<f32>) {
        self.world = parent * self.local.to_matrix();
        for child in self.children.iter_mut() {
            child.update_world_transforms(&self.world);
        }
    }

    fn get_children(&self) -> &Vec<Box<dyn SceneNode>> {
        &self.children
    }

    fn get_children_mut(&mut self) -> &mut Vec<Box<dyn SceneNode>> {
        &mut self.children
    }

    fn add_child(&mut self, child: Box<dyn SceneNode>) {
        self.children.push(child);
    }

    fn write_to_buffers(&mut self, queue: &wgpu::Queue) {
        queue.write_buffer(
            &self.instance_buffer,
            0,
            bytemuck::cast_slice(&[InstanceRaw::from_matrix(self.world)]),
        );
        self.children
            .iter_mut()
            .for_each(|child| child.write_to_buffers(queue));
    }

    fn get_render(&self) -> Vec<Drawable<'_>> {
        let origin = self.world.w;
        std::iter::once(Drawable {
            mesh: &self.mesh,
            material: &self.material,
            instance: &self.instance_buffer,
            world_position: Point3::new(origin.x, origin.y, origin.z),
        })
        .chain(self.children.iter().flat_map(|child| child.get_render()))
        .collect()
    }
}
