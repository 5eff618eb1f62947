//! CPU description of the scene.
//!
//! A [`Prop`] tree holds every transform, geometry and surface of the scene
//! without touching the GPU, so its layout can be inspected and tested on its
//! own. [`Prop::instantiate`] turns it into scene graph nodes.

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::{
    data_structures::{
        instance::Instance,
        model::Mesh,
        scene_graph::{ContainerNode, MeshNode, SceneNode},
    },
    geometry::GeometryData,
    scene::materials::{MaterialLibrary, Surface},
};

#[derive(Clone, Debug)]
pub struct Shape {
    pub geometry: GeometryData,
    pub surface: Surface,
}

#[derive(Clone, Debug)]
pub struct Prop {
    pub name: String,
    pub transform: Instance,
    pub shape: Option<Shape>,
    pub children: Vec<Prop>,
}

impl Prop {
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Instance::new(),
            shape: None,
            children: Vec::new(),
        }
    }

    pub fn mesh(name: impl Into<String>, geometry: GeometryData, surface: Surface) -> Self {
        Self {
            shape: Some(Shape { geometry, surface }),
            ..Self::group(name)
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.position = Vector3::new(x, y, z);
        self
    }

    pub fn scaled(self, scale: f32) -> Self {
        self.scaled_xyz(scale, scale, scale)
    }

    pub fn scaled_xyz(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.scale = Vector3::new(x, y, z);
        self
    }

    /// Euler angles in radians, applied X then Y then Z.
    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.transform.rotation = Instance::euler_xyz(x, y, z);
        self
    }

    pub fn with_child(mut self, child: Prop) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Prop>) -> Self {
        self.children.extend(children);
        self
    }

    /// Depth-first visit of every prop with its world matrix.
    pub fn walk<'a>(&'a self, parent: Matrix4<f32>, visit: &mut impl FnMut(&'a Prop, Matrix4<f32>)) {
        let world = parent * self.transform.to_matrix();
        visit(self, world);
        for child in &self.children {
            child.walk(world, visit);
        }
    }

    /// World matrix of the first prop called `name`.
    pub fn world_matrix(&self, name: &str) -> Option<Matrix4<f32>> {
        let mut found = None;
        self.walk(Matrix4::identity(), &mut |prop, world| {
            if found.is_none() && prop.name == name {
                found = Some(world);
            }
        });
        found
    }

    pub fn find(&self, name: &str) -> Option<&Prop> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// All props carrying a shape.
    pub fn shapes(&self) -> Vec<(&Prop, &Shape)> {
        let mut shapes = Vec::new();
        self.walk(Matrix4::identity(), &mut |prop, _| {
            if let Some(shape) = &prop.shape {
                shapes.push((prop, shape));
            }
        });
        shapes
    }

    /// Upload every shape and build the matching scene graph.
    pub fn instantiate(
        &self,
        device: &wgpu::Device,
        materials: &mut MaterialLibrary,
    ) -> Box<dyn SceneNode> {
        let mut node: Box<dyn SceneNode> = match &self.shape {
            Some(shape) if !shape.geometry.is_empty() => {
                let mesh = Mesh::from_geometry(device, &self.name, &shape.geometry);
                let material = materials.get(device, shape.surface);
                Box::new(MeshNode::new(
                    device,
                    &self.name,
                    mesh,
                    material,
                    self.transform.clone(),
                ))
            }
            Some(_) => {
                log::warn!("{} has no triangles and is left out", self.name);
                Box::new(ContainerNode::new(&self.name, self.transform.clone()))
            }
            None => Box::new(ContainerNode::new(&self.name, self.transform.clone())),
        };
        for child in &self.children {
            node.add_child(child.instantiate(device, materials));
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector4;

    use super::*;
    use crate::geometry::primitives::cuboid;

    #[test]
    fn walk_composes_transforms_down_the_tree() {
        let tree = Prop::group("root")
            .at(1.0, 0.0, 0.0)
            .scaled(2.0)
            .with_child(Prop::mesh("box", cuboid(1.0, 1.0, 1.0), Surface::Wood).at(0.0, 1.0, 0.0));
        let world = tree.world_matrix("box").unwrap();
        assert_eq!(world * Vector4::new(0.0, 0.0, 0.0, 1.0), Vector4::new(1.0, 2.0, 0.0, 1.0));
        assert!(tree.world_matrix("missing").is_none());
    }

    #[test]
    fn shapes_skip_groups() {
        let tree = Prop::group("root")
            .with_child(Prop::group("inner").with_child(Prop::mesh("a", cuboid(1.0, 1.0, 1.0), Surface::Wood)))
            .with_child(Prop::mesh("b", cuboid(1.0, 1.0, 1.0), Surface::Rust));
        let names: Vec<_> = tree.shapes().into_iter().map(|(prop, _)| prop.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(tree.find("inner").is_some_and(|prop| prop.shape.is_none()));
    }
}
