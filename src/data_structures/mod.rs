//! Renderer data structures: meshes, materials, textures, instances and the
//! scene graph that ties them together.
//!
//! - `model` holds the GPU mesh and material types and the draw call
//! - `texture` wraps GPU textures, samplers and depth buffers
//! - `instance` is the per-node transform uploaded as instance data
//! - `scene_graph` enables hierarchical scene organization

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
