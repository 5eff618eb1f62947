//! The potion table scene.
//!
//! - `profiles` contains the lathe profiles of the glassware
//! - `props` builds the blueprint of every prop
//! - `blueprint` is the CPU prop tree and its instantiation
//! - `materials` maps surfaces to GPU materials

pub mod blueprint;
pub mod materials;
pub mod profiles;
pub mod props;

use crate::{
    context::Context,
    data_structures::scene_graph::{SceneNode, count_nodes},
    render::Render,
    resources::SceneImages,
};
use materials::MaterialLibrary;

/// The instantiated scene: one scene graph rooted at the table.
pub struct PotionTable {
    root: Box<dyn SceneNode>,
}

impl PotionTable {
    pub fn new(ctx: &Context, images: &SceneImages) -> Self {
        let mut materials = MaterialLibrary::new(
            &ctx.device,
            &ctx.queue,
            &ctx.pipelines.material_layout,
            &ctx.time.bind_group,
            images,
        );
        let mut root = props::potion_table().instantiate(&ctx.device, &mut materials);
        root.update_world_transform_all();
        root.write_to_buffers(&ctx.queue);

        log::info!(
            "scene ready: {} nodes, {} meshes, {} materials",
            count_nodes(root.as_ref(), &|_| true),
            root.get_render().len(),
            materials.len()
        );
        Self { root }
    }

    pub fn on_render(&self) -> Render<'_> {
        Render::from_drawables(self.root.get_render())
    }
}
