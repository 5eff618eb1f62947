//! Loading of the texture images the scene is dressed with.
//!
//! Images are fetched concurrently. A failed image is logged and leaves its
//! slot empty; the material library substitutes a solid colour for it.

pub mod texture;

use crate::config::AssetsConfig;
pub use texture::{load_binary, load_image};

/// Decoded images, one slot per configured source.
#[derive(Clone, Debug, Default)]
pub struct SceneImages {
    pub environment: Option<image::DynamicImage>,
    pub rust: Option<image::DynamicImage>,
    pub wood: Option<image::DynamicImage>,
    pub pages: [Option<image::DynamicImage>; 4],
}

impl SceneImages {
    pub fn loaded(&self) -> usize {
        [&self.environment, &self.rust, &self.wood]
            .into_iter()
            .chain(self.pages.iter())
            .filter(|image| image.is_some())
            .count()
    }
}

async fn load_optional(source: &str, asset_dir: &str) -> Option<image::DynamicImage> {
    match load_image(source, asset_dir).await {
        Ok(image) => {
            log::debug!("loaded {} ({}x{})", source, image.width(), image.height());
            Some(image)
        }
        Err(e) => {
            log::error!("could not load {}: {:#}", source, e);
            None
        }
    }
}

pub async fn load_scene_images(assets: &AssetsConfig) -> SceneImages {
    let sources = [&assets.environment, &assets.rust, &assets.wood]
        .into_iter()
        .chain(assets.pages.iter());
    let loaded = futures::future::join_all(
        sources.map(|source| load_optional(source, &assets.asset_dir)),
    )
    .await;

    let mut loaded = loaded.into_iter();
    let mut next = || loaded.next().flatten();
    let images = SceneImages {
        environment: next(),
        rust: next(),
        wood: next(),
        pages: [next(), next(), next(), next()],
    };
    log::info!("{} of 7 images loaded", images.loaded());
    images
}
