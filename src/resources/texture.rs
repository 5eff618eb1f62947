use anyhow::Context as _;

/// Whether `source` is downloaded rather than read from the asset directory.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str, asset_dir: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no browser window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("page origin unavailable: {:?}", e))?;
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, asset_dir.trim_matches('/')))?;
    Ok(base.join(file_name)?)
}

async fn fetch(url: impl reqwest::IntoUrl) -> anyhow::Result<Vec<u8>> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Raw bytes of `source`: downloaded for `http(s)://` sources, otherwise
/// read from `asset_dir` (natively) or fetched relative to the page origin (web).
pub async fn load_binary(source: &str, asset_dir: &str) -> anyhow::Result<Vec<u8>> {
    if is_remote(source) {
        return fetch(source)
            .await
            .with_context(|| format!("downloading {source}"));
    }

    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(source, asset_dir)?;
        fetch(url).await.with_context(|| format!("fetching {source}"))?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new(asset_dir).join(source);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
    };

    Ok(data)
}

/// Load and decode an image, guessing the format from its content.
pub async fn load_image(source: &str, asset_dir: &str) -> anyhow::Result<image::DynamicImage> {
    let data = load_binary(source, asset_dir).await?;
    image::load_from_memory(&data).with_context(|| format!("decoding {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_sources_are_remote() {
        assert!(is_remote("https://assets.codepen.io/3685267/spells_potions_rust.jpg"));
        assert!(is_remote("http://localhost/wood.jpg"));
        assert!(!is_remote("wood.jpg"));
        assert!(!is_remote("textures/https.jpg"));
    }

    #[tokio::test]
    async fn local_images_are_read_from_the_asset_dir() {
        let dir = std::env::temp_dir().join(format!("potion-table-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]))
            .save(dir.join("tile.png"))
            .unwrap();

        let asset_dir = dir.to_str().unwrap();
        let img = load_image("tile.png", asset_dir).await.unwrap();
        assert_eq!((img.width(), img.height()), (2, 3));

        let missing = load_image("missing.png", asset_dir).await.unwrap_err();
        assert!(format!("{missing:#}").contains("missing.png"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn garbage_fails_to_decode() {
        let dir = std::env::temp_dir().join(format!("potion-table-garbage-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("page.jpg"), b"not an image").unwrap();

        let err = load_image("page.jpg", dir.to_str().unwrap()).await.unwrap_err();
        assert!(format!("{err:#}").contains("decoding page.jpg"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
