//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`POTION_SECTION__KEY`)

use std::path::Path;

use anyhow::Context as _;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};

const ASSET_HOST: &str = "https://assets.codepen.io/3685267";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub rendering: RenderingConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from the `config` directory next to the working directory.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory. Missing files are skipped.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> anyhow::Result<Self> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();
        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }
        // POTION_WINDOW__WIDTH=640 -> window.width = 640
        figment = figment.merge(Env::prefixed("POTION_").split("__"));

        let config: Self = figment
            .extract()
            .with_context(|| format!("invalid configuration in {}", config_dir.display()))?;
        config
            .camera
            .validate()
            .with_context(|| format!("invalid camera settings in {}", config_dir.display()))?;
        Ok(config)
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Inner width in physical pixels
    pub width: u32,
    /// Inner height in physical pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Potion Table".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Orbit camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    /// Unbounded when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: [1.5733694630638464, 64.24498103358587, 100.84717514499769],
            target: [0.0, 0.0, 0.0],
            fov: 60.0,
            near: 1.0,
            far: 1000.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: None,
        }
    }
}

impl CameraConfig {
    /// Reject distance limits the orbit controller cannot clamp to.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.min_distance.is_finite() && self.min_distance >= 0.0,
            "camera.min_distance must be finite and not negative, got {}",
            self.min_distance
        );
        if let Some(max_distance) = self.max_distance {
            anyhow::ensure!(
                max_distance.is_finite(),
                "camera.max_distance must be finite, got {}",
                max_distance
            );
            anyhow::ensure!(
                self.min_distance <= max_distance,
                "camera.min_distance ({}) is larger than camera.max_distance ({})",
                self.min_distance,
                max_distance
            );
        }
        Ok(())
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Background colour [r, g, b, a]
    pub clear_colour: [f64; 4],
    /// Multiplier applied to the elapsed milliseconds fed to the liquid shaders
    pub time_scale: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            clear_colour: [0.0, 0.0, 0.0, 1.0],
            time_scale: 1.0,
        }
    }
}

impl RenderingConfig {
    pub fn clear_colour(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_colour;
        wgpu::Color { r, g, b, a }
    }
}

/// Texture sources. `http(s)://` sources are downloaded, anything else is
/// resolved against `asset_dir` (or the page origin on the web).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub asset_dir: String,
    /// Equirectangular environment map reflected by glass and metal
    pub environment: String,
    pub rust: String,
    pub wood: String,
    pub pages: [String; 4],
}

impl Default for AssetsConfig {
    fn default() -> Self {
        let remote = |name: &str| format!("{ASSET_HOST}/{name}");
        Self {
            asset_dir: "assets".to_string(),
            environment: remote("spells_potions_satara_night.jpg"),
            rust: remote("spells_potions_rust.jpg"),
            wood: remote("spells_potions_wood.jpg"),
            pages: [1, 2, 3, 4].map(|page| remote(&format!("spells_potions_page{page}.jpg"))),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(source: &str) -> AppConfig {
        Figment::new()
            .merge(Toml::string(source))
            .extract()
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.near, 1.0);
        assert_eq!(config.camera.far, 1000.0);
        assert_eq!(config.rendering.time_scale, 1.0);
        assert!(config.assets.pages[3].ends_with("spells_potions_page4.jpg"));
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("title"));
        assert!(toml.contains("time_scale"));
        assert!(!toml.contains("max_distance"));
    }

    #[test]
    fn shipped_defaults_match_the_built_in_ones() {
        let shipped = from_toml(include_str!("../config/default.toml"));
        assert_eq!(shipped, AppConfig::default());
    }

    #[test]
    fn partial_sections_keep_their_defaults() {
        let config = from_toml(
            r#"
            [window]
            width = 640

            [camera]
            max_distance = 300.0
            "#,
        );
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
        assert_eq!(config.camera.max_distance, Some(300.0));
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[test]
    fn user_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "default.toml",
                r#"
                [window]
                title = "From defaults"
                width = 800
                height = 600
                "#,
            )?;
            jail.create_file(
                "user.toml",
                r#"
                [window]
                width = 1024
                "#,
            )?;

            let config = AppConfig::load_from(jail.directory()).map_err(|e| format!("{e:#}"))?;
            assert_eq!(config.window.title, "From defaults");
            assert_eq!(config.window.width, 1024);
            assert_eq!(config.window.height, 600);
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_both_files() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("default.toml", "[window]\nwidth = 800\n")?;
            jail.create_file("user.toml", "[window]\nwidth = 1024\n")?;
            jail.set_env("POTION_WINDOW__WIDTH", 640);
            jail.set_env("POTION_CAMERA__MAX_DISTANCE", 250.0);

            let config = AppConfig::load_from(jail.directory()).map_err(|e| format!("{e:#}"))?;
            assert_eq!(config.window.width, 640);
            assert_eq!(config.camera.max_distance, Some(250.0));
            Ok(())
        });
    }

    #[test]
    fn missing_files_give_the_built_in_defaults() {
        figment::Jail::expect_with(|jail| {
            let config = AppConfig::load_from(jail.directory()).map_err(|e| format!("{e:#}"))?;
            assert_eq!(config, AppConfig::default());
            Ok(())
        });
    }

    #[test]
    fn inverted_distance_limits_fail_to_load() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "user.toml",
                "[camera]\nmin_distance = 200.0\nmax_distance = 100.0\n",
            )?;
            let err = AppConfig::load_from(jail.directory()).unwrap_err();
            assert!(format!("{err:#}").contains("larger than camera.max_distance"));
            Ok(())
        });
    }

    #[test]
    fn distance_limits_from_the_environment_are_checked() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("POTION_CAMERA__MIN_DISTANCE", -1.0);
            assert!(AppConfig::load_from(jail.directory()).is_err());
            Ok(())
        });
    }

    #[test]
    fn camera_limits_are_validated() {
        let camera = |min_distance: f32, max_distance: Option<f32>| CameraConfig {
            min_distance,
            max_distance,
            ..Default::default()
        };
        assert!(camera(0.0, None).validate().is_ok());
        assert!(camera(10.0, Some(10.0)).validate().is_ok());
        assert!(camera(50.0, Some(300.0)).validate().is_ok());

        assert!(camera(-1.0, None).validate().is_err());
        assert!(camera(200.0, Some(100.0)).validate().is_err());
        assert!(camera(f32::NAN, None).validate().is_err());
        assert!(camera(f32::INFINITY, None).validate().is_err());
        assert!(camera(0.0, Some(f32::NAN)).validate().is_err());
        assert!(camera(0.0, Some(f32::INFINITY)).validate().is_err());
    }

    #[test]
    fn clear_colour_converts_to_wgpu() {
        let rendering = RenderingConfig {
            clear_colour: [0.1, 0.2, 0.3, 1.0],
            ..Default::default()
        };
        let colour = rendering.clear_colour();
        assert_eq!((colour.r, colour.g, colour.b, colour.a), (0.1, 0.2, 0.3, 1.0));
    }
}
