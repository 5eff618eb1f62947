//! potion-table
//!
//! A small alchemist's table rendered with wgpu: a rusty cauldron on legs,
//! two beakers, a stoppered bottle, a wine glass and a dish of bubbling
//! liquid on a wooden table, with a few loose pages. The liquids are
//! animated procedurally in WGSL off a shared clock; the camera orbits,
//! dollies and pans around the table. Runs natively and in the browser.
//!
//! High-level modules
//! - `camera`: orbit camera, projection and the camera uniform
//! - `config`: layered settings from `config/*.toml` and `POTION_*` variables
//! - `context`: window surface, device, queue and the long-lived GPU state
//! - `data_structures`: meshes, materials, instances, textures and the scene graph
//! - `flow`: the winit event loop
//! - `geometry`: lathe, parametric and primitive mesh generators
//! - `pipelines`: render pipelines and the WGSL shaders behind them
//! - `render`: draw ordering for opaque and blended meshes
//! - `resources`: image loading from disk or over HTTP
//! - `scene`: the props of the table and their materials

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod geometry;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

pub use config::AppConfig;
pub use flow::run;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    // there is no config directory in the browser
    run(AppConfig::default()).map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{e:#}")))
}
