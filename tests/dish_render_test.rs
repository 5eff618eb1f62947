#![cfg(feature = "integration-tests")]

mod common;

use common::{Headless, SIZE};
use potion_table::{
    geometry::primitives::{cuboid, plane},
    pipelines::animated::ShaderKind,
    render::Render,
    resources::SceneImages,
    scene::{blueprint::Prop, materials::{MaterialLibrary, Surface}},
};

const TRANSPARENT: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

fn library(gpu: &Headless) -> MaterialLibrary {
    MaterialLibrary::new(
        &gpu.device,
        &gpu.queue,
        &gpu.pipelines.material_layout,
        &gpu.time.bind_group,
        &SceneImages::default(),
    )
}

#[tokio::test]
async fn should_render_clear_colour() {
    let Some(gpu) = Headless::new([0.0, 0.0, 50.0], [0.0, 0.0, 0.0]).await else {
        eprintln!("no GPU adapter, skipping");
        return;
    };
    let image = gpu.render_to_image(wgpu::Color::WHITE, Render::None).await;
    assert!(image.pixels().all(|p| *p == image::Rgba([255, 255, 255, 255])));
}

#[tokio::test]
async fn dish_liquid_is_masked_to_a_disc() {
    let Some(gpu) = Headless::new([0.0, 0.0, 50.0], [0.0, 0.0, 0.0]).await else {
        eprintln!("no GPU adapter, skipping");
        return;
    };
    let mut materials = library(&gpu);
    let mut node = Prop::mesh(
        "dish liquid",
        plane(37.0, 37.0, 32, 1),
        Surface::Liquid(ShaderKind::Dish),
    )
    .instantiate(&gpu.device, &mut materials);
    node.update_world_transform_all();
    node.write_to_buffers(&gpu.queue);

    let image = gpu
        .render_to_image(TRANSPARENT, Render::from_drawables(node.get_render()))
        .await;

    let centre = image.get_pixel(SIZE / 2, SIZE / 2);
    assert_eq!(centre[3], 255, "centre {centre:?}");
    assert_eq!(image.get_pixel(0, 0)[3], 0);
    assert_eq!(image.get_pixel(SIZE - 1, SIZE - 1)[3], 0);

    // corner of the plane, outside the disc but inside the frame
    let half_height = 50.0 * (30.0f32).to_radians().tan();
    let px_per_unit = SIZE as f32 / (2.0 * half_height);
    let corner = (SIZE as f32 / 2.0 + 17.0 * px_per_unit) as u32;
    assert_eq!(image.get_pixel(corner, corner)[3], 0);
}

#[tokio::test]
async fn opaque_box_hides_the_liquid_behind_it() {
    let Some(gpu) = Headless::new([0.0, 0.0, 50.0], [0.0, 0.0, 0.0]).await else {
        eprintln!("no GPU adapter, skipping");
        return;
    };
    let mut materials = library(&gpu);
    let mut node = Prop::group("stage")
        .with_child(
            Prop::mesh(
                "liquid",
                plane(37.0, 37.0, 32, 1),
                Surface::Liquid(ShaderKind::Dish),
            )
            .at(0.0, 0.0, -5.0),
        )
        .with_child(Prop::mesh("block", cuboid(4.0, 4.0, 4.0), Surface::Wood))
        .instantiate(&gpu.device, &mut materials);
    node.update_world_transform_all();
    node.write_to_buffers(&gpu.queue);

    let image = gpu
        .render_to_image(TRANSPARENT, Render::from_drawables(node.get_render()))
        .await;

    // the solid wood fallback colour, fully lit or not, is opaque and not blue-green
    let centre = image.get_pixel(SIZE / 2, SIZE / 2);
    assert_eq!(centre[3], 255);
    assert!(centre[0] >= centre[2], "expected wood at the centre, got {centre:?}");
}

#[tokio::test]
async fn tilted_edges_are_antialiased() {
    let Some(gpu) = Headless::new([0.0, 0.0, 50.0], [0.0, 0.0, 0.0]).await else {
        eprintln!("no GPU adapter, skipping");
        return;
    };
    let mut materials = library(&gpu);
    let mut node = Prop::mesh("block", cuboid(20.0, 20.0, 1.0), Surface::Wood)
        .rotated(0.0, 0.0, 0.5)
        .instantiate(&gpu.device, &mut materials);
    node.update_world_transform_all();
    node.write_to_buffers(&gpu.queue);

    let image = gpu
        .render_to_image(TRANSPARENT, Render::from_drawables(node.get_render()))
        .await;

    assert_eq!(image.get_pixel(SIZE / 2, SIZE / 2)[3], 255);
    // resolved samples leave partially covered pixels along the edges
    let blended = image
        .pixels()
        .filter(|p| p[3] > 0 && p[3] < 255)
        .count();
    assert!(blended > 0, "no partially covered pixels");
}
