use std::collections::HashSet;

use cgmath::{Point3, Vector4};
use potion_table::{
    render::back_to_front,
    scene::{
        blueprint::Prop,
        materials::Surface,
        props::{GlassContainer, potion_table},
        profiles,
    },
    pipelines::animated::ShaderKind,
};

fn origin_of(scene: &Prop, name: &str) -> Point3<f32> {
    let world = scene
        .world_matrix(name)
        .unwrap_or_else(|| panic!("no prop called {name}"));
    Point3::from_homogeneous(world * Vector4::new(0.0, 0.0, 0.0, 1.0))
}

#[test]
fn prop_names_are_unique() {
    let scene = potion_table();
    let mut names = HashSet::new();
    scene.walk(cgmath::SquareMatrix::identity(), &mut |prop, _| {
        assert!(names.insert(prop.name.clone()), "{} appears twice", prop.name);
    });
    assert!(names.len() > 20);
}

#[test]
fn everything_but_the_table_stands_on_the_top() {
    let scene = potion_table();
    for name in ["pot", "beaker 1", "beaker 2", "wine glass", "bottle", "dish"] {
        let origin = origin_of(&scene, name);
        assert!(origin.y >= 0.0, "{name} sinks into the table: {origin:?}");
    }
    assert!(origin_of(&scene, "table leg right").y < -20.0);
}

#[test]
fn liquids_blend_and_solids_do_not() {
    let scene = potion_table();
    for (prop, shape) in scene.shapes() {
        let blended = shape.surface.pipeline().is_transparent();
        match shape.surface {
            Surface::Liquid(_) | Surface::Glass | Surface::GlassRim => {
                assert!(blended, "{} should blend", prop.name)
            }
            Surface::Rust | Surface::RustBand | Surface::Wood | Surface::Page(_) => {
                assert!(!blended, "{} should be opaque", prop.name)
            }
        }
    }
}

#[test]
fn glassware_sorts_back_to_front_from_the_default_eye() {
    let scene = potion_table();
    let eye = Point3::new(0.0, 60.0, 90.0);
    let mut glass: Vec<_> = scene
        .shapes()
        .into_iter()
        .filter(|(_, shape)| shape.surface.pipeline().is_transparent())
        .map(|(prop, _)| (prop.name.clone(), origin_of(&scene, &prop.name)))
        .collect();
    back_to_front(eye, &mut glass, |(_, origin)| *origin);

    let position = |name: &str| glass.iter().position(|(n, _)| n == name).unwrap();
    // the beakers stand at the back of the table, the dish at the front
    assert!(position("beaker 1 glass") < position("dish liquid"));
    assert!(position("beaker 2 liquid") < position("dish glass glass"));
}

#[test]
fn a_fuller_glass_has_a_taller_liquid() {
    let top = |filled: f32| {
        let glass = GlassContainer::new("g", profiles::beaker_1(), ShaderKind::Beaker)
            .filled(filled)
            .build();
        let liquid = glass.find("g liquid").unwrap();
        let shape = liquid.shape.as_ref().unwrap();
        shape
            .geometry
            .vertices
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max)
    };
    assert!(top(0.8) > top(0.3));
}
