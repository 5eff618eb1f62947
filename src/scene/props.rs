//! Blueprints of the individual props.
//!
//! Distances are in scene units with the table top at y = 0. Every lathe is
//! turned with [`LATHE_SEGMENTS`] segments.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use cgmath::Vector3;

use crate::{
    geometry::{
        lathe::lathe,
        map_range,
        parametric::parametric,
        polar,
        primitives::{cuboid, full_sphere, plane, sphere, torus},
    },
    pipelines::animated::ShaderKind,
    scene::{blueprint::Prop, materials::Surface, profiles},
};

pub const LATHE_SEGMENTS: u32 = 32;
/// Points on the flat top of a liquid, from the axis to the wall.
pub const MENISCUS_POINTS: usize = 50;

/// A lathed glass vessel with optional rim and liquid.
#[derive(Clone, Debug)]
pub struct GlassContainer {
    pub name: String,
    /// Rim first, see [`profiles`].
    pub profile: Vec<Vector3<f32>>,
    pub position: Vector3<f32>,
    pub item_scale: f32,
    /// Radial shrink of the liquid so it stays inside the glass.
    pub inside_scale: f32,
    /// Fill level as a fraction of the rim height.
    pub filled: f32,
    pub liquid: ShaderKind,
    pub no_top: bool,
    pub no_liquid: bool,
}

impl GlassContainer {
    pub fn new(name: impl Into<String>, profile: Vec<Vector3<f32>>, liquid: ShaderKind) -> Self {
        Self {
            name: name.into(),
            profile,
            position: Vector3::new(0.0, 0.0, 0.0),
            item_scale: 1.0,
            inside_scale: 0.9,
            filled: 0.5,
            liquid,
            no_top: false,
            no_liquid: false,
        }
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn item_scale(mut self, item_scale: f32) -> Self {
        self.item_scale = item_scale;
        self
    }

    pub fn filled(mut self, filled: f32) -> Self {
        self.filled = filled;
        self
    }

    pub fn without_top(mut self) -> Self {
        self.no_top = true;
        self
    }

    pub fn without_liquid(mut self) -> Self {
        self.no_liquid = true;
        self
    }

    pub fn build(&self) -> Prop {
        let mut group = Prop::group(&self.name)
            .at(self.position.x, self.position.y, self.position.z)
            .scaled(self.item_scale)
            .rotated(0.0, PI, 0.0);
        let Some(rim) = self.profile.first().copied() else {
            log::warn!("{} has an empty profile", self.name);
            return group;
        };

        if !self.no_liquid {
            let points = liquid_profile(&self.profile, self.filled);
            if points.is_empty() {
                log::warn!(
                    "{} is filled to {} but no profile point lies below that, leaving it empty",
                    self.name,
                    self.filled
                );
            } else {
                group = group.with_child(
                    Prop::mesh(
                        format!("{} liquid", self.name),
                        lathe(&points, LATHE_SEGMENTS),
                        Surface::Liquid(self.liquid),
                    )
                    .scaled_xyz(self.inside_scale, 1.0, self.inside_scale),
                );
            }
        }

        group = group.with_child(Prop::mesh(
            format!("{} glass", self.name),
            lathe(&self.profile, LATHE_SEGMENTS),
            Surface::Glass,
        ));

        if !self.no_top {
            group = group.with_child(
                Prop::mesh(format!("{} rim", self.name), torus(rim.x, 0.6, 16, 100), Surface::GlassRim)
                    .rotated(FRAC_PI_2, 0.0, 0.0)
                    .at(0.0, rim.y, 0.0),
            );
        }
        group
    }
}

/**
 * Profile of the liquid inside a vessel: every profile point strictly below
 * `filled` times the rim height, topped by a flat meniscus that runs from the
 * axis out to the highest kept point.
 *
 * Returns an empty list when nothing lies below the fill height.
 */
pub fn liquid_profile(profile: &[Vector3<f32>], filled: f32) -> Vec<Vector3<f32>> {
    let Some(rim) = profile.first() else {
        return Vec::new();
    };
    let cutoff = map_range(filled, 0.0, 1.0, 0.0, rim.y);
    let below: Vec<_> = profile.iter().copied().filter(|p| p.y < cutoff).collect();
    match below.first() {
        Some(top) => meniscus(top.x, top.y).into_iter().chain(below).collect(),
        None => Vec::new(),
    }
}

/// [`MENISCUS_POINTS`] points from radius 0.01 at `y + 0.1` towards `(x, y)`.
pub fn meniscus(x: f32, y: f32) -> Vec<Vector3<f32>> {
    let n = MENISCUS_POINTS as f32;
    (0..MENISCUS_POINTS)
        .map(|i| {
            let i = i as f32;
            Vector3::new(
                map_range(i, 0.0, n, 0.01, x),
                map_range(i, 0.0, n, y + 0.1, y),
                0.0,
            )
        })
        .collect()
}

/// A flat disc of liquid, sampled in polar coordinates.
fn pot_liquid(u: f32, v: f32) -> Vector3<f32> {
    let angle = map_range(v, 0.0, 1.0, 0.001, TAU);
    let radius = map_range(u, 0.0, 1.0, 0.001, 8.0);
    let (x, z) = polar(angle, radius);
    Vector3::new(x, 0.0, z)
}

pub fn pot() -> Prop {
    Prop::group("pot")
        .at(-40.0, 0.0, 10.0)
        .scaled_xyz(1.4, 1.2, 1.2)
        .with_child(
            Prop::mesh(
                "pot body",
                sphere(10.0, 36, 36, 0.0, TAU, PI * 0.3, PI * 0.5),
                Surface::Rust,
            )
            .at(0.0, 8.0, 0.0),
        )
        .with_child(
            Prop::mesh("pot rim", torus(7.8, 0.7, 16, 100), Surface::RustBand)
                .rotated(FRAC_PI_2, 0.0, 0.0)
                .at(0.0, 14.0, 0.0),
        )
        .with_child(
            Prop::mesh(
                "pot liquid",
                parametric(pot_liquid, 15, 25),
                Surface::Liquid(ShaderKind::Pot),
            )
            .at(0.0, 12.0, 0.0),
        )
}

pub fn beakers() -> [Prop; 2] {
    [
        GlassContainer::new("beaker 1", profiles::beaker_1(), ShaderKind::Beaker)
            .at(-22.0, 0.0, -20.0)
            .item_scale(0.3)
            .build(),
        GlassContainer::new("beaker 2", profiles::beaker_2(), ShaderKind::Beaker)
            .at(-10.0, 0.0, -20.0)
            .item_scale(0.2)
            .build(),
    ]
}

pub fn table() -> Prop {
    let board = |name: &str, w, h, d, x, y| Prop::mesh(name, cuboid(w, h, d), Surface::Wood).at(x, y, 0.0);
    Prop::group("table")
        .at(0.0, -3.0, 0.0)
        .with_child(board("table top", 120.0, 5.0, 60.0, 0.0, 0.0))
        .with_child(board("table leg left", 5.0, 40.0, 60.0, -50.0, -22.5))
        .with_child(board("table leg right", 5.0, 40.0, 60.0, 50.0, -22.5))
}

pub fn papers() -> Prop {
    let sheets = [
        (TAU / 16.0, (-15.0, 0.0, 0.0)),
        (-TAU / 16.0, (1.0, 0.1, -5.0)),
        (0.0, (0.0, 0.2, 15.0)),
        (-TAU / 16.0, (25.0, 0.0, 22.0)),
    ];
    Prop::group("papers").with_children(sheets.into_iter().enumerate().map(
        |(page, (rotation, (x, y, z)))| {
            Prop::mesh(
                format!("paper {}", page + 1),
                plane(18.0, 25.0, 32, 1),
                Surface::Page(page as u8),
            )
            .rotated(-FRAC_PI_2, 0.0, rotation)
            .at(x, y, z)
        },
    ))
}

pub fn wine_glass() -> Prop {
    Prop::group("wine glass")
        .at(25.0, 20.0, 0.0)
        .with_child(
            GlassContainer::new("wine glass stem", profiles::wine_glass_bottom(), ShaderKind::Bottle)
                .at(0.0, -20.0, 0.0)
                .without_top()
                .without_liquid()
                .build(),
        )
        .with_child(
            GlassContainer::new("wine glass bowl", profiles::wine_glass_top(), ShaderKind::Bottle)
                .at(0.0, -20.0, 0.0)
                .without_top()
                .filled(0.8)
                .build(),
        )
}

pub fn bottle() -> Prop {
    Prop::group("bottle")
        .at(20.0, 6.8, -10.0)
        .scaled(0.34)
        .with_child(
            GlassContainer::new("bottle glass", profiles::bottle(), ShaderKind::Bottle)
                .at(0.0, -20.0, 0.0)
                .item_scale(4.0)
                .without_top()
                .build(),
        )
        .with_child(Prop::mesh("bottle stopper", full_sphere(4.0, 32, 32), Surface::Rust).at(0.0, 40.0, 0.0))
}

pub fn dish() -> Prop {
    Prop::group("dish")
        .at(35.0, 0.0, 15.0)
        .scaled(0.4)
        .with_child(
            GlassContainer::new("dish glass", profiles::dish(), ShaderKind::Dish)
                .item_scale(0.2)
                .filled(0.6)
                .without_liquid()
                .build(),
        )
        .with_child(
            Prop::mesh("dish liquid", plane(37.0, 37.0, 32, 1), Surface::Liquid(ShaderKind::Dish))
                .rotated(FRAC_PI_2, 0.0, 0.0)
                .at(0.0, 8.2, 0.0),
        )
}

/// The whole tableau.
pub fn potion_table() -> Prop {
    let [beaker_1, beaker_2] = beakers();
    Prop::group("potion table").with_children([
        pot(),
        beaker_1,
        beaker_2,
        table(),
        papers(),
        wine_glass(),
        bottle(),
        dish(),
    ])
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector4};

    use super::*;

    fn world_origin(root: &Prop, name: &str) -> Vector3<f32> {
        let world = root
            .world_matrix(name)
            .unwrap_or_else(|| panic!("no prop called {name}"));
        (world * Vector4::new(0.0, 0.0, 0.0, 1.0)).truncate()
    }

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn pot_rim_sits_on_the_squashed_pot() {
        let scene = potion_table();
        assert_close(world_origin(&scene, "pot rim"), Vector3::new(-40.0, 16.8, 10.0));
        assert_close(world_origin(&scene, "pot liquid"), Vector3::new(-40.0, 14.4, 10.0));
    }

    #[test]
    fn liquid_keeps_points_strictly_below_the_fill_line() {
        let profile = profiles::beaker_1();
        let points = liquid_profile(&profile, 0.5);
        let (surface, body) = points.split_at(MENISCUS_POINTS);
        assert!(!body.is_empty());
        assert!(body.iter().all(|p| p.y < 22.5));
        let expected = profile.iter().filter(|p| p.y < 22.5).count();
        assert_eq!(body.len(), expected);

        assert_eq!(surface.len(), MENISCUS_POINTS);
        assert!((surface[0].x - 0.01).abs() < 1e-6);
        assert!((surface[0].y - (body[0].y + 0.1)).abs() < 1e-5);
        // the meniscus approaches but never reaches the wall point
        assert!(surface[MENISCUS_POINTS - 1].x < body[0].x);
    }

    #[test]
    fn empty_glass_has_no_liquid() {
        assert!(liquid_profile(&profiles::beaker_1(), 0.0).is_empty());
        assert!(liquid_profile(&[], 0.5).is_empty());
        let glass = GlassContainer::new("dry", profiles::beaker_1(), ShaderKind::Beaker)
            .filled(0.0)
            .build();
        assert!(glass.find("dry liquid").is_none());
        assert!(glass.find("dry glass").is_some());
    }

    #[test]
    fn container_options_choose_children() {
        let full = GlassContainer::new("full", profiles::beaker_2(), ShaderKind::Beaker).build();
        let names: Vec<_> = full.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["full liquid", "full glass", "full rim"]);

        let bare = GlassContainer::new("bare", profiles::beaker_2(), ShaderKind::Beaker)
            .without_top()
            .without_liquid()
            .build();
        assert_eq!(bare.children.len(), 1);
    }

    #[test]
    fn liquid_is_shrunk_radially_only() {
        let glass = GlassContainer::new("g", profiles::beaker_1(), ShaderKind::Beaker).build();
        let liquid = glass.find("g liquid").unwrap();
        assert_eq!(liquid.transform.scale, Vector3::new(0.9, 1.0, 0.9));
    }

    #[test]
    fn rim_tops_the_glass() {
        let scene = potion_table();
        // beaker 2 rim: (5.8, 50) scaled by 0.2 around (-10, 0, -20), turned half way round
        assert_close(world_origin(&scene, "beaker 2 rim"), Vector3::new(-10.0, 10.0, -20.0));
    }

    #[test]
    fn dish_liquid_floats_above_the_dish() {
        let scene = potion_table();
        assert_close(world_origin(&scene, "dish liquid"), Vector3::new(35.0, 8.2 * 0.4, 15.0));
        assert!(scene.find("dish glass liquid").is_none());
        assert!(scene.find("dish glass rim").is_some());
    }

    #[test]
    fn table_legs_reach_down() {
        let scene = potion_table();
        assert_close(world_origin(&scene, "table leg left"), Vector3::new(-50.0, -25.5, 0.0));
        assert_close(world_origin(&scene, "table top"), Vector3::new(0.0, -3.0, 0.0));
    }

    #[test]
    fn papers_lie_flat() {
        let scene = potion_table();
        for page in 1..=4 {
            let world = scene.world_matrix(&format!("paper {page}")).unwrap();
            let normal = (world * Vector4::new(0.0, 0.0, 1.0, 0.0)).truncate();
            assert_close(normal, Vector3::new(0.0, 1.0, 0.0));
        }
    }

    #[test]
    fn scene_holds_every_prop() {
        let scene = potion_table();
        let top: Vec<_> = scene.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            top,
            ["pot", "beaker 1", "beaker 2", "table", "papers", "wine glass", "bottle", "dish"]
        );
        let shapes = scene.shapes();
        let liquids = shapes
            .iter()
            .filter(|(_, shape)| matches!(shape.surface, Surface::Liquid(_)))
            .count();
        // pot, two beakers, wine glass bowl, bottle, dish
        assert_eq!(liquids, 6);
        assert!(shapes.iter().all(|(_, shape)| !shape.geometry.is_empty()));
    }
}
