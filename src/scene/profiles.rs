//! Lathe profiles of the glassware.
//!
//! Every profile is a list of `(radius, height, 0)` points sampled at equal
//! arc length. The first point is the rim: the liquid and the rim torus are
//! both derived from it.

use cgmath::Vector3;

use crate::geometry::curve::{CubicBezier, Curve, CurvePath, Line};

pub const PROFILE_DIVISIONS: usize = 100;

fn v(x: f32, y: f32) -> Vector3<f32> {
    Vector3::new(x, y, 0.0)
}

fn cubic(a: (f32, f32), b: (f32, f32), c: (f32, f32), d: (f32, f32)) -> CubicBezier {
    CubicBezier::new(v(a.0, a.1), v(b.0, b.1), v(c.0, c.1), v(d.0, d.1))
}

fn line(from: (f32, f32), to: (f32, f32)) -> Line {
    Line::new(v(from.0, from.1), v(to.0, to.1))
}

pub fn beaker_1() -> Vec<Vector3<f32>> {
    cubic((4.0, 45.0), (4.0, 11.1), (20.23, 10.3), (9.0, 0.0)).spaced_points(PROFILE_DIVISIONS)
}

pub fn beaker_2() -> Vec<Vector3<f32>> {
    CurvePath::new()
        .with(line((5.8, 50.0), (5.8, 35.3)))
        .with(cubic((5.8, 35.3), (32.3, 24.1), (30.7, 7.1), (0.0, 0.0)))
        .spaced_points(PROFILE_DIVISIONS)
}

pub fn dish() -> Vec<Vector3<f32>> {
    cubic((98.2, 49.5), (71.0, 9.8), (6.5, 34.4), (48.2, 0.0)).spaced_points(PROFILE_DIVISIONS)
}

pub fn wine_glass_top() -> Vec<Vector3<f32>> {
    cubic((1.821, 15.054), (4.324, 9.362), (2.669, 8.07), (0.327, 7.02))
        .spaced_points(PROFILE_DIVISIONS)
}

/// Foot and stem. Starts at the foot, so its "rim" sits on the table.
pub fn wine_glass_bottom() -> Vec<Vector3<f32>> {
    CurvePath::new()
        .with(cubic((2.4, 0.0), (0.327, 0.708), (2.097, 1.248), (0.36, 3.002)))
        .with(line((0.36, 3.002), (0.327, 7.02)))
        .spaced_points(PROFILE_DIVISIONS)
}

/// Traced from the base upwards, returned neck first.
pub fn bottle() -> Vec<Vector3<f32>> {
    let mut points = CurvePath::new()
        .with(cubic((3.009, 0.013), (4.112, 0.134), (3.45, 1.189), (2.96, 1.091)))
        .with(line((2.96, 1.091), (3.058, 7.905)))
        .with(line((3.058, 7.905), (1.048, 9.988)))
        .with(cubic((1.048, 9.988), (1.954, 10.625), (0.88, 12.267), (0.856, 14.984)))
        .spaced_points(PROFILE_DIVISIONS);
    points.reverse();
    points
}

#[cfg(test)]
mod tests {
    use cgmath::InnerSpace;

    use super::*;

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-3
    }

    #[test]
    fn every_profile_has_101_points_in_the_xy_plane() {
        for profile in [beaker_1(), beaker_2(), dish(), wine_glass_top(), wine_glass_bottom(), bottle()] {
            assert_eq!(profile.len(), PROFILE_DIVISIONS + 1);
            assert!(profile.iter().all(|p| p.z == 0.0 && p.x >= 0.0));
        }
    }

    #[test]
    fn profiles_start_at_the_rim() {
        assert!(close(beaker_1()[0], v(4.0, 45.0)));
        assert!(close(beaker_2()[0], v(5.8, 50.0)));
        assert!(close(dish()[0], v(98.2, 49.5)));
        assert!(close(wine_glass_top()[0], v(1.821, 15.054)));
        assert!(close(bottle()[0], v(0.856, 14.984)));
    }

    #[test]
    fn profiles_end_at_the_base() {
        assert!(close(*beaker_1().last().unwrap(), v(9.0, 0.0)));
        assert!(close(*beaker_2().last().unwrap(), v(0.0, 0.0)));
        assert!(close(*wine_glass_bottom().last().unwrap(), v(0.327, 7.02)));
        assert!(close(*bottle().last().unwrap(), v(3.009, 0.013)));
    }

    #[test]
    fn beaker_2_spends_its_first_points_on_the_straight_neck() {
        let points = beaker_2();
        // the neck is 14.7 long and the whole path at most ~92, so 15 samples fit on it
        assert!(points[..15].iter().all(|p| (p.x - 5.8).abs() < 1e-4));
        assert!(points[1].y < points[0].y);
    }

    #[test]
    fn wine_glass_halves_meet_at_the_stem() {
        let top = wine_glass_top();
        let bottom = wine_glass_bottom();
        assert!(close(*top.last().unwrap(), *bottom.last().unwrap()));
    }
}
