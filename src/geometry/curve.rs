//! Parametric 3D curves with arc-length parametrisation.
//!
//! `point(t)` evaluates a curve at its natural parameter, `point_at(u)` at a
//! fraction `u` of its arc length. Arc lengths are approximated by summing
//! the chords between [`ARC_LENGTH_DIVISIONS`] + 1 evenly spaced samples.

use cgmath::{InnerSpace, Vector3, Zero};

/// Number of chords used to approximate a curve's length.
pub const ARC_LENGTH_DIVISIONS: usize = 200;

pub trait Curve {
    /// Point at the curve parameter `t` in `[0, 1]`.
    fn point(&self, t: f32) -> Vector3<f32>;

    /// Cumulative chord lengths of `divisions` segments, starting with `0.0`.
    fn lengths(&self, divisions: usize) -> Vec<f32> {
        let divisions = divisions.max(1);
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut last = self.point(0.0);
        let mut sum = 0.0;
        lengths.push(sum);
        for p in 1..=divisions {
            let current = self.point(p as f32 / divisions as f32);
            sum += (current - last).magnitude();
            lengths.push(sum);
            last = current;
        }
        lengths
    }

    fn length(&self) -> f32 {
        self.lengths(ARC_LENGTH_DIVISIONS)
            .last()
            .copied()
            .unwrap_or(0.0)
    }

    /// Map an arc-length fraction `u` to the curve parameter `t`.
    fn u_to_t(&self, u: f32) -> f32 {
        arc_length_to_t(&self.lengths(ARC_LENGTH_DIVISIONS), u)
    }

    fn point_at(&self, u: f32) -> Vector3<f32> {
        self.point(self.u_to_t(u))
    }

    /// `divisions + 1` points equally spaced along the arc length, starting
    /// at `point(0)` and ending at `point(1)`.
    fn spaced_points(&self, divisions: usize) -> Vec<Vector3<f32>> {
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|d| self.point_at(d as f32 / divisions as f32))
            .collect()
    }
}

/**
 * Binary search for the chord containing `u * total_length`, then
 * interpolate linearly inside that chord.
 */
fn arc_length_to_t(arc_lengths: &[f32], u: f32) -> f32 {
    let n = arc_lengths.len();
    let total = match arc_lengths.last() {
        Some(total) if n > 1 && *total > 0.0 => *total,
        _ => return 0.0,
    };
    let target = u.clamp(0.0, 1.0) * total;

    // index of the last cumulative length not greater than the target
    let i = arc_lengths
        .partition_point(|length| *length <= target)
        .saturating_sub(1)
        .min(n - 2);
    let before = arc_lengths[i];
    if before == target {
        return i as f32 / (n - 1) as f32;
    }
    let segment = arc_lengths[i + 1] - before;
    let fraction = if segment > 0.0 {
        (target - before) / segment
    } else {
        0.0
    };
    ((i as f32 + fraction) / (n - 1) as f32).min(1.0)
}

/// Cubic Bezier curve through `v0` and `v3`, shaped by the control points
/// `v1` and `v2`.
#[derive(Clone, Debug, PartialEq)]
pub struct CubicBezier {
    pub v0: Vector3<f32>,
    pub v1: Vector3<f32>,
    pub v2: Vector3<f32>,
    pub v3: Vector3<f32>,
}

impl CubicBezier {
    pub fn new(
        v0: Vector3<f32>,
        v1: Vector3<f32>,
        v2: Vector3<f32>,
        v3: Vector3<f32>,
    ) -> Self {
        Self { v0, v1, v2, v3 }
    }
}

impl Curve for CubicBezier {
    fn point(&self, t: f32) -> Vector3<f32> {
        let k = 1.0 - t;
        self.v0 * (k * k * k)
            + self.v1 * (3.0 * k * k * t)
            + self.v2 * (3.0 * k * t * t)
            + self.v3 * (t * t * t)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub from: Vector3<f32>,
    pub to: Vector3<f32>,
}

impl Line {
    pub fn new(from: Vector3<f32>, to: Vector3<f32>) -> Self {
        Self { from, to }
    }
}

impl Curve for Line {
    fn point(&self, t: f32) -> Vector3<f32> {
        if t == 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * t
    }

    fn length(&self) -> f32 {
        (self.to - self.from).magnitude()
    }

    // a line is already parametrised by arc length
    fn point_at(&self, u: f32) -> Vector3<f32> {
        self.point(u)
    }
}

/// A sequence of curves evaluated as one.
#[derive(Default)]
pub struct CurvePath {
    curves: Vec<Box<dyn Curve + Send + Sync>>,
}

impl CurvePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, curve: impl Curve + Send + Sync + 'static) -> Self {
        self.add(curve);
        self
    }

    pub fn add(&mut self, curve: impl Curve + Send + Sync + 'static) {
        self.curves.push(Box::new(curve));
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Cumulative lengths of the contained curves.
    pub fn curve_lengths(&self) -> Vec<f32> {
        self.curves
            .iter()
            .scan(0.0, |sum, curve| {
                *sum += curve.length();
                Some(*sum)
            })
            .collect()
    }
}

impl Curve for CurvePath {
    fn point(&self, t: f32) -> Vector3<f32> {
        let curve_lengths = self.curve_lengths();
        let Some(total) = curve_lengths.last().copied() else {
            return Vector3::zero();
        };
        let distance = t * total;
        for (curve, end) in self.curves.iter().zip(&curve_lengths) {
            if *end >= distance {
                let remaining = end - distance;
                let segment = curve.length();
                let u = if segment == 0.0 {
                    0.0
                } else {
                    1.0 - remaining / segment
                };
                return curve.point_at(u);
            }
        }
        // rounding pushed the distance past the end
        self.curves
            .last()
            .map(|curve| curve.point(1.0))
            .unwrap_or_else(Vector3::zero)
    }

    fn length(&self) -> f32 {
        self.curve_lengths().last().copied().unwrap_or(0.0)
    }

    fn spaced_points(&self, divisions: usize) -> Vec<Vector3<f32>> {
        if self.curves.is_empty() {
            return Vec::new();
        }
        let divisions = divisions.max(1);
        (0..=divisions)
            .map(|i| self.point(i as f32 / divisions as f32))
            .collect()
    }
}
