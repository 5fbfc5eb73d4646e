// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cubic Bézier segments.

use alloc::vec::Vec;
use core::ops::Range;

use arrayvec::ArrayVec;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::common::fuzzy_is_null;
use crate::param_curve::LENGTH_ACCURACY;
use crate::{Line, ParamCurve, ParamCurveArclen, Point, Rect, Vec2};

/// Depth of the explicit subdivision stack used when flattening.
///
/// A piece that is still not flat at this depth is accepted as is.
const FLATTEN_STACK: usize = 32;

/// Recursion bound for [`CubicBez::length`].
const MAX_LENGTH_DEPTH: usize = 16;

/// A single cubic Bézier segment.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub struct CubicBez {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicBez {
    /// Create a new cubic Bézier segment.
    #[inline]
    pub fn new<P: Into<Point>>(p0: P, p1: P, p2: P, p3: P) -> CubicBez {
        CubicBez {
            p0: p0.into(),
            p1: p1.into(),
            p2: p2.into(),
            p3: p3.into(),
        }
    }

    /// The four control points.
    #[inline]
    pub fn points(&self) -> [Point; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Are all four control points finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.p0.is_finite() && self.p1.is_finite() && self.p2.is_finite() && self.p3.is_finite()
    }

    /// The first derivative at `t`.
    pub fn deriv_at(&self, t: f64) -> Vec2 {
        let a = (1.0 - t) * (1.0 - t);
        let b = t * (1.0 - t);
        let c = t * t;
        3.0 * ((self.p1 - self.p0) * a + (self.p2 - self.p1) * (2.0 * b) + (self.p3 - self.p2) * c)
    }

    /// The second derivative at `t`.
    pub fn second_deriv_at(&self, t: f64) -> Vec2 {
        let k0 = 2.0 - 2.0 * t;
        let k1 = -4.0 + 6.0 * t;
        let k2 = 2.0 - 6.0 * t;
        let k3 = 2.0 * t;
        3.0 * (self.p0.to_vec2() * k0
            + self.p1.to_vec2() * k1
            + self.p2.to_vec2() * k2
            + self.p3.to_vec2() * k3)
    }

    /// A vector perpendicular to the tangent at `t`, pointing `(dy, -dx)`.
    ///
    /// It is not normalized; its length is a third of the derivative's.
    pub fn normal_at(&self, t: f64) -> Vec2 {
        let a = (1.0 - t) * (1.0 - t);
        let b = 2.0 * t * (1.0 - t);
        let c = t * t;
        let d = (self.p1 - self.p0) * a + (self.p2 - self.p1) * b + (self.p3 - self.p2) * c;
        d.turn_neg_90()
    }

    /// Split at `t = 0.5` by repeated averaging of the control points.
    pub fn split(&self) -> (CubicBez, CubicBez) {
        let c = self.p1.midpoint(self.p2);
        let l1 = self.p0.midpoint(self.p1);
        let r2 = self.p2.midpoint(self.p3);
        let l2 = l1.midpoint(c);
        let r1 = c.midpoint(r2);
        let mid = l2.midpoint(r1);
        (
            CubicBez::new(self.p0, l1, l2, mid),
            CubicBez::new(mid, r1, r2, self.p3),
        )
    }

    /// Split at parameter `t`, keeping the right part in `self` and
    /// returning the left part.
    pub fn split_left(&mut self, t: f64) -> CubicBez {
        let l1 = self.p0.lerp(self.p1, t);
        let tmp = self.p1.lerp(self.p2, t);
        self.p2 = self.p2.lerp(self.p3, t);
        self.p1 = tmp.lerp(self.p2, t);
        let l2 = l1.lerp(tmp, t);
        let mid = l2.lerp(self.p1, t);
        let left = CubicBez::new(self.p0, l1, l2, mid);
        self.p0 = mid;
        left
    }

    /// The part of the curve between parameters `t0` and `t1`.
    pub fn on_interval(&self, t0: f64, t1: f64) -> CubicBez {
        if t0 == 0.0 && t1 == 1.0 {
            return *self;
        }
        if t0 >= 1.0 {
            return CubicBez::new(self.p3, self.p3, self.p3, self.p3);
        }
        let mut right = *self;
        right.split_left(t0);
        right.split_left((t1 - t0) / (1.0 - t0))
    }

    /// The tangent at the start, as a line leaving `p0`.
    ///
    /// Control points coinciding with `p0` are skipped; the result is a
    /// null line only if the whole curve is a single point.
    pub fn start_tangent(&self) -> Line {
        let mut tangent = Line::new(self.p0, self.p1);
        if tangent.is_null() {
            tangent = Line::new(self.p0, self.p2);
        }
        if tangent.is_null() {
            tangent = Line::new(self.p0, self.p3);
        }
        tangent
    }

    /// The tangent at the end, as a line leaving `p3` backwards.
    pub fn end_tangent(&self) -> Line {
        let mut tangent = Line::new(self.p3, self.p2);
        if tangent.is_null() {
            tangent = Line::new(self.p3, self.p1);
        }
        if tangent.is_null() {
            tangent = Line::new(self.p3, self.p0);
        }
        tangent
    }

    /// The bounding box of the control points.
    pub fn control_box(&self) -> Rect {
        Rect::from_points(self.p0, self.p1)
            .union_pt(self.p2)
            .union_pt(self.p3)
    }

    /// Flatten into a polyline whose points lie within about `tolerance`
    /// of the curve.
    ///
    /// The result starts with `p0` and ends with `p3`.
    pub fn to_polygon(&self, tolerance: f64) -> Vec<Point> {
        let mut polygon = Vec::new();
        polygon.push(self.p0);
        self.add_to_polygon(&mut polygon, tolerance);
        polygon
    }

    /// Append the flattened curve to `polygon`, excluding the start point.
    ///
    /// The flatness measure is the distance of the inner control points from
    /// the chord, normalized by the manhattan length of the chord. Chords
    /// shorter than one unit switch to plain manhattan distances from `p0`.
    pub fn add_to_polygon(&self, polygon: &mut Vec<Point>, tolerance: f64) {
        debug_assert!(tolerance > 0.0, "flattening tolerance must be positive");
        if !self.is_finite() || !(tolerance > 0.0) {
            polygon.push(self.p3);
            return;
        }
        let mut stack = ArrayVec::<CubicBez, FLATTEN_STACK>::new();
        stack.push(*self);
        while let Some(&b) = stack.last() {
            let chord = b.p3 - b.p0;
            let mut l = chord.manhattan();
            let d = if l > 1.0 {
                chord.cross(b.p0 - b.p1).abs() + chord.cross(b.p0 - b.p2).abs()
            } else {
                l = 1.0;
                (b.p0 - b.p1).manhattan() + (b.p0 - b.p2).manhattan()
            };
            stack.pop();
            if d < tolerance * l || stack.len() == FLATTEN_STACK - 1 {
                polygon.push(b.p3);
            } else {
                let (first, second) = b.split();
                stack.push(second);
                stack.push(first);
            }
        }
    }

    /// Estimate the length of the curve.
    ///
    /// Pieces are subdivided until their control polygon is at most `error`
    /// longer than their chord, and the chords are summed.
    pub fn length(&self, error: f64) -> f64 {
        fn rec(c: &CubicBez, error: f64, depth: usize) -> f64 {
            let polygon = (c.p1 - c.p0).hypot() + (c.p2 - c.p1).hypot() + (c.p3 - c.p2).hypot();
            let chord = (c.p3 - c.p0).hypot();
            if polygon - chord > error && depth < MAX_LENGTH_DEPTH {
                let (left, right) = c.split();
                rec(&left, error, depth + 1) + rec(&right, error, depth + 1)
            } else {
                chord
            }
        }
        rec(self, error, 0)
    }

    /// The parameter at which the curve has travelled `len` from its start.
    ///
    /// Accurate to about [`LENGTH_ACCURACY`]; lengths at or beyond the
    /// total give `1.0`.
    pub fn t_at_length(&self, len: f64) -> f64 {
        self.inv_arclen(len, LENGTH_ACCURACY)
    }

    /// Parameters in `(0, 1)` where the y derivative vanishes, ascending.
    pub fn stationary_y_points(&self) -> ArrayVec<f64, 2> {
        let (y0, y1, y2, y3) = (self.p0.y, self.p1.y, self.p2.y, self.p3.y);
        let a = -y0 + 3.0 * y1 - 3.0 * y2 + y3;
        let b = 2.0 * y0 - 4.0 * y1 + 2.0 * y2;
        let c = -y0 + y1;
        let in_range = |t: f64| t > 0.0 && t < 1.0;
        let mut result = ArrayVec::new();
        if fuzzy_is_null(a) {
            if !fuzzy_is_null(b) {
                let t = -c / b;
                if in_range(t) {
                    result.push(t);
                }
            }
            return result;
        }
        let disc = b * b - 4.0 * a * c;
        if fuzzy_is_null(disc) {
            let t = -b / (2.0 * a);
            if in_range(t) {
                result.push(t);
            }
        } else if disc > 0.0 {
            let root = disc.sqrt();
            let mut t0 = (-b - root) / (2.0 * a);
            let mut t1 = (-b + root) / (2.0 * a);
            if t1 < t0 {
                core::mem::swap(&mut t0, &mut t1);
            }
            for t in [t0, t1] {
                if in_range(t) {
                    result.push(t);
                }
            }
        }
        result
    }
}

impl ParamCurve for CubicBez {
    /// Nested linear interpolation; exact at both ends.
    fn eval(&self, t: f64) -> Point {
        let a = self.p0.lerp(self.p1, t);
        let b = self.p1.lerp(self.p2, t);
        let c = self.p2.lerp(self.p3, t);
        a.lerp(b, t).lerp(b.lerp(c, t), t)
    }

    #[inline]
    fn subsegment(&self, range: Range<f64>) -> CubicBez {
        self.on_interval(range.start, range.end)
    }

    #[inline]
    fn subdivide(&self) -> (CubicBez, CubicBez) {
        self.split()
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p3
    }
}

impl ParamCurveArclen for CubicBez {
    #[inline]
    fn arclen(&self, accuracy: f64) -> f64 {
        self.length(accuracy)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::{CubicBez, ParamCurve, ParamCurveArclen, Point, Rect, Vec2};

    fn random_cubic(rng: &mut StdRng, scale: f64) -> CubicBez {
        let mut p = || Point::new(rng.random::<f64>() * scale, rng.random::<f64>() * scale);
        CubicBez::new(p(), p(), p(), p())
    }

    fn dist_to_segment(p: Point, a: Point, b: Point) -> f64 {
        let d = b - a;
        let len2 = d.hypot2();
        if len2 == 0.0 {
            return p.distance(a);
        }
        let t = ((p - a).dot(d) / len2).clamp(0.0, 1.0);
        p.distance(a.lerp(b, t))
    }

    #[test]
    fn eval_is_exact_at_ends() {
        let c = CubicBez::new((0.1, 0.3), (7.0, -2.0), (3.3, 9.1), (1e3, 0.7));
        assert_eq!(c.eval(0.0), c.p0);
        assert_eq!(c.eval(1.0), c.p3);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        // y = x^2
        let c = CubicBez::new((0.0, 0.0), (1.0 / 3.0, 0.0), (2.0 / 3.0, 1.0 / 3.0), (1.0, 1.0));
        let delta = 1e-6;
        for i in 0..=10 {
            let t = i as f64 * 0.09;
            let d_approx = (c.eval(t + delta) - c.eval(t)) * delta.recip();
            assert!((c.deriv_at(t) - d_approx).hypot() < delta * 2.0);
            let dd_approx = (c.deriv_at(t + delta) - c.deriv_at(t)) * delta.recip();
            assert!((c.second_deriv_at(t) - dd_approx).hypot() < 1e-4);
        }
        let n = c.normal_at(0.5);
        assert!(n.dot(c.deriv_at(0.5)).abs() < 1e-12);
        assert_eq!(c.normal_at(0.0), Vec2::new(0.0, -1.0 / 3.0));
    }

    #[test]
    fn split_reproduces_curve() {
        let c = CubicBez::new((0.0, 0.0), (30.0, 90.0), (70.0, -40.0), (100.0, 10.0));
        let (l, r) = c.split();
        assert_eq!(l.p0, c.p0);
        assert_eq!(r.p3, c.p3);
        assert_eq!(l.p3, r.p0);
        for i in 0..=10 {
            let t = i as f64 * 0.1;
            assert!(l.eval(t).distance(c.eval(0.5 * t)) < 1e-9);
            assert!(r.eval(t).distance(c.eval(0.5 + 0.5 * t)) < 1e-9);
        }
    }

    #[test]
    fn split_left_keeps_right_half() {
        let c = CubicBez::new((0.0, 0.0), (30.0, 90.0), (70.0, -40.0), (100.0, 10.0));
        let mut right = c;
        let left = right.split_left(0.25);
        assert_eq!(left.p0, c.p0);
        assert_eq!(left.p3, right.p0);
        assert_eq!(right.p3, c.p3);
        assert!(left.eval(0.5).distance(c.eval(0.125)) < 1e-9);
        assert!(right.eval(0.5).distance(c.eval(0.625)) < 1e-9);
    }

    #[test]
    fn on_interval() {
        let c = CubicBez::new((0.0, 0.0), (30.0, 90.0), (70.0, -40.0), (100.0, 10.0));
        assert_eq!(c.subsegment(0.0..1.0), c);
        let s = c.subsegment(0.2..0.7);
        assert!(s.p0.distance(c.eval(0.2)) < 1e-9);
        assert!(s.p3.distance(c.eval(0.7)) < 1e-9);
        assert!(s.eval(0.5).distance(c.eval(0.45)) < 1e-9);
    }

    #[test]
    fn tangents_skip_coincident_points() {
        let c = CubicBez::new((0.0, 0.0), (0.0, 0.0), (5.0, 5.0), (10.0, 0.0));
        assert_eq!(c.start_tangent().p1, Point::new(5.0, 5.0));
        assert_eq!(c.end_tangent().p1, Point::new(5.0, 5.0));
        let dot = CubicBez::new((1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0));
        assert!(dot.start_tangent().is_null());
        assert_eq!(c.control_box(), Rect::new(0.0, 0.0, 10.0, 5.0));
    }

    #[test]
    fn flattened_points_are_near_curve() {
        let mut rng = StdRng::seed_from_u64(42);
        for &tolerance in &[1.0, 0.25, 0.01] {
            for _ in 0..50 {
                let c = random_cubic(&mut rng, 100.0);
                let poly = c.to_polygon(tolerance);
                assert_eq!(poly[0], c.p0);
                assert_eq!(*poly.last().unwrap(), c.p3);
                for _ in 0..200 {
                    let p = c.eval(rng.random::<f64>());
                    let dist = poly
                        .windows(2)
                        .map(|w| dist_to_segment(p, w[0], w[1]))
                        .fold(f64::INFINITY, f64::min);
                    assert!(
                        dist <= 4.0 * tolerance,
                        "{c:?} at tolerance {tolerance}: {dist}"
                    );
                }
            }
        }
    }

    #[test]
    fn flatten_terminates_on_nan() {
        let c = CubicBez::new((0.0, 0.0), (f64::NAN, 1.0), (2.0, 2.0), (3.0, 0.0));
        assert_eq!(c.to_polygon(0.25).len(), 2);
    }

    #[test]
    fn straight_curve_length() {
        let c = CubicBez::new((0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0));
        assert_eq!(c.length(0.01), 30.0);
        assert!((c.t_at_length(15.0) - 0.5).abs() < 1e-3);
        assert_eq!(c.t_at_length(30.0), 1.0);
        assert_eq!(c.t_at_length(45.0), 1.0);
    }

    #[test]
    fn curved_length() {
        // y = x^2
        let c = CubicBez::new((0.0, 0.0), (1.0 / 3.0, 0.0), (2.0 / 3.0, 1.0 / 3.0), (1.0, 1.0));
        let true_arclen = 0.5 * 5.0f64.sqrt() + 0.25 * (2.0 + 5.0f64.sqrt()).ln();
        assert!((c.length(1e-6) - true_arclen).abs() < 1e-4);
        assert!((c.arclen(0.01) - true_arclen).abs() < 0.01);

        let half = 0.5 * c.length(0.01);
        let t = c.t_at_length(half);
        let prefix = c.subsegment(0.0..t).length(0.01);
        assert!((prefix - half).abs() < 0.01, "{prefix} vs {half}");
    }

    #[test]
    fn stationary_points() {
        // Rises then falls back: one maximum at t = 0.5.
        let hump = CubicBez::new((0.0, 0.0), (1.0, 10.0), (2.0, 10.0), (3.0, 0.0));
        let ts = hump.stationary_y_points();
        assert_eq!(ts.len(), 1);
        assert!((ts[0] - 0.5).abs() < 1e-12);

        let wave = CubicBez::new((0.0, 0.0), (1.0, 10.0), (2.0, -10.0), (3.0, 0.0));
        let ts = wave.stationary_y_points();
        assert_eq!(ts.len(), 2);
        assert!(ts[0] < ts[1]);
        for t in ts {
            assert!(wave.deriv_at(t).y.abs() < 1e-9);
        }

        let flat = CubicBez::new((0.0, 1.0), (1.0, 1.0), (2.0, 1.0), (3.0, 1.0));
        assert!(flat.stationary_y_points().is_empty());
    }
}
