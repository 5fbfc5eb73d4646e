// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Approximating elliptical arcs with cubic Béziers.
//!
//! Angles here are in degrees and follow the y-up convention: zero points
//! along the positive x axis, and positive angles turn towards negative y.

use core::fmt;

use arrayvec::ArrayVec;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::common::{fuzzy_compare, fuzzy_is_null, normalize_degrees};
use crate::{CubicBez, Point, Rect};

/// Control point distance, relative to the radius, for a quarter circle.
pub const KAPPA: f64 = 0.5522847498;

/// The most curves [`curves_for_arc`] produces.
///
/// A full turn that does not start on a quadrant boundary touches five
/// quadrants.
pub const MAX_ARC_CURVES: usize = 5;

const MAX_ARC_POINTS: usize = 3 * MAX_ARC_CURVES;

/// The cubic Béziers approximating an arc.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcCurves {
    start: Point,
    points: ArrayVec<Point, MAX_ARC_POINTS>,
}

/// Reasons an arc cannot be converted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcError {
    /// The rectangle or one of the angles is NaN or infinite.
    NonFinite,
}

impl fmt::Display for ArcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcError::NonFinite => write!(f, "arc parameter is not finite"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ArcError {}

impl ArcCurves {
    fn empty(start: Point) -> ArcCurves {
        ArcCurves {
            start,
            points: ArrayVec::new(),
        }
    }

    /// The point the first curve starts from.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Control and end points, three per curve.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The number of curves.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len() / 3
    }

    /// Is the arc empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The point the last curve ends at.
    pub fn end(&self) -> Point {
        self.points.last().copied().unwrap_or(self.start)
    }

    /// Iterate the curves in order.
    pub fn curves(&self) -> impl Iterator<Item = CubicBez> + '_ {
        let mut p0 = self.start;
        self.points.chunks_exact(3).map(move |c| {
            let curve = CubicBez::new(p0, c[0], c[1], c[2]);
            p0 = c[2];
            curve
        })
    }
}

/// Convert an arc of the ellipse inscribed in `rect` into cubic Béziers.
///
/// The sweep is clamped to a full turn in either direction. A null
/// rectangle or an empty sweep yields no curves.
pub fn curves_for_arc(rect: Rect, start_angle: f64, sweep: f64) -> Result<ArcCurves, ArcError> {
    if !rect.is_finite() || !start_angle.is_finite() || !sweep.is_finite() {
        return Err(ArcError::NonFinite);
    }
    if rect.is_null() {
        return Ok(ArcCurves::empty(rect.origin()));
    }

    let pts = ellipse_template(rect);
    let start_angle = normalize_degrees(start_angle);
    let sweep = sweep.clamp(-360.0, 360.0);

    if start_angle == 0.0 {
        if sweep == 360.0 {
            return Ok(ArcCurves {
                start: pts[12],
                points: pts[..12].iter().rev().copied().collect(),
            });
        } else if sweep == -360.0 {
            return Ok(ArcCurves {
                start: pts[0],
                points: pts[1..].iter().copied().collect(),
            });
        }
    }

    let mut start_segment = (start_angle / 90.0).floor() as i32;
    let mut end_segment = ((start_angle + sweep) / 90.0).floor() as i32;
    let mut start_t = (start_angle - f64::from(start_segment) * 90.0) / 90.0;
    let mut end_t = (start_angle + sweep - f64::from(end_segment) * 90.0) / 90.0;

    let delta = if sweep > 0.0 { 1 } else { -1 };
    if delta < 0 {
        start_t = 1.0 - start_t;
        end_t = 1.0 - end_t;
    }
    // Avoid empty first and last segments.
    if fuzzy_is_null(start_t - 1.0) {
        start_t = 0.0;
        start_segment += delta;
    }
    if fuzzy_is_null(end_t) {
        end_t = 1.0;
        end_segment -= delta;
    }

    let start_t = t_for_arc_angle(start_t * 90.0);
    let end_t = t_for_arc_angle(end_t * 90.0);
    let split_at_start = !fuzzy_is_null(start_t);
    let split_at_end = !fuzzy_is_null(end_t - 1.0);
    let end = end_segment + delta;

    if start_segment == end {
        let j = quadrant_index(start_segment);
        let p = if delta > 0 { pts[j + 3] } else { pts[j] };
        return Ok(ArcCurves::empty(p));
    }

    let start = ellipse_point(rect, start_angle);
    let end_point = ellipse_point(rect, start_angle + sweep);
    if start_segment == end_segment && fuzzy_compare(start_t, end_t) {
        return Ok(ArcCurves::empty(start));
    }

    let mut result = ArcCurves::empty(start);
    let mut i = start_segment;
    while i != end {
        let j = quadrant_index(i);
        let mut b = if delta > 0 {
            CubicBez::new(pts[j + 3], pts[j + 2], pts[j + 1], pts[j])
        } else {
            CubicBez::new(pts[j], pts[j + 1], pts[j + 2], pts[j + 3])
        };
        if i == start_segment {
            if i == end_segment && split_at_end {
                b = b.on_interval(start_t, end_t);
            } else if split_at_start {
                b = b.on_interval(start_t, 1.0);
            }
        } else if i == end_segment && split_at_end {
            b = b.on_interval(0.0, end_t);
        }
        result.points.push(b.p1);
        result.points.push(b.p2);
        result.points.push(b.p3);
        i += delta;
    }
    if let Some(last) = result.points.last_mut() {
        *last = end_point;
    }
    Ok(result)
}

/// Index into the template of the quadrant a segment falls in.
fn quadrant_index(segment: i32) -> usize {
    (3 - segment.rem_euclid(4)) as usize * 3
}

/// Four quarter-ellipse Béziers sharing end points, running clockwise
/// in y-up terms from angle zero back to angle zero.
fn ellipse_template(rect: Rect) -> [Point; 13] {
    let x = rect.x0;
    let y = rect.y0;
    let w = rect.width();
    let h = rect.height();
    let w2 = w / 2.0;
    let h2 = h / 2.0;
    let w2k = w2 * KAPPA;
    let h2k = h2 * KAPPA;
    [
        Point::new(x + w, y + h2),
        Point::new(x + w, y + h2 + h2k),
        Point::new(x + w2 + w2k, y + h),
        Point::new(x + w2, y + h),
        Point::new(x + w2 - w2k, y + h),
        Point::new(x, y + h2 + h2k),
        Point::new(x, y + h2),
        Point::new(x, y + h2 - h2k),
        Point::new(x + w2 - w2k, y),
        Point::new(x + w2, y),
        Point::new(x + w2 + w2k, y),
        Point::new(x + w, y + h2 - h2k),
        Point::new(x + w, y + h2),
    ]
}

/// The Bézier parameter on a quarter-circle curve at which the curve is at
/// `angle` degrees from its start.
///
/// The parameter is not proportional to the angle. This runs two Newton
/// steps each against the cosine and the sine of the angle and averages
/// the two.
pub fn t_for_arc_angle(angle: f64) -> f64 {
    if fuzzy_is_null(angle) {
        return 0.0;
    }
    if fuzzy_compare(angle, 90.0) {
        return 1.0;
    }
    let radians = angle.to_radians();
    let cos_angle = radians.cos();
    let sin_angle = radians.sin();

    let mut tc = angle / 90.0;
    for _ in 0..2 {
        let value = (((2.0 - 3.0 * KAPPA) * tc + 3.0 * (KAPPA - 1.0)) * tc) * tc + 1.0 - cos_angle;
        let deriv = ((6.0 - 9.0 * KAPPA) * tc + 6.0 * (KAPPA - 1.0)) * tc;
        tc -= value / deriv;
    }

    let mut ts = tc;
    for _ in 0..2 {
        let value = (((3.0 * KAPPA - 2.0) * ts - 6.0 * KAPPA + 3.0) * ts + 3.0 * KAPPA) * ts
            - sin_angle;
        let deriv = ((9.0 * KAPPA - 6.0) * ts + 12.0 * KAPPA - 6.0) * ts + 3.0 * KAPPA;
        ts -= value / deriv;
    }

    0.5 * (tc + ts)
}

/// The point at `angle` degrees on the Bézier-approximated ellipse
/// inscribed in `rect`.
///
/// This lies exactly on the curves [`curves_for_arc`] produces, which
/// makes it suitable for end points.
pub fn ellipse_point(rect: Rect, angle: f64) -> Point {
    let w2 = rect.width() / 2.0;
    let h2 = rect.height() / 2.0;
    let theta = normalize_degrees(angle);
    let quadrant = ((theta / 90.0) as usize).min(3);
    let mut t = t_for_arc_angle(theta - 90.0 * quadrant as f64);
    if quadrant & 1 == 1 {
        t = 1.0 - t;
    }
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * t * mt * mt;
    let c = 3.0 * t * t * mt;
    let d = t * t * t;
    let mut x = a + b + c * KAPPA;
    let mut y = d + c + b * KAPPA;
    if quadrant == 1 || quadrant == 2 {
        x = -x;
    }
    if quadrant == 0 || quadrant == 1 {
        y = -y;
    }
    let center = rect.center();
    Point::new(center.x + w2 * x, center.y + h2 * y)
}

#[cfg(test)]
mod tests {
    use crate::{curves_for_arc, ellipse_point, t_for_arc_angle, ArcError, ParamCurve, Point, Rect};

    const RECT: Rect = Rect::new(0.0, 0.0, 10.0, 10.0);

    fn near(a: Point, b: Point, tol: f64) -> bool {
        a.distance(b) <= tol
    }

    #[test]
    fn full_circle_is_four_curves_on_the_circle() {
        let arc = curves_for_arc(RECT, 0.0, 360.0).unwrap();
        assert_eq!(arc.points().len(), 12);
        assert_eq!(arc.len(), 4);
        assert_eq!(arc.start(), Point::new(10.0, 5.0));
        let center = Point::new(5.0, 5.0);
        let curves: Vec<_> = arc.curves().collect();
        for i in 0..1000 {
            let s = i as f64 / 1000.0 * 4.0;
            let idx = (s as usize).min(3);
            let p = curves[idx].eval(s - idx as f64);
            let err = (p.distance(center) - 5.0).abs();
            assert!(err < 0.01, "sample {i} off the circle by {err}");
        }
        // Counter-clockwise on screen: the first quadrant heads up.
        assert_eq!(curves[0].p3, Point::new(5.0, 0.0));
    }

    #[test]
    fn negative_full_circle() {
        let arc = curves_for_arc(RECT, 0.0, -360.0).unwrap();
        assert_eq!(arc.len(), 4);
        assert_eq!(arc.curves().next().unwrap().p3, Point::new(5.0, 10.0));
        assert_eq!(arc.end(), Point::new(10.0, 5.0));
    }

    #[test]
    fn quarter_arcs() {
        let arc = curves_for_arc(RECT, 0.0, 90.0).unwrap();
        assert_eq!(arc.len(), 1);
        assert!(near(arc.start(), Point::new(10.0, 5.0), 1e-12));
        assert!(near(arc.end(), Point::new(5.0, 0.0), 1e-12));

        let arc = curves_for_arc(RECT, 0.0, -90.0).unwrap();
        assert_eq!(arc.len(), 1);
        assert!(near(arc.end(), Point::new(5.0, 10.0), 1e-12));
    }

    #[test]
    fn partial_arc_ends_on_ellipse() {
        let arc = curves_for_arc(RECT, 30.0, 100.0).unwrap();
        assert_eq!(arc.len(), 2);
        assert_eq!(arc.start(), ellipse_point(RECT, 30.0));
        assert_eq!(arc.end(), ellipse_point(RECT, 130.0));
        let (s, c) = 130f64.to_radians().sin_cos();
        assert!(near(arc.end(), Point::new(5.0 + 5.0 * c, 5.0 - 5.0 * s), 0.01));
        let mut prev = arc.start();
        for curve in arc.curves() {
            assert_eq!(curve.p0, prev);
            prev = curve.p3;
        }
    }

    #[test]
    fn off_axis_full_turn_uses_five_curves() {
        let arc = curves_for_arc(RECT, 45.0, 360.0).unwrap();
        assert_eq!(arc.len(), 5);
        assert!(near(arc.start(), arc.end(), 1e-9));
    }

    #[test]
    fn sweep_is_clamped() {
        let arc = curves_for_arc(RECT, 0.0, 720.0).unwrap();
        assert_eq!(arc.len(), 4);
    }

    #[test]
    fn empty_sweep() {
        let arc = curves_for_arc(RECT, 30.0, 0.0).unwrap();
        assert!(arc.is_empty());
        assert_eq!(arc.start(), ellipse_point(RECT, 30.0));
    }

    #[test]
    fn degenerate_input() {
        assert_eq!(
            curves_for_arc(Rect::new(0.0, f64::NAN, 1.0, 1.0), 0.0, 90.0),
            Err(ArcError::NonFinite)
        );
        assert_eq!(curves_for_arc(RECT, f64::NAN, 90.0), Err(ArcError::NonFinite));
        assert_eq!(
            curves_for_arc(RECT, 0.0, f64::INFINITY),
            Err(ArcError::NonFinite)
        );
        let arc = curves_for_arc(Rect::new(3.0, 3.0, 3.0, 3.0), 0.0, 90.0).unwrap();
        assert!(arc.is_empty());
    }

    #[test]
    fn t_for_arc_angle_endpoints_and_symmetry() {
        assert_eq!(t_for_arc_angle(0.0), 0.0);
        assert_eq!(t_for_arc_angle(90.0), 1.0);
        assert!((t_for_arc_angle(45.0) - 0.5).abs() < 1e-6);
        let t = t_for_arc_angle(30.0);
        assert!((t + t_for_arc_angle(60.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn ellipse_points_on_axes() {
        assert!(near(ellipse_point(RECT, 0.0), Point::new(10.0, 5.0), 1e-12));
        assert!(near(ellipse_point(RECT, 90.0), Point::new(5.0, 0.0), 1e-12));
        assert!(near(ellipse_point(RECT, 180.0), Point::new(0.0, 5.0), 1e-12));
        assert!(near(ellipse_point(RECT, 270.0), Point::new(5.0, 10.0), 1e-12));
        assert!(near(ellipse_point(RECT, -90.0), Point::new(5.0, 10.0), 1e-12));
    }
}
