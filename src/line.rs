// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lines.

use core::ops::Range;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::common::{fuzzy_compare, fuzzy_is_null, normalize_degrees};
use crate::{ParamCurve, ParamCurveArclen, Point, Vec2};

/// A single line.
///
/// Besides being a curve segment, a line doubles as a directed vector
/// anchored at `p0`; offset edges and tangents in the stroker are lines.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// The line's start point.
    pub p0: Point,
    /// The line's end point.
    pub p1: Point,
}

/// How two lines meet, as computed by [`Line::intersect`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineIntersection {
    /// The lines are parallel, or the computation was not finite.
    None,
    /// The lines cross within both segments.
    Bounded(Point),
    /// The infinite extensions of the lines cross outside at least one
    /// of the segments.
    Unbounded(Point),
}

impl LineIntersection {
    /// The intersection point, if there is one.
    #[inline]
    pub fn point(self) -> Option<Point> {
        match self {
            LineIntersection::None => None,
            LineIntersection::Bounded(p) | LineIntersection::Unbounded(p) => Some(p),
        }
    }
}

impl Line {
    /// Create a new line.
    #[inline]
    pub fn new(p0: impl Into<Point>, p1: impl Into<Point>) -> Line {
        Line {
            p0: p0.into(),
            p1: p1.into(),
        }
    }

    /// Returns a copy of this `Line` with the end points swapped.
    #[inline]
    #[must_use]
    pub fn reversed(&self) -> Line {
        Line {
            p0: self.p1,
            p1: self.p0,
        }
    }

    /// The vector from `p0` to `p1`.
    #[inline]
    pub fn vector(&self) -> Vec2 {
        self.p1 - self.p0
    }

    /// The length of the line.
    #[inline]
    pub fn length(&self) -> f64 {
        self.vector().hypot()
    }

    /// Do the end points coincide, up to floating point noise?
    #[inline]
    pub fn is_null(&self) -> bool {
        fuzzy_compare(self.p0.x, self.p1.x) && fuzzy_compare(self.p0.y, self.p1.y)
    }

    /// A line of the same length, starting at `p0`, perpendicular to this one.
    ///
    /// The direction is `(dy, -dx)`.
    #[inline]
    pub fn normal(&self) -> Line {
        Line {
            p0: self.p0,
            p1: self.p0 + self.vector().turn_neg_90(),
        }
    }

    /// Keep `p0` and the direction, moving `p1` so the line has length `len`.
    ///
    /// A zero-length line is returned unchanged.
    #[inline]
    #[must_use]
    pub fn with_length(&self, len: f64) -> Line {
        let old = self.length();
        if old > 0.0 {
            Line {
                p0: self.p0,
                p1: self.p0 + self.vector() * (len / old),
            }
        } else {
            *self
        }
    }

    /// The line moved by `offset`.
    #[inline]
    #[must_use]
    pub fn translate(&self, offset: Vec2) -> Line {
        Line {
            p0: self.p0 + offset,
            p1: self.p1 + offset,
        }
    }

    /// The direction of the line in degrees, counter-clockwise from the
    /// positive x axis with y pointing down.
    ///
    /// The result is in `[0, 360)`.
    pub fn angle(&self) -> f64 {
        let v = self.vector();
        normalize_degrees((-v.y).atan2(v.x).to_degrees())
    }

    /// The counter-clockwise angle in degrees from this line to `other`.
    ///
    /// The result is in `[0, 360)`, and zero when either line has no
    /// direction.
    pub fn angle_to(&self, other: &Line) -> f64 {
        if self.is_null() || other.is_null() {
            return 0.0;
        }
        normalize_degrees(other.angle() - self.angle())
    }

    /// Intersect the lines, treating both as infinite.
    ///
    /// The classification tells whether the point lies within both segments.
    /// Lines that are parallel to within rounding noise, or that have no
    /// direction, do not intersect.
    pub fn intersect(&self, other: &Line) -> LineIntersection {
        let a = self.vector();
        let b = other.p0 - other.p1;
        let c = self.p0 - other.p0;
        let denom = a.y * b.x - a.x * b.y;
        let scale = a.hypot() * b.hypot();
        if !denom.is_finite() || scale == 0.0 || fuzzy_is_null(denom / scale) {
            return LineIntersection::None;
        }
        let recip = 1.0 / denom;
        let na = (b.y * c.x - b.x * c.y) * recip;
        let p = self.p0 + a * na;
        if !(0.0..=1.0).contains(&na) {
            return LineIntersection::Unbounded(p);
        }
        let nb = (a.x * c.y - a.y * c.x) * recip;
        if !(0.0..=1.0).contains(&nb) {
            return LineIntersection::Unbounded(p);
        }
        LineIntersection::Bounded(p)
    }
}

impl ParamCurve for Line {
    #[inline]
    fn eval(&self, t: f64) -> Point {
        self.p0.lerp(self.p1, t)
    }

    #[inline]
    fn subsegment(&self, range: Range<f64>) -> Line {
        Line {
            p0: self.eval(range.start),
            p1: self.eval(range.end),
        }
    }

    #[inline]
    fn start(&self) -> Point {
        self.p0
    }

    #[inline]
    fn end(&self) -> Point {
        self.p1
    }
}

impl ParamCurveArclen for Line {
    #[inline]
    fn arclen(&self, _accuracy: f64) -> f64 {
        self.length()
    }

    #[inline]
    fn inv_arclen(&self, arclen: f64, _accuracy: f64) -> f64 {
        let len = self.length();
        if len == 0.0 {
            return 1.0;
        }
        (arclen / len).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Line, LineIntersection, ParamCurveArclen, Point, Vec2};

    #[test]
    fn angles_are_y_up() {
        assert_eq!(Line::new((0.0, 0.0), (1.0, 0.0)).angle(), 0.0);
        assert!((Line::new((0.0, 0.0), (0.0, -1.0)).angle() - 90.0).abs() < 1e-12);
        assert!((Line::new((0.0, 0.0), (-1.0, 0.0)).angle() - 180.0).abs() < 1e-12);
        assert!((Line::new((0.0, 0.0), (0.0, 1.0)).angle() - 270.0).abs() < 1e-12);
    }

    #[test]
    fn angle_to() {
        let east = Line::new((0.0, 0.0), (1.0, 0.0));
        let south = Line::new((0.0, 0.0), (0.0, 1.0));
        assert!((east.angle_to(&south) - 270.0).abs() < 1e-12);
        assert!((south.angle_to(&east) - 90.0).abs() < 1e-12);
        assert_eq!(east.angle_to(&east), 0.0);
        let null = Line::new((3.0, 3.0), (3.0, 3.0));
        assert_eq!(east.angle_to(&null), 0.0);
    }

    #[test]
    fn normal_and_length() {
        let l = Line::new((1.0, 1.0), (4.0, 1.0));
        let n = l.normal().with_length(2.0);
        assert_eq!(n.p0, Point::new(1.0, 1.0));
        assert_eq!(n.p1, Point::new(1.0, -1.0));
        let moved = l.translate(n.vector());
        assert_eq!(moved, Line::new((1.0, -1.0), (4.0, -1.0)));
        let null = Line::new((1.0, 1.0), (1.0, 1.0));
        assert_eq!(null.with_length(5.0), null);
    }

    #[test]
    fn intersections() {
        let h = Line::new((0.0, 0.0), (10.0, 0.0));
        let v = Line::new((5.0, -5.0), (5.0, 5.0));
        assert_eq!(h.intersect(&v), LineIntersection::Bounded(Point::new(5.0, 0.0)));

        let short = Line::new((5.0, 1.0), (5.0, 5.0));
        assert_eq!(
            h.intersect(&short),
            LineIntersection::Unbounded(Point::new(5.0, 0.0))
        );

        let parallel = h.translate(Vec2::new(0.0, 3.0));
        assert_eq!(h.intersect(&parallel), LineIntersection::None);
        assert_eq!(h.intersect(&parallel).point(), None);

        // Off parallel by rounding noise only.
        let nearly = Line::new((0.0, 3.0), (10.0, 3.0 + 1e-12));
        assert_eq!(h.intersect(&nearly), LineIntersection::None);
        let long = Line::new((0.0, 3.0), (1e6, 3.0 + 1e-7));
        assert_eq!(h.intersect(&long), LineIntersection::None);

        // A shallow but real angle still meets.
        let shallow = Line::new((0.0, 1.0), (10.0, 1.0 + 1e-6));
        assert!(matches!(h.intersect(&shallow), LineIntersection::Unbounded(_)));

        let null = Line::new((2.0, 2.0), (2.0, 2.0));
        assert_eq!(h.intersect(&null), LineIntersection::None);
    }

    #[test]
    fn line_arclen() {
        let l = Line::new((0.0, 0.0), (3.0, 4.0));
        assert_eq!(l.arclen(0.01), 5.0);
        assert_eq!(l.inv_arclen(2.5, 0.01), 0.5);
        assert_eq!(l.inv_arclen(10.0, 0.01), 1.0);
    }
}
