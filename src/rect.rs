// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A rectangle.

use crate::{Point, Vec2};

/// A rectangle.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// The minimum x coordinate (left edge).
    pub x0: f64,
    /// The minimum y coordinate (top edge in y-down spaces).
    pub y0: f64,
    /// The maximum x coordinate (right edge).
    pub x1: f64,
    /// The maximum y coordinate (bottom edge in y-down spaces).
    pub y1: f64,
}

impl Rect {
    /// A new rectangle from minimum and maximum coordinates.
    #[inline]
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect { x0, y0, x1, y1 }
    }

    /// A new rectangle from two points.
    ///
    /// The result will have non-negative width and height.
    #[inline]
    pub fn from_points(p0: impl Into<Point>, p1: impl Into<Point>) -> Rect {
        let p0 = p0.into();
        let p1 = p1.into();
        Rect {
            x0: p0.x.min(p1.x),
            y0: p0.y.min(p1.y),
            x1: p0.x.max(p1.x),
            y1: p0.y.max(p1.y),
        }
    }

    /// A new rectangle from origin and size.
    ///
    /// Unlike [`Rect::from_points`], the size is kept as given, so a
    /// negative width yields a rectangle that runs right to left.
    #[inline]
    pub fn from_origin_size(origin: impl Into<Point>, width: f64, height: f64) -> Rect {
        let origin = origin.into();
        Rect::new(origin.x, origin.y, origin.x + width, origin.y + height)
    }

    /// A square of side `2 * radius` centered on `center`.
    #[inline]
    pub fn from_center_radius(center: Point, radius: f64) -> Rect {
        Rect::from_origin_size(
            center - Vec2::new(radius, radius),
            2.0 * radius,
            2.0 * radius,
        )
    }

    /// The width of the rectangle.
    ///
    /// Note: nothing forbids negative width.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// The height of the rectangle.
    ///
    /// Note: nothing forbids negative height.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// The origin of the rectangle.
    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    /// The center point of the rectangle.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(0.5 * (self.x0 + self.x1), 0.5 * (self.y0 + self.y1))
    }

    /// Is the width or height zero or negative?
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Are both width and height exactly zero?
    #[inline]
    pub fn is_null(&self) -> bool {
        self.width() == 0.0 && self.height() == 0.0
    }

    /// Is any coordinate NaN?
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.x0.is_nan() || self.y0.is_nan() || self.x1.is_nan() || self.y1.is_nan()
    }

    /// Are all coordinates finite?
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Expand the rectangle by `pad` on every side.
    #[inline]
    pub fn inflate(&self, pad: f64) -> Rect {
        Rect::new(self.x0 - pad, self.y0 - pad, self.x1 + pad, self.y1 + pad)
    }

    /// The smallest rectangle enclosing `self` and `p`.
    #[inline]
    pub fn union_pt(&self, p: Point) -> Rect {
        Rect::new(
            self.x0.min(p.x),
            self.y0.min(p.y),
            self.x1.max(p.x),
            self.y1.max(p.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_around_center() {
        let r = Rect::from_center_radius(Point::new(5.0, 5.0), 5.0);
        assert_eq!(r, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(r.center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn emptiness() {
        assert!(Rect::default().is_empty());
        assert!(Rect::default().is_null());
        assert!(Rect::new(0.0, 0.0, 10.0, 0.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 10.0, 0.0).is_null());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
        assert!(Rect::new(0.0, f64::NAN, 1.0, 1.0).is_nan());
    }

    #[test]
    fn union_and_inflate() {
        let r = Rect::from_points((1.0, 1.0), (1.0, 1.0)).union_pt(Point::new(-1.0, 3.0));
        assert_eq!(r, Rect::new(-1.0, 1.0, 1.0, 3.0));
        assert_eq!(r.inflate(1.0), Rect::new(-2.0, 0.0, 2.0, 4.0));
    }
}
