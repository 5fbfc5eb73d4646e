// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bézier paths (up to cubic).

use alloc::vec::Vec;
use core::iter::{Copied, FromIterator};
use core::ops::Mul;
use core::slice;

use crate::{Affine, PathSink, Point};

/// A path made of lines and cubic Béziers, possibly with multiple subpaths.
///
/// Quadratic segments are raised to cubics as they are added.
#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BezPath(Vec<PathEl>);

/// The element of a Bézier path.
///
/// A valid path has `MoveTo` at the beginning of each subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathEl {
    /// Move directly to the point without drawing anything, starting a new
    /// subpath.
    MoveTo(Point),
    /// Draw a line from the current location to the point.
    LineTo(Point),
    /// Draw a cubic Bézier using the current location and the three points.
    CurveTo(Point, Point, Point),
    /// Close off the path.
    ClosePath,
}

impl BezPath {
    /// Create a new path.
    pub fn new() -> BezPath {
        BezPath::default()
    }

    /// Create a path from a vector of path elements.
    pub fn from_vec(v: Vec<PathEl>) -> BezPath {
        BezPath(v)
    }

    /// Push a generic path element onto the path.
    pub fn push(&mut self, el: PathEl) {
        self.0.push(el);
    }

    /// Push a "move to" element onto the path.
    pub fn move_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::MoveTo(p.into()));
    }

    /// Push a "line to" element onto the path.
    pub fn line_to<P: Into<Point>>(&mut self, p: P) {
        self.push(PathEl::LineTo(p.into()));
    }

    /// Push a quadratic Bézier onto the path, as the equivalent cubic.
    ///
    /// Without a current point the quadratic starts at the origin.
    pub fn quad_to<P: Into<Point>>(&mut self, p1: P, p2: P) {
        let p0 = self.current_point().unwrap_or(Point::ORIGIN);
        let p1 = p1.into();
        let p2 = p2.into();
        self.push(PathEl::CurveTo(
            p0 + (2.0 / 3.0) * (p1 - p0),
            p2 + (2.0 / 3.0) * (p1 - p2),
            p2,
        ));
    }

    /// Push a "curve to" element onto the path.
    pub fn curve_to<P: Into<Point>>(&mut self, p1: P, p2: P, p3: P) {
        self.push(PathEl::CurveTo(p1.into(), p2.into(), p3.into()));
    }

    /// Push a "close path" element onto the path.
    pub fn close_path(&mut self) {
        self.push(PathEl::ClosePath);
    }

    /// Get the path elements.
    pub fn elements(&self) -> &[PathEl] {
        &self.0
    }

    /// Iterate over the path elements.
    pub fn iter(&self) -> Copied<slice::Iter<'_, PathEl>> {
        self.0.iter().copied()
    }

    /// Is this path empty?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The point the next element would start from.
    pub fn current_point(&self) -> Option<Point> {
        let mut start = None;
        let mut current = None;
        for el in &self.0 {
            match *el {
                PathEl::MoveTo(p) => {
                    start = Some(p);
                    current = Some(p);
                }
                PathEl::LineTo(p) | PathEl::CurveTo(_, _, p) => current = Some(p),
                PathEl::ClosePath => current = start,
            }
        }
        current
    }

    /// Apply an affine transform to the path.
    pub fn apply_affine(&mut self, affine: Affine) {
        for el in &mut self.0 {
            *el = affine * *el;
        }
    }
}

impl FromIterator<PathEl> for BezPath {
    fn from_iter<T: IntoIterator<Item = PathEl>>(iter: T) -> Self {
        BezPath(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BezPath {
    type Item = PathEl;
    type IntoIter = Copied<slice::Iter<'a, PathEl>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for BezPath {
    type Item = PathEl;
    type IntoIter = alloc::vec::IntoIter<PathEl>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl PathSink for BezPath {
    fn move_to(&mut self, p: Point) {
        self.push(PathEl::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.push(PathEl::LineTo(p));
    }

    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        self.push(PathEl::CurveTo(p1, p2, p3));
    }
}

impl Mul<PathEl> for Affine {
    type Output = PathEl;

    fn mul(self, other: PathEl) -> PathEl {
        match other {
            PathEl::MoveTo(p) => PathEl::MoveTo(self * p),
            PathEl::LineTo(p) => PathEl::LineTo(self * p),
            PathEl::CurveTo(p1, p2, p3) => PathEl::CurveTo(self * p1, self * p2, self * p3),
            PathEl::ClosePath => PathEl::ClosePath,
        }
    }
}

impl Mul<BezPath> for Affine {
    type Output = BezPath;

    fn mul(self, mut other: BezPath) -> BezPath {
        other.apply_affine(self);
        other
    }
}

impl Mul<&BezPath> for Affine {
    type Output = BezPath;

    fn mul(self, other: &BezPath) -> BezPath {
        other.iter().map(|el| self * el).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{Affine, BezPath, PathEl, PathSink, Point};

    #[test]
    fn quad_is_raised() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.quad_to((3.0, 3.0), (6.0, 0.0));
        assert_eq!(
            path.elements()[1],
            PathEl::CurveTo(Point::new(2.0, 2.0), Point::new(4.0, 2.0), Point::new(6.0, 0.0))
        );
    }

    #[test]
    fn current_point_follows_close() {
        let mut path = BezPath::new();
        assert_eq!(path.current_point(), None);
        path.move_to((1.0, 1.0));
        path.line_to((2.0, 1.0));
        assert_eq!(path.current_point(), Some(Point::new(2.0, 1.0)));
        path.close_path();
        assert_eq!(path.current_point(), Some(Point::new(1.0, 1.0)));
    }

    #[test]
    fn sink_appends() {
        let mut path = BezPath::new();
        PathSink::move_to(&mut path, Point::new(0.0, 0.0));
        PathSink::line_to(&mut path, Point::new(1.0, 0.0));
        PathSink::curve_to(
            &mut path,
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(2.0, 0.0),
        );
        assert_eq!(path.elements().len(), 3);
        assert!(matches!(path.elements()[2], PathEl::CurveTo(..)));
    }

    #[test]
    fn transform_path() {
        let mut path = BezPath::new();
        path.move_to((1.0, 2.0));
        path.line_to((3.0, 4.0));
        path.close_path();
        let scaled = Affine::scale(2.0) * &path;
        assert_eq!(
            scaled.elements(),
            [
                PathEl::MoveTo(Point::new(2.0, 4.0)),
                PathEl::LineTo(Point::new(6.0, 8.0)),
                PathEl::ClosePath,
            ]
        );
        assert_eq!(Affine::scale(2.0) * path, scaled);
    }
}
