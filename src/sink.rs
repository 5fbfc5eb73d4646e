// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Receivers of path construction calls.

use log::warn;

use crate::{curves_for_arc, Affine, PathEl, Point, Rect};

/// Something that accepts a path as a sequence of construction calls.
///
/// Both the output of the stroker and the input of the stroker and dasher
/// use this interface, so they can be chained. Calls between
/// [`begin`](PathSink::begin) and [`end`](PathSink::end) make up one path.
pub trait PathSink {
    /// Start a new path.
    fn begin(&mut self) {}

    /// Start a new subpath at `p`.
    fn move_to(&mut self, p: Point);

    /// Add a line from the current point to `p`.
    fn line_to(&mut self, p: Point);

    /// Add a cubic Bézier from the current point.
    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point);

    /// Finish the path.
    fn end(&mut self) {}
}

impl<S: PathSink + ?Sized> PathSink for &mut S {
    #[inline]
    fn begin(&mut self) {
        (**self).begin();
    }

    #[inline]
    fn move_to(&mut self, p: Point) {
        (**self).move_to(p);
    }

    #[inline]
    fn line_to(&mut self, p: Point) {
        (**self).line_to(p);
    }

    #[inline]
    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        (**self).curve_to(p1, p2, p3);
    }

    #[inline]
    fn end(&mut self) {
        (**self).end();
    }
}

/// Curve tolerance to use under `transform`, given the tolerance wanted in
/// device space.
///
/// A transform that collapses everything keeps the base tolerance.
pub fn threshold_for_transform(base: f64, transform: &Affine) -> f64 {
    let scale = transform.max_scale();
    if scale == 0.0 || !scale.is_finite() {
        base
    } else {
        base / scale
    }
}

/// Convenience entry points shared by the stroker and the dasher.
///
/// Each one replays its input through [`PathSink`] calls, bracketed by
/// `begin` and `end`.
pub trait StrokeOps: PathSink {
    /// Adapt the curve tolerances to the scale of the transform the output
    /// will be drawn with.
    fn set_curve_threshold_from_transform(&mut self, transform: &Affine);

    /// Process a whole path, mapping every point through `transform`.
    ///
    /// [`PathEl::ClosePath`] adds a line back to the subpath start when the
    /// current point is elsewhere.
    fn stroke_path(&mut self, path: impl IntoIterator<Item = PathEl>, transform: Affine) {
        self.begin();
        let mut start = Point::ORIGIN;
        let mut current = Point::ORIGIN;
        for el in path {
            match el {
                PathEl::MoveTo(p) => {
                    let p = transform * p;
                    self.move_to(p);
                    start = p;
                    current = p;
                }
                PathEl::LineTo(p) => {
                    let p = transform * p;
                    self.line_to(p);
                    current = p;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    let p3 = transform * p3;
                    self.curve_to(transform * p1, transform * p2, p3);
                    current = p3;
                }
                PathEl::ClosePath => {
                    if current != start {
                        self.line_to(start);
                        current = start;
                    }
                }
            }
        }
        self.end();
    }

    /// Process a polyline, closing it back to its first point when
    /// `implicit_close` is set.
    fn stroke_polygon(&mut self, points: &[Point], implicit_close: bool, transform: Affine) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        self.begin();
        let start = transform * first;
        self.move_to(start);
        for &p in rest {
            self.line_to(transform * p);
        }
        if implicit_close {
            self.line_to(start);
        }
        self.end();
    }

    /// Process the ellipse inscribed in `rect`.
    fn stroke_ellipse(&mut self, rect: Rect, transform: Affine) {
        let arc = match curves_for_arc(rect, 0.0, -360.0) {
            Ok(arc) => arc,
            Err(e) => {
                warn!("skipping ellipse {rect:?}: {e}");
                return;
            }
        };
        self.begin();
        self.move_to(transform * arc.start());
        for c in arc.curves() {
            self.curve_to(transform * c.p1, transform * c.p2, transform * c.p3);
        }
        self.end();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use alloc::vec::Vec;

    use super::{threshold_for_transform, PathSink, StrokeOps};
    use crate::{Affine, BezPath, PathEl, Point, Rect};

    /// One observed call on a [`Recorder`].
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub(crate) enum Call {
        Begin,
        Move(Point),
        Line(Point),
        Curve(Point, Point, Point),
        End,
    }

    /// A sink that remembers every call it receives.
    #[derive(Debug, Default)]
    pub(crate) struct Recorder {
        pub(crate) calls: Vec<Call>,
        pub(crate) threshold: Option<f64>,
    }

    impl Recorder {
        /// The drawing calls, without the `begin`/`end` brackets.
        pub(crate) fn drawing(&self) -> Vec<Call> {
            self.calls
                .iter()
                .copied()
                .filter(|c| !matches!(c, Call::Begin | Call::End))
                .collect()
        }
    }

    impl PathSink for Recorder {
        fn begin(&mut self) {
            self.calls.push(Call::Begin);
        }

        fn move_to(&mut self, p: Point) {
            self.calls.push(Call::Move(p));
        }

        fn line_to(&mut self, p: Point) {
            self.calls.push(Call::Line(p));
        }

        fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
            self.calls.push(Call::Curve(p1, p2, p3));
        }

        fn end(&mut self) {
            self.calls.push(Call::End);
        }
    }

    impl StrokeOps for Recorder {
        fn set_curve_threshold_from_transform(&mut self, transform: &Affine) {
            self.threshold = Some(threshold_for_transform(0.25, transform));
        }
    }

    #[test]
    fn threshold_scales_inversely() {
        assert_eq!(threshold_for_transform(0.25, &Affine::IDENTITY), 0.25);
        assert_eq!(threshold_for_transform(0.25, &Affine::scale(2.0)), 0.125);
        assert_eq!(
            threshold_for_transform(0.25, &Affine::scale_non_uniform(1.0, 4.0)),
            0.0625
        );
        assert_eq!(threshold_for_transform(0.25, &Affine::scale(0.0)), 0.25);

        let mut rec = Recorder::default();
        rec.set_curve_threshold_from_transform(&Affine::scale(0.5));
        assert_eq!(rec.threshold, Some(0.5));
    }

    #[test]
    fn path_replay_closes_and_transforms() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((1.0, 0.0));
        path.curve_to((1.0, 1.0), (0.0, 1.0), (0.0, 2.0));
        path.close_path();
        path.move_to((5.0, 5.0));
        path.line_to((6.0, 5.0));
        path.line_to((5.0, 5.0));
        path.close_path();

        let mut rec = Recorder::default();
        rec.stroke_path(&path, Affine::translate((10.0, 0.0)));
        let p = |x, y| Point::new(x, y);
        assert_eq!(
            rec.calls,
            [
                Call::Begin,
                Call::Move(p(10.0, 0.0)),
                Call::Line(p(11.0, 0.0)),
                Call::Curve(p(11.0, 1.0), p(10.0, 1.0), p(10.0, 2.0)),
                Call::Line(p(10.0, 0.0)),
                Call::Move(p(15.0, 5.0)),
                Call::Line(p(16.0, 5.0)),
                Call::Line(p(15.0, 5.0)),
                Call::End,
            ]
        );
    }

    #[test]
    fn polygon_replay() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ];
        let mut rec = Recorder::default();
        rec.stroke_polygon(&pts, true, Affine::scale(2.0));
        assert_eq!(
            rec.drawing(),
            [
                Call::Move(Point::new(0.0, 0.0)),
                Call::Line(Point::new(2.0, 0.0)),
                Call::Line(Point::new(2.0, 2.0)),
                Call::Line(Point::new(0.0, 0.0)),
            ]
        );

        let mut rec = Recorder::default();
        rec.stroke_polygon(&[], true, Affine::IDENTITY);
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn ellipse_replay() {
        let mut rec = Recorder::default();
        rec.stroke_ellipse(Rect::new(0.0, 0.0, 10.0, 10.0), Affine::IDENTITY);
        let drawing = rec.drawing();
        assert_eq!(drawing.len(), 5);
        let Call::Move(start) = drawing[0] else {
            panic!("ellipse should start with a move, got {:?}", drawing[0]);
        };
        assert!(start.distance(Point::new(10.0, 5.0)) < 1e-9);
        let Call::Curve(_, _, end) = drawing[4] else {
            panic!("ellipse should end with a curve, got {:?}", drawing[4]);
        };
        assert!(end.distance(start) < 1e-9);

        let mut rec = Recorder::default();
        rec.stroke_ellipse(Rect::new(0.0, 0.0, f64::NAN, 10.0), Affine::IDENTITY);
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn path_el_iteration_from_vec() {
        let els = [PathEl::MoveTo(Point::ORIGIN), PathEl::LineTo(Point::new(3.0, 4.0))];
        let mut rec = Recorder::default();
        rec.stroke_path(els, Affine::IDENTITY);
        assert_eq!(rec.calls.len(), 4);
    }
}
