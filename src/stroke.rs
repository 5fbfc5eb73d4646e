// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expanding strokes into fillable outlines.
//!
//! Each subpath is buffered, then walked twice. The forward walk emits the
//! outline on one side of the path and the backward walk emits the other
//! side, so an open subpath becomes a single loop and a closed subpath
//! becomes two.

use core::borrow::Borrow;
use core::mem;

use alloc::vec::Vec;

use log::warn;
use smallvec::SmallVec;

use crate::arc::KAPPA;
use crate::common::{fuzzy_compare, normalize_degrees};
use crate::sink::threshold_for_transform;
use crate::subpath::{Element, ElementBuffer, ElementKind, SubpathIter};
use crate::{
    curves_for_arc, Affine, BezPath, CubicBez, DashStroker, DashStyle, Line, LineIntersection,
    PathEl, PathSink, Point, Rect, StrokeOps, Vec2,
};

/// The most cubics one input curve is offset into.
const MAX_OFFSET_CURVES: usize = 16;

/// Defines the connection between two segments of a stroke.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Join {
    /// A straight line connecting the segments.
    Bevel,
    /// The segments are extended to their natural intersection point.
    ///
    /// Spikes reaching further than the miter limit times the stroke width
    /// from the segment ends are cut off square to each segment.
    Miter,
    /// Like [`Join::Miter`], but the limit is measured from the corner of
    /// the path, and a spike past the limit falls back to a bevel.
    SvgMiter,
    /// An arc between the segments.
    Round,
}

/// Defines the shape to be drawn at the ends of a stroke.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cap {
    /// Flat cap.
    Flat,
    /// Square cap with dimensions equal to half the stroke width.
    Square,
    /// Rounded cap with radius equal to half the stroke width.
    Round,
}

/// Describes the visual style of a stroke.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stroke {
    /// Width of the stroke.
    pub width: f64,
    /// Style for connecting segments of the stroke.
    pub join: Join,
    /// Style for the ends of open subpaths.
    pub cap: Cap,
    /// Limit for miter joins, in multiples of the width.
    pub miter_limit: f64,
    /// Lengths of dashes in alternating on/off order, in multiples of the
    /// width.
    pub dash_pattern: Dashes,
    /// Offset of the first dash, in multiples of the width.
    pub dash_offset: f64,
}

/// Options for path stroking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeOpts {
    /// Relative error accepted when offsetting curves.
    pub curve_threshold: f64,
    /// Tolerance for flattening curves before dashing.
    pub dash_threshold: f64,
    /// Dashes whose outline cannot reach this rectangle are dropped.
    pub clip_rect: Option<Rect>,
}

impl Default for StrokeOpts {
    fn default() -> Self {
        StrokeOpts {
            curve_threshold: 0.25,
            dash_threshold: 0.25,
            clip_rect: None,
        }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 1.0,
            join: Join::Bevel,
            cap: Cap::Square,
            miter_limit: 2.0,
            dash_pattern: Default::default(),
            dash_offset: 0.0,
        }
    }
}

impl Stroke {
    /// Creates a new stroke with the specified width.
    pub fn new(width: f64) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    /// Builder method for setting the join style.
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Builder method for setting the cap style.
    pub fn with_cap(mut self, cap: Cap) -> Self {
        self.cap = cap;
        self
    }

    /// Builder method for setting the limit for miter joins.
    pub fn with_miter_limit(mut self, limit: f64) -> Self {
        self.miter_limit = limit;
        self
    }

    /// Builder method for setting the dashing parameters.
    pub fn with_dashes<P>(mut self, offset: f64, pattern: P) -> Self
    where
        P: IntoIterator,
        P::Item: Borrow<f64>,
    {
        self.dash_offset = offset;
        self.dash_pattern.clear();
        self.dash_pattern
            .extend(pattern.into_iter().map(|dash| *dash.borrow()));
        self
    }

    /// Builder method for using one of the preset dash patterns.
    pub fn with_dash_style(self, style: DashStyle) -> Self {
        self.with_dashes(0.0, style.pattern())
    }
}

impl StrokeOpts {
    /// Set the relative error accepted when offsetting curves.
    pub fn curve_threshold(mut self, threshold: f64) -> Self {
        self.curve_threshold = threshold;
        self
    }

    /// Set the tolerance for flattening curves before dashing.
    pub fn dash_threshold(mut self, threshold: f64) -> Self {
        self.dash_threshold = threshold;
        self
    }

    /// Only emit dashes that can contribute to `rect`.
    pub fn clip_rect(mut self, rect: Rect) -> Self {
        self.clip_rect = Some(rect);
        self
    }
}

/// Collection of values representing lengths in a dash pattern.
pub type Dashes = SmallVec<[f64; 4]>;

/// Geometry placed where two offset segments meet.
///
/// Caps are joins between the end of one side and the start of the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum JoinMode {
    Flat,
    Square,
    Miter,
    SvgMiter,
    Round,
    RoundCap,
}

impl From<Join> for JoinMode {
    fn from(join: Join) -> Self {
        match join {
            Join::Bevel => JoinMode::Flat,
            Join::Miter => JoinMode::Miter,
            Join::SvgMiter => JoinMode::SvgMiter,
            Join::Round => JoinMode::Round,
        }
    }
}

impl From<Cap> for JoinMode {
    fn from(cap: Cap) -> Self {
        match cap {
            Cap::Flat => JoinMode::Flat,
            Cap::Square => JoinMode::Square,
            Cap::Round => JoinMode::RoundCap,
        }
    }
}

/// Turns path construction calls into the outline of their stroke.
///
/// The outline is sent to the wrapped sink one subpath at a time, when the
/// next subpath starts or the path ends.
#[derive(Debug)]
pub struct Stroker<S> {
    elements: ElementBuffer,
    emitter: Emitter<S>,
}

/// Output half of the stroker, kept apart from the element buffer so a side
/// can be emitted while the buffer is borrowed.
#[derive(Debug)]
struct Emitter<S> {
    sink: S,
    width: f64,
    miter_limit: f64,
    join: JoinMode,
    cap: JoinMode,
    curve_threshold: f64,
    base_curve_threshold: f64,
    // The last two points emitted.
    back1: Point,
    back2: Point,
    offsets: Vec<CubicBez>,
}

#[derive(Clone, Copy, Debug)]
struct SideResult {
    closed: bool,
    start_tangent: Option<Line>,
}

impl<S: PathSink> Stroker<S> {
    /// Create a stroker sending its outline to `sink`.
    ///
    /// The dash settings of `style` are ignored; wrap the stroker in a
    /// [`DashStroker`] to dash.
    pub fn new(sink: S, style: &Stroke, opts: &StrokeOpts) -> Self {
        Stroker {
            elements: ElementBuffer::new(),
            emitter: Emitter {
                sink,
                width: style.width,
                miter_limit: style.miter_limit,
                join: style.join.into(),
                cap: style.cap.into(),
                curve_threshold: opts.curve_threshold,
                base_curve_threshold: opts.curve_threshold,
                back1: Point::ORIGIN,
                back2: Point::ORIGIN,
                offsets: Vec::new(),
            },
        }
    }

    /// The stroke width.
    pub fn width(&self) -> f64 {
        self.emitter.width
    }

    /// Set the stroke width.
    pub fn set_width(&mut self, width: f64) {
        self.emitter.width = width;
    }

    /// The miter limit, in multiples of the width.
    pub fn miter_limit(&self) -> f64 {
        self.emitter.miter_limit
    }

    /// Set the miter limit.
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.emitter.miter_limit = limit;
    }

    /// Set the join style.
    pub fn set_join(&mut self, join: Join) {
        self.emitter.join = join.into();
    }

    /// Set the cap style.
    pub fn set_cap(&mut self, cap: Cap) {
        self.emitter.cap = cap.into();
    }

    /// The relative error currently accepted when offsetting curves.
    pub fn curve_threshold(&self) -> f64 {
        self.emitter.curve_threshold
    }

    /// Set the relative error accepted when offsetting curves.
    ///
    /// This also becomes the base that
    /// [`set_curve_threshold_from_transform`](StrokeOps::set_curve_threshold_from_transform)
    /// scales.
    pub fn set_curve_threshold(&mut self, threshold: f64) {
        self.emitter.curve_threshold = threshold;
        self.emitter.base_curve_threshold = threshold;
    }

    /// The wrapped sink.
    pub fn sink(&self) -> &S {
        &self.emitter.sink
    }

    /// The wrapped sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.emitter.sink
    }

    /// Unwrap the sink.
    pub fn into_inner(self) -> S {
        self.emitter.sink
    }

    fn finish_subpath(&mut self) {
        if self.elements.len() > 1 {
            self.emitter.process_subpath(&self.elements);
        }
        self.elements.begin();
    }
}

impl<S: PathSink> PathSink for Stroker<S> {
    fn begin(&mut self) {
        self.elements.begin();
        self.emitter.sink.begin();
    }

    fn move_to(&mut self, p: Point) {
        self.finish_subpath();
        self.elements.push(Element::new(ElementKind::MoveTo, p));
    }

    fn line_to(&mut self, p: Point) {
        if self.elements.is_empty() {
            return;
        }
        self.elements.push(Element::new(ElementKind::LineTo, p));
    }

    fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        if self.elements.is_empty() {
            return;
        }
        self.elements.push(Element::new(ElementKind::CurveToData, p1));
        self.elements.push(Element::new(ElementKind::CurveToData, p2));
        self.elements.push(Element::new(ElementKind::CurveTo, p3));
    }

    fn end(&mut self) {
        self.finish_subpath();
        self.emitter.sink.end();
    }
}

impl<S: PathSink> StrokeOps for Stroker<S> {
    fn set_curve_threshold_from_transform(&mut self, transform: &Affine) {
        self.emitter.curve_threshold =
            threshold_for_transform(self.emitter.base_curve_threshold, transform);
    }
}

impl<S: PathSink> Emitter<S> {
    fn emit_move_to(&mut self, p: Point) {
        self.back2 = self.back1;
        self.back1 = p;
        self.sink.move_to(p);
    }

    fn emit_line_to(&mut self, p: Point) {
        self.back2 = self.back1;
        self.back1 = p;
        self.sink.line_to(p);
    }

    fn emit_curve_to(&mut self, p1: Point, p2: Point, p3: Point) {
        // Keep the direction the curve arrives from.
        if p2 != p3 {
            self.back2 = p2;
        } else if p1 != p3 {
            self.back2 = p1;
        } else {
            self.back2 = self.back1;
        }
        self.back1 = p3;
        self.sink.curve_to(p1, p2, p3);
    }

    fn process_subpath(&mut self, elements: &ElementBuffer) {
        debug_assert!(elements.len() > 1, "stroking a subpath without segments");
        debug_assert!(elements[0].is_move_to(), "subpath must start with a move");
        let fw = self.stroke_side(elements.forward(), false);
        let bw = self.stroke_side(elements.backward(), !fw.closed);
        if !bw.closed {
            if let Some(tangent) = fw.start_tangent {
                self.join_points(elements[0].point, &tangent, self.cap);
            }
        }
    }

    /// Emit the outline on one side of the subpath.
    ///
    /// With `cap_first`, the side is connected to the current output point
    /// with a cap instead of starting a new subpath.
    fn stroke_side(&mut self, mut it: SubpathIter<'_>, cap_first: bool) -> SideResult {
        let Some(first) = it.next() else {
            return SideResult {
                closed: false,
                start_tangent: None,
            };
        };
        let start = first.point;
        let mut prev = start;
        let mut start_tangent = None;
        let offset = self.width / 2.0;

        while let Some(e) = it.next() {
            match e.kind {
                ElementKind::LineTo => {
                    if e.point == prev {
                        continue;
                    }
                    let line = Line::new(prev, e.point);
                    let line = line.translate(line.normal().with_length(offset).vector());
                    self.start_segment(prev, &line, cap_first, &mut start_tangent);
                    self.emit_line_to(line.p1);
                    prev = e.point;
                }
                ElementKind::CurveToData => {
                    let (Some(c2), Some(end)) = (it.next(), it.next()) else {
                        debug_assert!(false, "truncated cubic in subpath");
                        break;
                    };
                    let bez = CubicBez::new(prev, e.point, c2.point, end.point);
                    let mut offsets = mem::take(&mut self.offsets);
                    offsets.clear();
                    bez.offset_curves(offset, self.curve_threshold, MAX_OFFSET_CURVES, &mut offsets);
                    if let Some(first) = offsets.first() {
                        let tangent = bez.start_tangent().translate(first.p0 - bez.p0);
                        self.start_segment(prev, &tangent, cap_first, &mut start_tangent);
                        for c in &offsets {
                            self.emit_curve_to(c.p1, c.p2, c.p3);
                        }
                    }
                    self.offsets = offsets;
                    prev = end.point;
                }
                ElementKind::MoveTo | ElementKind::CurveTo => {
                    debug_assert!(false, "unexpected {:?} inside subpath", e.kind);
                }
            }
        }

        let closed = match start_tangent {
            Some(tangent) if prev == start => {
                self.join_points(prev, &tangent, self.join);
                true
            }
            _ => false,
        };
        SideResult {
            closed,
            start_tangent,
        }
    }

    /// Connect the output to the offset segment `next`, which belongs to the
    /// input point `focal`.
    fn start_segment(
        &mut self,
        focal: Point,
        next: &Line,
        cap_first: bool,
        start_tangent: &mut Option<Line>,
    ) {
        if start_tangent.is_some() {
            self.join_points(focal, next, self.join);
            return;
        }
        if cap_first {
            self.join_points(focal, next, self.cap);
        } else {
            self.emit_move_to(next.p0);
        }
        *start_tangent = Some(*next);
    }

    /// Emit the geometry connecting the last emitted point to the start of
    /// `next`, around the input point `focal`.
    fn join_points(&mut self, focal: Point, next: &Line, mode: JoinMode) {
        if self.back1 == next.p0 {
            return;
        }
        let prev = Line::new(self.back2, self.back1);
        let isect = prev.intersect(next);
        let inner = || {
            if let LineIntersection::Bounded(_) = isect {
                return true;
            }
            let angle = Line::new(prev.p1, next.p0).angle_to(&prev);
            angle > 90.0 && !fuzzy_compare(angle, 90.0)
        };

        match mode {
            JoinMode::Flat => {
                if inner() {
                    self.cut_through(focal, next);
                } else {
                    self.emit_line_to(next.p0);
                }
            }
            JoinMode::Miter => {
                if inner() {
                    self.cut_through(focal, next);
                    return;
                }
                let limit = self.width * self.miter_limit;
                match isect.point() {
                    Some(p) if (p - self.back1).hypot() <= limit => {
                        self.emit_line_to(p);
                        self.emit_line_to(next.p0);
                    }
                    _ => {
                        self.emit_line_to(prev.p1 + prev.with_length(limit).vector());
                        self.emit_line_to(next.p0 - next.with_length(limit).vector());
                        self.emit_line_to(next.p0);
                    }
                }
            }
            JoinMode::SvgMiter => {
                if inner() {
                    self.cut_through(focal, next);
                    return;
                }
                match isect.point() {
                    Some(p) if (p - focal).hypot() <= self.width * self.miter_limit / 2.0 => {
                        self.emit_line_to(p);
                        self.emit_line_to(next.p0);
                    }
                    _ => self.emit_line_to(next.p0),
                }
            }
            JoinMode::Square => {
                let half = self.width / 2.0;
                self.emit_line_to(prev.p1 + prev.with_length(half).vector());
                self.emit_line_to(next.p0 - next.with_length(half).vector());
                self.emit_line_to(next.p0);
            }
            JoinMode::Round => {
                if inner() {
                    self.cut_through(focal, next);
                    return;
                }
                let from = prev.angle();
                let mut sweep = normalize_degrees(from - next.angle());
                if sweep > 180.0 {
                    sweep -= 360.0;
                }
                let rect = Rect::from_center_radius(focal, self.width / 2.0);
                match curves_for_arc(rect, from + 90.0, -sweep) {
                    Ok(arc) => {
                        for c in arc.curves() {
                            self.emit_curve_to(c.p1, c.p2, c.p3);
                        }
                    }
                    Err(e) => warn!("skipping round join at {focal:?}: {e}"),
                }
                if self.back1 != next.p0 {
                    self.emit_line_to(next.p0);
                }
            }
            JoinMode::RoundCap => {
                // A half circle from two quarter circles.
                let r = self.width / 2.0;
                let k = KAPPA * r;
                let spoke = Line::new(focal, prev.p1);
                let radial = spoke.with_length(k).vector();
                let side = spoke.with_length(r).vector();
                let apex = focal + Vec2::new(-side.y, side.x);
                self.emit_curve_to(
                    prev.p1 + prev.with_length(k).vector(),
                    apex + radial,
                    apex,
                );
                self.emit_curve_to(
                    apex - radial,
                    next.p0 - next.with_length(k).vector(),
                    next.p0,
                );
            }
        }
    }

    /// Connect through the input point, for corners on the inside of a turn.
    fn cut_through(&mut self, focal: Point, next: &Line) {
        self.emit_line_to(focal);
        self.emit_line_to(next.p0);
    }
}

/// Expand a stroke into a fill.
///
/// Dashing is applied first when the style has a dash pattern with a
/// positive length.
pub fn stroke(path: impl IntoIterator<Item = PathEl>, style: &Stroke, opts: &StrokeOpts) -> BezPath {
    let stroker = Stroker::new(BezPath::new(), style, opts);
    let mut dasher = DashStroker::new(stroker, style, opts);
    if dasher.is_dashing() {
        dasher.stroke_path(path, Affine::IDENTITY);
        dasher.into_inner().into_inner()
    } else {
        let mut stroker = dasher.into_inner();
        stroker.stroke_path(path, Affine::IDENTITY);
        stroker.into_inner()
    }
}
