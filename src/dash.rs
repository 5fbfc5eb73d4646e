// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breaking paths into dashes.
//!
//! Curves are flattened before dashing, so dash lengths are measured along
//! the flattened polyline.

use log::debug;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::common::fuzzy_is_null;
use crate::sink::threshold_for_transform;
use crate::subpath::{Element, ElementBuffer, ElementKind};
use crate::{
    Affine, BezPath, Dashes, Line, ParamCurve, PathEl, PathSink, Point, Rect, Stroke, StrokeOps,
    StrokeOpts,
};

/// Common dash patterns, in multiples of the stroke width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DashStyle {
    /// Dashes separated by spaces.
    Dash,
    /// Dots separated by spaces.
    Dot,
    /// Alternating dashes and dots.
    DashDot,
    /// A dash followed by two dots.
    DashDotDot,
}

impl DashStyle {
    /// The on/off lengths of the pattern.
    pub fn pattern(self) -> &'static [f64] {
        const DASH: f64 = 4.0;
        const DOT: f64 = 1.0;
        const SPACE: f64 = 2.0;
        match self {
            DashStyle::Dash => &[DASH, SPACE],
            DashStyle::Dot => &[DOT, SPACE],
            DashStyle::DashDot => &[DASH, SPACE, DOT, SPACE],
            DashStyle::DashDotDot => &[DASH, SPACE, DOT, SPACE, DOT, SPACE],
        }
    }
}

/// A dash pattern in path units, ready for use.
#[derive(Clone, Debug)]
struct DashPattern {
    dashes: Dashes,
    sum: f64,
    longest: f64,
}

impl DashPattern {
    /// Scale `pattern` by `width`, clamping negative entries to zero and
    /// dropping a trailing unpaired entry.
    ///
    /// Returns `None` when there is nothing to dash with.
    fn new(pattern: &[f64], width: f64) -> Option<DashPattern> {
        let even = pattern.len() & !1;
        let dashes: Dashes = pattern[..even]
            .iter()
            .map(|&d| d.max(0.0) * width)
            .collect();
        let sum: f64 = dashes.iter().sum();
        let longest = dashes.iter().copied().fold(0.0, f64::max);
        if dashes.is_empty() || !sum.is_finite() || fuzzy_is_null(sum) {
            return None;
        }
        Some(DashPattern {
            dashes,
            sum,
            longest,
        })
    }
}

/// Breaks path construction calls into dashes, passing the dashes on to an
/// inner sink.
///
/// Each dash reaches the inner sink as its own subpath of lines. Wrap a
/// [`Stroker`](crate::Stroker) to get the outline of a dashed stroke.
#[derive(Debug)]
pub struct DashStroker<T> {
    inner: T,
    elements: ElementBuffer,
    pattern: Option<DashPattern>,
    width: f64,
    miter_limit: f64,
    dash_offset: f64,
    dash_threshold: f64,
    base_dash_threshold: f64,
    clip_rect: Option<Rect>,
}

impl<T: PathSink> DashStroker<T> {
    /// Create a dasher using the width, miter limit and dash settings of
    /// `style`.
    pub fn new(inner: T, style: &Stroke, opts: &StrokeOpts) -> Self {
        DashStroker {
            inner,
            elements: ElementBuffer::new(),
            pattern: DashPattern::new(&style.dash_pattern, style.width),
            width: style.width,
            miter_limit: style.miter_limit,
            dash_offset: style.dash_offset,
            dash_threshold: opts.dash_threshold,
            base_dash_threshold: opts.dash_threshold,
            clip_rect: opts.clip_rect,
        }
    }

    /// Does the pattern have any length?
    ///
    /// When it does not, nothing is passed on.
    pub fn is_dashing(&self) -> bool {
        self.pattern.is_some()
    }

    /// Replace the dash pattern and offset, both in multiples of the width.
    pub fn set_dashes(&mut self, offset: f64, pattern: &[f64]) {
        self.dash_offset = offset;
        self.pattern = DashPattern::new(pattern, self.width);
    }

    /// The flattening tolerance currently in use.
    pub fn dash_threshold(&self) -> f64 {
        self.dash_threshold
    }

    /// Set the flattening tolerance, which is also the base for
    /// [`set_curve_threshold_from_transform`](StrokeOps::set_curve_threshold_from_transform).
    pub fn set_dash_threshold(&mut self, threshold: f64) {
        self.dash_threshold = threshold;
        self.base_dash_threshold = threshold;
    }

    /// Drop dashes whose stroke cannot reach `rect`.
    pub fn set_clip_rect(&mut self, rect: Option<Rect>) {
        self.clip_rect = rect;
    }

    /// The inner sink.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// The inner sink, mutably.
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the inner sink.
    pub fn into_inner(self) -> T {
        self.inner
    }

    fn finish_subpath(&mut self) {
        if self.elements.len() > 1 {
            self.process_subpath();
        }
        self.elements.begin();
    }

    fn process_subpath(&mut self) {
        let Some(pattern) = &self.pattern else {
            return;
        };
        let dashes = &pattern.dashes[..];
        let count = dashes.len();
        let sum = pattern.sum;
        let inv_sum = 1.0 / sum;

        // Find where in the pattern the offset lands.
        let mut idash = 0;
        let mut doffset = self.dash_offset * self.width;
        doffset -= (doffset * inv_sum).floor() * sum;
        if !doffset.is_finite() {
            doffset = 0.0;
        }
        while doffset >= dashes[idash] {
            doffset -= dashes[idash];
            idash = (idash + 1) % count;
        }

        let mut it = self.elements.flat(self.dash_threshold);
        let Some(first) = it.next() else {
            return;
        };
        let mut prev = first.point;
        if !prev.is_finite() {
            return;
        }

        // Dashes are stroked later, so anything within reach of a join or
        // cap may still show.
        let clip = self
            .clip_rect
            .filter(|r| !r.is_empty())
            .map(|r| r.inflate(self.width.max(self.miter_limit) * pattern.longest));

        let mut pos = 0.0;
        let mut estart = 0.0;
        let mut move_to_pos = prev;
        let mut has_move_to = false;

        for e in it {
            let p = e.point;
            if !p.is_finite() {
                continue;
            }
            let cline = Line::new(prev, p);
            let mut elen = cline.length();
            let estop = estart + elen;
            let mut done = pos >= estop;

            if matches!(clip, Some(c) if !hits(&c, prev, p)) {
                // Only the bookkeeping is needed; skip whole cycles.
                elen -= (elen * inv_sum).floor() * sum;
                let mut stalled = 0;
                while !done {
                    let dpos = pos + dashes[idash] - doffset - estart;
                    if dpos > elen {
                        doffset = dashes[idash] - (dpos - elen);
                        pos = estop;
                        done = true;
                    } else {
                        let next = dpos + estart;
                        stalled = if next > pos { 0 } else { stalled + 1 };
                        pos = next;
                        done = pos >= estop;
                        idash = (idash + 1) % count;
                        doffset = 0.0;
                        if stalled > count {
                            debug!("dash pattern too fine to advance at {pos}, skipping to {estop}");
                            pos = estop;
                            done = true;
                        }
                    }
                }
                has_move_to = false;
                move_to_pos = p;
            } else {
                let mut stalled = 0;
                while !done {
                    let has_offset = doffset > 0.0;
                    let even = idash % 2 == 0;
                    let dpos = pos + dashes[idash] - doffset - estart;
                    let p2;
                    if dpos > elen {
                        // The dash continues on the next element.
                        doffset = dashes[idash] - (dpos - elen);
                        pos = estop;
                        done = true;
                        p2 = p;
                    } else {
                        p2 = cline.eval(dpos / elen);
                        let next = dpos + estart;
                        stalled = if next > pos { 0 } else { stalled + 1 };
                        pos = next;
                        done = pos >= estop;
                        idash = (idash + 1) % count;
                        doffset = 0.0;
                        if stalled > count {
                            debug!("dash pattern too fine to advance at {pos}, skipping to {estop}");
                            pos = estop;
                            done = true;
                        }
                    }

                    if even {
                        if clip.map_or(true, |c| hits(&c, move_to_pos, p2)) {
                            // With an offset, the dash continues from the
                            // previous element.
                            if !has_offset || !has_move_to {
                                self.inner.move_to(move_to_pos);
                                has_move_to = true;
                            }
                            self.inner.line_to(p2);
                        } else {
                            has_move_to = false;
                        }
                    }
                    move_to_pos = p2;
                }
            }

            estart = estop;
            prev = p;
        }
    }
}

/// Does the bounding box of the segment from `p0` to `p1` touch `clip`?
fn hits(clip: &Rect, p0: Point, p1: Point) -> bool {
    let b = Rect::from_points(p0, p1);
    b.x0 <= clip.x1 && b.x1 >= clip.x0 && b.y0 <= clip.y1 && b.y1 >= clip.y0
}

impl<T: PathSink> PathSink for DashStroker<T> {
    fn begin(&mut self) {
        self.elements.begin();
        self.inner.begin();
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
        self.inner.end();
    }
}

impl<T: PathSink> StrokeOps for DashStroker<T> {
    /// Scales the flattening tolerance only; the inner sink is left alone.
    fn set_curve_threshold_from_transform(&mut self, transform: &Affine) {
        self.dash_threshold = threshold_for_transform(self.base_dash_threshold, transform);
    }
}

/// Break a path into its dashes, without stroking them.
///
/// The result holds one open polyline per dash. A style without a usable
/// dash pattern gives an empty path.
pub fn dash(path: impl IntoIterator<Item = PathEl>, style: &Stroke, opts: &StrokeOpts) -> BezPath {
    let mut dasher = DashStroker::new(BezPath::new(), style, opts);
    dasher.stroke_path(path, Affine::IDENTITY);
    dasher.into_inner()
}
