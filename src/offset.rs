// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Approximating the parallel offset of a cubic Bézier.
//!
//! The offset of a cubic is not itself a cubic. Each control point is moved
//! along the averaged normals of its adjacent control polygon edges, the
//! result is checked against the true offset at a few parameters, and the
//! source curve is subdivided where the check fails.

use alloc::vec::Vec;

use arrayvec::ArrayVec;
use log::debug;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::arc::MAX_ARC_CURVES;
use crate::common::{fuzzy_compare, fuzzy_is_null};
use crate::{curves_for_arc, CubicBez, ParamCurve, Point, Rect, Vec2};

/// Depth of the subdivision stack in one offset pass.
const OFFSET_STACK: usize = 10;

/// Growth of the acceptance threshold when a pass runs out of room.
const THRESHOLD_GROWTH: f64 = 1.5;

/// Past this threshold the remaining pieces are accepted unchecked.
const MAX_THRESHOLD: f64 = 2.0;

/// Outcome of offsetting one curve without subdivision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShiftResult {
    /// The offset curve is within the threshold.
    Accepted(CubicBez),
    /// The offset curve is too far from the true offset; subdivide.
    Split(CubicBez),
    /// The curve is a single point and has no offset.
    Discard,
    /// The curve is tiny compared to the offset and turns back on itself;
    /// its offset is best drawn as a circular arc.
    Circle,
}

/// Outcome of one subdivision pass of [`CubicBez::offset_pass`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OffsetPass {
    /// Every piece was accepted at the given threshold.
    Accepted,
    /// The pass ran out of room; its output should be discarded and the
    /// pass repeated with this larger threshold.
    Retry(f64),
    /// The threshold bound was exceeded and the pieces on hand were taken
    /// as they are.
    GaveUp,
}

impl CubicBez {
    /// Offset the curve by `offset` without subdivision.
    ///
    /// Positive offsets move towards `(dy, -dx)` of the direction of travel.
    pub fn shift(&self, offset: f64, threshold: f64) -> ShiftResult {
        let orig = self.points();
        let mut points = ArrayVec::<Point, 4>::new();
        let mut map = [0usize; 4];
        points.push(orig[0]);
        for i in 1..4 {
            if orig[i] != orig[i - 1] || (i == 3 && points.len() == 1) {
                points.push(orig[i]);
            }
            map[i] = points.len() - 1;
        }
        let np = points.len();

        let bounds = self.control_box();
        let small = 0.1 * offset.abs();
        if np == 4 && bounds.width() < small && bounds.height() < small {
            let a = self.p0 - self.p1;
            let b = self.p2 - self.p3;
            let l = a.hypot2() * b.hypot2();
            let dot = a.dot(b);
            if dot < 0.0 && dot * dot < 0.8 * l {
                return ShiftResult::Circle;
            }
        }

        let first = points[1] - points[0];
        let len = first.hypot();
        if len == 0.0 {
            return ShiftResult::Discard;
        }
        let mut prev_normal = first.turn_neg_90() / len;
        let mut shifted = ArrayVec::<Point, 4>::new();
        shifted.push(points[0] + prev_normal * offset);
        for i in 1..np - 1 {
            let next = points[i + 1] - points[i];
            let next_normal = next.turn_neg_90() / next.hypot();
            let r = 1.0 + prev_normal.dot(next_normal);
            if fuzzy_is_null(r) {
                shifted.push(points[i] + prev_normal * offset);
            } else {
                shifted.push(points[i] + (prev_normal + next_normal) * (offset / r));
            }
            prev_normal = next_normal;
        }
        shifted.push(points[np - 1] + prev_normal * offset);

        let result = CubicBez::new(
            shifted[map[0]],
            shifted[map[1]],
            shifted[map[2]],
            shifted[map[3]],
        );
        if np > 2 && !good_offset(self, &result, offset, threshold) {
            ShiftResult::Split(result)
        } else {
            ShiftResult::Accepted(result)
        }
    }

    /// Approximate the offset of the curve with at most `max_segments`
    /// cubics, appending them to `out`.
    ///
    /// `threshold` is the relative error accepted at first; it grows when
    /// the subdivision runs out of room. Returns the number of curves
    /// appended, which is zero for a curve collapsed to a point.
    pub fn offset_curves(
        &self,
        offset: f64,
        threshold: f64,
        max_segments: usize,
        out: &mut Vec<CubicBez>,
    ) -> usize {
        debug_assert!(max_segments > 0, "offset needs room for at least one curve");
        if max_segments == 0 {
            return 0;
        }
        let p = self.p0;
        let is_point = [self.p1, self.p2, self.p3]
            .iter()
            .all(|q| fuzzy_compare(q.x, p.x) && fuzzy_compare(q.y, p.y));
        if is_point {
            return 0;
        }

        let start = out.len();
        let mut threshold = if threshold > 0.0 {
            threshold
        } else {
            f64::EPSILON
        };
        loop {
            match self.offset_pass(offset, threshold, max_segments, out) {
                OffsetPass::Retry(next) => {
                    out.truncate(start);
                    threshold = next;
                }
                OffsetPass::Accepted | OffsetPass::GaveUp => return out.len() - start,
            }
        }
    }

    /// One subdivision pass of [`CubicBez::offset_curves`] at a fixed
    /// threshold.
    ///
    /// Pieces are appended to `out` as they are accepted. On
    /// [`OffsetPass::Retry`] the appended pieces are incomplete.
    pub fn offset_pass(
        &self,
        offset: f64,
        threshold: f64,
        max_segments: usize,
        out: &mut Vec<CubicBez>,
    ) -> OffsetPass {
        let start = out.len();
        let room = max_segments.saturating_sub(1);
        let mut stack = ArrayVec::<CubicBez, OFFSET_STACK>::new();
        stack.push(*self);
        while let Some(&b) = stack.last() {
            let produced = out.len() - start;
            if stack.len() == OFFSET_STACK || produced + stack.len() >= room {
                let next = threshold * THRESHOLD_GROWTH;
                if next > MAX_THRESHOLD {
                    debug!("offset approximation gave up at threshold {threshold}");
                    give_up(&mut stack, offset, next, start + max_segments, out);
                    return OffsetPass::GaveUp;
                }
                return OffsetPass::Retry(next);
            }
            match b.shift(offset, threshold) {
                ShiftResult::Discard => {
                    stack.pop();
                }
                ShiftResult::Accepted(c) => {
                    out.push(c);
                    stack.pop();
                }
                ShiftResult::Circle => {
                    let fits = |arc: &ArrayVec<CubicBez, MAX_ARC_CURVES>| {
                        produced + arc.len() + stack.len() - 1 <= room
                    };
                    match b.circle_offset(offset).filter(fits) {
                        Some(arc) => {
                            out.extend(arc);
                            stack.pop();
                        }
                        None => split_top(&mut stack, &b),
                    }
                }
                ShiftResult::Split(_) => split_top(&mut stack, &b),
            }
        }
        OffsetPass::Accepted
    }

    /// The offset of a small curve that doubles back, as a circular arc
    /// around the midpoint of its end points.
    ///
    /// The arc starts and ends exactly at the ends offset along the end
    /// tangents' normals.
    fn circle_offset(&self, offset: f64) -> Option<ArrayVec<CubicBez, MAX_ARC_CURVES>> {
        let unit = |v: Vec2| {
            let len = v.hypot();
            (!fuzzy_is_null(len)).then(|| v / len)
        };
        let n0 = unit((self.p1 - self.p0).turn_neg_90())?;
        let n2 = unit((self.p3 - self.p2).turn_neg_90())?;
        let mut n1 = -unit((self.p0 - self.p1) - (self.p2 - self.p3))?;

        let angle = |a: Vec2, b: Vec2| a.dot(b).clamp(-1.0, 1.0).acos();
        if angle(n0, n1) + angle(n1, n2) > core::f64::consts::PI {
            n1 = -n1;
        }

        let sign = if offset < 0.0 { -1.0 } else { 1.0 };
        let (u0, u1, u2) = (n0 * sign, n1 * sign, n2 * sign);
        let turn = |a: Vec2, b: Vec2| a.cross(b).atan2(a.dot(b));
        let sweep = turn(u0, u1) + turn(u1, u2);

        let center = self.p0.midpoint(self.p3);
        let rect = Rect::from_center_radius(center, offset.abs());
        let start_angle = (-u0.y).atan2(u0.x).to_degrees();
        let arc = curves_for_arc(rect, start_angle, -sweep.to_degrees()).ok()?;

        let mut curves: ArrayVec<CubicBez, MAX_ARC_CURVES> = arc.curves().collect();
        let start = self.p0 + n0 * offset;
        let end = self.p3 + n2 * offset;
        let first = curves.first_mut()?;
        first.p1 += start - first.p0;
        first.p0 = start;
        let last = curves.last_mut()?;
        last.p2 += end - last.p3;
        last.p3 = end;
        Some(curves)
    }
}

/// Replace the top of the stack with its two halves, first half on top.
fn split_top(stack: &mut ArrayVec<CubicBez, OFFSET_STACK>, b: &CubicBez) {
    stack.pop();
    let (first, second) = b.split();
    stack.push(second);
    stack.push(first);
}

/// Take the remaining pieces as they are, up to `limit` total output.
fn give_up(
    stack: &mut ArrayVec<CubicBez, OFFSET_STACK>,
    offset: f64,
    threshold: f64,
    limit: usize,
    out: &mut Vec<CubicBez>,
) {
    while let Some(b) = stack.pop() {
        if out.len() >= limit {
            break;
        }
        match b.shift(offset, threshold) {
            ShiftResult::Accepted(c) | ShiftResult::Split(c) => out.push(c),
            ShiftResult::Discard | ShiftResult::Circle => {}
        }
    }
}

/// Compare the offset curve to the true offset at three interior points.
///
/// Both the distance between corresponding points and their deviation
/// along the source curve's tangent are checked.
fn good_offset(orig: &CubicBez, shifted: &CubicBez, offset: f64, threshold: f64) -> bool {
    let o2 = offset * offset;
    let max_dist_line = threshold * o2;
    let max_dist_normal = threshold * offset.abs();
    for t in [0.25, 0.5, 0.75] {
        let p1 = orig.eval(t);
        let p2 = shifted.eval(t);
        if ((p1 - p2).hypot2() - o2).abs() > max_dist_line {
            return false;
        }
        let n = orig.normal_at(t);
        let l = n.manhattan();
        if l != 0.0 && n.cross(p1 - p2).abs() / l > max_dist_normal {
            return false;
        }
    }
    true
}
