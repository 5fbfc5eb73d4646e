// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A trait for curves parametrized by a scalar.

use core::ops::Range;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

use crate::common::fuzzy_compare;
use crate::Point;

/// The accuracy used for arc length measurement when none is given.
///
/// This is in the same units as the curve, so for device space
/// coordinates it is a hundredth of a pixel.
pub const LENGTH_ACCURACY: f64 = 0.01;

/// Upper bound on bisection steps in [`ParamCurveArclen::inv_arclen`].
const MAX_INV_ARCLEN_STEPS: usize = 64;

/// A curve parametrized by a scalar.
pub trait ParamCurve: Sized {
    /// Evaluate the curve at parameter `t`.
    ///
    /// Generally `t` is in the range [0..1].
    fn eval(&self, t: f64) -> Point;

    /// Get a subsegment of the curve for the given parameter range.
    fn subsegment(&self, range: Range<f64>) -> Self;

    /// Subdivide into (roughly) halves.
    #[inline]
    fn subdivide(&self) -> (Self, Self) {
        (self.subsegment(0.0..0.5), self.subsegment(0.5..1.0))
    }

    /// The start point.
    fn start(&self) -> Point {
        self.eval(0.0)
    }

    /// The end point.
    fn end(&self) -> Point {
        self.eval(1.0)
    }
}

/// A parametrized curve that can have its arc length measured.
pub trait ParamCurveArclen: ParamCurve {
    /// The arc length of the curve.
    ///
    /// The result is accurate to roughly the given accuracy. Compute time
    /// may vary with accuracy, if the curve needs to be subdivided.
    fn arclen(&self, accuracy: f64) -> f64;

    /// Solve for the parameter that has the given arclength from the start.
    ///
    /// This is bisection on the length of the `[0, t]` prefix, stopping once
    /// the prefix length is within `accuracy` of `arclen`. Requests at or
    /// beyond the total length return `1.0`.
    fn inv_arclen(&self, arclen: f64, accuracy: f64) -> f64 {
        let total = self.arclen(accuracy);
        if arclen > total || fuzzy_compare(arclen, total) {
            return 1.0;
        }
        if arclen <= 0.0 {
            return 0.0;
        }
        let mut lo = 0.0;
        let mut hi = 1.0;
        let mut t = 0.5;
        for _ in 0..MAX_INV_ARCLEN_STEPS {
            let len = self.subsegment(0.0..t).arclen(accuracy);
            if (len - arclen).abs() < accuracy {
                break;
            }
            if len < arclen {
                lo = t;
            } else {
                hi = t;
            }
            t = 0.5 * (lo + hi);
        }
        t
    }
}
