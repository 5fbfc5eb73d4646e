// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

#![allow(missing_docs)]

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident/$lfname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f32 {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lfname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("pathstroke requires either the `std` or `libm` feature")
            })+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("pathstroke requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs/fabsf;
    fn acos(self) -> Self => acos/acosf;
    fn atan2(self, other: Self) -> Self => atan2/atan2f;
    fn cos(self) -> Self => cos/cosf;
    fn floor(self) -> Self => floor/floorf;
    fn hypot(self, other: Self) -> Self => hypot/hypotf;
    fn sin(self) -> Self => sin/sinf;
    fn sqrt(self) -> Self => sqrt/sqrtf;
}

/// Relative precision used by [`fuzzy_compare`]; roughly 12 significant digits.
const FUZZY_SCALE: f64 = 1e12;

/// True when `x` is zero to within double precision noise.
#[inline]
pub fn fuzzy_is_null(x: f64) -> bool {
    x.abs() <= 1.0 / FUZZY_SCALE
}

/// Relative comparison of two floats.
///
/// Note that this never matches when one of the values is exactly zero
/// and the other is not; use [`fuzzy_is_null`] for that.
#[inline]
pub fn fuzzy_compare(a: f64, b: f64) -> bool {
    (a - b).abs() * FUZZY_SCALE <= a.abs().min(b.abs())
}

/// Maps an angle in degrees into `[0, 360)`.
///
/// Values within rounding noise of a full turn snap to zero.
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let a = angle - 360.0 * (angle / 360.0).floor();
    if a >= 360.0 || fuzzy_compare(a, 360.0) {
        0.0
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy() {
        assert!(fuzzy_is_null(0.0));
        assert!(fuzzy_is_null(1e-13));
        assert!(!fuzzy_is_null(1e-9));
        assert!(fuzzy_compare(90.0, 90.0 + 1e-12));
        assert!(!fuzzy_compare(90.0, 90.001));
        assert!(!fuzzy_compare(0.0, 1e-20));
    }

    #[test]
    fn degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }
}
