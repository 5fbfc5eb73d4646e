// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroking of 2D vector paths.
//!
//! The pathstroke library turns a path made of lines and cubic Béziers,
//! together with a stroke style, into the outline of that stroke: a path
//! that, when filled, covers what a pen of the given width would paint.
//! Dash patterns, the usual join and cap styles, and miter limits are
//! supported.
//!
//! The building blocks are exposed too: flattening and offsetting of cubic
//! Béziers, approximation of elliptical arcs by cubics, and the
//! [`PathSink`] interface through which the stroker and the dasher receive
//! and emit geometry, so they can be chained or pointed at your own output.
//!
//! # Examples
//!
//! Stroking a path into a [`BezPath`]:
//!
//! ```
//! use pathstroke::{stroke, BezPath, Cap, Join, PathEl, Stroke, StrokeOpts};
//!
//! let mut path = BezPath::new();
//! path.move_to((0.0, 0.0));
//! path.line_to((100.0, 0.0));
//! path.curve_to((150.0, 0.0), (150.0, 50.0), (100.0, 50.0));
//!
//! let style = Stroke::new(10.0).with_join(Join::Round).with_cap(Cap::Flat);
//! let outline = stroke(&path, &style, &StrokeOpts::default());
//! assert!(matches!(outline.elements()[0], PathEl::MoveTo(_)));
//! ```
//!
//! Feeding construction calls to a [`Stroker`] directly:
//!
//! ```
//! use pathstroke::{Affine, BezPath, PathEl, Point, Stroke, StrokeOps, StrokeOpts, Stroker};
//!
//! let mut stroker = Stroker::new(BezPath::new(), &Stroke::new(2.0), &StrokeOpts::default());
//! let square = [
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//! ];
//! stroker.stroke_polygon(&square, true, Affine::IDENTITY);
//! let outline = stroker.into_inner();
//! // A closed outline has an outer and an inner loop.
//! let loops = outline
//!     .elements()
//!     .iter()
//!     .filter(|el| matches!(el, PathEl::MoveTo(_)))
//!     .count();
//! assert_eq!(loops, 2);
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments. However, note that the `libm` crate is not as
//! efficient as the standard library, and that this crate still uses the
//! `alloc` crate regardless.
//!
//! The `serde` feature derives serialization for the value types and style
//! settings, and the `mint` feature provides conversions for [`Point`] and
//! [`Vec2`].
//!
//! Diagnostics for degenerate input are reported through the [`log`] crate.
//!
//! [`libm`]: https://docs.rs/libm
//! [`log`]: https://docs.rs/log

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("pathstroke requires either the `std` or `libm` feature");

extern crate alloc;

mod affine;
mod arc;
mod bezpath;
pub mod common;
mod cubicbez;
mod dash;
mod line;
mod offset;
mod param_curve;
mod point;
mod rect;
mod sink;
mod stroke;
mod subpath;
mod vec2;

pub use crate::affine::*;
pub use crate::arc::*;
pub use crate::bezpath::*;
pub use crate::cubicbez::*;
pub use crate::dash::*;
pub use crate::line::*;
pub use crate::offset::*;
pub use crate::param_curve::*;
pub use crate::point::*;
pub use crate::rect::*;
pub use crate::sink::*;
pub use crate::stroke::*;
pub use crate::subpath::*;
pub use crate::vec2::*;
