// Copyright 2026 the Pathstroke Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buffering one subpath and walking it forwards, backwards or flattened.
//!
//! A subpath is stored as a flat run of [`Element`]s. Lines take one slot.
//! A cubic takes three: its two control points tagged
//! [`ElementKind::CurveToData`], followed by the end point tagged
//! [`ElementKind::CurveTo`].

use alloc::vec::Vec;
use core::ops::Index;

use crate::{CubicBez, Point};

/// The role of an [`Element`] within a subpath.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    /// Start of the subpath.
    MoveTo,
    /// End point of a line.
    LineTo,
    /// End point of a cubic.
    CurveTo,
    /// A control point of a cubic.
    CurveToData,
}

/// A tagged point in a subpath.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    /// What the point means.
    pub kind: ElementKind,
    /// The point.
    pub point: Point,
}

impl Element {
    /// Create a new element.
    #[inline]
    pub fn new(kind: ElementKind, point: impl Into<Point>) -> Element {
        Element {
            kind,
            point: point.into(),
        }
    }

    /// Is this element a [`ElementKind::MoveTo`]?
    #[inline]
    pub fn is_move_to(&self) -> bool {
        self.kind == ElementKind::MoveTo
    }

    /// Is this element a [`ElementKind::LineTo`]?
    #[inline]
    pub fn is_line_to(&self) -> bool {
        self.kind == ElementKind::LineTo
    }

    /// Is this element the first slot of a cubic, when read in traversal
    /// order?
    #[inline]
    pub fn is_curve_data(&self) -> bool {
        self.kind == ElementKind::CurveToData
    }
}

/// Storage for the subpath currently being processed.
///
/// The buffer is reused across subpaths; [`begin`](ElementBuffer::begin)
/// clears it without giving back its allocation.
#[derive(Clone, Debug, Default)]
pub struct ElementBuffer {
    elements: Vec<Element>,
}

impl ElementBuffer {
    /// Create an empty buffer.
    pub fn new() -> ElementBuffer {
        ElementBuffer::default()
    }

    /// Start a new subpath, discarding the current one.
    #[inline]
    pub fn begin(&mut self) {
        self.elements.clear();
    }

    /// Append an element.
    #[inline]
    pub fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// The number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Is the buffer empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The element at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// The elements in storage order.
    #[inline]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Walk the subpath in storage order.
    pub fn forward(&self) -> SubpathIter<'_> {
        SubpathIter::Forward(ForwardIter {
            elements: &self.elements,
            pos: 0,
        })
    }

    /// Walk the subpath from its last element to its first, retagged so
    /// the result reads as a valid subpath.
    pub fn backward(&self) -> SubpathIter<'_> {
        SubpathIter::Backward(BackwardIter {
            elements: &self.elements,
            pos: self.elements.len(),
        })
    }

    /// Walk the subpath in storage order, replacing every cubic with line
    /// segments no further than roughly `tolerance` from it.
    pub fn flat(&self, tolerance: f64) -> SubpathIter<'_> {
        SubpathIter::Flat(FlatIter {
            elements: &self.elements,
            pos: 0,
            tolerance,
            polygon: Vec::new(),
            polygon_ix: 0,
        })
    }
}

impl Index<usize> for ElementBuffer {
    type Output = Element;

    fn index(&self, index: usize) -> &Element {
        &self.elements[index]
    }
}

/// Iterator over a subpath in storage order.
#[derive(Clone, Debug)]
pub struct ForwardIter<'a> {
    elements: &'a [Element],
    pos: usize,
}

impl Iterator for ForwardIter<'_> {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        let e = *self.elements.get(self.pos)?;
        self.pos += 1;
        Some(e)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.elements.len().saturating_sub(self.pos);
        (n, Some(n))
    }
}

/// Iterator over a subpath from back to front.
///
/// The element read first becomes the move. Every other element takes the
/// role its successor in storage order had: the start point of a line
/// becomes a line end, and the points of a cubic swap between control and
/// end roles.
#[derive(Clone, Debug)]
pub struct BackwardIter<'a> {
    elements: &'a [Element],
    // One past the element to yield next.
    pos: usize,
}

impl Iterator for BackwardIter<'_> {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        if self.pos == 0 {
            return None;
        }
        self.pos -= 1;
        let mut e = self.elements[self.pos];
        let Some(succ) = self.elements.get(self.pos + 1) else {
            e.kind = ElementKind::MoveTo;
            return Some(e);
        };
        e.kind = match succ.kind {
            ElementKind::CurveTo => ElementKind::CurveToData,
            ElementKind::CurveToData if e.kind == ElementKind::CurveToData => {
                ElementKind::CurveToData
            }
            ElementKind::CurveToData => ElementKind::CurveTo,
            ElementKind::LineTo | ElementKind::MoveTo => ElementKind::LineTo,
        };
        Some(e)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.pos, Some(self.pos))
    }
}

/// Iterator over a subpath with its cubics flattened to lines.
#[derive(Clone, Debug)]
pub struct FlatIter<'a> {
    elements: &'a [Element],
    pos: usize,
    tolerance: f64,
    polygon: Vec<Point>,
    polygon_ix: usize,
}

impl Iterator for FlatIter<'_> {
    type Item = Element;

    fn next(&mut self) -> Option<Element> {
        if let Some(&p) = self.polygon.get(self.polygon_ix) {
            self.polygon_ix += 1;
            return Some(Element::new(ElementKind::LineTo, p));
        }
        let e = *self.elements.get(self.pos)?;
        if !e.is_curve_data() {
            self.pos += 1;
            return Some(e);
        }
        // A cubic starts at the element before its first control point.
        let (Some(p0), Some(p2), Some(p3)) = (
            self.pos.checked_sub(1).and_then(|i| self.elements.get(i)),
            self.elements.get(self.pos + 1),
            self.elements.get(self.pos + 2),
        ) else {
            debug_assert!(false, "truncated cubic in subpath");
            self.pos = self.elements.len();
            return None;
        };
        let c = CubicBez::new(p0.point, e.point, p2.point, p3.point);
        self.polygon.clear();
        c.add_to_polygon(&mut self.polygon, self.tolerance);
        self.pos += 3;
        self.polygon_ix = 0;
        self.next()
    }
}

/// One of the three ways of walking a subpath.
#[derive(Clone, Debug)]
pub enum SubpathIter<'a> {
    /// See [`ElementBuffer::forward`].
    Forward(ForwardIter<'a>),
    /// See [`ElementBuffer::backward`].
    Backward(BackwardIter<'a>),
    /// See [`ElementBuffer::flat`].
    Flat(FlatIter<'a>),
}

impl Iterator for SubpathIter<'_> {
    type Item = Element;

    #[inline]
    fn next(&mut self) -> Option<Element> {
        match self {
            SubpathIter::Forward(it) => it.next(),
            SubpathIter::Backward(it) => it.next(),
            SubpathIter::Flat(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            SubpathIter::Forward(it) => it.size_hint(),
            SubpathIter::Backward(it) => it.size_hint(),
            SubpathIter::Flat(it) => it.size_hint(),
        }
    }
}
