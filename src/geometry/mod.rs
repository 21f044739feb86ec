//! Geometric primitives for layout analysis.
//!
//! This module provides the rectangle type and the overlap, gap and ordering
//! predicates used by every stage of the pipeline. Coordinates are PDF user
//! space: x grows to the right and y grows upwards, so the top of a page has
//! the largest y value.
//!
//! Everything here is pure. Only [`Rect::new`] can fail, because it is the
//! point where malformed decoder geometry enters the core.

use crate::error::{Error, Result};
use serde::Serialize;
use std::cmp::Ordering;

/// A 2D point in document space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in document space.
///
/// The invariant `min_x <= max_x` and `min_y <= max_y` is checked on
/// construction and cannot be broken afterwards: the fields are private and
/// every derived rectangle is built from valid ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Rect {
    /// Create a rectangle from its bounds.
    ///
    /// Fails with [`Error::InvalidRect`] when a bound is not finite or when a
    /// minimum exceeds its maximum. Coordinates are never swapped or clamped.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0).unwrap();
    /// assert_eq!(rect.width(), 100.0);
    /// assert_eq!(rect.height(), 50.0);
    ///
    /// assert!(Rect::new(10.0, 0.0, 5.0, 50.0).is_err());
    /// ```
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Result<Self> {
        let finite = min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite();
        if !finite || min_x > max_x || min_y > max_y {
            return Err(Error::InvalidRect {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Create a rectangle from a `[min_x, min_y, max_x, max_y]` array.
    pub fn from_array(bounds: [f32; 4]) -> Result<Self> {
        Self::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }

    /// Build a rectangle whose bounds are already known to be ordered.
    pub(crate) fn from_ordered(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        debug_assert!(min_x <= max_x && min_y <= max_y);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Left edge.
    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Bottom edge.
    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    /// Right edge.
    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Top edge.
    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Get the center point of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0).unwrap();
    /// let center = rect.center();
    /// assert_eq!(center.x, 50.0);
    /// assert_eq!(center.y, 25.0);
    /// ```
    pub fn center(&self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Compute the area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// True when the rectangle has no area (a point or a line segment).
    pub fn is_degenerate(&self) -> bool {
        self.width() <= f32::EPSILON || self.height() <= f32::EPSILON
    }

    /// Compute the union of this rectangle with another.
    ///
    /// Returns the smallest rectangle that contains both rectangles.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_strata::geometry::Rect;
    ///
    /// let r1 = Rect::new(0.0, 0.0, 50.0, 50.0).unwrap();
    /// let r2 = Rect::new(25.0, 25.0, 75.0, 75.0).unwrap();
    /// let union = r1.union(&r2);
    ///
    /// assert_eq!(union.min_x(), 0.0);
    /// assert_eq!(union.max_y(), 75.0);
    /// ```
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_ordered(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Union of all rectangles in an iterator, `None` when it is empty.
    pub fn union_all<'a, I>(rects: I) -> Option<Rect>
    where
        I: IntoIterator<Item = &'a Rect>,
    {
        rects.into_iter().fold(None, |acc: Option<Rect>, r| match acc {
            Some(u) => Some(u.union(r)),
            None => Some(*r),
        })
    }

    /// The overlapping region of two rectangles, if they overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);
        if min_x <= max_x && min_y <= max_y {
            Some(Rect::from_ordered(min_x, min_y, max_x, max_y))
        } else {
            None
        }
    }

    /// Area shared by two rectangles (zero when disjoint).
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        self.intersection(other).map_or(0.0, |r| r.area())
    }

    /// Check if this rectangle intersects with another (touching edges do not count).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Check if this rectangle fully contains another.
    pub fn contains(&self, other: &Rect) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Check if this rectangle contains a point (edges included).
    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Length of the shared x-range of two rectangles (zero when disjoint).
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        (self.max_x.min(other.max_x) - self.min_x.max(other.min_x)).max(0.0)
    }

    /// Length of the shared y-range of two rectangles (zero when disjoint).
    pub fn vertical_overlap(&self, other: &Rect) -> f32 {
        (self.max_y.min(other.max_y) - self.min_y.max(other.min_y)).max(0.0)
    }

    /// Horizontal overlap relative to the narrower rectangle, in `[0, 1]`.
    ///
    /// Two zero-width rectangles at the same x report 1.0.
    pub fn horizontal_overlap_ratio(&self, other: &Rect) -> f32 {
        overlap_ratio(
            self.horizontal_overlap(other),
            self.width().min(other.width()),
            self.min_x.max(other.min_x) <= self.max_x.min(other.max_x),
        )
    }

    /// Vertical overlap relative to the shorter rectangle, in `[0, 1]`.
    pub fn vertical_overlap_ratio(&self, other: &Rect) -> f32 {
        overlap_ratio(
            self.vertical_overlap(other),
            self.height().min(other.height()),
            self.min_y.max(other.min_y) <= self.max_y.min(other.max_y),
        )
    }
}

fn overlap_ratio(overlap: f32, extent: f32, touching: bool) -> f32 {
    if extent <= f32::EPSILON {
        return if touching { 1.0 } else { 0.0 };
    }
    (overlap / extent).clamp(0.0, 1.0)
}

/// True when the x-ranges of `a` and `b` overlap by more than `tolerance`.
///
/// A negative tolerance also accepts rectangles separated by less than
/// `-tolerance`.
pub fn overlaps_horizontally(a: &Rect, b: &Rect, tolerance: f32) -> bool {
    -horizontal_gap_between(a, b) > tolerance
}

/// True when the y-ranges of `a` and `b` overlap by more than `tolerance`.
pub fn overlaps_vertically(a: &Rect, b: &Rect, tolerance: f32) -> bool {
    -vertical_gap_between(a, b) > tolerance
}

/// Signed horizontal distance between two rectangles; negative means overlap.
pub fn horizontal_gap_between(a: &Rect, b: &Rect) -> f32 {
    a.min_x.max(b.min_x) - a.max_x.min(b.max_x)
}

/// Signed vertical distance between two rectangles; negative means overlap.
pub fn vertical_gap_between(a: &Rect, b: &Rect) -> f32 {
    a.min_y.max(b.min_y) - a.max_y.min(b.max_y)
}

/// Signed distance between two rectangles.
///
/// This is the larger of the horizontal and vertical gaps: it is positive as
/// soon as the rectangles are separated along either axis and negative only
/// when they overlap on both.
///
/// # Examples
///
/// ```
/// use pdf_strata::geometry::{gap_between, Rect};
///
/// let a = Rect::new(0.0, 0.0, 10.0, 10.0).unwrap();
/// let b = Rect::new(15.0, 0.0, 20.0, 10.0).unwrap();
/// assert_eq!(gap_between(&a, &b), 5.0);
///
/// let c = Rect::new(5.0, 5.0, 20.0, 20.0).unwrap();
/// assert!(gap_between(&a, &c) < 0.0);
/// ```
pub fn gap_between(a: &Rect, b: &Rect) -> f32 {
    horizontal_gap_between(a, b).max(vertical_gap_between(a, b))
}

/// Compare by left edge, ascending.
pub fn compare_min_x(a: &Rect, b: &Rect) -> Ordering {
    a.min_x.total_cmp(&b.min_x)
}

/// Compare by right edge, ascending.
pub fn compare_max_x(a: &Rect, b: &Rect) -> Ordering {
    a.max_x.total_cmp(&b.max_x)
}

/// Compare by bottom edge, ascending.
pub fn compare_min_y(a: &Rect, b: &Rect) -> Ordering {
    a.min_y.total_cmp(&b.min_y)
}

/// Compare by top edge, ascending.
pub fn compare_max_y(a: &Rect, b: &Rect) -> Ordering {
    a.max_y.total_cmp(&b.max_y)
}

/// Reading order: top edge descending (top of page first), then left edge ascending.
pub fn compare_reading_order(a: &Rect, b: &Rect) -> Ordering {
    compare_max_y(b, a).then_with(|| compare_min_x(a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Rect {
        Rect::new(x0, y0, x1, y1).unwrap()
    }

    #[test]
    fn test_point_creation() {
        let p = Point::new(10.0, 20.0);
        assert_eq!(p.x, 10.0);
        assert_eq!(p.y, 20.0);
    }

    #[test]
    fn test_rect_creation() {
        let r = rect(5.0, 10.0, 105.0, 60.0);
        assert_eq!(r.min_x(), 5.0);
        assert_eq!(r.min_y(), 10.0);
        assert_eq!(r.width(), 100.0);
        assert_eq!(r.height(), 50.0);
    }

    #[test]
    fn test_rect_rejects_inverted_bounds() {
        assert!(matches!(Rect::new(10.0, 0.0, 5.0, 1.0), Err(Error::InvalidRect { .. })));
        assert!(Rect::new(0.0, 10.0, 5.0, 1.0).is_err());
        assert!(Rect::new(f32::NAN, 0.0, 5.0, 1.0).is_err());
        assert!(Rect::new(0.0, 0.0, f32::INFINITY, 1.0).is_err());
        // Zero-size rectangles are valid
        assert!(Rect::new(3.0, 3.0, 3.0, 3.0).is_ok());
    }

    #[test]
    fn test_rect_center() {
        let r = rect(0.0, 0.0, 100.0, 50.0);
        let center = r.center();
        assert_eq!(center.x, 50.0);
        assert_eq!(center.y, 25.0);
    }

    #[test]
    fn test_rect_union() {
        let union = rect(0.0, 0.0, 50.0, 50.0).union(&rect(25.0, 25.0, 75.0, 75.0));
        assert_eq!(union, rect(0.0, 0.0, 75.0, 75.0));
    }

    #[test]
    fn test_union_all() {
        let rects = vec![rect(0.0, 0.0, 1.0, 1.0), rect(5.0, -2.0, 6.0, 0.5)];
        assert_eq!(Rect::union_all(&rects), Some(rect(0.0, -2.0, 6.0, 1.0)));
        assert_eq!(Rect::union_all(&Vec::<Rect>::new()), None);
    }

    #[test]
    fn test_intersection_area() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 5.0, 15.0, 15.0);
        assert_eq!(a.intersection_area(&b), 25.0);
        assert_eq!(a.intersection_area(&rect(20.0, 20.0, 30.0, 30.0)), 0.0);
    }

    #[test]
    fn test_rect_intersects_and_contains() {
        let outer = rect(0.0, 0.0, 100.0, 100.0);
        let inner = rect(10.0, 10.0, 20.0, 20.0);
        assert!(outer.intersects(&inner));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(!outer.intersects(&rect(100.0, 0.0, 110.0, 10.0)));
        assert!(outer.contains_point(&Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_overlap_ratios() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(5.0, 8.0, 25.0, 18.0);
        assert_eq!(a.horizontal_overlap_ratio(&b), 0.5);
        assert!((a.vertical_overlap_ratio(&b) - 0.2).abs() < 1e-6);
        assert_eq!(a.vertical_overlap_ratio(&rect(0.0, 20.0, 1.0, 30.0)), 0.0);
    }

    #[test]
    fn test_signed_gaps() {
        let a = rect(0.0, 0.0, 10.0, 10.0);
        let b = rect(17.0, 2.0, 20.0, 8.0);
        assert_eq!(horizontal_gap_between(&a, &b), 7.0);
        assert_eq!(vertical_gap_between(&a, &b), -6.0);
        assert_eq!(gap_between(&a, &b), 7.0);
        assert!(overlaps_vertically(&a, &b, 1.0));
        assert!(!overlaps_horizontally(&a, &b, 0.0));
        assert!(overlaps_horizontally(&a, &b, -8.0));
    }

    #[test]
    fn test_reading_order_comparator() {
        let top_right = rect(50.0, 90.0, 60.0, 100.0);
        let top_left = rect(0.0, 90.0, 10.0, 100.0);
        let bottom = rect(0.0, 0.0, 10.0, 10.0);
        let mut rects = vec![bottom, top_right, top_left];
        rects.sort_by(compare_reading_order);
        assert_eq!(rects, vec![top_left, top_right, bottom]);
    }

    #[test]
    fn test_min_max_comparators() {
        let a = rect(0.0, 5.0, 10.0, 6.0);
        let b = rect(1.0, 4.0, 9.0, 7.0);
        assert_eq!(compare_min_x(&a, &b), Ordering::Less);
        assert_eq!(compare_max_x(&a, &b), Ordering::Greater);
        assert_eq!(compare_min_y(&a, &b), Ordering::Greater);
        assert_eq!(compare_max_y(&a, &b), Ordering::Less);
    }
}
