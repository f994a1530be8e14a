// THEORY:
// The `bounds` module gives every image in the system a place on an infinite integer
// plane. Two images are compared where they overlap, and the difference map covers
// everywhere either of them exists, so the whole engine is phrased in terms of
// rectangle algebra rather than raw widths and heights.
//
// Key architectural principles:
// 1.  **Half-Open Rectangles**: `min` is inclusive, `max` is exclusive. A rectangle
//     with `max <= min` on either axis is empty and contains no points.
// 2.  **Origin Freedom**: Rectangles are not anchored at (0, 0). A decoded image can
//     carry any origin, including a negative one, and the algebra still holds.
// 3.  **Closed Algebra**: `union` and `intersect` always return a valid `Bounds`.
//     Disjoint inputs intersect to the canonical empty rectangle; an empty operand
//     is the identity for `union`.

use std::fmt;

pub type Coordinate = i32;

/// An axis-aligned, half-open integer rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    pub min_x: Coordinate,
    pub min_y: Coordinate,
    /// Exclusive.
    pub max_x: Coordinate,
    /// Exclusive.
    pub max_y: Coordinate,
}

impl Bounds {
    /// The canonical empty rectangle, anchored at the origin.
    pub const EMPTY: Bounds = Bounds {
        min_x: 0,
        min_y: 0,
        max_x: 0,
        max_y: 0,
    };

    pub fn new(min_x: Coordinate, min_y: Coordinate, max_x: Coordinate, max_y: Coordinate) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// A `width` x `height` rectangle whose top-left corner is at (0, 0).
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::with_origin(0, 0, width, height)
    }

    /// A `width` x `height` rectangle whose top-left corner is at (`x`, `y`).
    ///
    /// The far edges saturate at `Coordinate::MAX`; use `checked_with_origin` when
    /// the size has to be kept exactly.
    pub fn with_origin(x: Coordinate, y: Coordinate, width: u32, height: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x.saturating_add_unsigned(width),
            max_y: y.saturating_add_unsigned(height),
        }
    }

    /// Like `with_origin`, but `None` when the far edges do not fit in a `Coordinate`.
    pub fn checked_with_origin(
        x: Coordinate,
        y: Coordinate,
        width: u32,
        height: u32,
    ) -> Option<Self> {
        Some(Self {
            min_x: x,
            min_y: y,
            max_x: x.checked_add_unsigned(width)?,
            max_y: y.checked_add_unsigned(height)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    pub fn width(&self) -> u32 {
        if self.is_empty() {
            return 0;
        }
        self.max_x.abs_diff(self.min_x)
    }

    pub fn height(&self) -> u32 {
        if self.is_empty() {
            return 0;
        }
        self.max_y.abs_diff(self.min_y)
    }

    /// Number of points inside the rectangle.
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn contains(&self, x: Coordinate, y: Coordinate) -> bool {
        self.min_x <= x && x < self.max_x && self.min_y <= y && y < self.max_y
    }

    /// The largest rectangle contained in both `self` and `other`.
    /// Returns `Bounds::EMPTY` when they do not overlap.
    pub fn intersect(&self, other: &Bounds) -> Bounds {
        let overlap = Bounds {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        };
        if overlap.is_empty() {
            return Bounds::EMPTY;
        }
        overlap
    }

    /// The smallest rectangle that contains both `self` and `other`.
    pub fn union(&self, other: &Bounds) -> Bounds {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Every point of the rectangle in row-major order (y outer, x inner).
    pub fn points(self) -> impl Iterator<Item = (Coordinate, Coordinate)> {
        let Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        } = self;
        (min_y..max_y).flat_map(move |y| (min_x..max_x).map(move |x| (x, y)))
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_when_max_not_past_min() {
        assert!(Bounds::EMPTY.is_empty());
        assert!(Bounds::new(3, 3, 3, 10).is_empty());
        assert!(Bounds::new(0, 5, 4, 2).is_empty());
        assert!(!Bounds::from_size(1, 1).is_empty());
        assert_eq!(Bounds::new(0, 5, 4, 2).area(), 0);
    }

    #[test]
    fn intersect_overlapping_rectangles() {
        let a = Bounds::from_size(10, 10);
        let b = Bounds::with_origin(5, -2, 10, 4);
        assert_eq!(a.intersect(&b), Bounds::new(5, 0, 10, 2));
        assert_eq!(b.intersect(&a), a.intersect(&b));
    }

    #[test]
    fn intersect_disjoint_is_canonical_empty() {
        let a = Bounds::from_size(4, 4);
        let b = Bounds::with_origin(10, 10, 4, 4);
        assert_eq!(a.intersect(&b), Bounds::EMPTY);

        // Touching edges do not overlap.
        let c = Bounds::with_origin(4, 0, 4, 4);
        assert!(a.intersect(&c).is_empty());
    }

    #[test]
    fn union_covers_both() {
        let a = Bounds::from_size(10, 10);
        let b = Bounds::with_origin(-3, 4, 5, 20);
        let u = a.union(&b);
        assert_eq!(u, Bounds::new(-3, 0, 10, 24));
        assert_eq!(u.width(), 13);
        assert_eq!(u.height(), 24);
    }

    #[test]
    fn union_ignores_empty_operand() {
        let a = Bounds::with_origin(7, 7, 2, 3);
        assert_eq!(a.union(&Bounds::EMPTY), a);
        assert_eq!(Bounds::EMPTY.union(&a), a);
    }

    #[test]
    fn points_are_row_major() {
        let b = Bounds::with_origin(1, 1, 2, 2);
        let points: Vec<_> = b.points().collect();
        assert_eq!(points, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
        assert_eq!(Bounds::EMPTY.points().count(), 0);
    }

    #[test]
    fn extents_near_the_coordinate_limits() {
        let far = Bounds::with_origin(Coordinate::MAX - 3, 0, 3, 1);
        assert_eq!(far.max_x, Coordinate::MAX);
        assert_eq!(far.width(), 3);

        let clipped = Bounds::with_origin(Coordinate::MAX - 3, 0, 10, 1);
        assert_eq!(clipped.max_x, Coordinate::MAX);
        assert_eq!(Bounds::checked_with_origin(Coordinate::MAX - 3, 0, 10, 1), None);
        assert_eq!(Bounds::checked_with_origin(-5, -5, 3, 3), Some(Bounds::new(-5, -5, -2, -2)));

        let left = Bounds::with_origin(Coordinate::MIN, Coordinate::MIN, 1, 1);
        let right = Bounds::with_origin(Coordinate::MAX - 1, Coordinate::MAX - 1, 1, 1);
        let span = left.union(&right);
        assert_eq!(span.width(), u32::MAX);
        assert_eq!(span.height(), u32::MAX);
        assert_eq!(span.area(), u32::MAX as u64 * u32::MAX as u64);
    }

    #[test]
    fn display_matches_corner_notation() {
        assert_eq!(Bounds::new(-1, 2, 3, 4).to_string(), "(-1,2)-(3,4)");
    }
}
