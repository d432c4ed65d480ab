//! Rect: A rectangle composed of an origin and a size.

use super::point::Point;
use super::size::Size;

/// A rectangle in screen-relative terminal cells.
///
/// Before layout resolution a rect may carry sentinels (negative origin
/// for auto-centering, non-positive size for auto-fill); after
/// resolution all fields are concrete and non-negative.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Top-left corner.
    pub origin: Point,
    /// Extent in columns and rows.
    pub size: Size,
}

impl Rect {
    /// Create a rectangle from an origin and a size.
    #[inline]
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Create a rectangle from loose coordinates.
    #[inline]
    pub const fn from_parts(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    /// Zero-sized rectangle at the origin.
    pub const ZERO: Self = Self::new(Point::ZERO, Size::ZERO);

    /// Right edge (exclusive).
    #[inline]
    pub const fn max_x(&self) -> i32 {
        self.origin.x + self.size.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn max_y(&self) -> i32 {
        self.origin.y + self.size.height
    }

    /// Check if the rectangle has no area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.size.width <= 0 || self.size.height <= 0
    }

    /// Check if a point lies inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x < self.max_x()
            && point.y >= self.origin.y
            && point.y < self.max_y()
    }
}

impl std::fmt::Debug for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rect({}, {} {}x{})",
            self.origin.x, self.origin.y, self.size.width, self.size.height
        )
    }
}
