//! Point: A screen-relative coordinate.

use std::ops::{Add, Sub};

/// A coordinate in terminal cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    /// Column, growing rightwards.
    pub x: i32,
    /// Row, growing downwards.
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The origin (0, 0).
    pub const ZERO: Self = Self::new(0, 0);
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point({}, {})", self.x, self.y)
    }
}
