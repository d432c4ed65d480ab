//! Size: Width and height in terminal cells.

/// A size in terminal cells.
///
/// A component `<= 0` is a layout sentinel meaning "fill the remaining
/// screen space on that axis"; it is resolved before any surface is
/// created.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Width in columns.
    pub width: i32,
    /// Height in rows.
    pub height: i32,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Zero size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Check whether either dimension is a fill sentinel.
    #[inline]
    pub const fn has_fill_sentinel(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

impl std::fmt::Debug for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Size({}x{})", self.width, self.height)
    }
}
