//! Geometry module: Plain value types for window placement.
//!
//! Coordinates are signed because window frames use sentinel values:
//! a size component `<= 0` means "auto-fill the remaining screen space"
//! and a negative origin component means "auto-center on that axis".
//! Sentinels are resolved against the live terminal size each frame by
//! the screen's layout pass.

mod point;
mod rect;
mod size;

pub use point::Point;
pub use rect::Rect;
pub use size::Size;
