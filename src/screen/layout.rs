//! Frame resolution: Turning declarative frames into concrete ones.

use crate::geometry::{Rect, Size};

/// Resolve a requested frame against the current terminal size.
///
/// Sentinels resolve in a fixed order: auto-fill sizes first, then the
/// off-screen check, then auto-centering, then edge clipping. Returns
/// `None` when the window must be discarded for this frame, either
/// because its origin lies off screen or because the surviving area is
/// too small to hold a border plus content.
pub fn resolve_frame(requested: Rect, screen: Size) -> Option<Rect> {
    let mut frame = requested;

    // Non-positive sizes fill the remaining screen space.
    if frame.size.width <= 0 {
        frame.size.width = screen.width - frame.origin.x;
    }
    if frame.size.height <= 0 {
        frame.size.height = screen.height - frame.origin.y;
    }

    // Origin past either edge: nothing of the window can show.
    if frame.origin.x >= screen.width || frame.origin.y >= screen.height {
        return None;
    }

    // Negative origins center on that axis.
    if frame.origin.x < 0 {
        frame.origin.x = (screen.width - frame.size.width) / 2;
    }
    if frame.origin.y < 0 {
        frame.origin.y = (screen.height - frame.size.height) / 2;
    }

    // Clip overflow back to the screen edges.
    if frame.max_x() > screen.width {
        frame.size.width -= frame.max_x() - screen.width;
    }
    if frame.max_y() > screen.height {
        frame.size.height -= frame.max_y() - screen.height;
    }

    // Too small for a border plus content.
    if frame.size.width <= 2 || frame.size.height <= 2 {
        return None;
    }

    Some(frame)
}
