//! Driver module: The terminal capability surface.
//!
//! Everything the toolkit needs from the platform terminal goes through
//! the [`Driver`] trait: session state, surface allocation, text and
//! line primitives, and non-blocking key polling. The crate ships one
//! implementation, [`TermDriver`], backed by crossterm for session
//! control and raw ANSI output for drawing.
//!
//! Surfaces are opaque driver-owned rectangles of cells. Drawing into a
//! surface is buffered; nothing reaches the physical screen until the
//! surface is refreshed.

mod keys;
#[cfg(test)]
pub(crate) mod mock;
mod output;
mod term;

pub use keys::KeyCode;
pub use term::TermDriver;

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};

/// Opaque handle to a driver-owned surface.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    /// The root surface covering the whole terminal.
    pub const SCREEN: Self = Self(0);
}

/// Opaque handle to a registered foreground/background color pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AttrToken(pub u16);

impl AttrToken {
    /// The terminal-default attribute (pair index 0).
    pub const DEFAULT: Self = Self(0);
}

/// Errors reported by a terminal driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The driver could not allocate a surface for the given frame,
    /// e.g. because the rectangle is degenerate.
    #[error("surface creation failed for {0:?}")]
    SurfaceCreation(Rect),

    /// The underlying terminal rejected an operation. Session
    /// acquisition failures surface here and are fatal to the caller.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// The terminal capability surface.
///
/// Implementations are internally synchronized: every method takes
/// `&self` and may be called from any context that holds a handle.
/// This is a leaf lock in the crate's lock order; a driver must never
/// call back into screen or window code.
pub trait Driver: Send + Sync {
    /// Whether the terminal can render colors.
    fn supports_color(&self) -> bool;

    /// Query the current terminal size in columns and rows.
    ///
    /// Returns `None` on a transient failure; callers keep their
    /// previously cached value until a query succeeds.
    fn dimensions(&self) -> Option<Size>;

    /// Allocate a surface for the given screen-absolute frame.
    fn create_surface(&self, frame: Rect) -> Result<SurfaceId, DriverError>;

    /// Release a surface. Unknown ids are ignored.
    fn destroy_surface(&self, surface: SurfaceId);

    /// Move a surface's cursor to a frame-relative position.
    fn move_cursor(&self, surface: SurfaceId, point: Point);

    /// Write text at the surface's cursor with an optional attribute.
    ///
    /// Text past the surface's right edge is dropped. `None` writes
    /// with the terminal-default attribute.
    fn write_text(&self, surface: SurfaceId, text: &str, attr: Option<AttrToken>);

    /// Draw a box border around the surface's outer edge.
    fn draw_border(&self, surface: SurfaceId);

    /// Draw a horizontal line from the cursor, `length` cells long.
    /// Does not move the cursor.
    fn draw_horizontal_line(&self, surface: SurfaceId, length: i32);

    /// Draw a vertical line from the cursor, `length` cells long.
    /// Does not move the cursor.
    fn draw_vertical_line(&self, surface: SurfaceId, length: i32);

    /// Flush a surface's pending content to the physical screen.
    fn refresh_surface(&self, surface: SurfaceId);

    /// Flush the root surface's pending content to the physical screen.
    fn refresh_screen(&self);

    /// Clear the physical screen and reset the root surface.
    fn clear_screen(&self);

    /// Show or hide the hardware cursor.
    fn set_cursor_visible(&self, visible: bool);

    /// Poll for a pending keypress without blocking.
    fn poll_key(&self) -> Option<KeyCode>;

    /// Register a foreground/background pair under the given token.
    fn register_pair(&self, token: AttrToken, foreground: Color, background: Color);
}
