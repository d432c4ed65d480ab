//! `Window`: A plain, unmanaged window surface.

use crate::color::{Color, PairTable};
use crate::driver::{Driver, DriverError, SurfaceId};
use crate::geometry::{Point, Rect};
use std::sync::Arc;

/// A window the caller owns and drives directly.
///
/// Unlike [`ManagedWindow`](super::ManagedWindow), a plain window has
/// no cursor tracking, no clamping, and no truncation: operations pass
/// straight through to the driver surface. The caller decides when to
/// refresh and how long the window lives. Created through
/// [`Screen::create_window`](crate::Screen::create_window).
pub struct Window {
    driver: Arc<dyn Driver>,
    surface: SurfaceId,
    frame: Rect,
    palette: Arc<PairTable>,
    colors_enabled: bool,
}

impl Window {
    pub(crate) fn create(
        driver: Arc<dyn Driver>,
        frame: Rect,
        palette: Arc<PairTable>,
        colors_enabled: bool,
    ) -> Result<Self, DriverError> {
        let surface = driver.create_surface(frame)?;
        Ok(Self {
            driver,
            surface,
            frame,
            palette,
            colors_enabled,
        })
    }

    /// The absolute screen rectangle this window occupies.
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    /// Flush this window's surface to the physical screen.
    pub fn refresh(&self) {
        self.driver.refresh_surface(self.surface);
    }

    /// Move the surface cursor. Not clamped; out-of-range writes are
    /// dropped by the driver.
    pub fn move_to(&self, point: Point) {
        self.driver.move_cursor(self.surface, point);
    }

    /// Write text at the surface cursor.
    pub fn print(&self, text: &str) {
        self.driver.write_text(self.surface, text, None);
    }

    /// Write text with a foreground color over the terminal default.
    pub fn print_fg(&self, foreground: Color, text: &str) {
        self.print_colored(foreground, Color::Clear, text);
    }

    /// Write text with explicit foreground and background colors.
    pub fn print_colored(&self, foreground: Color, background: Color, text: &str) {
        let attr = self
            .colors_enabled
            .then(|| self.palette.pair_for(foreground, background));
        self.driver.write_text(self.surface, text, attr);
    }

    /// Draw a box border around the window's outer edge.
    pub fn draw_box(&self) {
        self.driver.draw_border(self.surface);
    }

    /// Draw a horizontal line from the cursor.
    pub fn horizontal_ruler(&self, width: i32) {
        self.driver.draw_horizontal_line(self.surface, width);
    }

    /// Draw a vertical line from the cursor.
    pub fn vertical_ruler(&self, height: i32) {
        self.driver.draw_vertical_line(self.surface, height);
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        self.driver.destroy_surface(self.surface);
    }
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window").field("frame", &self.frame).finish()
    }
}
