//! `ManagedWindow`: Styled, clamped text rendering into one surface.

use crate::color::{Color, PairTable};
use crate::driver::{AttrToken, Driver, DriverError, SurfaceId};
use crate::geometry::{Point, Rect};
use std::borrow::Cow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use unicode_segmentation::UnicodeSegmentation;

/// Visual style of a managed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// No decoration; the draw rectangle is the full frame.
    #[default]
    Normal,
    /// A box border; the draw rectangle is inset to keep text off it.
    Boxed,
}

/// Truncate `text` to fit `available` columns.
///
/// Counts grapheme clusters, not bytes. Text longer than the budget is
/// cut to `available - 3` clusters plus a three-dot ellipsis; when the
/// budget is under four there is no room for the ellipsis and the text
/// is cut hard at `available`. A non-positive budget yields the empty
/// string.
///
/// The function is idempotent: feeding a result back in with its own
/// length as the budget returns it unchanged.
pub fn printable_text(text: &str, available: i32) -> Cow<'_, str> {
    if available <= 0 {
        return Cow::Borrowed("");
    }
    let available = available as usize;

    let count = text.graphemes(true).count();
    if count <= available {
        return Cow::Borrowed(text);
    }

    let cut_at = |clusters: usize| {
        text.grapheme_indices(true)
            .nth(clusters)
            .map_or(text.len(), |(offset, _)| offset)
    };

    if available >= 4 {
        let mut out = String::with_capacity(available + 3);
        out.push_str(&text[..cut_at(available - 3)]);
        out.push_str("...");
        Cow::Owned(out)
    } else {
        Cow::Borrowed(&text[..cut_at(available)])
    }
}

/// A rectangular window with cursor tracking and clamped text output.
///
/// Owns exactly one driver surface, released on drop. All mutating
/// operations serialize on the window's own cursor lock, which is a
/// leaf lock: it is never held while calling back into screen code.
pub struct ManagedWindow {
    driver: Arc<dyn Driver>,
    surface: SurfaceId,
    style: Style,
    frame: Rect,
    draw_rect: Rect,
    palette: Arc<PairTable>,
    colors_enabled: bool,
    /// Cursor position relative to `draw_rect`. May sit exactly one
    /// past the last valid column or row as an end-of-content marker.
    cursor: Mutex<Point>,
}

impl ManagedWindow {
    /// Allocate a surface for `frame` and prepare the draw rectangle.
    pub(crate) fn create(
        driver: Arc<dyn Driver>,
        frame: Rect,
        style: Style,
        palette: Arc<PairTable>,
        colors_enabled: bool,
    ) -> Result<Self, DriverError> {
        let surface = driver.create_surface(frame)?;

        let draw_rect = match style {
            Style::Boxed => {
                driver.draw_border(surface);
                // Horizontal inset is two columns so text clears the
                // border plus one cell of padding.
                Rect::from_parts(2, 1, frame.size.width - 4, frame.size.height - 2)
            }
            Style::Normal => Rect::from_parts(0, 0, frame.size.width, frame.size.height),
        };

        let window = Self {
            driver,
            surface,
            style,
            frame,
            draw_rect,
            palette,
            colors_enabled,
            cursor: Mutex::new(Point::ZERO),
        };
        window.move_to(0, 0);
        Ok(window)
    }

    /// The window's style.
    pub const fn style(&self) -> Style {
        self.style
    }

    /// The absolute screen rectangle this window occupies.
    pub const fn frame(&self) -> Rect {
        self.frame
    }

    /// The frame-relative rectangle text is clamped into.
    pub const fn draw_rect(&self) -> Rect {
        self.draw_rect
    }

    /// The drawable area as a zero-origin rectangle.
    pub const fn bounds(&self) -> Rect {
        Rect::new(Point::ZERO, self.draw_rect.size)
    }

    /// The cursor position relative to the draw rectangle.
    pub fn current_point(&self) -> Point {
        *self.lock_cursor()
    }

    /// Flush this window's surface to the physical screen.
    pub fn refresh(&self) {
        self.driver.refresh_surface(self.surface);
    }

    /// Move the cursor to a draw-rectangle-relative position.
    ///
    /// Each axis clamps independently to `[0, size]` inclusive: the
    /// cursor may rest one cell past the last column or row, which
    /// subsequent prints treat as "no space left".
    pub fn move_to(&self, x: i32, y: i32) {
        let mut cursor = self.lock_cursor();

        // Low clamp first, far-edge clamp second, so the far edge wins
        // for degenerate draw rectangles.
        let mut point = Point::new(self.draw_rect.origin.x + x, self.draw_rect.origin.y + y);
        point.x = point.x.max(self.draw_rect.origin.x).min(self.draw_rect.max_x());
        point.y = point.y.max(self.draw_rect.origin.y).min(self.draw_rect.max_y());

        self.driver.move_cursor(self.surface, point);
        *cursor = point - self.draw_rect.origin;
    }

    /// Move the cursor relative to its current position.
    pub fn move_by(&self, dx: i32, dy: i32) {
        let current = self.current_point();
        self.move_to(current.x + dx, current.y + dy);
    }

    /// Move the cursor horizontally.
    pub fn move_x(&self, by: i32) {
        self.move_by(by, 0);
    }

    /// Move the cursor vertically.
    pub fn move_y(&self, by: i32) {
        self.move_by(0, by);
    }

    /// Print text at the cursor, truncated to the remaining line space.
    pub fn print(&self, text: &str) {
        self.print_with_attr(None, text);
    }

    /// Print with a foreground color over the terminal default.
    pub fn print_fg(&self, foreground: Color, text: &str) {
        self.print_colored(foreground, Color::Clear, text);
    }

    /// Print with explicit foreground and background colors.
    ///
    /// When the session has no color support the text prints plain,
    /// with no attribute calls at all.
    pub fn print_colored(&self, foreground: Color, background: Color, text: &str) {
        let attr = self
            .colors_enabled
            .then(|| self.palette.pair_for(foreground, background));
        self.print_with_attr(attr, text);
    }

    /// Print followed by a newline.
    pub fn print_line(&self, text: &str) {
        self.print(text);
        self.new_line();
    }

    /// Colored print followed by a newline.
    pub fn print_line_fg(&self, foreground: Color, text: &str) {
        self.print_fg(foreground, text);
        self.new_line();
    }

    /// Fully colored print followed by a newline.
    pub fn print_line_colored(&self, foreground: Color, background: Color, text: &str) {
        self.print_colored(foreground, background, text);
        self.new_line();
    }

    /// Move to column zero of the next row. Vertical overflow stops at
    /// the row-past-the-end sentinel via `move_to`'s clamping.
    pub fn new_line(&self) {
        let current = self.current_point();
        self.move_to(0, current.y + 1);
    }

    /// Draw a horizontal line from the cursor, at most to the right
    /// edge, and advance the cursor past it.
    pub fn horizontal_ruler(&self, width: i32) {
        let current = self.current_point();
        let width = width.min(self.draw_rect.size.width - current.x);
        self.driver.draw_horizontal_line(self.surface, width);
        self.move_x(width);
    }

    /// Draw a vertical line from the cursor, at most to the bottom
    /// edge, and advance the cursor past it.
    pub fn vertical_ruler(&self, height: i32) {
        let current = self.current_point();
        let height = height.min(self.draw_rect.size.height - current.y);
        self.driver.draw_vertical_line(self.surface, height);
        self.move_y(height);
    }

    /// Draw a full-width horizontal divider on its own line.
    pub fn separator(&self) {
        if self.current_point().x != 0 {
            self.new_line();
        }
        self.horizontal_ruler(i32::MAX);
        self.new_line();
    }

    fn lock_cursor(&self) -> MutexGuard<'_, Point> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn print_with_attr(&self, attr: Option<AttrToken>, text: &str) {
        let emitted_len = {
            let cursor = self.lock_cursor();

            // Past the last row: the newline clamp parked the cursor on
            // the row sentinel and nothing more may print.
            if cursor.y == self.draw_rect.size.height {
                return;
            }

            let available = self.draw_rect.size.width - cursor.x;
            let emitted = printable_text(text, available);
            if emitted.is_empty() {
                return;
            }

            self.driver.write_text(self.surface, &emitted, attr);
            emitted.graphemes(true).count() as i32
        };

        // Advance relative to where printing started; the cursor lock
        // is released so move_to can take it again.
        let current = self.current_point();
        self.move_to(current.x + emitted_len, current.y);
    }
}

impl Drop for ManagedWindow {
    fn drop(&mut self) {
        self.driver.destroy_surface(self.surface);
    }
}

impl std::fmt::Debug for ManagedWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedWindow")
            .field("frame", &self.frame)
            .field("style", &self.style)
            .field("current_point", &self.current_point())
            .finish()
    }
}
