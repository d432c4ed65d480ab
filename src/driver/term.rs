//! `TermDriver`: The crossterm-backed terminal driver.
//!
//! crossterm handles session control (raw mode, alternate screen, size
//! queries, event polling); drawing goes through in-memory cell grids
//! flushed as raw ANSI in a single syscall per refresh.
//!
//! Each surface keeps a whole-surface dirty flag. Refreshing a clean
//! surface emits nothing, so an untouched root screen never repaints
//! over windows that were refreshed after it.

use super::keys::{self, KeyCode};
use super::output::AnsiBuffer;
use super::{AttrToken, Driver, DriverError, SurfaceId};
use crate::color::Color;
use crate::geometry::{Point, Rect, Size};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{event, execute};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use unicode_width::UnicodeWidthChar;

/// Placeholder glyph for the trailing cell of a double-width character.
const CONTINUATION: char = '\0';

/// One terminal cell: a glyph plus an optional color-pair attribute.
#[derive(Clone, Copy, PartialEq, Eq)]
struct TermCell {
    glyph: char,
    attr: Option<AttrToken>,
}

impl TermCell {
    const BLANK: Self = Self {
        glyph: ' ',
        attr: None,
    };
}

/// A driver-owned drawable rectangle of cells.
struct Surface {
    /// Screen-absolute position and extent.
    frame: Rect,
    /// Row-major cell grid, `width * height` entries.
    cells: Vec<TermCell>,
    /// Frame-relative cursor for text and line primitives.
    cursor: Point,
    /// Whether the grid changed since the last refresh.
    dirty: bool,
}

impl Surface {
    fn new(frame: Rect) -> Self {
        let area = (frame.size.width.max(0) as usize) * (frame.size.height.max(0) as usize);
        Self {
            frame,
            cells: vec![TermCell::BLANK; area],
            cursor: Point::ZERO,
            dirty: true,
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.frame.size.width || y >= self.frame.size.height {
            return None;
        }
        Some((y * self.frame.size.width + x) as usize)
    }

    fn put(&mut self, x: i32, y: i32, cell: TermCell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
            self.dirty = true;
        }
    }
}

/// Mutable driver state behind the driver's single leaf lock.
struct DriverState {
    out: io::Stdout,
    buffer: AnsiBuffer,
    surfaces: HashMap<u64, Surface>,
    next_surface: u64,
    pairs: HashMap<u16, (Color, Color)>,
}

/// Terminal driver backed by crossterm.
///
/// Acquiring the driver enters raw mode and the alternate screen;
/// dropping it restores the terminal. Raw-mode failure is fatal and
/// reported before any other state is touched.
pub struct TermDriver {
    state: Mutex<DriverState>,
    supports_color: bool,
}

impl TermDriver {
    /// Acquire a terminal session.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Io`] if the terminal cannot enter raw
    /// mode or switch to the alternate screen.
    pub fn open() -> Result<Self, DriverError> {
        terminal::enable_raw_mode()?;

        let mut out = io::stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen) {
            let _ = terminal::disable_raw_mode();
            return Err(e.into());
        }

        let supports_color = crossterm::style::available_color_count() >= 8;
        let (columns, rows) = terminal::size()?;
        let screen_frame =
            Rect::from_parts(0, 0, i32::from(columns), i32::from(rows));

        let mut surfaces = HashMap::new();
        let mut root = Surface::new(screen_frame);
        root.dirty = false;
        surfaces.insert(SurfaceId::SCREEN.0, root);

        let driver = Self {
            state: Mutex::new(DriverState {
                out,
                buffer: AnsiBuffer::new(),
                surfaces,
                next_surface: 1,
                pairs: HashMap::new(),
            }),
            supports_color,
        };
        driver.clear_screen();
        Ok(driver)
    }

    fn lock(&self) -> MutexGuard<'_, DriverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a surface's full contents to the state's ANSI buffer and
    /// flush. No-op for clean or unknown surfaces.
    fn flush_surface(state: &mut DriverState, id: u64) {
        let Some(surface) = state.surfaces.get_mut(&id) else {
            return;
        };
        if !surface.dirty {
            return;
        }
        surface.dirty = false;

        let width = surface.frame.size.width;
        let height = surface.frame.size.height;

        for row in 0..height {
            state
                .buffer
                .cursor_move(surface.frame.origin.x, surface.frame.origin.y + row);

            let mut active: Option<AttrToken> = None;
            for col in 0..width {
                let cell = surface.cells[(row * width + col) as usize];
                if cell.glyph == CONTINUATION {
                    continue;
                }
                if cell.attr != active {
                    match cell.attr.and_then(|t| state.pairs.get(&t.0)) {
                        Some(&(foreground, background)) => {
                            state.buffer.set_pair(foreground, background);
                        }
                        None => state.buffer.reset_attrs(),
                    }
                    active = cell.attr;
                }
                state.buffer.push_char(cell.glyph);
            }
            if active.is_some() {
                state.buffer.reset_attrs();
            }
        }

        let _ = state.buffer.flush_to(&mut state.out);
    }
}

impl Driver for TermDriver {
    fn supports_color(&self) -> bool {
        self.supports_color
    }

    fn dimensions(&self) -> Option<Size> {
        terminal::size()
            .ok()
            .map(|(columns, rows)| Size::new(i32::from(columns), i32::from(rows)))
    }

    fn create_surface(&self, frame: Rect) -> Result<SurfaceId, DriverError> {
        if frame.is_empty() || frame.origin.x < 0 || frame.origin.y < 0 {
            return Err(DriverError::SurfaceCreation(frame));
        }

        let mut state = self.lock();
        let id = state.next_surface;
        state.next_surface += 1;
        state.surfaces.insert(id, Surface::new(frame));
        Ok(SurfaceId(id))
    }

    fn destroy_surface(&self, surface: SurfaceId) {
        if surface == SurfaceId::SCREEN {
            return;
        }
        self.lock().surfaces.remove(&surface.0);
    }

    fn move_cursor(&self, surface: SurfaceId, point: Point) {
        if let Some(s) = self.lock().surfaces.get_mut(&surface.0) {
            s.cursor = point;
        }
    }

    fn write_text(&self, surface: SurfaceId, text: &str, attr: Option<AttrToken>) {
        let mut state = self.lock();
        let Some(s) = state.surfaces.get_mut(&surface.0) else {
            return;
        };

        for c in text.chars() {
            if c == '\n' {
                s.cursor = Point::new(0, s.cursor.y + 1);
                continue;
            }
            let glyph_width = c.width().unwrap_or(0) as i32;
            if glyph_width == 0 {
                continue;
            }
            s.put(s.cursor.x, s.cursor.y, TermCell { glyph: c, attr });
            if glyph_width == 2 {
                s.put(
                    s.cursor.x + 1,
                    s.cursor.y,
                    TermCell {
                        glyph: CONTINUATION,
                        attr,
                    },
                );
            }
            s.cursor.x += glyph_width;
        }
    }

    fn draw_border(&self, surface: SurfaceId) {
        let mut state = self.lock();
        let Some(s) = state.surfaces.get_mut(&surface.0) else {
            return;
        };
        let width = s.frame.size.width;
        let height = s.frame.size.height;
        if width < 2 || height < 2 {
            return;
        }

        let edge = |glyph| TermCell { glyph, attr: None };
        for x in 1..width - 1 {
            s.put(x, 0, edge('─'));
            s.put(x, height - 1, edge('─'));
        }
        for y in 1..height - 1 {
            s.put(0, y, edge('│'));
            s.put(width - 1, y, edge('│'));
        }
        s.put(0, 0, edge('┌'));
        s.put(width - 1, 0, edge('┐'));
        s.put(0, height - 1, edge('└'));
        s.put(width - 1, height - 1, edge('┘'));
    }

    fn draw_horizontal_line(&self, surface: SurfaceId, length: i32) {
        let mut state = self.lock();
        let Some(s) = state.surfaces.get_mut(&surface.0) else {
            return;
        };
        let (x, y) = (s.cursor.x, s.cursor.y);
        for i in 0..length.max(0) {
            s.put(x + i, y, TermCell { glyph: '─', attr: None });
        }
    }

    fn draw_vertical_line(&self, surface: SurfaceId, length: i32) {
        let mut state = self.lock();
        let Some(s) = state.surfaces.get_mut(&surface.0) else {
            return;
        };
        let (x, y) = (s.cursor.x, s.cursor.y);
        for i in 0..length.max(0) {
            s.put(x, y + i, TermCell { glyph: '│', attr: None });
        }
    }

    fn refresh_surface(&self, surface: SurfaceId) {
        let mut state = self.lock();
        Self::flush_surface(&mut state, surface.0);
    }

    fn refresh_screen(&self) {
        let mut state = self.lock();
        Self::flush_surface(&mut state, SurfaceId::SCREEN.0);
    }

    fn clear_screen(&self) {
        let size = self.dimensions();
        let mut guard = self.lock();
        // Reborrow so field borrows split instead of going through the
        // guard's DerefMut.
        let state = &mut *guard;

        if let Some(size) = size {
            let frame = Rect::new(Point::ZERO, size);
            let mut root = Surface::new(frame);
            // The physical clear below already blanks the screen.
            root.dirty = false;
            state.surfaces.insert(SurfaceId::SCREEN.0, root);
        } else if let Some(root) = state.surfaces.get_mut(&SurfaceId::SCREEN.0) {
            root.cells.fill(TermCell::BLANK);
            root.cursor = Point::ZERO;
            root.dirty = false;
        }

        state.buffer.reset_attrs();
        state.buffer.clear_screen();
        let _ = state.buffer.flush_to(&mut state.out);
    }

    fn set_cursor_visible(&self, visible: bool) {
        let mut guard = self.lock();
        let state = &mut *guard;
        if visible {
            state.buffer.cursor_show();
        } else {
            state.buffer.cursor_hide();
        }
        let _ = state.buffer.flush_to(&mut state.out);
    }

    fn poll_key(&self) -> Option<KeyCode> {
        // Zero-timeout poll: never blocks the frame.
        match event::poll(Duration::ZERO) {
            Ok(true) => event::read().ok().and_then(keys::convert_event),
            _ => None,
        }
    }

    fn register_pair(&self, token: AttrToken, foreground: Color, background: Color) {
        self.lock().pairs.insert(token.0, (foreground, background));
    }
}

impl Drop for TermDriver {
    fn drop(&mut self) {
        {
            let mut guard = self.lock();
            let state = &mut *guard;
            state.buffer.clear();
            state.buffer.reset_attrs();
            state.buffer.cursor_show();
            let _ = state.buffer.flush_to(&mut state.out);
            let _ = state.out.flush();
        }

        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
