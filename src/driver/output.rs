//! `AnsiBuffer`: Single-syscall output buffer for ANSI sequences.

use crate::color::Color;
use std::io::Write;

/// Pre-allocated buffer for building ANSI escape sequences.
///
/// A surface refresh accumulates every sequence here and flushes in a
/// single `write()` syscall to prevent tearing on slow terminals.
pub(crate) struct AnsiBuffer {
    data: Vec<u8>,
}

impl AnsiBuffer {
    /// Create a buffer sized for a typical refresh (4KB).
    pub(crate) fn new() -> Self {
        Self {
            data: Vec::with_capacity(4096),
        }
    }

    /// Clear the buffer for reuse.
    #[inline]
    pub(crate) fn clear(&mut self) {
        self.data.clear();
    }

    /// Check if buffer is empty.
    #[cfg(test)]
    pub(crate) const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append a string verbatim.
    #[cfg(test)]
    pub(crate) fn push_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    /// Append a single character.
    #[inline]
    pub(crate) fn push_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.data.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    /// Move the hardware cursor to a zero-based (x, y) position.
    #[inline]
    pub(crate) fn cursor_move(&mut self, x: i32, y: i32) {
        // CSI row ; col H (1-indexed)
        write!(self.data, "\x1b[{};{}H", y + 1, x + 1).unwrap();
    }

    /// Hide the hardware cursor.
    #[inline]
    pub(crate) fn cursor_hide(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25l");
    }

    /// Show the hardware cursor.
    #[inline]
    pub(crate) fn cursor_show(&mut self) {
        self.data.extend_from_slice(b"\x1b[?25h");
    }

    /// Select a foreground/background pair from the fixed palette.
    #[inline]
    pub(crate) fn set_pair(&mut self, foreground: Color, background: Color) {
        write!(
            self.data,
            "\x1b[{};{}m",
            foreground.fg_code(),
            background.bg_code()
        )
        .unwrap();
    }

    /// Reset all attributes to the terminal default.
    #[inline]
    pub(crate) fn reset_attrs(&mut self) {
        self.data.extend_from_slice(b"\x1b[0m");
    }

    /// Clear the entire screen.
    #[inline]
    pub(crate) fn clear_screen(&mut self) {
        self.data.extend_from_slice(b"\x1b[2J");
    }

    /// Flush to a writer in a single syscall and clear for reuse.
    pub(crate) fn flush_to<W: Write>(&mut self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.data)?;
        writer.flush()?;
        self.data.clear();
        Ok(())
    }
}
