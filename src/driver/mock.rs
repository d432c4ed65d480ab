//! `MockDriver`: A scriptable driver for unit tests.
//!
//! Records every call in order and plays back scripted dimensions and
//! keypresses, so screen and window behavior can be asserted without a
//! real terminal.

use super::{AttrToken, Driver, DriverError, KeyCode, SurfaceId};
use crate::color::Color;
use crate::geometry::{Point, Rect, Size};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    CreateSurface(u64, Rect),
    DestroySurface(u64),
    MoveCursor(u64, Point),
    WriteText(u64, String, Option<AttrToken>),
    DrawBorder(u64),
    DrawHorizontalLine(u64, i32),
    DrawVerticalLine(u64, i32),
    RefreshSurface(u64),
    RefreshScreen,
    ClearScreen,
    SetCursorVisible(bool),
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    /// Queued size answers; the last one repeats forever.
    dimensions: VecDeque<Size>,
    current_dimensions: Option<Size>,
    keys: VecDeque<KeyCode>,
    next_surface: u64,
    live_surfaces: Vec<u64>,
    registered_pairs: Vec<(AttrToken, Color, Color)>,
    fail_creates: u32,
}

/// Scriptable in-memory driver.
pub(crate) struct MockDriver {
    state: Mutex<MockState>,
    supports_color: bool,
}

impl MockDriver {
    pub(crate) fn new() -> Self {
        Self::with_dimensions(Size::new(100, 40))
    }

    pub(crate) fn with_dimensions(size: Size) -> Self {
        Self {
            state: Mutex::new(MockState {
                next_surface: 1,
                current_dimensions: Some(size),
                ..MockState::default()
            }),
            supports_color: true,
        }
    }

    pub(crate) fn without_color(mut self) -> Self {
        self.supports_color = false;
        self
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a size change; it takes effect on the next `dimensions`
    /// call and sticks afterwards.
    pub(crate) fn push_dimensions(&self, size: Size) {
        self.lock().dimensions.push_back(size);
    }

    /// Queue a keypress for a future poll.
    pub(crate) fn push_key(&self, key: KeyCode) {
        self.lock().keys.push_back(key);
    }

    /// Make the next `count` surface creations fail.
    pub(crate) fn fail_next_creates(&self, count: u32) {
        self.lock().fail_creates = count;
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub(crate) fn live_surfaces(&self) -> Vec<u64> {
        self.lock().live_surfaces.clone()
    }

    pub(crate) fn registered_pairs(&self) -> Vec<(AttrToken, Color, Color)> {
        self.lock().registered_pairs.clone()
    }

    /// Frames of every surface created so far, in creation order.
    pub(crate) fn created_frames(&self) -> Vec<Rect> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::CreateSurface(_, frame) => Some(*frame),
                _ => None,
            })
            .collect()
    }

    /// Text written to the given surface, concatenated in call order.
    pub(crate) fn written_text(&self, surface: SurfaceId) -> String {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::WriteText(id, text, _) if *id == surface.0 => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Driver for MockDriver {
    fn supports_color(&self) -> bool {
        self.supports_color
    }

    fn dimensions(&self) -> Option<Size> {
        let mut state = self.lock();
        if let Some(next) = state.dimensions.pop_front() {
            state.current_dimensions = Some(next);
        }
        state.current_dimensions
    }

    fn create_surface(&self, frame: Rect) -> Result<SurfaceId, DriverError> {
        // Same rejection rule as the real driver: degenerate or
        // off-screen-origin frames never get a surface.
        if frame.is_empty() || frame.origin.x < 0 || frame.origin.y < 0 {
            return Err(DriverError::SurfaceCreation(frame));
        }

        let mut state = self.lock();
        if state.fail_creates > 0 {
            state.fail_creates -= 1;
            return Err(DriverError::SurfaceCreation(frame));
        }
        let id = state.next_surface;
        state.next_surface += 1;
        state.live_surfaces.push(id);
        state.calls.push(Call::CreateSurface(id, frame));
        Ok(SurfaceId(id))
    }

    fn destroy_surface(&self, surface: SurfaceId) {
        let mut state = self.lock();
        state.live_surfaces.retain(|&id| id != surface.0);
        state.calls.push(Call::DestroySurface(surface.0));
    }

    fn move_cursor(&self, surface: SurfaceId, point: Point) {
        self.lock().calls.push(Call::MoveCursor(surface.0, point));
    }

    fn write_text(&self, surface: SurfaceId, text: &str, attr: Option<AttrToken>) {
        self.lock()
            .calls
            .push(Call::WriteText(surface.0, text.to_owned(), attr));
    }

    fn draw_border(&self, surface: SurfaceId) {
        self.lock().calls.push(Call::DrawBorder(surface.0));
    }

    fn draw_horizontal_line(&self, surface: SurfaceId, length: i32) {
        self.lock()
            .calls
            .push(Call::DrawHorizontalLine(surface.0, length));
    }

    fn draw_vertical_line(&self, surface: SurfaceId, length: i32) {
        self.lock()
            .calls
            .push(Call::DrawVerticalLine(surface.0, length));
    }

    fn refresh_surface(&self, surface: SurfaceId) {
        self.lock().calls.push(Call::RefreshSurface(surface.0));
    }

    fn refresh_screen(&self) {
        self.lock().calls.push(Call::RefreshScreen);
    }

    fn clear_screen(&self) {
        self.lock().calls.push(Call::ClearScreen);
    }

    fn set_cursor_visible(&self, visible: bool) {
        self.lock().calls.push(Call::SetCursorVisible(visible));
    }

    fn poll_key(&self) -> Option<KeyCode> {
        self.lock().keys.pop_front()
    }

    fn register_pair(&self, token: AttrToken, foreground: Color, background: Color) {
        self.lock()
            .registered_pairs
            .push((token, foreground, background));
    }
}
