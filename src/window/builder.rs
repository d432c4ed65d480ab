//! `WindowBuilder`: Dynamic, state-driven window descriptions.

use super::managed::{ManagedWindow, Style};
use crate::geometry::{Rect, Size};

/// A render callback invoked with the frame's managed window.
pub type RenderFn = Box<dyn Fn(&ManagedWindow) + Send + Sync>;

/// A window whose geometry, style, and visibility are computed fresh
/// every frame.
///
/// Implementations are queried each iteration of the render loop with
/// the current terminal size, so a builder can reposition, resize, or
/// hide its window as the application's state changes. The returned
/// frame may carry auto-fill and auto-center sentinels; the screen
/// resolves them before any surface exists.
pub trait WindowBuilder: Send + Sync {
    /// Whether the window should appear this frame.
    fn should_render(&self, screen: Size) -> bool {
        let _ = screen;
        true
    }

    /// The requested frame, possibly containing layout sentinels.
    fn desired_frame(&self, screen: Size) -> Rect;

    /// The border style.
    fn style(&self) -> Style {
        Style::Normal
    }

    /// Draw this frame's content into the window.
    fn render(&self, window: &ManagedWindow);
}

/// A registered window: either a fixed frame with a callback, or a
/// builder queried each frame. Registration order is paint order.
pub(crate) enum WindowSpec {
    /// Fixed geometry and style.
    Static {
        frame: Rect,
        style: Style,
        render: RenderFn,
    },
    /// Everything computed per frame.
    Builder(Box<dyn WindowBuilder>),
}

impl WindowSpec {
    /// Resolve this spec to a frame request for the current screen
    /// size, or `None` when it opts out of the frame.
    pub(crate) fn request(&self, screen: Size) -> Option<(Rect, Style)> {
        match self {
            Self::Static { frame, style, .. } => Some((*frame, *style)),
            Self::Builder(builder) => builder
                .should_render(screen)
                .then(|| (builder.desired_frame(screen), builder.style())),
        }
    }

    /// Invoke the spec's render callback.
    pub(crate) fn render(&self, window: &ManagedWindow) {
        match self {
            Self::Static { render, .. } => render(window),
            Self::Builder(builder) => builder.render(window),
        }
    }
}
