//! # Mullion
//!
//! A cooperative terminal windowing toolkit.
//!
//! Mullion owns the terminal session through a [`Screen`], lets you
//! register rectangular windows with declarative frames (auto-sizing
//! and auto-centering sentinels included), and runs a single-threaded
//! render loop that polls for resize and keyboard input once per frame
//! and re-renders every window from scratch.
//!
//! ## Core Concepts
//!
//! - **Per-frame windows**: render callbacks receive a fresh
//!   [`ManagedWindow`] every frame; surfaces never outlive a frame
//! - **Declarative frames**: a size `<= 0` fills the remaining screen,
//!   a negative origin centers on that axis
//! - **Ordered observers**: resize, keypress, and update streams fire
//!   synchronously on the loop thread, in subscription order
//! - **One lock per owner**: the screen guards its own state; callbacks
//!   always run unlocked and may call back into the screen
//!
//! ## Example
//!
//! ```rust,ignore
//! use mullion::{Rect, Screen, Style};
//! use std::sync::Arc;
//!
//! let screen = Arc::new(Screen::new()?);
//! screen.add_window(Rect::from_parts(-1, -1, 40, 10), Style::Boxed, |w| {
//!     w.print_line("hello, world");
//! });
//!
//! let handle = screen.clone();
//! screen.on_key_press().subscribe(move |_| handle.stop());
//! screen.start();
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod color;
pub mod driver;
pub mod event;
pub mod geometry;
pub mod screen;
pub mod window;

// Re-exports for convenience
pub use color::{Color, PairTable};
pub use driver::{AttrToken, Driver, DriverError, KeyCode, SurfaceId, TermDriver};
pub use event::Event;
pub use geometry::{Point, Rect, Size};
pub use screen::{resolve_frame, Screen};
pub use window::{printable_text, ManagedWindow, RenderFn, Style, Window, WindowBuilder};
