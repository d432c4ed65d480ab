//! Window module: Surfaces with styled, clamped text output.
//!
//! This module contains:
//! - [`ManagedWindow`]: a per-frame window with cursor tracking, text
//!   truncation, and ruler drawing, handed to render callbacks
//! - [`Window`]: a plain unmanaged window for callers that drive their
//!   own drawing and refreshing
//! - [`WindowBuilder`]: the capability contract for windows whose
//!   geometry and visibility are computed fresh every frame
//!
//! Managed windows live for exactly one render pass: the screen creates
//! them, invokes the render callback, refreshes them, and drops them.
//! Callers must not retain one across frames.

mod builder;
mod managed;
mod plain;

pub use builder::{RenderFn, WindowBuilder};
pub(crate) use builder::WindowSpec;
pub use managed::{printable_text, ManagedWindow, Style};
pub use plain::Window;
