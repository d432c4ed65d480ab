//! Screen module: Session lifecycle and the per-frame render loop.
//!
//! A [`Screen`] owns the terminal session for its whole lifetime. Each
//! iteration of its cooperative loop polls the terminal size and input,
//! resolves every registered window's declarative frame against the
//! current dimensions, creates and renders per-frame window surfaces,
//! and fires observers in a fixed order:
//!
//! 1. resize (when the terminal size changed)
//! 2. keypress (when a key was pending)
//! 3. window render callbacks, in registration order
//! 4. update tick
//!
//! One mutex guards the screen's mutable state (dimensions, running
//! flag, color flag, window list). It is never held while observers or
//! render callbacks run, so callbacks may freely call back into the
//! screen, e.g. to register more windows or stop the loop.

mod layout;

pub use layout::resolve_frame;

use crate::color::{Color, PairTable};
use crate::driver::{Driver, DriverError, KeyCode, SurfaceId, TermDriver};
use crate::event::Event;
use crate::geometry::{Rect, Size};
use crate::window::{ManagedWindow, Style, Window, WindowBuilder, WindowSpec};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mutable screen state behind the screen's single mutex.
struct ScreenState {
    /// Cached terminal width in columns.
    width: i32,
    /// Cached terminal height in rows.
    height: i32,
    /// Whether the render loop should keep iterating.
    running: bool,
    /// Whether styled prints emit color attributes.
    has_colors: bool,
    /// Registered windows, insertion order = paint order. Append-only.
    specs: Vec<Arc<WindowSpec>>,
}

/// The terminal session and its window set.
///
/// Constructing a screen acquires the terminal (raw mode, alternate
/// screen, color pairs); dropping it restores the terminal on every
/// exit path. There is no global instance: share the screen explicitly,
/// typically as an `Arc`, when callbacks need to reach it.
pub struct Screen {
    driver: Arc<dyn Driver>,
    palette: Arc<PairTable>,
    state: Mutex<ScreenState>,
    on_resize: Event<()>,
    on_key_press: Event<KeyCode>,
    on_update: Event<()>,
}

impl Screen {
    /// Acquire the terminal and build a screen on it.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Io`] when the terminal cannot enter raw
    /// mode. This is fatal: no screen exists and the terminal is left
    /// untouched.
    pub fn new() -> Result<Self, DriverError> {
        let driver = TermDriver::open()?;
        Ok(Self::with_driver(Arc::new(driver)))
    }

    /// Build a screen on an already-acquired driver session.
    ///
    /// Color pairs are registered here, once; the pair table is
    /// immutable afterwards.
    pub fn with_driver(driver: Arc<dyn Driver>) -> Self {
        let has_colors = driver.supports_color();
        let palette = if has_colors {
            Arc::new(PairTable::build(driver.as_ref()))
        } else {
            Arc::new(PairTable::empty())
        };
        let size = driver.dimensions().unwrap_or(Size::ZERO);

        Self {
            driver,
            palette,
            state: Mutex::new(ScreenState {
                width: size.width,
                height: size.height,
                running: false,
                has_colors,
                specs: Vec::new(),
            }),
            on_resize: Event::new(),
            on_key_press: Event::new(),
            on_update: Event::new(),
        }
    }

    /// Cached terminal width in columns.
    pub fn width(&self) -> i32 {
        self.state().width
    }

    /// Cached terminal height in rows.
    pub fn height(&self) -> i32 {
        self.state().height
    }

    /// Whether styled prints currently emit color attributes.
    pub fn has_colors(&self) -> bool {
        self.state().has_colors
    }

    /// Whether the render loop is running.
    pub fn is_running(&self) -> bool {
        self.state().running
    }

    /// Number of registered windows.
    pub fn window_count(&self) -> usize {
        self.state().specs.len()
    }

    /// Observers fired when the terminal size changes.
    pub const fn on_resize(&self) -> &Event<()> {
        &self.on_resize
    }

    /// Observers fired when a key is pressed.
    pub const fn on_key_press(&self) -> &Event<KeyCode> {
        &self.on_key_press
    }

    /// Observers fired once per loop iteration, after windows render.
    pub const fn on_update(&self) -> &Event<()> {
        &self.on_update
    }

    /// Stop emitting color attributes for the rest of the session.
    pub fn disable_colors(&self) {
        self.state().has_colors = false;
    }

    /// Clear the physical screen.
    pub fn clear(&self) {
        self.driver.clear_screen();
    }

    /// Flush pending root-surface output to the physical screen.
    pub fn refresh(&self) {
        self.driver.refresh_screen();
    }

    /// Print text on the root surface at its cursor.
    pub fn print(&self, text: &str) {
        self.driver.write_text(SurfaceId::SCREEN, text, None);
    }

    /// Print on the root surface with a foreground color.
    pub fn print_fg(&self, foreground: Color, text: &str) {
        self.print_colored(foreground, Color::Clear, text);
    }

    /// Print on the root surface with explicit colors. Without color
    /// support the text prints plain.
    pub fn print_colored(&self, foreground: Color, background: Color, text: &str) {
        let attr = self
            .has_colors()
            .then(|| self.palette.pair_for(foreground, background));
        self.driver.write_text(SurfaceId::SCREEN, text, attr);
    }

    /// Register a window with a fixed frame and style.
    ///
    /// The frame may carry auto-fill and auto-center sentinels; they
    /// resolve against the live terminal size every frame. Safe to call
    /// while the loop runs: the window appears no later than the next
    /// frame, and windows are never removed.
    pub fn add_window(
        &self,
        frame: Rect,
        style: Style,
        render: impl Fn(&ManagedWindow) + Send + Sync + 'static,
    ) {
        self.state().specs.push(Arc::new(WindowSpec::Static {
            frame,
            style,
            render: Box::new(render),
        }));
    }

    /// Register a dynamic window description, queried every frame.
    pub fn add_builder(&self, builder: impl WindowBuilder + 'static) {
        self.state()
            .specs
            .push(Arc::new(WindowSpec::Builder(Box::new(builder))));
    }

    /// Create a plain, caller-driven window on this session.
    ///
    /// The frame must be concrete (no sentinels); degenerate frames
    /// fail with [`DriverError::SurfaceCreation`].
    pub fn create_window(&self, frame: Rect) -> Result<Window, DriverError> {
        Window::create(
            self.driver.clone(),
            frame,
            self.palette.clone(),
            self.has_colors(),
        )
    }

    /// Run the render loop on the calling thread until [`stop`] is
    /// observed.
    ///
    /// Idempotent: calling `start` while the loop is already running
    /// returns immediately with no side effects. On loop exit the
    /// screen is cleared and the hardware cursor restored; the terminal
    /// session itself is released when the screen drops.
    ///
    /// The loop polls input with zero timeout and redraws every
    /// iteration without sleeping, so iterations are assumed to be
    /// bounded by terminal refresh cost.
    ///
    /// [`stop`]: Self::stop
    pub fn start(&self) {
        {
            let mut state = self.state();
            if state.running {
                return;
            }
            state.running = true;
        }

        self.driver.set_cursor_visible(false);

        loop {
            if !self.state().running {
                break;
            }

            let polled = self.driver.dimensions();

            let mut resize_pending = false;
            let key;
            let screen_size;
            {
                let mut state = self.state();
                if let Some(size) = polled {
                    if size.width != state.width || size.height != state.height {
                        state.width = size.width;
                        state.height = size.height;
                        self.driver.clear_screen();
                        resize_pending = true;
                    }
                }
                key = self.driver.poll_key();
                screen_size = Size::new(state.width, state.height);
            }

            // Observers run unlocked, resize before keypress.
            if resize_pending {
                self.on_resize.fire(&());
            }
            if let Some(key) = key {
                self.on_key_press.fire(&key);
            }

            let (specs, colors_enabled) = {
                let state = self.state();
                (state.specs.clone(), state.has_colors)
            };

            // Create and render every window before refreshing any of
            // them; interleaving surface flushes with creation tears on
            // some terminals.
            let mut rendered = Vec::with_capacity(specs.len());
            for spec in &specs {
                let Some((requested, style)) = spec.request(screen_size) else {
                    continue;
                };
                let Some(frame) = resolve_frame(requested, screen_size) else {
                    continue;
                };
                // Surface creation failure skips just this window.
                let Ok(window) = ManagedWindow::create(
                    self.driver.clone(),
                    frame,
                    style,
                    self.palette.clone(),
                    colors_enabled,
                ) else {
                    continue;
                };
                spec.render(&window);
                rendered.push(window);
            }

            for window in &rendered {
                window.refresh();
            }
            self.on_update.fire(&());
            self.driver.refresh_screen();

            // Windows are per-frame: surfaces die here, and the next
            // iteration creates fresh ones even for identical specs.
            drop(rendered);
        }

        self.driver.clear_screen();
        self.driver.refresh_screen();
        self.driver.set_cursor_visible(true);
    }

    /// Ask the render loop to exit.
    ///
    /// Cooperative: the loop observes the flag at the top of its next
    /// iteration, so the loop may still be finishing a frame when this
    /// returns.
    pub fn stop(&self) {
        self.state().running = false;
    }

    fn state(&self) -> MutexGuard<'_, ScreenState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("Screen")
            .field("width", &state.width)
            .field("height", &state.height)
            .field("running", &state.running)
            .field("has_colors", &state.has_colors)
            .field("windows", &state.specs.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::mock::{Call, MockDriver};
    use crate::geometry::Point;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Build a screen on a 100x40 mock terminal and stop it after
    /// `frames` update ticks.
    fn screen_for(driver: &Arc<MockDriver>, frames: usize) -> Arc<Screen> {
        let screen = Arc::new(Screen::with_driver(driver.clone() as Arc<dyn Driver>));
        let handle = screen.clone();
        let remaining = AtomicUsize::new(frames);
        screen.on_update().subscribe(move |()| {
            if remaining.fetch_sub(1, Ordering::SeqCst) <= 1 {
                handle.stop();
            }
        });
        screen
    }

    fn index_of(calls: &[Call], wanted: &Call) -> usize {
        calls.iter().position(|c| c == wanted).unwrap()
    }

    #[test]
    fn test_renders_and_refreshes_in_registration_order() {
        let driver = Arc::new(MockDriver::new());
        let screen = screen_for(&driver, 1);

        screen.add_window(Rect::from_parts(0, 0, 30, 10), Style::Normal, |w| {
            w.print("first");
        });
        screen.add_window(Rect::from_parts(10, 0, 30, 10), Style::Normal, |w| {
            w.print("second");
        });
        screen.start();

        let calls = driver.calls();
        let create_a = index_of(&calls, &Call::CreateSurface(1, Rect::from_parts(0, 0, 30, 10)));
        let create_b = index_of(&calls, &Call::CreateSurface(2, Rect::from_parts(10, 0, 30, 10)));
        let refresh_a = index_of(&calls, &Call::RefreshSurface(1));
        let refresh_b = index_of(&calls, &Call::RefreshSurface(2));
        let refresh_screen = index_of(&calls, &Call::RefreshScreen);

        // Both windows exist before either refreshes; refresh order is
        // creation order; the main screen refreshes last.
        assert!(create_a < create_b);
        assert!(create_b < refresh_a);
        assert!(refresh_a < refresh_b);
        assert!(refresh_b < refresh_screen);
        assert_eq!(driver.written_text(SurfaceId(1)), "first");
        assert_eq!(driver.written_text(SurfaceId(2)), "second");
        assert!(driver.live_surfaces().is_empty());
    }

    #[test]
    fn test_teardown_restores_cursor() {
        let driver = Arc::new(MockDriver::new());
        let screen = screen_for(&driver, 1);
        screen.start();

        let calls = driver.calls();
        assert_eq!(calls.first(), Some(&Call::SetCursorVisible(false)));
        assert_eq!(
            &calls[calls.len() - 3..],
            &[
                Call::ClearScreen,
                Call::RefreshScreen,
                Call::SetCursorVisible(true)
            ]
        );
        assert!(!screen.is_running());
    }

    #[test]
    fn test_start_is_idempotent() {
        let driver = Arc::new(MockDriver::new());
        let screen = Arc::new(Screen::with_driver(driver.clone() as Arc<dyn Driver>));
        let handle = screen.clone();
        screen.on_update().subscribe(move |()| {
            // Reentrant start while running must return untouched.
            handle.start();
            handle.stop();
        });
        screen.start();

        let hides = driver
            .calls()
            .iter()
            .filter(|c| **c == Call::SetCursorVisible(false))
            .count();
        assert_eq!(hides, 1);
    }

    #[test]
    fn test_resize_updates_size_clears_and_fires() {
        let driver = Arc::new(MockDriver::new());
        let screen = screen_for(&driver, 1);
        // Queued after construction so the first loop iteration is the
        // one that observes the change.
        driver.push_dimensions(Size::new(80, 30));

        let resized = Arc::new(AtomicBool::new(false));
        let flag = resized.clone();
        let handle = screen.clone();
        screen.on_resize().subscribe(move |()| {
            flag.store(true, Ordering::SeqCst);
            assert_eq!(handle.width(), 80);
            assert_eq!(handle.height(), 30);
        });
        screen.start();

        assert!(resized.load(Ordering::SeqCst));
        // The resize cleared the screen before observers fired.
        let calls = driver.calls();
        assert!(index_of(&calls, &Call::ClearScreen) < index_of(&calls, &Call::RefreshScreen));
    }

    #[test]
    fn test_keypress_reaches_observers() {
        let driver = Arc::new(MockDriver::new());
        driver.push_key(KeyCode::Char('q'));
        let screen = screen_for(&driver, 1);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        screen.on_key_press().subscribe(move |key| {
            log.lock().unwrap().push(*key);
        });
        screen.start();

        assert_eq!(*seen.lock().unwrap(), vec![KeyCode::Char('q')]);
    }

    #[test]
    fn test_window_added_while_running_appears_next_frame() {
        let driver = Arc::new(MockDriver::new());
        let screen = Arc::new(Screen::with_driver(driver.clone() as Arc<dyn Driver>));

        let handle = screen.clone();
        let ticks = AtomicUsize::new(0);
        screen.on_update().subscribe(move |()| {
            match ticks.fetch_add(1, Ordering::SeqCst) {
                0 => handle.add_window(Rect::from_parts(0, 0, 20, 10), Style::Normal, |_| {}),
                _ => handle.stop(),
            }
        });
        screen.start();

        assert_eq!(screen.window_count(), 1);
        assert_eq!(driver.created_frames(), vec![Rect::from_parts(0, 0, 20, 10)]);
    }

    #[test]
    fn test_sentinel_frames_resolve_against_terminal() {
        let driver = Arc::new(MockDriver::new());
        let screen = screen_for(&driver, 1);

        // Fill the full width; center; off-screen (discarded).
        screen.add_window(Rect::from_parts(0, 0, 0, 10), Style::Normal, |_| {});
        screen.add_window(Rect::from_parts(-1, 5, 20, 10), Style::Normal, |_| {});
        screen.add_window(Rect::from_parts(200, 10, 100, 10), Style::Normal, |_| {});
        screen.start();

        assert_eq!(
            driver.created_frames(),
            vec![
                Rect::from_parts(0, 0, 100, 10),
                Rect::from_parts(40, 5, 20, 10),
            ]
        );
    }

    #[test]
    fn test_overwide_centered_window_is_skipped() {
        let driver = Arc::new(MockDriver::new());
        let screen = screen_for(&driver, 1);

        let rendered = Arc::new(AtomicBool::new(false));
        let flag = rendered.clone();
        // Centering a 150-wide frame on a 100-wide terminal resolves to
        // a negative origin; the driver rejects the surface and the
        // window sits this frame out.
        screen.add_window(Rect::from_parts(-1, 0, 150, 10), Style::Normal, move |_| {
            flag.store(true, Ordering::SeqCst);
        });
        screen.start();

        assert!(!rendered.load(Ordering::SeqCst));
        assert!(driver.created_frames().is_empty());
    }

    #[test]
    fn test_surface_failure_skips_only_that_window() {
        let driver = Arc::new(MockDriver::new());
        driver.fail_next_creates(1);
        let screen = screen_for(&driver, 1);

        let first_rendered = Arc::new(AtomicBool::new(false));
        let flag = first_rendered.clone();
        screen.add_window(Rect::from_parts(0, 0, 30, 10), Style::Normal, move |_| {
            flag.store(true, Ordering::SeqCst);
        });
        screen.add_window(Rect::from_parts(0, 10, 30, 10), Style::Normal, |w| {
            w.print("ok");
        });
        screen.start();

        assert!(!first_rendered.load(Ordering::SeqCst));
        assert_eq!(driver.created_frames(), vec![Rect::from_parts(0, 10, 30, 10)]);
        assert_eq!(driver.written_text(SurfaceId(1)), "ok");
    }

    #[test]
    fn test_builder_window_queried_each_frame() {
        struct Centered;

        impl WindowBuilder for Centered {
            fn desired_frame(&self, _screen: Size) -> Rect {
                Rect::from_parts(-1, -1, 20, 10)
            }

            fn style(&self) -> Style {
                Style::Boxed
            }

            fn render(&self, window: &ManagedWindow) {
                window.print("centered");
            }
        }

        let driver = Arc::new(MockDriver::new());
        let screen = screen_for(&driver, 1);
        screen.add_builder(Centered);
        screen.start();

        assert_eq!(driver.created_frames(), vec![Rect::from_parts(40, 15, 20, 10)]);
        assert!(driver.calls().contains(&Call::DrawBorder(1)));
        assert_eq!(driver.written_text(SurfaceId(1)), "centered");
    }

    #[test]
    fn test_hidden_builder_creates_no_surface() {
        struct Hidden;

        impl WindowBuilder for Hidden {
            fn should_render(&self, _screen: Size) -> bool {
                false
            }

            fn desired_frame(&self, _screen: Size) -> Rect {
                Rect::from_parts(0, 0, 20, 10)
            }

            fn render(&self, _window: &ManagedWindow) {
                panic!("hidden builder must not render");
            }
        }

        let driver = Arc::new(MockDriver::new());
        let screen = screen_for(&driver, 1);
        screen.add_builder(Hidden);
        screen.start();

        assert!(driver.created_frames().is_empty());
    }

    #[test]
    fn test_root_print_targets_screen_surface() {
        let driver = Arc::new(MockDriver::new());
        let screen = Screen::with_driver(driver.clone() as Arc<dyn Driver>);

        screen.print("plain ");
        screen.print_fg(Color::Green, "green");
        screen.refresh();

        assert_eq!(driver.written_text(SurfaceId::SCREEN), "plain green");
        let attrs: Vec<_> = driver
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::WriteText(0, _, attr) => Some(attr.is_some()),
                _ => None,
            })
            .collect();
        assert_eq!(attrs, vec![false, true]);
    }

    #[test]
    fn test_disable_colors_turns_off_attributes() {
        let driver = Arc::new(MockDriver::new());
        let screen = Screen::with_driver(driver.clone() as Arc<dyn Driver>);
        assert!(screen.has_colors());

        screen.disable_colors();
        screen.print_colored(Color::Red, Color::Blue, "mono");

        assert!(!screen.has_colors());
        assert!(driver
            .calls()
            .contains(&Call::WriteText(0, "mono".to_owned(), None)));
    }

    #[test]
    fn test_plain_window_on_screen_session() {
        let driver = Arc::new(MockDriver::new());
        let screen = Screen::with_driver(driver.clone() as Arc<dyn Driver>);

        let window = screen.create_window(Rect::from_parts(5, 5, 20, 10)).unwrap();
        window.move_to(Point::new(0, 0));
        window.print("pinned");
        window.refresh();

        assert_eq!(driver.written_text(SurfaceId(1)), "pinned");
    }
}
