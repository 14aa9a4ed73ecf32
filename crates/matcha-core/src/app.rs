use crate::command::Command;
use crate::msg::Event;

/// The top-level application trait: an **init -> update -> view** cycle.
///
/// The runtime feeds every bus event (decoded keys, resizes, application
/// messages produced by commands) to [`update`](App::update), runs the
/// returned commands through the bus, and re-renders
/// [`view`](App::view) after each change. The cycle ends when a command
/// settles to the quit sentinel.
///
/// # Example
///
/// ```rust,ignore
/// use matcha_core::{App, Command, Event, Key};
///
/// struct Counter { count: i32 }
///
/// #[derive(Clone)]
/// enum Msg { Loaded(i32) }
///
/// impl App for Counter {
///     type Message = Msg;
///
///     fn init() -> (Self, Vec<Command<Msg>>) {
///         (Counter { count: 0 }, vec![])
///     }
///
///     fn update(&mut self, event: Event<Msg>) -> Vec<Command<Msg>> {
///         match event {
///             Event::Key(k) if k.key == Key::Char('+') => self.count += 1,
///             Event::Key(k) if k.key == Key::Char('q') => return vec![Command::quit()],
///             Event::App(Msg::Loaded(n)) => self.count = n,
///             _ => {}
///         }
///         vec![]
///     }
///
///     fn view(&self) -> String {
///         format!("Count: {}", self.count)
///     }
/// }
/// ```
pub trait App: Sized + Send + 'static {
    /// The application's message type, carried inside [`Event::App`].
    type Message: Clone + Send + 'static;

    /// Create the initial state and any startup commands.
    fn init() -> (Self, Vec<Command<Self::Message>>);

    /// Process one event, mutate state, and return commands for side effects.
    fn update(&mut self, event: Event<Self::Message>) -> Vec<Command<Self::Message>>;

    /// Render the current state to a string. Must be a pure function of
    /// `&self`; the runtime skips redrawing when the output is unchanged.
    fn view(&self) -> String;
}

/// Terminal appearance options, consumed by the runtime's screen controller
/// at startup and shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Render in the alternate screen buffer (default: true).
    pub alt_screen: bool,
    /// Hide the cursor while running (default: true).
    pub hide_cursor: bool,
    /// Capture mouse events (default: false).
    pub mouse: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            alt_screen: true,
            hide_cursor: true,
            mouse: false,
        }
    }
}
