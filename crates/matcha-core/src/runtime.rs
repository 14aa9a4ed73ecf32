use crate::app::{App, RunOptions};
use crate::bus::EventBus;
use crate::io::StdinIo;
use crate::msg::Event;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{stdout, Write};
use tokio::sync::mpsc;

/// Errors that can occur while initializing or running a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One step of the driver loop, fed by the bus callbacks.
enum Step<M> {
    Event(Event<M>),
    Quit,
}

/// Wires an [`App`] to a real terminal and drives the event cycle.
///
/// The program subscribes to its own [`EventBus`], connects stdin and resize
/// notifications, runs every command the app returns, and re-renders the
/// app's view whenever its output changes. It returns the final app state
/// once a command settles to the quit sentinel.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::main]
/// async fn main() -> Result<(), matcha_core::RuntimeError> {
///     let final_state = Program::<MyApp>::new().run().await?;
///     Ok(())
/// }
/// ```
pub struct Program<A: App> {
    app: A,
    bus: EventBus<A::Message>,
    options: RunOptions,
    init_cmds: Vec<crate::command::Command<A::Message>>,
}

impl<A: App> Program<A> {
    /// Create a program with default options.
    pub fn new() -> Self {
        Self::with_options(RunOptions::default())
    }

    /// Create a program with custom screen options.
    pub fn with_options(options: RunOptions) -> Self {
        let (app, init_cmds) = A::init();
        Self {
            app,
            bus: EventBus::new(),
            options,
            init_cmds,
        }
    }

    /// The program's bus, for injecting events from outside the terminal
    /// (external processes, test drivers).
    pub fn bus(&self) -> &EventBus<A::Message> {
        &self.bus
    }

    /// Run until a quit handler fires. Returns the final app state.
    pub async fn run(mut self) -> Result<A, RuntimeError> {
        install_panic_hook(self.options);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();
        let _events = self.bus.on(move |ev| {
            let _ = event_tx.send(Step::Event(ev));
        });
        let _quit = self.bus.on_quit(move || {
            let _ = tx.send(Step::Quit);
        });

        let io = StdinIo::new()?;
        enter_screen(self.options)?;
        let _conn = self.bus.connect_io(io);

        for cmd in self.init_cmds.drain(..) {
            self.bus.run_cmd(cmd);
        }

        let result = self.drive(&mut rx).await;

        self.bus.dispose();
        leave_screen(self.options)?;
        result?;
        Ok(self.app)
    }

    async fn drive(&mut self, rx: &mut mpsc::UnboundedReceiver<Step<A::Message>>) -> Result<(), RuntimeError> {
        let mut last_frame = String::new();
        self.redraw(&mut last_frame)?;

        while let Some(step) = rx.recv().await {
            match step {
                Step::Quit => return Ok(()),
                Step::Event(event) => {
                    for cmd in self.app.update(event) {
                        self.bus.run_cmd(cmd);
                    }
                    self.redraw(&mut last_frame)?;
                }
            }
        }
        Ok(())
    }

    fn redraw(&self, last_frame: &mut String) -> Result<(), RuntimeError> {
        let frame = self.app.view();
        if frame != *last_frame {
            draw(&frame)?;
            *last_frame = frame;
        }
        Ok(())
    }
}

impl<A: App> Default for Program<A> {
    fn default() -> Self {
        Self::new()
    }
}

fn draw(frame: &str) -> std::io::Result<()> {
    let mut out = stdout();
    execute!(out, cursor::MoveTo(0, 0), Clear(ClearType::All))?;
    // Raw mode does not translate \n to \r\n; do it here.
    for (i, line) in frame.split('\n').enumerate() {
        if i > 0 {
            out.write_all(b"\r\n")?;
        }
        out.write_all(line.as_bytes())?;
    }
    out.flush()
}

fn enter_screen(options: RunOptions) -> std::io::Result<()> {
    let mut out = stdout();
    if options.alt_screen {
        execute!(out, EnterAlternateScreen)?;
    }
    if options.hide_cursor {
        execute!(out, cursor::Hide)?;
    }
    if options.mouse {
        execute!(out, EnableMouseCapture)?;
    }
    Ok(())
}

fn leave_screen(options: RunOptions) -> std::io::Result<()> {
    // Best-effort: restore as much terminal state as possible even if
    // individual steps fail.
    let mut out = stdout();
    if options.mouse {
        execute!(out, DisableMouseCapture).ok();
    }
    if options.hide_cursor {
        execute!(out, cursor::Show).ok();
    }
    if options.alt_screen {
        execute!(out, LeaveAlternateScreen).ok();
    }
    Ok(())
}

/// Restore the terminal before the default panic output, so a panicking app
/// does not leave the shell in raw mode on the alternate screen. Installed
/// once per process.
fn install_panic_hook(options: RunOptions) {
    use std::sync::Once;
    static HOOK_INSTALLED: Once = Once::new();
    HOOK_INSTALLED.call_once(move || {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = crossterm::terminal::disable_raw_mode();
            let _ = leave_screen(options);
            original_hook(info);
        }));
    });
}
