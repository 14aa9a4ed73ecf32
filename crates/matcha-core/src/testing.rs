//! Headless harness for exercising an [`App`] without a terminal.

use crate::app::App;
use crate::command::{Emitter, Outcome};
use crate::msg::Event;
use std::sync::{Arc, Mutex};

/// Drives an [`App`]'s init/update/view cycle deterministically.
///
/// Events are fed with [`send`](TestProgram::send); commands returned by the
/// app run to completion *serially*, in order, with their emissions and final
/// messages collected into a pending queue. Call
/// [`drain`](TestProgram::drain) to feed those messages back through
/// `update` until the app settles. A command settling to the quit sentinel
/// sets [`quit_requested`](TestProgram::quit_requested) instead of
/// terminating anything.
///
/// # Example
///
/// ```rust,ignore
/// let mut prog = TestProgram::<Counter>::new().await;
/// prog.send(Event::Key(KeyMsg::new(Key::Char('+')))).await;
/// assert_eq!(prog.app().count, 1);
/// assert!(prog.render().contains("Count: 1"));
/// ```
pub struct TestProgram<A: App> {
    app: A,
    pending: Vec<A::Message>,
    quit_requested: bool,
    failures: Vec<String>,
}

impl<A: App> TestProgram<A> {
    /// Call [`App::init`] and run its startup commands.
    pub async fn new() -> Self {
        let (app, cmds) = A::init();
        let mut program = Self {
            app,
            pending: Vec::new(),
            quit_requested: false,
            failures: Vec::new(),
        };
        program.run_commands(cmds).await;
        program
    }

    /// Feed one event through `update`, then run the returned commands.
    pub async fn send(&mut self, event: Event<A::Message>) {
        let cmds = self.app.update(event);
        self.run_commands(cmds).await;
    }

    /// Feed all pending command messages back through `update`, repeating
    /// until no new messages are produced.
    pub async fn drain(&mut self) {
        while !self.pending.is_empty() {
            let messages: Vec<_> = self.pending.drain(..).collect();
            for msg in messages {
                let cmds = self.app.update(Event::App(msg));
                self.run_commands(cmds).await;
            }
        }
    }

    /// The app state, for assertions.
    pub fn app(&self) -> &A {
        &self.app
    }

    /// Mutable app access, for arranging test state directly.
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    /// Render the current view.
    pub fn render(&self) -> String {
        self.app.view()
    }

    /// Whether any command settled to the quit sentinel.
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Messages produced by commands but not yet fed back through `update`.
    pub fn pending(&self) -> &[A::Message] {
        &self.pending
    }

    /// Error strings from commands that failed, in completion order.
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    async fn run_commands(&mut self, cmds: Vec<crate::command::Command<A::Message>>) {
        for cmd in cmds {
            let emitted = Arc::new(Mutex::new(Vec::new()));
            let sink = emitted.clone();
            let emitter = Emitter::new(move |msg| sink.lock().unwrap().push(msg));
            let settled = cmd.start(emitter).await;
            self.pending.extend(emitted.lock().unwrap().drain(..));
            match settled {
                Ok(Outcome::Message(msg)) => self.pending.push(msg),
                Ok(Outcome::Quit) => self.quit_requested = true,
                Ok(Outcome::Nothing) => {}
                Err(err) => self.failures.push(err.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::msg::{Key, KeyMsg};

    struct Counter {
        count: i64,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum CounterMsg {
        Add(i64),
        Loaded(i64),
    }

    impl App for Counter {
        type Message = CounterMsg;

        fn init() -> (Self, Vec<Command<CounterMsg>>) {
            (Counter { count: 0 }, vec![])
        }

        fn update(&mut self, event: Event<CounterMsg>) -> Vec<Command<CounterMsg>> {
            match event {
                Event::Key(k) if k.key == Key::Char('+') => {
                    self.count += 1;
                    vec![]
                }
                Event::Key(k) if k.key == Key::Char('q') => vec![Command::quit()],
                Event::Key(k) if k.key == Key::Char('l') => {
                    vec![Command::perform(async { 40 }, CounterMsg::Loaded)]
                }
                Event::App(CounterMsg::Add(n)) => {
                    self.count += n;
                    vec![]
                }
                Event::App(CounterMsg::Loaded(n)) => {
                    self.count = n;
                    vec![]
                }
                _ => vec![],
            }
        }

        fn view(&self) -> String {
            format!("Count: {}", self.count)
        }
    }

    #[tokio::test]
    async fn init_produces_clean_state() {
        let prog = TestProgram::<Counter>::new().await;
        assert_eq!(prog.app().count, 0);
        assert!(!prog.quit_requested());
    }

    #[tokio::test]
    async fn send_triggers_update() {
        let mut prog = TestProgram::<Counter>::new().await;
        prog.send(Event::Key(KeyMsg::new(Key::Char('+')))).await;
        prog.send(Event::Key(KeyMsg::new(Key::Char('+')))).await;
        assert_eq!(prog.app().count, 2);
        assert_eq!(prog.render(), "Count: 2");
    }

    #[tokio::test]
    async fn quit_command_is_observed_not_fatal() {
        let mut prog = TestProgram::<Counter>::new().await;
        prog.send(Event::Key(KeyMsg::new(Key::Char('q')))).await;
        assert!(prog.quit_requested());
    }

    #[tokio::test]
    async fn drain_feeds_command_messages_back() {
        let mut prog = TestProgram::<Counter>::new().await;
        prog.send(Event::Key(KeyMsg::new(Key::Char('l')))).await;
        assert_eq!(prog.pending(), &[CounterMsg::Loaded(40)]);
        prog.drain().await;
        assert_eq!(prog.app().count, 40);
        assert!(prog.pending().is_empty());
    }

    #[tokio::test]
    async fn failing_commands_are_recorded() {
        let mut prog = TestProgram::<Counter>::new().await;
        let cmds = vec![Command::try_perform(async { anyhow::bail!("nope") })];
        prog.run_commands(cmds).await;
        assert_eq!(prog.failures().len(), 1);
        assert!(prog.failures()[0].contains("nope"));
    }
}
