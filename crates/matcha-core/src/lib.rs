//! Interactive runtime core for the **matcha** terminal-UI toolkit.
//!
//! `matcha-core` turns raw terminal input and asynchronous side effects into
//! a single ordered stream of application messages. Rendering is someone
//! else's job: your [`App::view`] produces a string, and everything visual
//! beyond that lives outside this crate.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`EventBus`] | Unifies input sources and command execution into one message stream |
//! | [`Command`] | A deferred side effect that emits progress and settles to one [`Outcome`] |
//! | [`Event`] | The message union: keys, resizes, mouse, application messages |
//! | [`App`] | Top-level application trait (init / update / view) |
//! | [`Program`] | Wires an [`App`] to a real terminal and drives the loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for unit-testing an [`App`] |
//!
//! # Architecture
//!
//! 1. **connect** -- An I/O adapter ([`StdinIo`], or anything implementing
//!    [`IoSource`]) delivers raw bytes and resize notices to the bus, which
//!    decodes them and forwards every resulting [`Event`] to subscribers.
//! 2. **update** -- The application loop feeds each event to
//!    [`App::update`], which mutates state and returns new [`Command`]s.
//! 3. **execute** -- Each command runs as its own task, emitting intermediate
//!    messages through the bus and settling to a message, the quit sentinel,
//!    or nothing.
//! 4. **repeat** -- The bus's output feeds back into the loop until a
//!    command settles to quit.
//!
//! # Quick example
//!
//! ```ignore
//! use matcha_core::{App, Command, Event, Key, Program};
//!
//! struct Counter { count: i32 }
//!
//! #[derive(Clone)]
//! enum Msg {}
//!
//! impl App for Counter {
//!     type Message = Msg;
//!
//!     fn init() -> (Self, Vec<Command<Msg>>) {
//!         (Counter { count: 0 }, vec![])
//!     }
//!
//!     fn update(&mut self, event: Event<Msg>) -> Vec<Command<Msg>> {
//!         match event {
//!             Event::Key(k) if k.key == Key::Char('+') => self.count += 1,
//!             Event::Key(k) if k.key == Key::Char('q') => return vec![Command::quit()],
//!             _ => {}
//!         }
//!         vec![]
//!     }
//!
//!     fn view(&self) -> String {
//!         format!("Count: {}", self.count)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     matcha_core::run::<Counter>().await.unwrap();
//! }
//! ```

pub mod app;
pub mod bus;
pub mod command;
pub mod decode;
pub mod io;
pub mod msg;
pub mod runtime;
pub mod testing;

pub use app::{App, RunOptions};
pub use bus::{EventBus, Subscription};
pub use command::{Command, Emitter, Outcome};
pub use decode::decode_key;
pub use io::{IoSource, StdinIo};
pub use msg::{Event, Key, KeyMsg, Modifiers, MouseAction, MouseButton, MouseMsg, ResizeMsg};
pub use runtime::{Program, RuntimeError};

/// Run an app with default options.
pub async fn run<A: App>() -> Result<A, RuntimeError> {
    Program::<A>::new().run().await
}

/// Run with custom screen options.
pub async fn run_with<A: App>(options: RunOptions) -> Result<A, RuntimeError> {
    Program::<A>::with_options(options).run().await
}
