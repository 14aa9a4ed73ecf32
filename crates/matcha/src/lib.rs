//! **matcha** -- the interactive runtime core of a terminal-UI toolkit.
//!
//! This is the umbrella crate that re-exports everything from a single
//! dependency:
//!
//! ```toml
//! [dependencies]
//! matcha = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`matcha_core`] at the crate root ([`App`],
//!   [`Command`], [`EventBus`], [`Program`], [`run`], [`run_with`], etc.).
//! * The [`input`] module re-exports everything from [`matcha_input`]
//!   (key maps, bindings, the layered input stack).
//! * [`crossterm`] and [`tokio`] are re-exported so downstream crates do not
//!   need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use matcha::{App, Command, Event, Key};
//!
//! struct Hello;
//!
//! #[derive(Clone)]
//! enum Msg {}
//!
//! impl App for Hello {
//!     type Message = Msg;
//!
//!     fn init() -> (Self, Vec<Command<Msg>>) {
//!         (Hello, vec![])
//!     }
//!     fn update(&mut self, event: Event<Msg>) -> Vec<Command<Msg>> {
//!         match event {
//!             Event::Key(k) if k.key == Key::Char('q') => vec![Command::quit()],
//!             _ => vec![],
//!         }
//!     }
//!     fn view(&self) -> String {
//!         "Hello, matcha! Press q to quit.".into()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     matcha::run::<Hello>().await.unwrap();
//! }
//! ```

pub use matcha_core::*;
pub mod input {
    pub use matcha_input::*;
}

// Re-export dependencies for use in downstream crates.
pub use crossterm;
pub use tokio;
