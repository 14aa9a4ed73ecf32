//! Key maps and layered input routing for the **matcha** runtime.
//!
//! Two pieces cooperate to route one physical keyboard between competing UI
//! layers without any of them knowing about the others:
//!
//! * [`KeyMap`] -- an ordered registry of key bindings with groups, per-
//!   binding enable flags, and a `+`-joined descriptor grammar
//!   (`"ctrl+shift+p"`).
//! * [`InputStack`] -- a stack of opaque-or-passthrough layers dispatching
//!   each key event top-down, yielding modal, overlay, and base-layer focus
//!   semantics from one primitive.
//!
//! # Example
//!
//! ```ignore
//! use matcha_input::{InputStack, KeyMap, LayerOptions};
//! use matcha_core::{Key, KeyMsg};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Action { Quit, Confirm }
//!
//! let mut base = KeyMap::new();
//! base.bind("q", "Quit", Action::Quit)?;
//!
//! let mut modal = KeyMap::new();
//! modal.bind("enter", "Confirm", Action::Confirm)?;
//!
//! let mut stack = InputStack::new();
//! stack.push(base, LayerOptions::named("base").passthrough());
//! stack.push(modal, LayerOptions::named("confirm-dialog"));
//!
//! // The opaque dialog traps focus: "q" is swallowed, "enter" confirms.
//! assert_eq!(stack.dispatch(&KeyMsg::new(Key::Char('q'))), None);
//! assert_eq!(stack.dispatch(&KeyMsg::new(Key::Enter)), Some(Action::Confirm));
//! ```

pub mod binding;
pub mod keymap;
pub mod stack;

pub use binding::{Binding, BindingAction, BindingInfo, KeyCombo, ParseError};
pub use keymap::KeyMap;
pub use stack::{InputHandler, InputStack, LayerId, LayerInfo, LayerOptions};
