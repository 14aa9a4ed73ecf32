//! Layered input routing: competing UI layers share one keyboard.
//!
//! An [`InputStack`] holds opaque input handlers in push order and walks them
//! top-down on dispatch. Three focus behaviors fall out of one passthrough
//! flag:
//!
//! * **Modal dialog** -- opaque layer on top: unmatched keys are swallowed,
//!   nothing below ever sees input (a focus trap).
//! * **Transient overlay** -- passthrough layer: intercepts only its own
//!   keys, everything else falls through.
//! * **Base layer** -- passthrough at the bottom of the stack, the default
//!   handler of last resort.

use matcha_core::KeyMsg;

/// Anything that can claim a key event by returning an action.
///
/// A [`KeyMap`](crate::KeyMap) is the most common handler, and any
/// `FnMut(&KeyMsg) -> Option<A>` closure works too.
pub trait InputHandler<A>: Send {
    fn handle(&mut self, msg: &KeyMsg) -> Option<A>;
}

impl<A, F> InputHandler<A> for F
where
    F: FnMut(&KeyMsg) -> Option<A> + Send,
{
    fn handle(&mut self, msg: &KeyMsg) -> Option<A> {
        self(msg)
    }
}

/// Identifier assigned to a layer at push time. Monotonic, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(u64);

/// Options for a pushed layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerOptions {
    /// Display name, for introspection and debugging.
    pub name: String,
    /// When true, unmatched events fall through to the layer below.
    /// The default (opaque) swallows them.
    pub passthrough: bool,
}

impl LayerOptions {
    /// An opaque layer with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passthrough: false,
        }
    }

    /// Let unmatched events continue to lower layers.
    pub fn passthrough(mut self) -> Self {
        self.passthrough = true;
        self
    }
}

/// A layer's metadata, as returned by [`InputStack::pop`] and
/// [`InputStack::layers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerInfo {
    pub name: String,
    pub passthrough: bool,
}

struct Layer<A> {
    id: LayerId,
    handler: Box<dyn InputHandler<A>>,
    name: String,
    passthrough: bool,
}

impl<A> Layer<A> {
    fn info(&self) -> LayerInfo {
        LayerInfo {
            name: self.name.clone(),
            passthrough: self.passthrough,
        }
    }
}

/// An ordered stack of input layers. The top is the most recently pushed,
/// not-yet-removed layer.
pub struct InputStack<A> {
    layers: Vec<Layer<A>>,
    next_id: u64,
}

impl<A> Default for InputStack<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> InputStack<A> {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            next_id: 0,
        }
    }

    /// Push a new top layer. Returns its id for later targeted removal.
    pub fn push(
        &mut self,
        handler: impl InputHandler<A> + 'static,
        options: LayerOptions,
    ) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.layers.push(Layer {
            id,
            handler: Box::new(handler),
            name: options.name,
            passthrough: options.passthrough,
        });
        id
    }

    /// Remove and return the top layer's metadata, or `None` if empty.
    pub fn pop(&mut self) -> Option<LayerInfo> {
        self.layers.pop().map(|layer| layer.info())
    }

    /// Remove a layer anywhere in the stack by id. Returns whether it
    /// existed; removing an already-removed layer is a harmless no-op.
    pub fn remove(&mut self, id: LayerId) -> bool {
        let before = self.layers.len();
        self.layers.retain(|layer| layer.id != id);
        self.layers.len() != before
    }

    /// Current layer count.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Metadata for every layer, bottom to top (push order).
    pub fn layers(&self) -> Vec<LayerInfo> {
        self.layers.iter().map(Layer::info).collect()
    }

    /// Walk layers from top to bottom:
    ///
    /// 1. A layer that returns an action ends the walk with that action;
    ///    dispatch never continues past a match.
    /// 2. A non-matching **opaque** layer ends the walk with `None` -- the
    ///    event is swallowed, lower layers are never consulted. An opaque
    ///    layer mid-stack is a hard stop, matched or not.
    /// 3. A non-matching **passthrough** layer defers to the next layer down.
    /// 4. An exhausted stack yields `None`.
    ///
    /// A handler that panics is an application programming error and is
    /// allowed to unwind; there is no built-in recovery.
    pub fn dispatch(&mut self, msg: &KeyMsg) -> Option<A> {
        for layer in self.layers.iter_mut().rev() {
            if let Some(action) = layer.handler.handle(msg) {
                return Some(action);
            }
            if !layer.passthrough {
                return None;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::KeyMap;
    use matcha_core::{Key, KeyMsg};

    fn press(c: char) -> KeyMsg {
        KeyMsg::new(Key::Char(c))
    }

    /// A handler that answers only one key.
    fn only(key: Key, action: &'static str) -> impl InputHandler<&'static str> {
        move |msg: &KeyMsg| (msg.key == key).then_some(action)
    }

    #[test]
    fn empty_stack_dispatches_nothing() {
        let mut stack: InputStack<&'static str> = InputStack::new();
        assert_eq!(stack.dispatch(&press('q')), None);
    }

    #[test]
    fn top_match_wins_over_lower_layers() {
        let mut stack = InputStack::new();
        stack.push(only(Key::Char('q'), "base"), LayerOptions::named("base").passthrough());
        stack.push(only(Key::Char('q'), "top"), LayerOptions::named("top").passthrough());
        assert_eq!(stack.dispatch(&press('q')), Some("top"));
    }

    #[test]
    fn opaque_modal_traps_focus() {
        // base binds "q", modal binds "enter"; both opaque.
        let mut stack = InputStack::new();
        stack.push(only(Key::Char('q'), "quit"), LayerOptions::named("base"));
        stack.push(only(Key::Enter, "confirm"), LayerOptions::named("modal"));

        // The modal doesn't match "q" and, being opaque, swallows it; base
        // never sees the key even though it would match.
        assert_eq!(stack.dispatch(&press('q')), None);
        assert_eq!(stack.dispatch(&KeyMsg::new(Key::Enter)), Some("confirm"));
    }

    #[test]
    fn opaque_middle_layer_is_a_hard_stop() {
        let mut stack = InputStack::new();
        stack.push(only(Key::Char('a'), "base"), LayerOptions::named("base").passthrough());
        stack.push(only(Key::Char('b'), "shield"), LayerOptions::named("shield"));
        stack.push(only(Key::Char('c'), "tip"), LayerOptions::named("tip").passthrough());

        // "a" passes the tip, then hits the opaque shield and dies there.
        assert_eq!(stack.dispatch(&press('a')), None);
        assert_eq!(stack.dispatch(&press('b')), Some("shield"));
        assert_eq!(stack.dispatch(&press('c')), Some("tip"));
    }

    #[test]
    fn passthrough_cascades_to_the_owner() {
        let mut stack = InputStack::new();
        stack.push(only(Key::Char('x'), "one"), LayerOptions::named("one").passthrough());
        stack.push(only(Key::Char('y'), "two"), LayerOptions::named("two").passthrough());
        stack.push(only(Key::Char('z'), "three"), LayerOptions::named("three").passthrough());

        assert_eq!(stack.dispatch(&press('x')), Some("one"));
        assert_eq!(stack.dispatch(&press('y')), Some("two"));
        assert_eq!(stack.dispatch(&press('z')), Some("three"));
        assert_eq!(stack.dispatch(&press('w')), None);
    }

    #[test]
    fn push_remove_leaves_lower_layers() {
        let mut stack: InputStack<()> = InputStack::new();
        stack.push(|_: &KeyMsg| None, LayerOptions::named("base"));
        let top = stack.push(|_: &KeyMsg| None, LayerOptions::named("top"));
        assert!(stack.remove(top));
        assert_eq!(
            stack.layers(),
            vec![LayerInfo {
                name: "base".into(),
                passthrough: false,
            }],
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let mut stack: InputStack<()> = InputStack::new();
        let id = stack.push(|_: &KeyMsg| None, LayerOptions::named("only"));
        assert!(stack.remove(id));
        assert!(!stack.remove(id));
        assert!(stack.is_empty());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut stack: InputStack<()> = InputStack::new();
        let first = stack.push(|_: &KeyMsg| None, LayerOptions::default());
        stack.pop();
        let second = stack.push(|_: &KeyMsg| None, LayerOptions::default());
        assert_ne!(first, second);
    }

    #[test]
    fn pop_returns_metadata_top_down() {
        let mut stack: InputStack<()> = InputStack::new();
        stack.push(|_: &KeyMsg| None, LayerOptions::named("base"));
        stack.push(
            |_: &KeyMsg| None,
            LayerOptions::named("toast").passthrough(),
        );

        assert_eq!(
            stack.pop(),
            Some(LayerInfo {
                name: "toast".into(),
                passthrough: true,
            }),
        );
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop().map(|l| l.name), Some("base".into()));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn keymap_is_a_layer() {
        let mut modal_keys = KeyMap::new();
        modal_keys.bind("enter", "Confirm", "confirm").unwrap();

        let mut base_keys = KeyMap::new();
        base_keys.bind("q", "Quit", "quit").unwrap();

        let mut stack = InputStack::new();
        stack.push(base_keys, LayerOptions::named("base").passthrough());
        stack.push(modal_keys, LayerOptions::named("modal"));

        assert_eq!(stack.dispatch(&KeyMsg::new(Key::Enter)), Some("confirm"));
        // The opaque modal swallows base's key.
        assert_eq!(stack.dispatch(&press('q')), None);

        stack.pop();
        assert_eq!(stack.dispatch(&press('q')), Some("quit"));
    }
}
