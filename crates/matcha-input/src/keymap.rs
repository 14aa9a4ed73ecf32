use crate::binding::{Binding, BindingAction, BindingInfo, KeyCombo, ParseError};
use crate::stack::InputHandler;
use matcha_core::KeyMsg;

/// An ordered registry of key bindings.
///
/// Bindings are matched in registration order and the first enabled exact
/// match wins -- precedence is controlled by the caller through registration
/// order, not by combo specificity. Disabling a binding keeps its slot, so
/// toggling context-sensitive key sets never loses binding identity.
///
/// # Example
///
/// ```rust,ignore
/// let mut keys = KeyMap::new();
/// keys.bind("q", "Quit", Action::Quit)?
///     .bind("ctrl+s", "Save", Action::Save)?;
/// keys.group("nav", |keys| {
///     keys.bind("up", "Previous item", Action::Prev)?;
///     keys.bind("down", "Next item", Action::Next)?;
///     Ok(())
/// })?;
///
/// keys.disable_group("nav");
/// assert!(keys.handle(&KeyMsg::new(Key::Up)).is_none());
/// ```
pub struct KeyMap<A> {
    bindings: Vec<Binding<A>>,
    group_stack: Vec<String>,
}

impl<A> Default for KeyMap<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> KeyMap<A> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
            group_stack: Vec::new(),
        }
    }

    fn current_group(&self) -> String {
        self.group_stack.last().cloned().unwrap_or_default()
    }

    fn register(
        &mut self,
        descriptor: &str,
        description: impl Into<String>,
        action: BindingAction<A>,
    ) -> Result<&mut Self, ParseError> {
        let combo: KeyCombo = descriptor.parse()?;
        self.bindings.push(Binding {
            combo,
            description: description.into(),
            group: self.current_group(),
            action,
            enabled: true,
        });
        Ok(self)
    }

    /// Register a binding with a literal action value. Chainable.
    pub fn bind(
        &mut self,
        descriptor: &str,
        description: impl Into<String>,
        action: A,
    ) -> Result<&mut Self, ParseError> {
        self.register(descriptor, description, BindingAction::Literal(action))
    }

    /// Register a binding whose action is produced at match time. Chainable.
    pub fn bind_fn(
        &mut self,
        descriptor: &str,
        description: impl Into<String>,
        action: impl Fn() -> A + Send + 'static,
    ) -> Result<&mut Self, ParseError> {
        self.register(descriptor, description, BindingAction::Thunk(Box::new(action)))
    }

    /// Run `f` with the current group set to `name`, restoring the previous
    /// scope afterwards.
    ///
    /// Groups may be nested, but each binding records only its immediate
    /// enclosing group name.
    pub fn group<F>(&mut self, name: impl Into<String>, f: F) -> Result<&mut Self, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<(), ParseError>,
    {
        self.group_stack.push(name.into());
        let result = f(self);
        self.group_stack.pop();
        result?;
        Ok(self)
    }

    /// Flip the enabled flag on every binding whose description equals
    /// `description` exactly.
    pub fn enable(&mut self, description: &str) {
        self.set_enabled(|b| b.description == description, true);
    }

    /// See [`enable`](KeyMap::enable).
    pub fn disable(&mut self, description: &str) {
        self.set_enabled(|b| b.description == description, false);
    }

    /// Enable every binding matching a predicate over its metadata.
    pub fn enable_where(&mut self, pred: impl Fn(&BindingInfo) -> bool) {
        self.set_enabled(pred, true);
    }

    /// Disable every binding matching a predicate over its metadata.
    pub fn disable_where(&mut self, pred: impl Fn(&BindingInfo) -> bool) {
        self.set_enabled(pred, false);
    }

    /// Enable every binding registered under `group`.
    pub fn enable_group(&mut self, group: &str) {
        self.set_enabled(|b| b.group == group, true);
    }

    /// Disable every binding registered under `group`.
    pub fn disable_group(&mut self, group: &str) {
        self.set_enabled(|b| b.group == group, false);
    }

    fn set_enabled(&mut self, pred: impl Fn(&BindingInfo) -> bool, enabled: bool) {
        for binding in &mut self.bindings {
            if pred(&binding.info()) {
                binding.enabled = enabled;
            }
        }
    }

    /// A fresh snapshot of every binding's metadata, in registration order.
    ///
    /// Built on each call so it always reflects the current enabled flags;
    /// never cached.
    pub fn bindings(&self) -> Vec<BindingInfo> {
        self.bindings.iter().map(Binding::info).collect()
    }

    /// Number of registered bindings, disabled ones included.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<A: Clone> KeyMap<A> {
    /// Return the action of the first enabled binding whose combo matches
    /// the event exactly, scanning in registration order.
    pub fn handle(&self, msg: &KeyMsg) -> Option<A> {
        self.bindings
            .iter()
            .find(|b| b.enabled && b.combo.matches(msg))
            .map(|b| b.action.resolve())
    }
}

impl<A: Clone + Send> InputHandler<A> for KeyMap<A> {
    fn handle(&mut self, msg: &KeyMsg) -> Option<A> {
        KeyMap::handle(self, msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matcha_core::{Key, Modifiers};

    fn press(c: char) -> KeyMsg {
        KeyMsg::new(Key::Char(c))
    }

    #[test]
    fn first_registration_wins() {
        let mut keys = KeyMap::new();
        keys.bind("q", "Quit", 'A')
            .unwrap()
            .bind("q", "Help", 'B')
            .unwrap();
        assert_eq!(keys.handle(&press('q')), Some('A'));
    }

    #[test]
    fn no_match_returns_none() {
        let mut keys = KeyMap::new();
        keys.bind("q", "Quit", 1).unwrap();
        assert_eq!(keys.handle(&press('x')), None);
    }

    #[test]
    fn modifiers_must_match_exactly() {
        let mut keys = KeyMap::new();
        keys.bind("ctrl+c", "Copy", 1).unwrap();
        assert_eq!(keys.handle(&KeyMsg::ctrl(Key::Char('c'))), Some(1));
        assert_eq!(keys.handle(&press('c')), None);
    }

    #[test]
    fn malformed_descriptor_fails_at_registration() {
        let mut keys: KeyMap<i32> = KeyMap::new();
        assert!(keys.bind("ctrl+ctrl+c", "Copy", 1).is_err());
        assert!(keys.is_empty());
    }

    #[test]
    fn disabled_binding_is_skipped() {
        let mut keys = KeyMap::new();
        keys.bind("q", "Quit", 'A')
            .unwrap()
            .bind("q", "Help", 'B')
            .unwrap();
        keys.disable("Quit");
        // The later registration now matches.
        assert_eq!(keys.handle(&press('q')), Some('B'));
    }

    #[test]
    fn disable_then_enable_restores_behavior() {
        let mut keys = KeyMap::new();
        keys.bind("q", "Quit", 'A')
            .unwrap()
            .bind("q", "Help", 'B')
            .unwrap();
        let before = keys.handle(&press('q'));
        keys.disable("Quit");
        keys.enable("Quit");
        assert_eq!(keys.handle(&press('q')), before);
    }

    #[test]
    fn groups_flatten_to_immediate_name() {
        let mut keys: KeyMap<i32> = KeyMap::new();
        keys.bind("a", "Top level", 0).unwrap();
        keys.group("outer", |keys| {
            keys.bind("b", "Outer binding", 1)?;
            keys.group("inner", |keys| {
                keys.bind("c", "Inner binding", 2)?;
                Ok(())
            })?;
            keys.bind("d", "Outer again", 3)?;
            Ok(())
        })
        .unwrap();

        let groups: Vec<String> = keys.bindings().into_iter().map(|b| b.group).collect();
        assert_eq!(groups, vec!["", "outer", "inner", "outer"]);
    }

    #[test]
    fn group_scope_restored_after_parse_error() {
        let mut keys: KeyMap<i32> = KeyMap::new();
        let result = keys.group("broken", |keys| {
            keys.bind("hyper+x", "Bad", 1)?;
            Ok(())
        });
        assert!(result.is_err());
        keys.bind("a", "After", 2).unwrap();
        assert_eq!(keys.bindings().last().unwrap().group, "");
    }

    #[test]
    fn group_toggling() {
        let mut keys: KeyMap<i32> = KeyMap::new();
        keys.group("nav", |keys| {
            keys.bind("up", "Previous", 1)?;
            keys.bind("down", "Next", 2)?;
            Ok(())
        })
        .unwrap();

        keys.disable_group("nav");
        assert_eq!(keys.handle(&KeyMsg::new(Key::Up)), None);
        keys.enable_group("nav");
        assert_eq!(keys.handle(&KeyMsg::new(Key::Up)), Some(1));
    }

    #[test]
    fn predicate_toggling() {
        let mut keys: KeyMap<i32> = KeyMap::new();
        keys.bind("a", "Alpha", 1)
            .unwrap()
            .bind("ctrl+b", "Beta", 2)
            .unwrap();
        keys.disable_where(|b| b.combo.mods == Modifiers::CTRL);
        assert_eq!(keys.handle(&KeyMsg::ctrl(Key::Char('b'))), None);
        assert_eq!(keys.handle(&press('a')), Some(1));
    }

    #[test]
    fn snapshots_are_fresh_not_cached() {
        let mut keys: KeyMap<i32> = KeyMap::new();
        keys.bind("q", "Quit", 1).unwrap();
        let before = keys.bindings();
        assert!(before[0].enabled);
        keys.disable("Quit");
        let after = keys.bindings();
        assert!(before[0].enabled, "old snapshot is a value, not a view");
        assert!(!after[0].enabled);
    }

    #[test]
    fn thunk_binding_runs_at_match_time_only() {
        use std::sync::atomic::{AtomicU32, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let mut keys = KeyMap::new();
        keys.bind_fn("r", "Roll", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            7
        })
        .unwrap();

        // Snapshots never run the thunk.
        let _ = keys.bindings();
        let _ = keys.bindings();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(keys.handle(&press('r')), Some(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
