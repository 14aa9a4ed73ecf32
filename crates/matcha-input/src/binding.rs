//! Key combos, the binding descriptor grammar, and registered bindings.

use matcha_core::{Key, KeyMsg, Modifiers};
use std::fmt;
use std::str::FromStr;

/// Errors from parsing a binding descriptor such as `"ctrl+shift+p"`.
///
/// Descriptors are parsed at registration time and fail loudly; a mistyped
/// binding should surface during development, never be silently coerced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The same modifier appears more than once.
    #[error("duplicate modifier `{0}` in key descriptor")]
    DuplicateModifier(String),
    /// A modifier other than ctrl, alt, or shift.
    #[error("unknown modifier `{0}` in key descriptor")]
    UnknownModifier(String),
    /// Nothing after the final `+`.
    #[error("missing key name in key descriptor")]
    EmptyKey,
    /// A multi-character name that is not one of the named keys.
    #[error("unknown key name `{0}` in key descriptor")]
    UnknownKey(String),
}

/// The registered shape of a key binding: a key plus an exact modifier set.
///
/// Structurally identical to [`KeyMsg`], but a combo is a *pattern* while a
/// `KeyMsg` is an *event*. Two combos are equal iff key and all three
/// modifier flags match; there are no wildcard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyCombo {
    /// A combo with no modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }

    /// A combo with the Ctrl modifier.
    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::CTRL,
        }
    }

    /// A combo with the Alt modifier.
    pub fn alt(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::ALT,
        }
    }

    /// A combo with the Shift modifier.
    pub fn shift(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::SHIFT,
        }
    }

    /// Exact match against a key event: key and all modifier flags.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.key == msg.key && self.mods == msg.mods
    }
}

impl FromStr for KeyCombo {
    type Err = ParseError;

    /// Parse a `+`-joined descriptor: zero or more modifiers (ctrl, alt,
    /// shift -- case-insensitive, any order, no duplicates) followed by
    /// exactly one key name.
    fn from_str(descriptor: &str) -> Result<Self, ParseError> {
        let mut parts: Vec<&str> = descriptor.split('+').collect();
        let key_name = parts.pop().unwrap_or("");
        if key_name.is_empty() {
            return Err(ParseError::EmptyKey);
        }

        let mut mods = Modifiers::NONE;
        for part in parts {
            let flag = match part.to_ascii_lowercase().as_str() {
                "ctrl" => &mut mods.ctrl,
                "alt" => &mut mods.alt,
                "shift" => &mut mods.shift,
                _ => return Err(ParseError::UnknownModifier(part.to_string())),
            };
            if *flag {
                return Err(ParseError::DuplicateModifier(part.to_string()));
            }
            *flag = true;
        }

        let lowered = key_name.to_ascii_lowercase();
        let key =
            Key::from_name(&lowered).ok_or_else(|| ParseError::UnknownKey(key_name.to_string()))?;
        Ok(KeyCombo { key, mods })
    }
}

impl fmt::Display for KeyCombo {
    /// The canonical display form: modifiers in Ctrl, Alt, Shift order, then
    /// the key name with its first letter capitalized only when the name is
    /// longer than one character (`Ctrl+c`, but `Tab`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.mods.alt {
            f.write_str("Alt+")?;
        }
        if self.mods.shift {
            f.write_str("Shift+")?;
        }
        let name = self.key.to_string();
        if name.chars().count() > 1 {
            let mut chars = name.chars();
            if let Some(first) = chars.next() {
                write!(f, "{}", first.to_ascii_uppercase())?;
                f.write_str(chars.as_str())?;
            }
        } else {
            f.write_str(&name)?;
        }
        Ok(())
    }
}

/// A binding's action: either a literal value or a zero-argument producer.
///
/// The thunk form exists so actions with construction-time side effects run
/// at *match* time, not on every [`bindings`](crate::KeyMap::bindings)
/// snapshot.
pub enum BindingAction<A> {
    Literal(A),
    Thunk(Box<dyn Fn() -> A + Send>),
}

impl<A: Clone> BindingAction<A> {
    /// Produce the action value: clone the literal or call the thunk.
    pub fn resolve(&self) -> A {
        match self {
            BindingAction::Literal(a) => a.clone(),
            BindingAction::Thunk(f) => f(),
        }
    }
}

/// One registered (combo -> action) rule.
pub struct Binding<A> {
    pub combo: KeyCombo,
    pub description: String,
    /// Group name; empty means ungrouped.
    pub group: String,
    pub action: BindingAction<A>,
    /// Disabled bindings never match but keep their registration slot.
    pub enabled: bool,
}

/// A read-only snapshot of one binding's metadata, as returned by
/// [`KeyMap::bindings`](crate::KeyMap::bindings) and consumed by
/// enable/disable predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInfo {
    pub combo: KeyCombo,
    pub description: String,
    pub group: String,
    pub enabled: bool,
}

impl<A> Binding<A> {
    pub(crate) fn info(&self) -> BindingInfo {
        BindingInfo {
            combo: self.combo,
            description: self.description.clone(),
            group: self.group.clone(),
            enabled: self.enabled,
        }
    }
}
