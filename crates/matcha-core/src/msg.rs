use std::fmt;

/// A decoded key, either a printable character or a named key.
///
/// `Key::Unknown` is the decoder's sentinel for byte sequences it does not
/// recognize. The event bus filters unknown keys out before they reach any
/// subscriber, so application code never observes the variant in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character, lowercase for ASCII letters.
    Char(char),
    Enter,
    Tab,
    Backspace,
    Space,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
    /// Sentinel for undecodable input. Never emitted by the bus.
    Unknown,
}

impl Key {
    /// Parse a lowercase key name. Single characters map to [`Key::Char`];
    /// longer names must be one of the named keys.
    pub fn from_name(name: &str) -> Option<Key> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(Key::Char(c.to_ascii_lowercase()));
        }
        match name {
            "enter" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "backspace" => Some(Key::Backspace),
            "space" => Some(Key::Space),
            "esc" | "escape" => Some(Key::Esc),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "home" => Some(Key::Home),
            "end" => Some(Key::End),
            "delete" => Some(Key::Delete),
            "pageup" => Some(Key::PageUp),
            "pagedown" => Some(Key::PageDown),
            _ => None,
        }
    }

    /// `true` for the decoder's unrecognized-input sentinel.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Key::Unknown)
    }
}

impl fmt::Display for Key {
    /// Writes the lowercase key name (`c`, `enter`, `pageup`, ...).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Enter => f.write_str("enter"),
            Key::Tab => f.write_str("tab"),
            Key::Backspace => f.write_str("backspace"),
            Key::Space => f.write_str("space"),
            Key::Esc => f.write_str("esc"),
            Key::Up => f.write_str("up"),
            Key::Down => f.write_str("down"),
            Key::Left => f.write_str("left"),
            Key::Right => f.write_str("right"),
            Key::Home => f.write_str("home"),
            Key::End => f.write_str("end"),
            Key::Delete => f.write_str("delete"),
            Key::PageUp => f.write_str("pageup"),
            Key::PageDown => f.write_str("pagedown"),
            Key::Unknown => f.write_str("unknown"),
        }
    }
}

/// Keyboard modifier state as three independent flags.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };

    /// Ctrl only.
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        alt: false,
        shift: false,
    };

    /// Alt only.
    pub const ALT: Modifiers = Modifiers {
        ctrl: false,
        alt: true,
        shift: false,
    };

    /// Shift only.
    pub const SHIFT: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: true,
    };
}

/// One keyboard event: a key plus the modifier state at press time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyMsg {
    pub key: Key,
    pub mods: Modifiers,
}

impl KeyMsg {
    /// A key event with no modifiers.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::NONE,
        }
    }

    /// A key event with the Ctrl modifier.
    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::CTRL,
        }
    }

    /// A key event with the Alt modifier.
    pub fn alt(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::ALT,
        }
    }

    /// A key event with the Shift modifier.
    pub fn shift(key: Key) -> Self {
        Self {
            key,
            mods: Modifiers::SHIFT,
        }
    }

    /// A key event with an explicit modifier set.
    pub fn with_mods(key: Key, mods: Modifiers) -> Self {
        Self { key, mods }
    }
}

/// A terminal dimension change, in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeMsg {
    pub cols: u16,
    pub rows: u16,
}

impl ResizeMsg {
    /// Dimensions assumed when the environment cannot report a size.
    pub const FALLBACK: ResizeMsg = ResizeMsg { cols: 80, rows: 24 };

    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }
}

/// Mouse button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// What the mouse did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Press,
    Release,
    Move,
    ScrollUp,
    ScrollDown,
}

/// One mouse event with a 0-based cell position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseMsg {
    pub button: Option<MouseButton>,
    pub action: MouseAction,
    pub col: u16,
    pub row: u16,
    pub mods: Modifiers,
}

/// The unified message stream delivered to bus subscribers.
///
/// Input events decoded from the terminal and application-defined messages
/// (from commands or direct [`emit`](crate::bus::EventBus::emit) calls) share
/// one ordered stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event<M> {
    /// A keyboard event.
    Key(KeyMsg),
    /// Terminal resized.
    Resize(ResizeMsg),
    /// A mouse event.
    Mouse(MouseMsg),
    /// An application-defined message.
    App(M),
}
