//! Escape-sequence-to-key decoding.
//!
//! [`decode_key`] is a pure function from one raw input chunk (as delivered
//! by the terminal in raw mode) to a [`KeyMsg`]. Anything outside the
//! recognized vocabulary decodes to [`Key::Unknown`]; the event bus drops
//! those before they reach subscribers.
//!
//! A bare `ESC` byte decodes to [`Key::Esc`] immediately. It could also be
//! the first byte of a slow-arriving multi-byte sequence, but this decoder
//! deliberately applies no disambiguation timing; it judges exactly the bytes
//! it is given.

use crate::msg::{Key, KeyMsg, Modifiers};

const ESC: u8 = 0x1b;

/// Decode one raw byte chunk into a key event.
pub fn decode_key(bytes: &[u8]) -> KeyMsg {
    match bytes {
        b"\r" | b"\n" => KeyMsg::new(Key::Enter),
        b"\t" => KeyMsg::new(Key::Tab),
        // CSI Z is shift+tab (back-tab).
        b"\x1b[Z" => KeyMsg::shift(Key::Tab),
        [0x7f] | [0x08] => KeyMsg::new(Key::Backspace),
        b" " => KeyMsg::new(Key::Space),
        [ESC] => KeyMsg::new(Key::Esc),
        b"\x1b[A" | b"\x1bOA" => KeyMsg::new(Key::Up),
        b"\x1b[B" | b"\x1bOB" => KeyMsg::new(Key::Down),
        b"\x1b[C" | b"\x1bOC" => KeyMsg::new(Key::Right),
        b"\x1b[D" | b"\x1bOD" => KeyMsg::new(Key::Left),
        b"\x1b[H" | b"\x1bOH" | b"\x1b[1~" => KeyMsg::new(Key::Home),
        b"\x1b[F" | b"\x1bOF" | b"\x1b[4~" => KeyMsg::new(Key::End),
        b"\x1b[3~" => KeyMsg::new(Key::Delete),
        b"\x1b[5~" => KeyMsg::new(Key::PageUp),
        b"\x1b[6~" => KeyMsg::new(Key::PageDown),
        // Control characters map to ctrl+letter (0x01 = ctrl+a ... 0x1a =
        // ctrl+z), except the ones that double as named keys above.
        [b @ 0x01..=0x1a] => KeyMsg::ctrl(Key::Char((b + b'a' - 1) as char)),
        // ESC prefix on a printable is the alt modifier.
        [ESC, rest @ ..] if !rest.is_empty() => {
            let inner = decode_key(rest);
            match inner.key {
                Key::Char(_) if inner.mods == Modifiers::NONE => KeyMsg::alt(inner.key),
                _ => KeyMsg::new(Key::Unknown),
            }
        }
        printable => decode_printable(printable),
    }
}

/// A single printable character passes through as itself; uppercase ASCII is
/// normalized to lowercase with the shift flag set.
fn decode_printable(bytes: &[u8]) -> KeyMsg {
    let Ok(s) = std::str::from_utf8(bytes) else {
        return KeyMsg::new(Key::Unknown);
    };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => {
            if c.is_ascii_uppercase() {
                KeyMsg::shift(Key::Char(c.to_ascii_lowercase()))
            } else {
                KeyMsg::new(Key::Char(c))
            }
        }
        _ => KeyMsg::new(Key::Unknown),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_characters_pass_through() {
        assert_eq!(decode_key(b"q"), KeyMsg::new(Key::Char('q')));
        assert_eq!(decode_key("é".as_bytes()), KeyMsg::new(Key::Char('é')));
    }

    #[test]
    fn uppercase_becomes_shifted_lowercase() {
        assert_eq!(decode_key(b"Q"), KeyMsg::shift(Key::Char('q')));
    }

    #[test]
    fn control_bytes_become_ctrl_letters() {
        assert_eq!(decode_key(&[0x03]), KeyMsg::ctrl(Key::Char('c')));
        assert_eq!(decode_key(&[0x01]), KeyMsg::ctrl(Key::Char('a')));
        assert_eq!(decode_key(&[0x1a]), KeyMsg::ctrl(Key::Char('z')));
    }

    #[test]
    fn named_keys_decode() {
        assert_eq!(decode_key(b"\r"), KeyMsg::new(Key::Enter));
        assert_eq!(decode_key(b"\t"), KeyMsg::new(Key::Tab));
        assert_eq!(decode_key(&[0x7f]), KeyMsg::new(Key::Backspace));
        assert_eq!(decode_key(b" "), KeyMsg::new(Key::Space));
        assert_eq!(decode_key(b"\x1b"), KeyMsg::new(Key::Esc));
    }

    #[test]
    fn arrow_sequences_decode() {
        assert_eq!(decode_key(b"\x1b[A"), KeyMsg::new(Key::Up));
        assert_eq!(decode_key(b"\x1b[B"), KeyMsg::new(Key::Down));
        assert_eq!(decode_key(b"\x1b[C"), KeyMsg::new(Key::Right));
        assert_eq!(decode_key(b"\x1b[D"), KeyMsg::new(Key::Left));
        // Application cursor mode uses SS3 instead of CSI.
        assert_eq!(decode_key(b"\x1bOA"), KeyMsg::new(Key::Up));
    }

    #[test]
    fn navigation_sequences_decode() {
        assert_eq!(decode_key(b"\x1b[H"), KeyMsg::new(Key::Home));
        assert_eq!(decode_key(b"\x1b[F"), KeyMsg::new(Key::End));
        assert_eq!(decode_key(b"\x1b[3~"), KeyMsg::new(Key::Delete));
        assert_eq!(decode_key(b"\x1b[5~"), KeyMsg::new(Key::PageUp));
        assert_eq!(decode_key(b"\x1b[6~"), KeyMsg::new(Key::PageDown));
    }

    #[test]
    fn shift_tab_decodes() {
        assert_eq!(decode_key(b"\x1b[Z"), KeyMsg::shift(Key::Tab));
    }

    #[test]
    fn alt_letters_decode() {
        assert_eq!(decode_key(b"\x1bx"), KeyMsg::alt(Key::Char('x')));
    }

    #[test]
    fn garbage_decodes_to_unknown() {
        assert_eq!(decode_key(b"\x1b[99Q").key, Key::Unknown);
        assert_eq!(decode_key(&[0xff, 0xfe]).key, Key::Unknown);
        assert_eq!(decode_key(b"").key, Key::Unknown);
        assert_eq!(decode_key(b"ab").key, Key::Unknown);
    }
}
