//! Keyboard input.

use std::ops::Add;

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is held.
    pub shift: bool,
    /// Control is held.
    pub ctrl: bool,
    /// Alt is held.
    pub alt: bool,
}

impl Mods {
    /// No modifiers.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
    /// Control only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };
}

impl Add<KeyCode> for Mods {
    type Output = Key;

    fn add(self, key: KeyCode) -> Key {
        Key { mods: self, key }
    }
}

impl Add<char> for Mods {
    type Output = Key;

    fn add(self, c: char) -> Key {
        self + KeyCode::Char(c)
    }
}

/// Logical key codes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum KeyCode {
    /// Backspace.
    Backspace,
    /// Delete forward.
    Delete,
    /// Enter or return.
    Enter,
    /// Escape.
    Esc,
    /// Tab.
    Tab,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Home.
    Home,
    /// End.
    End,
    /// A printable character.
    Char(char),
}

/// A keystroke along with modifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Modifier state.
    pub mods: Mods,
    /// Key code.
    pub key: KeyCode,
}

impl Key {
    /// The character this key inserts into text, if any. Control and alt
    /// chords insert nothing.
    pub fn text(&self) -> Option<char> {
        match self.key {
            KeyCode::Char(c) if !self.mods.ctrl && !self.mods.alt && !c.is_control() => Some(c),
            _ => None,
        }
    }
}

impl PartialEq<KeyCode> for Key {
    fn eq(&self, c: &KeyCode) -> bool {
        self.mods == Mods::NONE && self.key == *c
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Mods::NONE + c
    }
}

impl From<KeyCode> for Key {
    fn from(key: KeyCode) -> Self {
        Mods::NONE + key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_text() {
        assert_eq!(Key::from('a').text(), Some('a'));
        assert_eq!((Mods::SHIFT + 'A').text(), Some('A'));
        assert_eq!((Mods::CTRL + 'a').text(), None);
        assert_eq!(Key::from(KeyCode::Enter).text(), None);
        assert_eq!(Key::from('\u{7f}').text(), None);
    }

    #[test]
    fn bare_keycode_comparison() {
        assert_eq!(Key::from(KeyCode::Esc), KeyCode::Esc);
        assert_ne!(Mods::SHIFT + KeyCode::Tab, KeyCode::Tab);
    }
}
