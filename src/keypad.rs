//! The 16 key hexadecimal keypad.
//!
//! The interpreter only ever reads [`KeyState`](KeyState); the frontend is its only writer.

/// Number of keys on the keypad.
pub const KEY_COUNT: usize = 16;

/// Pressed state of every logical key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyState {
    keys: [bool; KEY_COUNT],
}

impl KeyState {
    #[must_use]
    pub fn new() -> KeyState {
        KeyState::default()
    }

    /// Returns whether `key` is held down. Keys outside the keypad are never down.
    #[must_use]
    pub fn is_key_down(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// Marks `key` as held. Keys outside the keypad are ignored.
    pub fn press(&mut self, key: u8) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = true;
        }
    }

    /// Marks `key` as released. Keys outside the keypad are ignored.
    pub fn release(&mut self, key: u8) {
        if let Some(state) = self.keys.get_mut(key as usize) {
            *state = false;
        }
    }

    /// Releases every key.
    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Returns the lowest numbered key currently held, if any.
    #[must_use]
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&pressed| pressed).and_then(|key| u8::try_from(key).ok())
    }
}
