use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::constants::KEY_COUNT;

/// # Keypad
/// The hexadecimal keypad, keys 0x0..=0xF.
pub trait Keypad {
    fn is_pressed(&self, key: u8) -> bool;

    /// Non-blocking wait for a key.
    ///
    /// The first call arms the wait and returns `None`. A key is returned
    /// only once it has been pressed and then released while armed.
    fn poll_for_key_press(&self) -> Option<u8>;

    /// Forget pressed keys and any armed wait
    fn reset(&self) {}
}

#[derive(Default)]
struct Keys {
    down: [bool; KEY_COUNT],
    waiting: bool,
    released: Option<u8>,
}

/// # KeyState
/// Keypad state written by an input thread and read by the machine.
#[derive(Default)]
pub struct KeyState {
    keys: Mutex<Keys>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    fn keys(&self) -> MutexGuard<'_, Keys> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Keys outside 0x0..=0xF are ignored.
    pub fn press(&self, key: u8) {
        if let Some(down) = self.keys().down.get_mut(key as usize) {
            *down = true;
        }
    }

    pub fn release(&self, key: u8) {
        let mut keys = self.keys();
        let was_down = match keys.down.get_mut(key as usize) {
            Some(down) => std::mem::replace(down, false),
            None => return,
        };
        if was_down && keys.waiting {
            keys.released = Some(key);
        }
    }
}

impl Keypad for KeyState {
    fn is_pressed(&self, key: u8) -> bool {
        self.keys().down.get(key as usize).copied().unwrap_or(false)
    }

    fn poll_for_key_press(&self) -> Option<u8> {
        let mut keys = self.keys();
        if !keys.waiting {
            keys.waiting = true;
            keys.released = None;
            return None;
        }
        let key = keys.released.take()?;
        keys.waiting = false;
        Some(key)
    }

    fn reset(&self) {
        *self.keys() = Keys::default();
    }
}
