use std::io;

/// number of keys on the COSMAC VIP hex keypad
pub const KEY_COUNT: usize = 16;

/// Which of the 16 hex keys are currently held down. Only the low nibble of
/// a key index is significant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    /// keypad with the given keys held
    pub fn with_pressed(keys: &[u8]) -> Self {
        let mut k = Keypad::new();
        for &key in keys {
            k.press(key);
        }
        k
    }

    pub fn press(&mut self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: u8) {
        self.set(key, false);
    }

    pub fn set(&mut self, key: u8, pressed: bool) {
        self.keys[(key & 0x0f) as usize] = pressed;
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0x0f) as usize]
    }

    /// lowest-numbered key held down, if any
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&k| k).map(|k| k as u8)
    }

    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }
}

/// reads keypresses from whatever the host has
pub trait Input {
    /// the state of the keypad right now
    fn pressed_keys(&mut self) -> Result<Keypad, io::Error>;
}

/// dummy Input implementation for testing; reports a fixed set of keys
pub struct DummyInput {
    keypad: Keypad,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            keypad: Keypad::with_pressed(keys),
        }
    }

    /// change what gets reported from now on
    pub fn hold(&mut self, keys: &[u8]) {
        self.keypad = Keypad::with_pressed(keys);
    }
}

impl Input for DummyInput {
    fn pressed_keys(&mut self) -> Result<Keypad, io::Error> {
        Ok(self.keypad)
    }
}
