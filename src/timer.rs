/// An 8-bit countdown register, decremented once per 60Hz tick and never
/// below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer(u8);

impl Timer {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn set(&mut self, value: u8) {
        self.0 = value;
    }

    pub fn tick(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn is_active(self) -> bool {
        self.0 != 0
    }
}
