use std::io;

/// Whatever the host uses to make the buzzer noise. The machine only says
/// when it should be on.
pub trait Sound {
    fn beep(&mut self) -> Result<(), io::Error>;
    fn stop(&mut self) -> Result<(), io::Error>;
}

/// makes no noise, but remembers whether it would be
pub struct Mute {
    pub is_beeping: bool,
}

impl Mute {
    pub fn new() -> Self {
        Mute { is_beeping: false }
    }
}

impl Default for Mute {
    fn default() -> Self {
        Mute::new()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), io::Error> {
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), io::Error> {
        self.is_beeping = false;
        Ok(())
    }
}
