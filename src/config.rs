/// Behaviour that differs between the original COSMAC VIP interpreter and
/// the CHIP-48/SUPER-CHIP family most programs are written against today.
/// The defaults are the later behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// 8xy6/8xyE shift Vy and store the result in Vx (VIP), rather than
    /// shifting Vx in place
    pub shift_reads_vy: bool,
    /// Fx55/Fx65 leave I pointing just past the last register touched (VIP)
    pub load_store_increments_i: bool,
    /// 8xy1/8xy2/8xy3 clear VF (VIP)
    pub logic_resets_vf: bool,
}

impl Quirks {
    /// everything the way the COSMAC VIP did it
    pub fn cosmac_vip() -> Self {
        Quirks {
            shift_reads_vy: true,
            load_store_increments_i: true,
            logic_resets_vf: true,
        }
    }
}

/// Machine construction options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// install the hex digit glyphs at `memory::FONT_ADDR`; off by default so
    /// a new machine is entirely zeroed
    pub load_font: bool,
    /// seed for Cxkk; `None` takes one from the OS
    pub rng_seed: Option<u64>,
    pub quirks: Quirks,
}

impl Config {
    pub fn with_font(mut self) -> Self {
        self.load_font = true;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }
}
