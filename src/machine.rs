/// # machine
///
/// Architectural state of a CHIP-8:
///  V0-VF   16 general purpose 8-bit registers; VF doubles as the flag output
///          of add/sub/shift/draw
///  I       16-bit address register
///  PC      16-bit program counter, 0x200 after load
///  stack   16 return addresses; `sp` is how many are in use
///  DT, ST  delay and sound timers, counting down at 60Hz
///  4K RAM, a 64x32 framebuffer and the 16-key keypad
///
/// `step()` runs exactly one instruction; `tick_timers()` is one 60Hz tick.
/// The host decides how often to call each and does all the I/O; nothing in
/// here sleeps or spins.
///
/// Each step fetches, decodes to an `Instruction`, then executes it. The
/// handler reports how the PC should move (`Flow`) and dispatch applies it,
/// so no handler touches the PC itself. Handlers check every address they
/// will touch before writing anything, so a failed step changes nothing.
use crate::config::Config;
use crate::display::{Display, Framebuffer};
use crate::error::{Error, Result};
use crate::input::{Input, Keypad};
use crate::memory::{self, Chip8Memory, MemoryMap};
use crate::opcode::{Instruction, Opcode, Register};
use crate::sound::Sound;
use crate::timer::Timer;
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

/// how many return addresses the stack holds
pub const STACK_DEPTH: usize = 16;

/// Whether the machine can execute, or is parked on Fx0A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// next `step()` that sees a key held stores it in `register` and carries
    /// on; until then steps do nothing
    AwaitingKey { register: Register },
}

/// what happens to the PC once a handler has run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// on to the next instruction
    Next,
    /// skip over the next instruction
    Skip,
    /// straight to this address
    Jump(u16),
}

impl Flow {
    fn skip_if(cond: bool) -> Flow {
        if cond {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

pub struct Machine {
    config: Config,
    memory: Chip8Memory,
    v: [u8; 16],
    i: u16,
    pc: u16,
    stack: [u16; STACK_DEPTH],
    sp: usize,
    delay_timer: Timer,
    sound_timer: Timer,
    framebuffer: Framebuffer,
    keypad: Keypad,
    state: RunState,
    rng: StdRng,
}

impl Machine {
    /// a zeroed machine with the default config
    pub fn new() -> Self {
        Machine::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Machine {
            config,
            memory: Machine::fresh_memory(&config),
            v: [0; 16],
            i: 0,
            pc: memory::PROGRAM_ADDR,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            framebuffer: Framebuffer::new(),
            keypad: Keypad::new(),
            state: RunState::Running,
            rng,
        }
    }

    fn fresh_memory(config: &Config) -> Chip8Memory {
        if config.load_font {
            Chip8Memory::with_font()
        } else {
            Chip8Memory::new()
        }
    }

    /// back to power-on state, keeping the config. The random stream carries
    /// on rather than restarting.
    pub fn reset(&mut self) {
        self.memory = Machine::fresh_memory(&self.config);
        self.v = [0; 16];
        self.i = 0;
        self.pc = memory::PROGRAM_ADDR;
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.delay_timer = Timer::default();
        self.sound_timer = Timer::default();
        self.framebuffer.clear();
        self.keypad.release_all();
        self.state = RunState::Running;
    }

    /// copy a program image to 0x200 and point the PC at it. Nothing is
    /// touched if it doesn't fit.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.memory.load_program(program)?;
        self.pc = memory::PROGRAM_ADDR;
        Ok(())
    }

    /// load a chip8 program from wherever
    pub fn load_program_from(&mut self, reader: &mut impl io::Read) -> Result<()> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.load_program(&buf)
    }

    /// execute one instruction, or check for the key being waited on
    pub fn step(&mut self) -> Result<RunState> {
        if let RunState::AwaitingKey { register } = self.state {
            if let Some(key) = self.keypad.first_pressed() {
                debug!("key {:x} pressed; stored in {}", key, register);
                self.v[register.index()] = key;
                self.state = RunState::Running;
            }
            return Ok(self.state);
        }

        let addr = self.pc;
        match self.fetch_execute(addr) {
            Ok(()) => Ok(self.state),
            Err(e) => {
                warn!("halted at 0x{:03x}: {}", addr, e);
                Err(e)
            }
        }
    }

    fn fetch_execute(&mut self, addr: u16) -> Result<()> {
        let op = Opcode(self.memory.get_word(addr)?);
        let instr = Instruction::decode(op).ok_or(Error::UnknownOpcode { opcode: op.0, addr })?;
        trace!("0x{:03x}: {} {:?}", addr, op, instr);

        self.pc = match self.execute(instr)? {
            Flow::Next => addr + 2,
            Flow::Skip => addr + 4,
            Flow::Jump(target) => target,
        };
        Ok(())
    }

    /// step until the machine parks on a key wait, or `max_steps` have run.
    /// Returns how many steps were taken.
    pub fn run(&mut self, max_steps: usize) -> Result<usize> {
        for n in 0..max_steps {
            if self.step()? != RunState::Running {
                return Ok(n + 1);
            }
        }
        Ok(max_steps)
    }

    /// one 60Hz tick of both timers
    pub fn tick_timers(&mut self) {
        self.delay_timer.tick();
        self.sound_timer.tick();
    }

    fn execute(&mut self, instr: Instruction) -> Result<Flow> {
        use Instruction::*;
        let quirks = self.config.quirks;
        let flow = match instr {
            Sys(addr) => {
                debug!("ignoring SYS 0x{:03x}", addr);
                Flow::Next
            }
            Cls => {
                self.framebuffer.clear();
                Flow::Next
            }
            Ret => {
                if self.sp == 0 {
                    return Err(Error::StackUnderflow { addr: self.pc });
                }
                self.sp -= 1;
                Flow::Jump(self.stack[self.sp])
            }
            Jp(addr) => Flow::Jump(addr),
            Call(addr) => {
                if self.sp == STACK_DEPTH {
                    return Err(Error::StackOverflow { addr: self.pc });
                }
                self.stack[self.sp] = self.pc + 2;
                self.sp += 1;
                Flow::Jump(addr)
            }
            SeByte(x, kk) => Flow::skip_if(self.reg(x) == kk),
            SneByte(x, kk) => Flow::skip_if(self.reg(x) != kk),
            SeReg(x, y) => Flow::skip_if(self.reg(x) == self.reg(y)),
            SneReg(x, y) => Flow::skip_if(self.reg(x) != self.reg(y)),
            LdByte(x, kk) => {
                self.set_reg(x, kk);
                Flow::Next
            }
            AddByte(x, kk) => {
                self.set_reg(x, self.reg(x).wrapping_add(kk));
                Flow::Next
            }
            LdReg(x, y) => {
                self.set_reg(x, self.reg(y));
                Flow::Next
            }
            Or(x, y) | And(x, y) | Xor(x, y) => {
                let (a, b) = (self.reg(x), self.reg(y));
                let r = match instr {
                    Or(..) => a | b,
                    And(..) => a & b,
                    _ => a ^ b,
                };
                self.set_reg(x, r);
                if quirks.logic_resets_vf {
                    self.set_reg(Register::VF, 0);
                }
                Flow::Next
            }
            // for the flag-setting ops the flag is written last, so VF ends
            // up holding the flag even when x is F
            AddReg(x, y) => {
                let (sum, carry) = self.reg(x).overflowing_add(self.reg(y));
                self.set_reg(x, sum);
                self.set_reg(Register::VF, carry as u8);
                Flow::Next
            }
            Sub(x, y) => {
                let (a, b) = (self.reg(x), self.reg(y));
                self.set_reg(x, a.wrapping_sub(b));
                self.set_reg(Register::VF, (a >= b) as u8);
                Flow::Next
            }
            Subn(x, y) => {
                let (a, b) = (self.reg(x), self.reg(y));
                self.set_reg(x, b.wrapping_sub(a));
                self.set_reg(Register::VF, (b >= a) as u8);
                Flow::Next
            }
            Shr(x, y) => {
                let src = self.reg(if quirks.shift_reads_vy { y } else { x });
                self.set_reg(x, src >> 1);
                self.set_reg(Register::VF, src & 0x01);
                Flow::Next
            }
            Shl(x, y) => {
                let src = self.reg(if quirks.shift_reads_vy { y } else { x });
                self.set_reg(x, src << 1);
                self.set_reg(Register::VF, src >> 7);
                Flow::Next
            }
            LdI(addr) => {
                self.i = addr;
                Flow::Next
            }
            JpV0(addr) => {
                let target = self.reg(Register::V0) as u16 + addr;
                if target as usize >= memory::RAM_SIZE_BYTES {
                    return Err(Error::AddressOutOfBounds {
                        addr: target as usize,
                        len: 2,
                    });
                }
                Flow::Jump(target)
            }
            Rnd(x, kk) => {
                let r: u8 = self.rng.gen();
                self.set_reg(x, r & kk);
                Flow::Next
            }
            Drw(x, y, n) => {
                let (px, py) = (self.reg(x), self.reg(y));
                let sprite = self.memory.get_ro_slice(self.i, n as usize)?;
                let collision = self.framebuffer.draw_sprite(px, py, sprite);
                self.set_reg(Register::VF, collision as u8);
                Flow::Next
            }
            Skp(x) => Flow::skip_if(self.keypad.is_pressed(self.reg(x))),
            Sknp(x) => Flow::skip_if(!self.keypad.is_pressed(self.reg(x))),
            LdRegDt(x) => {
                self.set_reg(x, self.delay_timer.get());
                Flow::Next
            }
            LdKey(x) => {
                debug!("waiting for a key for {}", x);
                self.state = RunState::AwaitingKey { register: x };
                Flow::Next
            }
            LdDtReg(x) => {
                self.delay_timer.set(self.reg(x));
                Flow::Next
            }
            LdStReg(x) => {
                self.sound_timer.set(self.reg(x));
                Flow::Next
            }
            AddI(x) => {
                self.i = self.i.wrapping_add(self.reg(x) as u16);
                Flow::Next
            }
            LdFont(x) => {
                self.i = memory::glyph_addr(self.reg(x));
                Flow::Next
            }
            LdBcd(x) => {
                let value = self.reg(x);
                let digits = self.memory.get_rw_slice(self.i, 3)?;
                digits[0] = value / 100;
                digits[1] = value / 10 % 10;
                digits[2] = value % 10;
                Flow::Next
            }
            StoreRegs(x) => {
                let n = x.index() + 1;
                self.memory
                    .get_rw_slice(self.i, n)?
                    .copy_from_slice(&self.v[..n]);
                if quirks.load_store_increments_i {
                    self.i += n as u16;
                }
                Flow::Next
            }
            LoadRegs(x) => {
                let n = x.index() + 1;
                let src = self.memory.get_ro_slice(self.i, n)?;
                self.v[..n].copy_from_slice(src);
                if quirks.load_store_increments_i {
                    self.i += n as u16;
                }
                Flow::Next
            }
        };
        Ok(flow)
    }

    fn reg(&self, r: Register) -> u8 {
        self.v[r.index()]
    }

    fn set_reg(&mut self, r: Register, value: u8) {
        self.v[r.index()] = value;
    }

    /// hand the current frame to a renderer
    pub fn present(&self, display: &mut impl Display) -> Result<()> {
        display.draw(self.framebuffer.as_bytes())?;
        Ok(())
    }

    /// take the keypad state from the host
    pub fn poll_input(&mut self, input: &mut impl Input) -> Result<()> {
        self.keypad = input.pressed_keys()?;
        Ok(())
    }

    /// buzzer on while the sound timer is running, off otherwise
    pub fn sync_sound(&self, sound: &mut impl Sound) -> Result<()> {
        if self.sound_active() {
            sound.beep()?;
        } else {
            sound.stop()?;
        }
        Ok(())
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer.is_active()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn set_i(&mut self, i: u16) {
        self.i = i;
    }

    /// number of return addresses on the stack
    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn v(&self, r: Register) -> u8 {
        self.reg(r)
    }

    pub fn set_v(&mut self, r: Register, value: u8) {
        self.set_reg(r, value);
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.get()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.get()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn memory(&self) -> &Chip8Memory {
        &self.memory
    }

    /// for poking data in before a run
    pub fn memory_mut(&mut self) -> &mut Chip8Memory {
        &mut self.memory
    }

    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    pub fn keypad_mut(&mut self) -> &mut Keypad {
        &mut self.keypad
    }
}

impl Default for Machine {
    fn default() -> Self {
        Machine::new()
    }
}
