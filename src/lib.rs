//! A CHIP-8 virtual machine core.
//!
//! ## Design
//!
//! * one `Machine` owning all architectural state; `step()` runs one
//!   instruction, `tick_timers()` is one 60Hz timer tick
//! * the host does the pacing: call `step()` at whatever rate you like
//!   (500-1000Hz is usual) and `tick_timers()` at 60Hz
//! * decode is a separate pure step (`opcode`), producing an `Instruction`;
//!   words that aren't instructions are errors, not no-ops
//! * Fx0A doesn't block: the machine parks in `RunState::AwaitingKey` and
//!   each `step()` checks the keypad until a key is down
//! * abstract display, input and sound behind traits so the host can plug
//!   in whatever it has; the machine never calls them on its own
//! * some config (e.g. COSMAC VIP vs. later interpreter quirks)
//!
//! Model
//!
//! host
//!  |-- machine(config)
//!  |    |-- memory (4K, program at 0x200, optional font at 0x050)
//!  |    |-- registers, stack, timers, framebuffer, keypad
//!  |    `-- step() = fetch, decode, execute, move PC
//!  `-- main loop
//!       |-- machine.poll_input(&mut input)
//!       |-- machine.step()                      // n times per frame
//!       |-- machine.tick_timers()               // once per frame
//!       |-- machine.present(&mut display)
//!       `-- machine.sync_sound(&mut sound)
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod machine;
pub mod memory;
pub mod opcode;
pub mod sound;
mod timer;

pub use config::{Config, Quirks};
pub use error::{Error, Result};
pub use machine::{Machine, RunState};
pub use opcode::{Instruction, Opcode, Register};
