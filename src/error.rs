use std::io;
use thiserror::Error;

/// Everything that can stop the machine. None of these are retried
/// internally; the caller decides whether to halt, reset or report.
#[derive(Debug, Error)]
pub enum Error {
    /// the two bytes at `addr` don't match any instruction
    #[error("unknown opcode 0x{opcode:04x} at 0x{addr:03x}")]
    UnknownOpcode { opcode: u16, addr: u16 },

    /// a fetch, sprite read, or register store/load would touch memory
    /// outside 0x000..=0xfff
    #[error("access of {len} byte(s) at 0x{addr:04x} is outside memory")]
    AddressOutOfBounds { addr: usize, len: usize },

    /// CALL with all 16 stack slots in use
    #[error("stack overflow calling from 0x{addr:03x}")]
    StackOverflow { addr: u16 },

    /// RET with nothing on the stack
    #[error("stack underflow returning from 0x{addr:03x}")]
    StackUnderflow { addr: u16 },

    /// program image doesn't fit between the load address and the end of RAM
    #[error("program is {len} bytes; at most {max} fit")]
    ProgramTooLarge { len: usize, max: usize },

    /// a program reader or a host display/input/sound collaborator failed
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
