use crate::error::{Error, Result};
use log::debug;
use std::io;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// how much RAM we have
pub const RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const PROGRAM_ADDR: u16 = 0x0200;

/// largest program that fits between `PROGRAM_ADDR` and the top of RAM
pub const MAX_PROGRAM_BYTES: usize = RAM_SIZE_BYTES - PROGRAM_ADDR as usize;

/// where the hex digit glyphs live, when installed
pub const FONT_ADDR: u16 = 0x050;

/// bytes per glyph
pub const FONT_GLYPH_BYTES: u16 = 5;

/// Represents memory map, ROM, RAM etc. Every access is bounds checked up
/// front, so a failed call never leaves a partial write behind.
pub trait MemoryMap {
    /// write unknown len of data into memory at a particular address
    fn write_any(&mut self, reader: &mut impl io::Read, addr: u16) -> Result<()> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        self.write(&buf, addr)
    }

    /// write a chunk of bytes into "RAM"
    fn write(&mut self, data: &[u8], addr: u16) -> Result<()> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// get a big-endian two-byte word (opcodes)
    fn get_word(&self, addr: u16) -> Result<u16> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8]>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8]>;
}

/// checks `addr..addr+len` sits inside RAM, handing back the usize range
fn span(addr: u16, len: usize) -> Result<std::ops::Range<usize>> {
    let a = addr as usize;
    match a.checked_add(len) {
        Some(end) if end <= RAM_SIZE_BYTES => Ok(a..end),
        _ => Err(Error::AddressOutOfBounds { addr: a, len }),
    }
}

/// The CHIP-8 4K memory map:
///   0x0000-0x01ff  interpreter (font at 0x0050 when installed)
///   0x0200-0x0fff  program
///
/// stack, registers and display are held outside of RAM
pub struct Chip8Memory {
    bytes: Box<[u8]>,
}

impl MemoryMap for Chip8Memory {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8]> {
        let r = span(addr, len)?;
        Ok(&mut self.bytes[r])
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let r = span(addr, len)?;
        Ok(&self.bytes[r])
    }
}

impl Chip8Memory {
    /// all zeroes
    pub fn new() -> Self {
        Chip8Memory {
            bytes: vec![0u8; RAM_SIZE_BYTES].into_boxed_slice(),
        }
    }

    /// zeroed, with the hex digit glyphs at `FONT_ADDR`
    pub fn with_font() -> Self {
        let mut mm = Chip8Memory::new();
        let f = FONT_ADDR as usize;
        mm.bytes[f..f + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        mm
    }

    /// load a CHIP-8 program at 0x200, refusing anything that would run past
    /// the top of RAM
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_BYTES {
            return Err(Error::ProgramTooLarge {
                len: program.len(),
                max: MAX_PROGRAM_BYTES,
            });
        }
        self.write(program, PROGRAM_ADDR)?;
        debug!("loaded {} byte program at 0x{:03x}", program.len(), PROGRAM_ADDR);
        Ok(())
    }

    /// the whole of RAM
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for Chip8Memory {
    fn default() -> Self {
        Chip8Memory::new()
    }
}

/// address of the glyph for hex digit `digit` (only the low nibble counts)
pub fn glyph_addr(digit: u8) -> u16 {
    FONT_ADDR + FONT_GLYPH_BYTES * (digit & 0x0f) as u16
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
