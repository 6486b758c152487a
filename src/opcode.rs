/// # opcode
///
/// Every instruction is two bytes, big-endian. Most of them carry some of:
///
///   x    (bits 8-11)  register index
///   y    (bits 4-7)   register index
///   n    (bits 0-3)   4-bit immediate
///   kk   (bits 0-7)   8-bit immediate
///   nnn  (bits 0-11)  address
///
/// decoding turns the raw word into an `Instruction` with those fields
/// already pulled out; anything that doesn't decode is an error here rather
/// than a no-op later.
use std::fmt;

/// one of V0-VF
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register(u8);

impl Register {
    pub const V0: Register = Register(0x0);
    /// carry/borrow/collision flag
    pub const VF: Register = Register(0xf);

    /// only the low nibble counts
    pub const fn new(index: u8) -> Self {
        Register(index & 0x0f)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

/// raw instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    pub fn from_bytes(hi: u8, lo: u8) -> Self {
        Opcode(u16::from_be_bytes([hi, lo]))
    }

    /// bits 12-15, the instruction family
    pub fn family(self) -> u8 {
        (self.0 >> 12) as u8
    }

    pub fn x(self) -> Register {
        Register::new((self.0 >> 8) as u8)
    }

    pub fn y(self) -> Register {
        Register::new((self.0 >> 4) as u8)
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000f) as u8
    }

    pub fn kk(self) -> u8 {
        (self.0 & 0x00ff) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0fff
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

/// The 35 CHIP-8 instructions, operands already decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: call RCA 1802 machine code; ignored
    Sys(u16),
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1nnn
    Jp(u16),
    /// 2nnn
    Call(u16),
    /// 3xkk
    SeByte(Register, u8),
    /// 4xkk
    SneByte(Register, u8),
    /// 5xy0
    SeReg(Register, Register),
    /// 6xkk
    LdByte(Register, u8),
    /// 7xkk
    AddByte(Register, u8),
    /// 8xy0
    LdReg(Register, Register),
    /// 8xy1
    Or(Register, Register),
    /// 8xy2
    And(Register, Register),
    /// 8xy3
    Xor(Register, Register),
    /// 8xy4
    AddReg(Register, Register),
    /// 8xy5
    Sub(Register, Register),
    /// 8xy6
    Shr(Register, Register),
    /// 8xy7
    Subn(Register, Register),
    /// 8xyE
    Shl(Register, Register),
    /// 9xy0
    SneReg(Register, Register),
    /// Annn
    LdI(u16),
    /// Bnnn
    JpV0(u16),
    /// Cxkk
    Rnd(Register, u8),
    /// Dxyn
    Drw(Register, Register, u8),
    /// Ex9E
    Skp(Register),
    /// ExA1
    Sknp(Register),
    /// Fx07
    LdRegDt(Register),
    /// Fx0A
    LdKey(Register),
    /// Fx15
    LdDtReg(Register),
    /// Fx18
    LdStReg(Register),
    /// Fx1E
    AddI(Register),
    /// Fx29
    LdFont(Register),
    /// Fx33
    LdBcd(Register),
    /// Fx55
    StoreRegs(Register),
    /// Fx65
    LoadRegs(Register),
}

impl Instruction {
    /// `None` if the word isn't a CHIP-8 instruction
    pub fn decode(op: Opcode) -> Option<Instruction> {
        use Instruction::*;
        let (x, y, n, kk, nnn) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        let instr = match op.family() {
            0x0 => match op.0 {
                0x00e0 => Cls,
                0x00ee => Ret,
                _ => Sys(nnn),
            },
            0x1 => Jp(nnn),
            0x2 => Call(nnn),
            0x3 => SeByte(x, kk),
            0x4 => SneByte(x, kk),
            0x5 if n == 0 => SeReg(x, y),
            0x6 => LdByte(x, kk),
            0x7 => AddByte(x, kk),
            0x8 => match n {
                0x0 => LdReg(x, y),
                0x1 => Or(x, y),
                0x2 => And(x, y),
                0x3 => Xor(x, y),
                0x4 => AddReg(x, y),
                0x5 => Sub(x, y),
                0x6 => Shr(x, y),
                0x7 => Subn(x, y),
                0xe => Shl(x, y),
                _ => return None,
            },
            0x9 if n == 0 => SneReg(x, y),
            0xa => LdI(nnn),
            0xb => JpV0(nnn),
            0xc => Rnd(x, kk),
            0xd => Drw(x, y, n),
            0xe => match kk {
                0x9e => Skp(x),
                0xa1 => Sknp(x),
                _ => return None,
            },
            0xf => match kk {
                0x07 => LdRegDt(x),
                0x0a => LdKey(x),
                0x15 => LdDtReg(x),
                0x18 => LdStReg(x),
                0x1e => AddI(x),
                0x29 => LdFont(x),
                0x33 => LdBcd(x),
                0x55 => StoreRegs(x),
                0x65 => LoadRegs(x),
                _ => return None,
            },
            _ => return None,
        };
        Some(instr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use Instruction::*;

    fn v(i: u8) -> Register {
        Register::new(i)
    }

    #[test]
    fn test_fields() {
        let op = Opcode::from_bytes(0xd1, 0x2f);
        assert_eq!(op.0, 0xd12f);
        assert_eq!(op.family(), 0xd);
        assert_eq!(op.x(), v(1));
        assert_eq!(op.y(), v(2));
        assert_eq!(op.n(), 0xf);
        assert_eq!(op.kk(), 0x2f);
        assert_eq!(op.nnn(), 0x12f);
    }

    #[test]
    fn test_register_masks_index() {
        assert_eq!(Register::new(0x1f), Register::VF);
        assert_eq!(Register::VF.index(), 15);
        assert_eq!(Register::new(0xa).to_string(), "VA");
    }

    #[rstest]
    #[case(0x0123, Sys(0x123))]
    #[case(0x00e0, Cls)]
    #[case(0x00ee, Ret)]
    #[case(0x1234, Jp(0x234))]
    #[case(0x2456, Call(0x456))]
    #[case(0x342a, SeByte(v(4), 0x2a))]
    #[case(0x4a75, SneByte(v(0xa), 0x75))]
    #[case(0x5ae0, SeReg(v(0xa), v(0xe)))]
    #[case(0x63f5, LdByte(v(3), 0xf5))]
    #[case(0x7b12, AddByte(v(0xb), 0x12))]
    #[case(0x8590, LdReg(v(5), v(9)))]
    #[case(0x8101, Or(v(1), v(0)))]
    #[case(0x8642, And(v(6), v(4)))]
    #[case(0x87f3, Xor(v(7), v(0xf)))]
    #[case(0x8264, AddReg(v(2), v(6)))]
    #[case(0x8c45, Sub(v(0xc), v(4)))]
    #[case(0x8106, Shr(v(1), v(0)))]
    #[case(0x86d7, Subn(v(6), v(0xd)))]
    #[case(0x8e2e, Shl(v(0xe), v(2)))]
    #[case(0x9450, SneReg(v(4), v(5)))]
    #[case(0xa568, LdI(0x568))]
    #[case(0xbabc, JpV0(0xabc))]
    #[case(0xc5af, Rnd(v(5), 0xaf))]
    #[case(0xd7b0, Drw(v(7), v(0xb), 0))]
    #[case(0xe49e, Skp(v(4)))]
    #[case(0xeca1, Sknp(v(0xc)))]
    #[case(0xf907, LdRegDt(v(9)))]
    #[case(0xfd0a, LdKey(v(0xd)))]
    #[case(0xf315, LdDtReg(v(3)))]
    #[case(0xf718, LdStReg(v(7)))]
    #[case(0xf91e, AddI(v(9)))]
    #[case(0xff29, LdFont(v(0xf)))]
    #[case(0xf533, LdBcd(v(5)))]
    #[case(0xf655, StoreRegs(v(6)))]
    #[case(0xf865, LoadRegs(v(8)))]
    fn test_decode(#[case] word: u16, #[case] expected: Instruction) {
        assert_eq!(Instruction::decode(Opcode(word)), Some(expected));
    }

    #[rstest]
    #[case(0x5121)]
    #[case(0x912f)]
    #[case(0x8008)]
    #[case(0x800d)]
    #[case(0xe09f)]
    #[case(0xf000)]
    #[case(0xf0ff)]
    fn test_decode_rejects(#[case] word: u16) {
        assert_eq!(Instruction::decode(Opcode(word)), None);
    }
}
