use std::fmt;

const BYTE_REGISTERS: [&str; 8] = ["al", "cl", "dl", "bl", "ah", "ch", "dh", "bh"];
const WORD_REGISTERS: [&str; 8] = ["ax", "cx", "dx", "bx", "sp", "bp", "si", "di"];

/// Register file selected by the `w` bit of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterTable {
    Byte,
    Word,
}

impl RegisterTable {
    #[inline]
    pub fn for_width(is_word: bool) -> Self {
        if is_word {
            RegisterTable::Word
        } else {
            RegisterTable::Byte
        }
    }

    /// Name of the register encoded by a 3-bit `reg`/`rm` field.
    #[inline]
    pub fn name(self, code: u8) -> &'static str {
        match self {
            RegisterTable::Byte => BYTE_REGISTERS[(code & 0b111) as usize],
            RegisterTable::Word => WORD_REGISTERS[(code & 0b111) as usize],
        }
    }

    #[inline]
    pub fn accumulator(self) -> &'static str {
        self.name(0b000)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SegmentRegister {
    ES = 0b_00,
    CS = 0b_01,
    SS = 0b_10,
    DS = 0b_11,
}

impl SegmentRegister {
    /// Segment register encoded by a 2-bit `sr` field.
    pub fn from_code(code: u8) -> Self {
        match code & 0b11 {
            0b_00 => SegmentRegister::ES,
            0b_01 => SegmentRegister::CS,
            0b_10 => SegmentRegister::SS,
            _ => SegmentRegister::DS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SegmentRegister::ES => "es",
            SegmentRegister::CS => "cs",
            SegmentRegister::SS => "ss",
            SegmentRegister::DS => "ds",
        }
    }
}

impl fmt::Display for SegmentRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
