use std::fmt;

use crate::decoder::prefix::Repeat;
use crate::decoder::registers::SegmentRegister;

/// Size or distance keyword written in front of a memory operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    Byte,
    Word,
    Far,
}

impl Hint {
    #[inline]
    pub fn for_width(is_word: bool) -> Self {
        if is_word {
            Hint::Word
        } else {
            Hint::Byte
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Hint::Byte => "byte",
            Hint::Word => "word",
            Hint::Far => "far",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Address {
    Direct(u16),
    Based {
        base: &'static str,
        displacement: i32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Memory {
    pub segment: Option<SegmentRegister>,
    pub address: Address,
    pub hint: Option<Hint>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Register(&'static str),
    Segment(SegmentRegister),
    Memory(Memory),
    Immediate(i32),
    /// Branch target relative to the start of the instruction.
    Relative(i32),
    /// Relative target of a 16-bit displacement jump, kept apart from the
    /// 8-bit form so nasm does not shorten it.
    NearRelative(i32),
    FarPointer { segment: u16, offset: u16 },
}

impl Operand {
    #[inline]
    pub fn is_memory(&self) -> bool {
        matches!(self, Operand::Memory(_))
    }

    /// Attaches `hint` to a memory operand; registers already carry a size.
    pub fn with_hint(self, hint: Hint) -> Self {
        match self {
            Operand::Memory(memory) => Operand::Memory(Memory {
                hint: Some(hint),
                ..memory
            }),
            operand => operand,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Address::Direct(address) => write!(f, "[{}]", address),
            // A zero displacement is dropped entirely, never rendered as " + 0"
            Address::Based {
                base,
                displacement: 0,
            } => write!(f, "[{}]", base),
            Address::Based { base, displacement } if displacement < 0 => {
                write!(f, "[{} - {}]", base, displacement.unsigned_abs())
            }
            Address::Based { base, displacement } => write!(f, "[{} + {}]", base, displacement),
        }
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(hint) = self.hint {
            write!(f, "{} ", hint.keyword())?;
        }
        if let Some(segment) = self.segment {
            write!(f, "{}:", segment)?;
        }
        write!(f, "{}", self.address)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(name) => f.write_str(name),
            Operand::Segment(segment) => write!(f, "{}", segment),
            Operand::Memory(memory) => write!(f, "{}", memory),
            Operand::Immediate(value) => write!(f, "{}", value),
            Operand::Relative(offset) if *offset < 0 => write!(f, "$-{}", offset.unsigned_abs()),
            Operand::Relative(offset) => write!(f, "$+{}", offset),
            Operand::NearRelative(offset) => write!(f, "near {}", Operand::Relative(*offset)),
            Operand::FarPointer { segment, offset } => write!(f, "{}:{}", segment, offset),
        }
    }
}

/// One decoded instruction, rendered as a single listing line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub lock: bool,
    /// Override that no memory operand consumed, written as a prefix word
    pub segment: Option<SegmentRegister>,
    pub repeat: Option<Repeat>,
    pub mnemonic: &'static str,
    pub operands: Vec<Operand>,
}

impl Instruction {
    pub fn new(mnemonic: &'static str) -> Self {
        Self {
            lock: false,
            segment: None,
            repeat: None,
            mnemonic,
            operands: Vec::new(),
        }
    }

    pub fn unary(mnemonic: &'static str, operand: Operand) -> Self {
        Self {
            operands: vec![operand],
            ..Self::new(mnemonic)
        }
    }

    pub fn binary(mnemonic: &'static str, destination: Operand, source: Operand) -> Self {
        Self {
            operands: vec![destination, source],
            ..Self::new(mnemonic)
        }
    }

    pub fn repeated(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn locked(mut self, lock: bool) -> Self {
        self.lock = lock;
        self
    }

    pub fn overridden(mut self, segment: Option<SegmentRegister>) -> Self {
        self.segment = segment;
        self
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lock {
            f.write_str("lock ")?;
        }
        if let Some(segment) = self.segment {
            write!(f, "{} ", segment)?;
        }
        if let Some(repeat) = self.repeat {
            write!(f, "{} ", repeat.mnemonic())?;
        }
        f.write_str(self.mnemonic)?;
        for (i, operand) in self.operands.iter().enumerate() {
            let separator = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", separator, operand)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn based(base: &'static str, displacement: i32) -> Operand {
        Operand::Memory(Memory {
            segment: None,
            address: Address::Based { base, displacement },
            hint: None,
        })
    }

    #[test]
    fn zero_displacement_is_elided() {
        assert_eq!(based("bx+si", 0).to_string(), "[bx+si]");
        assert_eq!(based("bp", 0).to_string(), "[bp]");
    }

    #[test]
    fn signed_displacements() {
        assert_eq!(based("bx+si", 4).to_string(), "[bx+si + 4]");
        assert_eq!(based("bx+di", -37).to_string(), "[bx+di - 37]");
        assert_eq!(based("si", -300).to_string(), "[si - 300]");
    }

    #[test]
    fn direct_address_with_segment_and_hint() {
        let operand = Operand::Memory(Memory {
            segment: Some(SegmentRegister::ES),
            address: Address::Direct(1000),
            hint: None,
        })
        .with_hint(Hint::Word);
        assert_eq!(operand.to_string(), "word es:[1000]");
    }

    #[test]
    fn hint_is_ignored_for_registers() {
        assert_eq!(Operand::Register("al").with_hint(Hint::Byte).to_string(), "al");
    }

    #[test]
    fn relative_targets() {
        assert_eq!(Operand::Relative(0).to_string(), "$+0");
        assert_eq!(Operand::Relative(12).to_string(), "$+12");
        assert_eq!(Operand::Relative(-6).to_string(), "$-6");
        assert_eq!(Operand::NearRelative(5).to_string(), "near $+5");
        assert_eq!(Operand::NearRelative(-3).to_string(), "near $-3");
    }

    #[test]
    fn instruction_lines() {
        let line = Instruction::binary("mov", Operand::Register("cx"), Operand::Register("bx"));
        assert_eq!(line.to_string(), "mov cx, bx");

        let line = Instruction::new("movsw").repeated(Repeat::Rep);
        assert_eq!(line.to_string(), "rep movsw");

        let line = Instruction::unary("not", based("bp", 9905).with_hint(Hint::Byte)).locked(true);
        assert_eq!(line.to_string(), "lock not byte [bp + 9905]");

        let line = Instruction::unary(
            "call",
            Operand::FarPointer {
                segment: 123,
                offset: 456,
            },
        );
        assert_eq!(line.to_string(), "call 123:456");

        let line = Instruction::new("movsb").overridden(Some(SegmentRegister::CS));
        assert_eq!(line.to_string(), "cs movsb");

        let line = Instruction::new("lodsw")
            .repeated(Repeat::Rep)
            .overridden(Some(SegmentRegister::ES))
            .locked(true);
        assert_eq!(line.to_string(), "lock es rep lodsw");
    }
}
