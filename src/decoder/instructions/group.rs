use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::decoder::error::{DecodeError, Result};
use crate::decoder::instruction::{Hint, Instruction, Operand};
use crate::decoder::modrm::mod_rm_single;
use crate::decoder::registers::RegisterTable;
use crate::decoder::Decoder;
use crate::utils::number::is_word;

const GROUP_2_MASK: u8 = 0b_0000_1000;

/// Reg field of `1111011w`. Slot 001 is undefined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
enum UnaryOp {
    Test = 0b000,
    Not = 0b010,
    Neg = 0b011,
    Mul = 0b100,
    Imul = 0b101,
    Div = 0b110,
    Idiv = 0b111,
}

/// Reg field of `1111111w`. Slot 111 is undefined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
enum IndirectOp {
    Inc = 0b000,
    Dec = 0b001,
    Call = 0b010,
    CallFar = 0b011,
    Jmp = 0b100,
    JmpFar = 0b101,
    Push = 0b110,
}

impl UnaryOp {
    fn mnemonic(self) -> &'static str {
        match self {
            UnaryOp::Test => "test",
            UnaryOp::Not => "not",
            UnaryOp::Neg => "neg",
            UnaryOp::Mul => "mul",
            UnaryOp::Imul => "imul",
            UnaryOp::Div => "div",
            UnaryOp::Idiv => "idiv",
        }
    }
}

impl IndirectOp {
    fn mnemonic(self) -> &'static str {
        match self {
            IndirectOp::Inc => "inc",
            IndirectOp::Dec => "dec",
            IndirectOp::Call | IndirectOp::CallFar => "call",
            IndirectOp::Jmp | IndirectOp::JmpFar => "jmp",
            IndirectOp::Push => "push",
        }
    }
}

fn undefined(dec: &Decoder, opcode: u8, reg: u8) -> DecodeError {
    DecodeError::UndefinedGroupEncoding {
        opcode,
        reg,
        offset: dec.op_offset,
    }
}

/// 1111011w (group 1) and 1111111w (group 2), operation in the reg field
pub(super) fn unary_group(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let is_word = is_word(opcode);
    let (modrm, target) = mod_rm_single(dec, RegisterTable::for_width(is_word))?;
    let size = Hint::for_width(is_word);

    if opcode & GROUP_2_MASK == 0 {
        let op = UnaryOp::from_u8(modrm.reg).ok_or_else(|| undefined(dec, opcode, modrm.reg))?;
        if op == UnaryOp::Test {
            // The immediate follows the displacement and is never sign extended
            let immediate = dec.cursor.read_data(is_word)?;
            return Ok(Instruction::binary(
                op.mnemonic(),
                target.with_hint(size),
                Operand::Immediate(i32::from(immediate)),
            ));
        }
        return Ok(Instruction::unary(op.mnemonic(), target.with_hint(size)));
    }

    let op = IndirectOp::from_u8(modrm.reg).ok_or_else(|| undefined(dec, opcode, modrm.reg))?;
    let target = match op {
        IndirectOp::Inc | IndirectOp::Dec => target.with_hint(size),
        // 0xFE only encodes inc and dec
        _ if !is_word => return Err(undefined(dec, opcode, modrm.reg)),
        IndirectOp::Push => target.with_hint(size),
        IndirectOp::Call | IndirectOp::Jmp => target,
        IndirectOp::CallFar | IndirectOp::JmpFar if target.is_memory() => {
            target.with_hint(Hint::Far)
        }
        // A far pointer can only be loaded from memory
        IndirectOp::CallFar | IndirectOp::JmpFar => return Err(undefined(dec, opcode, modrm.reg)),
    };
    Ok(Instruction::unary(op.mnemonic(), target))
}

/// 10001111: pop reg/mem
pub(super) fn pop_reg_mem(dec: &mut Decoder, _opcode: u8) -> Result<Instruction> {
    let (_, target) = mod_rm_single(dec, RegisterTable::Word)?;
    Ok(Instruction::unary("pop", target.with_hint(Hint::Word)))
}
