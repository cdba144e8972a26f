use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::decoder::error::{DecodeError, Result};
use crate::decoder::instruction::{Hint, Instruction, Operand};
use crate::decoder::modrm::mod_rm_single;
use crate::decoder::registers::RegisterTable;
use crate::decoder::Decoder;
use crate::utils::number::{is_directional, is_word};

/// Reg field of the `110100vw` group. Slot 110 is undefined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
enum ShiftOp {
    Rol = 0b000,
    Ror = 0b001,
    Rcl = 0b010,
    Rcr = 0b011,
    Shl = 0b100,
    Shr = 0b101,
    Sar = 0b111,
}

impl ShiftOp {
    fn mnemonic(self) -> &'static str {
        match self {
            ShiftOp::Rol => "rol",
            ShiftOp::Ror => "ror",
            ShiftOp::Rcl => "rcl",
            ShiftOp::Rcr => "rcr",
            ShiftOp::Shl => "shl",
            ShiftOp::Shr => "shr",
            ShiftOp::Sar => "sar",
        }
    }
}

/// 110100vw: shift or rotate reg/mem by 1 (`v` clear) or by `cl`
pub(super) fn shift_group(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let is_word = is_word(opcode);
    // The v bit sits where other families keep d
    let by_cl = is_directional(opcode);

    let (modrm, target) = mod_rm_single(dec, RegisterTable::for_width(is_word))?;
    let op = ShiftOp::from_u8(modrm.reg).ok_or(DecodeError::UndefinedGroupEncoding {
        opcode,
        reg: modrm.reg,
        offset: dec.op_offset,
    })?;

    let count = if by_cl {
        Operand::Register("cl")
    } else {
        Operand::Immediate(1)
    };
    Ok(Instruction::binary(
        op.mnemonic(),
        target.with_hint(Hint::for_width(is_word)),
        count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reg_field_slots() {
        assert_eq!(ShiftOp::from_u8(0b100), Some(ShiftOp::Shl));
        assert_eq!(ShiftOp::from_u8(0b111), Some(ShiftOp::Sar));
        assert_eq!(ShiftOp::from_u8(0b110), None);
    }
}
