use crate::decoder::error::{DecodeError, Result};
use crate::decoder::instruction::{Instruction, Operand};
use crate::decoder::Decoder;

/// Base of the aam/aad conversion, implied when the mnemonic has no operand
const DECIMAL_BASE: u8 = 10;

/// Single-byte instructions without operands
const FIXED: [(u8, &str); 26] = [
    (0x27, "daa"),
    (0x2F, "das"),
    (0x37, "aaa"),
    (0x3F, "aas"),
    (0x90, "nop"),
    (0x98, "cbw"),
    (0x99, "cwd"),
    (0x9B, "wait"),
    (0x9C, "pushf"),
    (0x9D, "popf"),
    (0x9E, "sahf"),
    (0x9F, "lahf"),
    (0xC3, "ret"),
    (0xCB, "retf"),
    (0xCC, "int3"),
    (0xCE, "into"),
    (0xCF, "iret"),
    (0xD7, "xlat"),
    (0xF4, "hlt"),
    (0xF5, "cmc"),
    (0xF8, "clc"),
    (0xF9, "stc"),
    (0xFA, "cli"),
    (0xFB, "sti"),
    (0xFC, "cld"),
    (0xFD, "std"),
];

fn fixed_mnemonic(opcode: u8) -> Option<&'static str> {
    FIXED
        .iter()
        .find(|(byte, _)| *byte == opcode)
        .map(|(_, mnemonic)| *mnemonic)
}

pub(super) fn is_fixed(opcode: u8) -> bool {
    fixed_mnemonic(opcode).is_some()
}

pub(super) fn fixed(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    fixed_mnemonic(opcode)
        .map(Instruction::new)
        .ok_or(DecodeError::UnknownOpcode {
            opcode,
            offset: dec.op_offset,
        })
}

/// 0xD4 aam / 0xD5 aad, followed by the number base
pub(super) fn ascii_adjust(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let base = dec.cursor.read_u8()?;
    let mnemonic = if opcode == 0xD4 { "aam" } else { "aad" };
    Ok(if base == DECIMAL_BASE {
        Instruction::new(mnemonic)
    } else {
        Instruction::unary(mnemonic, Operand::Immediate(i32::from(base)))
    })
}
