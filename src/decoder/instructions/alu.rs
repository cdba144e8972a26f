use crate::decoder::error::Result;
use crate::decoder::instruction::{Hint, Instruction, Operand};
use crate::decoder::modrm::{decode_rm, mod_rm_pair, ModRM};
use crate::decoder::registers::RegisterTable;
use crate::decoder::Decoder;
use crate::utils::number::{extract_field, is_directional, is_word, sign_extend, REG_MASK};

const SIGN_EXTEND_MASK: u8 = 0b_0000_0010;

/// Indexed by the `ooo` field of `00ooo0dw` or the reg field of `100000sw`.
const ALU_OPS: [&str; 8] = ["add", "or", "adc", "sbb", "and", "sub", "xor", "cmp"];

#[inline]
fn alu_op(field: u8) -> &'static str {
    ALU_OPS[(field & 0b111) as usize]
}

/// 00ooo0dw: reg/mem with register, either direction
pub(super) fn reg_mem(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let table = RegisterTable::for_width(is_word(opcode));
    let (destination, source) = mod_rm_pair(dec, table, is_directional(opcode))?;
    Ok(Instruction::binary(
        alu_op(extract_field(opcode, REG_MASK, 3)),
        destination,
        source,
    ))
}

/// 100000sw: immediate to reg/mem, operation in the reg field.
///
/// With `w` set the immediate is two bytes, or one byte sign extended to a
/// word when `s` is also set. Memory destinations carry a size hint.
pub(super) fn immediate_to_reg_mem(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let is_word = is_word(opcode);
    let modrm = ModRM::fetch(&mut dec.cursor)?;
    let destination = decode_rm(
        modrm.mode,
        modrm.rm,
        &mut dec.cursor,
        &mut dec.prefix,
        RegisterTable::for_width(is_word),
    )?;

    let immediate = match (is_word, opcode & SIGN_EXTEND_MASK != 0) {
        (false, _) => i32::from(dec.cursor.read_u8()?),
        (true, true) => sign_extend(dec.cursor.read_u8()?, 8),
        (true, false) => i32::from(dec.cursor.read_u16()?),
    };

    Ok(Instruction::binary(
        alu_op(modrm.reg),
        destination.with_hint(Hint::for_width(is_word)),
        Operand::Immediate(immediate),
    ))
}

/// 00ooo10w: immediate to accumulator, rendered signed
pub(super) fn immediate_to_accumulator(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let is_word = is_word(opcode);
    let immediate = if is_word {
        sign_extend(dec.cursor.read_u16()?, 16)
    } else {
        sign_extend(dec.cursor.read_u8()?, 8)
    };
    Ok(Instruction::binary(
        alu_op(extract_field(opcode, REG_MASK, 3)),
        Operand::Register(RegisterTable::for_width(is_word).accumulator()),
        Operand::Immediate(immediate),
    ))
}

/// 1010100w: test accumulator with immediate, rendered unsigned
pub(super) fn test_accumulator(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let is_word = is_word(opcode);
    let immediate = dec.cursor.read_data(is_word)?;
    Ok(Instruction::binary(
        "test",
        Operand::Register(RegisterTable::for_width(is_word).accumulator()),
        Operand::Immediate(i32::from(immediate)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alu_table_order() {
        let ops: Vec<_> = (0..8).map(alu_op).collect();
        assert_eq!(ops, ["add", "or", "adc", "sbb", "and", "sub", "xor", "cmp"]);
    }
}
