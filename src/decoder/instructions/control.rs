use crate::decoder::error::{DecodeError, Result};
use crate::decoder::instruction::{Instruction, Operand};
use crate::decoder::Decoder;
use crate::utils::number::sign_extend;

const SHORT_BRANCH_LEN: i32 = 2;
const NEAR_BRANCH_LEN: i32 = 3;

/// 0x70..=0x7F, indexed by the low nibble
const CONDITIONAL_JUMPS: [&str; 16] = [
    "jo", "jno", "jb", "jnb", "je", "jnz", "jbe", "ja", "js", "jns", "jp", "jnp", "jl", "jnl",
    "jle", "jg",
];

/// 0xE0..=0xE3, indexed by the low two bits
const LOOPS: [&str; 4] = ["loopnz", "loopz", "loop", "jcxz"];

fn short_branch_mnemonic(opcode: u8) -> Option<&'static str> {
    match opcode {
        0x70..=0x7F => Some(CONDITIONAL_JUMPS[(opcode & 0x0F) as usize]),
        0xE0..=0xE3 => Some(LOOPS[(opcode & 0b11) as usize]),
        _ => None,
    }
}

pub(super) fn is_short_branch(opcode: u8) -> bool {
    short_branch_mnemonic(opcode).is_some()
}

/// Assemblers measure `$` from the start of the instruction while the CPU adds
/// the displacement to the address after it.
fn relative_target(displacement: i32, len: i32) -> i32 {
    displacement + len
}

/// Conditional jumps, loops and jcxz with a signed 8-bit displacement
pub(super) fn short_branch(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let mnemonic = short_branch_mnemonic(opcode).ok_or(DecodeError::UnknownOpcode {
        opcode,
        offset: dec.op_offset,
    })?;
    let displacement = sign_extend(dec.cursor.read_u8()?, 8);
    Ok(Instruction::unary(
        mnemonic,
        Operand::Relative(relative_target(displacement, SHORT_BRANCH_LEN)),
    ))
}

/// 0xEB: jmp with a signed 8-bit displacement
pub(super) fn short_jump(dec: &mut Decoder, _opcode: u8) -> Result<Instruction> {
    let displacement = sign_extend(dec.cursor.read_u8()?, 8);
    Ok(Instruction::unary(
        "jmp",
        Operand::Relative(relative_target(displacement, SHORT_BRANCH_LEN)),
    ))
}

/// 0xE8 call / 0xE9 jmp within the segment, 16-bit displacement.
///
/// `jmp` carries `near`: nasm assembles an unsized in-range jmp to 0xEB.
pub(super) fn near_direct(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let displacement = sign_extend(dec.cursor.read_u16()?, 16);
    let target = relative_target(displacement, NEAR_BRANCH_LEN);
    Ok(if opcode == 0xE8 {
        Instruction::unary("call", Operand::Relative(target))
    } else {
        Instruction::unary("jmp", Operand::NearRelative(target))
    })
}

/// 0x9A call / 0xEA jmp intersegment, offset then segment
pub(super) fn far_direct(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let offset = dec.cursor.read_u16()?;
    let segment = dec.cursor.read_u16()?;
    let mnemonic = if opcode == 0x9A { "call" } else { "jmp" };
    Ok(Instruction::unary(mnemonic, Operand::FarPointer { segment, offset }))
}

/// 0xC2 ret / 0xCA retf, popping an extra 16-bit byte count
pub(super) fn ret_immediate(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let count = dec.cursor.read_u16()?;
    let mnemonic = if opcode == 0xC2 { "ret" } else { "retf" };
    Ok(Instruction::unary(mnemonic, Operand::Immediate(i32::from(count))))
}

/// 0xCD: int with an 8-bit vector
pub(super) fn interrupt(dec: &mut Decoder, _opcode: u8) -> Result<Instruction> {
    let vector = dec.cursor.read_u8()?;
    Ok(Instruction::unary("int", Operand::Immediate(i32::from(vector))))
}
