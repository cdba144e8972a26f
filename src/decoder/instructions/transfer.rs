use crate::decoder::error::{DecodeError, Result};
use crate::decoder::instruction::{Hint, Instruction, Operand};
use crate::decoder::modrm::{decode_rm, direct_address, mod_rm_pair, mod_rm_single, ModRM};
use crate::decoder::registers::{RegisterTable, SegmentRegister};
use crate::decoder::Decoder;
use crate::utils::number::{extract_field, is_directional, is_word, REG_MASK};

const IMMEDIATE_WORD_MASK: u8 = 0b_0000_1000;
const POP_MASK: u8 = 0b_0000_0001;
/// Segment registers only use codes 00-11 of the reg field
const SEGMENT_CODE_MASK: u8 = 0b_100;

fn undefined(dec: &Decoder, opcode: u8, reg: u8) -> DecodeError {
    DecodeError::UndefinedGroupEncoding {
        opcode,
        reg,
        offset: dec.op_offset,
    }
}

/// 100001xw / 100010dw: test, xchg and mov between reg/mem and register
pub(super) fn reg_mem(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let table = RegisterTable::for_width(is_word(opcode));
    let mnemonic = match opcode & !0b1 {
        0x84 => "test",
        0x86 => "xchg",
        _ => "mov",
    };
    // Only mov has a direction bit, test and xchg always put r/m first
    let directional = mnemonic == "mov" && is_directional(opcode);
    let (destination, source) = mod_rm_pair(dec, table, directional)?;
    Ok(Instruction::binary(mnemonic, destination, source))
}

/// 1011wrrr: mov immediate to register
pub(super) fn immediate_to_register(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let is_word = opcode & IMMEDIATE_WORD_MASK != 0;
    let register = RegisterTable::for_width(is_word).name(opcode);
    let immediate = dec.cursor.read_data(is_word)?;
    Ok(Instruction::binary(
        "mov",
        Operand::Register(register),
        Operand::Immediate(i32::from(immediate)),
    ))
}

/// 1100011w: mov immediate to reg/mem, reg field 000
pub(super) fn immediate_to_reg_mem(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let is_word = is_word(opcode);
    let (modrm, destination) = mod_rm_single(dec, RegisterTable::for_width(is_word))?;
    if modrm.reg != 0 {
        return Err(undefined(dec, opcode, modrm.reg));
    }
    let immediate = dec.cursor.read_data(is_word)?;
    Ok(Instruction::binary(
        "mov",
        destination.with_hint(Hint::for_width(is_word)),
        Operand::Immediate(i32::from(immediate)),
    ))
}

/// 100011d0: mov between reg/mem and a segment register
pub(super) fn segment_move(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let modrm = ModRM::fetch(&mut dec.cursor)?;
    if modrm.reg & SEGMENT_CODE_MASK != 0 {
        return Err(undefined(dec, opcode, modrm.reg));
    }
    let segment = Operand::Segment(SegmentRegister::from_code(modrm.reg));
    let rm = decode_rm(
        modrm.mode,
        modrm.rm,
        &mut dec.cursor,
        &mut dec.prefix,
        RegisterTable::Word,
    )?;
    Ok(if is_directional(opcode) {
        Instruction::binary("mov", segment, rm)
    } else {
        Instruction::binary("mov", rm, segment)
    })
}

/// 1010000w / 1010001w: mov between accumulator and a direct address
pub(super) fn accumulator_move(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let accumulator = Operand::Register(RegisterTable::for_width(is_word(opcode)).accumulator());
    let memory = direct_address(&mut dec.cursor, &mut dec.prefix)?;
    Ok(if is_directional(opcode) {
        Instruction::binary("mov", memory, accumulator)
    } else {
        Instruction::binary("mov", accumulator, memory)
    })
}

/// 10010rrr: xchg ax with a word register
pub(super) fn exchange_accumulator(_dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    Ok(Instruction::binary(
        "xchg",
        Operand::Register(RegisterTable::Word.accumulator()),
        Operand::Register(RegisterTable::Word.name(opcode)),
    ))
}

/// 0x8D lea, 0xC5 lds, 0xC4 les: word register loaded from reg/mem
pub(super) fn load_address(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let mnemonic = match opcode {
        0x8D => "lea",
        0xC5 => "lds",
        _ => "les",
    };
    let (destination, source) = mod_rm_pair(dec, RegisterTable::Word, true)?;
    Ok(Instruction::binary(mnemonic, destination, source))
}

/// 01ooorrr: inc, dec, push and pop of a word register
pub(super) fn word_register(_dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let mnemonic = match extract_field(opcode, 0b11, 3) {
        0b00 => "inc",
        0b01 => "dec",
        0b10 => "push",
        _ => "pop",
    };
    Ok(Instruction::unary(
        mnemonic,
        Operand::Register(RegisterTable::Word.name(opcode)),
    ))
}

/// 000ss110 push / 000ss111 pop of a segment register
pub(super) fn segment_stack(_dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let mnemonic = if opcode & POP_MASK != 0 { "pop" } else { "push" };
    let segment = SegmentRegister::from_code(extract_field(opcode, REG_MASK, 3));
    Ok(Instruction::unary(mnemonic, Operand::Segment(segment)))
}

fn port_transfer(opcode: u8, port: Operand) -> Instruction {
    let accumulator = Operand::Register(RegisterTable::for_width(is_word(opcode)).accumulator());
    // The d bit selects out
    if is_directional(opcode) {
        Instruction::binary("out", port, accumulator)
    } else {
        Instruction::binary("in", accumulator, port)
    }
}

/// 1110010w in / 1110011w out with an 8-bit port number
pub(super) fn port_immediate(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let port = dec.cursor.read_u8()?;
    Ok(port_transfer(opcode, Operand::Immediate(i32::from(port))))
}

/// 1110110w in / 1110111w out with the port in dx
pub(super) fn port_dx(_dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    Ok(port_transfer(opcode, Operand::Register("dx")))
}
