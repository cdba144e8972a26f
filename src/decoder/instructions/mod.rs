mod alu;
mod control;
mod group;
mod misc;
mod shift;
mod string;
mod transfer;

use crate::decoder::error::{DecodeError, Result};
use crate::decoder::instruction::Instruction;
use crate::decoder::Decoder;

type Handler = fn(&mut Decoder, u8) -> Result<Instruction>;

struct Rule {
    name: &'static str,
    matches: fn(u8) -> bool,
    decode: Handler,
}

/// Opcode families, most specific first. Exact byte tables come before the
/// bit-mask families and the first matching rule decodes the instruction.
static RULES: [Rule; 27] = [
    // Exact byte families
    Rule {
        name: "jcc/loop",
        matches: control::is_short_branch,
        decode: control::short_branch,
    },
    Rule {
        name: "string",
        matches: string::is_string_op,
        decode: string::string_op,
    },
    Rule {
        name: "fixed",
        matches: misc::is_fixed,
        decode: misc::fixed,
    },
    Rule {
        name: "call/jmp far",
        matches: |op| op == 0x9A || op == 0xEA,
        decode: control::far_direct,
    },
    Rule {
        name: "call/jmp near",
        matches: |op| op == 0xE8 || op == 0xE9,
        decode: control::near_direct,
    },
    Rule {
        name: "jmp short",
        matches: |op| op == 0xEB,
        decode: control::short_jump,
    },
    Rule {
        name: "ret imm",
        matches: |op| op == 0xC2 || op == 0xCA,
        decode: control::ret_immediate,
    },
    Rule {
        name: "int",
        matches: |op| op == 0xCD,
        decode: control::interrupt,
    },
    Rule {
        name: "aam/aad",
        matches: |op| op == 0xD4 || op == 0xD5,
        decode: misc::ascii_adjust,
    },
    Rule {
        name: "lea/lds/les",
        matches: |op| op == 0x8D || op == 0xC4 || op == 0xC5,
        decode: transfer::load_address,
    },
    // Bit-mask families
    Rule {
        name: "test/xchg/mov r/m",
        matches: |op| (0b_1000_0100..=0b_1000_1011).contains(&op),
        decode: transfer::reg_mem,
    },
    Rule {
        name: "mov imm reg",
        matches: |op| op >> 4 == 0b_1011,
        decode: transfer::immediate_to_register,
    },
    Rule {
        name: "mov imm r/m",
        matches: |op| op >> 1 == 0b_110_0011,
        decode: transfer::immediate_to_reg_mem,
    },
    Rule {
        name: "mov sreg",
        matches: |op| op & 0b_1111_1101 == 0b_1000_1100,
        decode: transfer::segment_move,
    },
    Rule {
        name: "test acc imm",
        matches: |op| op >> 1 == 0b_101_0100,
        decode: alu::test_accumulator,
    },
    Rule {
        name: "mov acc mem",
        matches: |op| op >> 2 == 0b_10_1000,
        decode: transfer::accumulator_move,
    },
    Rule {
        name: "alu imm r/m",
        matches: |op| op >> 2 == 0b_10_0000,
        decode: alu::immediate_to_reg_mem,
    },
    Rule {
        name: "alu r/m",
        matches: |op| op & 0b_1100_0100 == 0,
        decode: alu::reg_mem,
    },
    Rule {
        name: "alu imm acc",
        matches: |op| op & 0b_1100_0110 == 0b_0000_0100,
        decode: alu::immediate_to_accumulator,
    },
    Rule {
        name: "shift",
        matches: |op| op >> 2 == 0b_11_0100,
        decode: shift::shift_group,
    },
    Rule {
        name: "group 1/2",
        matches: |op| op & 0b_1111_0110 == 0b_1111_0110,
        decode: group::unary_group,
    },
    Rule {
        name: "pop r/m",
        matches: |op| op == 0x8F,
        decode: group::pop_reg_mem,
    },
    Rule {
        name: "inc/dec/push/pop reg",
        matches: |op| op >> 5 == 0b_010,
        decode: transfer::word_register,
    },
    Rule {
        name: "push/pop sreg",
        matches: |op| op & 0b_1110_0110 == 0b_0000_0110 && op != 0x0F,
        decode: transfer::segment_stack,
    },
    Rule {
        name: "xchg acc",
        matches: |op| (0b_1001_0001..=0b_1001_0111).contains(&op),
        decode: transfer::exchange_accumulator,
    },
    Rule {
        name: "in/out imm",
        matches: |op| op >> 2 == 0b_11_1001,
        decode: transfer::port_immediate,
    },
    Rule {
        name: "in/out dx",
        matches: |op| op >> 2 == 0b_11_1011,
        decode: transfer::port_dx,
    },
];

/// Classifies `opcode` and decodes the rest of its instruction.
pub fn process(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let rule = RULES
        .iter()
        .find(|rule| (rule.matches)(opcode))
        .ok_or(DecodeError::UnknownOpcode {
            opcode,
            offset: dec.op_offset,
        })?;
    log::trace!("{:#04X} -> {}", opcode, rule.name);
    (rule.decode)(dec, opcode)
}
