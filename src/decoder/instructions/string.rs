use crate::decoder::error::{DecodeError, Result};
use crate::decoder::instruction::Instruction;
use crate::decoder::prefix::Repeat;
use crate::decoder::Decoder;
use crate::utils::number::is_word;

/// Keyed by the top seven opcode bits, byte and word forms.
const STRING_OPS: [(u8, [&str; 2]); 5] = [
    (0b_101_0010, ["movsb", "movsw"]),
    (0b_101_0011, ["cmpsb", "cmpsw"]),
    (0b_101_0101, ["stosb", "stosw"]),
    (0b_101_0110, ["lodsb", "lodsw"]),
    (0b_101_0111, ["scasb", "scasw"]),
];

fn string_mnemonic(opcode: u8) -> Option<&'static str> {
    STRING_OPS
        .iter()
        .find(|(base, _)| *base == opcode >> 1)
        .map(|(_, names)| names[is_word(opcode) as usize])
}

pub(super) fn is_string_op(opcode: u8) -> bool {
    Repeat::from_opcode(opcode).is_some() || string_mnemonic(opcode).is_some()
}

/// String primitives, and `rep`/`repne` fused with the one that follows
pub(super) fn string_op(dec: &mut Decoder, opcode: u8) -> Result<Instruction> {
    let Some(repeat) = Repeat::from_opcode(opcode) else {
        return string_mnemonic(opcode)
            .map(Instruction::new)
            .ok_or(DecodeError::UnknownOpcode {
                opcode,
                offset: dec.op_offset,
            });
    };

    let offset = dec.cursor.offset();
    let target = dec.cursor.read_u8()?;
    let mnemonic = string_mnemonic(target).ok_or(DecodeError::InvalidRepeatTarget {
        byte: target,
        offset,
    })?;
    Ok(Instruction::new(mnemonic).repeated(repeat))
}
