use crate::decoder::cursor::ByteCursor;
use crate::decoder::error::Result;
use crate::decoder::instruction::{Address, Memory, Operand};
use crate::decoder::prefix::PrefixState;
use crate::decoder::registers::RegisterTable;
use crate::decoder::Decoder;
use crate::utils::number::{extract_field, sign_extend, MOD_MASK, REG_MASK, RM_MASK};

pub const MOD_MEMORY: u8 = 0b_00;
pub const MOD_MEMORY_DISP8: u8 = 0b_01;
pub const MOD_MEMORY_DISP16: u8 = 0b_10;
pub const MOD_REGISTER: u8 = 0b_11;

const RM_DIRECT: u8 = 0b_110;

/// The `mod reg r/m` byte following most two-operand opcodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModRM {
    pub mode: u8,
    pub reg: u8,
    pub rm: u8,
}

impl ModRM {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            mode: extract_field(byte, MOD_MASK, 6),
            reg: extract_field(byte, REG_MASK, 3),
            rm: extract_field(byte, RM_MASK, 0),
        }
    }

    pub fn fetch(cursor: &mut ByteCursor) -> Result<Self> {
        cursor.read_u8().map(Self::from_byte)
    }

    #[inline]
    pub fn is_register(&self) -> bool {
        self.mode == MOD_REGISTER
    }
}

/// Effective address expression selected by `rm` for memory forms.
#[inline(always)]
pub fn rm_base(rm: u8) -> &'static str {
    match rm & 0b111 {
        0b000 => "bx+si",
        0b001 => "bx+di",
        0b010 => "bp+si",
        0b011 => "bp+di",
        0b100 => "si",
        0b101 => "di",
        0b110 => "bp",
        _ => "bx",
    }
}

/// Decodes the r/m half of a ModRM byte, reading any displacement that
/// follows. A pending segment override is consumed by memory forms before
/// the displacement is read and left alone for register forms.
pub fn decode_rm(
    mode: u8,
    rm: u8,
    cursor: &mut ByteCursor,
    prefix: &mut PrefixState,
    table: RegisterTable,
) -> Result<Operand> {
    if mode == MOD_REGISTER {
        return Ok(Operand::Register(table.name(rm)));
    }

    let segment = prefix.take_segment();
    let address = match mode {
        MOD_MEMORY if rm == RM_DIRECT => Address::Direct(cursor.read_u16()?),
        MOD_MEMORY => Address::Based {
            base: rm_base(rm),
            displacement: 0,
        },
        MOD_MEMORY_DISP8 => Address::Based {
            base: rm_base(rm),
            displacement: sign_extend(cursor.read_u8()?, 8),
        },
        _ => Address::Based {
            base: rm_base(rm),
            displacement: sign_extend(cursor.read_u16()?, 16),
        },
    };

    Ok(Operand::Memory(Memory {
        segment,
        address,
        hint: None,
    }))
}

/// Direct memory operand without a ModRM byte, as used by the accumulator moves.
pub fn direct_address(cursor: &mut ByteCursor, prefix: &mut PrefixState) -> Result<Operand> {
    let segment = prefix.take_segment();
    Ok(Operand::Memory(Memory {
        segment,
        address: Address::Direct(cursor.read_u16()?),
        hint: None,
    }))
}

/// Fetches a ModRM byte and decodes its r/m operand.
pub fn mod_rm_single(dec: &mut Decoder, table: RegisterTable) -> Result<(ModRM, Operand)> {
    let modrm = ModRM::fetch(&mut dec.cursor)?;
    let operand = decode_rm(modrm.mode, modrm.rm, &mut dec.cursor, &mut dec.prefix, table)?;
    Ok((modrm, operand))
}

/// Fetches a ModRM byte and returns `(destination, source)`: the `reg`
/// register first when `directional`, the r/m operand first otherwise.
pub fn mod_rm_pair(
    dec: &mut Decoder,
    table: RegisterTable,
    directional: bool,
) -> Result<(Operand, Operand)> {
    let (modrm, rm) = mod_rm_single(dec, table)?;
    let reg = Operand::Register(table.name(modrm.reg));
    Ok(if directional { (reg, rm) } else { (rm, reg) })
}
