use num_traits::PrimInt;

pub const WORD_MASK: u8 = 0b_0000_0001;
pub const DIRECTION_MASK: u8 = 0b_0000_0010;

pub const MOD_MASK: u8 = 0b_11;
pub const REG_MASK: u8 = 0b_111;
pub const RM_MASK: u8 = 0b_111;

#[inline(always)]
pub fn extract_field<T: PrimInt>(value: T, mask: T, shift: usize) -> T {
    (value >> shift) & mask
}

/// Reinterprets the low `bits` bits of `value` as a two's complement number.
#[inline]
pub fn sign_extend<T: Into<u32>>(value: T, bits: u32) -> i32 {
    debug_assert!((1..=16).contains(&bits));
    let shift = 32 - bits;
    ((value.into() << shift) as i32) >> shift
}

#[inline(always)]
pub fn is_word(opcode: u8) -> bool {
    opcode & WORD_MASK != 0
}

#[inline(always)]
pub fn is_directional(opcode: u8) -> bool {
    opcode & DIRECTION_MASK != 0
}
