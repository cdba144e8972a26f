use crate::decoder::registers::SegmentRegister;

pub const LOCK: u8 = 0b_1111_0000;
pub const REPNE: u8 = 0b_1111_0010;
pub const REP: u8 = 0b_1111_0011;

const SEGMENT_OVERRIDE_MASK: u8 = 0b_1110_0111;
const SEGMENT_OVERRIDE: u8 = 0b_0010_0110;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Rep,
    Repne,
}

impl Repeat {
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            REP => Some(Repeat::Rep),
            REPNE => Some(Repeat::Repne),
            _ => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Repeat::Rep => "rep",
            Repeat::Repne => "repne",
        }
    }
}

/// Segment register selected by a `001ss110` override byte.
pub fn segment_override(opcode: u8) -> Option<SegmentRegister> {
    if opcode & SEGMENT_OVERRIDE_MASK == SEGMENT_OVERRIDE {
        Some(SegmentRegister::from_code(opcode >> 3))
    } else {
        None
    }
}

/// Prefix bytes waiting for the instruction they modify.
///
/// `lock` and a segment override are independent and may both be pending.
/// The lock is taken when the next instruction is emitted, the segment
/// override by the next memory operand. Whatever is left once an instruction
/// finishes is cleared by the dispatcher.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrefixState {
    lock: bool,
    segment: Option<SegmentRegister>,
}

impl PrefixState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.lock && self.segment.is_none()
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.lock
    }

    #[inline]
    pub fn segment(&self) -> Option<SegmentRegister> {
        self.segment
    }

    pub fn set_lock(&mut self) {
        self.lock = true;
    }

    /// A later override replaces an earlier one, as on the CPU.
    pub fn set_segment(&mut self, segment: SegmentRegister) {
        self.segment = Some(segment);
    }

    pub fn take_lock(&mut self) -> bool {
        std::mem::take(&mut self.lock)
    }

    pub fn take_segment(&mut self) -> Option<SegmentRegister> {
        self.segment.take()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
