use thiserror::Error;

/// Conditions that halt decoding. Offsets are relative to the start of the
/// input. A truncated read reports where the missing bytes were expected,
/// every other variant reports the byte that could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown opcode {opcode:#04X} ({opcode:08b}) at offset {offset:#06X}")]
    UnknownOpcode { opcode: u8, offset: usize },
    #[error("stream truncated at offset {offset:#06X}: wanted {wanted} byte(s), {remaining} left")]
    Truncated {
        offset: usize,
        wanted: usize,
        remaining: usize,
    },
    #[error("repeat prefix followed by non-string opcode {byte:#04X} at offset {offset:#06X}")]
    InvalidRepeatTarget { byte: u8, offset: usize },
    #[error("opcode {opcode:#04X} at offset {offset:#06X} has undefined reg field {reg:03b}")]
    UndefinedGroupEncoding { opcode: u8, reg: u8, offset: usize },
    #[error("prefix at offset {offset:#06X} is not followed by an instruction")]
    DanglingPrefix { offset: usize },
}

impl DecodeError {
    /// Offset at which decoding stopped.
    pub fn offset(&self) -> usize {
        match *self {
            DecodeError::UnknownOpcode { offset, .. }
            | DecodeError::Truncated { offset, .. }
            | DecodeError::InvalidRepeatTarget { offset, .. }
            | DecodeError::UndefinedGroupEncoding { offset, .. }
            | DecodeError::DanglingPrefix { offset } => offset,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
