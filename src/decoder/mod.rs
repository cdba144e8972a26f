pub mod cursor;
pub mod error;
pub mod instruction;
mod instructions;
pub mod modrm;
pub mod prefix;
pub mod registers;


use log::{debug, error};

use crate::decoder::cursor::ByteCursor;
use crate::decoder::error::{DecodeError, Result};
use crate::decoder::instruction::Instruction;
use crate::decoder::prefix::{segment_override, PrefixState, LOCK};

/// First line of every listing.
pub const HEADER: &str = "bits 16";

/// Decoding state for one input stream: the cursor and the prefixes waiting
/// for the next instruction. Nothing is shared between decoders.
pub struct Decoder<'a> {
    pub(crate) cursor: ByteCursor<'a>,
    pub(crate) prefix: PrefixState,
    /// Offset of the opcode byte being decoded
    pub(crate) op_offset: usize,
    halted: bool,
}

impl<'a> Decoder<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: ByteCursor::new(bytes),
            prefix: PrefixState::new(),
            op_offset: 0,
            halted: false,
        }
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset()
    }

    pub fn prefix(&self) -> &PrefixState {
        &self.prefix
    }

    /// Decodes the next instruction together with any prefixes in front of
    /// it. Returns `Ok(None)` once the stream is exhausted.
    pub fn decode_next(&mut self) -> Result<Option<Instruction>> {
        let start = self.cursor.offset();
        loop {
            self.op_offset = self.cursor.offset();
            let Some(opcode) = self.cursor.next_opcode() else {
                if self.prefix.is_idle() {
                    return Ok(None);
                }
                self.prefix.clear();
                return Err(DecodeError::DanglingPrefix { offset: start });
            };

            if opcode == LOCK {
                debug!("{:#06X}: lock", self.op_offset);
                self.prefix.set_lock();
                continue;
            }
            if let Some(segment) = segment_override(opcode) {
                debug!("{:#06X}: {} override", self.op_offset, segment);
                self.prefix.set_segment(segment);
                continue;
            }

            let decoded = instructions::process(self, opcode);
            let lock = self.prefix.take_lock();
            // Still set when no memory operand took it
            let segment = self.prefix.take_segment();
            self.prefix.clear();
            let instruction = decoded?.locked(lock).overridden(segment);
            debug!(
                "{:#06X}: {} ({} bytes)",
                start,
                instruction,
                self.cursor.offset() - start
            );
            return Ok(Some(instruction));
        }
    }
}

impl Iterator for Decoder<'_> {
    type Item = Result<Instruction>;

    /// Yields instructions until the stream ends or the first error, which is
    /// yielded once before the iterator is exhausted.
    fn next(&mut self) -> Option<Self::Item> {
        if self.halted {
            return None;
        }
        match self.decode_next() {
            Ok(Some(instruction)) => Some(Ok(instruction)),
            Ok(None) => {
                self.halted = true;
                None
            }
            Err(err) => {
                self.halted = true;
                Some(Err(err))
            }
        }
    }
}

/// Result of decoding a whole stream: every line decoded before decoding
/// stopped, and the error that stopped it, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disassembly {
    pub lines: Vec<String>,
    pub error: Option<DecodeError>,
}

impl Disassembly {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// The listing: header line then one line per instruction.
    pub fn text(&self) -> String {
        let body: usize = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut text = String::with_capacity(HEADER.len() + 1 + body);
        text.push_str(HEADER);
        text.push('\n');
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }

    pub fn into_result(self) -> Result<String> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.text()),
        }
    }
}

/// Decodes `bytes` up to the end of the stream or the first undecodable byte.
pub fn disassemble(bytes: &[u8]) -> Disassembly {
    let mut lines = Vec::new();
    for decoded in Decoder::new(bytes) {
        match decoded {
            Ok(instruction) => lines.push(instruction.to_string()),
            Err(err) => {
                error!("decoding halted after {} instruction(s): {}", lines.len(), err);
                return Disassembly {
                    lines,
                    error: Some(err),
                };
            }
        }
    }
    Disassembly { lines, error: None }
}
