use byteorder::{ByteOrder, LittleEndian};

use crate::decoder::error::{DecodeError, Result};

/// Forward-only reader over an instruction stream.
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.offset == self.bytes.len()
    }

    /// Returns exactly `n` bytes and advances past them.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                wanted: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.bytes[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read(1)?[0])
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read(2)?))
    }

    /// Reads one byte for `is_word == false`, two otherwise.
    #[inline]
    pub fn read_data(&mut self, is_word: bool) -> Result<u16> {
        if is_word {
            self.read_u16()
        } else {
            self.read_u8().map(u16::from)
        }
    }

    /// Next opcode byte, `None` once the stream is exhausted.
    pub fn next_opcode(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.offset)?;
        self.offset += 1;
        Some(byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_offset() {
        let mut cursor = ByteCursor::new(&[0x8B, 0x2E, 0x05, 0x00]);
        assert_eq!(cursor.read_u8(), Ok(0x8B));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.read(1), Ok(&[0x2E][..]));
        assert_eq!(cursor.read_u16(), Ok(0x0005));
        assert!(cursor.at_end());
    }

    #[test]
    fn read_past_end_is_truncated() {
        let mut cursor = ByteCursor::new(&[0xB9, 0x0C]);
        cursor.read_u8().unwrap();
        assert_eq!(
            cursor.read_u16(),
            Err(DecodeError::Truncated {
                offset: 1,
                wanted: 2,
                remaining: 1
            })
        );
        // A failed read does not consume anything
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn next_opcode_signals_end_of_stream() {
        let mut cursor = ByteCursor::new(&[0x90]);
        assert_eq!(cursor.next_opcode(), Some(0x90));
        assert_eq!(cursor.next_opcode(), None);
        assert_eq!(cursor.next_opcode(), None);
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn read_data_by_width() {
        let mut cursor = ByteCursor::new(&[0xF4, 0x6C, 0x0F]);
        assert_eq!(cursor.read_data(false), Ok(0xF4));
        assert_eq!(cursor.read_data(true), Ok(3948));
    }

    #[test]
    fn empty_stream() {
        let mut cursor = ByteCursor::new(&[]);
        assert!(cursor.at_end());
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.read(1).is_err());
    }
}
