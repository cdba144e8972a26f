//! Intel 8086 machine code to nasm-compatible assembly listings.

pub mod decoder;
pub mod spacing;
pub mod utils;

#[cfg(test)]
mod listing_tests;

pub use decoder::error::DecodeError;
pub use decoder::{disassemble, Decoder, Disassembly, HEADER};
pub use spacing::add_spacing;
