//! Endianness strategy for multi-byte record fields. Resolved once per
//! record from its `record_format` byte and then threaded into every
//! subsequent field read, following the same tagged-dispatch idea as the
//! FEC codec table this crate's decoders are modeled on: pick the
//! implementation once, call through a trait object rather than branching
//! on every read.

use crate::tools::error::{PcmiError, Result};

/// A record's multi-byte fields are read with whichever strategy its
/// `record_format` selects.
pub trait EndianStrategy: std::fmt::Debug {
    /// Read an unsigned 16-bit value from `bytes` at `offset`.
    fn read_u16(&self, bytes: &[u8], offset: usize) -> Result<u16>;
    /// Read a signed 16-bit value from `bytes` at `offset`.
    fn read_i16(&self, bytes: &[u8], offset: usize) -> Result<i16>;
    /// Read an unsigned 32-bit value from `bytes` at `offset`.
    fn read_u32(&self, bytes: &[u8], offset: usize) -> Result<u32>;
    /// Read a signed 32-bit value from `bytes` at `offset`.
    fn read_i32(&self, bytes: &[u8], offset: usize) -> Result<i32>;
}

fn take2(bytes: &[u8], offset: usize) -> Result<[u8; 2]> {
    bytes
        .get(offset..offset + 2)
        .map(|s| [s[0], s[1]])
        .ok_or_else(|| PcmiError::protocol(format!("read past end at offset {offset}")))
}

fn take4(bytes: &[u8], offset: usize) -> Result<[u8; 4]> {
    bytes
        .get(offset..offset + 4)
        .map(|s| [s[0], s[1], s[2], s[3]])
        .ok_or_else(|| PcmiError::protocol(format!("read past end at offset {offset}")))
}

/// Big-endian strategy, nicknamed "Swap", selected when `record_format < 20`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Swap;

impl EndianStrategy for Swap {
    fn read_u16(&self, bytes: &[u8], offset: usize) -> Result<u16> {
        Ok(u16::from_be_bytes(take2(bytes, offset)?))
    }
    fn read_i16(&self, bytes: &[u8], offset: usize) -> Result<i16> {
        Ok(i16::from_be_bytes(take2(bytes, offset)?))
    }
    fn read_u32(&self, bytes: &[u8], offset: usize) -> Result<u32> {
        Ok(u32::from_be_bytes(take4(bytes, offset)?))
    }
    fn read_i32(&self, bytes: &[u8], offset: usize) -> Result<i32> {
        Ok(i32::from_be_bytes(take4(bytes, offset)?))
    }
}

/// Little-endian strategy, nicknamed "NonSwap", selected when
/// `record_format >= 20`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonSwap;

impl EndianStrategy for NonSwap {
    fn read_u16(&self, bytes: &[u8], offset: usize) -> Result<u16> {
        Ok(u16::from_le_bytes(take2(bytes, offset)?))
    }
    fn read_i16(&self, bytes: &[u8], offset: usize) -> Result<i16> {
        Ok(i16::from_le_bytes(take2(bytes, offset)?))
    }
    fn read_u32(&self, bytes: &[u8], offset: usize) -> Result<u32> {
        Ok(u32::from_le_bytes(take4(bytes, offset)?))
    }
    fn read_i32(&self, bytes: &[u8], offset: usize) -> Result<i32> {
        Ok(i32::from_le_bytes(take4(bytes, offset)?))
    }
}

/// Resolve the endian strategy for a record from its `record_format` byte:
/// `< 20` selects [`Swap`] (big-endian), `>= 20` selects [`NonSwap`]
/// (little-endian).
pub fn strategy_for_format(record_format: u8) -> &'static dyn EndianStrategy {
    const SWAP: Swap = Swap;
    const NON_SWAP: NonSwap = NonSwap;
    if record_format < 20 {
        &SWAP
    } else {
        &NON_SWAP
    }
}
