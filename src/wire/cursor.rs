//! A stateful, endian-aware reader over an ASCII-hex payload string. This is
//! the sole way record decoders touch payload bytes, so every endian-
//! sensitive read is forced through the cursor's bound [`EndianStrategy`].

use crate::tools::error::{PcmiError, Result};
use crate::wire::endian::EndianStrategy;
use crate::wire::hexcodec;

/// Position-tracked reader over a hex-ASCII payload. Position is counted in
/// characters (two characters per logical byte).
#[derive(Debug)]
pub struct HexCursor<'a> {
    text: &'a [u8],
    pos: usize,
    endian: &'static dyn EndianStrategy,
}

impl<'a> HexCursor<'a> {
    /// Create a cursor over `text` bound to `endian` for all multi-byte
    /// reads.
    pub fn new(text: &'a str, endian: &'static dyn EndianStrategy) -> Self {
        HexCursor {
            text: text.as_bytes(),
            pos: 0,
            endian,
        }
    }

    /// Current position, in hex characters.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Remaining hex characters.
    pub fn remaining(&self) -> usize {
        self.text.len().saturating_sub(self.pos)
    }

    /// Remaining payload bytes (remaining characters / 2, rounded down).
    pub fn remaining_bytes(&self) -> usize {
        self.remaining() / 2
    }

    fn ensure(&self, chars: usize) -> Result<()> {
        if self.pos + chars > self.text.len() {
            return Err(PcmiError::protocol(format!(
                "cursor read past end: need {} chars at {}, have {}",
                chars,
                self.pos,
                self.text.len()
            )));
        }
        Ok(())
    }

    /// Advance the cursor by `chars` hex characters without reading them.
    pub fn skip(&mut self, chars: usize) -> Result<()> {
        self.ensure(chars)?;
        self.pos += chars;
        Ok(())
    }

    /// Move the cursor to an absolute character position.
    pub fn seek(&mut self, chars: usize) -> Result<()> {
        if chars > self.text.len() {
            return Err(PcmiError::protocol(format!(
                "cursor seek past end: {} > {}",
                chars,
                self.text.len()
            )));
        }
        self.pos = chars;
        Ok(())
    }

    fn slice(&self, chars: usize) -> Result<&'a [u8]> {
        self.ensure(chars)?;
        Ok(&self.text[self.pos..self.pos + chars])
    }

    /// Read one byte (2 hex chars) and advance.
    pub fn read_u8(&mut self) -> Result<u8> {
        let s = self.slice(2)?;
        let value = hexcodec::decode_byte(s[0], s[1])?;
        self.pos += 2;
        Ok(value)
    }

    /// Read one signed byte (2 hex chars) and advance.
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Read an unsigned 16-bit value (4 hex chars = 2 bytes), honoring the
    /// bound endian strategy, and advance.
    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = hexcodec::decode(std::str::from_utf8(self.slice(4)?).unwrap())?;
        let value = self.endian.read_u16(&bytes, 0)?;
        self.pos += 4;
        Ok(value)
    }

    /// Read a signed 16-bit value and advance.
    pub fn read_i16(&mut self) -> Result<i16> {
        let bytes = hexcodec::decode(std::str::from_utf8(self.slice(4)?).unwrap())?;
        let value = self.endian.read_i16(&bytes, 0)?;
        self.pos += 4;
        Ok(value)
    }

    /// Read an unsigned 32-bit value (8 hex chars = 4 bytes) and advance.
    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = hexcodec::decode(std::str::from_utf8(self.slice(8)?).unwrap())?;
        let value = self.endian.read_u32(&bytes, 0)?;
        self.pos += 8;
        Ok(value)
    }

    /// Read a signed 32-bit value and advance.
    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = hexcodec::decode(std::str::from_utf8(self.slice(8)?).unwrap())?;
        let value = self.endian.read_i32(&bytes, 0)?;
        self.pos += 8;
        Ok(value)
    }

    /// Read `byte_count` raw bytes without endian interpretation and
    /// advance.
    pub fn read_bytes(&mut self, byte_count: usize) -> Result<Vec<u8>> {
        let chars = byte_count * 2;
        let s = self.slice(chars)?;
        let bytes = hexcodec::decode(std::str::from_utf8(s).unwrap())?;
        self.pos += chars;
        Ok(bytes)
    }

    /// Read `chars` raw hex characters without decoding them, and advance.
    /// Used for length indicators whose width varies by command rather
    /// than by the cursor's own endian strategy.
    pub fn read_raw_hex(&mut self, chars: usize) -> Result<&'a str> {
        let s = self.slice(chars)?;
        self.pos += chars;
        Ok(std::str::from_utf8(s).unwrap())
    }

    /// Peek at an absolute character offset without advancing the cursor.
    pub fn peek_u8(&self, at: usize) -> Result<u8> {
        if at + 2 > self.text.len() {
            return Err(PcmiError::protocol(format!(
                "cursor peek past end at {at}"
            )));
        }
        hexcodec::decode_byte(self.text[at], self.text[at + 1])
    }
}
