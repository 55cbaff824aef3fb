//! The common record header every PCMI record begins with:
//! `record_size_words`, an ID (zone or device number), `record_type`, and
//! `record_format` — the last of which selects the endian strategy used to
//! read this field and every field after it.

use crate::tools::error::{PcmiError, Result};
use crate::wire::cursor::HexCursor;
use crate::wire::endian;
use crate::wire::hexcodec;

/// Width, in hex characters, of the fixed header: `record_size_words` (4),
/// `id` (2), `record_type` (2), `record_format` (2).
pub const HEADER_CHAR_LEN: usize = 10;

const RECORD_FORMAT_OFFSET: usize = 8;

/// The fixed fields every record begins with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct RecordHeader {
    /// Declared payload size, in 16-bit words.
    pub record_size_words: u16,
    /// Zone number or device index, depending on the record kind.
    pub id: u8,
    /// Record-kind discriminator.
    pub record_type: u8,
    /// Version/schema discriminator: `< 20` big-endian ("Swap"), `>= 20`
    /// little-endian ("NonSwap").
    pub record_format: u8,
}

impl RecordHeader {
    /// Peek the `record_format` byte directly out of the hex text, without
    /// needing an endian strategy — it's a single byte, so byte order
    /// doesn't apply. This lets the strategy be resolved before the header
    /// itself is read sequentially.
    pub fn peek_format(payload_hex: &str) -> Result<u8> {
        let bytes = payload_hex.as_bytes();
        if bytes.len() < RECORD_FORMAT_OFFSET + 2 {
            return Err(PcmiError::protocol(format!(
                "payload too short to carry a record header: {} chars",
                bytes.len()
            )));
        }
        hexcodec::decode_byte(bytes[RECORD_FORMAT_OFFSET], bytes[RECORD_FORMAT_OFFSET + 1])
    }

    /// Read the header fields in order from `cursor`, which must already be
    /// positioned at the start of the payload.
    pub fn parse(cursor: &mut HexCursor) -> Result<Self> {
        let record_size_words = cursor.read_u16()?;
        let id = cursor.read_u8()?;
        let record_type = cursor.read_u8()?;
        let record_format = cursor.read_u8()?;
        Ok(RecordHeader {
            record_size_words,
            id,
            record_type,
            record_format,
        })
    }

    /// Validate the header's declared size against the payload's actual
    /// byte length: `record_size_words * 2` must equal the payload's byte
    /// length as conveyed by the frame's RLI.
    pub fn validate_size(&self, payload_hex: &str) -> Result<()> {
        let declared = self.record_size_words as usize * 2;
        let actual = payload_hex.len() / 2;
        if declared != actual {
            return Err(PcmiError::parse(format!(
                "record header declares {declared} bytes but payload carries {actual}"
            )));
        }
        Ok(())
    }
}

/// Build a [`HexCursor`] over `payload_hex`, resolving the endian strategy
/// from the `record_format` byte before any field is read — this is the
/// only way decoders ever touch payload bytes, so endianness resolution
/// always happens before any multi-byte read.
pub fn cursor_for_payload(payload_hex: &str) -> Result<HexCursor<'_>> {
    let format = RecordHeader::peek_format(payload_hex)?;
    let strategy = endian::strategy_for_format(format);
    Ok(HexCursor::new(payload_hex, strategy))
}
