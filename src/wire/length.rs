//! Length indicators: RLI (Record Length Indicator, outer frames, counted in
//! 16-bit words) and VLI (Variable Length Indicator, inner sub-records).

use crate::tools::error::{PcmiError, Result};

/// Decode a 1-byte RLI (two hex chars, word count 0-255). Returns the
/// payload byte count (`words * 2`).
pub fn decode_1byte_rli(hex: &str) -> Result<usize> {
    if hex.len() != 2 {
        return Err(PcmiError::protocol(format!(
            "1-byte RLI must be 2 hex chars, got {}",
            hex.len()
        )));
    }
    let words = crate::wire::hexcodec::decode_byte(hex.as_bytes()[0], hex.as_bytes()[1])?;
    Ok(words as usize * 2)
}

/// Encode a byte count as a 1-byte RLI. Requires an even byte count.
pub fn encode_1byte_rli(byte_count: usize) -> Result<String> {
    if byte_count % 2 != 0 {
        return Err(PcmiError::protocol(format!(
            "1-byte RLI requires an even byte count, got {byte_count}"
        )));
    }
    let words = byte_count / 2;
    if words > 0xFF {
        return Err(PcmiError::protocol(format!(
            "1-byte RLI cannot address {words} words"
        )));
    }
    Ok(crate::wire::hexcodec::encode(&[words as u8]))
}

/// Decode a 2-byte RLI (four hex chars, low byte transmitted first,
/// independent of the payload's own endianness). Returns the payload byte
/// count (`words * 2`).
pub fn decode_2byte_rli(hex: &str) -> Result<usize> {
    if hex.len() != 4 {
        return Err(PcmiError::protocol(format!(
            "2-byte RLI must be 4 hex chars, got {}",
            hex.len()
        )));
    }
    let bytes = hex.as_bytes();
    let low = crate::wire::hexcodec::decode_byte(bytes[0], bytes[1])?;
    let high = crate::wire::hexcodec::decode_byte(bytes[2], bytes[3])?;
    let words = (low as u16) | ((high as u16) << 8);
    Ok(words as usize * 2)
}

/// Encode a byte count as a 2-byte RLI, low byte first. Requires an even
/// byte count.
pub fn encode_2byte_rli(byte_count: usize) -> Result<String> {
    if byte_count % 2 != 0 {
        return Err(PcmiError::protocol(format!(
            "2-byte RLI requires an even byte count, got {byte_count}"
        )));
    }
    let words = byte_count / 2;
    if words > 0xFFFF {
        return Err(PcmiError::protocol(format!(
            "2-byte RLI cannot address {words} words"
        )));
    }
    let words = words as u16;
    let low = (words & 0xFF) as u8;
    let high = (words >> 8) as u8;
    Ok(crate::wire::hexcodec::encode(&[low, high]))
}

/// Width, in hex characters, of the VLI carried inside the payload of a
/// frame whose command byte is `command`: 2 chars when `command < 0xB0`,
/// 4 chars otherwise.
pub fn vli_width(command: u8) -> usize {
    if command < 0xB0 {
        2
    } else {
        4
    }
}

/// Decode a VLI whose width is selected by the enclosing command byte.
pub fn decode_vli(hex: &str, command: u8) -> Result<usize> {
    match vli_width(command) {
        2 => decode_1byte_rli(hex),
        _ => decode_2byte_rli(hex),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_2byte_rli_little_endian() {
        // "B800" -> low 0xB8, high 0x00 -> 184 words -> 368 bytes
        assert_eq!(decode_2byte_rli("B800").unwrap(), 368);
    }

    #[test]
    fn round_trips_2byte_rli_for_all_even_counts() {
        for words in [0u16, 1, 128, 255, 256, 65535] {
            let byte_count = words as usize * 2;
            let hex = encode_2byte_rli(byte_count).unwrap();
            assert_eq!(decode_2byte_rli(&hex).unwrap(), byte_count);
        }
    }

    #[test]
    fn rejects_odd_byte_count() {
        assert!(encode_1byte_rli(3).is_err());
        assert!(encode_2byte_rli(3).is_err());
    }

    #[test]
    fn one_byte_rli_caps_at_255_words() {
        assert!(encode_1byte_rli(256 * 2).is_err());
        assert_eq!(encode_1byte_rli(255 * 2).unwrap(), "FF");
    }

    #[test]
    fn vli_width_depends_on_command() {
        assert_eq!(vli_width(0x93), 2);
        assert_eq!(vli_width(0xB0), 4);
        assert_eq!(vli_width(0xA4), 2);
    }
}
