//! History records: a common header followed by a run of VLI-delimited
//! entries, each naming a zone or device, an event code, and the time it
//! was logged.

use crate::record::header::RecordHeader;
use crate::tools::error::{PcmiError, Result};
use crate::wire::cursor::HexCursor;
use crate::wire::endian;
use crate::wire::length;

/// One logged event.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct HistoryEntry {
    /// Seconds since the controller's epoch.
    pub timestamp: u32,
    /// Zone number or device index the event pertains to.
    pub zone_or_device: u8,
    /// Controller-defined event code.
    pub event_code: u8,
}

/// A decoded history record: header plus its run of entries.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HistoryLog {
    /// Common record header.
    pub header: RecordHeader,
    /// Logged events, in the order the controller sent them.
    pub entries: Vec<HistoryEntry>,
}

/// Decode a history record from `payload_hex`, the hex-ASCII payload of a
/// frame whose command is one of `wire::command::HISTORY_DATA` or
/// `HISTORY_DATA_EXT` (`command` selects the VLI width used between
/// entries).
pub fn decode(payload_hex: &str, command: u8) -> Result<HistoryLog> {
    let format = RecordHeader::peek_format(payload_hex)?;
    let strategy = endian::strategy_for_format(format);
    let mut cursor = HexCursor::new(payload_hex, strategy);
    let header = RecordHeader::parse(&mut cursor)?;
    // Unlike the fixed-layout zone/device records, a history record's
    // total length is the sum of a variable number of VLI-delimited
    // entries, so `record_size_words` is carried as metadata here rather
    // than checked against the payload length.

    let vli_width = length::vli_width(command);
    let mut entries = Vec::new();

    while cursor.remaining() > 0 {
        let vli_start = cursor.position();
        if cursor.remaining() < vli_width {
            return Err(PcmiError::parse(
                "history record truncated mid-VLI".to_string(),
            ));
        }
        let vli_hex = &payload_hex[vli_start..vli_start + vli_width];
        let entry_byte_len = length::decode_vli(vli_hex, command)?;
        cursor.skip(vli_width)?;

        let entry_start = cursor.position();
        let entry_end = entry_start + entry_byte_len * 2;
        if entry_end > payload_hex.len() {
            return Err(PcmiError::parse(
                "history entry length indicator overruns payload".to_string(),
            ));
        }
        let entry_hex = &payload_hex[entry_start..entry_end];
        let mut entry_cursor = HexCursor::new(entry_hex, strategy);
        let timestamp = entry_cursor.read_u32()?;
        let zone_or_device = entry_cursor.read_u8()?;
        let event_code = entry_cursor.read_u8()?;
        entries.push(HistoryEntry {
            timestamp,
            zone_or_device,
            event_code,
        });
        cursor.skip(entry_byte_len * 2)?;
    }

    Ok(HistoryLog { header, entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::command::HISTORY_DATA;

    fn hex_header(size_words: u16, id: u8, record_type: u8, format: u8) -> String {
        format!("{size_words:04X}{id:02X}{record_type:02X}{format:02X}")
    }

    #[test]
    fn decodes_a_run_of_entries() {
        // Each entry: 1-byte VLI encoding a 3-word (6-byte) body (u32
        // timestamp + zone byte + event byte). 3 entries keeps the total
        // payload length, odd (header) + odd*3 (VLI+body per entry), even.
        let mut body = hex_header(13, 0, 5, 2);
        body.push_str("03"); // VLI = 3 words = 6 bytes
        body.push_str("0001E240"); // timestamp = 123456
        body.push_str("0305"); // zone 3, event 5
        body.push_str("03");
        body.push_str("0001E241");
        body.push_str("0406"); // zone 4, event 6
        body.push_str("03");
        body.push_str("0001E242");
        body.push_str("0507"); // zone 5, event 7

        let log = decode(&body, HISTORY_DATA).unwrap();
        assert_eq!(log.entries.len(), 3);
        assert_eq!(log.entries[0].timestamp, 123456);
        assert_eq!(log.entries[0].zone_or_device, 3);
        assert_eq!(log.entries[0].event_code, 5);
        assert_eq!(log.entries[1].timestamp, 123457);
        assert_eq!(log.entries[1].event_code, 6);
        assert_eq!(log.entries[2].event_code, 7);
    }

    #[test]
    fn empty_history_record_has_no_entries() {
        let body = hex_header(5, 0, 5, 2);
        let log = decode(&body, HISTORY_DATA).unwrap();
        assert!(log.entries.is_empty());
    }
}
