//! Alarm records: a common header followed by a run of VLI-delimited
//! entries, each naming the zone, the alarm code raised, and when it was
//! raised.

use crate::record::header::RecordHeader;
use crate::tools::error::{PcmiError, Result};
use crate::wire::cursor::HexCursor;
use crate::wire::endian;
use crate::wire::length;

/// One alarm condition.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AlarmEntry {
    /// Zone number the alarm belongs to.
    pub zone_number: u8,
    /// Controller-defined alarm code.
    pub alarm_code: u8,
    /// Seconds since the controller's epoch.
    pub timestamp: u32,
}

/// A decoded alarm record: header plus its run of entries.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AlarmLog {
    /// Common record header.
    pub header: RecordHeader,
    /// Active or logged alarms, in the order the controller sent them.
    pub entries: Vec<AlarmEntry>,
}

/// Decode an alarm record from `payload_hex`, the hex-ASCII payload of a
/// frame whose command is one of `wire::command::ALARM_DATA` or
/// `ALARM_DATA_EXT`.
pub fn decode(payload_hex: &str, command: u8) -> Result<AlarmLog> {
    let format = RecordHeader::peek_format(payload_hex)?;
    let strategy = endian::strategy_for_format(format);
    let mut cursor = HexCursor::new(payload_hex, strategy);
    let header = RecordHeader::parse(&mut cursor)?;

    let vli_width = length::vli_width(command);
    let mut entries = Vec::new();

    while cursor.remaining() > 0 {
        let vli_start = cursor.position();
        if cursor.remaining() < vli_width {
            return Err(PcmiError::parse(
                "alarm record truncated mid-VLI".to_string(),
            ));
        }
        let vli_hex = &payload_hex[vli_start..vli_start + vli_width];
        let entry_byte_len = length::decode_vli(vli_hex, command)?;
        cursor.skip(vli_width)?;

        let entry_start = cursor.position();
        let entry_end = entry_start + entry_byte_len * 2;
        if entry_end > payload_hex.len() {
            return Err(PcmiError::parse(
                "alarm entry length indicator overruns payload".to_string(),
            ));
        }
        let entry_hex = &payload_hex[entry_start..entry_end];
        let mut entry_cursor = HexCursor::new(entry_hex, strategy);
        let zone_number = entry_cursor.read_u8()?;
        let alarm_code = entry_cursor.read_u8()?;
        let timestamp = entry_cursor.read_u32()?;
        entries.push(AlarmEntry {
            zone_number,
            alarm_code,
            timestamp,
        });
        cursor.skip(entry_byte_len * 2)?;
    }

    Ok(AlarmLog { header, entries })
}
