//! Firmware version record: a CR-delimited, header-prefixed record (command
//! `0xA0`) identifying the controller model and firmware build.

use crate::record::header::RecordHeader;
use crate::tools::error::Result;
use crate::wire::endian;
use crate::wire::cursor::HexCursor;

/// Decoded firmware/model identification.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct VersionInfo {
    /// Common record header.
    pub header: RecordHeader,
    /// Controller model code.
    pub model_code: u8,
    /// Firmware major version.
    pub major: u8,
    /// Firmware minor version.
    pub minor: u8,
    /// Firmware build number.
    pub build: u16,
}

/// Decode a version record from `payload_hex`.
pub fn decode(payload_hex: &str) -> Result<VersionInfo> {
    let format = RecordHeader::peek_format(payload_hex)?;
    let strategy = endian::strategy_for_format(format);
    let mut cursor = HexCursor::new(payload_hex, strategy);
    let header = RecordHeader::parse(&mut cursor)?;
    header.validate_size(payload_hex)?;

    let model_code = cursor.read_u8()?;
    let major = cursor.read_u8()?;
    let minor = cursor.read_u8()?;
    let build = cursor.read_u16()?;

    Ok(VersionInfo {
        header,
        model_code,
        major,
        minor,
        build,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_header(size_words: u16, id: u8, record_type: u8, format: u8) -> String {
        format!("{size_words:04X}{id:02X}{record_type:02X}{format:02X}")
    }

    #[test]
    fn decodes_model_and_firmware() {
        // header(5) + model(1) + major(1) + minor(1) + build(2) = 10 bytes = 5 words
        let mut body = hex_header(5, 0, 7, 2);
        body.push_str("03"); // model code 3 = VPII
        body.push_str("02"); // major 2
        body.push_str("0A"); // minor 10
        body.push_str("0190"); // build 400

        let info = decode(&body).unwrap();
        assert_eq!(info.model_code, 3);
        assert_eq!(info.major, 2);
        assert_eq!(info.minor, 10);
        assert_eq!(info.build, 400);
    }
}
