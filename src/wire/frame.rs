//! Frame classification. Given the raw bytes read from the transport for
//! one frame (a single byte for a bare ack, or everything up to and
//! including the terminating CR otherwise), classify the frame and extract
//! its hex-ASCII payload. The frame reader never retries: it reports one of
//! [`FrameOutcome`]'s variants and lets the session machine decide.

use crate::tools::error::{PcmiError, Result};
use crate::wire::checksum;
use crate::wire::command;
use crate::wire::length;

const CR: u8 = 0x0D;

/// A classified, checksum-verified frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A single command byte, no payload, no checksum, no terminator.
    BareAck {
        /// The command byte.
        command: u8,
    },
    /// A command carrying a hex-ASCII payload, already checksum-verified.
    Record {
        /// The command byte.
        command: u8,
        /// The payload, still as hex-ASCII text; record decoders own
        /// turning this into typed fields.
        payload_hex: String,
    },
}

impl Frame {
    /// The frame's command byte, regardless of shape.
    pub fn command(&self) -> u8 {
        match self {
            Frame::BareAck { command } => *command,
            Frame::Record { command, .. } => *command,
        }
    }
}

/// The outcome of attempting to classify a buffer as one frame. The frame
/// reader never retries; it only reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A complete, verified frame.
    Frame(Frame),
    /// The buffer is a partial frame; more bytes are needed before it can
    /// be classified.
    NeedMoreBytes,
    /// The buffer was a complete frame shape but its checksum didn't match.
    BadChecksum {
        /// Checksum computed locally from the frame bytes.
        expected: u8,
        /// Checksum carried by the frame.
        actual: u8,
    },
    /// The buffer could not be interpreted as any known frame shape.
    Malformed(String),
}

/// Classify `buffer`, the exact bytes read from the transport for one
/// frame.
pub fn read_frame(buffer: &[u8]) -> FrameOutcome {
    if buffer.is_empty() {
        return FrameOutcome::NeedMoreBytes;
    }
    let cmd = buffer[0];

    if command::is_bare_ack(cmd) {
        return read_bare_ack(buffer);
    }

    if command::uses_1byte_rli(cmd) || command::uses_2byte_rli(cmd) {
        return read_rli_record(buffer, cmd);
    }

    read_cr_delimited(buffer, cmd)
}

fn read_bare_ack(buffer: &[u8]) -> FrameOutcome {
    match buffer.len().cmp(&1) {
        std::cmp::Ordering::Equal => FrameOutcome::Frame(Frame::BareAck { command: buffer[0] }),
        std::cmp::Ordering::Less => FrameOutcome::NeedMoreBytes,
        std::cmp::Ordering::Greater => FrameOutcome::Malformed(format!(
            "bare ack {:02X} carried {} unexpected trailing bytes",
            buffer[0],
            buffer.len() - 1
        )),
    }
}

fn read_rli_record(buffer: &[u8], cmd: u8) -> FrameOutcome {
    let rli_width = if command::uses_1byte_rli(cmd) { 2 } else { 4 };
    if buffer.len() < 1 + rli_width {
        return FrameOutcome::NeedMoreBytes;
    }

    let rli_text = match std::str::from_utf8(&buffer[1..1 + rli_width]) {
        Ok(s) => s,
        Err(_) => return FrameOutcome::Malformed("RLI is not valid ASCII".into()),
    };
    let payload_byte_count = match if rli_width == 2 {
        length::decode_1byte_rli(rli_text)
    } else {
        length::decode_2byte_rli(rli_text)
    } {
        Ok(n) => n,
        Err(e) => return FrameOutcome::Malformed(e.to_string()),
    };
    let payload_chars = payload_byte_count * 2;

    let header_len = 1 + rli_width;
    let needed = header_len + payload_chars + 2 + 1; // + checksum + CR
    if buffer.len() < needed {
        return FrameOutcome::NeedMoreBytes;
    }
    if buffer[needed - 1] != CR {
        return FrameOutcome::Malformed(format!(
            "expected CR terminator at byte {}, found {:#04X}",
            needed - 1,
            buffer[needed - 1]
        ));
    }

    let payload_range = header_len..header_len + payload_chars;
    let payload_hex = match std::str::from_utf8(&buffer[payload_range.clone()]) {
        Ok(s) => s.to_string(),
        Err(_) => return FrameOutcome::Malformed("payload is not valid ASCII".into()),
    };

    let checksum_text = match std::str::from_utf8(&buffer[payload_range.end..payload_range.end + 2])
    {
        Ok(s) => s,
        Err(_) => return FrameOutcome::Malformed("checksum is not valid ASCII".into()),
    };
    let actual_checksum = match crate::wire::hexcodec::decode_byte(
        checksum_text.as_bytes()[0],
        checksum_text.as_bytes()[1],
    ) {
        Ok(v) => v,
        Err(_) => return FrameOutcome::Malformed("checksum is not valid hex".into()),
    };

    let region = &buffer[0..payload_range.end];
    let expected_checksum = checksum::compute(region);
    if !checksum::verify(region, actual_checksum) {
        return FrameOutcome::BadChecksum {
            expected: expected_checksum,
            actual: actual_checksum,
        };
    }

    FrameOutcome::Frame(Frame::Record {
        command: cmd,
        payload_hex,
    })
}

fn read_cr_delimited(buffer: &[u8], cmd: u8) -> FrameOutcome {
    let cr_pos = match buffer.iter().position(|b| *b == CR) {
        Some(p) => p,
        None => return FrameOutcome::NeedMoreBytes,
    };
    if cr_pos < 1 + 2 {
        return FrameOutcome::Malformed(format!(
            "CR-delimited frame too short: {cr_pos} bytes before CR"
        ));
    }

    let payload_end = cr_pos - 2;
    let payload_hex = match std::str::from_utf8(&buffer[1..payload_end]) {
        Ok(s) => s.to_string(),
        Err(_) => return FrameOutcome::Malformed("payload is not valid ASCII".into()),
    };
    let checksum_text = match std::str::from_utf8(&buffer[payload_end..cr_pos]) {
        Ok(s) => s,
        Err(_) => return FrameOutcome::Malformed("checksum is not valid ASCII".into()),
    };
    let actual_checksum = match crate::wire::hexcodec::decode_byte(
        checksum_text.as_bytes()[0],
        checksum_text.as_bytes()[1],
    ) {
        Ok(v) => v,
        Err(_) => return FrameOutcome::Malformed("checksum is not valid hex".into()),
    };

    let region = &buffer[0..payload_end];
    let expected_checksum = checksum::compute(region);
    if !checksum::verify(region, actual_checksum) {
        return FrameOutcome::BadChecksum {
            expected: expected_checksum,
            actual: actual_checksum,
        };
    }

    FrameOutcome::Frame(Frame::Record {
        command: cmd,
        payload_hex,
    })
}

/// Build the checksum + CR suffix for an outgoing frame whose checksummed
/// region (command + length indicator + payload, all as they'll appear on
/// the wire) is `region`.
pub fn finish_outgoing_frame(region: &[u8]) -> Vec<u8> {
    let mut out = region.to_vec();
    let csum = checksum::compute(region);
    out.extend_from_slice(&crate::wire::hexcodec::encode_byte(csum));
    out.push(CR);
    out
}

/// Build a bare outgoing frame: just the command byte.
pub fn build_bare_frame(command: u8) -> Vec<u8> {
    vec![command]
}

/// Assemble the raw bytes this crate sends to identify itself during
/// [`connect`](crate::session::Client::connect): command byte, a literal
/// 2-character decimal length, the ASCII serial number, checksum, CR. This
/// framing is special-cased rather than routed through the general RLI
/// machinery: the length here counts ASCII characters directly rather than
/// 16-bit words, which the general RLI decoder would misinterpret. See
/// DESIGN.md.
pub fn build_connect_frame(serial_number: &str) -> Result<Vec<u8>> {
    if serial_number.len() != 8 || !serial_number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PcmiError::protocol(format!(
            "serial number must be exactly 8 decimal digits, got {serial_number:?}"
        )));
    }
    let mut region = vec![command::SERIAL_NUMBER];
    region.extend_from_slice(format!("{:02}", serial_number.len()).as_bytes());
    region.extend_from_slice(serial_number.as_bytes());
    Ok(finish_outgoing_frame(&region))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_bare_ack() {
        let outcome = read_frame(&[command::SN_ACK]);
        assert_eq!(
            outcome,
            FrameOutcome::Frame(Frame::BareAck {
                command: command::SN_ACK
            })
        );
    }

    #[test]
    fn classifies_error_code_as_bare_ack() {
        let outcome = read_frame(&[command::ER_TRY_AGAIN]);
        assert_eq!(
            outcome,
            FrameOutcome::Frame(Frame::BareAck {
                command: command::ER_TRY_AGAIN
            })
        );
    }

    #[test]
    fn partial_rli_record_needs_more_bytes() {
        let outcome = read_frame(&[command::ZONE_PARM_DATA, b'0']);
        assert_eq!(outcome, FrameOutcome::NeedMoreBytes);
    }

    #[test]
    fn round_trips_an_rli_record_frame() {
        // 1 byte of payload -> RLI must be in words; use 1 payload byte
        // "AB" with odd byte count padded isn't valid for a real record,
        // but the frame reader only cares about length bookkeeping, so use
        // a 2-byte (1 word) payload "ABCD".
        let cmd = command::ZONE_PARM_DATA;
        let payload = "ABCD";
        let mut region = vec![cmd];
        region.extend_from_slice(b"01"); // 1 word = 2 bytes
        region.extend_from_slice(payload.as_bytes());
        let frame_bytes = finish_outgoing_frame(&region);

        match read_frame(&frame_bytes) {
            FrameOutcome::Frame(Frame::Record {
                command,
                payload_hex,
            }) => {
                assert_eq!(command, cmd);
                assert_eq!(payload_hex, payload);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn detects_bad_checksum_on_rli_record() {
        let cmd = command::ZONE_PARM_DATA;
        let mut region = vec![cmd];
        region.extend_from_slice(b"01");
        region.extend_from_slice(b"ABCD");
        let mut frame_bytes = finish_outgoing_frame(&region);
        let csum_pos = frame_bytes.len() - 3;
        frame_bytes[csum_pos] = b'0';
        frame_bytes[csum_pos + 1] = b'0';

        assert!(matches!(
            read_frame(&frame_bytes),
            FrameOutcome::BadChecksum { .. }
        ));
    }

    #[test]
    fn round_trips_a_cr_delimited_frame() {
        let cmd = command::VERSION_DATA;
        let mut region = vec![cmd];
        region.extend_from_slice(b"0102");
        let frame_bytes = finish_outgoing_frame(&region);

        match read_frame(&frame_bytes) {
            FrameOutcome::Frame(Frame::Record {
                command,
                payload_hex,
            }) => {
                assert_eq!(command, cmd);
                assert_eq!(payload_hex, "0102");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn cr_delimited_without_cr_needs_more_bytes() {
        let outcome = read_frame(&[command::VERSION_DATA, b'0', b'1']);
        assert_eq!(outcome, FrameOutcome::NeedMoreBytes);
    }

    #[test]
    fn connect_frame_matches_checksum_scenario() {
        let frame = build_connect_frame("99999999").unwrap();
        let mut expected = vec![0x85, 0x30, 0x38, 0x39, 0x39, 0x39, 0x39, 0x39, 0x39, 0x39, 0x39];
        assert_eq!(checksum::compute(&expected), 0xB5);
        expected.extend_from_slice(b"B5"); // checksum 0xB5 as hex ASCII
        expected.push(0x0D);
        assert_eq!(frame, expected);
    }

    #[test]
    fn connect_frame_rejects_bad_serial_number() {
        assert!(build_connect_frame("1234").is_err());
        assert!(build_connect_frame("1234567A").is_err());
    }
}
