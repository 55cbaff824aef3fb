//! Record decoders: each accepts a frame's hex-ASCII payload (plus the
//! frame's command byte, where the decoder needs it to resolve a length
//! encoding) and returns an immutable, validated record value.

pub mod alarm;
pub mod device;
pub mod header;
pub mod history;
pub mod temperature;
pub mod version;
pub mod zone;

use crate::record::device::DeviceRegistry;
use crate::tools::error::{PcmiError, Result};
use crate::wire::command;

/// Any record this crate knows how to decode, tagged by the frame command
/// that produced it.
#[derive(Debug, Clone, serde::Serialize)]
pub enum Record {
    /// See [`zone::ZoneParameters`].
    ZoneParameters(zone::ZoneParameters),
    /// See [`zone::ZoneVariables`].
    ZoneVariables(zone::ZoneVariables),
    /// See [`device::DeviceGroup`].
    Device(device::DeviceGroup),
    /// See [`history::HistoryLog`].
    History(history::HistoryLog),
    /// See [`alarm::AlarmLog`].
    Alarm(alarm::AlarmLog),
    /// See [`version::VersionInfo`].
    Version(version::VersionInfo),
}

/// Decode `payload_hex` into a [`Record`], dispatching on `command` the way
/// the frame it came from was classified. Device records consult
/// `registry` to resolve their type-specific tail.
pub fn decode(command: u8, payload_hex: &str, registry: &DeviceRegistry) -> Result<Record> {
    if command::is_zone_parm_data(command) {
        return Ok(Record::ZoneParameters(zone::decode_parameters(
            payload_hex,
        )?));
    }
    if command::is_zone_var_data(command) {
        return Ok(Record::ZoneVariables(zone::decode_variables(payload_hex)?));
    }
    if command::is_device_parm_data(command) {
        return Ok(Record::Device(decode_device_record(
            payload_hex,
            registry,
            DeviceKind::Parameters,
            command,
        )?));
    }
    if command::is_device_var_data(command) {
        return Ok(Record::Device(decode_device_record(
            payload_hex,
            registry,
            DeviceKind::Variables,
            command,
        )?));
    }
    if command::is_history_data(command) {
        return Ok(Record::History(history::decode(payload_hex, command)?));
    }
    if command::is_alarm_data(command) {
        return Ok(Record::Alarm(alarm::decode(payload_hex, command)?));
    }
    if command::is_version_data(command) {
        return Ok(Record::Version(version::decode(payload_hex)?));
    }
    Err(PcmiError::protocol(format!(
        "command {command:#04X} does not carry a decodable record"
    )))
}

enum DeviceKind {
    Parameters,
    Variables,
}

/// Decode a device-data record: the common header followed by a run of
/// VLI-delimited device blocks, one per device the controller is
/// reporting on in this frame. Every device block is decoded and
/// returned, not just the first.
fn decode_device_record(
    payload_hex: &str,
    registry: &DeviceRegistry,
    kind: DeviceKind,
    command: u8,
) -> Result<device::DeviceGroup> {
    let mut cursor = header::cursor_for_payload(payload_hex)?;
    let header = header::RecordHeader::parse(&mut cursor)?;
    header.validate_size(payload_hex)?;

    let mut devices = Vec::new();
    while cursor.remaining() > 0 {
        let (device_type, device_index, sub_len_bytes) =
            device::decode_device_header(&mut cursor, command)?;
        let body = match kind {
            DeviceKind::Parameters => device::decode_device_parameters(
                &mut cursor,
                registry,
                device_type,
                sub_len_bytes,
            )?,
            DeviceKind::Variables => device::decode_device_variables(
                &mut cursor,
                registry,
                device_type,
                sub_len_bytes,
            )?,
        };
        devices.push(device::DeviceRecord {
            device_type,
            device_index,
            body,
        });
    }

    Ok(device::DeviceGroup { header, devices })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_zone_parameters_by_command() {
        let mut body = format!("{:04X}{:02X}{:02X}{:02X}", 10u16, 3u8, 1u8, 2u8);
        body.push_str("010203");
        body.push_str("00960096");
        body.push_str("03E8FC18");
        body.push_str("0032");
        body.push_str("3264");

        let registry = DeviceRegistry::standard();
        let record = decode(command::ZONE_PARM_DATA, &body, &registry).unwrap();
        assert!(matches!(record, Record::ZoneParameters(_)));
    }

    #[test]
    fn rejects_command_with_no_record_decoder() {
        let registry = DeviceRegistry::standard();
        assert!(decode(command::ATTN, "00", &registry).is_err());
    }

    #[test]
    fn decodes_device_parameters_end_to_end() {
        let mut body = format!("{:04X}{:02X}{:02X}{:02X}", 6u16, 0u8, 4u8, 2u8); // common header
        body.push_str("01"); // device type = air sensor
        body.push_str("02"); // device index
        body.push_str("02"); // VLI (1-byte width, PARM_DATA) = 2 words = 4 bytes
        body.push_str("000A"); // calibration_offset = 10
        body.push_str("01"); // alarm_enabled = true
        body.push_str("00"); // reserved

        let registry = DeviceRegistry::standard();
        let record = decode(command::PARM_DATA, &body, &registry).unwrap();
        match record {
            Record::Device(group) => {
                assert_eq!(group.devices.len(), 1);
                let dev = &group.devices[0];
                assert_eq!(dev.device_type, device::DeviceType::AirSensor);
                assert_eq!(dev.device_index, 2);
                match &dev.body {
                    device::DeviceBody::Parameters(device::DeviceParameters::AirSensor(p)) => {
                        assert_eq!(p.calibration_offset, 10);
                        assert!(p.alarm_enabled);
                    }
                    other => panic!("unexpected body: {other:?}"),
                }
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn decodes_unknown_device_type_without_failing_the_record() {
        let mut body = format!("{:04X}{:02X}{:02X}{:02X}", 5u16, 0u8, 4u8, 2u8);
        body.push_str("FE"); // unrecognized device type
        body.push_str("01");
        body.push_str("01"); // VLI (1-byte width, PARM_DATA) = 1 word = 2 bytes
        body.push_str("ABCD"); // raw, opaque tail

        let registry = DeviceRegistry::standard();
        let record = decode(command::PARM_DATA, &body, &registry).unwrap();
        match record {
            Record::Device(group) => {
                assert_eq!(group.devices.len(), 1);
                let dev = &group.devices[0];
                assert_eq!(dev.device_type, device::DeviceType::Unknown(0xFE));
                match &dev.body {
                    device::DeviceBody::Unknown(raw) => assert_eq!(raw, &vec![0xAB, 0xCD]),
                    other => panic!("unexpected body: {other:?}"),
                }
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn decodes_every_device_block_in_a_multi_device_frame() {
        let mut body = format!("{:04X}{:02X}{:02X}{:02X}", 13u16, 0u8, 4u8, 2u8);
        for (index, calibration, alarm) in [(1u8, 0x0005u16, 1u8), (2, 0x000A, 0), (3, 0x000F, 1)] {
            body.push_str("01"); // device type = air sensor
            body.push_str(&format!("{index:02X}"));
            body.push_str("02"); // VLI = 2 words = 4 bytes
            body.push_str(&format!("{calibration:04X}"));
            body.push_str(&format!("{alarm:02X}"));
            body.push_str("00"); // reserved
        }

        let registry = DeviceRegistry::standard();
        let record = decode(command::PARM_DATA, &body, &registry).unwrap();
        match record {
            Record::Device(group) => {
                assert_eq!(group.devices.len(), 3);
                assert_eq!(group.devices[0].device_index, 1);
                assert_eq!(group.devices[1].device_index, 2);
                assert_eq!(group.devices[2].device_index, 3);
                for dev in &group.devices {
                    assert_eq!(dev.device_type, device::DeviceType::AirSensor);
                }
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn rejects_device_frame_whose_declared_size_does_not_match_payload() {
        // Declares 6 words (12 bytes) but the payload only carries 5 words
        // (10 bytes) worth of header + device block.
        let mut body = format!("{:04X}{:02X}{:02X}{:02X}", 6u16, 0u8, 4u8, 2u8);
        body.push_str("FE");
        body.push_str("01");
        body.push_str("01");
        body.push_str("ABCD");

        let registry = DeviceRegistry::standard();
        assert!(decode(command::PARM_DATA, &body, &registry).is_err());
    }
}
