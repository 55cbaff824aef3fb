//! The PCMI command byte space: named constants for every command in
//! spec.md §6, plus the classification helpers the frame reader and session
//! machine use to decide how to parse and react to a frame.

// --- Session management ---

/// Attention.
pub const ATTN: u8 = 0x81;
/// Attention acknowledged.
pub const AT_ACK: u8 = 0x82;
/// Serial number (connect request), carries an 8-digit ASCII address.
pub const SERIAL_NUMBER: u8 = 0x85;
/// Serial number acknowledged; connect succeeded.
pub const SN_ACK: u8 = 0x86;
/// Break: abandon the current dialogue and return to `Connected`.
pub const BREAK: u8 = 0x87;
/// Break acknowledged.
pub const BR_ACK: u8 = 0x88;

// --- Data requests ---

/// Request device parameters.
pub const SEND_PARM: u8 = 0x8F;
/// Request device variables.
pub const SEND_VAR: u8 = 0x91;
/// Request zone parameters.
pub const SEND_ZONE_PARM: u8 = 0x95;
/// Request zone variables.
pub const SEND_ZONE_VAR: u8 = 0x97;
/// Request history.
pub const SEND_HISTORY: u8 = 0x93;
/// Request alarms.
pub const SEND_ALARM: u8 = 0xA4;
/// Request firmware version.
pub const SEND_VERSION: u8 = 0x9F;
/// Request controller info.
pub const SEND_INFO: u8 = 0xAC;

// --- Data strings (responses), 1-byte RLI variant ---

/// Device parameter data (1-byte RLI).
pub const PARM_DATA: u8 = 0x90;
/// Device variable data (1-byte RLI).
pub const VAR_DATA: u8 = 0x92;
/// Zone parameter data (1-byte RLI).
pub const ZONE_PARM_DATA: u8 = 0x96;
/// Zone variable data (1-byte RLI).
pub const ZONE_VAR_DATA: u8 = 0x98;

// --- Data strings (responses), 2-byte "extended" RLI variant ---

/// Device parameter data (2-byte RLI), emitted by controllers whose record
/// is too large to address with a 1-byte RLI.
pub const PARM_DATA_EXT: u8 = 0xB7;
/// Device variable data (2-byte RLI).
pub const VAR_DATA_EXT: u8 = 0xB9;
/// Zone parameter data (2-byte RLI).
pub const ZONE_PARM_DATA_EXT: u8 = 0xB8;
/// Zone variable data (2-byte RLI).
pub const ZONE_VAR_DATA_EXT: u8 = 0xBA;

/// Firmware version data, CR-delimited (no RLI).
pub const VERSION_DATA: u8 = 0xA0;
/// History data (1-byte VLI width, command < 0xB0).
pub const HISTORY_DATA: u8 = 0x94;
/// History data (2-byte VLI width).
pub const HISTORY_DATA_EXT: u8 = 0xB5;
/// Alarm data (1-byte VLI width).
pub const ALARM_DATA: u8 = 0xA5;
/// Alarm data (2-byte VLI width).
pub const ALARM_DATA_EXT: u8 = 0xB3;

// --- Flow control ---

/// Acknowledge a record and request the next one.
pub const OK_SEND_NEXT: u8 = 0x99;
/// End of the current download; no more records follow.
pub const END_OF_RECORD: u8 = 0x9B;
/// Acknowledge and request the next controller-config record.
pub const OK_CC_NEXT: u8 = 0xA3;
/// Undocumented bare-ack code observed alongside the named flow-control
/// codes in the controller's ack set; classified as a bare ack but not
/// otherwise interpreted. See DESIGN.md.
pub const RESERVED_ACK_0XA9: u8 = 0xA9;

// --- Errors (0xC0..=0xDB) ---

/// Generic "OK" / no-op acknowledgement at the bottom of the error range.
pub const OK: u8 = 0xC0;
/// Generic error.
pub const ER_GENERIC: u8 = 0xC1;
/// Bad password.
pub const ER_PASSWORD: u8 = 0xC2;
/// Serial number mismatch.
pub const ER_SERIAL: u8 = 0xC3;
/// Malformed data.
pub const ER_DATA: u8 = 0xC4;
/// No such zone.
pub const ER_NO_ZONE: u8 = 0xC5;
/// Resend the last frame.
pub const ER_RESEND: u8 = 0xC6;
/// No such device.
pub const ER_NO_DEVICE: u8 = 0xC7;
/// No zone upload available.
pub const ER_NO_ZONE_UPLOAD: u8 = 0xC8;
/// Transient: ask the client to try the previous request again.
pub const ER_TRY_AGAIN: u8 = 0xCA;
/// Transient: controller is hands-off (busy with its own I/O).
pub const ER_HANDS_OFF: u8 = 0xCB;
/// Checksum error reported by the controller.
pub const ER_CHECKSUM: u8 = 0xD9;
/// Controller is still starting up.
pub const ER_START_UP: u8 = 0xDA;
/// Length field did not match the payload the controller received.
pub const ER_LENGTH: u8 = 0xDB;

/// Lowest command byte that uses a 2-byte RLI / VLI ("extended" variants).
pub const EXTENDED_THRESHOLD: u8 = 0xB0;
/// Lowest command byte that is a controller-reported error.
pub const ERROR_THRESHOLD: u8 = 0xC0;
/// Highest command byte in the controller error range.
pub const ERROR_CEILING: u8 = 0xDB;

/// True when `command` is an "extended" data-string variant carrying a
/// 2-byte length indicator.
pub fn is_extended(command: u8) -> bool {
    command >= EXTENDED_THRESHOLD
}

/// True when `command` falls in the controller-reported error range
/// (0xC0..=0xDB inclusive).
pub fn is_error(command: u8) -> bool {
    (ERROR_THRESHOLD..=ERROR_CEILING).contains(&command)
}

/// True when `command` is a bare acknowledgement: a single command byte
/// with no length indicator, payload, checksum, or CR terminator.
pub fn is_bare_ack(command: u8) -> bool {
    matches!(
        command,
        AT_ACK | SN_ACK | BR_ACK | END_OF_RECORD | OK_CC_NEXT | RESERVED_ACK_0XA9
    ) || is_error(command)
}

/// True when `command` is a zone-parameter data-string, under either RLI
/// width.
pub fn is_zone_parm_data(command: u8) -> bool {
    matches!(command, ZONE_PARM_DATA | ZONE_PARM_DATA_EXT)
}

/// True when `command` is a zone-variable data-string, under either RLI
/// width.
pub fn is_zone_var_data(command: u8) -> bool {
    matches!(command, ZONE_VAR_DATA | ZONE_VAR_DATA_EXT)
}

/// True when `command` carries device parameter data.
pub fn is_device_parm_data(command: u8) -> bool {
    matches!(command, PARM_DATA | PARM_DATA_EXT)
}

/// True when `command` carries device variable data.
pub fn is_device_var_data(command: u8) -> bool {
    matches!(command, VAR_DATA | VAR_DATA_EXT)
}

/// True when `command` carries history data (VLI-delimited sub-records).
pub fn is_history_data(command: u8) -> bool {
    matches!(command, HISTORY_DATA | HISTORY_DATA_EXT)
}

/// True when `command` carries alarm data (VLI-delimited sub-records).
pub fn is_alarm_data(command: u8) -> bool {
    matches!(command, ALARM_DATA | ALARM_DATA_EXT)
}

/// True when `command` is the version data-string (CR-delimited, no RLI).
pub fn is_version_data(command: u8) -> bool {
    command == VERSION_DATA
}

/// True when `command` uses a 1-byte RLI (outer record frame).
pub fn uses_1byte_rli(command: u8) -> bool {
    matches!(
        command,
        PARM_DATA | VAR_DATA | ZONE_PARM_DATA | ZONE_VAR_DATA
    )
}

/// True when `command` uses a 2-byte RLI (outer record frame).
pub fn uses_2byte_rli(command: u8) -> bool {
    matches!(
        command,
        PARM_DATA_EXT | VAR_DATA_EXT | ZONE_PARM_DATA_EXT | ZONE_VAR_DATA_EXT
    )
}

/// Look up the fixed human-readable message for a controller error code.
/// Codes in the error range with no assigned name return a generic
/// "reserved/unrecognized" message rather than failing, since the
/// controller may use codes this table doesn't yet name.
pub fn controller_error_message(code: u8) -> &'static str {
    match code {
        OK => "ok",
        ER_GENERIC => "generic error",
        ER_PASSWORD => "bad password",
        ER_SERIAL => "serial number mismatch",
        ER_DATA => "malformed data",
        ER_NO_ZONE => "no such zone",
        ER_RESEND => "resend last frame",
        ER_NO_DEVICE => "no such device",
        ER_NO_ZONE_UPLOAD => "no zone upload available",
        ER_TRY_AGAIN => "try again",
        ER_HANDS_OFF => "controller is hands-off",
        ER_CHECKSUM => "checksum error",
        ER_START_UP => "controller is starting up",
        ER_LENGTH => "length field mismatch",
        _ if is_error(code) => "reserved/unrecognized controller error code",
        _ => "not a controller error code",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_threshold_is_b0() {
        assert!(!is_extended(0xAF));
        assert!(is_extended(0xB0));
    }

    #[test]
    fn error_range_is_c0_to_db() {
        assert!(is_error(0xC0));
        assert!(is_error(0xDB));
        assert!(!is_error(0xDC));
        assert!(!is_error(0xBF));
    }

    #[test]
    fn zone_parm_data_covers_both_rli_widths_only() {
        assert!(is_zone_parm_data(ZONE_PARM_DATA));
        assert!(is_zone_parm_data(ZONE_PARM_DATA_EXT));
        assert!(!is_zone_parm_data(PARM_DATA));
        assert!(!is_zone_parm_data(PARM_DATA_EXT));
        assert!(!is_zone_parm_data(VAR_DATA));
    }

    #[test]
    fn device_parm_data_is_distinct_from_zone_parm_data() {
        assert!(is_device_parm_data(PARM_DATA));
        assert!(is_device_parm_data(PARM_DATA_EXT));
        assert!(!is_device_parm_data(ZONE_PARM_DATA));
        assert!(!is_device_parm_data(ZONE_PARM_DATA_EXT));
    }

    #[test]
    fn bare_ack_set_matches_spec() {
        for code in [AT_ACK, SN_ACK, BR_ACK, END_OF_RECORD, OK_CC_NEXT, RESERVED_ACK_0XA9] {
            assert!(is_bare_ack(code));
        }
        for code in 0xC0u16..=0xDB {
            assert!(is_bare_ack(code as u8));
        }
        assert!(!is_bare_ack(SEND_ZONE_PARM));
    }

    #[test]
    fn named_errors_have_messages() {
        assert_eq!(controller_error_message(ER_TRY_AGAIN), "try again");
        assert_eq!(controller_error_message(ER_HANDS_OFF), "controller is hands-off");
        assert_eq!(
            controller_error_message(0xC9),
            "reserved/unrecognized controller error code"
        );
    }
}
