//! Zone parameter (configuration) and zone variable (runtime state)
//! records.

use crate::record::header::{self, RecordHeader};
use crate::record::temperature::Temperature;
use crate::tools::error::{PcmiError, Result};

/// Zone numbers run 1..9 inclusive; anything else is a decode error.
pub const MIN_ZONE: u8 = 1;
/// Highest valid zone number.
pub const MAX_ZONE: u8 = 9;

fn validate_zone(zone_number: u8) -> Result<()> {
    if !(MIN_ZONE..=MAX_ZONE).contains(&zone_number) {
        return Err(PcmiError::parse(format!(
            "zone number {zone_number} out of range {MIN_ZONE}..={MAX_ZONE}"
        )));
    }
    Ok(())
}

/// `record_format` values at or above this threshold carry the "long head
/// count" fields.
pub const LONG_HEAD_COUNT_FORMAT_THRESHOLD: u8 = 3;

/// Per-zone configuration: setpoints, stage counts, alarm thresholds.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ZoneParameters {
    /// Common record header.
    pub header: RecordHeader,
    /// Zone number, 1..9.
    pub zone_number: u8,
    /// Number of configured heat stages.
    pub heat_stages: u8,
    /// Number of configured cooling stages.
    pub cool_stages: u8,
    /// Number of configured ventilation stages.
    pub vent_stages: u8,
    /// Temperature at which heating turns on.
    pub heat_setpoint: Temperature,
    /// Temperature at which cooling turns on.
    pub cool_setpoint: Temperature,
    /// High-temperature alarm threshold.
    pub temp_alarm_high: Temperature,
    /// Low-temperature alarm threshold.
    pub temp_alarm_low: Temperature,
    /// Target static pressure, in hundredths of an inch of water column.
    pub static_pressure_setpoint: i16,
    /// Target curtain position, percent open.
    pub curtain_target_pct: u8,
    /// Target inlet position, percent open.
    pub inlet_target_pct: u8,
    /// Inlet actuator long-head pulse count. Only present when
    /// `record_format >= 3`.
    pub inlet_long_head_count: Option<u16>,
    /// Curtain actuator long-head pulse count. Only present when
    /// `record_format >= 3`.
    pub curtain_long_head_count: Option<u16>,
}

/// Decode a zone-parameter record from `payload_hex`, the hex-ASCII payload
/// of a frame whose command is `0x96`/`0xB8` (see
/// `wire::command::is_zone_parm_data`).
pub fn decode_parameters(payload_hex: &str) -> Result<ZoneParameters> {
    let mut cursor = header::cursor_for_payload(payload_hex)?;
    let header = RecordHeader::parse(&mut cursor)?;
    header.validate_size(payload_hex)?;

    let zone_number = header.id;
    validate_zone(zone_number)?;

    let heat_stages = cursor.read_u8()?;
    let cool_stages = cursor.read_u8()?;
    let vent_stages = cursor.read_u8()?;
    let heat_setpoint = Temperature::from_raw(cursor.read_i16()?);
    let cool_setpoint = Temperature::from_raw(cursor.read_i16()?);
    let temp_alarm_high = Temperature::from_raw(cursor.read_i16()?);
    let temp_alarm_low = Temperature::from_raw(cursor.read_i16()?);
    let static_pressure_setpoint = cursor.read_i16()?;
    let curtain_target_pct = cursor.read_u8()?;
    let inlet_target_pct = cursor.read_u8()?;

    let (inlet_long_head_count, curtain_long_head_count) =
        if header.record_format >= LONG_HEAD_COUNT_FORMAT_THRESHOLD {
            (Some(cursor.read_u16()?), Some(cursor.read_u16()?))
        } else {
            (None, None)
        };

    Ok(ZoneParameters {
        header,
        zone_number,
        heat_stages,
        cool_stages,
        vent_stages,
        heat_setpoint,
        cool_setpoint,
        temp_alarm_high,
        temp_alarm_low,
        static_pressure_setpoint,
        curtain_target_pct,
        inlet_target_pct,
        inlet_long_head_count,
        curtain_long_head_count,
    })
}

/// Per-zone runtime state: measured temperature, humidity, static pressure,
/// and current actuator positions/stage activity.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ZoneVariables {
    /// Common record header.
    pub header: RecordHeader,
    /// Zone number, 1..9.
    pub zone_number: u8,
    /// Measured inside temperature.
    pub current_temp: Temperature,
    /// Measured outside temperature.
    pub outside_temp: Temperature,
    /// Measured relative humidity, in tenths of a percent.
    pub current_humidity: u16,
    /// Measured static pressure, in hundredths of an inch of water column.
    pub static_pressure: i16,
    /// Measured wind speed, in miles per hour.
    pub wind_speed_mph: u8,
    /// Bitmask of currently active heat stages.
    pub active_heat_stages: u8,
    /// Bitmask of currently active cool stages.
    pub active_cool_stages: u8,
    /// Bitmask of currently active ventilation stages.
    pub active_vent_stages: u8,
    /// Current curtain position, percent open.
    pub curtain_position_pct: u8,
    /// Current inlet position, percent open.
    pub inlet_position_pct: u8,
    /// True when any alarm condition is active for this zone.
    pub alarm_active: bool,
}

/// Decode a zone-variable record from `payload_hex`.
pub fn decode_variables(payload_hex: &str) -> Result<ZoneVariables> {
    let mut cursor = header::cursor_for_payload(payload_hex)?;
    let header = RecordHeader::parse(&mut cursor)?;
    header.validate_size(payload_hex)?;

    let zone_number = header.id;
    validate_zone(zone_number)?;

    let current_temp = Temperature::from_raw(cursor.read_i16()?);
    let outside_temp = Temperature::from_raw(cursor.read_i16()?);
    let current_humidity = cursor.read_u16()?;
    let static_pressure = cursor.read_i16()?;
    let wind_speed_mph = cursor.read_u8()?;
    let active_heat_stages = cursor.read_u8()?;
    let active_cool_stages = cursor.read_u8()?;
    let active_vent_stages = cursor.read_u8()?;
    let curtain_position_pct = cursor.read_u8()?;
    let inlet_position_pct = cursor.read_u8()?;
    let alarm_active = cursor.read_u8()? != 0;

    Ok(ZoneVariables {
        header,
        zone_number,
        current_temp,
        outside_temp,
        current_humidity,
        static_pressure,
        wind_speed_mph,
        active_heat_stages,
        active_cool_stages,
        active_vent_stages,
        curtain_position_pct,
        inlet_position_pct,
        alarm_active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_header(size_words: u16, id: u8, record_type: u8, format: u8) -> String {
        // NonSwap formats (>= 20) read multi-byte fields little-endian, so
        // the header's own size field has to be written byte-swapped too.
        let size_bytes = if format >= 20 {
            size_words.to_le_bytes()
        } else {
            size_words.to_be_bytes()
        };
        format!(
            "{:02X}{:02X}{id:02X}{record_type:02X}{format:02X}",
            size_bytes[0], size_bytes[1]
        )
    }

    #[test]
    fn decodes_parameters_without_long_head_counts() {
        let mut body = hex_header(10, 3, 1, 2); // format=2 < 3, Swap
        body.push_str("010203"); // stages
        body.push_str("00960096"); // heat/cool setpoints = 15.0/15.0 F (150 tenths)
        body.push_str("03E8FC18"); // alarm high/low
        body.push_str("0032"); // static pressure setpoint
        body.push_str("3264"); // curtain/inlet target pct

        let parms = decode_parameters(&body).unwrap();
        assert_eq!(parms.zone_number, 3);
        assert_eq!(parms.heat_stages, 1);
        assert_eq!(parms.cool_stages, 2);
        assert_eq!(parms.vent_stages, 3);
        assert_eq!(parms.inlet_long_head_count, None);
        assert_eq!(parms.curtain_long_head_count, None);
    }

    #[test]
    fn decodes_long_head_counts_when_format_at_least_3() {
        let mut body = hex_header(12, 3, 1, 3); // format=3 -> long heads present
        body.push_str("010203");
        body.push_str("00960096");
        body.push_str("03E8FC18");
        body.push_str("0032");
        body.push_str("3264");
        body.push_str("012C"); // inlet long head count = 300
        body.push_str("0190"); // curtain long head count = 400

        let parms = decode_parameters(&body).unwrap();
        assert_eq!(parms.inlet_long_head_count, Some(300));
        assert_eq!(parms.curtain_long_head_count, Some(400));
    }

    #[test]
    fn rejects_zone_number_out_of_range() {
        let mut body = hex_header(10, 10, 1, 2);
        body.push_str("010203");
        body.push_str("00960096");
        body.push_str("03E8FC18");
        body.push_str("0032");
        body.push_str("3264");
        assert!(decode_parameters(&body).is_err());
    }

    #[test]
    fn decodes_variables_and_preserves_temperature_sentinel() {
        let mut body = hex_header(10, 5, 2, 25); // format>=20 -> NonSwap
                                                  // little-endian fields below
        body.push_str("FF7F"); // current_temp = 0x7FFF NaN, little-endian bytes FF 7F
        body.push_str("1C02"); // outside_temp = 0x021C = 540 -> 54.0F
        body.push_str("2C01"); // humidity = 0x012C = 300 (30.0%)
        body.push_str("6400"); // static pressure = 0x0064 = 100
        body.push_str("05"); // wind speed mph
        body.push_str("01"); // active heat stages
        body.push_str("00"); // active cool stages
        body.push_str("02"); // active vent stages
        body.push_str("32"); // curtain pos
        body.push_str("64"); // inlet pos
        body.push_str("01"); // alarm active

        let vars = decode_variables(&body).unwrap();
        assert_eq!(vars.zone_number, 5);
        assert!(vars.current_temp.is_absent());
        assert_eq!(vars.outside_temp.fahrenheit(), Some(54.0));
        assert!(vars.alarm_active);
    }
}
