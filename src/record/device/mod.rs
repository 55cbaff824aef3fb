//! Device records: a common header followed by a run of VLI-delimited
//! device blocks, each naming a device type and index before its
//! type-specific tail — the same shape as [`crate::record::history`] and
//! [`crate::record::alarm`]'s runs of entries. Dispatch to the tail
//! decoder goes through a process-wide [`DeviceRegistry`], following the
//! same resolve-once-dispatch-through-a-trait-object idea as the endian
//! strategy and this crate's codec table.

mod registry;
mod types;

pub use registry::{DeviceRegistry, DeviceStrategy};
pub use types::*;

use crate::tools::error::{PcmiError, Result};
use crate::wire::cursor::HexCursor;
use crate::wire::length;

/// The closed set of device-type codes this crate knows about. `Unknown`
/// preserves the raw sub-payload for any code the registry has no strategy
/// for, rather than failing the whole device-data frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[non_exhaustive]
pub enum DeviceType {
    /// Air temperature sensor.
    AirSensor,
    /// Relative humidity sensor.
    HumiditySensor,
    /// Air inlet actuator.
    Inlet,
    /// Side curtain actuator.
    Curtain,
    /// Ridge vent actuator.
    RidgeVent,
    /// Heater.
    Heater,
    /// Evaporative cooling pad.
    CoolPad,
    /// Ventilation fan.
    Fan,
    /// Generic timed output.
    Timed,
    /// Feed level sensor.
    FeedSensor,
    /// Water flow sensor.
    WaterSensor,
    /// Static pressure sensor.
    StaticSensor,
    /// Generic digital (on/off) sensor.
    DigitalSensor,
    /// Generic analog position sensor.
    PositionSensor,
    /// Chimney damper actuator.
    Chimney,
    /// Generic switch.
    Switch,
    /// Variable-output heater.
    VariableHeater,
    /// Variable-frequency-drive fan.
    VfdFan,
    /// 0-10V dimmable lighting controller.
    V10Lights,
    /// Gas concentration sensor.
    GasSensor,
    /// A device-type code the registry has no strategy for.
    Unknown(u8),
}

impl DeviceType {
    /// Map a raw device-type byte to a [`DeviceType`].
    pub fn from_code(code: u8) -> Self {
        match code {
            0x01 => DeviceType::AirSensor,
            0x02 => DeviceType::HumiditySensor,
            0x03 => DeviceType::Inlet,
            0x04 => DeviceType::Curtain,
            0x05 => DeviceType::RidgeVent,
            0x06 => DeviceType::Heater,
            0x07 => DeviceType::CoolPad,
            0x08 => DeviceType::Fan,
            0x09 => DeviceType::Timed,
            0x0A => DeviceType::FeedSensor,
            0x0B => DeviceType::WaterSensor,
            0x0C => DeviceType::StaticSensor,
            0x0D => DeviceType::DigitalSensor,
            0x0E => DeviceType::PositionSensor,
            0x0F => DeviceType::Chimney,
            0x10 => DeviceType::Switch,
            0x11 => DeviceType::VariableHeater,
            0x12 => DeviceType::VfdFan,
            0x13 => DeviceType::V10Lights,
            0x14 => DeviceType::GasSensor,
            other => DeviceType::Unknown(other),
        }
    }

    /// The raw device-type byte this variant was built from, or would be
    /// encoded as.
    pub fn code(&self) -> u8 {
        match self {
            DeviceType::AirSensor => 0x01,
            DeviceType::HumiditySensor => 0x02,
            DeviceType::Inlet => 0x03,
            DeviceType::Curtain => 0x04,
            DeviceType::RidgeVent => 0x05,
            DeviceType::Heater => 0x06,
            DeviceType::CoolPad => 0x07,
            DeviceType::Fan => 0x08,
            DeviceType::Timed => 0x09,
            DeviceType::FeedSensor => 0x0A,
            DeviceType::WaterSensor => 0x0B,
            DeviceType::StaticSensor => 0x0C,
            DeviceType::DigitalSensor => 0x0D,
            DeviceType::PositionSensor => 0x0E,
            DeviceType::Chimney => 0x0F,
            DeviceType::Switch => 0x10,
            DeviceType::VariableHeater => 0x11,
            DeviceType::VfdFan => 0x12,
            DeviceType::V10Lights => 0x13,
            DeviceType::GasSensor => 0x14,
            DeviceType::Unknown(code) => *code,
        }
    }
}

/// A decoded device-data record: the common header plus every
/// VLI-delimited device block the frame carried. A frame naming several
/// devices (e.g. every air sensor on a zone) decodes to one `DeviceGroup`
/// holding all of them, not just the first.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeviceGroup {
    /// Common record header.
    pub header: crate::record::header::RecordHeader,
    /// One entry per device block the frame carried, in wire order.
    pub devices: Vec<DeviceRecord>,
}

/// One device's decoded block within a [`DeviceGroup`]: its identity and
/// whichever tail the registry produced.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeviceRecord {
    /// Device-type code.
    pub device_type: DeviceType,
    /// Device index within its type.
    pub device_index: u8,
    /// Decoded parameters or variables, or the raw bytes of an unknown
    /// device's sub-payload.
    pub body: DeviceBody,
}

/// The decoded tail of a device record, or the raw bytes preserved for an
/// unrecognized device type.
#[derive(Debug, Clone, serde::Serialize)]
pub enum DeviceBody {
    /// Decoded device configuration.
    Parameters(DeviceParameters),
    /// Decoded device runtime state.
    Variables(DeviceVariables),
    /// No strategy registered for this device type; raw sub-payload bytes
    /// are preserved rather than discarded.
    Unknown(Vec<u8>),
}

/// Device-specific configuration, one variant per known [`DeviceType`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub enum DeviceParameters {
    /// See [`AirSensorParameters`].
    AirSensor(AirSensorParameters),
    /// See [`HumiditySensorParameters`].
    HumiditySensor(HumiditySensorParameters),
    /// See [`InletParameters`].
    Inlet(InletParameters),
    /// See [`CurtainParameters`].
    Curtain(CurtainParameters),
    /// See [`RidgeVentParameters`].
    RidgeVent(RidgeVentParameters),
    /// See [`HeaterParameters`].
    Heater(HeaterParameters),
    /// See [`CoolPadParameters`].
    CoolPad(CoolPadParameters),
    /// See [`FanParameters`].
    Fan(FanParameters),
    /// See [`TimedParameters`].
    Timed(TimedParameters),
    /// See [`FeedSensorParameters`].
    FeedSensor(FeedSensorParameters),
    /// See [`WaterSensorParameters`].
    WaterSensor(WaterSensorParameters),
    /// See [`StaticSensorParameters`].
    StaticSensor(StaticSensorParameters),
    /// See [`DigitalSensorParameters`].
    DigitalSensor(DigitalSensorParameters),
    /// See [`PositionSensorParameters`].
    PositionSensor(PositionSensorParameters),
    /// See [`ChimneyParameters`].
    Chimney(ChimneyParameters),
    /// See [`SwitchParameters`].
    Switch(SwitchParameters),
    /// See [`VariableHeaterParameters`].
    VariableHeater(VariableHeaterParameters),
    /// See [`VfdFanParameters`].
    VfdFan(VfdFanParameters),
    /// See [`V10LightsParameters`].
    V10Lights(V10LightsParameters),
    /// See [`GasSensorParameters`].
    GasSensor(GasSensorParameters),
}

/// Device-specific runtime state, one variant per known [`DeviceType`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub enum DeviceVariables {
    /// See [`AirSensorVariables`].
    AirSensor(AirSensorVariables),
    /// See [`HumiditySensorVariables`].
    HumiditySensor(HumiditySensorVariables),
    /// See [`InletVariables`].
    Inlet(InletVariables),
    /// See [`CurtainVariables`].
    Curtain(CurtainVariables),
    /// See [`RidgeVentVariables`].
    RidgeVent(RidgeVentVariables),
    /// See [`HeaterVariables`].
    Heater(HeaterVariables),
    /// See [`CoolPadVariables`].
    CoolPad(CoolPadVariables),
    /// See [`FanVariables`].
    Fan(FanVariables),
    /// See [`TimedVariables`].
    Timed(TimedVariables),
    /// See [`FeedSensorVariables`].
    FeedSensor(FeedSensorVariables),
    /// See [`WaterSensorVariables`].
    WaterSensor(WaterSensorVariables),
    /// See [`StaticSensorVariables`].
    StaticSensor(StaticSensorVariables),
    /// See [`DigitalSensorVariables`].
    DigitalSensor(DigitalSensorVariables),
    /// See [`PositionSensorVariables`].
    PositionSensor(PositionSensorVariables),
    /// See [`ChimneyVariables`].
    Chimney(ChimneyVariables),
    /// See [`SwitchVariables`].
    Switch(SwitchVariables),
    /// See [`VariableHeaterVariables`].
    VariableHeater(VariableHeaterVariables),
    /// See [`VfdFanVariables`].
    VfdFan(VfdFanVariables),
    /// See [`V10LightsVariables`].
    V10Lights(V10LightsVariables),
    /// See [`GasSensorVariables`].
    GasSensor(GasSensorVariables),
}

/// Decode one device's header (type, index, sub-record length in bytes)
/// from `cursor`, which must be positioned at the start of the device's
/// block within a device-data record. The sub-record length is a VLI
/// whose width (`wire::length::vli_width`) is selected by the enclosing
/// frame's `command` byte: 2 hex chars for non-extended commands, 4 for
/// extended ones.
pub fn decode_device_header(cursor: &mut HexCursor, command: u8) -> Result<(DeviceType, u8, usize)> {
    let type_code = cursor.read_u8()?;
    let device_index = cursor.read_u8()?;
    let width = length::vli_width(command);
    if cursor.remaining() < width {
        return Err(PcmiError::parse(
            "device record truncated mid-VLI".to_string(),
        ));
    }
    let vli_hex = cursor.read_raw_hex(width)?;
    let sub_len_bytes = length::decode_vli(vli_hex, command)?;
    Ok((DeviceType::from_code(type_code), device_index, sub_len_bytes))
}

/// Decode one device's parameters from `cursor` using `registry`, reading
/// exactly `sub_len_bytes` of tail payload regardless of whether a
/// strategy was found (so the cursor ends up correctly positioned for the
/// next device in the frame).
pub fn decode_device_parameters(
    cursor: &mut HexCursor,
    registry: &DeviceRegistry,
    device_type: DeviceType,
    sub_len_bytes: usize,
) -> Result<DeviceBody> {
    let start = cursor.position();
    let body = match registry.get(device_type) {
        Some(strategy) => {
            let parms = strategy.parse_parameters(cursor)?;
            DeviceBody::Parameters(parms)
        }
        None => {
            let raw = cursor.read_bytes(sub_len_bytes)?;
            DeviceBody::Unknown(raw)
        }
    };
    let consumed_chars = cursor.position() - start;
    let expected_chars = sub_len_bytes * 2;
    if consumed_chars != expected_chars {
        return Err(PcmiError::protocol(format!(
            "device {device_type:?} parameter decoder consumed {consumed_chars} chars, sub-record declared {expected_chars}"
        )));
    }
    Ok(body)
}

/// Decode one device's variables from `cursor` using `registry`. See
/// [`decode_device_parameters`] for the consumption-accounting contract.
pub fn decode_device_variables(
    cursor: &mut HexCursor,
    registry: &DeviceRegistry,
    device_type: DeviceType,
    sub_len_bytes: usize,
) -> Result<DeviceBody> {
    let start = cursor.position();
    let body = match registry.get(device_type) {
        Some(strategy) => {
            let vars = strategy.parse_variables(cursor)?;
            DeviceBody::Variables(vars)
        }
        None => {
            let raw = cursor.read_bytes(sub_len_bytes)?;
            DeviceBody::Unknown(raw)
        }
    };
    let consumed_chars = cursor.position() - start;
    let expected_chars = sub_len_bytes * 2;
    if consumed_chars != expected_chars {
        return Err(PcmiError::protocol(format!(
            "device {device_type:?} variable decoder consumed {consumed_chars} chars, sub-record declared {expected_chars}"
        )));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_codes_both_ways() {
        for code in 0x01u8..=0x14 {
            let ty = DeviceType::from_code(code);
            assert_eq!(ty.code(), code);
            assert_ne!(ty, DeviceType::Unknown(code));
        }
    }

    #[test]
    fn unrecognized_code_maps_to_unknown() {
        assert_eq!(DeviceType::from_code(0xFE), DeviceType::Unknown(0xFE));
    }
}
