//! Per-device-type parameter and variable structs, and the zero-sized
//! strategy types that decode them. Sensors carry a calibration offset and
//! an alarm-enable flag in their parameters, and a reading plus an active
//! alarm flag in their variables. Actuators carry position limits in their
//! parameters and a current position plus an active flag in their
//! variables. Staged equipment (heaters, fans, cool pads) carry a stage
//! count and minimum-on time in their parameters, and an active flag plus
//! output percentage in their variables. Odd-length layouts carry a
//! trailing reserved byte so every sub-record lands on a whole 16-bit word,
//! matching the device header's word-counted sub-record length.

use crate::record::device::registry::DeviceStrategy;
use crate::record::device::{DeviceParameters, DeviceVariables};
use crate::record::temperature::Temperature;
use crate::tools::error::Result;
use crate::wire::cursor::HexCursor;

macro_rules! sensor_device {
    ($strategy:ident, $parms:ident, $vars:ident, $parms_variant:ident, $vars_variant:ident) => {
        #[doc = concat!("Configuration for a ", stringify!($strategy), ".")]
        #[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
        pub struct $parms {
            /// Added to the raw reading before it is reported.
            pub calibration_offset: i16,
            /// Whether an out-of-range reading should raise an alarm.
            pub alarm_enabled: bool,
        }

        #[doc = concat!("Runtime state for a ", stringify!($strategy), ".")]
        #[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
        pub struct $vars {
            /// Current calibrated reading.
            pub reading: i16,
            /// Whether the alarm condition is currently active.
            pub alarm_active: bool,
        }

        /// Decoding strategy for this device type.
        #[derive(Debug, Clone, Copy)]
        pub struct $strategy;

        impl DeviceStrategy for $strategy {
            fn parse_parameters(&self, cursor: &mut HexCursor) -> Result<DeviceParameters> {
                let calibration_offset = cursor.read_i16()?;
                let alarm_enabled = cursor.read_u8()? != 0;
                let _reserved = cursor.read_u8()?; // pads the sub-record to a whole word
                Ok(DeviceParameters::$parms_variant($parms {
                    calibration_offset,
                    alarm_enabled,
                }))
            }

            fn parse_variables(&self, cursor: &mut HexCursor) -> Result<DeviceVariables> {
                let reading = cursor.read_i16()?;
                let alarm_active = cursor.read_u8()? != 0;
                let _reserved = cursor.read_u8()?;
                Ok(DeviceVariables::$vars_variant($vars {
                    reading,
                    alarm_active,
                }))
            }
        }
    };
}

macro_rules! actuator_device {
    ($strategy:ident, $parms:ident, $vars:ident, $parms_variant:ident, $vars_variant:ident) => {
        #[doc = concat!("Configuration for a ", stringify!($strategy), ".")]
        #[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
        pub struct $parms {
            /// Minimum allowed position, percent open.
            pub min_pct: u8,
            /// Maximum allowed position, percent open.
            pub max_pct: u8,
        }

        #[doc = concat!("Runtime state for a ", stringify!($strategy), ".")]
        #[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
        pub struct $vars {
            /// Current position, percent open.
            pub position_pct: u8,
            /// Whether the actuator is currently moving or energized.
            pub active: bool,
        }

        /// Decoding strategy for this device type.
        #[derive(Debug, Clone, Copy)]
        pub struct $strategy;

        impl DeviceStrategy for $strategy {
            fn parse_parameters(&self, cursor: &mut HexCursor) -> Result<DeviceParameters> {
                let min_pct = cursor.read_u8()?;
                let max_pct = cursor.read_u8()?;
                Ok(DeviceParameters::$parms_variant($parms { min_pct, max_pct }))
            }

            fn parse_variables(&self, cursor: &mut HexCursor) -> Result<DeviceVariables> {
                let position_pct = cursor.read_u8()?;
                let active = cursor.read_u8()? != 0;
                Ok(DeviceVariables::$vars_variant($vars {
                    position_pct,
                    active,
                }))
            }
        }
    };
}

macro_rules! staged_device {
    ($strategy:ident, $parms:ident, $vars:ident, $parms_variant:ident, $vars_variant:ident) => {
        #[doc = concat!("Configuration for a ", stringify!($strategy), ".")]
        #[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
        pub struct $parms {
            /// Number of configured stages.
            pub stage_count: u8,
            /// Minimum on-time, in seconds, once a stage activates.
            pub min_on_seconds: u16,
        }

        #[doc = concat!("Runtime state for a ", stringify!($strategy), ".")]
        #[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
        pub struct $vars {
            /// Whether any stage is currently active.
            pub active: bool,
            /// Current output level, percent of full capacity.
            pub output_pct: u8,
        }

        /// Decoding strategy for this device type.
        #[derive(Debug, Clone, Copy)]
        pub struct $strategy;

        impl DeviceStrategy for $strategy {
            fn parse_parameters(&self, cursor: &mut HexCursor) -> Result<DeviceParameters> {
                let stage_count = cursor.read_u8()?;
                let _reserved = cursor.read_u8()?; // pads the sub-record to a whole word
                let min_on_seconds = cursor.read_u16()?;
                Ok(DeviceParameters::$parms_variant($parms {
                    stage_count,
                    min_on_seconds,
                }))
            }

            fn parse_variables(&self, cursor: &mut HexCursor) -> Result<DeviceVariables> {
                let active = cursor.read_u8()? != 0;
                let output_pct = cursor.read_u8()?;
                Ok(DeviceVariables::$vars_variant($vars {
                    active,
                    output_pct,
                }))
            }
        }
    };
}

// --- Sensors -----------------------------------------------------------

sensor_device!(
    HumiditySensor,
    HumiditySensorParameters,
    HumiditySensorVariables,
    HumiditySensor,
    HumiditySensor
);
sensor_device!(
    FeedSensor,
    FeedSensorParameters,
    FeedSensorVariables,
    FeedSensor,
    FeedSensor
);
sensor_device!(
    WaterSensor,
    WaterSensorParameters,
    WaterSensorVariables,
    WaterSensor,
    WaterSensor
);
sensor_device!(
    StaticSensor,
    StaticSensorParameters,
    StaticSensorVariables,
    StaticSensor,
    StaticSensor
);
sensor_device!(
    DigitalSensor,
    DigitalSensorParameters,
    DigitalSensorVariables,
    DigitalSensor,
    DigitalSensor
);
sensor_device!(
    PositionSensor,
    PositionSensorParameters,
    PositionSensorVariables,
    PositionSensor,
    PositionSensor
);
sensor_device!(
    GasSensor,
    GasSensorParameters,
    GasSensorVariables,
    GasSensor,
    GasSensor
);

/// Configuration for an [`AirSensor`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AirSensorParameters {
    /// Added to the raw reading before it is reported, in tenths of a degree.
    pub calibration_offset: i16,
    /// Whether an out-of-range reading should raise an alarm.
    pub alarm_enabled: bool,
}

/// Runtime state for an [`AirSensor`].
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct AirSensorVariables {
    /// Current calibrated temperature reading.
    pub reading: Temperature,
    /// Whether the alarm condition is currently active.
    pub alarm_active: bool,
}

/// Decoding strategy for air temperature sensors. Unlike the other sensor
/// types, its reading is a [`Temperature`] rather than a bare `i16`, so it
/// gets its own impl instead of going through `sensor_device!`.
#[derive(Debug, Clone, Copy)]
pub struct AirSensor;

impl DeviceStrategy for AirSensor {
    fn parse_parameters(&self, cursor: &mut HexCursor) -> Result<DeviceParameters> {
        let calibration_offset = cursor.read_i16()?;
        let alarm_enabled = cursor.read_u8()? != 0;
        let _reserved = cursor.read_u8()?; // pads the sub-record to a whole word
        Ok(DeviceParameters::AirSensor(AirSensorParameters {
            calibration_offset,
            alarm_enabled,
        }))
    }

    fn parse_variables(&self, cursor: &mut HexCursor) -> Result<DeviceVariables> {
        let reading = Temperature::from_raw(cursor.read_i16()?);
        let alarm_active = cursor.read_u8()? != 0;
        let _reserved = cursor.read_u8()?;
        Ok(DeviceVariables::AirSensor(AirSensorVariables {
            reading,
            alarm_active,
        }))
    }
}

// --- Actuators -----------------------------------------------------------

actuator_device!(
    Inlet,
    InletParameters,
    InletVariables,
    Inlet,
    Inlet
);
actuator_device!(
    Curtain,
    CurtainParameters,
    CurtainVariables,
    Curtain,
    Curtain
);
actuator_device!(
    RidgeVent,
    RidgeVentParameters,
    RidgeVentVariables,
    RidgeVent,
    RidgeVent
);
actuator_device!(
    Chimney,
    ChimneyParameters,
    ChimneyVariables,
    Chimney,
    Chimney
);
actuator_device!(
    Switch,
    SwitchParameters,
    SwitchVariables,
    Switch,
    Switch
);

// --- Staged equipment ------------------------------------------------------

staged_device!(
    Heater,
    HeaterParameters,
    HeaterVariables,
    Heater,
    Heater
);
staged_device!(
    CoolPad,
    CoolPadParameters,
    CoolPadVariables,
    CoolPad,
    CoolPad
);
staged_device!(Fan, FanParameters, FanVariables, Fan, Fan);
staged_device!(
    Timed,
    TimedParameters,
    TimedVariables,
    Timed,
    Timed
);
staged_device!(
    VariableHeater,
    VariableHeaterParameters,
    VariableHeaterVariables,
    VariableHeater,
    VariableHeater
);
staged_device!(
    VfdFan,
    VfdFanParameters,
    VfdFanVariables,
    VfdFan,
    VfdFan
);

/// Configuration for a [`V10Lights`] controller.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct V10LightsParameters {
    /// Minimum dimmable intensity, percent.
    pub min_intensity_pct: u8,
    /// Maximum dimmable intensity, percent.
    pub max_intensity_pct: u8,
}

/// Runtime state for a [`V10Lights`] controller.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct V10LightsVariables {
    /// Current output intensity, percent.
    pub intensity_pct: u8,
    /// Whether the controller is currently driving any output.
    pub active: bool,
}

/// Decoding strategy for 0-10V dimmable lighting controllers.
#[derive(Debug, Clone, Copy)]
pub struct V10Lights;

impl DeviceStrategy for V10Lights {
    fn parse_parameters(&self, cursor: &mut HexCursor) -> Result<DeviceParameters> {
        let min_intensity_pct = cursor.read_u8()?;
        let max_intensity_pct = cursor.read_u8()?;
        Ok(DeviceParameters::V10Lights(V10LightsParameters {
            min_intensity_pct,
            max_intensity_pct,
        }))
    }

    fn parse_variables(&self, cursor: &mut HexCursor) -> Result<DeviceVariables> {
        let intensity_pct = cursor.read_u8()?;
        let active = cursor.read_u8()? != 0;
        Ok(DeviceVariables::V10Lights(V10LightsVariables {
            intensity_pct,
            active,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::endian::Swap;

    #[test]
    fn decodes_air_sensor_parameters_and_variables() {
        let mut cursor = HexCursor::new("000A0100", &Swap);
        let parms = AirSensor.parse_parameters(&mut cursor).unwrap();
        match parms {
            DeviceParameters::AirSensor(p) => {
                assert_eq!(p.calibration_offset, 10);
                assert!(p.alarm_enabled);
            }
            _ => panic!("wrong variant"),
        }

        let mut cursor = HexCursor::new("7FFF0100", &Swap);
        let vars = AirSensor.parse_variables(&mut cursor).unwrap();
        match vars {
            DeviceVariables::AirSensor(v) => {
                assert!(v.reading.is_absent());
                assert!(v.alarm_active);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn decodes_actuator_style_device() {
        let mut cursor = HexCursor::new("0A64", &Swap);
        let parms = Curtain.parse_parameters(&mut cursor).unwrap();
        match parms {
            DeviceParameters::Curtain(p) => {
                assert_eq!(p.min_pct, 10);
                assert_eq!(p.max_pct, 100);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn decodes_staged_equipment_device() {
        let mut cursor = HexCursor::new("02000014", &Swap);
        let parms = Heater.parse_parameters(&mut cursor).unwrap();
        match parms {
            DeviceParameters::Heater(p) => {
                assert_eq!(p.stage_count, 2);
                assert_eq!(p.min_on_seconds, 20);
            }
            _ => panic!("wrong variant"),
        }
    }
}
