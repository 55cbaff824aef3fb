//! Process-wide lookup from [`DeviceType`] to its decoding strategy,
//! resolved once and dispatched through a trait object — the same shape
//! as this crate's endian strategy, and grounded on the teacher's
//! `impl dyn AlcCodec { fn instance(...) }` static-registry pattern.

use std::collections::HashMap;

use crate::record::device::types::*;
use crate::record::device::{DeviceParameters, DeviceType, DeviceVariables};
use crate::tools::error::Result;
use crate::wire::cursor::HexCursor;

/// Decodes the type-specific tail of a device record for one [`DeviceType`].
pub trait DeviceStrategy: Send + Sync {
    /// Decode this device's parameters tail from `cursor`.
    fn parse_parameters(&self, cursor: &mut HexCursor) -> Result<DeviceParameters>;
    /// Decode this device's variables tail from `cursor`.
    fn parse_variables(&self, cursor: &mut HexCursor) -> Result<DeviceVariables>;
}

/// Lookup table from [`DeviceType`] to its [`DeviceStrategy`]. Built once
/// via [`DeviceRegistry::standard`]; registration is not meant to happen
/// concurrently with lookups.
pub struct DeviceRegistry {
    strategies: HashMap<DeviceType, &'static dyn DeviceStrategy>,
}

impl DeviceRegistry {
    /// An empty registry with no strategies registered.
    pub fn empty() -> Self {
        DeviceRegistry {
            strategies: HashMap::new(),
        }
    }

    /// The registry carrying every device type this crate knows how to
    /// decode.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(DeviceType::AirSensor, &AirSensor);
        registry.register(DeviceType::HumiditySensor, &HumiditySensor);
        registry.register(DeviceType::Inlet, &Inlet);
        registry.register(DeviceType::Curtain, &Curtain);
        registry.register(DeviceType::RidgeVent, &RidgeVent);
        registry.register(DeviceType::Heater, &Heater);
        registry.register(DeviceType::CoolPad, &CoolPad);
        registry.register(DeviceType::Fan, &Fan);
        registry.register(DeviceType::Timed, &Timed);
        registry.register(DeviceType::FeedSensor, &FeedSensor);
        registry.register(DeviceType::WaterSensor, &WaterSensor);
        registry.register(DeviceType::StaticSensor, &StaticSensor);
        registry.register(DeviceType::DigitalSensor, &DigitalSensor);
        registry.register(DeviceType::PositionSensor, &PositionSensor);
        registry.register(DeviceType::Chimney, &Chimney);
        registry.register(DeviceType::Switch, &Switch);
        registry.register(DeviceType::VariableHeater, &VariableHeater);
        registry.register(DeviceType::VfdFan, &VfdFan);
        registry.register(DeviceType::V10Lights, &V10Lights);
        registry.register(DeviceType::GasSensor, &GasSensor);
        registry
    }

    /// Register a strategy for `device_type`, replacing any existing entry.
    pub fn register(&mut self, device_type: DeviceType, strategy: &'static dyn DeviceStrategy) {
        self.strategies.insert(device_type, strategy);
    }

    /// Look up the strategy for `device_type`, if any is registered.
    pub fn get(&self, device_type: DeviceType) -> Option<&'static dyn DeviceStrategy> {
        self.strategies.get(&device_type).copied()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("registered", &self.strategies.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_every_known_device_type() {
        let registry = DeviceRegistry::standard();
        for code in 0x01u8..=0x14 {
            let ty = DeviceType::from_code(code);
            assert!(registry.get(ty).is_some(), "missing strategy for {ty:?}");
        }
    }

    #[test]
    fn unknown_device_type_has_no_strategy() {
        let registry = DeviceRegistry::standard();
        assert!(registry.get(DeviceType::Unknown(0xFE)).is_none());
    }
}
