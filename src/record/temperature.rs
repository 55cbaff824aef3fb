//! Temperature readings: a signed 16-bit raw value in tenths of a degree
//! Fahrenheit, with the sentinel `0x7FFF` meaning "sensor error / not a
//! number".

/// Raw sentinel meaning the sensor reading is absent or invalid.
pub const NAN_RAW: i16 = 0x7FFF;

/// A temperature reading. Preserves the raw sentinel rather than clamping
/// it to zero, so downstream code can tell "absent" apart from "0.0°F".
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Temperature {
    /// Raw tenths-of-a-degree-Fahrenheit value exactly as read off the
    /// wire, including the `0x7FFF` sentinel when present.
    pub raw: i16,
}

impl Temperature {
    /// Wrap a raw tenths-of-a-degree-Fahrenheit value.
    pub fn from_raw(raw: i16) -> Self {
        Temperature { raw }
    }

    /// Build a temperature from a Fahrenheit value. `value` is clamped
    /// just below 3276.7°F so a reading at the top of the representable
    /// range never rounds onto the `0x7FFF` "absent" sentinel and silently
    /// turns into a missing reading.
    pub fn from_fahrenheit(value: f64) -> Self {
        let raw = (value * 10.0).round();
        let raw = raw.min((NAN_RAW - 1) as f64);
        Temperature { raw: raw as i16 }
    }

    /// True when this reading is the "sensor error / not a number" sentinel.
    pub fn is_absent(&self) -> bool {
        self.raw == NAN_RAW
    }

    /// Degrees Fahrenheit, or `None` when the reading is the NaN sentinel.
    pub fn fahrenheit(&self) -> Option<f64> {
        if self.is_absent() {
            None
        } else {
            Some(self.raw as f64 / 10.0)
        }
    }

    /// Degrees Celsius, or `None` when the reading is the NaN sentinel.
    pub fn celsius(&self) -> Option<f64> {
        self.fahrenheit().map(|f| (f - 32.0) * 5.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_fahrenheit_within_tolerance() {
        for tenths in [-32767i16, -100, 0, 1, 725, 32766] {
            let f = tenths as f64 / 10.0;
            let t = Temperature::from_fahrenheit(f);
            assert!((t.fahrenheit().unwrap() - f).abs() < 0.05);
        }
    }

    #[test]
    fn upper_bound_of_representable_range_does_not_collide_with_the_sentinel() {
        let t = Temperature::from_fahrenheit(3276.7);
        assert!(!t.is_absent());
        assert!((t.fahrenheit().unwrap() - 3276.7).abs() < 0.15);
    }

    #[test]
    fn nan_sentinel_is_absent_not_zero() {
        let t = Temperature::from_raw(NAN_RAW);
        assert!(t.is_absent());
        assert_eq!(t.fahrenheit(), None);
        assert_eq!(t.celsius(), None);
    }

    #[test]
    fn converts_to_celsius() {
        let t = Temperature::from_raw(320); // 32.0 F
        assert!((t.celsius().unwrap() - 0.0).abs() < 0.05);
    }

    #[test]
    fn ordinary_zero_is_not_absent() {
        let t = Temperature::from_raw(0);
        assert!(!t.is_absent());
        assert_eq!(t.fahrenheit(), Some(0.0));
    }
}
