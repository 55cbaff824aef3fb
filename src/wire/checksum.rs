//! Additive checksum over the checksummed region of a frame: the command
//! byte, any length indicator, and the payload. Framing sentinels (STX/ETX)
//! are never part of the checksummed region.

/// 8-bit sum of all bytes, mod 256.
pub fn compute(region: &[u8]) -> u8 {
    region.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Recompute the checksum over `region` and compare it against `expected`.
pub fn verify(region: &[u8], expected: u8) -> bool {
    compute(region) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_serial_number_frame_from_spec() {
        // PCMI_SERIAL_NUMBER (0x85), RLI "08", ASCII "99999999"
        let region = [
            0x85, 0x30, 0x38, 0x39, 0x39, 0x39, 0x39, 0x39, 0x39, 0x39, 0x39,
        ];
        assert_eq!(compute(&region), 0xB5);
        assert!(verify(&region, 0xB5));
        assert!(!verify(&region, 0xB4));
    }

    #[test]
    fn wraps_on_overflow() {
        assert_eq!(compute(&[0xFF, 0xFF, 0x02]), 0x00);
    }

    #[test]
    fn empty_region_is_zero() {
        assert_eq!(compute(&[]), 0);
    }
}
