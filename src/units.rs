//! ADC to pressure conversion

use crate::config::{ADC_MAX, KPA1000_PER_ADC_UNIT};

/// Convert an ADC delta to hundredths of a kPa.
///
/// The delta is expected as `zero_reference - measured`, so readings above
/// the ambient reference (negative deltas) clamp to 0. Deltas past the ADC
/// range clamp to [`ADC_MAX`].
pub fn convert_to_kpa100(adc_delta: i32) -> i32 {
    let adc_delta = adc_delta.clamp(0, ADC_MAX);
    adc_delta * KPA1000_PER_ADC_UNIT / 10
}

/// Pressure below `zero_reference` for a raw reading, in hundredths of a kPa
pub fn kpa100_below_reference(zero_reference: i32, measured: i32) -> i32 {
    convert_to_kpa100(zero_reference - measured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vacuum_is_positive() {
        assert_eq!(kpa100_below_reference(500, 300), 1080);
        assert_eq!(convert_to_kpa100(1), 5);
    }

    #[test]
    fn test_above_reference_clamps_to_zero() {
        assert_eq!(kpa100_below_reference(500, 600), 0);
        assert_eq!(kpa100_below_reference(500, 500), 0);
    }

    #[test]
    fn test_clamps_to_adc_range() {
        assert_eq!(convert_to_kpa100(5000), 1023 * 54 / 10);
        assert_eq!(convert_to_kpa100(1023), 5524);
    }
}
