//! Tracker configuration and fixed hardware constants

use serde::{Deserialize, Serialize};

use crate::error::TrackerError;

/// Capacity of every per-channel container in the tracker
pub const MAX_CHANNELS: usize = 8;

/// Number of pressure inputs on the TBS shield
pub const DEFAULT_CHANNEL_COUNT: usize = 4;

/// Smoothing divisor for the first order low-pass filter.
///
/// The cut-off frequency is `fc = fs * K / (2 * PI * (1 - K))` with `K = 1 / LOW_PASS_FILTER_DIV`.
pub const LOW_PASS_FILTER_DIV: i32 = 10;

/// Largest reading a 10-bit ADC produces
pub const ADC_MAX: i32 = 1023;

/// kPa x 1000 per ADC unit (0.05425347 kPa per unit)
pub const KPA1000_PER_ADC_UNIT: i32 = 54;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Number of channels read on every tick
    pub channel_count: usize,
    /// Divisor applied to small input deltas by the noise filter
    pub smoothing_divisor: i32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            channel_count: DEFAULT_CHANNEL_COUNT,
            smoothing_divisor: LOW_PASS_FILTER_DIV,
        }
    }
}

impl TrackerConfig {
    /// Config for `channel_count` channels with the default filter
    pub const fn with_channels(channel_count: usize) -> Self {
        Self {
            channel_count,
            smoothing_divisor: LOW_PASS_FILTER_DIV,
        }
    }

    /// Check the channel count fits the per-channel containers and the
    /// smoothing divisor is positive.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.channel_count == 0 || self.channel_count > MAX_CHANNELS {
            return Err(TrackerError::InvalidChannelCount {
                count: self.channel_count,
                max: MAX_CHANNELS,
            });
        }
        if self.smoothing_divisor <= 0 {
            return Err(TrackerError::InvalidSmoothingDivisor(self.smoothing_divisor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_shield() {
        let config = TrackerConfig::default();
        assert_eq!(config.channel_count, 4);
        assert_eq!(config.smoothing_divisor, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_channel_count_bounds() {
        assert!(matches!(
            TrackerConfig::with_channels(0).validate(),
            Err(TrackerError::InvalidChannelCount { count: 0, max: MAX_CHANNELS })
        ));
        assert!(matches!(
            TrackerConfig::with_channels(MAX_CHANNELS + 1).validate(),
            Err(TrackerError::InvalidChannelCount { .. })
        ));
        assert!(TrackerConfig::with_channels(1).validate().is_ok());
        assert!(TrackerConfig::with_channels(MAX_CHANNELS).validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_divisor() {
        let config = TrackerConfig {
            smoothing_divisor: 0,
            ..TrackerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TrackerError::InvalidSmoothingDivisor(0))
        ));
    }

    #[test]
    fn test_config_postcard_encoding() {
        let config = TrackerConfig::with_channels(2);
        let bytes = postcard::to_allocvec(&config).unwrap();
        let decoded: TrackerConfig = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, config);
    }
}
