//! Zero-pressure and cycle calibration from a captured window
//!
//! Both calibrations read the per-channel statistics accumulated between
//! `clear_samples` and the calibrate call. They do not check that such a
//! window exists; sequencing the capture is the caller's job.

use heapless::Vec;
use log::warn;

use crate::config::MAX_CHANNELS;
use crate::cycle::{SampleCycle, Triggers};

/// Ambient pressure reference and noise threshold
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ZeroCalibration {
    /// Window average per channel at no load
    pub references: Vec<i32, MAX_CHANNELS>,
    /// Half the widest min..max spread seen on any channel
    pub noise_max_amplitude: i32,
}

impl ZeroCalibration {
    pub fn from_window(channels: &[SampleCycle]) -> Self {
        warn_on_empty(channels, "zero");

        let mut references = Vec::new();
        let mut noise_range = 0;
        for cycle in channels.iter().take(MAX_CHANNELS) {
            let _ = references.push(cycle.average());
            noise_range = noise_range.max(cycle.max() - cycle.min());
        }

        Self {
            references,
            noise_max_amplitude: noise_range / 2,
        }
    }

    /// Reference for `channel`, 0 if it was never calibrated
    pub fn reference(&self, channel: usize) -> i32 {
        self.references.get(channel).copied().unwrap_or(0)
    }
}

/// Global ceiling, center and floor of the operating pressure swing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleBounds {
    /// Lowest per-channel maximum
    pub max: i32,
    /// Mean of the per-channel averages
    pub center: i32,
    /// Highest per-channel minimum
    pub min: i32,
}

impl CycleBounds {
    /// Bounds every channel is guaranteed to reach.
    ///
    /// The weakest channel limits both the ceiling and the floor so that the
    /// resulting triggers can be crossed on all channels.
    pub fn from_window(channels: &[SampleCycle]) -> Self {
        warn_on_empty(channels, "cycle");

        let mut max = SampleCycle::MIN_SENTINEL;
        let mut min = SampleCycle::MAX_SENTINEL;
        let mut sum: i64 = 0;
        for cycle in channels {
            sum += i64::from(cycle.average());
            max = max.min(cycle.max());
            min = min.max(cycle.min());
        }

        let center = if channels.is_empty() {
            0
        } else {
            (sum / channels.len() as i64) as i32
        };

        Self { max, center, min }
    }

    pub const fn triggers(&self) -> Triggers {
        Triggers::from_bounds(self.max, self.center, self.min)
    }
}

fn warn_on_empty(channels: &[SampleCycle], kind: &str) {
    for (channel, cycle) in channels.iter().enumerate() {
        if cycle.count() == 0 {
            warn!(
                "Calibrating {} on channel {} with no captured samples",
                kind, channel
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(values: &[&[i32]]) -> std::vec::Vec<SampleCycle> {
        values
            .iter()
            .map(|channel| {
                let mut cycle = SampleCycle::new();
                for &value in channel.iter() {
                    cycle.include(value);
                }
                cycle
            })
            .collect()
    }

    #[test]
    fn test_zero_calibration() {
        let channels = window(&[
            &[500, 502, 498, 500],
            &[610, 606, 614, 610],
            &[300, 301, 299, 300],
        ]);

        let zero = ZeroCalibration::from_window(&channels);

        assert_eq!(zero.references.as_slice(), &[500, 610, 300]);
        // Channel 1 spreads 606..614
        assert_eq!(zero.noise_max_amplitude, 4);
        assert_eq!(zero.reference(1), 610);
        assert_eq!(zero.reference(7), 0);
    }

    #[test]
    fn test_cycle_bounds_use_weakest_channel() {
        let channels = window(&[
            &[100, 900, 500],
            &[150, 850, 500],
            &[80, 950, 600],
            &[120, 880, 400],
        ]);

        let bounds = CycleBounds::from_window(&channels);

        assert_eq!(bounds.max, 850);
        assert_eq!(bounds.min, 150);
        // Averages 500, 500, 543, 466
        assert_eq!(bounds.center, 502);
        assert_eq!(bounds.triggers(), Triggers::from_bounds(850, 502, 150));
    }

    #[test]
    fn test_empty_window_degrades_to_sentinels() {
        let channels = [SampleCycle::new(), SampleCycle::new()];

        let zero = ZeroCalibration::from_window(&channels);
        assert_eq!(zero.references.as_slice(), &[0, 0]);
        // Sentinel spread is negative, so the threshold stays at zero
        assert_eq!(zero.noise_max_amplitude, 0);

        let bounds = CycleBounds::from_window(&channels);
        assert_eq!(bounds.center, 0);
        assert_eq!(bounds.max, SampleCycle::MAX_SENTINEL);
        assert_eq!(bounds.min, SampleCycle::MIN_SENTINEL);
    }
}
