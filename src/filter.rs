//! Fast low amplitude noise filter
//!
//! A discrete first order low-pass filter that only smooths small deltas.
//! Any change at least as large as the calibrated noise amplitude is passed
//! through untouched so fast pressure trends are not damped.

use crate::config::LOW_PASS_FILTER_DIV;
use crate::error::TrackerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseFilter {
    /// Deltas strictly below this are treated as noise. Zero until calibrated.
    noise_max_amplitude: i32,
    divisor: i32,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self {
            noise_max_amplitude: 0,
            divisor: LOW_PASS_FILTER_DIV,
        }
    }
}

impl NoiseFilter {
    /// Uncalibrated filter smoothing small deltas by `divisor`.
    ///
    /// Fails with [`TrackerError::InvalidSmoothingDivisor`] unless `divisor`
    /// is positive.
    pub const fn new(divisor: i32) -> Result<Self, TrackerError> {
        if divisor <= 0 {
            return Err(TrackerError::InvalidSmoothingDivisor(divisor));
        }
        Ok(Self {
            noise_max_amplitude: 0,
            divisor,
        })
    }

    pub const fn divisor(&self) -> i32 {
        self.divisor
    }

    /// Current noise threshold, 0 before zero calibration
    pub const fn noise_max_amplitude(&self) -> i32 {
        self.noise_max_amplitude
    }

    pub fn set_noise_max_amplitude(&mut self, amplitude: i32) {
        self.noise_max_amplitude = amplitude;
    }

    /// Filter one raw reading against the previous filtered output.
    ///
    /// Integer division truncates toward zero, so the output can settle up to
    /// `divisor - 1` units short of a constant input.
    pub fn apply(&self, raw: i32, prior: i32) -> i32 {
        let diff = raw - prior;
        if diff.abs() < self.noise_max_amplitude {
            prior + diff / self.divisor
        } else {
            raw
        }
    }
}
