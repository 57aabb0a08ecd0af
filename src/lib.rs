//! Hardware-independent core library for tbs-rpm
//!
//! This crate contains the per-channel signal pipeline for the TBS pressure
//! sensor shield: raw sample acquisition, low amplitude noise filtering,
//! hysteresis based cycle detection and calibration. Engine speed and
//! per-cycle pressure are derived from the cycles it reports.
//!
//! It is `#![no_std]` so it links into firmware directly. Reading the ADC,
//! driving the timing loop and showing results are left to the caller.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut tracker = PressureCycleTracker::new(adc, TrackerConfig::default())?;
//! tracker.setup();
//!
//! // Zero calibration at ambient pressure
//! tracker.clear_samples();
//! for _ in 0..ZERO_WINDOW_TICKS {
//!     tracker.read_samples();
//! }
//! tracker.calibrate_at_zero_with_samples();
//!
//! // Cycle calibration with the engine running
//! tracker.clear_samples();
//! for _ in 0..CYCLE_WINDOW_TICKS {
//!     tracker.read_samples();
//! }
//! tracker.calibrate_cycles_with_samples();
//! tracker.clear_samples();
//!
//! loop {
//!     if tracker.read_samples_cycle() > 0 {
//!         for channel in tracker.ready_channels() {
//!             let kpa100 = tracker.sample_average_kpa100(channel)?;
//!         }
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod acquisition;
pub mod calibration;
pub mod config;
pub mod cycle;
pub mod error;
pub mod filter;
pub mod source;
pub mod tracker;
pub mod units;

pub use acquisition::Sample;
pub use calibration::{CycleBounds, ZeroCalibration};
pub use config::{DEFAULT_CHANNEL_COUNT, MAX_CHANNELS, TrackerConfig};
pub use cycle::{CurveState, SampleCycle, Triggers};
pub use error::TrackerError;
pub use filter::NoiseFilter;
pub use source::RawSource;
pub use tracker::{CycleSummary, PressureCycleTracker};
