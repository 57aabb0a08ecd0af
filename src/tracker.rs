//! Pressure cycle tracker
//!
//! Ties acquisition, filtering, cycle detection and calibration together for
//! a fixed set of channels. The caller drives it once per sampling tick.
//!
//! ## Calibration protocol
//!
//! Calibration consumes whatever the last capture window accumulated:
//!
//! 1. `clear_samples()` to start a window
//! 2. `read_samples()` for as many ticks as the window should span
//! 3. `calibrate_at_zero_with_samples()` (engine off) or
//!    `calibrate_cycles_with_samples()` (engine running)
//!
//! New cycle triggers only take effect on the next `clear_samples()`. None
//! of this ordering is checked here.

use heapless::Vec;
use log::{debug, info, trace};

use crate::acquisition::Sample;
use crate::calibration::{CycleBounds, ZeroCalibration};
use crate::config::{MAX_CHANNELS, TrackerConfig};
use crate::cycle::SampleCycle;
use crate::error::TrackerError;
use crate::filter::NoiseFilter;
use crate::source::RawSource;
use crate::units::kpa100_below_reference;

/// Statistics of the last cycle on one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub channel: usize,
    /// Number of ticks in the cycle
    pub width: u32,
    pub min: i32,
    pub max: i32,
    pub average: i32,
    /// Pressure below ambient at the minimum reading, in hundredths of a kPa
    pub min_kpa100: i32,
    /// Pressure below ambient at the maximum reading, in hundredths of a kPa
    pub max_kpa100: i32,
    /// Pressure below ambient at the average reading, in hundredths of a kPa
    pub average_kpa100: i32,
}

impl CycleSummary {
    /// Revolutions per minute for one cycle per revolution, given the
    /// sampling period in microseconds.
    pub fn rpm(&self, tick_micros: u32) -> u32 {
        let cycle_micros = u64::from(self.width) * u64::from(tick_micros);
        if cycle_micros == 0 {
            return 0;
        }
        (60_000_000 / cycle_micros) as u32
    }
}

pub struct PressureCycleTracker<S: RawSource> {
    source: S,
    config: TrackerConfig,
    channels: Vec<SampleCycle, MAX_CHANNELS>,
    /// Filter output from the previous tick
    prev_filtered: Sample,
    filtering_initialized: bool,
    filter: NoiseFilter,
    zero: ZeroCalibration,
    bounds: CycleBounds,
}

impl<S: RawSource> PressureCycleTracker<S> {
    /// Create an uncalibrated tracker reading `config.channel_count` channels.
    pub fn new(source: S, config: TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        let filter = NoiseFilter::new(config.smoothing_divisor)?;

        let mut channels = Vec::new();
        for _ in 0..config.channel_count {
            // validate() keeps the count within capacity
            let _ = channels.push(SampleCycle::new());
        }

        Ok(Self {
            source,
            config,
            channels,
            prev_filtered: Sample::default(),
            filtering_initialized: false,
            filter,
            zero: ZeroCalibration::default(),
            bounds: CycleBounds::default(),
        })
    }

    /// Prime every ADC channel once, then start an empty capture window.
    pub fn setup(&mut self) {
        for channel in 0..self.channel_count() {
            let _ = self.source.read_channel(channel);
        }
        self.clear_samples();
        info!("Pressure tracker ready on {} channels", self.channel_count());
    }

    /// One tick accumulating statistics only, for calibration windows
    pub fn read_samples(&mut self) {
        self.read_all_samples(true);
    }

    /// One tick through the cycle detector.
    ///
    /// Returns the number of channels that completed a cycle on this tick.
    pub fn read_samples_cycle(&mut self) -> usize {
        self.read_all_samples(false)
    }

    fn read_all_samples(&mut self, ignoring_cycles: bool) -> usize {
        let sample = Sample::acquire(&mut self.source, self.config.channel_count);

        if !self.filtering_initialized {
            self.init_filtering_on_first_sample(&sample);
        }

        let mut filtered: Vec<i32, MAX_CHANNELS> = Vec::new();
        let mut channels_ready = 0;
        for (channel, cycle) in self.channels.iter_mut().enumerate() {
            let value = self.filter.apply(sample[channel], self.prev_filtered[channel]);
            let _ = filtered.push(value);

            if ignoring_cycles {
                cycle.include(value);
            } else if cycle.track(value) {
                debug!(
                    "Channel {}: cycle of {} samples, avg {}",
                    channel,
                    cycle.count(),
                    cycle.average()
                );
                channels_ready += 1;
            }
        }

        self.prev_filtered = Sample::from_values(&filtered);
        trace!("Tick complete, {} channels ready", channels_ready);
        channels_ready
    }

    fn init_filtering_on_first_sample(&mut self, sample: &Sample) {
        self.prev_filtered = sample.clone();
        self.filtering_initialized = true;
    }

    /// Reset every channel's statistics and apply the current cycle triggers.
    ///
    /// Starts a new capture window; the filter reseeds from the next sample.
    pub fn clear_samples(&mut self) {
        self.filtering_initialized = false;
        let triggers = self.bounds.triggers();
        for cycle in self.channels.iter_mut() {
            cycle.clear();
            cycle.set_triggers(triggers);
        }
    }

    /// Take the capture window as ambient pressure.
    ///
    /// Stores each channel's average as its zero reference and sets the noise
    /// threshold from the noisiest channel.
    pub fn calibrate_at_zero_with_samples(&mut self) {
        self.zero = ZeroCalibration::from_window(&self.channels);
        self.filter.set_noise_max_amplitude(self.zero.noise_max_amplitude);
        info!(
            "Zero calibration: references {:?}, noise amplitude {}",
            self.zero.references.as_slice(),
            self.zero.noise_max_amplitude
        );
    }

    /// Take the capture window as the operating pressure swing.
    ///
    /// The triggers derived from it are applied by the next `clear_samples`.
    pub fn calibrate_cycles_with_samples(&mut self) {
        self.bounds = CycleBounds::from_window(&self.channels);
        let triggers = self.bounds.triggers();
        info!(
            "Cycle calibration: max {}, center {}, min {} (triggers {}/{})",
            self.bounds.max, self.bounds.center, self.bounds.min, triggers.top, triggers.bottom
        );
    }

    /// Number of channels read on every tick
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Configuration the tracker was built with
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Noise threshold from the last zero calibration
    pub fn noise_max_amplitude(&self) -> i32 {
        self.filter.noise_max_amplitude()
    }

    /// Bounds from the last cycle calibration, all 0 before it
    pub fn cycle_bounds(&self) -> CycleBounds {
        self.bounds
    }

    /// Filter output of the last tick
    pub fn last_filtered(&self) -> &Sample {
        &self.prev_filtered
    }

    /// Accumulator and detector state for `channel`
    pub fn channel(&self, channel: usize) -> Result<&SampleCycle, TrackerError> {
        self.channels
            .get(channel)
            .ok_or(TrackerError::ChannelOutOfRange {
                channel,
                count: self.channels.len(),
            })
    }

    /// Ambient reading for `channel`, 0 before zero calibration
    pub fn zero_reference(&self, channel: usize) -> Result<i32, TrackerError> {
        self.channel(channel)?;
        Ok(self.zero.reference(channel))
    }

    /// Channels whose cycle completed on the last tick
    pub fn ready_channels(&self) -> impl Iterator<Item = usize> + '_ {
        self.channels
            .iter()
            .enumerate()
            .filter(|(_, cycle)| cycle.is_cycle_complete())
            .map(|(channel, _)| channel)
    }

    pub fn sample_for_cycle_ready(&self, channel: usize) -> Result<bool, TrackerError> {
        Ok(self.channel(channel)?.is_cycle_complete())
    }

    /// Number of samples in the current cycle
    pub fn sample_width(&self, channel: usize) -> Result<u32, TrackerError> {
        Ok(self.channel(channel)?.count())
    }

    pub fn sample_min(&self, channel: usize) -> Result<i32, TrackerError> {
        Ok(self.channel(channel)?.min())
    }

    pub fn sample_max(&self, channel: usize) -> Result<i32, TrackerError> {
        Ok(self.channel(channel)?.max())
    }

    /// Average raw reading, 0 for an empty cycle
    pub fn sample_average(&self, channel: usize) -> Result<i32, TrackerError> {
        Ok(self.channel(channel)?.average())
    }

    pub fn sample_min_kpa100(&self, channel: usize) -> Result<i32, TrackerError> {
        Ok(kpa100_below_reference(
            self.zero_reference(channel)?,
            self.sample_min(channel)?,
        ))
    }

    pub fn sample_max_kpa100(&self, channel: usize) -> Result<i32, TrackerError> {
        Ok(kpa100_below_reference(
            self.zero_reference(channel)?,
            self.sample_max(channel)?,
        ))
    }

    pub fn sample_average_kpa100(&self, channel: usize) -> Result<i32, TrackerError> {
        Ok(kpa100_below_reference(
            self.zero_reference(channel)?,
            self.sample_average(channel)?,
        ))
    }

    pub fn cycle_summary(&self, channel: usize) -> Result<CycleSummary, TrackerError> {
        let cycle = self.channel(channel)?;
        let zero = self.zero.reference(channel);
        Ok(CycleSummary {
            channel,
            width: cycle.count(),
            min: cycle.min(),
            max: cycle.max(),
            average: cycle.average(),
            min_kpa100: kpa100_below_reference(zero, cycle.min()),
            max_kpa100: kpa100_below_reference(zero, cycle.max()),
            average_kpa100: kpa100_below_reference(zero, cycle.average()),
        })
    }

    /// The raw sample source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the raw sample source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Consume the tracker and hand back its source
    pub fn into_source(self) -> S {
        self.source
    }
}
