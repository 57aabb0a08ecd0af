//! Desktop simulator for the tbs-rpm pressure cycle tracker.
//!
//! Replaces the ADC with a synthetic four cylinder vacuum signal and runs the
//! same tick loop the firmware does: zero calibration with the engine off,
//! cycle calibration with it running, then cycle tracking. Results are
//! logged, so run with `RUST_LOG=info` (or `debug` for every cycle).

use std::time::{Duration, Instant};

use log::{error, info};

use tbs_rpm::{PressureCycleTracker, RawSource, TrackerConfig};

// ---------------------------------------------------------------------------
// Timing constants
// ---------------------------------------------------------------------------

/// Sampling period of the tick loop.
const TICK: Duration = Duration::from_millis(1);

/// Ticks captured for zero calibration.
const ZERO_WINDOW_TICKS: u32 = 500;

/// Ticks captured for cycle calibration.
const CYCLE_WINDOW_TICKS: u32 = 2000;

/// Simulated run time after calibration.
const RUN_DURATION: Duration = Duration::from_secs(20);

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Generates synthetic manifold vacuum readings for each cylinder.
///
/// Ambient pressure reads around 800 ADC units. While running, each
/// cylinder's intake stroke pulls the reading down once per revolution, with
/// the cylinders a quarter turn apart.
struct MockEngine {
    channel_count: usize,
    /// Simulated seconds since start
    elapsed_secs: f64,
    /// Crank phase in revolutions
    crank: f64,
    running: bool,
    rng: u32,
}

impl MockEngine {
    fn new(channel_count: usize) -> Self {
        Self {
            channel_count,
            elapsed_secs: 0.0,
            crank: 0.0,
            running: false,
            rng: 0x1234_5678,
        }
    }

    /// Idle at 900 rpm, slowly revving up to 1500 and back.
    fn rpm(&self) -> f64 {
        let sweep = self.elapsed_secs / RUN_DURATION.as_secs_f64();
        1200.0 - 300.0 * (sweep * std::f64::consts::TAU).cos()
    }

    fn noise(&mut self) -> f64 {
        self.rng = self.rng.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        f64::from((self.rng >> 24) % 5) - 2.0
    }

    fn advance(&mut self, dt_secs: f64) {
        self.elapsed_secs += dt_secs;
        if self.running {
            self.crank += self.rpm() / 60.0 * dt_secs;
        }
    }
}

impl RawSource for MockEngine {
    fn read_channel(&mut self, channel: usize) -> u16 {
        let phase = self.crank + channel as f64 / self.channel_count as f64;
        let vacuum = if self.running {
            250.0 * (1.0 - (phase * std::f64::consts::TAU).cos())
        } else {
            0.0
        };
        let value = 800.0 - vacuum + self.noise();
        value.clamp(0.0, 1023.0) as u16
    }
}

fn tick(tracker: &mut PressureCycleTracker<MockEngine>) -> usize {
    let ready = tracker.read_samples_cycle();
    tracker.source_mut().advance(TICK.as_secs_f64());
    ready
}

fn capture(tracker: &mut PressureCycleTracker<MockEngine>, ticks: u32) {
    tracker.clear_samples();
    for _ in 0..ticks {
        tracker.read_samples();
        tracker.source_mut().advance(TICK.as_secs_f64());
    }
}

fn main() {
    env_logger::init();
    info!("Starting tbs-rpm simulator");

    let config = TrackerConfig::default();
    let engine = MockEngine::new(config.channel_count);
    let mut tracker = match PressureCycleTracker::new(engine, config) {
        Ok(tracker) => tracker,
        Err(e) => {
            error!("Invalid tracker config: {}", e);
            return;
        }
    };
    tracker.setup();

    info!("Capturing ambient pressure");
    capture(&mut tracker, ZERO_WINDOW_TICKS);
    tracker.calibrate_at_zero_with_samples();

    info!("Starting engine, capturing operating range");
    tracker.source_mut().running = true;
    capture(&mut tracker, CYCLE_WINDOW_TICKS);
    tracker.calibrate_cycles_with_samples();
    tracker.clear_samples();

    let tick_micros = TICK.as_micros() as u32;
    let total_ticks = (RUN_DURATION.as_micros() / TICK.as_micros()) as u32;
    let started = Instant::now();
    let mut cycles = 0usize;

    for _ in 0..total_ticks {
        if tick(&mut tracker) == 0 {
            continue;
        }
        for channel in tracker.ready_channels() {
            let Ok(summary) = tracker.cycle_summary(channel) else {
                continue;
            };
            cycles += 1;
            info!(
                "Cylinder {}: {} rpm (engine {:.0}), vacuum avg {}.{:02} kPa, peak {}.{:02} kPa",
                channel + 1,
                summary.rpm(tick_micros),
                tracker.source().rpm(),
                summary.average_kpa100 / 100,
                summary.average_kpa100 % 100,
                summary.min_kpa100 / 100,
                summary.min_kpa100 % 100,
            );
        }
    }

    info!(
        "Simulator exiting: {} cycles over {} ticks in {:?}",
        cycles,
        total_ticks,
        started.elapsed()
    );
}
