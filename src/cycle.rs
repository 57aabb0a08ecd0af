//! Per-channel pressure cycle accumulator and hysteresis detector
//!
//! A cycle is one rise above the top trigger followed by a fall below the
//! bottom trigger. Every value fed to the detector is accumulated, so the
//! statistics of a completed cycle cover the whole up and down traversal.

/// Hysteresis thresholds shared by every channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Triggers {
    /// A rising value must exceed this to arm the falling edge
    pub top: i32,
    /// A falling value must drop below this to complete the cycle
    pub bottom: i32,
}

impl Triggers {
    /// Place the triggers two thirds of the way from `center` toward each
    /// extreme. The deadband around `center` keeps midpoint jitter from
    /// registering as an edge.
    pub const fn from_bounds(top: i32, center: i32, bottom: i32) -> Self {
        Self {
            top: center + (top - center) * 2 / 3,
            bottom: center - (center - bottom) * 2 / 3,
        }
    }
}

/// Which edge the detector is looking for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CurveState {
    #[default]
    WaitingForRise,
    WaitingForFall,
}

/// Running statistics and edge state for one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCycle {
    sum: i64,
    count: u32,
    min: i32,
    max: i32,
    triggers: Triggers,
    state: CurveState,
    /// Set when a cycle completes; the next tracked value starts a new cycle
    cycle_complete: bool,
}

impl Default for SampleCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleCycle {
    /// Initial minimum, above any reading
    pub const MIN_SENTINEL: i32 = i16::MAX as i32;
    /// Initial maximum, below any reading
    pub const MAX_SENTINEL: i32 = i16::MIN as i32;

    pub const fn new() -> Self {
        Self {
            sum: 0,
            count: 0,
            min: Self::MIN_SENTINEL,
            max: Self::MAX_SENTINEL,
            triggers: Triggers { top: 0, bottom: 0 },
            state: CurveState::WaitingForRise,
            cycle_complete: false,
        }
    }

    /// Replace the hysteresis thresholds without touching the statistics
    pub fn set_triggers(&mut self, triggers: Triggers) {
        self.triggers = triggers;
    }

    /// Reset statistics and edge state. Triggers are kept.
    pub fn clear(&mut self) {
        self.sum = 0;
        self.count = 0;
        self.min = Self::MIN_SENTINEL;
        self.max = Self::MAX_SENTINEL;
        self.state = CurveState::WaitingForRise;
        self.cycle_complete = false;
    }

    /// Accumulate a value without running the edge detector.
    pub fn include(&mut self, value: i32) {
        self.sum += i64::from(value);
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Feed one filtered value through the detector.
    ///
    /// Returns `true` on the tick a cycle completes. The statistics then
    /// describe that cycle until the next call, which clears them before
    /// including its own value.
    pub fn track(&mut self, value: i32) -> bool {
        if self.cycle_complete {
            self.clear();
        }

        self.include(value);

        match self.state {
            CurveState::WaitingForRise => {
                if value > self.triggers.top {
                    self.state = CurveState::WaitingForFall;
                }
                false
            }
            CurveState::WaitingForFall => {
                if value < self.triggers.bottom {
                    self.cycle_complete = true;
                    self.count > 0
                } else {
                    false
                }
            }
        }
    }

    /// Thresholds the detector compares against
    pub const fn triggers(&self) -> Triggers {
        self.triggers
    }

    /// Edge the detector is waiting for
    pub const fn state(&self) -> CurveState {
        self.state
    }

    /// True from the tick a cycle completes until the next tracked value
    pub const fn is_cycle_complete(&self) -> bool {
        self.cycle_complete
    }

    /// Sum of the included values
    pub const fn sum(&self) -> i64 {
        self.sum
    }

    /// Number of values included since the last clear
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Smallest included value, [`Self::MIN_SENTINEL`] when empty
    pub const fn min(&self) -> i32 {
        self.min
    }

    /// Largest included value, [`Self::MAX_SENTINEL`] when empty
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Mean of the included values, 0 when nothing was included
    pub fn average(&self) -> i32 {
        if self.count > 0 {
            (self.sum / i64::from(self.count)) as i32
        } else {
            0
        }
    }
}
