//! Error types for the pressure cycle tracker

use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerError {
    /// Channel count is zero or larger than the per-channel containers hold
    #[error("Invalid channel count {count} (max: {max})")]
    InvalidChannelCount { count: usize, max: usize },

    #[error("Smoothing divisor must be positive, got {0}")]
    InvalidSmoothingDivisor(i32),

    /// Query for a channel the tracker does not read
    #[error("Channel {channel} out of range (count: {count})")]
    ChannelOutOfRange { channel: usize, count: usize },
}
