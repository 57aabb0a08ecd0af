//! Atomic multi-channel sample capture

use core::ops::Index;

use heapless::Vec;

use crate::config::MAX_CHANNELS;
use crate::source::RawSource;

/// One reading per channel, taken within a single tick.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sample {
    values: Vec<i32, MAX_CHANNELS>,
}

impl Sample {
    /// Read `channel_count` channels back to back.
    ///
    /// Nothing else runs between the reads so the channels stay as close in
    /// time as the ADC allows. Channels past [`MAX_CHANNELS`] are not read.
    pub fn acquire<S: RawSource + ?Sized>(source: &mut S, channel_count: usize) -> Self {
        let mut values = Vec::new();
        for channel in 0..channel_count.min(MAX_CHANNELS) {
            // Cannot overflow, the range is capped at capacity
            let _ = values.push(i32::from(source.read_channel(channel)));
        }
        Self { values }
    }

    /// Build a sample from readings that were already captured
    pub fn from_values(values: &[i32]) -> Self {
        let len = values.len().min(MAX_CHANNELS);
        let mut sample = Self::default();
        for &value in &values[..len] {
            let _ = sample.values.push(value);
        }
        sample
    }

    /// Number of channels captured
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no channel was read
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Readings indexed by channel
    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    /// Iterate the readings in channel order
    pub fn iter(&self) -> impl Iterator<Item = &i32> {
        self.values.iter()
    }
}

impl Index<usize> for Sample {
    type Output = i32;

    fn index(&self, channel: usize) -> &i32 {
        &self.values[channel]
    }
}
