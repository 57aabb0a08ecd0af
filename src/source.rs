//! Raw analog sample source

/// Platform service returning one raw ADC reading for a channel.
///
/// Reads are synchronous and assumed to always succeed. Readings follow the
/// 10-bit ADC convention (0..=1023); the tracker does not reject values
/// outside that range.
pub trait RawSource {
    fn read_channel(&mut self, channel: usize) -> u16;
}

impl<F> RawSource for F
where
    F: FnMut(usize) -> u16,
{
    fn read_channel(&mut self, channel: usize) -> u16 {
        self(channel)
    }
}
