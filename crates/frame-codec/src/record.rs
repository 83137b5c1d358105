//! Sensor Record Type

use serde::{Deserialize, Serialize};

/// Number of analog channels sampled per frame
pub const CHANNEL_COUNT: usize = 4;

/// One synchronized sample of the four analog inputs on the remote device.
///
/// Records are immutable value types: they are created by the frame decoder
/// and copied into and out of storage, never shared. The all-zero record
/// doubles as the "never written" sentinel in downstream storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorRecord {
    /// Channel values in wire order (channel 0 arrives first)
    pub channels: [u8; CHANNEL_COUNT],
}

impl SensorRecord {
    /// Create a record from four channel values
    pub fn new(channels: [u8; CHANNEL_COUNT]) -> Self {
        Self { channels }
    }

    /// Get a single channel value
    ///
    /// # Panics
    /// Panics if `idx >= CHANNEL_COUNT`.
    pub fn channel(&self, idx: usize) -> u8 {
        self.channels[idx]
    }

    /// Whether every channel reads zero.
    ///
    /// Used by the dispatcher as its "no data yet" filter. Note this cannot
    /// distinguish an unwritten storage slot from a sample where all four
    /// inputs legitimately read zero.
    pub fn is_all_zero(&self) -> bool {
        self.channels == [0; CHANNEL_COUNT]
    }
}
