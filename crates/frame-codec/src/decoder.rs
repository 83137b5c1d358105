//! Streaming Frame Decoder
//!
//! Reconstructs records from the device's framing protocol: every byte
//! except the terminator is channel data, and the terminator marks the
//! accumulated bytes as one complete sample.

use crate::record::{SensorRecord, CHANNEL_COUNT};

/// Reserved byte value marking frame completion.
///
/// The device never encodes a channel value as this byte; that is a
/// protocol precondition the decoder cannot verify.
pub const FRAME_TERMINATOR: u8 = 129;

/// Stateful byte-to-record translator.
///
/// Feed bytes one at a time; each byte yields at most one completed record.
/// The decoder is strictly forward, O(1) per byte with fixed memory, and
/// never backtracks.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Accumulated channel bytes since the last terminator
    accumulator: [u8; CHANNEL_COUNT],
    /// Next accumulator position to fill, in 0..=CHANNEL_COUNT
    fill: usize,
}

impl FrameDecoder {
    /// Create a decoder with an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one byte from the stream.
    ///
    /// Returns `Some(record)` when `byte` is the terminator, built from
    /// accumulator positions 0..4 regardless of how many were filled since
    /// the previous frame: a short frame keeps the previous frame's trailing
    /// bytes in the unfilled positions. This stale-tail behavior is part of
    /// the protocol's tolerance policy and is relied on for compatibility.
    ///
    /// If more than four data bytes arrive before a terminator, the excess
    /// is dropped and the fill position stays parked at four. This usually
    /// means a terminator was lost in transit; discarding keeps the decoder
    /// aligned so the next frame starts cleanly.
    pub fn feed(&mut self, byte: u8) -> Option<SensorRecord> {
        if byte == FRAME_TERMINATOR {
            self.fill = 0;
            return Some(SensorRecord::new(self.accumulator));
        }

        if self.fill == CHANNEL_COUNT {
            return None;
        }

        self.accumulator[self.fill] = byte;
        self.fill += 1;
        None
    }

    /// Clear the accumulator and fill position
    pub fn reset(&mut self) {
        self.accumulator = [0; CHANNEL_COUNT];
        self.fill = 0;
    }
}
