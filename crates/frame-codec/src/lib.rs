//! Analog Frame Codec
//!
//! This crate turns the unstructured byte stream emitted by the sampling
//! hardware into discrete 4-channel sensor records. The wire format carries
//! no length prefix; a reserved terminator byte marks frame completion.

mod decoder;
mod record;

pub use decoder::{FrameDecoder, FRAME_TERMINATOR};
pub use record::{SensorRecord, CHANNEL_COUNT};
