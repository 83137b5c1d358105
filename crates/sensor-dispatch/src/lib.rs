//! Sensor Dispatch
//!
//! Bridges a device byte source to a polling consumer: a dedicated capture
//! thread drains the source and decodes records into a bounded ring store,
//! and a dispatcher hands the most recent valid record to a consumer
//! callback on the consumer's own schedule. The producer never waits for
//! the consumer and the consumer never waits for the producer.

mod capture;
mod config;
mod dispatcher;
mod error;
mod source;

pub use capture::{CaptureLoop, RecordSink};
pub use config::{CaptureConfig, DEFAULT_POLL_INTERVAL};
pub use dispatcher::Dispatcher;
pub use error::{CaptureError, DispatchError};
pub use source::{ByteSource, ScriptedSource};
