//! Record Dispatcher
//!
//! Owns the ring store and the capture loop, and answers the consumer's
//! "give me the latest record" poll.

use crate::capture::CaptureLoop;
use crate::config::CaptureConfig;
use crate::error::DispatchError;
use crate::source::ByteSource;
use frame_codec::SensorRecord;
use ring_store::RingStore;
use std::sync::Arc;
use tracing::{debug, info};

/// Bridges the capture side to a polling consumer.
///
/// Decoded records land in a bounded ring store on the capture thread; each
/// [`Dispatcher::dispatch_once`] call pops the most recent record and, when
/// it passes the validity filter, hands it to the consumer callback
/// synchronously on the calling thread. The consumer is expected to poll on
/// a fixed period (see [`crate::DEFAULT_POLL_INTERVAL`]).
pub struct Dispatcher {
    source: Arc<dyn ByteSource>,
    store: Arc<RingStore>,
    capture: CaptureLoop,
    on_record: Box<dyn Fn(SensorRecord)>,
}

impl Dispatcher {
    /// Build the pipeline: ring store, capture thread (initially disabled),
    /// and consumer callback.
    ///
    /// The callback is a required constructor argument rather than a
    /// settable field, so "dispatcher without a callback" is not a
    /// representable state.
    pub fn new(
        source: Arc<dyn ByteSource>,
        on_record: impl Fn(SensorRecord) + 'static,
        config: CaptureConfig,
    ) -> Result<Self, DispatchError> {
        let store = Arc::new(RingStore::new(config.ring_capacity));

        let capture_store = Arc::clone(&store);
        let capture = CaptureLoop::spawn(
            Arc::clone(&source),
            Box::new(move |record| capture_store.push(record)),
            config.idle_sleep(),
        )?;

        info!(
            capacity = config.ring_capacity,
            "dispatcher created, capture idle"
        );
        Ok(Self {
            source,
            store,
            capture,
            on_record: Box::new(on_record),
        })
    }

    /// Connect the byte source and start capturing
    pub fn open(&self) -> Result<(), DispatchError> {
        self.source.connect()?;
        self.capture.enable()?;
        info!("dispatcher open");
        Ok(())
    }

    /// Stop capturing and disconnect the byte source
    pub fn close(&self) -> Result<(), DispatchError> {
        self.capture.disable()?;
        self.source.disconnect();
        info!("dispatcher closed");
        Ok(())
    }

    /// Pop the most recent record, filtering the "no data yet" sentinel.
    ///
    /// An all-zero record reads as absent. This deliberately conflates a
    /// never-written slot with a sample where all four channels genuinely
    /// read zero; the wire format gives no way to tell them apart, and
    /// downstream consumers depend on the existing behavior.
    pub fn retrieve_latest(&self) -> Option<SensorRecord> {
        let record = self.store.pop();
        if record.is_all_zero() {
            None
        } else {
            Some(record)
        }
    }

    /// Poll once: deliver the latest valid record to the consumer callback.
    ///
    /// The callback runs synchronously on the calling thread, at most once
    /// per call. Returns whether it was invoked.
    pub fn dispatch_once(&self) -> bool {
        match self.retrieve_latest() {
            Some(record) => {
                debug!(?record, "dispatching record");
                (self.on_record)(record);
                true
            }
            None => false,
        }
    }

    /// Access the underlying ring store (slot-level capability surface)
    pub fn store(&self) -> &RingStore {
        &self.store
    }

    /// Permanently stop the capture thread, waiting for it to exit.
    ///
    /// After this returns no further record is pushed and the dispatcher
    /// can no longer be opened.
    pub fn shutdown(&mut self) {
        self.capture.shutdown();
    }
}
