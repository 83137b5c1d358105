//! Capture Loop
//!
//! Owns the dedicated thread that drains the byte source and drives the
//! frame decoder. The thread outlives enable/disable cycles; only shutdown
//! tears it down.

use crate::error::CaptureError;
use crate::source::ByteSource;
use frame_codec::{FrameDecoder, SensorRecord};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sink invoked on the capture thread for every completed record
pub type RecordSink = Box<dyn Fn(SensorRecord) + Send + 'static>;

struct Flags {
    /// Actively reading the source (enable/disable)
    enabled: AtomicBool,
    /// Thread keeps running at all (cleared once, by shutdown)
    alive: AtomicBool,
}

/// Dedicated ingestion thread feeding decoded records to a sink.
///
/// The thread starts disabled: it sleeps in short fixed intervals until
/// enabled, then drains every currently-available byte in a tight inner
/// pass before sleeping again. Disabling stops it from reading without
/// tearing it down, so re-enabling is immediate. Decoder state lives on
/// the thread for its whole life, so a disable/enable cycle does not lose
/// partially accumulated frames.
pub struct CaptureLoop {
    flags: Arc<Flags>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureLoop {
    /// Spawn the capture thread over `source`, delivering records to `sink`.
    ///
    /// `idle_sleep` bounds both the wake-up latency after `enable` and how
    /// long `shutdown` may wait for the thread to notice the exit signal.
    pub fn spawn(
        source: Arc<dyn ByteSource>,
        sink: RecordSink,
        idle_sleep: Duration,
    ) -> Result<Self, CaptureError> {
        let flags = Arc::new(Flags {
            enabled: AtomicBool::new(false),
            alive: AtomicBool::new(true),
        });

        let thread_flags = Arc::clone(&flags);
        let handle = thread::Builder::new()
            .name("analog-capture".to_string())
            .spawn(move || run(source, sink, thread_flags, idle_sleep))
            .map_err(|e| CaptureError::Spawn(e.to_string()))?;

        debug!("capture thread spawned");
        Ok(Self {
            flags,
            handle: Some(handle),
        })
    }

    /// Start reading and decoding bytes from the source
    pub fn enable(&self) -> Result<(), CaptureError> {
        if !self.flags.alive.load(Ordering::Acquire) {
            return Err(CaptureError::ShutDown);
        }
        self.flags
            .enabled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CaptureError::AlreadyEnabled)?;
        info!("capture loop enabled");
        Ok(())
    }

    /// Stop reading the source without stopping the thread
    pub fn disable(&self) -> Result<(), CaptureError> {
        if !self.flags.alive.load(Ordering::Acquire) {
            return Err(CaptureError::ShutDown);
        }
        self.flags
            .enabled
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CaptureError::AlreadyDisabled)?;
        info!("capture loop disabled");
        Ok(())
    }

    /// Whether the loop is currently in decoding mode
    pub fn is_enabled(&self) -> bool {
        self.flags.enabled.load(Ordering::Acquire)
    }

    /// Permanently stop the capture thread and wait for it to exit.
    ///
    /// One-way: no enable is possible afterwards. Once this returns the
    /// thread is gone, so the sink will never be invoked again. Calling
    /// shutdown more than once is a no-op.
    pub fn shutdown(&mut self) {
        self.flags.alive.store(false, Ordering::Release);
        self.flags.enabled.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            info!("shutting down capture thread");
            if handle.join().is_err() {
                warn!("capture thread exited with a panic");
            }
        }
    }
}

impl Drop for CaptureLoop {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Thread main: idle in short sleeps, drain hard while there is data.
fn run(source: Arc<dyn ByteSource>, sink: RecordSink, flags: Arc<Flags>, idle_sleep: Duration) {
    let mut decoder = FrameDecoder::new();

    while flags.alive.load(Ordering::Acquire) {
        if flags.enabled.load(Ordering::Acquire) && source.is_connected() {
            let mut readable = source.bytes_available();
            while readable > 0 && flags.enabled.load(Ordering::Acquire) {
                let Some(byte) = source.read_byte() else {
                    break;
                };
                readable = source.bytes_available();

                if let Some(record) = decoder.feed(byte) {
                    sink(record);
                }
            }
        }
        // Covers disabled, disconnected, and drained states alike; short
        // enough to keep perceived latency low without busy-spinning.
        thread::sleep(idle_sleep);
    }

    debug!("capture thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedSource;
    use frame_codec::FRAME_TERMINATOR;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use std::time::Instant;

    const IDLE: Duration = Duration::from_millis(1);

    fn collector() -> (RecordSink, Arc<Mutex<Vec<SensorRecord>>>) {
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink_records = Arc::clone(&records);
        let sink: RecordSink = Box::new(move |r| sink_records.lock().unwrap().push(r));
        (sink, records)
    }

    fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        done()
    }

    #[test]
    fn test_enable_disable_state_machine() {
        let source = Arc::new(ScriptedSource::new());
        let (sink, _records) = collector();
        let capture = CaptureLoop::spawn(source, sink, IDLE).unwrap();

        assert!(!capture.is_enabled());
        assert_eq!(capture.disable(), Err(CaptureError::AlreadyDisabled));
        capture.enable().unwrap();
        assert!(capture.is_enabled());
        assert_eq!(capture.enable(), Err(CaptureError::AlreadyEnabled));
        capture.disable().unwrap();
        capture.enable().unwrap();
    }

    #[test]
    fn test_lifecycle_fails_after_shutdown() {
        let source = Arc::new(ScriptedSource::new());
        let (sink, _records) = collector();
        let mut capture = CaptureLoop::spawn(source, sink, IDLE).unwrap();

        capture.shutdown();
        capture.shutdown(); // idempotent
        assert_eq!(capture.enable(), Err(CaptureError::ShutDown));
        assert_eq!(capture.disable(), Err(CaptureError::ShutDown));
    }

    #[test]
    fn test_decodes_scripted_stream_into_sink() {
        let source = Arc::new(ScriptedSource::new());
        source.feed(&[10, 20, 30, 40, FRAME_TERMINATOR, 5, 6, 7, 8, FRAME_TERMINATOR]);
        source.connect().unwrap();

        let (sink, records) = collector();
        let capture = CaptureLoop::spawn(Arc::clone(&source) as _, sink, IDLE).unwrap();
        capture.enable().unwrap();

        assert!(wait_until(Duration::from_secs(2), || records
            .lock()
            .unwrap()
            .len()
            == 2));
        assert_eq!(
            *records.lock().unwrap(),
            vec![
                SensorRecord::new([10, 20, 30, 40]),
                SensorRecord::new([5, 6, 7, 8]),
            ]
        );
    }

    #[test]
    fn test_no_reads_while_disconnected() {
        let source = Arc::new(ScriptedSource::new());
        source.feed(&[1, 2, 3, 4, FRAME_TERMINATOR]);

        let (sink, records) = collector();
        let capture = CaptureLoop::spawn(Arc::clone(&source) as _, sink, IDLE).unwrap();
        capture.enable().unwrap();

        thread::sleep(Duration::from_millis(20));
        assert!(records.lock().unwrap().is_empty());
        assert_eq!(source.remaining(), 5);

        source.connect().unwrap();
        assert!(wait_until(Duration::from_secs(2), || !records
            .lock()
            .unwrap()
            .is_empty()));
    }

    #[test]
    fn test_frame_survives_disable_enable_cycle() {
        let source = Arc::new(ScriptedSource::new());
        source.connect().unwrap();
        source.feed(&[10, 20]);

        let (sink, records) = collector();
        let capture = CaptureLoop::spawn(Arc::clone(&source) as _, sink, IDLE).unwrap();
        capture.enable().unwrap();

        // Let the partial frame reach the decoder, then cycle the loop.
        assert!(wait_until(Duration::from_secs(2), || source.remaining() == 0));
        capture.disable().unwrap();
        capture.enable().unwrap();

        source.feed(&[30, 40, FRAME_TERMINATOR]);
        assert!(wait_until(Duration::from_secs(2), || !records
            .lock()
            .unwrap()
            .is_empty()));
        assert_eq!(
            *records.lock().unwrap(),
            vec![SensorRecord::new([10, 20, 30, 40])]
        );
    }

    #[test]
    fn test_no_sink_invocations_after_shutdown() {
        let source = Arc::new(ScriptedSource::new());
        source.connect().unwrap();

        let delivered = Arc::new(AtomicUsize::new(0));
        let sink_count = Arc::clone(&delivered);
        let sink: RecordSink = Box::new(move |_| {
            sink_count.fetch_add(1, Ordering::SeqCst);
        });
        let mut capture = CaptureLoop::spawn(Arc::clone(&source) as _, sink, IDLE).unwrap();
        capture.enable().unwrap();

        // Keep frames arriving concurrently with the shutdown call.
        let feeder = {
            let source = Arc::clone(&source);
            thread::spawn(move || {
                for i in 0..500u32 {
                    source.feed(&[1, 2, 3, (i % 128) as u8, FRAME_TERMINATOR]);
                    thread::sleep(Duration::from_micros(100));
                }
            })
        };

        thread::sleep(Duration::from_millis(5));
        capture.shutdown();
        let after_shutdown = delivered.load(Ordering::SeqCst);

        thread::sleep(Duration::from_millis(20));
        assert_eq!(delivered.load(Ordering::SeqCst), after_shutdown);
        feeder.join().unwrap();
    }
}
