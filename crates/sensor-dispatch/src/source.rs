//! Byte Source Abstraction
//!
//! The capture loop reads from an abstract byte source rather than a serial
//! port directly, so the transport (and its connect/reconnect lifecycle)
//! stays an external collaborator.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

/// A device byte stream with a connect/disconnect lifecycle.
///
/// A disconnected or closed source reads as "no data available", never as
/// an error; transient unavailability is absorbed by the capture loop's
/// idle sleep.
pub trait ByteSource: Send + Sync {
    /// Open the underlying transport
    fn connect(&self) -> io::Result<()>;

    /// Close the underlying transport
    fn disconnect(&self);

    /// Whether the transport is currently open
    fn is_connected(&self) -> bool;

    /// Number of bytes currently buffered and readable
    fn bytes_available(&self) -> usize;

    /// Read the next buffered byte, or `None` when nothing is available
    fn read_byte(&self) -> Option<u8>;
}

struct ScriptedState {
    queue: VecDeque<u8>,
    connected: bool,
}

/// In-memory byte source for hardware-free testing.
///
/// Bytes are queued with [`ScriptedSource::feed`] and handed out one at a
/// time while connected. Queued bytes survive a disconnect; they simply
/// stop being readable until the source is connected again.
pub struct ScriptedSource {
    state: Mutex<ScriptedState>,
}

impl ScriptedSource {
    /// Create a disconnected source with an empty queue
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ScriptedState {
                queue: VecDeque::new(),
                connected: false,
            }),
        }
    }

    /// Append bytes to the script
    pub fn feed(&self, bytes: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.queue.extend(bytes);
    }

    /// Number of scripted bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.state.lock().unwrap().queue.len()
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for ScriptedSource {
    fn connect(&self) -> io::Result<()> {
        self.state.lock().unwrap().connected = true;
        Ok(())
    }

    fn disconnect(&self) {
        self.state.lock().unwrap().connected = false;
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    fn bytes_available(&self) -> usize {
        let state = self.state.lock().unwrap();
        if state.connected {
            state.queue.len()
        } else {
            0
        }
    }

    fn read_byte(&self) -> Option<u8> {
        let mut state = self.state.lock().unwrap();
        if state.connected {
            state.queue.pop_front()
        } else {
            None
        }
    }
}
