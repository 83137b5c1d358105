//! Ring Store Implementation

use crate::error::RingError;
use frame_codec::SensorRecord;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default store capacity (200 records, ~10s of history at the device's
/// nominal output rate)
pub const DEFAULT_CAPACITY: usize = 200;

/// Cursor plus slot array, guarded as a unit.
///
/// Keeping both under one lock is load-bearing: splitting the cursor from
/// the slots would let a reader observe a cursor advanced past a slot whose
/// write has not landed yet.
struct Inner {
    slots: Box<[SensorRecord]>,
    /// Next slot to write, in 0..=capacity
    cursor: usize,
}

/// Fixed-capacity overwrite-on-wrap store with last-value retrieval.
///
/// `push` writes at the cursor and advances; `pop` steps the cursor back
/// and returns the slot it lands on, so a pop always yields the most
/// recently written record. Repeated pops without interleaved pushes walk
/// backward through history and will return stale data once they wrap.
///
/// Safe for one producer and one consumer on different threads; every
/// operation holds the single internal lock for the duration of its cursor
/// update and slot access, and nothing else (no I/O, no callbacks) runs
/// under that lock.
pub struct RingStore {
    capacity: usize,
    inner: Mutex<Inner>,
}

impl RingStore {
    /// Create a store holding up to `capacity` records, all slots starting
    /// at the all-zero sentinel
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring store capacity must be nonzero");
        Self {
            capacity,
            inner: Mutex::new(Inner {
                slots: vec![SensorRecord::default(); capacity].into_boxed_slice(),
                cursor: 0,
            }),
        }
    }

    /// Create a store with the default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Get the store capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Nothing that can panic runs while the lock is held, so a poisoned
        // lock still guards consistent state.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write `record` at the cursor and advance, wrapping at capacity.
    ///
    /// Overwrites unconditionally: the store never grows, never blocks the
    /// producer, and does not report which slot was displaced.
    pub fn push(&self, record: SensorRecord) {
        let mut inner = self.lock();
        if inner.cursor == self.capacity {
            inner.cursor = 0;
        }
        let cursor = inner.cursor;
        inner.slots[cursor] = record;
        inner.cursor = cursor + 1;
    }

    /// Push a batch of records in order.
    ///
    /// Fails without writing anything when the batch is larger than the
    /// store, since the leading records would be overwritten before the
    /// call even returned.
    pub fn push_all(&self, records: &[SensorRecord]) -> Result<(), RingError> {
        if records.len() > self.capacity {
            return Err(RingError::BatchTooLarge {
                len: records.len(),
                capacity: self.capacity,
            });
        }
        for &record in records {
            self.push(record);
        }
        Ok(())
    }

    /// Step the cursor backward by one (wrapping from 0 to capacity−1) and
    /// return the record it now points to.
    ///
    /// Immediately after a push this is exactly the record just written. On
    /// a store that has never been written it returns the all-zero sentinel.
    pub fn pop(&self) -> SensorRecord {
        let mut inner = self.lock();
        if inner.cursor == 0 {
            inner.cursor = self.capacity;
        }
        inner.cursor -= 1;
        inner.slots[inner.cursor]
    }

    /// Read the record at an absolute slot index
    pub fn get(&self, index: usize) -> Result<SensorRecord, RingError> {
        self.check_index(index)?;
        Ok(self.lock().slots[index])
    }

    /// Overwrite the record at an absolute slot index, leaving the cursor
    /// untouched
    pub fn set(&self, index: usize, record: SensorRecord) -> Result<(), RingError> {
        self.check_index(index)?;
        self.lock().slots[index] = record;
        Ok(())
    }

    /// Exchange the records in two distinct slots
    pub fn swap(&self, a: usize, b: usize) -> Result<(), RingError> {
        if a == b {
            return Err(RingError::SwapSameSlot(a));
        }
        self.check_index(a)?;
        self.check_index(b)?;
        self.lock().slots.swap(a, b);
        Ok(())
    }

    /// Move the cursor back to slot 0 without touching any slot contents
    pub fn reset(&self) {
        self.lock().cursor = 0;
    }

    /// Reset every slot to the all-zero sentinel and the cursor to 0
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.slots.fill(SensorRecord::default());
        inner.cursor = 0;
    }

    fn check_index(&self, index: usize) -> Result<(), RingError> {
        if index >= self.capacity {
            return Err(RingError::OutOfRange {
                index,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}
