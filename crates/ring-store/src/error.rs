//! Ring Store Error Types

use thiserror::Error;

/// Errors that can occur on the ring store's slot-level operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingError {
    /// Slot index outside the store
    #[error("slot index {index} out of range for capacity {capacity}")]
    OutOfRange { index: usize, capacity: usize },

    /// Batch larger than the store itself
    #[error("batch of {len} records exceeds capacity {capacity}")]
    BatchTooLarge { len: usize, capacity: usize },

    /// Swapping a slot with itself
    #[error("swap indices must differ (both were {0})")]
    SwapSameSlot(usize),
}
