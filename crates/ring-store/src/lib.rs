//! Bounded Ring Store
//!
//! Fixed-capacity, thread-safe storage for the most recent sensor records.
//! The store overwrites its oldest slot when full and retrieves the most
//! recently written record first; it is a last-value primitive, not a queue.

mod error;
mod store;

pub use error::RingError;
pub use store::{RingStore, DEFAULT_CAPACITY};
