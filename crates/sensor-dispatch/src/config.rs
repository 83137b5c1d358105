//! Capture Configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Recommended consumer polling period for `dispatch_once`.
///
/// A tuning parameter, not a protocol constant: the capture thread keeps
/// the store current regardless of how often the consumer polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Configuration for the capture pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Ring store capacity in records (default: 200)
    pub ring_capacity: usize,
    /// Capture-thread sleep while disabled or out of data, in milliseconds
    /// (default: 1)
    pub idle_sleep_ms: u64,
}

impl CaptureConfig {
    /// Idle sleep as a `Duration`
    pub fn idle_sleep(&self) -> Duration {
        Duration::from_millis(self.idle_sleep_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            ring_capacity: ring_store::DEFAULT_CAPACITY,
            idle_sleep_ms: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CaptureConfig::default();
        assert_eq!(config.ring_capacity, 200);
        assert_eq!(config.idle_sleep(), Duration::from_millis(1));
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = CaptureConfig {
            ring_capacity: 64,
            idle_sleep_ms: 2,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CaptureConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ring_capacity, 64);
        assert_eq!(back.idle_sleep_ms, 2);
    }
}
