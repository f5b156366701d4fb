//! # Player Configuration
//!
//! Configuration types for the playback coordinator.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback coordinator configuration.
///
/// Controls the progress-report cadence and the event-bus buffering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Interval between progress reports while a session is playing.
    ///
    /// Sub-second granularity keeps progress displays smooth without
    /// flooding subscribers.
    ///
    /// Default: 250 ms.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: Duration,

    /// Buffer capacity of the state-change event bus.
    ///
    /// A subscriber that falls behind by more than this many events
    /// observes a lag error and re-reads coordinator state.
    ///
    /// Default: 100.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            progress_interval: default_progress_interval(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl PlayerConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.progress_interval.is_zero() {
            return Err("progress_interval must be greater than zero".to_string());
        }
        if self.event_capacity == 0 {
            return Err("event_capacity must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn default_progress_interval() -> Duration {
    Duration::from_millis(250)
}

fn default_event_capacity() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.progress_interval, Duration::from_millis(250));
        assert_eq!(config.event_capacity, 100);
    }

    #[test]
    fn zero_interval_rejected() {
        let config = PlayerConfig {
            progress_interval: Duration::ZERO,
            ..PlayerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = PlayerConfig {
            event_capacity: 0,
            ..PlayerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: PlayerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.progress_interval, Duration::from_millis(250));
        assert_eq!(config.event_capacity, 100);
    }

    #[test]
    fn serde_round_trip() {
        let config = PlayerConfig {
            progress_interval: Duration::from_millis(500),
            event_capacity: 8,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PlayerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.progress_interval, Duration::from_millis(500));
        assert_eq!(back.event_capacity, 8);
    }
}
