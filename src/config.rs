//! # Runtime configuration.
//!
//! [`Config`] controls the producer side of the demo runtime: how many
//! producer threads publish events and how long each sleeps between publishes.
//!
//! ## Sentinel values
//! - the delay range is inclusive-exclusive: `[min_delay_ms, max_delay_ms)`
//!
//! # Example
//! ```
//! use looper::Config;
//!
//! let mut cfg = Config::default();
//! cfg.producer_count = 4;
//! cfg.min_delay_ms = 10;
//! cfg.max_delay_ms = 50;
//!
//! assert!(cfg.validate().is_ok());
//! assert_eq!(cfg.delay_range(), 10..50);
//! ```

use std::ops::Range;

use crate::error::ConfigError;

/// Configuration for the producer threads feeding the looper.
///
/// ## Field semantics
/// - `producer_count`: number of producer threads (must be `>= 1`)
/// - `min_delay_ms`: inclusive lower bound of the sleep between publishes
/// - `max_delay_ms`: exclusive upper bound of the sleep between publishes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of producer threads.
    pub producer_count: usize,

    /// Minimum delay between two publishes of one producer, in milliseconds (inclusive).
    pub min_delay_ms: u64,

    /// Maximum delay between two publishes of one producer, in milliseconds (exclusive).
    pub max_delay_ms: u64,
}

impl Config {
    /// Returns the producer sleep range in milliseconds.
    #[inline]
    pub fn delay_range(&self) -> Range<u64> {
        self.min_delay_ms..self.max_delay_ms
    }

    /// Checks that the configuration can drive a [`ProducerPool`](crate::ProducerPool).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.producer_count == 0 {
            return Err(ConfigError::NoProducers);
        }
        if self.min_delay_ms >= self.max_delay_ms {
            return Err(ConfigError::EmptyDelayRange {
                min_ms: self.min_delay_ms,
                max_ms: self.max_delay_ms,
            });
        }
        Ok(())
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `producer_count = 2`
    /// - `min_delay_ms = 1000`
    /// - `max_delay_ms = 20000` (whole seconds 1..=19)
    fn default() -> Self {
        Self {
            producer_count: 2,
            min_delay_ms: 1_000,
            max_delay_ms: 20_000,
        }
    }
}
