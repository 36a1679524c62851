//! Blink timing configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default on and off delay for a single activity blink
pub const DEFAULT_BLINK_DELAY_MS: u64 = 30;

/// Timing of the one-shot blink fired on each activity signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlinkTiming {
    /// Time the indicator stays lit
    #[serde(default = "default_delay")]
    pub delay_on_ms: u64,
    /// Time the indicator stays dark afterwards
    #[serde(default = "default_delay")]
    pub delay_off_ms: u64,
    /// Blink dark-then-lit instead of lit-then-dark
    #[serde(default)]
    pub invert: bool,
}

fn default_delay() -> u64 {
    DEFAULT_BLINK_DELAY_MS
}

impl BlinkTiming {
    /// Same delay for both phases, not inverted
    pub const fn symmetric(delay_ms: u64) -> Self {
        Self {
            delay_on_ms: delay_ms,
            delay_off_ms: delay_ms,
            invert: false,
        }
    }

    pub fn delay_on(&self) -> Duration {
        Duration::from_millis(self.delay_on_ms)
    }

    pub fn delay_off(&self) -> Duration {
        Duration::from_millis(self.delay_off_ms)
    }
}

impl Default for BlinkTiming {
    fn default() -> Self {
        Self::symmetric(DEFAULT_BLINK_DELAY_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = BlinkTiming::default();
        assert_eq!(timing.delay_on(), Duration::from_millis(30));
        assert_eq!(timing.delay_off(), Duration::from_millis(30));
        assert!(!timing.invert);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let timing: BlinkTiming = serde_json::from_str(r#"{"delay_on_ms": 50}"#).unwrap();
        assert_eq!(timing.delay_on_ms, 50);
        assert_eq!(timing.delay_off_ms, DEFAULT_BLINK_DELAY_MS);
        assert!(!timing.invert);
    }
}
