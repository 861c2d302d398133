//! Graph configuration.

use serde::{Deserialize, Serialize};

use crate::source::{DEFAULT_CLOCK_PERIOD_MS, MIN_CLOCK_PERIOD_MS};

/// Configuration for a `NodeGraph`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Period given to newly created clock nodes, in milliseconds.
    pub default_clock_period_ms: u64,

    /// Re-check the connection invariant after every mutation and panic on a
    /// violation.
    pub verify_consistency: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            default_clock_period_ms: DEFAULT_CLOCK_PERIOD_MS,
            verify_consistency: cfg!(debug_assertions),
        }
    }
}

impl GraphConfig {
    /// Verification always on, regardless of build profile.
    pub fn strict() -> Self {
        Self {
            verify_consistency: true,
            ..Default::default()
        }
    }

    /// Verification always off.
    pub fn relaxed() -> Self {
        Self {
            verify_consistency: false,
            ..Default::default()
        }
    }

    /// Set the period for new clocks (clamped to the minimum period).
    pub fn with_clock_period_ms(mut self, period_ms: u64) -> Self {
        self.default_clock_period_ms = period_ms.max(MIN_CLOCK_PERIOD_MS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GraphConfig::default();
        assert_eq!(config.default_clock_period_ms, 1000);
        assert!(GraphConfig::strict().verify_consistency);
        assert!(!GraphConfig::relaxed().verify_consistency);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GraphConfig = serde_json::from_str(r#"{"default_clock_period_ms": 40}"#).unwrap();
        assert_eq!(config.default_clock_period_ms, 40);
        assert_eq!(config.verify_consistency, cfg!(debug_assertions));
    }

    #[test]
    fn test_clock_period_clamped() {
        assert_eq!(
            GraphConfig::default()
                .with_clock_period_ms(0)
                .default_clock_period_ms,
            MIN_CLOCK_PERIOD_MS
        );
    }
}
