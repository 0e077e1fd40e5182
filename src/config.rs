//! Reporting defaults.
//!
//! Most reports use the same rate unit, confidence level, and small-number
//! cutoff for every table. [`IndicatorConfig`] bundles those three and can
//! be deserialized from any serde format, with missing fields falling back
//! to the defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_alpha, ensure_scale, Result};

/// Rates are reported per 100,000 unless stated otherwise.
pub const DEFAULT_SCALE: f64 = 100_000.0;

/// Two-sided 95% intervals.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Counts below this value are flagged as unstable.
pub const DEFAULT_SMALL_NUMBER_THRESHOLD: i64 = 5;

/// Shared parameters for the summary functions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Rate unit multiplier, e.g. 100,000 for "per 100k".
    pub scale: f64,
    /// Significance level for confidence intervals, in (0, 1).
    pub alpha: f64,
    /// Counts strictly below this are flagged.
    pub small_number_threshold: i64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            alpha: DEFAULT_ALPHA,
            small_number_threshold: DEFAULT_SMALL_NUMBER_THRESHOLD,
        }
    }
}

impl IndicatorConfig {
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.small_number_threshold = threshold;
        self
    }

    /// Checks scale and alpha against the constraints the indicators apply.
    ///
    /// The threshold is unconstrained.
    pub fn validate(&self) -> Result<()> {
        ensure_scale(self.scale)?;
        ensure_alpha(self.alpha)
    }

    /// Confidence level as a fraction, e.g. 0.95.
    pub fn confidence_level(&self) -> f64 {
        1.0 - self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = IndicatorConfig::default();
        assert_eq!(cfg.scale, 100_000.0);
        assert_eq!(cfg.alpha, 0.05);
        assert_eq!(cfg.small_number_threshold, 5);
        assert!(cfg.validate().is_ok());
        assert!((cfg.confidence_level() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn builder_overrides() {
        let cfg = IndicatorConfig::default()
            .with_scale(1000.0)
            .with_alpha(0.1)
            .with_threshold(10);
        assert_eq!(cfg.scale, 1000.0);
        assert_eq!(cfg.alpha, 0.1);
        assert_eq!(cfg.small_number_threshold, 10);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(IndicatorConfig::default().with_scale(0.0).validate().is_err());
        assert!(IndicatorConfig::default().with_alpha(1.0).validate().is_err());
        assert!(IndicatorConfig::default().with_alpha(0.0).validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: IndicatorConfig = serde_json::from_str(r#"{"scale": 1000.0}"#).unwrap();
        assert_eq!(cfg.scale, 1000.0);
        assert_eq!(cfg.alpha, DEFAULT_ALPHA);
        assert_eq!(cfg.small_number_threshold, DEFAULT_SMALL_NUMBER_THRESHOLD);
    }
}
