//! # u-indicators
//!
//! Public health indicators computed from tabular case and population data:
//! crude rates, exact Poisson confidence intervals, rolling means, directly
//! age-standardized rates, rate ratios and differences, and small-number
//! reliability flags.
//!
//! Every function is pure. Inputs are plain `f64` values or slices that the
//! caller has already loaded; nothing here reads files or touches the network.
//!
//! ## Modules
//!
//! - [`rate`] — Crude rates, rate ratio, rate difference
//! - [`interval`] — Exact (chi-square based) Poisson interval for a rate
//! - [`smoothing`] — Rolling mean with missing-value handling
//! - [`standardization`] — Direct age standardization
//! - [`flags`] — Small-number reliability flags
//! - [`summary`] — Report rows combining the indicators above
//! - [`config`] — Shared defaults (scale, alpha, threshold)
//! - [`advisory`] — Non-fatal diagnostics returned alongside values
//! - [`special`] — Chi-square quantiles (lower and upper tail)
//!
//! ## Errors and advisories
//!
//! Violated preconditions (non-positive population, negative counts,
//! mismatched lengths, ...) fail fast with [`IndicatorError::InvalidArgument`].
//! Conditions that still allow a result, such as a non-finite rate or cases
//! dropped from empty strata, are returned as [`Advisory`] values inside a
//! [`Computed`] and logged through `tracing`.
//!
//! ## Example
//!
//! ```
//! use u_indicators::{poisson_rate_ci, rate_per, DEFAULT_ALPHA, DEFAULT_SCALE};
//!
//! let rate = rate_per(150.0, 50_000.0, DEFAULT_SCALE).unwrap();
//! let ci = poisson_rate_ci(150.0, 50_000.0, DEFAULT_SCALE, DEFAULT_ALPHA).unwrap();
//! assert_eq!(rate.value, 300.0);
//! assert!(ci.contains(rate.value));
//! ```

pub mod advisory;
pub mod config;
pub mod error;
pub mod flags;
pub mod interval;
pub mod rate;
pub mod smoothing;
pub mod special;
pub mod standardization;
pub mod summary;

pub use advisory::{Advisory, Computed};
pub use config::{IndicatorConfig, DEFAULT_ALPHA, DEFAULT_SCALE, DEFAULT_SMALL_NUMBER_THRESHOLD};
pub use error::{IndicatorError, Result};
pub use flags::{flag_small_numbers, flag_small_numbers_each};
pub use interval::{poisson_rate_ci, ConfidenceInterval};
pub use rate::{rate_difference, rate_per, rate_per_each, rate_ratio};
pub use smoothing::{rolling_mean, rolling_mean_with, RollingWindow};
pub use standardization::{age_standardize_strata, direct_age_standardized_rate, Stratum};
pub use summary::{
    compare_groups, summarize_rate, summarize_strata, GroupComparison, RateSummary,
    StandardizedSummary,
};
