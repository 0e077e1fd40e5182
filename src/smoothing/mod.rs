//! Time series smoothing for weekly or daily case counts.
//!
//! # Methods
//!
//! - [`rolling_mean`] — Trailing or centered moving average with a minimum
//!   observation count and `NaN`-aware missing data handling
//!
//! # References
//!
//! - Box, G.E.P., Jenkins, G.M., Reinsel, G.C. & Ljung, G.M. (2015).
//!   *Time Series Analysis: Forecasting and Control*, 5th ed., Chapter 1.

mod rolling;

pub use rolling::{rolling_mean, rolling_mean_with, RollingWindow};
