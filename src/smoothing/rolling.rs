//! Rolling (moving) mean with missing-value handling.
//!
//! # Algorithm
//!
//! For each index `i` the window covers
//!
//! ```text
//! trailing: [i − w + 1, i]
//! centered: [i − ⌊w/2⌋, i + ⌈w/2⌉ − 1]
//! ```
//!
//! clipped to the series bounds. `NaN` entries are missing: they count
//! neither toward the sum nor toward the observation count. The output at
//! `i` is the mean of the observations in its window when at least
//! `min_periods` observations are present, `NaN` otherwise.
//!
//! Infinite entries are observations. A window holding `+∞` averages to
//! `+∞`, one holding `−∞` to `−∞`, and one holding both to `NaN`; the value
//! returns to finite once they leave the window.
//!
//! Both window edges only move right as `i` advances, so the mean is
//! maintained with a running compensated sum instead of being recomputed.
//! Finite values are summed after scaling by a power of two no smaller than
//! the window, so a full window of values near `f64::MAX` cannot overflow.
//! When a large value leaves and the sum has cancelled to far below the
//! largest magnitude seen, the sum is rebuilt from the window.
//!
//! Centering introduces look-ahead: a centered value uses observations after
//! `i`, which suits visualization but not real-time reporting.

use crate::error::{IndicatorError, Result};

/// Rolling window options.
///
/// # Examples
///
/// ```
/// use u_indicators::smoothing::{rolling_mean, RollingWindow};
///
/// let series = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let out = rolling_mean(&series, RollingWindow::new(3).min_periods(1)).unwrap();
/// assert_eq!(out, vec![1.0, 1.5, 2.0, 3.0, 4.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingWindow {
    window: usize,
    center: bool,
    min_periods: Option<usize>,
}

impl RollingWindow {
    /// A trailing window of `window` observations requiring a full window.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            center: false,
            min_periods: None,
        }
    }

    /// Centers the window on each index.
    pub fn centered(mut self) -> Self {
        self.center = true;
        self
    }

    /// Minimum number of non-missing observations needed for a value.
    pub fn min_periods(mut self, min_periods: usize) -> Self {
        self.min_periods = Some(min_periods);
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn is_centered(&self) -> bool {
        self.center
    }

    /// Effective minimum observation count; defaults to the window size.
    pub fn required_periods(&self) -> usize {
        self.min_periods.unwrap_or(self.window)
    }

    fn validate(&self) -> Result<()> {
        if self.window == 0 {
            return Err(IndicatorError::invalid(
                "window",
                self.window,
                "window must be positive",
            ));
        }
        match self.min_periods {
            Some(0) => Err(IndicatorError::invalid(
                "min_periods",
                0,
                "min_periods must be positive",
            )),
            Some(m) if m > self.window => Err(IndicatorError::invalid(
                "min_periods",
                m,
                "min_periods must not exceed the window size",
            )),
            _ => Ok(()),
        }
    }

    /// Offsets `(behind, ahead)` of the window edges relative to the index.
    fn extent(&self) -> (usize, usize) {
        if self.center {
            (self.window / 2, (self.window - 1) / 2)
        } else {
            (self.window - 1, 0)
        }
    }
}

/// Rolling mean over `series`, with `NaN` marking missing observations.
///
/// The output has the same length as the input; entries without enough
/// observations are `NaN`.
///
/// # Errors
///
/// `InvalidArgument` if the window is zero, or `min_periods` is zero or
/// larger than the window.
///
/// # Examples
///
/// ```
/// use u_indicators::smoothing::{rolling_mean, RollingWindow};
///
/// let series = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let out = rolling_mean(&series, RollingWindow::new(3)).unwrap();
/// assert!(out[0].is_nan() && out[1].is_nan());
/// assert_eq!(&out[2..], &[2.0, 3.0, 4.0]);
/// ```
pub fn rolling_mean(series: &[f64], window: RollingWindow) -> Result<Vec<f64>> {
    window.validate()?;

    let n = series.len();
    let (behind, ahead) = window.extent();
    let required = window.required_periods();

    let mut acc = RunningSum::new(window.window);
    let mut lo = 0;
    let mut hi = 0;
    let mut out = Vec::with_capacity(n);

    for i in 0..n {
        let end = (i + ahead + 1).min(n);
        while hi < end {
            acc.add(series[hi]);
            hi += 1;
        }
        let start = i.saturating_sub(behind);
        while lo < start {
            acc.remove(series[lo]);
            lo += 1;
        }
        if acc.has_cancelled() {
            acc.rebuild(&series[lo..hi]);
        }

        out.push(if acc.count() >= required {
            acc.mean()
        } else {
            f64::NAN
        });
    }

    Ok(out)
}

/// Flat-argument form of [`rolling_mean`].
pub fn rolling_mean_with(
    series: &[f64],
    window: usize,
    center: bool,
    min_periods: Option<usize>,
) -> Result<Vec<f64>> {
    let mut opts = RollingWindow::new(window);
    if center {
        opts = opts.centered();
    }
    if let Some(m) = min_periods {
        opts = opts.min_periods(m);
    }
    rolling_mean(series, opts)
}

/// Largest-magnitude to sum ratio beyond which the running sum is rebuilt.
const CANCELLATION_LIMIT: f64 = 1024.0;

/// Kahan-compensated sum of the observations currently in the window.
///
/// Infinities are counted rather than summed, so they never reach the
/// compensation term.
#[derive(Debug)]
struct RunningSum {
    /// `2^-m` with `2^m > window`.
    scale: f64,
    sum: f64,
    compensation: f64,
    /// Largest scaled magnitude added since the last reset.
    peak: f64,
    finite: usize,
    pos_inf: usize,
    neg_inf: usize,
}

impl RunningSum {
    fn new(window: usize) -> Self {
        let bits = usize::BITS - window.leading_zeros();
        Self {
            scale: 0.5_f64.powi(bits as i32),
            sum: 0.0,
            compensation: 0.0,
            peak: 0.0,
            finite: 0,
            pos_inf: 0,
            neg_inf: 0,
        }
    }

    fn count(&self) -> usize {
        self.finite + self.pos_inf + self.neg_inf
    }

    fn add(&mut self, x: f64) {
        if x.is_nan() {
            return;
        }
        if x == f64::INFINITY {
            self.pos_inf += 1;
        } else if x == f64::NEG_INFINITY {
            self.neg_inf += 1;
        } else {
            self.finite += 1;
            let v = x * self.scale;
            self.peak = self.peak.max(v.abs());
            self.accumulate(v);
        }
    }

    fn remove(&mut self, x: f64) {
        if x.is_nan() {
            return;
        }
        if x == f64::INFINITY {
            self.pos_inf -= 1;
        } else if x == f64::NEG_INFINITY {
            self.neg_inf -= 1;
        } else {
            self.finite -= 1;
            if self.finite == 0 {
                // No finite values left: drop accumulated rounding error.
                self.clear();
            } else {
                self.accumulate(-x * self.scale);
            }
        }
    }

    fn clear(&mut self) {
        self.sum = 0.0;
        self.compensation = 0.0;
        self.peak = 0.0;
    }

    fn accumulate(&mut self, x: f64) {
        let y = x - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    /// `true` if removals have cancelled the sum far below the magnitudes
    /// that went into it, leaving their rounding error dominant.
    fn has_cancelled(&self) -> bool {
        self.finite > 0 && self.peak > CANCELLATION_LIMIT * self.sum.abs()
    }

    /// Re-sums the finite values of `window`; the counts are unchanged.
    fn rebuild(&mut self, window: &[f64]) {
        self.clear();
        for &x in window.iter().filter(|x| x.is_finite()) {
            let v = x * self.scale;
            self.peak = self.peak.max(v.abs());
            self.accumulate(v);
        }
    }

    fn mean(&self) -> f64 {
        match (self.pos_inf > 0, self.neg_inf > 0) {
            (true, true) => f64::NAN,
            (true, false) => f64::INFINITY,
            (false, true) => f64::NEG_INFINITY,
            (false, false) => self.sum / self.finite as f64 / self.scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_series(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
            if e.is_nan() {
                assert!(a.is_nan(), "index {i}: expected NaN, got {a}");
            } else if e.is_infinite() {
                assert_eq!(a, e, "index {i}");
            } else {
                let tol = 1e-12 * e.abs().max(1.0);
                assert!((a - e).abs() < tol, "index {i}: expected {e}, got {a}");
            }
        }
    }

    const SERIES: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

    #[test]
    fn full_window_required_by_default() {
        let out = rolling_mean(&SERIES, RollingWindow::new(3)).unwrap();
        assert_series(&out, &[f64::NAN, f64::NAN, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn partial_windows_with_min_periods() {
        let out = rolling_mean(&SERIES, RollingWindow::new(3).min_periods(1)).unwrap();
        assert_series(&out, &[1.0, 1.5, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn centered_odd_window() {
        let out = rolling_mean(&SERIES, RollingWindow::new(3).centered().min_periods(1)).unwrap();
        assert_series(&out, &[1.5, 2.0, 3.0, 4.0, 4.5]);
    }

    #[test]
    fn centered_even_window() {
        // Window 4 spans [i-2, i+1].
        let out = rolling_mean(&SERIES, RollingWindow::new(4).centered().min_periods(1)).unwrap();
        assert_series(&out, &[1.5, 2.0, 2.5, 3.5, 4.0]);
        let full = rolling_mean(&SERIES, RollingWindow::new(4).centered()).unwrap();
        assert_series(&full, &[f64::NAN, f64::NAN, 2.5, 3.5, f64::NAN]);
    }

    #[test]
    fn missing_values_skipped() {
        let series = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let out = rolling_mean(&series, RollingWindow::new(3).min_periods(2)).unwrap();
        assert_series(&out, &[f64::NAN, f64::NAN, 2.0, 3.5, 4.0]);
    }

    #[test]
    fn all_missing_window_recovers() {
        let series = [f64::NAN, f64::NAN, f64::NAN, 2.0, 4.0];
        let out = rolling_mean(&series, RollingWindow::new(2).min_periods(1)).unwrap();
        assert_series(&out, &[f64::NAN, f64::NAN, f64::NAN, 2.0, 3.0]);
    }

    #[test]
    fn infinity_leaves_the_window() {
        let series = [1.0, f64::INFINITY, 1.0, 1.0, 1.0, 1.0];
        let out = rolling_mean(&series, RollingWindow::new(2).min_periods(1)).unwrap();
        assert_series(&out, &[1.0, f64::INFINITY, f64::INFINITY, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn opposite_infinities_are_undefined() {
        let series = [f64::NEG_INFINITY, f64::INFINITY, 2.0, 4.0];
        let out = rolling_mean(&series, RollingWindow::new(2).min_periods(1)).unwrap();
        assert_series(&out, &[f64::NEG_INFINITY, f64::NAN, f64::INFINITY, 3.0]);
    }

    #[test]
    fn overflowing_values_do_not_poison_later_windows() {
        let series = [1e308, 1e308, 1.0, 2.0, 3.0];
        let out = rolling_mean(&series, RollingWindow::new(2)).unwrap();
        assert_series(&out, &[f64::NAN, 1e308, 5e307, 1.5, 2.5]);

        let series = [f64::MAX, -f64::MAX, f64::MAX, 1.0, 2.0, 3.0];
        let out = rolling_mean(&series, RollingWindow::new(3).min_periods(1)).unwrap();
        assert!(out.iter().all(|v| v.is_finite()), "{out:?}");
        assert_eq!(out[1], 0.0);
        assert_eq!(out[5], 2.0);
    }

    #[test]
    fn window_of_one_is_identity() {
        let out = rolling_mean(&SERIES, RollingWindow::new(1)).unwrap();
        assert_series(&out, &SERIES);
    }

    #[test]
    fn window_longer_than_series() {
        let out = rolling_mean(&SERIES, RollingWindow::new(10).min_periods(1)).unwrap();
        assert_series(&out, &[1.0, 1.5, 2.0, 2.5, 3.0]);
        let strict = rolling_mean(&SERIES, RollingWindow::new(10)).unwrap();
        assert!(strict.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn empty_series() {
        assert!(rolling_mean(&[], RollingWindow::new(3)).unwrap().is_empty());
    }

    #[test]
    fn flat_form_matches_builder() {
        let a = rolling_mean_with(&SERIES, 3, true, Some(1)).unwrap();
        let b = rolling_mean(&SERIES, RollingWindow::new(3).centered().min_periods(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn validation() {
        let err = rolling_mean(&SERIES, RollingWindow::new(0)).unwrap_err();
        assert!(err.to_string().contains("window must be positive"));
        let err = rolling_mean(&SERIES, RollingWindow::new(3).min_periods(0)).unwrap_err();
        assert!(err.to_string().contains("min_periods must be positive"));
        assert!(rolling_mean(&SERIES, RollingWindow::new(3).min_periods(4)).is_err());
    }

    #[test]
    fn options_accessors() {
        let w = RollingWindow::new(7).centered();
        assert_eq!(w.window(), 7);
        assert!(w.is_centered());
        assert_eq!(w.required_periods(), 7);
        assert_eq!(w.min_periods(2).required_periods(), 2);
    }
}
