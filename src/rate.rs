//! Crude rates and two-group rate comparisons.
//!
//! # Formulas
//!
//! ```text
//! rate       = cases / population × scale
//! ratio      = (cases_a / pop_a) / (cases_b / pop_b)
//! difference = (cases_a / pop_a − cases_b / pop_b) × scale
//! ```
//!
//! The ratio is unitless; the difference carries the rate unit. A ratio of 1
//! means no difference between the groups. The choice of reference group
//! (`b`) matters for interpretation of both.
//!
//! # Reference
//!
//! Rothman, K.J., Greenland, S. & Lash, T.L. (2008). *Modern Epidemiology*,
//! 3rd ed., Chapter 4: Measures of Occurrence.

use crate::advisory::{Advisory, Computed};
use crate::error::{ensure_population, ensure_same_length, ensure_scale, IndicatorError, Result};

/// Crude rate per `scale` population units.
///
/// The result is returned even when it is non-finite; in that case a
/// [`Advisory::NonFiniteRate`] is attached.
///
/// # Errors
///
/// `InvalidArgument` if `scale` or `population` is not positive.
///
/// # Examples
///
/// ```
/// use u_indicators::rate::rate_per;
///
/// assert_eq!(rate_per(150.0, 50_000.0, 100_000.0).unwrap().value, 300.0);
/// assert_eq!(rate_per(25.0, 10_000.0, 1_000.0).unwrap().value, 2.5);
/// ```
pub fn rate_per(cases: f64, population: f64, scale: f64) -> Result<Computed<f64>> {
    ensure_scale(scale)?;
    ensure_population("population", population)?;

    let mut out = Computed::clean(cases / population * scale);
    if !out.value.is_finite() {
        out.advise(Advisory::NonFiniteRate { count: 1 });
    }
    Ok(out)
}

/// Element-wise crude rates for paired case and population slices.
///
/// All populations are validated before any rate is computed. At most one
/// [`Advisory::NonFiniteRate`] is attached, counting every non-finite entry.
///
/// # Errors
///
/// `InvalidArgument` if the slices differ in length, `scale` is not
/// positive, or any population is not positive.
pub fn rate_per_each(cases: &[f64], populations: &[f64], scale: f64) -> Result<Computed<Vec<f64>>> {
    ensure_scale(scale)?;
    ensure_same_length("population", cases.len(), populations.len())?;
    for &p in populations {
        ensure_population("population", p)?;
    }

    let rates: Vec<f64> = cases
        .iter()
        .zip(populations)
        .map(|(&c, &p)| c / p * scale)
        .collect();

    let non_finite = rates.iter().filter(|r| !r.is_finite()).count();
    let mut out = Computed::clean(rates);
    if non_finite > 0 {
        out.advise(Advisory::NonFiniteRate { count: non_finite });
    }
    Ok(out)
}

/// Rate ratio (relative risk) of group A against reference group B.
///
/// Both groups having a zero rate yields exactly 1.0.
///
/// # Errors
///
/// `InvalidArgument` if either population is not positive, or if the
/// reference rate is zero while group A's rate is not.
///
/// # Examples
///
/// ```
/// use u_indicators::rate::rate_ratio;
///
/// assert_eq!(rate_ratio(50.0, 10_000.0, 25.0, 10_000.0).unwrap(), 2.0);
/// assert_eq!(rate_ratio(0.0, 10_000.0, 0.0, 10_000.0).unwrap(), 1.0);
/// assert!(rate_ratio(10.0, 10_000.0, 0.0, 10_000.0).is_err());
/// ```
pub fn rate_ratio(cases_a: f64, pop_a: f64, cases_b: f64, pop_b: f64) -> Result<f64> {
    ensure_population("pop_a", pop_a)?;
    ensure_population("pop_b", pop_b)?;

    let rate_a = cases_a / pop_a;
    let rate_b = cases_b / pop_b;

    if rate_b == 0.0 {
        if rate_a == 0.0 {
            return Ok(1.0);
        }
        return Err(IndicatorError::invalid(
            "cases_b",
            cases_b,
            "reference rate is zero, so the ratio is undefined",
        ));
    }

    Ok(rate_a / rate_b)
}

/// Rate difference (group A minus reference group B) per `scale` units.
///
/// Positive values indicate excess cases in group A.
///
/// # Errors
///
/// `InvalidArgument` if `scale` or either population is not positive.
///
/// # Examples
///
/// ```
/// use u_indicators::rate::rate_difference;
///
/// assert_eq!(rate_difference(50.0, 10_000.0, 25.0, 10_000.0, 100_000.0).unwrap(), 250.0);
/// assert_eq!(rate_difference(30.0, 15_000.0, 40.0, 10_000.0, 1_000.0).unwrap(), -2.0);
/// ```
pub fn rate_difference(
    cases_a: f64,
    pop_a: f64,
    cases_b: f64,
    pop_b: f64,
    scale: f64,
) -> Result<f64> {
    ensure_scale(scale)?;
    ensure_population("pop_a", pop_a)?;
    ensure_population("pop_b", pop_b)?;

    let rate_a = cases_a / pop_a * scale;
    let rate_b = cases_b / pop_b * scale;
    Ok(rate_a - rate_b)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rate_matches_formula(
            c in 0.0_f64..1e6,
            p in 1.0_f64..1e8,
            s in 1.0_f64..1e6,
        ) {
            let r = rate_per(c, p, s).unwrap().value;
            prop_assert_eq!(r, c / p * s);
        }

        #[test]
        fn rate_linear_in_cases(
            c in 0.0_f64..1e5,
            p in 1.0_f64..1e7,
            k in 1.0_f64..100.0,
        ) {
            let base = rate_per(c, p, 100_000.0).unwrap().value;
            let scaled = rate_per(c * k, p, 100_000.0).unwrap().value;
            prop_assert!((scaled - base * k).abs() <= 1e-9 * scaled.abs().max(1.0));
            let halved = rate_per(c, p * k, 100_000.0).unwrap().value;
            prop_assert!((halved * k - base).abs() <= 1e-9 * base.abs().max(1.0));
        }

        #[test]
        fn difference_flips_sign_on_swap(
            ca in 0.0_f64..1e4, pa in 1.0_f64..1e6,
            cb in 0.0_f64..1e4, pb in 1.0_f64..1e6,
        ) {
            let ab = rate_difference(ca, pa, cb, pb, 100_000.0).unwrap();
            let ba = rate_difference(cb, pb, ca, pa, 100_000.0).unwrap();
            prop_assert_eq!(ab, -ba);
        }

        #[test]
        fn ratio_is_pure(
            ca in 0.0_f64..1e4, pa in 1.0_f64..1e6,
            cb in 1.0_f64..1e4, pb in 1.0_f64..1e6,
        ) {
            let first = rate_ratio(ca, pa, cb, pb).unwrap();
            let second = rate_ratio(ca, pa, cb, pb).unwrap();
            prop_assert_eq!(first.to_bits(), second.to_bits());
            prop_assert!(first >= 0.0);
        }
    }
}
