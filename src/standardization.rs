//! Direct age standardization.
//!
//! A directly standardized rate is a weighted average of stratum-specific
//! (usually age-specific) rates, with the weights taken from a fixed standard
//! population. Two populations standardized to the same standard can be
//! compared without their differing age structures confounding the result.
//!
//! The value is a **comparative index**, not the rate of any real population:
//! its magnitude depends entirely on the chosen standard. Only compare rates
//! standardized to the same weights.
//!
//! # Algorithm
//!
//! ```text
//! w_i  = weight_i / Σ weight                         (normalize)
//! keep = { i : population_i > 0 }
//! w'_i = w_i / Σ_{j ∈ keep} w_j,  i ∈ keep           (renormalize over kept strata)
//! ASR  = scale × Σ_{i ∈ keep} (cases_i / population_i) × w'_i
//! ```
//!
//! Cases in strata with zero population cannot contribute a rate and are
//! dropped; when that happens an [`Advisory::ExcludedZeroPopulationCases`]
//! is attached to the result.
//!
//! # Reference
//!
//! Ahmad, O.B. et al. (2001). "Age standardization of rates: a new WHO
//! standard", *GPE Discussion Paper Series* No. 31, World Health Organization.

use serde::{Deserialize, Serialize};

use crate::advisory::{Advisory, Computed};
use crate::error::{ensure_non_negative, ensure_same_length, ensure_scale, IndicatorError, Result};

/// One stratum of an age-stratified table.
///
/// Field names follow the usual column layout of stratified case tables
/// (`age_group, cases, population, weight`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stratum {
    pub age_group: String,
    pub cases: f64,
    pub population: f64,
    /// Standard population weight; need not sum to one across strata.
    pub weight: f64,
}

/// Directly age-standardized rate per `scale` population units.
///
/// `counts`, `populations`, and `weights` are parallel, one entry per
/// stratum. Weights are normalized, so `[40, 35, 25]` and `[0.4, 0.35, 0.25]`
/// give the same rate.
///
/// # Errors
///
/// `InvalidArgument` if the slices differ in length, any entry is negative
/// or non-finite, the weights do not sum to a positive value, `scale` is not
/// positive, or no stratum with positive population carries weight.
///
/// # Examples
///
/// ```
/// use u_indicators::standardization::direct_age_standardized_rate;
///
/// let asr = direct_age_standardized_rate(
///     &[10.0, 20.0, 50.0],
///     &[10_000.0, 8_000.0, 5_000.0],
///     &[0.4, 0.35, 0.25],
///     100_000.0,
/// )
/// .unwrap();
/// assert!((asr.value - 377.5).abs() < 1e-9);
/// ```
pub fn direct_age_standardized_rate(
    counts: &[f64],
    populations: &[f64],
    weights: &[f64],
    scale: f64,
) -> Result<Computed<f64>> {
    ensure_scale(scale)?;
    ensure_same_length("populations", counts.len(), populations.len())?;
    ensure_same_length("weights", counts.len(), weights.len())?;
    for &c in counts {
        ensure_non_negative("counts", c)?;
    }
    for &p in populations {
        ensure_non_negative("populations", p)?;
    }
    for &w in weights {
        ensure_non_negative("weights", w)?;
    }

    let weight_sum: f64 = weights.iter().sum();
    if weight_sum <= 0.0 {
        return Err(IndicatorError::invalid(
            "weights",
            weight_sum,
            "standard weights must sum to a positive value",
        ));
    }
    let normalized: Vec<f64> = weights.iter().map(|w| w / weight_sum).collect();

    let mut out = Computed::clean(0.0);

    let excluded = populations.iter().filter(|&&p| p == 0.0).count();
    let retained_weight: f64 = if excluded == 0 {
        1.0
    } else {
        let (strata, cases) = counts
            .iter()
            .zip(populations)
            .filter(|&(&c, &p)| p == 0.0 && c > 0.0)
            .fold((0usize, 0.0), |(n, total), (&c, _)| (n + 1, total + c));
        if cases > 0.0 {
            out.advise(Advisory::ExcludedZeroPopulationCases { strata, cases });
        }

        let kept: f64 = normalized
            .iter()
            .zip(populations)
            .filter(|&(_, &p)| p > 0.0)
            .map(|(&w, _)| w)
            .sum();
        if kept <= 0.0 {
            return Err(IndicatorError::invalid(
                "populations",
                format!("{excluded} of {} strata empty", populations.len()),
                "at least one weighted stratum must have positive population",
            ));
        }
        kept
    };

    let weighted: f64 = counts
        .iter()
        .zip(populations)
        .zip(&normalized)
        .filter(|&((_, &p), _)| p > 0.0)
        .map(|((&c, &p), &w)| c / p * (w / retained_weight))
        .sum();

    out.value = weighted * scale;
    Ok(out)
}

/// [`direct_age_standardized_rate`] over a table of [`Stratum`] rows.
pub fn age_standardize_strata(strata: &[Stratum], scale: f64) -> Result<Computed<f64>> {
    let counts: Vec<f64> = strata.iter().map(|s| s.cases).collect();
    let populations: Vec<f64> = strata.iter().map(|s| s.population).collect();
    let weights: Vec<f64> = strata.iter().map(|s| s.weight).collect();
    direct_age_standardized_rate(&counts, &populations, &weights, scale)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn strata() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
        proptest::collection::vec((0.0_f64..1e3, 1.0_f64..1e6, 0.01_f64..1.0), 1..=10)
    }

    proptest! {
        #[test]
        fn weight_scale_invariance(rows in strata(), k in 0.001_f64..1e4) {
            let counts: Vec<f64> = rows.iter().map(|r| r.0).collect();
            let pops: Vec<f64> = rows.iter().map(|r| r.1).collect();
            let weights: Vec<f64> = rows.iter().map(|r| r.2).collect();
            let scaled: Vec<f64> = weights.iter().map(|w| w * k).collect();
            let a = direct_age_standardized_rate(&counts, &pops, &weights, 100_000.0)
                .unwrap()
                .value;
            let b = direct_age_standardized_rate(&counts, &pops, &scaled, 100_000.0)
                .unwrap()
                .value;
            prop_assert!((a - b).abs() <= 1e-9 * a.abs().max(1.0), "{} vs {}", a, b);
        }

        #[test]
        fn bounded_by_stratum_rates(rows in strata()) {
            let counts: Vec<f64> = rows.iter().map(|r| r.0).collect();
            let pops: Vec<f64> = rows.iter().map(|r| r.1).collect();
            let weights: Vec<f64> = rows.iter().map(|r| r.2).collect();
            let asr = direct_age_standardized_rate(&counts, &pops, &weights, 1.0).unwrap().value;
            let rates: Vec<f64> = counts.iter().zip(&pops).map(|(c, p)| c / p).collect();
            let lo = rates.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = rates.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(asr >= lo - 1e-12 && asr <= hi + 1e-12);
        }
    }
}
