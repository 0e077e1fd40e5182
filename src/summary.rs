//! Report-ready combinations of the core indicators.
//!
//! Report tables rarely show a single number: a row usually carries the
//! rate, its interval, and a reliability flag; a comparison shows both rates
//! with their ratio and difference; an age-stratified region shows crude and
//! standardized rates side by side. These helpers compute those rows from a
//! shared [`IndicatorConfig`] so that every table in a report uses the same
//! unit, confidence level, and cutoff.

use serde::Serialize;

use crate::advisory::Computed;
use crate::config::IndicatorConfig;
use crate::error::Result;
use crate::flags::flag_small_numbers;
use crate::interval::{poisson_rate_ci, ConfidenceInterval};
use crate::rate::{rate_difference, rate_per, rate_ratio};
use crate::standardization::{age_standardize_strata, Stratum};

/// Crude rate with its exact Poisson interval and small-number flag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateSummary {
    pub cases: f64,
    pub population: f64,
    pub rate: f64,
    pub interval: ConfidenceInterval,
    /// `true` if `cases` is below the configured threshold.
    pub small_number: bool,
}

/// Rates of two groups with their ratio (A / B) and difference (A − B).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupComparison {
    pub rate_a: f64,
    pub rate_b: f64,
    pub ratio: f64,
    pub difference: f64,
}

/// Crude and directly standardized rates for one stratified population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandardizedSummary {
    pub total_cases: f64,
    pub total_population: f64,
    pub crude_rate: f64,
    pub standardized_rate: f64,
    /// `true` if the total case count is below the configured threshold.
    pub small_number: bool,
}

/// Summarizes one `cases / population` row.
///
/// # Errors
///
/// Any `InvalidArgument` raised by [`rate_per`] or [`poisson_rate_ci`], or
/// by the configuration.
///
/// # Examples
///
/// ```
/// use u_indicators::config::IndicatorConfig;
/// use u_indicators::summary::summarize_rate;
///
/// let row = summarize_rate(3.0, 20_000.0, &IndicatorConfig::default()).unwrap().value;
/// assert!((row.rate - 15.0).abs() < 1e-9);
/// assert!(row.small_number);
/// assert!(row.interval.contains(row.rate));
/// ```
pub fn summarize_rate(
    cases: f64,
    population: f64,
    config: &IndicatorConfig,
) -> Result<Computed<RateSummary>> {
    config.validate()?;

    let mut out = Computed::clean(());
    let rate = out.absorb(rate_per(cases, population, config.scale)?);
    let interval = poisson_rate_ci(cases, population, config.scale, config.alpha)?;

    Ok(out.map(|()| RateSummary {
        cases,
        population,
        rate,
        interval,
        small_number: flag_small_numbers(cases, config.small_number_threshold),
    }))
}

/// Compares group A against reference group B, each given as
/// `(cases, population)`.
///
/// # Errors
///
/// `InvalidArgument` if either population is not positive, the scale is
/// invalid, or B's rate is zero while A's is not.
pub fn compare_groups(
    a: (f64, f64),
    b: (f64, f64),
    config: &IndicatorConfig,
) -> Result<GroupComparison> {
    config.validate()?;

    let (cases_a, pop_a) = a;
    let (cases_b, pop_b) = b;

    let ratio = rate_ratio(cases_a, pop_a, cases_b, pop_b)?;
    let difference = rate_difference(cases_a, pop_a, cases_b, pop_b, config.scale)?;
    let rate_a = rate_per(cases_a, pop_a, config.scale)?.into_value();
    let rate_b = rate_per(cases_b, pop_b, config.scale)?.into_value();

    Ok(GroupComparison {
        rate_a,
        rate_b,
        ratio,
        difference,
    })
}

/// Crude and age-standardized rates for a stratified population.
///
/// The crude rate uses the totals over all strata; the standardized rate
/// follows [`age_standardize_strata`] and carries its advisories.
///
/// # Errors
///
/// Any `InvalidArgument` from standardization, or if the total population
/// is zero.
pub fn summarize_strata(
    strata: &[Stratum],
    config: &IndicatorConfig,
) -> Result<Computed<StandardizedSummary>> {
    config.validate()?;

    let mut out = Computed::clean(());
    let standardized_rate = out.absorb(age_standardize_strata(strata, config.scale)?);

    let total_cases: f64 = strata.iter().map(|s| s.cases).sum();
    let total_population: f64 = strata.iter().map(|s| s.population).sum();
    let crude_rate = out.absorb(rate_per(total_cases, total_population, config.scale)?);

    Ok(out.map(|()| StandardizedSummary {
        total_cases,
        total_population,
        crude_rate,
        standardized_rate,
        small_number: flag_small_numbers(total_cases, config.small_number_threshold),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::Advisory;

    fn stratum(age_group: &str, cases: f64, population: f64, weight: f64) -> Stratum {
        Stratum {
            age_group: age_group.to_string(),
            cases,
            population,
            weight,
        }
    }

    #[test]
    fn rate_row() {
        let cfg = IndicatorConfig::default();
        let row = summarize_rate(150.0, 50_000.0, &cfg).unwrap();
        assert!(!row.has_advisories());
        let row = row.into_value();
        assert_eq!(row.rate, 300.0);
        assert!(!row.small_number);
        assert!(row.interval.lower < 300.0 && 300.0 < row.interval.upper);
    }

    #[test]
    fn rate_row_respects_config() {
        let cfg = IndicatorConfig::default().with_scale(1000.0).with_threshold(200);
        let row = summarize_rate(150.0, 50_000.0, &cfg).unwrap().value;
        assert_eq!(row.rate, 3.0);
        assert!(row.small_number);
    }

    #[test]
    fn rate_row_validation() {
        let cfg = IndicatorConfig::default();
        assert!(summarize_rate(10.0, 0.0, &cfg).is_err());
        assert!(summarize_rate(-1.0, 100.0, &cfg).is_err());
        assert!(summarize_rate(10.0, 100.0, &cfg.with_alpha(2.0)).is_err());
    }

    #[test]
    fn comparison() {
        let cfg = IndicatorConfig::default();
        let cmp = compare_groups((50.0, 10_000.0), (25.0, 10_000.0), &cfg).unwrap();
        assert_eq!(cmp.rate_a, 500.0);
        assert_eq!(cmp.rate_b, 250.0);
        assert_eq!(cmp.ratio, 2.0);
        assert_eq!(cmp.difference, 250.0);
    }

    #[test]
    fn comparison_zero_reference() {
        let cfg = IndicatorConfig::default();
        assert!(compare_groups((10.0, 10_000.0), (0.0, 10_000.0), &cfg).is_err());
        let cmp = compare_groups((0.0, 10_000.0), (0.0, 10_000.0), &cfg).unwrap();
        assert_eq!(cmp.ratio, 1.0);
        assert_eq!(cmp.difference, 0.0);
    }

    #[test]
    fn stratified_region() {
        let rows = [
            stratum("0-39", 10.0, 10_000.0, 0.4),
            stratum("40-64", 20.0, 8_000.0, 0.35),
            stratum("65+", 50.0, 5_000.0, 0.25),
        ];
        let s = summarize_strata(&rows, &IndicatorConfig::default()).unwrap();
        assert!(!s.has_advisories());
        let s = s.into_value();
        assert_eq!(s.total_cases, 80.0);
        assert_eq!(s.total_population, 23_000.0);
        assert!((s.crude_rate - 80.0 / 23_000.0 * 100_000.0).abs() < 1e-9);
        assert!((s.standardized_rate - 377.5).abs() < 1e-9);
        assert!(!s.small_number);
    }

    #[test]
    fn stratified_region_keeps_advisories() {
        let rows = [stratum("0-39", 10.0, 10_000.0, 0.5), stratum("65+", 2.0, 0.0, 0.5)];
        let s = summarize_strata(&rows, &IndicatorConfig::default()).unwrap();
        assert_eq!(
            s.advisories,
            vec![Advisory::ExcludedZeroPopulationCases {
                strata: 1,
                cases: 2.0
            }]
        );
        assert_eq!(s.value.total_cases, 12.0);
    }

    #[test]
    fn summary_serializes() {
        let row = summarize_rate(3.0, 20_000.0, &IndicatorConfig::default()).unwrap();
        let json = serde_json::to_value(&row).unwrap();
        assert!((json["value"]["rate"].as_f64().unwrap() - 15.0).abs() < 1e-9);
        assert_eq!(json["value"]["small_number"], true);
        assert!(json["advisories"].as_array().unwrap().is_empty());
    }
}
