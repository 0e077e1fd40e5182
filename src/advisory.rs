//! Non-fatal diagnostics attached to a computed value.
//!
//! Some indicators can always produce a number but the number deserves a
//! caveat: a rate that overflowed to infinity, or an age-standardized rate
//! that silently dropped cases from empty strata. Those caveats travel with
//! the value in [`Computed`] instead of aborting the call. Callers decide
//! whether a caveat is fatal for their report.
//!
//! Every advisory is also emitted as a `tracing` warning when recorded.

use std::fmt;

use serde::Serialize;

/// A recoverable condition observed while computing an indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Some results are infinite or NaN, typically from extreme inputs.
    NonFiniteRate {
        /// How many of the returned values are non-finite.
        count: usize,
    },
    /// Strata with zero population were excluded but still carried cases.
    ExcludedZeroPopulationCases {
        /// Number of excluded strata holding cases.
        strata: usize,
        /// Total cases dropped from the estimate.
        cases: f64,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteRate { count } => write!(
                f,
                "{count} result(s) are non-finite (inf or NaN), likely due to extreme inputs"
            ),
            Self::ExcludedZeroPopulationCases { cases, .. } => {
                write!(f, "excluding {cases} cases in zero-population strata")
            }
        }
    }
}

/// A computed value together with the advisories raised while producing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Computed<T> {
    /// The indicator value.
    pub value: T,
    /// Advisories in the order they were raised.
    pub advisories: Vec<Advisory>,
}

impl<T> Computed<T> {
    /// Wraps a value with no advisories.
    pub fn clean(value: T) -> Self {
        Self {
            value,
            advisories: Vec::new(),
        }
    }

    /// Records an advisory and emits it as a warning event.
    pub(crate) fn advise(&mut self, advisory: Advisory) {
        tracing::warn!(advisory = ?advisory, "{advisory}");
        self.advisories.push(advisory);
    }

    /// Returns `true` if any advisory was raised.
    pub fn has_advisories(&self) -> bool {
        !self.advisories.is_empty()
    }

    /// Discards the advisories and returns the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Transforms the value, keeping the advisories.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Computed<U> {
        Computed {
            value: f(self.value),
            advisories: self.advisories,
        }
    }

    /// Moves the advisories of `other` onto `self` and returns `other`'s value.
    pub(crate) fn absorb<U>(&mut self, other: Computed<U>) -> U {
        self.advisories.extend(other.advisories);
        other.value
    }
}
