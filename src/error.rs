//! Error vocabulary shared by every indicator.
//!
//! All preconditions are checked before any arithmetic runs. A violation
//! aborts the call with [`IndicatorError::InvalidArgument`], naming the
//! argument, the value it had, and the constraint it broke.

use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("invalid argument `{argument}` = {value}: {constraint}")]
    InvalidArgument {
        argument: &'static str,
        value: String,
        constraint: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, IndicatorError>;

impl IndicatorError {
    pub(crate) fn invalid(
        argument: &'static str,
        value: impl Display,
        constraint: &'static str,
    ) -> Self {
        tracing::debug!(argument, %value, constraint, "rejected indicator argument");
        Self::InvalidArgument {
            argument,
            value: value.to_string(),
            constraint,
        }
    }

    /// Name of the offending argument.
    pub fn argument(&self) -> &'static str {
        match self {
            Self::InvalidArgument { argument, .. } => *argument,
        }
    }

    /// The constraint the argument violated.
    pub fn constraint(&self) -> &'static str {
        match self {
            Self::InvalidArgument { constraint, .. } => *constraint,
        }
    }
}

pub(crate) fn ensure_positive(argument: &'static str, value: f64) -> Result<()> {
    ensure_positive_with(argument, value, "must be a finite value greater than zero")
}

fn ensure_positive_with(
    argument: &'static str,
    value: f64,
    constraint: &'static str,
) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(IndicatorError::invalid(argument, value, constraint))
    }
}

pub(crate) fn ensure_non_negative(argument: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(IndicatorError::invalid(
            argument,
            value,
            "must be a finite value of at least zero",
        ))
    }
}

pub(crate) fn ensure_scale(scale: f64) -> Result<()> {
    ensure_positive("scale", scale)
}

pub(crate) fn ensure_population(argument: &'static str, population: f64) -> Result<()> {
    ensure_positive_with(argument, population, "population must be positive")
}

pub(crate) fn ensure_alpha(alpha: f64) -> Result<()> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(IndicatorError::invalid(
            "alpha",
            alpha,
            "must lie strictly between 0 and 1",
        ))
    }
}

pub(crate) fn ensure_same_length(
    argument: &'static str,
    expected: usize,
    actual: usize,
) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(IndicatorError::invalid(
            argument,
            format!("length {actual}"),
            "all inputs must have the same length",
        ))
    }
}
