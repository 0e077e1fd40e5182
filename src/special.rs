//! Chi-square quantiles used by the exact Poisson interval.
//!
//! # Algorithm
//!
//! A chi-square variate with `k` degrees of freedom is twice a gamma variate
//! with shape `a = k/2`, so the quantile is found in gamma space and doubled:
//!
//! ```text
//! lower tail:  P(a, y) = p        (regularized lower incomplete gamma)
//! upper tail:  Q(a, y) = q        (regularized upper incomplete gamma)
//! x = 2y
//! ```
//!
//! The root is seeded with the Wilson–Hilferty approximation (or the
//! small-`y` expansion `P(a, y) ≈ yᵃ / Γ(a + 1)` when that seed is not
//! positive), bracketed by halving/doubling, then refined with Newton steps
//! that fall back to bisection whenever a step leaves the bracket.
//!
//! Upper-tail probabilities are solved against `Q` directly, so `q = 1e-12`
//! keeps full relative precision instead of being rounded through `1 − q`.
//!
//! # References
//!
//! - Wilson, E.B. & Hilferty, M.M. (1931). "The distribution of chi-square",
//!   *PNAS* 17(12), pp. 684-688.
//! - Press, W.H. et al. (2007). *Numerical Recipes*, 3rd ed., Section 6.2.1.

use statrs::function::erf::erfc_inv;
use statrs::function::gamma::{checked_gamma_lr, checked_gamma_ur, ln_gamma};

const MAX_BRACKET_STEPS: usize = 2100;
const MAX_REFINE_STEPS: usize = 200;

/// Quantile (inverse CDF) of the chi-square distribution with `df` degrees
/// of freedom: the `x` with `P(X ≤ x) = p`.
///
/// Returns `None` if `df` is not a positive finite number, `p` lies outside
/// [0, 1], or the root cannot be located. `p = 0` maps to 0 and `p = 1` to
/// infinity.
///
/// # Examples
///
/// ```
/// use u_indicators::special::chi_squared_quantile;
///
/// // With two degrees of freedom the quantile has the closed form -2 ln(1 - p).
/// let q = chi_squared_quantile(0.95, 2.0).unwrap();
/// assert!((q - (-2.0 * 0.05_f64.ln())).abs() < 1e-9);
/// ```
pub fn chi_squared_quantile(p: f64, df: f64) -> Option<f64> {
    if !df.is_finite() || df <= 0.0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if p == 0.0 {
        return Some(0.0);
    }
    if p == 1.0 {
        return Some(f64::INFINITY);
    }
    solve(df / 2.0, Tail::Lower, p).map(|y| 2.0 * y)
}

/// Upper-tail quantile of the chi-square distribution: the `x` with
/// `P(X > x) = q`.
///
/// Equivalent to `chi_squared_quantile(1 - q, df)` but without the loss of
/// precision in `1 - q` when `q` is tiny. Same `None` conditions; `q = 1`
/// maps to 0 and `q = 0` to infinity.
pub fn chi_squared_upper_quantile(q: f64, df: f64) -> Option<f64> {
    if !df.is_finite() || df <= 0.0 || !(0.0..=1.0).contains(&q) {
        return None;
    }
    if q == 1.0 {
        return Some(0.0);
    }
    if q == 0.0 {
        return Some(f64::INFINITY);
    }
    solve(df / 2.0, Tail::Upper, q).map(|y| 2.0 * y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    Lower,
    Upper,
}

/// Below this `y` the incomplete gamma routines snap to zero, so the
/// leading terms of the series are used instead.
const TINY_Y: f64 = 1e-10;

/// Residual that increases with `y` and vanishes at the root.
fn residual(a: f64, tail: Tail, prob: f64, y: f64) -> Option<f64> {
    match tail {
        Tail::Lower if y < TINY_Y => Some(lower_series(a, y) - prob),
        Tail::Upper if y < TINY_Y => Some(prob - 1.0 + lower_series(a, y)),
        Tail::Lower => checked_gamma_lr(a, y).ok().map(|v| v - prob),
        Tail::Upper => checked_gamma_ur(a, y).ok().map(|v| prob - v),
    }
    .filter(|r| !r.is_nan())
}

/// `P(a, y) ≈ yᵃ / Γ(a + 1) · (1 − a·y / (a + 1))` for tiny `y`.
fn lower_series(a: f64, y: f64) -> f64 {
    (a * y.ln() - ln_gamma(a + 1.0)).exp() * (1.0 - a * y / (a + 1.0))
}

/// Gamma(a, 1) density, the derivative of either residual.
fn density(a: f64, y: f64) -> f64 {
    ((a - 1.0) * y.ln() - y - ln_gamma(a)).exp()
}

fn seed(a: f64, tail: Tail, prob: f64) -> f64 {
    let df = 2.0 * a;
    // Standard normal quantile of the lower-tail probability.
    let z = match tail {
        Tail::Lower => -std::f64::consts::SQRT_2 * erfc_inv(2.0 * prob),
        Tail::Upper => std::f64::consts::SQRT_2 * erfc_inv(2.0 * prob),
    };
    let h = 2.0 / (9.0 * df);
    let cube = 1.0 - h + z * h.sqrt();
    let wilson_hilferty = df * cube * cube * cube / 2.0;
    if wilson_hilferty.is_finite() && wilson_hilferty > 0.0 {
        return wilson_hilferty;
    }
    match tail {
        Tail::Lower => {
            let small = ((prob.ln() + ln_gamma(a + 1.0)) / a).exp();
            if small.is_finite() && small > 0.0 {
                small
            } else {
                a
            }
        }
        Tail::Upper => a + 1.0,
    }
}

fn solve(a: f64, tail: Tail, prob: f64) -> Option<f64> {
    let y0 = seed(a, tail, prob);
    let g0 = residual(a, tail, prob, y0)?;
    if g0 == 0.0 {
        return Some(y0);
    }

    // Bracket [lo, hi] with g(lo) <= 0 <= g(hi).
    let (mut lo, mut hi) = (y0, y0);
    if g0 > 0.0 {
        let mut steps = 0;
        loop {
            lo *= 0.5;
            steps += 1;
            if lo <= 0.0 || steps > MAX_BRACKET_STEPS {
                return None;
            }
            if residual(a, tail, prob, lo)? <= 0.0 {
                break;
            }
            hi = lo;
        }
    } else {
        let mut steps = 0;
        loop {
            hi = 2.0 * hi + 1.0;
            steps += 1;
            if !hi.is_finite() || steps > MAX_BRACKET_STEPS {
                return None;
            }
            if residual(a, tail, prob, hi)? >= 0.0 {
                break;
            }
            lo = hi;
        }
    }

    let mut y = 0.5 * (lo + hi);
    for _ in 0..MAX_REFINE_STEPS {
        let g = residual(a, tail, prob, y)?;
        if g == 0.0 {
            return Some(y);
        }
        if g < 0.0 {
            lo = y;
        } else {
            hi = y;
        }
        if hi - lo <= 4.0 * f64::EPSILON * hi {
            return Some(0.5 * (lo + hi));
        }

        let newton = y - g / density(a, y);
        let next = if newton.is_finite() && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
        if (next - y).abs() <= 4.0 * f64::EPSILON * y {
            return Some(next);
        }
        y = next;
    }

    // Residual noise can stall the last bits; accept a tight bracket.
    if hi - lo <= 1e-8 * hi {
        Some(y)
    } else {
        None
    }
}
