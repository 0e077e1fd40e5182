//! Small-number reliability flags.
//!
//! Rates built on few events have wide intervals and jump around between
//! reporting periods. A flag marks such estimates so reports can annotate
//! or suppress them. It is an advisory marker, not a suppression rule;
//! jurisdictions set their own cutoffs. Common choices:
//!
//! | Cutoff | Typical reading |
//! |--------|-----------------|
//! | n < 5  | Very unstable, often suppressed |
//! | n < 10 | Unstable, interpret with caution |
//! | n < 20 | Wide confidence interval |

/// Returns `true` if `cases` is strictly below `threshold`.
///
/// # Examples
///
/// ```
/// use u_indicators::flags::flag_small_numbers;
///
/// assert!(flag_small_numbers(3.0, 5));
/// assert!(!flag_small_numbers(5.0, 5));
/// ```
pub fn flag_small_numbers(cases: f64, threshold: i64) -> bool {
    cases < threshold as f64
}

/// Element-wise [`flag_small_numbers`].
pub fn flag_small_numbers_each(cases: &[f64], threshold: i64) -> Vec<bool> {
    cases.iter().map(|&c| flag_small_numbers(c, threshold)).collect()
}
