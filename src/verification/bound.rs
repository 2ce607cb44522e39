//! One-sided moment bound and joint moments under independence.

use crate::error::{Result, RiskError};
use crate::result::ProbabilityBound;

/// Cantelli bound on `P(p <= 0)` from `E[p]` and `E[p^2]`.
///
/// With `E[p] > 0` and `var = E[p^2] - E[p]^2`,
///
/// ```text
/// P(p <= 0) <= var / (var + E[p]^2)
/// ```
///
/// A non-positive (or NaN) first moment gives
/// [`ProbabilityBound::Inconclusive`]. Negative variance is treated as zero
/// here; [`BoundVerification`](crate::BoundVerification) rejects moments
/// whose variance is negative beyond rounding before calling this.
///
/// ```
/// use risk_assess::{chebyshev_bound, ProbabilityBound};
///
/// assert_eq!(chebyshev_bound(2.0, 4.0), ProbabilityBound::Certified(0.0));
/// assert_eq!(chebyshev_bound(1.0, 2.0), ProbabilityBound::Certified(0.5));
/// assert_eq!(chebyshev_bound(-1.0, 3.0), ProbabilityBound::Inconclusive);
/// ```
pub fn chebyshev_bound(first_moment: f64, second_moment: f64) -> ProbabilityBound {
    if first_moment.is_nan() || first_moment <= 0.0 {
        return ProbabilityBound::Inconclusive;
    }

    let mean_sq = first_moment * first_moment;
    let variance = (second_moment - mean_sq).max(0.0);
    let denominator = variance + mean_sq;
    if denominator == 0.0 || !denominator.is_finite() {
        return ProbabilityBound::Inconclusive;
    }

    ProbabilityBound::Certified((variance / denominator).clamp(0.0, 1.0))
}

/// `E[p^2] - E[p]^2`, clamping rounding-level negatives to zero.
///
/// Negatives down to `-tolerance * E[p]^2` are clamped; anything below that
/// means the moments cannot come from one distribution.
pub(crate) fn checked_variance(first_moment: f64, second_moment: f64, tolerance: f64) -> Result<f64> {
    let mean_sq = first_moment * first_moment;
    let variance = second_moment - mean_sq;
    if variance >= 0.0 {
        return Ok(variance);
    }
    if -variance <= tolerance * mean_sq {
        tracing::warn!(variance, first_moment, second_moment, "clamping negative variance to zero");
        return Ok(0.0);
    }
    Err(RiskError::InvalidParameters(format!(
        "inconsistent moments: E[p^2] = {second_moment} is below E[p]^2 = {mean_sq}"
    )))
}

/// Joint moment of independent variables: `prod_v moments[v][e[v]]`.
///
/// `per_variable[v]` must hold moments of variable `v` up to at least
/// `exponents[v]`.
pub fn joint_moment(per_variable: &[Vec<f64>], exponents: &[u32]) -> f64 {
    debug_assert_eq!(per_variable.len(), exponents.len());
    per_variable
        .iter()
        .zip(exponents)
        .map(|(moments, &e)| moments[e as usize])
        .product()
}
