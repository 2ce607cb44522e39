//! Result types for bound evaluation and Monte Carlo estimation.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// ProbabilityBound
// ============================================================================

/// Outcome of the one-sided moment bound on `P(p <= 0)`.
///
/// `Inconclusive` is not "zero risk" and not "unsafe": with `E[p] <= 0` the
/// first two moments cannot bound the violation probability below 1.
/// Callers must branch on it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProbabilityBound {
    /// Certified upper bound on the violation probability, in `[0, 1]`.
    Certified(f64),
    /// `E[p] <= 0`; no bound can be certified.
    Inconclusive,
}

impl ProbabilityBound {
    /// The certified bound, if any.
    pub fn probability(&self) -> Option<f64> {
        match self {
            ProbabilityBound::Certified(p) => Some(*p),
            ProbabilityBound::Inconclusive => None,
        }
    }

    /// Whether a numeric bound was certified.
    pub fn is_certified(&self) -> bool {
        matches!(self, ProbabilityBound::Certified(_))
    }

    /// Whether the violation probability is certified to be at most
    /// `threshold`. Always false when inconclusive.
    pub fn certifies_below(&self, threshold: f64) -> bool {
        matches!(self, ProbabilityBound::Certified(p) if *p <= threshold)
    }
}

impl fmt::Display for ProbabilityBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbabilityBound::Certified(p) => write!(f, "P(violation) <= {:.4}", p),
            ProbabilityBound::Inconclusive => write!(f, "inconclusive (E[p] <= 0)"),
        }
    }
}

// ============================================================================
// BoundReport
// ============================================================================

/// Moments of the safety function and the bound derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundReport {
    /// `E[p]`.
    pub first_moment: f64,

    /// `E[p^2]`.
    pub second_moment: f64,

    /// `E[p^2] - E[p]^2`, after clamping rounding-level negatives to 0.
    pub variance: f64,

    /// The bound on `P(p <= 0)`.
    pub bound: ProbabilityBound,

    /// Number of first-moment monomials evaluated.
    pub n_first_terms: usize,

    /// Number of second-moment monomials evaluated.
    pub n_second_terms: usize,
}

// ============================================================================
// MonteCarloEstimate
// ============================================================================

/// Empirical violation frequency from simulated trajectories.
///
/// Diagnostic only: it carries sampling error and certifies nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloEstimate {
    /// Trajectories that ended with `p <= 0`.
    pub violations: usize,

    /// Trajectories simulated.
    pub samples: usize,

    /// `violations / samples`, in `[0, 1]` (0 when no trial completed).
    pub probability: f64,

    /// Whether the time budget cut the run short.
    pub early_stopped: bool,
}

impl MonteCarloEstimate {
    pub(crate) fn new(violations: usize, samples: usize, early_stopped: bool) -> Self {
        let probability = if samples == 0 {
            0.0
        } else {
            violations as f64 / samples as f64
        };
        Self {
            violations,
            samples,
            probability,
            early_stopped,
        }
    }

    /// Binomial standard error of [`probability`](Self::probability).
    pub fn standard_error(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        (self.probability * (1.0 - self.probability) / self.samples as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_bound_accessors() {
        let certified = ProbabilityBound::Certified(0.2);
        assert_eq!(certified.probability(), Some(0.2));
        assert!(certified.is_certified());
        assert!(certified.certifies_below(0.2));
        assert!(!certified.certifies_below(0.1));

        let inconclusive = ProbabilityBound::Inconclusive;
        assert_eq!(inconclusive.probability(), None);
        assert!(!inconclusive.is_certified());
        assert!(!inconclusive.certifies_below(1.0));
    }

    #[test]
    fn test_monte_carlo_estimate() {
        let estimate = MonteCarloEstimate::new(25, 100, false);
        assert_eq!(estimate.probability, 0.25);
        assert!((estimate.standard_error() - (0.25f64 * 0.75 / 100.0).sqrt()).abs() < 1e-15);

        let empty = MonteCarloEstimate::new(0, 0, true);
        assert_eq!(empty.probability, 0.0);
        assert_eq!(empty.standard_error(), 0.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ProbabilityBound::Certified(0.125).to_string(),
            "P(violation) <= 0.1250"
        );
        assert_eq!(
            ProbabilityBound::Inconclusive.to_string(),
            "inconclusive (E[p] <= 0)"
        );
    }
}
