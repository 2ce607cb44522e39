//! Configuration for bound evaluation and Monte Carlo cross-checks.

use std::time::Duration;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_MONTE_CARLO_SAMPLES, DEFAULT_SEED, DEFAULT_VARIANCE_TOLERANCE,
};

/// Configuration options for a bound verification.
///
/// The analytic bound itself has no tuning knobs; these settings cover the
/// numeric guard on the variance and the Monte Carlo estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // =========================================================================
    // Monte Carlo
    // =========================================================================
    /// Default number of simulated trajectories for
    /// [`BoundVerification::monte_carlo`](crate::BoundVerification::monte_carlo).
    ///
    /// Default: 10,000.
    pub monte_carlo_samples: usize,

    /// Trials run between time-budget checks.
    ///
    /// Larger batches amortize the clock reads and the parallel fan-out but
    /// react more slowly to the budget. Default: 1,000.
    pub batch_size: usize,

    /// Optional wall-clock budget for a Monte Carlo run.
    ///
    /// When exceeded, the run stops after the current batch and reports the
    /// fraction over the completed trials. Default: None (run to completion).
    pub time_budget: Option<Duration>,

    /// Optional deterministic seed for Monte Carlo sampling.
    ///
    /// Trial `i` always draws from a stream derived from `(seed, i)`, so a
    /// seeded run gives the same count serially and in parallel.
    ///
    /// Default: None (random seed).
    pub seed: Option<u64>,

    // =========================================================================
    // Numeric guards
    // =========================================================================
    /// Relative tolerance for negative variance.
    ///
    /// `E[p^2] - E[p]^2` can come out slightly negative from rounding when
    /// the true variance is zero. Values down to
    /// `-variance_tolerance * E[p]^2` are clamped to 0; anything more
    /// negative means the moments are inconsistent and is reported as an
    /// error. Default: 1e-12.
    pub variance_tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monte_carlo_samples: DEFAULT_MONTE_CARLO_SAMPLES,
            batch_size: DEFAULT_BATCH_SIZE,
            time_budget: None,
            seed: None,
            variance_tolerance: DEFAULT_VARIANCE_TOLERANCE,
        }
    }
}

impl Config {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a quick configuration for development.
    ///
    /// - 2,000 Monte Carlo samples
    /// - 500 trial batches
    /// - 5 second time budget
    pub fn quick() -> Self {
        Self {
            monte_carlo_samples: 2_000,
            batch_size: 500,
            time_budget: Some(Duration::from_secs(5)),
            ..Default::default()
        }
    }

    /// Create a balanced configuration for CI use.
    ///
    /// - 20,000 Monte Carlo samples
    /// - 30 second time budget
    /// - fixed seed, so repeated runs report the same frequency
    pub fn balanced() -> Self {
        Self {
            monte_carlo_samples: 20_000,
            time_budget: Some(Duration::from_secs(30)),
            seed: Some(DEFAULT_SEED),
            ..Default::default()
        }
    }

    /// Create a thorough configuration for detailed cross-checks.
    ///
    /// - 1,000,000 Monte Carlo samples
    /// - 10,000 trial batches
    /// - 5 minute time budget
    pub fn thorough() -> Self {
        Self {
            monte_carlo_samples: 1_000_000,
            batch_size: 10_000,
            time_budget: Some(Duration::from_secs(300)),
            ..Default::default()
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Set the default number of Monte Carlo samples.
    pub fn monte_carlo_samples(mut self, n: usize) -> Self {
        assert!(n > 0, "monte_carlo_samples must be positive");
        self.monte_carlo_samples = n;
        self
    }

    /// Set the Monte Carlo batch size.
    pub fn batch_size(mut self, size: usize) -> Self {
        assert!(size > 0, "batch_size must be positive");
        self.batch_size = size;
        self
    }

    /// Set the Monte Carlo time budget.
    pub fn time_budget(mut self, budget: Duration) -> Self {
        assert!(!budget.is_zero(), "time_budget must be non-zero");
        self.time_budget = Some(budget);
        self
    }

    /// Set the Monte Carlo time budget in seconds.
    pub fn time_budget_secs(self, secs: u64) -> Self {
        self.time_budget(Duration::from_secs(secs))
    }

    /// Set a deterministic seed for Monte Carlo sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the relative negative-variance tolerance.
    pub fn variance_tolerance(mut self, tolerance: f64) -> Self {
        assert!(
            tolerance >= 0.0 && tolerance.is_finite(),
            "variance_tolerance must be finite and non-negative"
        );
        self.variance_tolerance = tolerance;
        self
    }

    /// Check if the configuration is valid.
    ///
    /// Returns an error message if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.monte_carlo_samples == 0 {
            return Err("monte_carlo_samples must be positive".to_string());
        }
        if self.batch_size == 0 {
            return Err("batch_size must be positive".to_string());
        }
        if !(self.variance_tolerance >= 0.0 && self.variance_tolerance.is_finite()) {
            return Err("variance_tolerance must be finite and non-negative".to_string());
        }
        if self.time_budget == Some(Duration::ZERO) {
            return Err("time_budget must be non-zero when set".to_string());
        }
        Ok(())
    }
}
