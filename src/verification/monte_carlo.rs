//! Monte Carlo cross-check of the analytic bound.
//!
//! Each trial samples the bound random vector once (one draw per random
//! input), simulates the model numerically and evaluates the safety function
//! at the terminal position. Trial `i` draws from its own counter-seeded
//! stream, so a seeded run gives the same count serially and in parallel.

use std::ops::Range;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::BoundVerification;
use crate::error::{Result, RiskError};
use crate::math::counter_rng_seed;
use crate::model::TrajectoryModel;
use crate::result::MonteCarloEstimate;
use crate::safety::SafetyFunction;

impl<P: SafetyFunction, M: TrajectoryModel> BoundVerification<P, M> {
    /// Monte Carlo estimate with the configured sample count.
    ///
    /// See [`monte_carlo_result`](Self::monte_carlo_result).
    pub fn monte_carlo(&self, input: &M::Input, dt: f64) -> Result<MonteCarloEstimate> {
        self.monte_carlo_result(input, self.config.monte_carlo_samples, dt)
    }

    /// Fraction of `n_samples` simulated trajectories ending with `p <= 0`.
    ///
    /// Purely diagnostic. Trials run in batches of `config.batch_size`; if a
    /// time budget is configured and spent, the run stops after the current
    /// batch and reports the trials completed so far.
    ///
    /// `dt` drives [`TrajectoryModel::simulate`]. For a time-stepped model it
    /// should equal the model's [`step_length`](TrajectoryModel::step_length):
    /// the analytic bound was compiled with that step, and any other value
    /// simulates a different system. A mismatch is logged, not rejected.
    ///
    /// # Errors
    ///
    /// - [`RiskError::InvalidParameters`] if `n_samples` is zero or `dt` is
    ///   not finite.
    /// - [`RiskError::DimensionMismatch`] if the model listifies `input` to
    ///   the wrong length, as in
    ///   [`compute_prob_bound`](Self::compute_prob_bound).
    pub fn monte_carlo_result(
        &self,
        input: &M::Input,
        n_samples: usize,
        dt: f64,
    ) -> Result<MonteCarloEstimate> {
        if n_samples == 0 {
            return Err(RiskError::InvalidParameters(
                "monte carlo needs at least one sample".to_string(),
            ));
        }
        if !dt.is_finite() {
            return Err(RiskError::InvalidParameters(format!(
                "time step must be finite, got {dt}"
            )));
        }

        let n_inputs = self.model.listify_input_vars(input).len();
        if n_inputs != self.artifacts.n_inputs() {
            return Err(RiskError::DimensionMismatch {
                what: "deterministic input values",
                expected: self.artifacts.n_inputs(),
                actual: n_inputs,
            });
        }
        if let Some(step) = self.model.step_length() {
            if step != dt {
                tracing::warn!(
                    model_dt = step,
                    dt,
                    "monte carlo time step differs from the compiled model's"
                );
            }
        }

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let start = Instant::now();

        let mut violations = 0;
        let mut completed = 0;
        let mut early_stopped = false;

        while completed < n_samples {
            if let Some(budget) = self.config.time_budget {
                if completed > 0 && start.elapsed() >= budget {
                    tracing::warn!(
                        completed,
                        requested = n_samples,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "monte carlo time budget exceeded; returning partial estimate"
                    );
                    early_stopped = true;
                    break;
                }
            }

            let end = (completed + self.config.batch_size).min(n_samples);
            violations += self.count_violations(input, completed..end, seed, dt);
            completed = end;
        }

        let estimate = MonteCarloEstimate::new(violations, completed, early_stopped);
        tracing::debug!(
            violations,
            samples = completed,
            probability = estimate.probability,
            "monte carlo estimate"
        );
        Ok(estimate)
    }

    fn count_violations(&self, input: &M::Input, trials: Range<usize>, seed: u64, dt: f64) -> usize {
        #[cfg(feature = "parallel")]
        let count = trials
            .into_par_iter()
            .filter(|&i| self.trial_violates(input, seed, i, dt))
            .count();

        #[cfg(not(feature = "parallel"))]
        let count = trials
            .filter(|&i| self.trial_violates(input, seed, i, dt))
            .count();

        count
    }

    fn trial_violates(&self, input: &M::Input, seed: u64, trial: usize, dt: f64) -> bool {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(seed, trial as u64));
        let draws = self.random_vector.sample(&mut rng);
        let (x, y) = self.model.simulate(input, &draws, dt);
        self.safety.evaluate(x, y) <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::Config;
    use crate::model::{KinematicModel, PolynomialModel, TrajectoryInput};
    use crate::random::{Constant, RandomVector, ScaledBeta};
    use crate::safety::HalfPlane;
    use crate::symbolic::{Expr, Polynomial};
    use crate::verification::StochasticVerificationFunction;
    use proptest::prelude::*;

    fn identity(offset: f64, rv: RandomVector, config: Config) -> BoundVerification<HalfPlane, PolynomialModel> {
        let model = PolynomialModel::new(
            ["a"],
            Vec::<String>::new(),
            Polynomial::variable(0),
            Polynomial::zero(),
        )
        .unwrap();
        StochasticVerificationFunction::new(HalfPlane::new(1.0, 0.0, offset), model)
            .config(config)
            .compile()
            .unwrap()
            .bind(rv)
            .unwrap()
    }

    fn single(variable: impl crate::random::RandomVariable + 'static) -> RandomVector {
        let mut rv = RandomVector::default();
        rv.push(variable);
        rv
    }

    #[test]
    fn test_deterministic_scenarios() {
        let safe = identity(0.0, single(Constant::new(5.0)), Config::default().seed(1));
        let estimate = safe.monte_carlo_result(&Vec::new(), 500, 0.1).unwrap();
        assert_eq!(estimate.violations, 0);
        assert_eq!(estimate.probability, 0.0);

        let unsafe_ = identity(0.0, single(Constant::new(-5.0)), Config::default().seed(1));
        let estimate = unsafe_.monte_carlo_result(&Vec::new(), 500, 0.1).unwrap();
        assert_eq!(estimate.violations, 500);
        assert_eq!(estimate.probability, 1.0);
        assert!(!estimate.early_stopped);
    }

    #[test]
    fn test_uniform_violation_frequency() {
        // p = a - 0.25 with a ~ U(0, 1): P(p <= 0) = 0.25
        let verification = identity(
            -0.25,
            single(ScaledBeta::new(1.0, 1.0, 1.0).unwrap()),
            Config::default().seed(42),
        );
        let estimate = verification.monte_carlo_result(&Vec::new(), 20_000, 0.1).unwrap();
        assert!((estimate.probability - 0.25).abs() < 5.0 * estimate.standard_error() + 1e-3);
    }

    #[test]
    fn test_seeded_runs_are_reproducible_across_batch_sizes() {
        let run = |batch_size: usize| {
            identity(
                -0.5,
                single(ScaledBeta::new(2.0, 3.0, 1.0).unwrap()),
                Config::default().seed(9).batch_size(batch_size),
            )
            .monte_carlo_result(&Vec::new(), 3_000, 0.1)
            .unwrap()
        };
        let reference = run(3_000);
        assert_eq!(run(1).violations, reference.violations);
        assert_eq!(run(128).violations, reference.violations);
    }

    #[test]
    fn test_serial_count_matches_pipeline_count() {
        let verification = identity(
            -0.4,
            single(ScaledBeta::new(1.5, 1.5, 1.0).unwrap()),
            Config::default().seed(123),
        );
        let estimate = verification.monte_carlo_result(&Vec::new(), 2_000, 0.1).unwrap();
        let serial = (0..2_000)
            .filter(|&i| verification.trial_violates(&Vec::new(), 123, i, 0.1))
            .count();
        assert_eq!(estimate.violations, serial);
    }

    #[test]
    fn test_configured_sample_count() {
        let verification = identity(
            0.0,
            single(Constant::new(1.0)),
            Config::default().monte_carlo_samples(321).seed(0),
        );
        assert_eq!(verification.monte_carlo(&Vec::new(), 0.1).unwrap().samples, 321);
    }

    #[test]
    fn test_time_budget_stops_early() {
        let verification = identity(
            0.0,
            single(ScaledBeta::new(2.0, 2.0, 1.0).unwrap()),
            Config::default()
                .seed(5)
                .batch_size(1)
                .time_budget(Duration::from_nanos(1)),
        );
        let estimate = verification.monte_carlo_result(&Vec::new(), 1_000_000, 0.1).unwrap();
        assert!(estimate.early_stopped);
        assert!(estimate.samples >= 1);
        assert!(estimate.samples < 1_000_000);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let verification = identity(0.0, single(Constant::new(1.0)), Config::default());
        assert!(matches!(
            verification.monte_carlo_result(&Vec::new(), 0, 0.1),
            Err(RiskError::InvalidParameters(_))
        ));
        assert!(matches!(
            verification.monte_carlo_result(&Vec::new(), 10, f64::NAN),
            Err(RiskError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_rejects_short_polynomial_inputs() {
        // x = u * a with one deterministic input u
        let model = PolynomialModel::new(
            ["a"],
            ["u"],
            Polynomial::variable(0) * Polynomial::from(Expr::input(0)),
            Polynomial::zero(),
        )
        .unwrap();
        let verification = StochasticVerificationFunction::new(HalfPlane::new(1.0, 0.0, 0.0), model)
            .config(Config::default().seed(2))
            .compile()
            .unwrap()
            .bind(single(Constant::new(1.0)))
            .unwrap();

        let expected = RiskError::DimensionMismatch {
            what: "deterministic input values",
            expected: 1,
            actual: 0,
        };
        assert_eq!(verification.compute_prob_bound(&Vec::new()), Err(expected.clone()));
        assert_eq!(verification.monte_carlo_result(&Vec::new(), 10, 0.1), Err(expected));
        assert!(verification.monte_carlo_result(&vec![2.0], 10, 0.1).is_ok());
    }

    #[test]
    fn test_rejects_short_heading_list() {
        let model = KinematicModel::new(3, 0.5);
        let mut rv = RandomVector::default();
        for _ in 0..3 {
            rv.push(Constant::new(0.0));
        }
        let verification = StochasticVerificationFunction::new(HalfPlane::new(-1.0, 0.0, 3.0), model)
            .config(Config::default().seed(4))
            .compile()
            .unwrap()
            .bind(rv)
            .unwrap();
        let input = TrajectoryInput {
            x0: 0.0,
            y0: 0.0,
            v0: 1.0,
            thetas: vec![0.0],
        };

        let expected = RiskError::DimensionMismatch {
            what: "deterministic input values",
            expected: 6,
            actual: 4,
        };
        assert_eq!(verification.compute_prob_bound(&input).unwrap_err(), expected);
        assert_eq!(verification.monte_carlo_result(&input, 10, 0.5).unwrap_err(), expected);
    }

    #[test]
    fn test_mismatched_step_still_runs() {
        // Constant speed 2 along x for two steps: x = 2 at dt = 0.5, x = 4 at dt = 1
        let model = KinematicModel::new(2, 0.5);
        let mut rv = RandomVector::default();
        rv.push(Constant::new(0.0));
        rv.push(Constant::new(0.0));
        let verification = StochasticVerificationFunction::new(HalfPlane::new(-1.0, 0.0, 3.0), model)
            .config(Config::default().seed(6))
            .compile()
            .unwrap()
            .bind(rv)
            .unwrap();
        let input = TrajectoryInput {
            x0: 0.0,
            y0: 0.0,
            v0: 2.0,
            thetas: vec![0.0, 0.0],
        };
        assert_eq!(verification.monte_carlo_result(&input, 50, 0.5).unwrap().probability, 0.0);
        assert_eq!(verification.monte_carlo_result(&input, 50, 1.0).unwrap().probability, 1.0);
    }

    #[test]
    fn test_kinematic_straight_line() {
        // Constant zero acceleration, heading along x: x = 2, safe if x < 3.
        let model = KinematicModel::new(2, 0.5);
        let mut rv = RandomVector::default();
        rv.push(Constant::new(0.0));
        rv.push(Constant::new(0.0));
        let verification = StochasticVerificationFunction::new(HalfPlane::new(-1.0, 0.0, 3.0), model)
            .config(Config::default().seed(3))
            .compile()
            .unwrap()
            .bind(rv)
            .unwrap();
        let input = TrajectoryInput {
            x0: 0.0,
            y0: 0.0,
            v0: 2.0,
            thetas: vec![0.0, 0.0],
        };
        let estimate = verification.monte_carlo_result(&input, 100, 0.5).unwrap();
        assert_eq!(estimate.probability, 0.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn fraction_is_a_probability(offset in -1.5f64..0.5, seed in any::<u64>(), n in 1usize..400) {
            let verification = identity(
                offset,
                single(ScaledBeta::new(2.0, 5.0, 1.0).unwrap()),
                Config::default().seed(seed),
            );
            let estimate = verification.monte_carlo_result(&Vec::new(), n, 0.1).unwrap();
            prop_assert_eq!(estimate.samples, n);
            prop_assert!((0.0..=1.0).contains(&estimate.probability));
        }
    }
}
