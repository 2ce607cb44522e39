//! Moment-based verification of a safety function over a stochastic
//! trajectory model.
//!
//! The pipeline is a chain of typestates, each transition consuming the
//! previous stage:
//!
//! ```text
//! StochasticVerificationFunction --compile()--> CompiledVerification
//!                                --bind(rv)--> BoundVerification
//! ```
//!
//! Only a [`BoundVerification`] can evaluate moments, so computing a bound
//! before compiling or binding is a type error rather than a runtime one.
//!
//! # Example
//!
//! ```
//! use risk_assess::model::PolynomialModel;
//! use risk_assess::random::{Constant, RandomVector};
//! use risk_assess::safety::HalfPlane;
//! use risk_assess::symbolic::Polynomial;
//! use risk_assess::{ProbabilityBound, StochasticVerificationFunction};
//!
//! // x = a, y = 0, p(x, y) = x
//! let model = PolynomialModel::new(["a"], Vec::<String>::new(), Polynomial::variable(0), Polynomial::zero())?;
//! let mut rv = RandomVector::default();
//! rv.push(Constant::new(5.0));
//!
//! let verification = StochasticVerificationFunction::new(HalfPlane::new(1.0, 0.0, 0.0), model)
//!     .compile()?
//!     .bind(rv)?;
//! let report = verification.compute_prob_bound(&Vec::new())?;
//!
//! assert_eq!(report.first_moment, 5.0);
//! assert_eq!(report.second_moment, 25.0);
//! assert_eq!(report.bound, ProbabilityBound::Certified(0.0));
//! # Ok::<(), risk_assess::RiskError>(())
//! ```

mod artifacts;
mod bound;
mod monte_carlo;

pub use artifacts::{MomentArtifacts, TermPairing};
pub use bound::{chebyshev_bound, joint_moment};

use crate::config::Config;
use crate::error::{ensure_finite, Result, RiskError};
use crate::model::TrajectoryModel;
use crate::random::RandomVector;
use crate::result::BoundReport;
use crate::safety::SafetyFunction;
use crate::types::{Exponents, VectorN};

use bound::checked_variance;

// ============================================================================
// Stage 1: uncompiled
// ============================================================================

/// A safety function paired with a trajectory model, not yet compiled.
#[derive(Debug, Clone)]
pub struct StochasticVerificationFunction<P, M> {
    safety: P,
    model: M,
    config: Config,
}

impl<P: SafetyFunction, M: TrajectoryModel> StochasticVerificationFunction<P, M> {
    /// Pair `safety` with `model` using the default [`Config`].
    pub fn new(safety: P, model: M) -> Self {
        Self {
            safety,
            model,
            config: Config::default(),
        }
    }

    /// Replace the configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Expand the safety function at the model's symbolic final state and
    /// derive the first- and second-moment structure.
    ///
    /// # Errors
    ///
    /// [`RiskError::DimensionMismatch`] if the model's final state refers to
    /// inputs it does not declare.
    pub fn compile(self) -> Result<CompiledVerification<P, M>> {
        let artifacts = MomentArtifacts::compile(&self.safety, &self.model)?;
        Ok(CompiledVerification {
            safety: self.safety,
            model: self.model,
            config: self.config,
            artifacts,
        })
    }
}

// ============================================================================
// Stage 2: compiled
// ============================================================================

/// Compiled moment artifacts awaiting a random vector.
#[derive(Debug, Clone)]
pub struct CompiledVerification<P, M> {
    safety: P,
    model: M,
    config: Config,
    artifacts: MomentArtifacts,
}

impl<P: SafetyFunction, M: TrajectoryModel> CompiledVerification<P, M> {
    /// The compiled monomials and coefficients.
    pub fn artifacts(&self) -> &MomentArtifacts {
        &self.artifacts
    }

    /// Attach the distribution of the random inputs.
    ///
    /// Entry `i` of `random_vector` is the distribution of the model's
    /// `i`-th random input.
    ///
    /// # Errors
    ///
    /// - [`RiskError::DimensionMismatch`] if the vector length differs from
    ///   the model's random-input count.
    /// - [`RiskError::InvalidConfig`] if the configuration fails validation.
    pub fn bind(self, random_vector: RandomVector) -> Result<BoundVerification<P, M>> {
        if random_vector.len() != self.artifacts.n_random() {
            return Err(RiskError::DimensionMismatch {
                what: "random vector entries",
                expected: self.artifacts.n_random(),
                actual: random_vector.len(),
            });
        }
        self.config.validate().map_err(RiskError::InvalidConfig)?;

        Ok(BoundVerification {
            safety: self.safety,
            model: self.model,
            config: self.config,
            artifacts: self.artifacts,
            random_vector,
        })
    }
}

// ============================================================================
// Stage 3: bound
// ============================================================================

/// Compiled artifacts with a bound random vector; ready to evaluate.
///
/// Immutable and `Sync`: one value can serve concurrent evaluations.
#[derive(Debug)]
pub struct BoundVerification<P, M> {
    safety: P,
    model: M,
    config: Config,
    artifacts: MomentArtifacts,
    random_vector: RandomVector,
}

impl<P: SafetyFunction, M: TrajectoryModel> BoundVerification<P, M> {
    /// The compiled monomials and coefficients.
    pub fn artifacts(&self) -> &MomentArtifacts {
        &self.artifacts
    }

    /// The bound random vector.
    pub fn random_vector(&self) -> &RandomVector {
        &self.random_vector
    }

    /// The active configuration.
    pub fn configuration(&self) -> &Config {
        &self.config
    }

    /// Joint moments of every first- and second-moment monomial.
    ///
    /// Per-variable orders are the highest exponent each random input
    /// reaches in the second-moment monomials; joint moments factor over the
    /// independent inputs.
    ///
    /// # Errors
    ///
    /// Any error from the random variables, or [`RiskError::NonFinite`] for
    /// a NaN or infinite joint moment.
    pub fn compute_rv_moments(&self) -> Result<(Vec<f64>, Vec<f64>)> {
        let max_orders = self.artifacts.max_orders();
        tracing::debug!(?max_orders, "requesting per-variable moments");

        let per_variable = self.random_vector.compute_vector_moments(&max_orders)?;
        let joint = |monomials: &[Exponents]| -> Result<Vec<f64>> {
            monomials
                .iter()
                .map(|e| ensure_finite("joint moment", joint_moment(&per_variable, e)))
                .collect()
        };

        Ok((
            joint(self.artifacts.first_monomials())?,
            joint(self.artifacts.second_monomials())?,
        ))
    }

    /// `E[p]`, `E[p^2]` and the one-sided bound on `P(p <= 0)` at the given
    /// deterministic inputs.
    ///
    /// # Errors
    ///
    /// - [`RiskError::DimensionMismatch`] if the model listifies `input` to
    ///   the wrong length.
    /// - [`RiskError::NonFinite`] for NaN or infinite coefficients, joint
    ///   moments or moments of `p`.
    /// - [`RiskError::InvalidParameters`] if `E[p^2] < E[p]^2` beyond the
    ///   configured tolerance.
    pub fn compute_prob_bound(&self, input: &M::Input) -> Result<BoundReport> {
        let values = self.model.listify_input_vars(input);
        let first_coefs = self.artifacts.first_coefficients(&values)?;
        let second_coefs = self.artifacts.second_coefficients(&first_coefs);
        let (mono1_moments, mono2_moments) = self.compute_rv_moments()?;

        let first_moment = ensure_finite(
            "first moment",
            VectorN::from_vec(first_coefs).dot(&VectorN::from_vec(mono1_moments)),
        )?;
        let second_moment = ensure_finite(
            "second moment",
            VectorN::from_vec(second_coefs).dot(&VectorN::from_vec(mono2_moments)),
        )?;

        let variance = checked_variance(first_moment, second_moment, self.config.variance_tolerance)?;
        let bound = chebyshev_bound(first_moment, first_moment * first_moment + variance);

        tracing::debug!(first_moment, second_moment, variance, %bound, "evaluated bound");

        Ok(BoundReport {
            first_moment,
            second_moment,
            variance,
            bound,
            n_first_terms: self.artifacts.first_monomials().len(),
            n_second_terms: self.artifacts.second_monomials().len(),
        })
    }
}
