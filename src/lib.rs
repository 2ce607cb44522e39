//! # risk-assess
//!
//! Moment-based risk bounds for stochastic trajectories.
//!
//! Given a trajectory model whose terminal position is a polynomial in
//! independent random inputs, and a safety function `p(x, y)` that is
//! `<= 0` exactly when the trajectory is unsafe, this crate computes:
//! - the first two moments `E[p]` and `E[p^2]` in closed form
//! - a one-sided (Cantelli) upper bound on `P(p <= 0)`
//! - a Monte Carlo violation frequency as an independent cross-check
//!
//! Random inputs are described by [`random::RandomVariable`]s with exact
//! raw moments: constants, scaled Beta variables, and sine/cosine of sums
//! of independent variables.
//!
//! ## Quick Start
//!
//! ```
//! use risk_assess::model::{KinematicModel, TrajectoryInput};
//! use risk_assess::random::{RandomVector, ScaledBeta};
//! use risk_assess::safety::HalfPlane;
//! use risk_assess::{Config, ProbabilityBound, StochasticVerificationFunction};
//!
//! // Three Euler steps, random accelerations in [0, 0.5]
//! let model = KinematicModel::new(3, 0.5);
//! let mut accelerations = RandomVector::default();
//! for _ in 0..3 {
//!     accelerations.push(ScaledBeta::new(2.0, 2.0, 0.5)?);
//! }
//!
//! // Unsafe once x >= 4
//! let verification = StochasticVerificationFunction::new(HalfPlane::new(-1.0, 0.0, 4.0), model)
//!     .config(Config::quick().seed(7))
//!     .compile()?
//!     .bind(accelerations)?;
//!
//! let input = TrajectoryInput { x0: 0.0, y0: 0.0, v0: 1.0, thetas: vec![0.0; 3] };
//! let report = verification.compute_prob_bound(&input)?;
//! let estimate = verification.monte_carlo(&input, 0.5)?;
//!
//! match report.bound {
//!     ProbabilityBound::Certified(p) => assert!(estimate.probability <= p),
//!     ProbabilityBound::Inconclusive => unreachable!("E[p] is positive here"),
//! }
//! # Ok::<(), risk_assess::RiskError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod error;
mod result;
mod types;

// Functional modules
pub mod math;
pub mod model;
pub mod output;
pub mod random;
pub mod safety;
pub mod symbolic;
pub mod verification;

// Re-exports for public API
pub use config::Config;
pub use constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_MONTE_CARLO_SAMPLES, DEFAULT_SEED, DEFAULT_VARIANCE_TOLERANCE,
};
pub use error::{Result, RiskError};
pub use result::{BoundReport, MonteCarloEstimate, ProbabilityBound};
pub use types::{Complex64, Exponents, VectorN};
pub use verification::{
    chebyshev_bound, BoundVerification, CompiledVerification, StochasticVerificationFunction,
};
