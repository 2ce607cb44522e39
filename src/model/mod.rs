//! Trajectory models.
//!
//! A model describes the terminal position `(x, y)` of a trajectory as a
//! polynomial in its random inputs, with coefficients that depend on
//! deterministic runtime inputs. It also knows how to simulate one
//! trajectory from concrete random draws, which the Monte Carlo estimator
//! uses as an independent check of the analytic bound.

mod kinematic;
mod polynomial;

pub use kinematic::{integrate_euler, KinematicModel, TrajectoryInput};
pub use polynomial::PolynomialModel;

use crate::symbolic::Polynomial;

/// Terminal-state model of a stochastic trajectory.
pub trait TrajectoryModel: Send + Sync {
    /// Runtime record the deterministic inputs are extracted from.
    type Input: Sync;

    /// Names of the random inputs, in the order the bound random vector
    /// must follow. Exponent tuples are indexed by this list.
    fn random_variables(&self) -> &[String];

    /// Names of the deterministic inputs taken by compiled coefficients.
    fn input_variables(&self) -> &[String];

    /// Symbolic terminal position `(x, y)`.
    fn final_state(&self) -> (Polynomial, Polynomial);

    /// Deterministic input values aligned with
    /// [`input_variables`](Self::input_variables).
    fn listify_input_vars(&self, input: &Self::Input) -> Vec<f64>;

    /// Terminal position for one draw of the random inputs, integrating with
    /// time step `dt` where the model is time-stepped.
    fn simulate(&self, input: &Self::Input, random: &[f64], dt: f64) -> (f64, f64);

    /// Time step baked into [`final_state`](Self::final_state), for
    /// time-stepped models. `None` when the final state does not depend on
    /// one.
    fn step_length(&self) -> Option<f64> {
        None
    }
}
