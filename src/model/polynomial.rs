//! Model given directly by its terminal-state polynomials.

use super::TrajectoryModel;
use crate::error::{Result, RiskError};
use crate::symbolic::Polynomial;

/// Terminal state supplied as polynomials; the runtime input is the vector
/// of deterministic input values itself.
#[derive(Debug, Clone)]
pub struct PolynomialModel {
    random_names: Vec<String>,
    input_names: Vec<String>,
    x: Polynomial,
    y: Polynomial,
}

impl PolynomialModel {
    /// Build a model from named inputs and the `(x, y)` polynomials.
    ///
    /// # Errors
    ///
    /// [`RiskError::DimensionMismatch`] if either polynomial references more
    /// random inputs than `random_names` declares.
    pub fn new<R, I>(random_names: R, input_names: I, x: Polynomial, y: Polynomial) -> Result<Self>
    where
        R: IntoIterator,
        R::Item: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let random_names: Vec<String> = random_names.into_iter().map(Into::into).collect();
        let input_names: Vec<String> = input_names.into_iter().map(Into::into).collect();

        let referenced = x.n_variables().max(y.n_variables());
        if referenced > random_names.len() {
            return Err(RiskError::DimensionMismatch {
                what: "random inputs referenced by final state",
                expected: random_names.len(),
                actual: referenced,
            });
        }

        Ok(Self {
            random_names,
            input_names,
            x,
            y,
        })
    }
}

impl TrajectoryModel for PolynomialModel {
    type Input = Vec<f64>;

    fn random_variables(&self) -> &[String] {
        &self.random_names
    }

    fn input_variables(&self) -> &[String] {
        &self.input_names
    }

    fn final_state(&self) -> (Polynomial, Polynomial) {
        (self.x.clone(), self.y.clone())
    }

    fn listify_input_vars(&self, input: &Vec<f64>) -> Vec<f64> {
        input.clone()
    }

    /// Closed-form: `dt` is unused.
    fn simulate(&self, input: &Vec<f64>, random: &[f64], _dt: f64) -> (f64, f64) {
        (self.x.evaluate(random, input), self.y.evaluate(random, input))
    }
}
