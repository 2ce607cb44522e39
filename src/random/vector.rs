//! Ordered collection of independent random variables.

use rand::RngCore;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::RandomVariable;
use crate::error::{Result, RiskError};

/// Independent random variables, one per random input of a model.
///
/// Independence is structural: moments are computed per variable and never
/// coupled.
#[derive(Debug, Default)]
pub struct RandomVector {
    variables: Vec<Box<dyn RandomVariable>>,
}

impl RandomVector {
    /// Wrap an ordered list of variables.
    pub fn new(variables: Vec<Box<dyn RandomVariable>>) -> Self {
        Self { variables }
    }

    /// Append a variable.
    pub fn push(&mut self, variable: impl RandomVariable + 'static) {
        self.variables.push(Box::new(variable));
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the vector is empty.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// The variables in order.
    pub fn variables(&self) -> &[Box<dyn RandomVariable>] {
        &self.variables
    }

    /// Moments of each variable up to its own maximum order.
    ///
    /// `max_orders[i]` is the highest order requested for variable `i`;
    /// entry `i` of the result is `variables[i].moments(max_orders[i])`.
    ///
    /// # Errors
    ///
    /// [`RiskError::DimensionMismatch`] if `max_orders` does not have one
    /// entry per variable, or the first error any variable reports.
    pub fn compute_vector_moments(&self, max_orders: &[i32]) -> Result<Vec<Vec<f64>>> {
        if max_orders.len() != self.variables.len() {
            return Err(RiskError::DimensionMismatch {
                what: "maximum moment orders",
                expected: self.variables.len(),
                actual: max_orders.len(),
            });
        }

        #[cfg(feature = "parallel")]
        let moments = self
            .variables
            .par_iter()
            .zip(max_orders.par_iter())
            .map(|(variable, &order)| variable.moments(order))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let moments = self
            .variables
            .iter()
            .zip(max_orders)
            .map(|(variable, &order)| variable.moments(order))
            .collect();

        moments
    }

    /// One draw per variable, in order.
    pub fn sample(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        self.variables.iter().map(|v| v.sample(&mut *rng)).collect()
    }
}

impl FromIterator<Box<dyn RandomVariable>> for RandomVector {
    fn from_iter<I: IntoIterator<Item = Box<dyn RandomVariable>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
