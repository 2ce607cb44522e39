//! Degenerate (point-mass) random variable.

use rand::RngCore;

use super::{check_order, RandomVariable};
use crate::error::Result;
use crate::types::Complex64;

/// A random variable that always takes `value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant {
    value: f64,
}

impl Constant {
    /// Point mass at `value`.
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    /// The constant's value.
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl RandomVariable for Constant {
    fn moments(&self, order: i32) -> Result<Vec<f64>> {
        let order = check_order(order)?;
        Ok((0..=order).map(|i| self.value.powi(i as i32)).collect())
    }

    fn sample(&self, _rng: &mut dyn RngCore) -> f64 {
        self.value
    }

    /// Always 1.
    ///
    /// A constant contributes no phase here; offsets that should shift a
    /// trigonometric sum go in that sum's own offset.
    fn characteristic_function(&self, _t: f64) -> Complex64 {
        Complex64::new(1.0, 0.0)
    }
}
