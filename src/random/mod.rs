//! Random variables with closed-form moments.
//!
//! Every variable exposes three capabilities:
//! - raw moments `E[X^k]` for `k = 0..=order`
//! - a single draw
//! - the characteristic function `E[exp(i t X)]`
//!
//! Primitive variables ([`Constant`], [`ScaledBeta`]) compute their moments
//! directly. Derived variables ([`CosOfSum`], [`SinOfSum`]) own a list of
//! independent component variables and get their moments from the components'
//! characteristic functions through the trigonometric power-reduction
//! identities.
//!
//! [`RandomVector`] groups independent variables, one per random input of a
//! trajectory model.

mod beta;
mod constant;
mod trig;
mod vector;

use std::fmt;

use rand::RngCore;

use crate::error::{Result, RiskError};
use crate::types::Complex64;

pub use beta::ScaledBeta;
pub use constant::Constant;
pub use trig::{CosOfSum, SinOfSum};
pub use vector::RandomVector;

/// A scalar random variable with known moments.
///
/// Implementations must be independent of each other when composed; the
/// moment algebra in this crate assumes it and never checks it.
pub trait RandomVariable: fmt::Debug + Send + Sync {
    /// Raw moments `[E[X^0], E[X^1], ..., E[X^order]]`.
    ///
    /// The returned vector has length `order + 1` and starts with `1.0`.
    ///
    /// # Errors
    ///
    /// [`RiskError::NegativeOrder`] if `order < 0`.
    fn moments(&self, order: i32) -> Result<Vec<f64>>;

    /// Draw one value.
    fn sample(&self, rng: &mut dyn RngCore) -> f64;

    /// Characteristic function `E[exp(i t X)]`.
    fn characteristic_function(&self, t: f64) -> Complex64;
}

/// Validate a requested moment order and convert it to a length bound.
pub(crate) fn check_order(order: i32) -> Result<usize> {
    usize::try_from(order).map_err(|_| RiskError::NegativeOrder { order })
}
