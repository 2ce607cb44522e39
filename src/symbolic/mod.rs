//! Symbolic layer: polynomials in the random inputs whose coefficients are
//! expressions in the deterministic inputs.
//!
//! Safety functions and trajectory models are written once against the
//! [`Scalar`] ring and run both symbolically (on [`Polynomial`]) during
//! compilation and numerically (on `f64`) during Monte Carlo simulation.

mod expr;
mod polynomial;

use std::ops::{Add, Mul, Neg, Sub};

pub use expr::{CompiledExpr, Expr};
pub use polynomial::Polynomial;

/// Commutative ring operations shared by `f64` and [`Polynomial`].
pub trait Scalar:
    Clone
    + From<f64>
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
{
}

impl<T> Scalar for T where
    T: Clone
        + From<f64>
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Neg<Output = T>
{
}
