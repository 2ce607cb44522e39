//! Type aliases and common types.

use nalgebra::{Complex, DVector};

/// Complex scalar used for characteristic function values.
pub type Complex64 = Complex<f64>;

/// Dynamically sized vector for coefficient/moment dot products.
pub type VectorN = DVector<f64>;

/// Exponent tuple of a monomial, one entry per random input.
pub type Exponents = Vec<u32>;
