//! Safety functions.
//!
//! A safety function maps a terminal position to a scalar; the trajectory is
//! unsafe exactly when the value is `<= 0`. Functions are generic over
//! [`Scalar`] so the same definition is expanded symbolically at compile
//! time and evaluated numerically during simulation.

use serde::{Deserialize, Serialize};

use crate::symbolic::Scalar;

/// Scalar safety margin `p(x, y)`; `p <= 0` is a violation.
pub trait SafetyFunction: Send + Sync {
    /// Evaluate the margin at `(x, y)`.
    fn evaluate<S: Scalar>(&self, x: S, y: S) -> S;
}

/// Half-plane constraint `a x + b y + c > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HalfPlane {
    /// Coefficient of x.
    pub a: f64,
    /// Coefficient of y.
    pub b: f64,
    /// Offset.
    pub c: f64,
}

impl HalfPlane {
    /// `a x + b y + c`.
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }
}

impl SafetyFunction for HalfPlane {
    fn evaluate<S: Scalar>(&self, x: S, y: S) -> S {
        S::from(self.a) * x + S::from(self.b) * y + S::from(self.c)
    }
}

/// Keep-out disk: `(x - cx)^2 + (y - cy)^2 - radius^2 > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExclusionDisk {
    /// Disk center x.
    pub cx: f64,
    /// Disk center y.
    pub cy: f64,
    /// Disk radius.
    pub radius: f64,
}

impl ExclusionDisk {
    /// Disk centered at `(cx, cy)`.
    pub fn new(cx: f64, cy: f64, radius: f64) -> Self {
        Self { cx, cy, radius }
    }
}

impl SafetyFunction for ExclusionDisk {
    fn evaluate<S: Scalar>(&self, x: S, y: S) -> S {
        let dx = x - S::from(self.cx);
        let dy = y - S::from(self.cy);
        dx.clone() * dx + dy.clone() * dy - S::from(self.radius * self.radius)
    }
}
