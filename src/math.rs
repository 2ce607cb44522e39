//! Special functions and small numeric helpers.

use std::f64::consts::PI;

use crate::constants::{
    HYP1F1_ACCURACY, HYP1F1_MAX_TERMS, HYP1F1_TOLERANCE, TANH_SINH_HALF_WIDTH, TANH_SINH_STEP,
    TANH_SINH_TAIL,
};
use crate::error::{Result, RiskError};
use crate::types::Complex64;

/// Binomial coefficient C(n, k) as a float.
///
/// Computed multiplicatively so intermediate values stay small; exact for
/// every result representable in an f64 mantissa.
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Kummer's confluent hypergeometric function 1F1(a; b; z) for complex `z`.
///
/// Sums the defining power series
/// `sum_k (a)_k / (b)_k * z^k / k!` until the next term is negligible
/// relative to the running sum. Terms grow until `k ~ |z|`, so the stopping
/// test only applies past that point.
///
/// # Errors
///
/// [`RiskError::PrecisionLoss`] when the largest term is so big that its
/// rounding error, `max |term| * f64::EPSILON`, exceeds [`HYP1F1_ACCURACY`]
/// relative to `max(|sum|, 1)`. For purely imaginary `z` this happens once
/// `|z|` passes roughly 16: the terms reach `e^|z| / sqrt(2 pi |z|)` and then
/// cancel to a result of modulus at most one.
///
/// # Panics
///
/// Panics in debug builds if `b` is a non-positive integer (the series is
/// undefined there).
pub fn hyp1f1(a: f64, b: f64, z: Complex64) -> Result<Complex64> {
    debug_assert!(
        !(b <= 0.0 && b.fract() == 0.0),
        "1F1 is undefined for non-positive integer b"
    );

    let mut term = Complex64::new(1.0, 0.0);
    let mut sum = term;
    let mut max_term: f64 = 1.0;
    let z_norm = z.norm();

    for k in 0..HYP1F1_MAX_TERMS {
        let k = k as f64;
        term = term * z * ((a + k) / ((b + k) * (k + 1.0)));
        sum += term;
        max_term = max_term.max(term.norm());

        if k > z_norm && term.norm() <= HYP1F1_TOLERANCE * sum.norm() {
            break;
        }
    }

    if max_term * f64::EPSILON > HYP1F1_ACCURACY * sum.norm().max(1.0) {
        return Err(RiskError::PrecisionLoss {
            quantity: "Kummer series",
            value: max_term,
        });
    }
    Ok(sum)
}

/// Characteristic function `E[exp(i s X)]` of `X ~ Beta(alpha, beta)`.
///
/// This is `1F1(alpha; alpha + beta; i s)`. The power series is used while
/// it is accurate; past that the density is integrated directly with
/// [`beta_characteristic_quadrature`].
pub fn beta_characteristic_function(alpha: f64, beta: f64, s: f64) -> Complex64 {
    match hyp1f1(alpha, alpha + beta, Complex64::new(0.0, s)) {
        Ok(value) => value,
        Err(err) => {
            tracing::trace!(alpha, beta, s, %err, "falling back to quadrature");
            beta_characteristic_quadrature(alpha, beta, s)
        }
    }
}

/// `E[exp(i s X)]` for `X ~ Beta(alpha, beta)` by tanh-sinh quadrature.
///
/// Substituting `x = 1 / (1 + exp(-pi sinh(tau)))` turns
/// `x^(alpha-1) (1-x)^(beta-1) dx` into `x^alpha (1-x)^beta pi cosh(tau) dtau`,
/// which is bounded for any positive shape and decays double-exponentially,
/// so the trapezoidal rule converges geometrically. The step shrinks with
/// `|s|` to resolve the oscillation. The Beta function normalisation is the
/// same sum without the oscillating factor.
pub fn beta_characteristic_quadrature(alpha: f64, beta: f64, s: f64) -> Complex64 {
    let (min_width, max_width) = TANH_SINH_HALF_WIDTH;
    let half_width = (TANH_SINH_TAIL / (PI * alpha.min(beta)))
        .ln()
        .clamp(min_width, max_width);
    let step = TANH_SINH_STEP.min(0.5 / s.abs());
    let n = (half_width / step).ceil() as i64;

    let mut weighted = Complex64::new(0.0, 0.0);
    let mut total = 0.0;
    for k in -n..=n {
        let tau = k as f64 * step;
        let u = PI * tau.sinh();
        // ln x and ln(1 - x), both free of cancellation near the endpoints
        let ln_x = -softplus(-u);
        let ln_complement = -softplus(u);
        let weight = (alpha * ln_x + beta * ln_complement).exp() * PI * tau.cosh();
        if weight == 0.0 {
            continue;
        }
        weighted += Complex64::new(0.0, s * ln_x.exp()).exp() * weight;
        total += weight;
    }

    weighted / total
}

/// `ln(1 + e^v)` without overflow.
fn softplus(v: f64) -> f64 {
    v.max(0.0) + (-v.abs()).exp().ln_1p()
}

/// Derive a well-mixed per-trial seed from a base seed and a counter.
///
/// SplitMix64 finalizer over `seed + counter * golden_gamma`, so trial `i`
/// gets the same stream regardless of which worker thread runs it.
#[inline]
pub fn counter_rng_seed(seed: u64, counter: u64) -> u64 {
    let mut z = seed.wrapping_add(counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
