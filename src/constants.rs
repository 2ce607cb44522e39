//! Numeric constants used throughout the crate.

/// Monte Carlo seed of the [`Config::balanced`](crate::Config::balanced) preset.
///
/// The value `0x7269736B` is "risk" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x7269736B;

// =============================================================================
// Kummer series evaluation
// =============================================================================

/// Maximum number of terms summed for the confluent hypergeometric series.
pub const HYP1F1_MAX_TERMS: usize = 2_000;

/// Relative size of a term below which the series is considered converged.
pub const HYP1F1_TOLERANCE: f64 = 1e-16;

/// Largest acceptable cancellation error of the series, relative to
/// `max(|sum|, 1)`. The error is estimated as `max |term| * f64::EPSILON`;
/// for purely imaginary arguments this caps `|z|` near 16.
pub const HYP1F1_ACCURACY: f64 = 1e-10;

// =============================================================================
// Beta characteristic function quadrature
// =============================================================================

/// Largest tanh-sinh step; shrunk further for oscillatory integrands.
pub const TANH_SINH_STEP: f64 = 1.0 / 32.0;

/// Decay exponent the truncated tails must reach, scaled by the smaller
/// shape parameter.
pub const TANH_SINH_TAIL: f64 = 80.0;

/// Bounds of the tanh-sinh half-width in `tau`.
pub const TANH_SINH_HALF_WIDTH: (f64, f64) = (3.0, 7.0);

/// Rounding slack allowed when checking that a trigonometric moment lies
/// in `[-1, 1]`.
pub const TRIG_MOMENT_SLACK: f64 = 1e-9;

// =============================================================================
// Default configuration constants
// =============================================================================

/// Default number of Monte Carlo trajectories.
pub const DEFAULT_MONTE_CARLO_SAMPLES: usize = 10_000;

/// Default number of trials per Monte Carlo batch.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Default relative tolerance for clamping rounding-level negative variance.
pub const DEFAULT_VARIANCE_TOLERANCE: f64 = 1e-12;
