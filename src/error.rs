//! Error types for moment computation and bound evaluation.

/// Error returned by the moment and bound pipeline.
///
/// Every variant is fatal to the computation that produced it. None of them
/// stands for an inconclusive bound: that outcome is a regular value,
/// [`ProbabilityBound::Inconclusive`](crate::ProbabilityBound::Inconclusive).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RiskError {
    /// A moment was requested at a negative order.
    #[error("moment order must be non-negative, got {order}")]
    NegativeOrder {
        /// The rejected order.
        order: i32,
    },

    /// Distribution parameters outside their domain.
    #[error("invalid distribution parameters: {0}")]
    InvalidParameters(String),

    /// Two sequences that must line up positionally do not.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being matched (e.g. "random vector entries").
        what: &'static str,
        /// Length required by the compiled model.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// A numeric intermediate came out NaN or infinite.
    #[error("{quantity} is not finite ({value})")]
    NonFinite {
        /// Name of the offending quantity.
        quantity: &'static str,
        /// The value itself.
        value: f64,
    },

    /// A numeric result is finite but cannot be trusted: rounding error in
    /// its evaluation exceeds the accuracy it must have.
    #[error("{quantity} lost precision ({value:e})")]
    PrecisionLoss {
        /// Name of the offending quantity.
        quantity: &'static str,
        /// The untrustworthy value, or the intermediate magnitude that
        /// swamped it.
        value: f64,
    },

    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RiskError>;

/// Reject NaN and infinities, naming the quantity in the error.
pub(crate) fn ensure_finite(quantity: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RiskError::NonFinite { quantity, value })
    }
}
