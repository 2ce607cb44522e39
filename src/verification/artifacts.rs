//! Compiled first- and second-moment structure of a safety polynomial.
//!
//! With `p = sum_i coef_i * mono_i` over the random inputs,
//!
//! ```text
//! E[p]   = sum_i coef_i * E[mono_i]
//! E[p^2] = sum_i coef_i^2 * E[mono_i^2] + 2 * sum_{i<j} coef_i * coef_j * E[mono_i * mono_j]
//! ```
//!
//! The second-moment monomials are derived from the first-moment ones by
//! adding exponent tuples pairwise, so `p^2` is never expanded
//! symbolically. Each derived monomial remembers which pair of
//! first-moment terms produced it; the numeric second-moment coefficients
//! are rebuilt from the first-moment coefficients at evaluation time.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_finite, Result, RiskError};
use crate::model::TrajectoryModel;
use crate::safety::SafetyFunction;
use crate::symbolic::{CompiledExpr, Expr};
use crate::types::Exponents;

/// Which first-moment terms a second-moment monomial came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermPairing {
    /// `coef_i^2 * mono_i^2`, multinomial coefficient 2!/2! = 1.
    Square(usize),
    /// `coef_i * coef_j * mono_i * mono_j` with `i < j`, multinomial
    /// coefficient 2!/(1!1!) = 2.
    Cross(usize, usize),
}

impl TermPairing {
    /// Multinomial coefficient of the pairing.
    pub fn multiplicity(&self) -> f64 {
        match self {
            TermPairing::Square(_) => 1.0,
            TermPairing::Cross(..) => 2.0,
        }
    }

    /// Exponents over the first-moment terms, e.g. `(0, 2, 0)` for
    /// `Square(1)` or `(1, 0, 1)` for `Cross(0, 2)`. Always sums to 2.
    pub fn multinomial_index(&self, n_terms: usize) -> Vec<u32> {
        let mut index = vec![0; n_terms];
        match *self {
            TermPairing::Square(i) => index[i] = 2,
            TermPairing::Cross(i, j) => {
                index[i] = 1;
                index[j] = 1;
            }
        }
        debug_assert_eq!(index.iter().sum::<u32>(), 2);
        index
    }

    /// Second-moment coefficient from the numeric first-moment coefficients.
    pub fn coefficient(&self, first: &[f64]) -> f64 {
        match *self {
            TermPairing::Square(i) => first[i] * first[i],
            TermPairing::Cross(i, j) => 2.0 * first[i] * first[j],
        }
    }
}

/// Enumerate all pairings of `n_terms` first-moment terms: every square in
/// term order, then every cross pair `(i, j)`, `i < j`, in lexicographic
/// order.
pub(crate) fn enumerate_pairings(n_terms: usize) -> Vec<TermPairing> {
    let squares = (0..n_terms).map(TermPairing::Square);
    let crosses =
        (0..n_terms).flat_map(move |i| ((i + 1)..n_terms).map(move |j| TermPairing::Cross(i, j)));
    squares.chain(crosses).collect()
}

fn add_tuples(a: &[u32], b: &[u32]) -> Exponents {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

/// Monomials and compiled coefficients for `E[p]` and `E[p^2]`.
///
/// Built once per safety function and model; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentArtifacts {
    n_random: usize,
    n_inputs: usize,
    first_monomials: Vec<Exponents>,
    first_symbolic: Vec<Expr>,
    first_coefficients: Vec<CompiledExpr>,
    second_monomials: Vec<Exponents>,
    pairings: Vec<TermPairing>,
}

impl MomentArtifacts {
    /// Expand `safety` at the model's symbolic final state and derive the
    /// moment structure.
    ///
    /// # Errors
    ///
    /// [`RiskError::DimensionMismatch`] if the expanded polynomial refers to
    /// more random inputs than the model declares, or a coefficient refers
    /// to an undeclared deterministic input.
    pub fn compile<P, M>(safety: &P, model: &M) -> Result<Self>
    where
        P: SafetyFunction,
        M: TrajectoryModel,
    {
        let n_random = model.random_variables().len();
        let n_inputs = model.input_variables().len();

        let (x, y) = model.final_state();
        let p = safety.evaluate(x, y);

        if p.n_variables() > n_random {
            return Err(RiskError::DimensionMismatch {
                what: "random inputs referenced by safety polynomial",
                expected: n_random,
                actual: p.n_variables(),
            });
        }

        let terms = p.terms(n_random);
        let mut first_monomials = Vec::with_capacity(terms.len());
        let mut first_symbolic = Vec::with_capacity(terms.len());
        let mut first_coefficients = Vec::with_capacity(terms.len());
        for (exponents, coefficient) in terms {
            first_coefficients.push(coefficient.compile(n_inputs)?);
            first_symbolic.push(coefficient);
            first_monomials.push(exponents);
        }

        let pairings = enumerate_pairings(first_monomials.len());
        let second_monomials = pairings
            .iter()
            .map(|pairing| match *pairing {
                TermPairing::Square(i) => add_tuples(&first_monomials[i], &first_monomials[i]),
                TermPairing::Cross(i, j) => add_tuples(&first_monomials[i], &first_monomials[j]),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            degree = p.degree(),
            first_terms = first_monomials.len(),
            second_terms = second_monomials.len(),
            random_inputs = n_random,
            deterministic_inputs = n_inputs,
            "compiled moment artifacts"
        );

        Ok(Self {
            n_random,
            n_inputs,
            first_monomials,
            first_symbolic,
            first_coefficients,
            second_monomials,
            pairings,
        })
    }

    /// Number of random inputs (length of every exponent tuple).
    pub fn n_random(&self) -> usize {
        self.n_random
    }

    /// Number of deterministic inputs the coefficients take.
    pub fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    /// Exponent tuples of the first-moment expansion.
    pub fn first_monomials(&self) -> &[Exponents] {
        &self.first_monomials
    }

    /// Symbolic first-moment coefficients, parallel to
    /// [`first_monomials`](Self::first_monomials).
    pub fn first_symbolic(&self) -> &[Expr] {
        &self.first_symbolic
    }

    /// Exponent tuples of the second-moment expansion.
    pub fn second_monomials(&self) -> &[Exponents] {
        &self.second_monomials
    }

    /// Origin of each second-moment monomial, parallel to
    /// [`second_monomials`](Self::second_monomials).
    pub fn pairings(&self) -> &[TermPairing] {
        &self.pairings
    }

    /// Highest power of each random input needed by any second-moment
    /// monomial. Squares are included, so this also covers `E[p]`.
    pub fn max_orders(&self) -> Vec<i32> {
        (0..self.n_random)
            .map(|var| {
                self.second_monomials
                    .iter()
                    .map(|mono| mono[var])
                    .max()
                    .unwrap_or(0) as i32
            })
            .collect()
    }

    /// Evaluate the first-moment coefficients at the deterministic inputs.
    ///
    /// # Errors
    ///
    /// [`RiskError::DimensionMismatch`] on a wrong-length input slice,
    /// [`RiskError::NonFinite`] if any coefficient is NaN or infinite.
    pub fn first_coefficients(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        if inputs.len() != self.n_inputs {
            return Err(RiskError::DimensionMismatch {
                what: "deterministic input values",
                expected: self.n_inputs,
                actual: inputs.len(),
            });
        }
        self.first_coefficients
            .iter()
            .map(|coefficient| ensure_finite("first-moment coefficient", coefficient.eval(inputs)))
            .collect()
    }

    /// Second-moment coefficients from the first-moment ones.
    pub fn second_coefficients(&self, first: &[f64]) -> Vec<f64> {
        debug_assert_eq!(first.len(), self.first_monomials.len());
        self.pairings
            .iter()
            .map(|pairing| pairing.coefficient(first))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KinematicModel, PolynomialModel};
    use crate::safety::{ExclusionDisk, HalfPlane};
    use crate::symbolic::Polynomial;

    #[test]
    fn test_enumerate_pairings() {
        assert_eq!(
            enumerate_pairings(3),
            vec![
                TermPairing::Square(0),
                TermPairing::Square(1),
                TermPairing::Square(2),
                TermPairing::Cross(0, 1),
                TermPairing::Cross(0, 2),
                TermPairing::Cross(1, 2),
            ]
        );
        assert!(enumerate_pairings(0).is_empty());
    }

    #[test]
    fn test_pairing_count_is_triangular() {
        for n in 0..12 {
            assert_eq!(enumerate_pairings(n).len(), n * (n + 1) / 2);
        }
    }

    #[test]
    fn test_multinomial_index() {
        assert_eq!(TermPairing::Square(1).multinomial_index(3), vec![0, 2, 0]);
        assert_eq!(TermPairing::Cross(0, 2).multinomial_index(3), vec![1, 0, 1]);
    }

    #[test]
    fn test_pairing_coefficients() {
        let first = [2.0, -3.0];
        assert_eq!(TermPairing::Square(1).coefficient(&first), 9.0);
        assert_eq!(TermPairing::Cross(0, 1).coefficient(&first), -12.0);
        assert_eq!(TermPairing::Cross(0, 1).multiplicity(), 2.0);
    }

    #[test]
    fn test_second_monomials_are_pairwise_sums() {
        let model = KinematicModel::new(3, 0.1);
        let artifacts = MomentArtifacts::compile(&HalfPlane::new(1.0, 0.5, -2.0), &model).unwrap();

        let first = artifacts.first_monomials();
        assert!(first.iter().all(|m| m.len() == 3));
        for (mono, pairing) in artifacts.second_monomials().iter().zip(artifacts.pairings()) {
            assert_eq!(mono.len(), 3);
            let expected = match *pairing {
                TermPairing::Square(i) => add_tuples(&first[i], &first[i]),
                TermPairing::Cross(i, j) => add_tuples(&first[i], &first[j]),
            };
            assert_eq!(*mono, expected);
            let index = pairing.multinomial_index(first.len());
            assert_eq!(index.iter().sum::<u32>(), 2);
        }
    }

    #[test]
    fn test_second_coefficients_reproduce_square() {
        // p = 2 + 3 a0 - a1  =>  p^2 evaluated through the pairings
        let x = Polynomial::from(2.0) + Polynomial::from(3.0) * Polynomial::variable(0)
            - Polynomial::variable(1);
        let model =
            PolynomialModel::new(["a0", "a1"], Vec::<String>::new(), x, Polynomial::zero()).unwrap();
        let artifacts = MomentArtifacts::compile(&HalfPlane::new(1.0, 0.0, 0.0), &model).unwrap();

        let first = artifacts.first_coefficients(&[]).unwrap();
        let second = artifacts.second_coefficients(&first);
        let point: [f64; 2] = [0.7, -1.3];
        let eval = |monos: &[Exponents], coefs: &[f64]| -> f64 {
            monos
                .iter()
                .zip(coefs)
                .map(|(m, c)| c * m.iter().zip(point).map(|(&e, v)| v.powi(e as i32)).product::<f64>())
                .sum()
        };
        let p = eval(artifacts.first_monomials(), &first);
        let p_sq = eval(artifacts.second_monomials(), &second);
        assert!((p - (2.0 + 3.0 * 0.7 + 1.3)).abs() < 1e-12);
        assert!((p_sq - p * p).abs() < 1e-12);
    }

    #[test]
    fn test_max_orders() {
        let model = KinematicModel::new(3, 0.1);
        let artifacts =
            MomentArtifacts::compile(&ExclusionDisk::new(1.0, 1.0, 0.5), &model).unwrap();
        // disk is quadratic in position, position affine in a0, a1; a2 unused
        assert_eq!(artifacts.max_orders(), vec![4, 4, 0]);
    }

    #[test]
    fn test_coefficient_input_length_checked() {
        let model = KinematicModel::new(2, 0.1);
        let artifacts = MomentArtifacts::compile(&HalfPlane::new(1.0, 0.0, 0.0), &model).unwrap();
        assert!(matches!(
            artifacts.first_coefficients(&[0.0; 3]),
            Err(RiskError::DimensionMismatch { expected: 5, actual: 3, .. })
        ));
    }

    #[test]
    fn test_unused_leading_variable_keeps_full_width() {
        let model = PolynomialModel::new(
            ["a0", "a1"],
            Vec::<String>::new(),
            Polynomial::variable(1),
            Polynomial::zero(),
        )
        .unwrap();
        let artifacts = MomentArtifacts::compile(&HalfPlane::new(1.0, 0.0, 0.0), &model).unwrap();
        assert_eq!(artifacts.first_monomials(), &[vec![0, 1]]);
        assert_eq!(artifacts.second_monomials(), &[vec![0, 2]]);
        assert_eq!(artifacts.max_orders(), vec![0, 2]);
    }
}
