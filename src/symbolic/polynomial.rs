//! Sparse multivariate polynomials over random inputs.

use std::collections::BTreeMap;
use std::ops::{Add, Mul, Neg, Sub};

use super::expr::Expr;
use crate::types::Exponents;

/// Polynomial in the random inputs with [`Expr`] coefficients.
///
/// Exponent tuples are stored without trailing zeros so that polynomials
/// built before the number of random inputs is known (e.g. constants) mix
/// freely with the rest; [`terms`](Self::terms) pads them back out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
    terms: BTreeMap<Exponents, Expr>,
}

fn trim(mut exponents: Exponents) -> Exponents {
    while exponents.last() == Some(&0) {
        exponents.pop();
    }
    exponents
}

fn add_exponents(a: &[u32], b: &[u32]) -> Exponents {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| a.get(i).copied().unwrap_or(0) + b.get(i).copied().unwrap_or(0))
        .collect()
}

impl Polynomial {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Degree-zero polynomial with coefficient `coefficient`.
    pub fn constant(coefficient: Expr) -> Self {
        let mut p = Self::zero();
        p.add_term(Vec::new(), coefficient);
        p
    }

    /// The random input at `index`, with unit coefficient.
    pub fn variable(index: usize) -> Self {
        let mut exponents = vec![0; index + 1];
        exponents[index] = 1;
        let mut p = Self::zero();
        p.add_term(exponents, Expr::constant(1.0));
        p
    }

    fn add_term(&mut self, exponents: Exponents, coefficient: Expr) {
        if coefficient.is_zero() {
            return;
        }
        let exponents = trim(exponents);
        match self.terms.remove(&exponents) {
            Some(existing) => {
                let sum = existing + coefficient;
                if !sum.is_zero() {
                    self.terms.insert(exponents, sum);
                }
            }
            None => {
                self.terms.insert(exponents, coefficient);
            }
        }
    }

    /// Whether every coefficient is (structurally) zero.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of stored terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Total degree (0 for the zero polynomial).
    pub fn degree(&self) -> u32 {
        self.terms
            .keys()
            .map(|e| e.iter().sum::<u32>())
            .max()
            .unwrap_or(0)
    }

    /// Number of random inputs actually referenced.
    pub fn n_variables(&self) -> usize {
        self.terms.keys().map(Vec::len).max().unwrap_or(0)
    }

    /// Terms as `(exponents, coefficient)` pairs in descending lexicographic
    /// order of exponents, each tuple padded to `n_variables` entries.
    ///
    /// # Panics
    ///
    /// Panics if a term references a random input at or beyond `n_variables`.
    pub fn terms(&self, n_variables: usize) -> Vec<(Exponents, Expr)> {
        assert!(
            self.n_variables() <= n_variables,
            "polynomial references {} random inputs, only {} declared",
            self.n_variables(),
            n_variables
        );
        self.terms
            .iter()
            .rev()
            .map(|(exponents, coefficient)| {
                let mut padded = exponents.clone();
                padded.resize(n_variables, 0);
                (padded, coefficient.clone())
            })
            .collect()
    }

    /// Evaluate at concrete random-input values and deterministic inputs.
    pub fn evaluate(&self, random: &[f64], inputs: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(exponents, coefficient)| {
                exponents
                    .iter()
                    .enumerate()
                    .fold(coefficient.eval(inputs), |acc, (i, &e)| {
                        acc * random[i].powi(e as i32)
                    })
            })
            .sum()
    }
}

impl From<f64> for Polynomial {
    fn from(value: f64) -> Self {
        Polynomial::constant(Expr::constant(value))
    }
}

impl From<Expr> for Polynomial {
    fn from(coefficient: Expr) -> Self {
        Polynomial::constant(coefficient)
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(mut self, rhs: Polynomial) -> Polynomial {
        for (exponents, coefficient) in rhs.terms {
            self.add_term(exponents, coefficient);
        }
        self
    }
}

impl Neg for Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        Polynomial {
            terms: self.terms.into_iter().map(|(e, c)| (e, -c)).collect(),
        }
    }
}

impl Sub for Polynomial {
    type Output = Polynomial;

    fn sub(self, rhs: Polynomial) -> Polynomial {
        self + (-rhs)
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial {
        let mut product = Polynomial::zero();
        for (ea, ca) in &self.terms {
            for (eb, cb) in &rhs.terms {
                product.add_term(add_exponents(ea, eb), ca.clone() * cb.clone());
            }
        }
        product
    }
}
