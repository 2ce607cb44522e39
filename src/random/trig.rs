//! Cosine and sine of a sum of independent random variables.
//!
//! For `Y = c + X_1 + ... + X_n` with independent `X_i`,
//! `phi_Y(t) = exp(i t c) * prod_i phi_{X_i}(t)`, and the power-reduction
//! identities express `cos(Y)^m` and `sin(Y)^m` as linear combinations of
//! `cos(jY)` and `sin(jY)`, whose expectations are the real and imaginary
//! parts of `phi_Y(j)`.

use rand::RngCore;

use super::{check_order, RandomVariable};
use crate::constants::TRIG_MOMENT_SLACK;
use crate::error::{ensure_finite, Result, RiskError};
use crate::math::binomial;
use crate::types::Complex64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrigKind {
    Cos,
    Sin,
}

impl TrigKind {
    /// Sign factor `(-1)^k` of the sine identities; the cosine identities
    /// carry no alternation.
    fn alternation(self, k: usize) -> f64 {
        match self {
            TrigKind::Cos => 1.0,
            TrigKind::Sin if k % 2 == 0 => 1.0,
            TrigKind::Sin => -1.0,
        }
    }

    /// `E[cos(jY)]` or `E[sin(jY)]` for the odd-power identity.
    fn odd_part(self, phi: Complex64) -> f64 {
        match self {
            TrigKind::Cos => phi.re,
            TrigKind::Sin => phi.im,
        }
    }

    fn apply(self, y: f64) -> f64 {
        match self {
            TrigKind::Cos => y.cos(),
            TrigKind::Sin => y.sin(),
        }
    }
}

/// Offset plus owned independent components.
#[derive(Debug)]
struct SumOfRvs {
    offset: f64,
    components: Vec<Box<dyn RandomVariable>>,
}

impl SumOfRvs {
    fn characteristic_function(&self, t: f64) -> Complex64 {
        let phase = Complex64::new(0.0, t * self.offset).exp();
        self.components
            .iter()
            .fold(phase, |acc, rv| acc * rv.characteristic_function(t))
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self.offset
            + self
                .components
                .iter()
                .map(|rv| rv.sample(&mut *rng))
                .sum::<f64>()
    }

    fn trig_moments(&self, kind: TrigKind, order: i32) -> Result<Vec<f64>> {
        let order = check_order(order)?;

        // phi[j] = phi_Y(j) for j = 0..=order, evaluated once for all moments
        let phi: Vec<Complex64> = (0..=order)
            .map(|j| self.characteristic_function(j as f64))
            .collect();

        (0..=order)
            .map(|m| {
                let value = ensure_finite("trigonometric moment", trig_moment(kind, m, &phi))?;
                check_range(m, value)
            })
            .collect()
    }
}

/// A moment of a cosine or sine lies in `[-1, 1]`, and in `[0, 1]` for even
/// powers; anything further out means the characteristic function was wrong.
fn check_range(m: usize, value: f64) -> Result<f64> {
    let lower = if m % 2 == 0 { 0.0 } else { -1.0 };
    if value < lower - TRIG_MOMENT_SLACK || value > 1.0 + TRIG_MOMENT_SLACK {
        return Err(RiskError::PrecisionLoss {
            quantity: "trigonometric moment",
            value,
        });
    }
    Ok(value)
}

/// `E[cos(Y)^m]` or `E[sin(Y)^m]` from `phi_Y(0..=m)`.
fn trig_moment(kind: TrigKind, m: usize, phi: &[Complex64]) -> f64 {
    let n = m / 2;
    let four_n = 4f64.powi(n as i32);

    match m % 2 {
        0 => {
            let sum: f64 = (0..n)
                .map(|k| kind.alternation(k) * binomial(m, k) * phi[2 * (n - k)].re)
                .sum();
            binomial(m, n) / four_n + kind.alternation(n) * sum / 2f64.powi(2 * n as i32 - 1)
        }
        1 => {
            let sum: f64 = (0..=n)
                .map(|k| kind.alternation(k) * binomial(m, k) * kind.odd_part(phi[m - 2 * k]))
                .sum();
            kind.alternation(n) * sum / four_n
        }
        _ => unreachable!("m % 2 is either 0 or 1"),
    }
}

macro_rules! trig_of_sum {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $name {
            sum: SumOfRvs,
        }

        impl $name {
            /// Wrap `offset + sum(components)`.
            pub fn new(offset: f64, components: Vec<Box<dyn RandomVariable>>) -> Self {
                Self {
                    sum: SumOfRvs { offset, components },
                }
            }

            /// Constant offset `c`.
            pub fn offset(&self) -> f64 {
                self.sum.offset
            }

            /// Independent components of the sum.
            pub fn components(&self) -> &[Box<dyn RandomVariable>] {
                &self.sum.components
            }
        }

        impl RandomVariable for $name {
            fn moments(&self, order: i32) -> Result<Vec<f64>> {
                self.sum.trig_moments($kind, order)
            }

            fn sample(&self, rng: &mut dyn RngCore) -> f64 {
                $kind.apply(self.sum.sample(rng))
            }

            /// Characteristic function of the inner sum
            /// `c + X_1 + ... + X_n`; the moment identities are built on it.
            fn characteristic_function(&self, t: f64) -> Complex64 {
                self.sum.characteristic_function(t)
            }
        }
    };
}

trig_of_sum!(
    /// `cos(c + X_1 + ... + X_n)` for independent `X_i`.
    CosOfSum,
    TrigKind::Cos
);

trig_of_sum!(
    /// `sin(c + X_1 + ... + X_n)` for independent `X_i`.
    SinOfSum,
    TrigKind::Sin
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{Constant, ScaledBeta};

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < tol, "index {i}: {a} vs {e}");
        }
    }

    #[test]
    fn test_cos_of_constant_sum() {
        let c = 0.7;
        let rv = CosOfSum::new(c, vec![Box::new(Constant::new(0.0))]);
        let expected: Vec<f64> = (0..=7).map(|k| c.cos().powi(k)).collect();
        assert_close(&rv.moments(7).unwrap(), &expected, 1e-12);
    }

    #[test]
    fn test_sin_of_constant_sum() {
        let c = 1.3;
        let rv = SinOfSum::new(c, vec![Box::new(Constant::new(0.0))]);
        let expected: Vec<f64> = (0..=7).map(|k| c.sin().powi(k)).collect();
        assert_close(&rv.moments(7).unwrap(), &expected, 1e-12);
    }

    #[test]
    fn test_sin_square_is_not_cos_square() {
        let c = 0.3;
        let rv = SinOfSum::new(c, Vec::new());
        let second = rv.moments(2).unwrap()[2];
        assert!((second - c.sin().powi(2)).abs() < 1e-14);
        assert!((second - c.cos().powi(2)).abs() > 0.5);
    }

    #[test]
    fn test_pythagorean_identity_in_expectation() {
        // E[cos^2 Y] + E[sin^2 Y] = 1 for any Y
        let make = || -> Vec<Box<dyn RandomVariable>> {
            vec![
                Box::new(ScaledBeta::new(2.0, 3.0, 1.5).unwrap()),
                Box::new(ScaledBeta::new(0.5, 0.5, -0.8).unwrap()),
            ]
        };
        let cos = CosOfSum::new(0.2, make()).moments(2).unwrap();
        let sin = SinOfSum::new(0.2, make()).moments(2).unwrap();
        assert!((cos[2] + sin[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_characteristic_function_multiplicative() {
        let t = 1.7;
        let c = -0.4;
        let a = ScaledBeta::new(2.0, 2.0, 1.0).unwrap();
        let b = ScaledBeta::new(3.0, 1.0, 0.5).unwrap();
        let expected = Complex64::new(0.0, t * c).exp()
            * a.characteristic_function(t)
            * b.characteristic_function(t);

        let rv = CosOfSum::new(c, vec![Box::new(a), Box::new(b)]);
        assert!((rv.characteristic_function(t) - expected).norm() < 1e-14);
    }

    #[test]
    fn test_moments_match_sampling() {
        let rv = CosOfSum::new(0.5, vec![Box::new(ScaledBeta::new(2.0, 2.0, 1.0).unwrap())]);
        let moments = rv.moments(2).unwrap();

        let mut rng = rand::rng();
        let n = 200_000;
        let (mut s1, mut s2) = (0.0, 0.0);
        for _ in 0..n {
            let x = rv.sample(&mut rng);
            s1 += x;
            s2 += x * x;
        }
        assert!((s1 / n as f64 - moments[1]).abs() < 0.01);
        assert!((s2 / n as f64 - moments[2]).abs() < 0.01);
    }

    #[test]
    fn test_moments_stay_valid_for_wide_components() {
        // Y = 40 B with B ~ Beta(2, 2): phi_Y(j) is tiny for j >= 1, so the
        // moments sit close to those of a uniform angle
        let rv = CosOfSum::new(0.0, vec![Box::new(ScaledBeta::new(2.0, 2.0, 40.0).unwrap())]);
        let moments = rv.moments(4).unwrap();
        assert!(moments[1].abs() < 0.01);
        assert!((moments[2] - 0.5).abs() < 0.01);
        assert!((moments[4] - 0.375).abs() < 0.01);
        assert!(moments.iter().all(|m| m.abs() <= 1.0));
    }

    #[test]
    fn test_out_of_range_moment_rejected() {
        assert_eq!(check_range(3, -0.25), Ok(-0.25));
        assert_eq!(check_range(2, 1.0 + 1e-12), Ok(1.0 + 1e-12));
        assert!(matches!(
            check_range(2, -4.85e5),
            Err(RiskError::PrecisionLoss { quantity: "trigonometric moment", .. })
        ));
        assert!(check_range(2, -0.01).is_err());
        assert!(check_range(1, 1.5).is_err());
    }

    #[test]
    fn test_negative_order() {
        let rv = SinOfSum::new(0.0, Vec::new());
        assert!(rv.moments(-2).is_err());
    }
}
