//! Unicycle kinematics with random per-step accelerations.

use serde::{Deserialize, Serialize};

use super::TrajectoryModel;
use crate::symbolic::{Expr, Polynomial, Scalar};

/// Runtime inputs for [`KinematicModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryInput {
    /// Initial x position.
    pub x0: f64,
    /// Initial y position.
    pub y0: f64,
    /// Initial speed.
    pub v0: f64,
    /// Heading at each step, in radians.
    pub thetas: Vec<f64>,
}

/// Forward-Euler unicycle: per step `j`,
///
/// ```text
/// x += dt * v * cos(theta_j)
/// y += dt * v * sin(theta_j)
/// v += dt * a_j
/// ```
///
/// Random inputs are the accelerations `a0..a{n-1}`; deterministic inputs
/// are `x0, y0, v0, theta0..theta{n-1}`. The terminal position is affine in
/// the accelerations, and the last acceleration never reaches it.
#[derive(Debug, Clone)]
pub struct KinematicModel {
    n_steps: usize,
    dt: f64,
    random_names: Vec<String>,
    input_names: Vec<String>,
}

impl KinematicModel {
    /// Model with `n_steps` Euler steps of length `dt`.
    pub fn new(n_steps: usize, dt: f64) -> Self {
        let random_names = (0..n_steps).map(|j| format!("a{j}")).collect();
        let input_names = ["x0", "y0", "v0"]
            .into_iter()
            .map(String::from)
            .chain((0..n_steps).map(|j| format!("theta{j}")))
            .collect();
        Self {
            n_steps,
            dt,
            random_names,
            input_names,
        }
    }

    /// Number of Euler steps.
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// Step length used for the symbolic final state.
    pub fn dt(&self) -> f64 {
        self.dt
    }
}

/// Run the Euler recurrence over any [`Scalar`].
///
/// `headings[j]` is `(cos(theta_j), sin(theta_j))`. Steps stop at the
/// shorter of `headings` and `accelerations`.
pub fn integrate_euler<S: Scalar>(
    x0: S,
    y0: S,
    v0: S,
    headings: &[(S, S)],
    accelerations: &[S],
    dt: f64,
) -> (S, S) {
    let (mut x, mut y, mut v) = (x0, y0, v0);
    for ((cos, sin), accel) in headings.iter().zip(accelerations) {
        let step = S::from(dt) * v.clone();
        x = x + step.clone() * cos.clone();
        y = y + step * sin.clone();
        v = v + S::from(dt) * accel.clone();
    }
    (x, y)
}

impl TrajectoryModel for KinematicModel {
    type Input = TrajectoryInput;

    fn random_variables(&self) -> &[String] {
        &self.random_names
    }

    fn input_variables(&self) -> &[String] {
        &self.input_names
    }

    fn final_state(&self) -> (Polynomial, Polynomial) {
        let headings: Vec<(Polynomial, Polynomial)> = (0..self.n_steps)
            .map(|j| {
                let theta = Expr::input(3 + j);
                (theta.clone().cos().into(), theta.sin().into())
            })
            .collect();
        let accelerations: Vec<Polynomial> =
            (0..self.n_steps).map(Polynomial::variable).collect();

        integrate_euler(
            Expr::input(0).into(),
            Expr::input(1).into(),
            Expr::input(2).into(),
            &headings,
            &accelerations,
            self.dt,
        )
    }

    fn listify_input_vars(&self, input: &TrajectoryInput) -> Vec<f64> {
        let mut values = Vec::with_capacity(3 + input.thetas.len());
        values.extend([input.x0, input.y0, input.v0]);
        values.extend_from_slice(&input.thetas);
        values
    }

    fn simulate(&self, input: &TrajectoryInput, random: &[f64], dt: f64) -> (f64, f64) {
        let headings: Vec<(f64, f64)> = input.thetas.iter().map(|t| (t.cos(), t.sin())).collect();
        integrate_euler(input.x0, input.y0, input.v0, &headings, random, dt)
    }

    fn step_length(&self) -> Option<f64> {
        Some(self.dt)
    }
}
