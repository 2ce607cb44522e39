//! Coefficient expressions over deterministic inputs.
//!
//! Expressions are small trees built while expanding a trajectory model. At
//! compile time each tree is flattened into a postfix program
//! ([`CompiledExpr`]) that evaluates without recursion or allocation beyond
//! a fixed-depth stack.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};

/// Expression tree over indexed deterministic inputs.
///
/// Arithmetic through the operator impls folds constants and drops
/// additive/multiplicative identities, so polynomials built from these
/// expressions do not accumulate `0 * x` terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Literal value.
    Const(f64),
    /// Deterministic input by position.
    Input(usize),
    /// Sum of two expressions.
    Add(Box<Expr>, Box<Expr>),
    /// Product of two expressions.
    Mul(Box<Expr>, Box<Expr>),
    /// Negation.
    Neg(Box<Expr>),
    /// Cosine.
    Cos(Box<Expr>),
    /// Sine.
    Sin(Box<Expr>),
}

impl Expr {
    /// Literal value.
    pub fn constant(value: f64) -> Self {
        Expr::Const(value)
    }

    /// Deterministic input at `index`.
    pub fn input(index: usize) -> Self {
        Expr::Input(index)
    }

    /// Cosine of this expression.
    pub fn cos(self) -> Self {
        match self {
            Expr::Const(v) => Expr::Const(v.cos()),
            e => Expr::Cos(Box::new(e)),
        }
    }

    /// Sine of this expression.
    pub fn sin(self) -> Self {
        match self {
            Expr::Const(v) => Expr::Const(v.sin()),
            e => Expr::Sin(Box::new(e)),
        }
    }

    /// Whether this is the literal zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(v) if *v == 0.0)
    }

    /// Evaluate directly from the tree.
    ///
    /// # Panics
    ///
    /// Panics if an input index is out of range for `inputs`.
    pub fn eval(&self, inputs: &[f64]) -> f64 {
        match self {
            Expr::Const(v) => *v,
            Expr::Input(i) => inputs[*i],
            Expr::Add(a, b) => a.eval(inputs) + b.eval(inputs),
            Expr::Mul(a, b) => a.eval(inputs) * b.eval(inputs),
            Expr::Neg(a) => -a.eval(inputs),
            Expr::Cos(a) => a.eval(inputs).cos(),
            Expr::Sin(a) => a.eval(inputs).sin(),
        }
    }

    /// Number of inputs the expression needs (one past the largest index).
    pub fn arity(&self) -> usize {
        match self {
            Expr::Const(_) => 0,
            Expr::Input(i) => i + 1,
            Expr::Add(a, b) | Expr::Mul(a, b) => a.arity().max(b.arity()),
            Expr::Neg(a) | Expr::Cos(a) | Expr::Sin(a) => a.arity(),
        }
    }

    /// Flatten into a postfix program taking `n_inputs` values.
    ///
    /// # Errors
    ///
    /// [`RiskError::DimensionMismatch`] if the expression references an
    /// input at or beyond `n_inputs`.
    pub fn compile(&self, n_inputs: usize) -> Result<CompiledExpr> {
        let arity = self.arity();
        if arity > n_inputs {
            return Err(RiskError::DimensionMismatch {
                what: "deterministic inputs referenced by coefficient",
                expected: n_inputs,
                actual: arity,
            });
        }

        let mut program = Vec::new();
        let mut depth = 0;
        let mut max_depth = 0;
        self.emit(&mut program, &mut depth, &mut max_depth);

        Ok(CompiledExpr {
            program,
            stack_depth: max_depth,
            n_inputs,
        })
    }

    fn emit(&self, program: &mut Vec<Op>, depth: &mut usize, max_depth: &mut usize) {
        match self {
            Expr::Const(v) => {
                program.push(Op::Push(*v));
                *depth += 1;
            }
            Expr::Input(i) => {
                program.push(Op::Load(*i));
                *depth += 1;
            }
            Expr::Add(a, b) | Expr::Mul(a, b) => {
                a.emit(program, depth, max_depth);
                b.emit(program, depth, max_depth);
                program.push(if matches!(self, Expr::Add(..)) { Op::Add } else { Op::Mul });
                *depth -= 1;
            }
            Expr::Neg(a) => {
                a.emit(program, depth, max_depth);
                program.push(Op::Neg);
            }
            Expr::Cos(a) => {
                a.emit(program, depth, max_depth);
                program.push(Op::Cos);
            }
            Expr::Sin(a) => {
                a.emit(program, depth, max_depth);
                program.push(Op::Sin);
            }
        }
        *max_depth = (*max_depth).max(*depth);
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Const(value)
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Const(a), Expr::Const(b)) => Expr::Const(a + b),
            (a, b) if a.is_zero() => b,
            (a, b) if b.is_zero() => a,
            (a, b) => Expr::Add(Box::new(a), Box::new(b)),
        }
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self + (-rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        match (self, rhs) {
            (Expr::Const(a), Expr::Const(b)) => Expr::Const(a * b),
            (a, b) if a.is_zero() || b.is_zero() => Expr::Const(0.0),
            (Expr::Const(one), b) if one == 1.0 => b,
            (a, Expr::Const(one)) if one == 1.0 => a,
            (a, b) => Expr::Mul(Box::new(a), Box::new(b)),
        }
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        match self {
            Expr::Const(v) => Expr::Const(-v),
            Expr::Neg(inner) => *inner,
            e => Expr::Neg(Box::new(e)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(v) => write!(f, "{v}"),
            Expr::Input(i) => write!(f, "u{i}"),
            Expr::Add(a, b) => write!(f, "({a} + {b})"),
            Expr::Mul(a, b) => write!(f, "{a}*{b}"),
            Expr::Neg(a) => write!(f, "-{a}"),
            Expr::Cos(a) => write!(f, "cos({a})"),
            Expr::Sin(a) => write!(f, "sin({a})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Op {
    Push(f64),
    Load(usize),
    Add,
    Mul,
    Neg,
    Cos,
    Sin,
}

/// Postfix program evaluating one coefficient.
///
/// Pure: the result depends only on the input slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledExpr {
    program: Vec<Op>,
    stack_depth: usize,
    n_inputs: usize,
}

impl CompiledExpr {
    /// Number of deterministic inputs the program was compiled for.
    pub fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    /// Evaluate at `inputs`.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` is shorter than [`n_inputs`](Self::n_inputs);
    /// callers validate lengths once per evaluation.
    pub fn eval(&self, inputs: &[f64]) -> f64 {
        let mut stack: Vec<f64> = Vec::with_capacity(self.stack_depth);
        for op in &self.program {
            match *op {
                Op::Push(v) => stack.push(v),
                Op::Load(i) => stack.push(inputs[i]),
                Op::Add | Op::Mul => {
                    let b = stack.pop().unwrap_or_default();
                    let a = stack.pop().unwrap_or_default();
                    stack.push(if *op == Op::Add { a + b } else { a * b });
                }
                Op::Neg | Op::Cos | Op::Sin => {
                    let a = stack.pop().unwrap_or_default();
                    stack.push(match *op {
                        Op::Neg => -a,
                        Op::Cos => a.cos(),
                        _ => a.sin(),
                    });
                }
            }
        }
        debug_assert_eq!(stack.len(), 1, "postfix program must leave one value");
        stack.pop().unwrap_or_default()
    }
}
