use crate::expression::{Expression, Function, EULER_NAME};

use std::f64::consts::E;

#[cfg(feature = "rayon")]
use rayon::prelude::{
    IndexedParallelIterator, IntoParallelRefIterator, ParallelExtend, ParallelIterator,
};

impl Function {
    /// The single-argument form of a recognized function. `None` for
    /// [`Function::Unknown`].
    fn unary_op(&self) -> Option<fn(f64) -> f64> {
        let op: fn(f64) -> f64 = match self {
            Self::Log => f64::ln,
            Self::Sin => f64::sin,
            Self::Cos => f64::cos,
            Self::Tan => f64::tan,
            Self::Arcsin => f64::asin,
            Self::Arccos => f64::acos,
            Self::Arctan => f64::atan,
            Self::Abs => f64::abs,
            Self::Unknown(_) => return None,
        };
        Some(op)
    }
}

/// Log of `value` in base `base`.
fn log_base(value: f64, base: f64) -> f64 {
    value.ln() / base.ln()
}

fn constant_value(name: &str) -> Option<f64> {
    (name == EULER_NAME).then_some(E)
}

/// How a call is evaluated once its function and arity are known.
enum CallKind<'a> {
    /// Yields the free variable untouched.
    Fallback,
    Unary(fn(f64) -> f64, &'a Expression),
    LogBase(&'a Expression, &'a Expression),
}

fn classify_call<'a>(function: &Function, args: &'a [Expression]) -> CallKind<'a> {
    match (function.unary_op(), args) {
        (_, []) => panic!("Call to `{}` has no arguments", function.name()),
        (None, _) => CallKind::Fallback,
        (Some(_), [value, base]) if *function == Function::Log => CallKind::LogBase(value, base),
        (Some(op), [arg, ..]) => CallKind::Unary(op, arg),
    }
}

impl Expression {
    /// Evaluates the expression with the free variable bound to `x`.
    ///
    /// Domain errors and division by zero are not checked; they surface as
    /// `NaN` or infinities.
    ///
    /// # Panics
    ///
    /// If the tree contains an [`Expression::Call`] without arguments. The
    /// parser never produces one.
    pub fn evaluate(&self, x: f64) -> f64 {
        match self {
            Self::Add(lhs, rhs) => lhs.evaluate(x) + rhs.evaluate(x),
            Self::Div(lhs, rhs) => lhs.evaluate(x) / rhs.evaluate(x),
            Self::Mul(lhs, rhs) => lhs.evaluate(x) * rhs.evaluate(x),
            Self::Pow(lhs, rhs) => lhs.evaluate(x).powf(rhs.evaluate(x)),
            Self::Sub(lhs, rhs) => lhs.evaluate(x) - rhs.evaluate(x),
            Self::Neg(only) => -only.evaluate(x),
            Self::Pos(only) => only.evaluate(x),
            Self::Literal(value) => *value,
            Self::Constant(name) => constant_value(name).unwrap_or(x),
            Self::Variable => x,
            Self::Call(function, args) => match classify_call(function, args) {
                CallKind::Fallback => x,
                CallKind::Unary(op, arg) => op(arg.evaluate(x)),
                CallKind::LogBase(value, base) => log_base(value.evaluate(x), base.evaluate(x)),
            },
        }
    }

    /// Calculates the results of the expression component-wise over `xs`.
    ///
    /// Produces exactly what [`Expression::evaluate`] would for each element,
    /// in input order.
    pub fn evaluate_many(&self, xs: &[f64], registers: &mut Registers) -> Vec<f64> {
        assert_eq!(xs.len(), registers.register_length);
        self.evaluate_recursive(xs, registers)
    }

    fn evaluate_recursive(&self, xs: &[f64], registers: &mut Registers) -> Vec<f64> {
        match self {
            Self::Add(lhs, rhs) => {
                evaluate_binary_real_op(|lhs, rhs| lhs + rhs, lhs, rhs, xs, registers)
            }
            Self::Div(lhs, rhs) => {
                evaluate_binary_real_op(|lhs, rhs| lhs / rhs, lhs, rhs, xs, registers)
            }
            Self::Mul(lhs, rhs) => {
                evaluate_binary_real_op(|lhs, rhs| lhs * rhs, lhs, rhs, xs, registers)
            }
            Self::Pow(lhs, rhs) => {
                evaluate_binary_real_op(|lhs, rhs| lhs.powf(rhs), lhs, rhs, xs, registers)
            }
            Self::Sub(lhs, rhs) => {
                evaluate_binary_real_op(|lhs, rhs| lhs - rhs, lhs, rhs, xs, registers)
            }
            Self::Neg(only) => evaluate_unary_real_op(|only| -only, only, xs, registers),
            Self::Pos(only) => only.evaluate_recursive(xs, registers),
            Self::Literal(value) => registers.filled(*value),
            Self::Constant(name) => match constant_value(name) {
                Some(value) => registers.filled(value),
                None => registers.copied(xs),
            },
            // Only reached when the free variable is the whole expression or
            // the operand of a fallback.
            Self::Variable => registers.copied(xs),
            Self::Call(function, args) => match classify_call(function, args) {
                CallKind::Fallback => registers.copied(xs),
                CallKind::Unary(op, arg) => evaluate_unary_real_op(op, arg, xs, registers),
                CallKind::LogBase(value, base) => {
                    evaluate_binary_real_op(log_base, value, base, xs, registers)
                }
            },
        }
    }

    /// Whether this node evaluates to the free variable itself.
    fn is_free_variable(&self) -> bool {
        match self {
            Self::Variable => true,
            Self::Constant(name) => constant_value(name).is_none(),
            _ => false,
        }
    }
}

fn evaluate_binary_real_op(
    op: fn(f64, f64) -> f64,
    lhs: &Expression,
    rhs: &Expression,
    xs: &[f64],
    registers: &mut Registers,
) -> Vec<f64> {
    // Before doing recursive evaluation, we check first if the operand is the
    // input itself. This avoids unnecessary copies.
    let mut lhs_reg = None;
    let lhs_values: &[f64] = if lhs.is_free_variable() {
        xs
    } else {
        lhs_reg.insert(lhs.evaluate_recursive(xs, registers))
    };
    let mut rhs_reg = None;
    let rhs_values: &[f64] = if rhs.is_free_variable() {
        xs
    } else {
        rhs_reg.insert(rhs.evaluate_recursive(xs, registers))
    };
    // Allocate this output register as lazily as possible.
    let mut output = registers.allocate_real();

    #[cfg(feature = "rayon")]
    {
        output.par_extend(
            lhs_values
                .par_iter()
                .zip(rhs_values.par_iter())
                .map(|(lhs, rhs)| op(*lhs, *rhs)),
        );
    }
    #[cfg(not(feature = "rayon"))]
    {
        output.extend(
            lhs_values
                .iter()
                .zip(rhs_values.iter())
                .map(|(lhs, rhs)| op(*lhs, *rhs)),
        );
    }

    if let Some(r) = lhs_reg {
        registers.recycle_real(r);
    }
    if let Some(r) = rhs_reg {
        registers.recycle_real(r);
    }
    output
}

fn evaluate_unary_real_op(
    op: fn(f64) -> f64,
    only: &Expression,
    xs: &[f64],
    registers: &mut Registers,
) -> Vec<f64> {
    let mut only_reg = None;
    let only_values: &[f64] = if only.is_free_variable() {
        xs
    } else {
        only_reg.insert(only.evaluate_recursive(xs, registers))
    };
    let mut output = registers.allocate_real();

    #[cfg(feature = "rayon")]
    {
        output.par_extend(only_values.par_iter().map(|only| op(*only)));
    }
    #[cfg(not(feature = "rayon"))]
    {
        output.extend(only_values.iter().map(|only| op(*only)));
    }

    if let Some(r) = only_reg {
        registers.recycle_real(r);
    }
    output
}

/// Scratch space for calculations. Can be reused across evaluations with the
/// same input length.
///
/// Attempts to minimize allocations by recycling registers after intermediate
/// calculations have finished.
pub struct Registers {
    num_allocations: usize,
    real_registers: Vec<Vec<f64>>,
    register_length: usize,
}

impl Registers {
    pub fn new(register_length: usize) -> Self {
        Self {
            num_allocations: 0,
            real_registers: vec![],
            register_length,
        }
    }

    pub fn register_length(&self) -> usize {
        self.register_length
    }

    pub fn num_allocations(&self) -> usize {
        self.num_allocations
    }

    fn recycle_real(&mut self, mut used: Vec<f64>) {
        used.clear();
        self.real_registers.push(used);
    }

    fn allocate_real(&mut self) -> Vec<f64> {
        self.real_registers.pop().unwrap_or_else(|| {
            self.num_allocations += 1;
            Vec::with_capacity(self.register_length)
        })
    }

    fn filled(&mut self, value: f64) -> Vec<f64> {
        let mut output = self.allocate_real();
        output.resize(self.register_length, value);
        output
    }

    fn copied(&mut self, xs: &[f64]) -> Vec<f64> {
        let mut output = self.allocate_real();
        output.extend_from_slice(xs);
        output
    }
}
