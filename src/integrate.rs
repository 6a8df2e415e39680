use crate::evaluate::Registers;
use crate::expression::Expression;
use crate::parse::SyntaxError;

use log::{debug, info, warn};

/// One evaluated point of the integrand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

/// Definite integral of a formula approximated with the composite
/// trapezoidal rule over `intervals` equal subintervals.
///
/// The formula and bounds are fixed at construction. [`Self::calculate`] is
/// meant to run once per instance: running it again appends a second set of
/// samples.
#[derive(Clone, Debug)]
pub struct DiscreteIntegral {
    function: String,
    intervals: usize,
    initial_x: f64,
    end_x: f64,
    samples: Vec<Sample>,
    result: Option<f64>,
}

impl DiscreteIntegral {
    pub fn new(function: impl Into<String>, intervals: usize, initial_x: f64, end_x: f64) -> Self {
        Self {
            function: function.into(),
            intervals,
            initial_x,
            end_x,
            samples: Vec::new(),
            result: None,
        }
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn intervals(&self) -> usize {
        self.intervals
    }

    pub fn initial_x(&self) -> f64 {
        self.initial_x
    }

    pub fn end_x(&self) -> f64 {
        self.end_x
    }

    /// Every point evaluated so far, in evaluation order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// `None` until [`Self::calculate`] has succeeded.
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    /// Parses the formula once, samples it at `initial_x`, every interior
    /// partition point, and `end_x`, then reduces the samples with the
    /// trapezoidal rule.
    ///
    /// `intervals == 0` is not rejected: the step is infinite or `NaN` and so
    /// is the result. A malformed formula records nothing.
    pub fn calculate(&mut self) -> Result<f64, SyntaxError> {
        let expression = Expression::parse(&self.function)?;
        for name in expression.variable_aliases() {
            warn!("Identifier `{name}` in `{}` is evaluated as x", self.function);
        }
        for name in expression.unknown_functions() {
            warn!("Unknown function `{name}` in `{}` is evaluated as x", self.function);
        }

        let (a, b) = (self.initial_x, self.end_x);
        let coefficient = (b - a) / self.intervals as f64;
        let xs: Vec<f64> = std::iter::once(a)
            .chain((1..self.intervals).map(|i| a + i as f64 * coefficient))
            .chain(std::iter::once(b))
            .collect();
        debug!(
            "Sampling `{}` at {} points with step {coefficient}",
            self.function,
            xs.len()
        );

        let mut registers = Registers::new(xs.len());
        let ys = expression.evaluate_many(&xs, &mut registers);

        let (starting_point, ending_point) = match ys.as_slice() {
            [first, .., last] => (first / 2.0, last / 2.0),
            _ => unreachable!("partition always has both endpoints"),
        };
        let sum: f64 = ys[1..ys.len() - 1].iter().sum();
        let result = coefficient * (starting_point + sum + ending_point);

        self.samples
            .extend(xs.into_iter().zip(ys).map(|(x, y)| Sample { x, y }));
        self.result = Some(result);
        info!(
            "Integral of `{}` from {a} to {b} over {} intervals = {result}",
            self.function, self.intervals
        );
        Ok(result)
    }

    /// Chart title, e.g. `Integral of x/(1+(x^2)) from -5.00 to 5.00 = 0.0000`.
    ///
    /// An uncalculated integral shows `NaN` as its result.
    pub fn title(&self) -> String {
        format!(
            "Integral of {} from {:.2} to {:.2} = {:.4}",
            self.function.replace(' ', ""),
            self.initial_x,
            self.end_x,
            self.result.unwrap_or(f64::NAN)
        )
    }

    /// `(min, max)` of the sampled x values.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        range(self.samples.iter().map(|s| s.x))
    }

    /// `(min, max)` of the sampled y values.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        range(self.samples.iter().map(|s| s.y))
    }
}

/// Scans from the first value, replacing the bounds only on strict `<`/`>`.
fn range(mut values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let first = values.next()?;
    Some(values.fold((first, first), |(min, max), v| {
        (if v < min { v } else { min }, if v > max { v } else { max })
    }))
}
