//! Single-variable math expression parser/evaluator with a trapezoidal
//! integrator.
//!
//! Formulas in the free variable `x` are parsed once into an [`Expression`]
//! tree. The tree is evaluated either at a single point or over a whole
//! vector of points at a time (with optional data parallelism via the `rayon`
//! feature), which is how [`DiscreteIntegral`] samples the partition of its
//! interval before reducing it with the composite trapezoidal rule.
//!
//! # Example
//!
//! ```rust
//! use trapezoid_expr::*;
//!
//! let parsed = Expression::parse("2 * (x + 1) ^ 2").unwrap();
//! assert_eq!(parsed.evaluate(2.0), 18.0);
//!
//! let xs = [0.0, 1.0, 2.0];
//! let mut registers = Registers::new(xs.len());
//! assert_eq!(&parsed.evaluate_many(&xs, &mut registers), &[2.0, 8.0, 18.0]);
//!
//! let mut integral = DiscreteIntegral::new("x", 10, 0.0, 10.0);
//! let result = integral.calculate().unwrap();
//! assert!((result - 50.0).abs() < 1e-9);
//! assert_eq!(integral.samples().len(), 11);
//! ```

#[cfg(feature = "chart")]
pub mod chart;
pub mod config;
mod evaluate;
mod expression;
mod integrate;
mod parse;

/// Uses the [`pest`] parsing expression grammar language.
///
/// ```text
#[doc = include_str!("grammar.pest")]
/// ```
pub mod grammar_doc {}

pub use evaluate::*;
pub use expression::*;
pub use integrate::*;
pub use parse::{Rule, SyntaxError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_once_evaluate_everywhere() {
        let parsed = Expression::parse("log(x, 2) + abs(-x) * e^0").unwrap();
        let xs = [1.0, 2.0, 4.0, 8.0];
        let mut registers = Registers::new(xs.len());
        let output = parsed.evaluate_many(&xs, &mut registers);
        let expected: Vec<f64> = xs.iter().map(|x| parsed.evaluate(*x)).collect();
        assert_eq!(output, expected);
        assert_eq!(&output, &[1.0, 3.0, 6.0, 11.0]);
    }

    #[test]
    fn syntax_error_reaches_caller() {
        let error = Expression::parse("x +").unwrap_err();
        assert!(error.to_string().contains("expected"), "{error}");

        let mut integral = DiscreteIntegral::new("sin(", 10, 0.0, 1.0);
        assert!(integral.calculate().is_err());
    }

    #[test]
    fn expressions_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expression>();
        assert_send_sync::<DiscreteIntegral>();
    }

    #[test]
    fn real_bench() {
        let parsed = Expression::parse("x / (1 + (x^2)) + sin(x) * log(abs(x) + 1)").unwrap();

        const LEN: usize = 1_000_000;
        let xs: Vec<f64> = (0..LEN).map(|i| -5.0 + 10.0 * i as f64 / LEN as f64).collect();

        let mut registers = Registers::new(LEN);
        let start = std::time::Instant::now();
        let _output = parsed.evaluate_many(&xs, &mut registers);
        let elapsed = start.elapsed().as_millis();
        println!(
            "Took {elapsed} ms, {} ns per element",
            (1_000_000 * elapsed) / LEN as u128
        );
        assert_eq!(registers.num_allocations(), 5);
    }
}
