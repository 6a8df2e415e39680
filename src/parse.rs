use crate::expression::{Expression, Function, VARIABLE_NAME};

use log::debug;
use once_cell::sync::Lazy;
use pest::error::ErrorVariant;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"] // relative to project `src`
struct ExpressionParser;

pub type SyntaxError = pest::error::Error<Rule>;

impl Expression {
    /// Parse the expression from `input`.
    ///
    /// The identifier [`VARIABLE_NAME`] becomes [`Expression::Variable`]; any
    /// other bare identifier becomes an [`Expression::Constant`].
    pub fn parse(input: &str) -> Result<Self, SyntaxError> {
        debug!("Parsing expression: {input}");
        let pairs = ExpressionParser::parse(Rule::calculation, input)?;
        let expression = climb_recursive(pairs.filter(|p| p.as_rule() != Rule::EOI))?;
        debug!("Parsed expression: {expression:?}");
        Ok(expression)
    }
}

static PRATT_PARSER: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    use Assoc::*;
    use Rule::*;

    // Negation binds looser than `^` so that `-x^2` is `-(x^2)`.
    PrattParser::new()
        .op(Op::infix(add, Left) | Op::infix(subtract, Left))
        .op(Op::infix(multiply, Left) | Op::infix(divide, Left))
        .op(Op::prefix(neg) | Op::prefix(pos))
        .op(Op::infix(power, Right))
});

type ClimbResult = Result<Expression, SyntaxError>;

fn climb_recursive<'i>(input: impl Iterator<Item = Pair<'i, Rule>>) -> ClimbResult {
    PRATT_PARSER
        .map_primary(|pair: Pair<Rule>| -> ClimbResult {
            match pair.as_rule() {
                Rule::real_expr => climb_recursive(pair.into_inner()),
                Rule::real_literal => pair
                    .as_str()
                    .parse::<f64>()
                    .map(Expression::Literal)
                    .map_err(|e| {
                        SyntaxError::new_from_span(
                            ErrorVariant::CustomError {
                                message: format!("Unexpected literal: {e}"),
                            },
                            pair.as_span(),
                        )
                    }),
                Rule::identifier => Ok(match pair.as_str() {
                    VARIABLE_NAME => Expression::Variable,
                    name => Expression::Constant(name.to_string()),
                }),
                Rule::call => {
                    let mut inner = pair.into_inner();
                    let name = inner.next().expect("call starts with an identifier");
                    let args = inner
                        .map(|arg| climb_recursive(arg.into_inner()))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Expression::Call(Function::from_name(name.as_str()), args))
                }
                x => unreachable!("Unexpected primary rule {x:?}"),
            }
        })
        .map_prefix(|op: Pair<Rule>, only: ClimbResult| -> ClimbResult {
            match op.as_rule() {
                Rule::neg => Ok(Expression::Neg(Box::new(only?))),
                Rule::pos => Ok(Expression::Pos(Box::new(only?))),
                x => unreachable!("Unexpected unary operator {x:?}"),
            }
        })
        .map_infix(
            |lhs: ClimbResult, op: Pair<Rule>, rhs: ClimbResult| -> ClimbResult {
                let (lhs, rhs) = (Box::new(lhs?), Box::new(rhs?));
                match op.as_rule() {
                    Rule::add => Ok(Expression::Add(lhs, rhs)),
                    Rule::subtract => Ok(Expression::Sub(lhs, rhs)),
                    Rule::multiply => Ok(Expression::Mul(lhs, rhs)),
                    Rule::divide => Ok(Expression::Div(lhs, rhs)),
                    Rule::power => Ok(Expression::Pow(lhs, rhs)),
                    x => unreachable!("Unexpected operator {x:?}"),
                }
            },
        )
        .parse(input)
}
