use log::trace;
use serde::Deserialize;

use crate::ast::{Expr, Operator};
use crate::error::EvalError;

pub type Value = Result<i64, EvalError>;

/// What `+ - * /` do when the exact result doesn't fit an `i64`
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    /// Report `InvalidNumber`
    Checked,
    /// Two's complement wraparound
    Wrapping,
    /// Clamp to `i64::MIN` or `i64::MAX`
    Saturating,
}

impl Default for Overflow {
    fn default() -> Self {
        Overflow::Checked
    }
}

type Checked = fn(i64, i64) -> Option<i64>;
type Total = fn(i64, i64) -> i64;

impl Overflow {
    fn arith(self, x: i64, y: i64, checked: Checked, wrapping: Total, saturating: Total) -> Value {
        match self {
            Overflow::Checked => checked(x, y).ok_or(EvalError::InvalidNumber),
            Overflow::Wrapping => Ok(wrapping(x, y)),
            Overflow::Saturating => Ok(saturating(x, y)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    overflow: Overflow,
}

impl Evaluator {
    pub fn new(overflow: Overflow) -> Evaluator {
        Evaluator { overflow }
    }

    pub fn evaluate(&self, expr: &Expr) -> Value {
        match expr {
            Expr::Number(literal) => literal.value(),
            Expr::Application {
                operator,
                first,
                rest,
            } => rest.iter().fold(self.evaluate(first), |acc, operand| {
                let y = self.evaluate(operand);
                self.apply(acc, *operator, y)
            }),
        }
    }

    /// Folds `y` into `x`, an error on either side is returned unchanged
    pub fn apply(&self, x: Value, op: Operator, y: Value) -> Value {
        let x = x?;
        let y = y?;

        let r = match op {
            Operator::Add => self.overflow.arith(
                x,
                y,
                i64::checked_add,
                i64::wrapping_add,
                i64::saturating_add,
            ),
            Operator::Sub => self.overflow.arith(
                x,
                y,
                i64::checked_sub,
                i64::wrapping_sub,
                i64::saturating_sub,
            ),
            Operator::Mul => self.overflow.arith(
                x,
                y,
                i64::checked_mul,
                i64::wrapping_mul,
                i64::saturating_mul,
            ),
            Operator::Div if y == 0 => Err(EvalError::DivideByZero),
            Operator::Div => self.overflow.arith(
                x,
                y,
                i64::checked_div,
                i64::wrapping_div,
                i64::saturating_div,
            ),
        };

        if let Err(e) = r {
            trace!("{} {} {} failed: {:?}", op, x, y, e);
        }
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Grammar;

    fn eval(line: &str) -> Result<Value, Box<dyn std::error::Error>> {
        let expr = Grammar::new("<test>").parse(line)?;
        Ok(Evaluator::default().evaluate(&expr))
    }

    const SAMPLES: [i64; 9] = [0, 1, -1, 7, -7, 42, -1000, 123_456_789, -987_654_321];

    #[test]
    fn test_arithmetic() -> Result<(), Box<dyn std::error::Error>> {
        for a in SAMPLES.iter() {
            for b in SAMPLES.iter() {
                assert_eq!(eval(&format!("+ {} {}", a, b))?, Ok(a + b));
                assert_eq!(eval(&format!("- {} {}", a, b))?, Ok(a - b));
                assert_eq!(eval(&format!("* {} {}", a, b))?, Ok(a * b));

                if *b == 0 {
                    assert_eq!(
                        eval(&format!("/ {} {}", a, b))?,
                        Err(EvalError::DivideByZero)
                    );
                } else {
                    assert_eq!(eval(&format!("/ {} {}", a, b))?, Ok(a / b));
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_division_truncates() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(eval("/ 7 2")?, Ok(3));
        assert_eq!(eval("/ -7 2")?, Ok(-3));
        assert_eq!(eval("/ 7 -2")?, Ok(-3));
        assert_eq!(eval("/ -7 -2")?, Ok(3));
        Ok(())
    }

    #[test]
    fn test_fold() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(eval("+ 5")?, Ok(5));
        assert_eq!(eval("- 5")?, Ok(5));
        assert_eq!(eval("+ 1 2 3 4")?, Ok(10));
        assert_eq!(eval("- 10 1 2 3")?, Ok(4));
        assert_eq!(eval("/ 100 5 2")?, Ok(10));
        assert_eq!(eval("+ (* 2 3) (- 10 4)")?, Ok(12));
        assert_eq!(eval("- (* 2 3) 4")?, Ok(2));
        assert_eq!(eval("* (+ 1 (- 5 (/ 9 3))) 4")?, Ok(12));
        Ok(())
    }

    #[test]
    fn test_error_propagation() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(eval("+ (/ 1 0) 5")?, Err(EvalError::DivideByZero));
        assert_eq!(eval("+ 5 (/ 1 0)")?, Err(EvalError::DivideByZero));
        assert_eq!(eval("* 0 (/ 1 0)")?, Err(EvalError::DivideByZero));
        assert_eq!(eval("/ 0 0")?, Err(EvalError::DivideByZero));
        assert_eq!(eval("+ 1 (* 2 (- 3 (/ 4 0)))")?, Err(EvalError::DivideByZero));

        // The left-most error wins
        assert_eq!(
            eval("+ (/ 1 0) 123456789012345678901234567890")?,
            Err(EvalError::DivideByZero)
        );
        assert_eq!(
            eval("+ 123456789012345678901234567890 (/ 1 0)")?,
            Err(EvalError::InvalidNumber)
        );
        assert_eq!(
            eval("/ 123456789012345678901234567890 0")?,
            Err(EvalError::InvalidNumber)
        );
        Ok(())
    }

    #[test]
    fn test_invalid_number() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(
            eval("+ 123456789012345678901234567890")?,
            Err(EvalError::InvalidNumber)
        );
        assert_eq!(
            eval("+ 1 -123456789012345678901234567890")?,
            Err(EvalError::InvalidNumber)
        );
        assert_eq!(eval("+ 9223372036854775807")?, Ok(i64::MAX));
        assert_eq!(eval("+ -9223372036854775808")?, Ok(i64::MIN));
        Ok(())
    }

    #[test]
    fn test_apply() {
        let e = Evaluator::default();

        assert_eq!(e.apply(Ok(6), Operator::Div, Ok(3)), Ok(2));
        assert_eq!(
            e.apply(Err(EvalError::InvalidNumber), Operator::Add, Err(EvalError::DivideByZero)),
            Err(EvalError::InvalidNumber)
        );
        assert_eq!(
            e.apply(Ok(1), Operator::Add, Err(EvalError::InvalidOperator)),
            Err(EvalError::InvalidOperator)
        );
    }

    #[test]
    fn test_overflow() -> Result<(), Box<dyn std::error::Error>> {
        let checked = Evaluator::new(Overflow::Checked);
        let wrapping = Evaluator::new(Overflow::Wrapping);
        let saturating = Evaluator::new(Overflow::Saturating);

        let grammar = Grammar::new("<test>");
        let add = grammar.parse("+ 9223372036854775807 1")?;
        let sub = grammar.parse("- -9223372036854775808 1")?;
        let mul = grammar.parse("* 4611686018427387904 -4")?;
        let div = grammar.parse("/ -9223372036854775808 -1")?;

        assert_eq!(checked.evaluate(&add), Err(EvalError::InvalidNumber));
        assert_eq!(checked.evaluate(&sub), Err(EvalError::InvalidNumber));
        assert_eq!(checked.evaluate(&mul), Err(EvalError::InvalidNumber));
        assert_eq!(checked.evaluate(&div), Err(EvalError::InvalidNumber));

        assert_eq!(wrapping.evaluate(&add), Ok(i64::MIN));
        assert_eq!(wrapping.evaluate(&sub), Ok(i64::MAX));
        assert_eq!(wrapping.evaluate(&mul), Ok(0));
        assert_eq!(wrapping.evaluate(&div), Ok(i64::MIN));

        assert_eq!(saturating.evaluate(&add), Ok(i64::MAX));
        assert_eq!(saturating.evaluate(&sub), Ok(i64::MIN));
        assert_eq!(saturating.evaluate(&mul), Ok(i64::MIN));
        assert_eq!(saturating.evaluate(&div), Ok(i64::MAX));

        let zero = grammar.parse("/ 1 0")?;
        assert_eq!(wrapping.evaluate(&zero), Err(EvalError::DivideByZero));
        assert_eq!(saturating.evaluate(&zero), Err(EvalError::DivideByZero));
        Ok(())
    }

    #[test]
    fn test_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let line = "* (+ 1 2) (- 9 3) 2";
        assert_eq!(eval(line)?, eval(line)?);
        assert_eq!(eval(line)?, Ok(36));
        Ok(())
    }
}
