use std::fmt;
use std::str::FromStr;

use strum_macros::{AsRefStr, EnumString};

use crate::error::EvalError;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, AsRefStr, EnumString)]
pub enum Operator {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Result<Operator, EvalError> {
        Operator::from_str(symbol).map_err(|_: strum::ParseError| EvalError::InvalidOperator)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A numeral as written in the input
///
/// Numerals that do not fit an `i64` are still grammatical, they only fail
/// once evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    OutOfRange(String),
}

impl Literal {
    pub fn parse(digits: &str) -> Literal {
        match digits.parse() {
            Ok(v) => Literal::Int(v),
            Err(_) => Literal::OutOfRange(digits.to_string()),
        }
    }

    pub fn value(&self) -> Result<i64, EvalError> {
        match self {
            Literal::Int(v) => Ok(*v),
            Literal::OutOfRange(_) => Err(EvalError::InvalidNumber),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::OutOfRange(digits) => f.write_str(digits),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(Literal),
    Application {
        operator: Operator,
        first: Box<Expr>,
        rest: Vec<Expr>,
    },
}

impl Expr {
    pub fn int(v: i64) -> Expr {
        Expr::Number(Literal::Int(v))
    }

    pub fn application(operator: Operator, first: Expr, rest: Vec<Expr>) -> Expr {
        Expr::Application {
            operator,
            first: Box::new(first),
            rest,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(literal) => write!(f, "{}", literal),
            Expr::Application {
                operator,
                first,
                rest,
            } => {
                write!(f, "({} {}", operator, first)?;
                for operand in rest {
                    write!(f, " {}", operand)?;
                }
                f.write_str(")")
            }
        }
    }
}
