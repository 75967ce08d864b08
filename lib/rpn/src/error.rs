use std::fmt;

use derive_more::Display;

use telemetry::IsErr;

#[derive(Debug, Display, Clone, Copy, Hash, PartialEq, Eq)]
pub enum EvalError {
    #[display(fmt = "Division by zero.")]
    DivideByZero,

    #[display(fmt = "Invalid operator.")]
    InvalidOperator,

    #[display(fmt = "Invalid number.")]
    InvalidNumber,
}

impl std::error::Error for EvalError {}

// Counted as failures so the evaluate measure shows how many lines errored
impl IsErr for EvalError {}

/// Something the grammar would have accepted at the point of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    Char(char),
    Rule(&'static str),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Char(c) => write!(f, "'{}'", c),
            Expected::Rule(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    pub source: String,
    pub line: usize,
    pub column: usize,
    pub expected: Vec<Expected>,
    /// `None` when the input ended
    pub found: Option<char>,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: error: ", self.source, self.line, self.column)?;

        match self.expected.split_last() {
            None => f.write_str("unexpected ")?,
            Some((last, [])) => write!(f, "expected {} at ", last)?,
            Some((last, init)) => {
                f.write_str("expected ")?;
                for (idx, e) in init.iter().enumerate() {
                    if idx != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", e)?;
                }
                write!(f, " or {} at ", last)?;
            }
        }

        match self.found {
            Some(c) => write!(f, "'{}'", c.escape_debug()),
            None => f.write_str("end of input"),
        }
    }
}

impl std::error::Error for SyntaxError {}

// Counted as failures so the parse measure shows how many lines were rejected
impl IsErr for SyntaxError {}
