pub use ast::{Expr, Literal, Operator};
pub use error::{EvalError, Expected, SyntaxError};
pub use eval::{Evaluator, Overflow, Value};
pub use parser::{Grammar, MAX_DEPTH};

mod ast;
mod error;
mod eval;
mod parser;
