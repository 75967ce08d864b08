use std::cmp::Ordering;

use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit1, one_of},
    combinator::{cut, map, map_res, opt, recognize},
    error::{context, ErrorKind, ParseError},
    sequence::{pair, preceded},
    Err, IResult,
};

use crate::ast::{Expr, Literal, Operator};
use crate::error::{Expected, SyntaxError};

/// The furthest point a parse reached and what would have been accepted there
#[derive(Debug, Clone, PartialEq)]
struct Failure<'a> {
    input: &'a str,
    expected: Vec<Expected>,
}

impl<'a> Failure<'a> {
    fn expecting(input: &'a str, expected: Expected) -> Self {
        Failure {
            input,
            expected: vec![expected],
        }
    }
}

impl<'a> ParseError<&'a str> for Failure<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        let expected = match kind {
            ErrorKind::Digit => vec![Expected::Rule("digit")],
            ErrorKind::Eof => vec![Expected::Rule("end of input")],
            _ => vec![],
        };
        Failure { input, expected }
    }

    fn append(_: &'a str, _: ErrorKind, other: Self) -> Self {
        other
    }

    fn from_char(input: &'a str, c: char) -> Self {
        Failure::expecting(input, Expected::Char(c))
    }

    fn or(self, other: Self) -> Self {
        // Less remaining input means the branch got further
        match self.input.len().cmp(&other.input.len()) {
            Ordering::Less => self,
            Ordering::Greater => other,
            Ordering::Equal => {
                let mut merged = self;
                for e in other.expected {
                    if !merged.expected.contains(&e) {
                        merged.expected.push(e);
                    }
                }
                merged
            }
        }
    }

    fn add_context(input: &'a str, ctx: &'static str, other: Self) -> Self {
        if other.input.len() == input.len() || other.expected.is_empty() {
            return Failure::expecting(other.input, Expected::Rule(ctx));
        }
        other
    }
}

type Res<'a, O> = IResult<&'a str, O, Failure<'a>>;

/// Deepest nesting of parenthesised groups a line may use
///
/// Parsing, evaluating and dropping a tree all recurse once per level
pub const MAX_DEPTH: usize = 128;

const TOO_DEEP: &str = "at most 128 nested groups";

fn whitespace(i: &str) -> Res<'_, &str> {
    take_while(|c: char| " \t\r\n\x0b\x0c".contains(c))(i)
}

fn operator(i: &str) -> Res<'_, Operator> {
    preceded(
        whitespace,
        context(
            "operator",
            map_res(recognize(one_of("+-*/")), Operator::from_symbol),
        ),
    )(i)
}

fn number(i: &str) -> Res<'_, Literal> {
    preceded(
        whitespace,
        context(
            "number",
            map(recognize(pair(opt(char('-')), digit1)), Literal::parse),
        ),
    )(i)
}

fn closing(i: &str) -> Res<'_, ()> {
    map(preceded(whitespace, char(')')), |_| ())(i)
}

fn end(i: &str) -> Res<'_, ()> {
    let (i, _) = whitespace(i)?;
    if i.is_empty() {
        Ok((i, ()))
    } else {
        Err(Err::Error(Failure::from_error_kind(i, ErrorKind::Eof)))
    }
}

/// One or more `expr` at `depth` up to and including `terminator`
///
/// When neither another operand nor the terminator matches, the error lists
/// both so the diagnostic says what could have come next
fn operands<'a, F>(i: &'a str, depth: usize, terminator: F) -> Res<'a, (Expr, Vec<Expr>)>
where
    F: Fn(&'a str) -> Res<'a, ()>,
{
    let (mut i, first) = expr(i, depth)?;
    let mut rest = Vec::new();
    loop {
        match terminator(i) {
            Ok((i, ())) => return Ok((i, (first, rest))),
            Err(Err::Error(stop)) => match expr(i, depth) {
                Ok((next, operand)) => {
                    rest.push(operand);
                    i = next;
                }
                Err(Err::Error(e)) => return Err(Err::Error(e.or(stop))),
                Err(e) => return Err(e),
            },
            Err(e) => return Err(e),
        }
    }
}

fn group<'a>(i: &'a str, depth: usize) -> Res<'a, Expr> {
    let (after, _) = preceded(whitespace, char('('))(i)?;
    if depth >= MAX_DEPTH {
        let open = &i[i.len() - after.len() - 1..];
        return Err(Err::Failure(Failure::expecting(open, Expected::Rule(TOO_DEEP))));
    }

    let (i, op) = cut(operator)(after)?;
    let (i, (first, rest)) = cut(move |i: &'a str| operands(i, depth + 1, closing))(i)?;
    Ok((i, Expr::application(op, first, rest)))
}

fn expr<'a>(i: &'a str, depth: usize) -> Res<'a, Expr> {
    alt((
        map(number, Expr::Number),
        move |i: &'a str| group(i, depth),
    ))(i)
}

fn program(i: &str) -> Res<'_, Expr> {
    let (i, op) = operator(i)?;
    let (i, (first, rest)) = operands(i, 0, end)?;
    Ok((i, Expr::application(op, first, rest)))
}

/// The calculator grammar
///
/// ```text
/// number   : /-?[0-9]+/ ;
/// operator : '+' | '-' | '*' | '/' ;
/// expr     : <number> | '(' <operator> <expr>+ ')' ;
/// program  : /^/ <operator> <expr>+ /$/ ;
/// ```
#[derive(Debug, Clone)]
pub struct Grammar {
    source: String,
}

impl Grammar {
    /// `source` names the input in diagnostics
    pub fn new(source: impl Into<String>) -> Grammar {
        Grammar {
            source: source.into(),
        }
    }

    pub fn parse(&self, line: &str) -> Result<Expr, SyntaxError> {
        match program(line) {
            Ok((_, expr)) => Ok(expr),
            Err(Err::Error(failure)) | Err(Err::Failure(failure)) => {
                Err(self.syntax_error(line, failure))
            }
            Err(Err::Incomplete(_)) => {
                let rest = &line[line.len()..];
                Err(self.syntax_error(line, Failure::from_error_kind(rest, ErrorKind::Eof)))
            }
        }
    }

    fn syntax_error(&self, line: &str, failure: Failure<'_>) -> SyntaxError {
        let consumed = &line[..line.len() - failure.input.len()];
        let current = consumed.rsplit('\n').next().unwrap_or(consumed);

        SyntaxError {
            source: self.source.clone(),
            line: consumed.matches('\n').count() + 1,
            column: current.chars().count() + 1,
            expected: failure.expected,
            found: failure.input.chars().next(),
        }
    }
}
