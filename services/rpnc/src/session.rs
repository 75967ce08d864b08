use rpn::{Evaluator, Grammar, Value};
use telemetry::Measure;

use crate::config::Config;

lazy_static! {
    static ref PARSE_MEASURE: Measure = Measure::new("session", "parse");
    static ref EVALUATE_MEASURE: Measure = Measure::new("session", "evaluate");
}

/// Turns one line of input into one line of output
///
/// Nothing is retained between lines
pub struct Session {
    grammar: Grammar,
    evaluator: Evaluator,
}

impl Session {
    pub fn new(config: &Config) -> Session {
        Session {
            grammar: Grammar::new("<stdin>"),
            evaluator: Evaluator::new(config.overflow),
        }
    }

    pub fn execute(&self, line: &str) -> String {
        let expr = match PARSE_MEASURE.stats(|| self.grammar.parse(line)) {
            Ok(expr) => expr,
            Err(e) => {
                debug!("Rejected {:?}: {}", line, e);
                return e.to_string();
            }
        };

        debug!("Evaluating {}", expr);
        format_value(EVALUATE_MEASURE.stats(|| self.evaluator.evaluate(&expr)))
    }
}

fn format_value(value: Value) -> String {
    match value {
        Ok(n) => n.to_string(),
        Err(e) => format!("Error: {}", e),
    }
}
