//! Restricted expression evaluation
//!
//! Expressions are classified by shape, in priority order:
//!
//! 1. Unsigned integer or decimal literal → [`Value::Number`]
//! 2. Single- or double-quoted literal (no escapes) → [`Value::String`]
//! 3. `true` / `false` / `null` / `undefined`
//! 4. Bare identifier → current variable value, or [`TraceError::UndefinedVariable`]
//! 5. One arithmetic operator (`+ - * /`) splitting two operands
//! 6. One comparison operator (`== != < > <= >=`) splitting two operands
//! 7. Anything else → [`Value::Opaque`] holding the text verbatim
//!
//! Operands of rules 5 and 6 go through a weaker resolver: number literal, quoted
//! literal, known variable, otherwise the raw text. An unknown name inside a binary
//! expression is therefore not an error.
//!
//! There is no precedence and no nesting. `a + b * c` splits at the first operator
//! and the right operand `b * c` is kept as raw text.

use super::errors::TraceError;
use crate::memory::globals::VariableTable;
use crate::memory::value::Value;
use crate::parser::scan::{is_identifier, unquoted_positions};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(ArithmeticOp::Add),
            '-' => Some(ArithmeticOp::Sub),
            '*' => Some(ArithmeticOp::Mul),
            '/' => Some(ArithmeticOp::Div),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl ComparisonOp {
    /// Match an operator at the start of `text`, preferring two-character forms
    fn match_prefix(text: &str) -> Option<(Self, usize)> {
        let two = [
            ("==", ComparisonOp::Eq),
            ("!=", ComparisonOp::Ne),
            ("<=", ComparisonOp::Le),
            (">=", ComparisonOp::Ge),
        ];
        for (symbol, op) in two {
            if text.starts_with(symbol) {
                return Some((op, 2));
            }
        }
        match text.chars().next() {
            Some('<') => Some((ComparisonOp::Lt, 1)),
            Some('>') => Some((ComparisonOp::Gt, 1)),
            _ => None,
        }
    }
}

/// Evaluates expressions against the current variable table.
///
/// `line` is only used to locate errors.
pub struct Evaluator<'a> {
    variables: &'a VariableTable,
    line: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(variables: &'a VariableTable, line: usize) -> Self {
        Evaluator { variables, line }
    }

    pub fn evaluate(&self, expression: &str) -> Result<Value, TraceError> {
        let expression = expression.trim();

        if let Some(n) = parse_number_literal(expression) {
            return Ok(Value::Number(n));
        }
        if let Some(text) = parse_quoted_literal(expression) {
            return Ok(Value::String(text.to_string()));
        }
        if let Some(value) = keyword_literal(expression) {
            return Ok(value);
        }
        if is_identifier(expression) {
            return self
                .variables
                .get(expression)
                .cloned()
                .ok_or_else(|| TraceError::UndefinedVariable {
                    name: expression.to_string(),
                    line: self.line,
                });
        }

        if let Some((left, op, right)) = split_arithmetic(expression) {
            let left = self.resolve_operand(left);
            let right = self.resolve_operand(right);
            return Ok(apply_arithmetic(op, &left, &right));
        }
        if let Some((left, op, right)) = split_comparison(expression) {
            let left = self.resolve_operand(left);
            let right = self.resolve_operand(right);
            return Ok(Value::Boolean(apply_comparison(op, &left, &right)));
        }

        Ok(Value::Opaque(expression.to_string()))
    }

    /// Operand resolver for binary expressions; never fails
    fn resolve_operand(&self, text: &str) -> Value {
        let text = text.trim();
        if let Some(n) = parse_number_literal(text) {
            Value::Number(n)
        } else if let Some(inner) = parse_quoted_literal(text) {
            Value::String(inner.to_string())
        } else if let Some(value) = self.variables.get(text) {
            value.clone()
        } else {
            Value::Opaque(text.to_string())
        }
    }
}

/// `digits` or `digits.digits`
pub fn parse_number_literal(text: &str) -> Option<f64> {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || frac_part.is_some_and(|f| !all_digits(f)) {
        return None;
    }
    text.parse().ok()
}

/// Text between matching quotes, provided the quote character does not recur inside
pub fn parse_quoted_literal(text: &str) -> Option<&str> {
    let quote = text.chars().next().filter(|&c| c == '"' || c == '\'')?;
    let inner = text.get(1..)?.strip_suffix(quote)?;
    if inner.contains(quote) {
        None
    } else {
        Some(inner)
    }
}

fn keyword_literal(text: &str) -> Option<Value> {
    match text {
        "true" => Some(Value::Boolean(true)),
        "false" => Some(Value::Boolean(false)),
        "null" => Some(Value::Null),
        "undefined" => Some(Value::Undefined),
        _ => None,
    }
}

/// Split at the first unquoted arithmetic operator with text on both sides
fn split_arithmetic(text: &str) -> Option<(&str, ArithmeticOp, &str)> {
    unquoted_positions(text).find_map(|(i, c)| {
        let op = ArithmeticOp::from_char(c)?;
        let (left, right) = (text[..i].trim(), text[i + 1..].trim());
        (!left.is_empty() && !right.is_empty()).then_some((left, op, right))
    })
}

/// Split at the first unquoted comparison operator with text on both sides
fn split_comparison(text: &str) -> Option<(&str, ComparisonOp, &str)> {
    unquoted_positions(text).find_map(|(i, _)| {
        let (op, len) = ComparisonOp::match_prefix(&text[i..])?;
        let (left, right) = (text[..i].trim(), text[i + len..].trim());
        (!left.is_empty() && !right.is_empty()).then_some((left, op, right))
    })
}

/// `+` concatenates when either side is text; everything else is numeric
pub fn apply_arithmetic(op: ArithmeticOp, left: &Value, right: &Value) -> Value {
    if op == ArithmeticOp::Add && (left.is_text() || right.is_text()) {
        return Value::String(format!("{}{}", left, right));
    }
    let (l, r) = (left.to_number(), right.to_number());
    Value::Number(match op {
        ArithmeticOp::Add => l + r,
        ArithmeticOp::Sub => l - r,
        ArithmeticOp::Mul => l * r,
        ArithmeticOp::Div => l / r,
    })
}

pub fn apply_comparison(op: ComparisonOp, left: &Value, right: &Value) -> bool {
    match op {
        ComparisonOp::Eq => left.loose_eq(right),
        ComparisonOp::Ne => !left.loose_eq(right),
        ComparisonOp::Lt => left.compare(right) == Some(Ordering::Less),
        ComparisonOp::Gt => left.compare(right) == Some(Ordering::Greater),
        ComparisonOp::Le => matches!(
            left.compare(right),
            Some(Ordering::Less | Ordering::Equal)
        ),
        ComparisonOp::Ge => matches!(
            left.compare(right),
            Some(Ordering::Greater | Ordering::Equal)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(vars: &[(&str, Value)]) -> VariableTable {
        let mut table = VariableTable::new();
        for (name, value) in vars {
            table.assign(name, value.clone());
        }
        table
    }

    fn eval(expression: &str, vars: &[(&str, Value)]) -> Result<Value, TraceError> {
        let vars = table(vars);
        Evaluator::new(&vars, 1).evaluate(expression)
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("42", &[]), Ok(Value::Number(42.0)));
        assert_eq!(eval(" 3.25 ", &[]), Ok(Value::Number(3.25)));
        assert_eq!(eval("'hi'", &[]), Ok(Value::String("hi".into())));
        assert_eq!(eval("\"a b\"", &[]), Ok(Value::String("a b".into())));
        assert_eq!(eval("true", &[]), Ok(Value::Boolean(true)));
        assert_eq!(eval("null", &[]), Ok(Value::Null));
        assert_eq!(eval("undefined", &[]), Ok(Value::Undefined));
    }

    #[test]
    fn test_number_literal_shapes() {
        assert_eq!(parse_number_literal("007"), Some(7.0));
        assert_eq!(parse_number_literal("1."), None);
        assert_eq!(parse_number_literal(".5"), None);
        assert_eq!(parse_number_literal("-1"), None);
        assert_eq!(parse_number_literal("1e5"), None);
    }

    #[test]
    fn test_identifier_lookup_and_failure() {
        assert_eq!(
            eval("x", &[("x", Value::Number(10.0))]),
            Ok(Value::Number(10.0))
        );
        assert_eq!(
            eval("z", &[]),
            Err(TraceError::UndefinedVariable {
                name: "z".into(),
                line: 1
            })
        );
    }

    #[test]
    fn test_arithmetic() {
        let vars = [("x", Value::Number(10.0)), ("y", Value::Number(4.0))];
        assert_eq!(eval("x + y", &vars), Ok(Value::Number(14.0)));
        assert_eq!(eval("x - y", &vars), Ok(Value::Number(6.0)));
        assert_eq!(eval("x * 2", &vars), Ok(Value::Number(20.0)));
        assert_eq!(eval("x / y", &vars), Ok(Value::Number(2.5)));
        assert_eq!(eval("x / 0", &vars), Ok(Value::Number(f64::INFINITY)));
    }

    #[test]
    fn test_string_concatenation() {
        let vars = [("name", Value::String("Ada".into()))];
        assert_eq!(
            eval("\"Hello, \" + name", &vars),
            Ok(Value::String("Hello, Ada".into()))
        );
        assert_eq!(
            eval("'n=' + 5", &[]),
            Ok(Value::String("n=5".into()))
        );
        // quoted operator characters do not split
        assert_eq!(
            eval("'a-b' + 'c'", &[]),
            Ok(Value::String("a-bc".into()))
        );
    }

    #[test]
    fn test_unknown_operands_stay_raw() {
        // no error: binary operands use the restricted resolver
        assert_eq!(eval("q + 1", &[]), Ok(Value::String("q1".into())));
        let result = eval("q * 2", &[]).unwrap();
        assert!(result.as_number().is_some_and(f64::is_nan));
    }

    #[test]
    fn test_multi_operator_keeps_right_side_raw() {
        let vars = [("a", Value::Number(1.0))];
        assert_eq!(
            eval("a + b * c", &vars),
            Ok(Value::String("1b * c".into()))
        );
    }

    #[test]
    fn test_comparisons() {
        let vars = [("sum", Value::Number(30.0))];
        assert_eq!(eval("sum > 25", &vars), Ok(Value::Boolean(true)));
        assert_eq!(eval("sum < 25", &vars), Ok(Value::Boolean(false)));
        assert_eq!(eval("sum >= 30", &vars), Ok(Value::Boolean(true)));
        assert_eq!(eval("sum <= 29", &vars), Ok(Value::Boolean(false)));
        assert_eq!(eval("sum == 30", &vars), Ok(Value::Boolean(true)));
        assert_eq!(eval("sum != 30", &vars), Ok(Value::Boolean(false)));
        assert_eq!(eval("'b' > 'a'", &[]), Ok(Value::Boolean(true)));
    }

    #[test]
    fn test_unclassified_is_opaque() {
        assert_eq!(
            eval("add(1, 2)", &[]),
            Ok(Value::Opaque("add(1, 2)".into()))
        );
        assert_eq!(eval("-5", &[]), Ok(Value::Opaque("-5".into())));
        assert_eq!(eval("", &[]), Ok(Value::Opaque(String::new())));
    }
}
