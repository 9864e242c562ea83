//! Statement classification
//!
//! Each non-structural line is matched against an ordered list of shapes and the
//! first match wins. The order matters because some lines fit several shapes.
//!
//! 1. Assignment: `name = expression`
//! 2. Console output: `console(log(expr))` or `console.log(expr)`
//! 3. Known function call: `name(args)` where `name` was declared
//! 4. Conditional: `if (expression)`, optionally followed by `{`
//! 5. Loop header: `for (clause)`, optionally followed by `{`
//! 6. Anything else is a plain expression line
//!
//! Structural lines (a function header, its stand-alone `{`, a bare `}`) classify to
//! `None` and are never executed.
//!
//! Classification only borrows slices of the line. Evaluation happens in the engine.

use crate::parser::functions::FunctionTable;
use crate::parser::scan::{is_identifier, keyword_group, split_call, split_top_level_commas};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement<'a> {
    Assignment {
        name: &'a str,
        expression: &'a str,
    },
    ConsoleLog {
        expression: &'a str,
    },
    Call {
        name: &'a str,
        args: Vec<&'a str>,
    },
    Condition {
        condition: &'a str,
    },
    Loop {
        clause: &'a str,
    },
    Expression {
        text: &'a str,
    },
}

impl<'a> Statement<'a> {
    /// `None` for structural lines
    pub fn classify(line: &'a str, line_number: usize, functions: &FunctionTable) -> Option<Self> {
        if functions.is_structural(line_number, line) {
            return None;
        }
        Some(Self::classify_executable(line, functions))
    }

    fn classify_executable(line: &'a str, functions: &FunctionTable) -> Self {
        if let Some((name, expression)) = split_assignment(line) {
            return Statement::Assignment { name, expression };
        }

        if let Some((name, args)) = split_call(line) {
            if name == "console" {
                if let Some(expression) = console_call_argument(args) {
                    return Statement::ConsoleLog { expression };
                }
            }
            if functions.contains(name) {
                return Statement::Call {
                    name,
                    args: split_arguments(args),
                };
            }
        }

        if let Some(expression) = console_log_argument(line) {
            return Statement::ConsoleLog { expression };
        }

        if let Some(condition) = keyword_group(line, "if") {
            return Statement::Condition {
                condition: condition.trim(),
            };
        }

        if let Some(clause) = keyword_group(line, "for") {
            return Statement::Loop {
                clause: clause.trim(),
            };
        }

        Statement::Expression { text: line }
    }
}

/// `name = expression`, where the `=` is not the start of `==`
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let eq = line.find('=')?;
    let name = line[..eq].trim_end();
    let rest = &line[eq + 1..];
    if rest.starts_with('=') || !is_identifier(name) {
        return None;
    }
    let expression = rest.trim();
    if expression.is_empty() {
        None
    } else {
        Some((name, expression))
    }
}

/// Argument of the `console(log(expr))` spelling, given the outer argument text
fn console_call_argument(args: &str) -> Option<&str> {
    let inner = args.strip_prefix("log(")?;
    let inner = inner.strip_suffix(')').unwrap_or(inner).trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

/// Argument of the direct `console.log(expr)` spelling
fn console_log_argument(line: &str) -> Option<&str> {
    let inner = line.strip_prefix("console.log(")?.strip_suffix(')')?.trim();
    if inner.is_empty() {
        None
    } else {
        Some(inner)
    }
}

fn split_arguments(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }
    split_top_level_commas(args).into_iter().map(str::trim).collect()
}
