//! Function table construction
//!
//! Before anything runs, the filtered lines are scanned once for declarations of the
//! form `function name(a, b)` with an optional trailing `{`. The body of each
//! declaration is found by counting braces until the balancing closer. Bodies are
//! stored for display but never executed as a unit: their lines are still visited by
//! the single linear pass like any other line.
//!
//! # Structural Lines
//!
//! Declaration headers and a declaration's stand-alone `{` line are structural.
//! Together with bare `}` lines they are skipped by the tracer and never consume a
//! step.

use super::scan::{brace_delta, is_identifier, is_word_char};
use super::source::SourceLines;
use super::ParseError;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A declared function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub params: Vec<String>,
    /// Lines strictly between the opening and closing braces
    pub body: Vec<String>,
    pub declaration_line: usize,
}

/// The parts of a `function name(params)` header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionHeader<'a> {
    pub name: &'a str,
    pub params: Vec<String>,
    pub opens_body: bool,
}

/// Recognise a declaration header. Returns `None` for any other line.
pub fn parse_header(line: &str) -> Option<FunctionHeader<'_>> {
    let rest = line.strip_prefix("function")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let name_end = rest.find(|c: char| !is_word_char(c))?;
    let name = &rest[..name_end];
    if !is_identifier(name) {
        return None;
    }

    let rest = rest[name_end..].trim_start().strip_prefix('(')?;
    let close = rest.find(')')?;
    let params_text = &rest[..close];
    let opens_body = match rest[close + 1..].trim() {
        "" => false,
        "{" => true,
        _ => return None,
    };

    let params = params_text
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    Some(FunctionHeader {
        name,
        params,
        opens_body,
    })
}

/// Declared functions plus the line numbers that belong to declaration syntax
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: FxHashMap<String, FunctionDefinition>,
    structural_lines: FxHashSet<usize>,
}

impl FunctionTable {
    /// Scan every line for declarations.
    ///
    /// A header must be followed by its opening brace, either at the end of the
    /// header or alone on the next line, and the braces must balance before the end
    /// of the source. A later declaration of the same name replaces the earlier one.
    pub fn build(lines: &SourceLines) -> Result<Self, ParseError> {
        let mut table = FunctionTable::default();

        for (number, text) in lines.numbered() {
            let Some(header) = parse_header(text) else {
                continue;
            };
            table.structural_lines.insert(number);

            let mut body_start = number + 1;
            if !header.opens_body {
                if lines.get(number + 1) != Some("{") {
                    return Err(ParseError::MalformedFunction {
                        name: header.name.to_string(),
                        line: number,
                    });
                }
                table.structural_lines.insert(number + 1);
                body_start += 1;
            }

            let mut depth: isize = 1;
            let mut body = Vec::new();
            let mut closed = false;
            for body_number in body_start..=lines.len() {
                let Some(body_line) = lines.get(body_number) else {
                    break;
                };
                depth += brace_delta(body_line);
                if depth <= 0 {
                    closed = true;
                    break;
                }
                body.push(body_line.to_string());
            }

            if !closed {
                return Err(ParseError::UnbalancedFunctionBody {
                    name: header.name.to_string(),
                    line: number,
                });
            }

            debug!(
                function = header.name,
                params = header.params.len(),
                body_lines = body.len(),
                line = number,
                "registered function"
            );
            table.functions.insert(
                header.name.to_string(),
                FunctionDefinition {
                    name: header.name.to_string(),
                    params: header.params,
                    body,
                    declaration_line: number,
                },
            );
        }

        Ok(table)
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Whether a line is declaration syntax or a bare closing brace
    pub fn is_structural(&self, line_number: usize, text: &str) -> bool {
        text == "}" || self.structural_lines.contains(&line_number)
    }

    /// Definitions sorted by declaration line
    pub fn definitions(&self) -> Vec<&FunctionDefinition> {
        let mut defs: Vec<_> = self.functions.values().collect();
        defs.sort_by_key(|d| d.declaration_line);
        defs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(source: &str) -> Result<FunctionTable, ParseError> {
        FunctionTable::build(&SourceLines::normalize(source))
    }

    #[test]
    fn test_parse_header() {
        let header = parse_header("function add(a, b) {").unwrap();
        assert_eq!(header.name, "add");
        assert_eq!(header.params, vec!["a", "b"]);
        assert!(header.opens_body);

        let header = parse_header("function noop()").unwrap();
        assert!(header.params.is_empty());
        assert!(!header.opens_body);

        assert!(parse_header("functional(x)").is_none());
        assert!(parse_header("function f() { return 1 }").is_none());
        assert!(parse_header("x = function").is_none());
    }

    #[test]
    fn test_body_extraction_with_nested_braces() {
        let table = build(
            "function check(n) {\n  if (n > 1) {\n    y = n\n  }\n  z = 2\n}\ncheck(3)",
        )
        .unwrap();

        let def = table.get("check").unwrap();
        assert_eq!(def.declaration_line, 1);
        assert_eq!(def.params, vec!["n"]);
        assert_eq!(def.body, vec!["if (n > 1) {", "y = n", "}", "z = 2"]);
        assert!(table.is_structural(1, "function check(n) {"));
        assert!(table.is_structural(6, "}"));
        assert!(!table.is_structural(7, "check(3)"));
    }

    #[test]
    fn test_opening_brace_on_next_line() {
        let table = build("function f(a)\n{\nb = a\n}").unwrap();
        assert_eq!(table.get("f").unwrap().body, vec!["b = a"]);
        assert!(table.is_structural(2, "{"));
    }

    #[test]
    fn test_unbalanced_body_is_an_error() {
        let err = build("function f(a) {\nb = a\nc = 1").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnbalancedFunctionBody {
                name: "f".into(),
                line: 1
            }
        );
    }

    #[test]
    fn test_header_without_body_is_malformed() {
        let err = build("x = 1\nfunction f(a)\nb = a").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(matches!(err, ParseError::MalformedFunction { .. }));
    }

    #[test]
    fn test_redeclaration_replaces() {
        let table = build("function f(a) {\n}\nfunction f(a, b) {\n}").unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("f").unwrap().params.len(), 2);
        assert_eq!(table.get("f").unwrap().declaration_line, 3);
    }
}
