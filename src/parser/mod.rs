//! Line-shape parsing for traced programs
//!
//! There is no lexer or AST. Programs are handled as a list of trimmed lines:
//! - [`source`]: Normalizes raw text into numbered non-blank lines
//! - [`functions`]: Pre-scans declarations into a [`functions::FunctionTable`]
//! - [`scan`]: Quote-aware character helpers shared with the interpreter

pub mod functions;
pub mod scan;
pub mod source;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Malformed declaration syntax found while building the function table
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ParseError {
    /// Header not followed by an opening brace
    #[error("Function '{name}' declared at line {line} has no opening brace")]
    MalformedFunction { name: String, line: usize },

    /// Body braces never balance before the end of the source
    #[error("Function '{name}' declared at line {line} is missing its closing brace")]
    UnbalancedFunctionBody { name: String, line: usize },
}

impl ParseError {
    /// Line number of the offending declaration
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedFunction { line, .. } => *line,
            ParseError::UnbalancedFunctionBody { line, .. } => *line,
        }
    }
}
