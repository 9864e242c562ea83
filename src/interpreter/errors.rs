//! Error types for a trace run
//!
//! This module defines [`TraceError`], which covers every failure that can end a
//! run early. Errors never escape engine construction: the engine records the error
//! in the terminal snapshot, and consumers read it from
//! [`ExecutionState::error`](crate::snapshot::ExecutionState::error).

use crate::parser::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse classification used by consumers to decide how to present a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Parse,
    Evaluation,
    ResourceExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Parse => f.write_str("parse error"),
            ErrorKind::Evaluation => f.write_str("evaluation error"),
            ErrorKind::ResourceExceeded => f.write_str("resource exceeded"),
        }
    }
}

/// Errors that halt a trace run
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "detail", rename_all = "snake_case")]
pub enum TraceError {
    /// Malformed function declaration
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Bare identifier that was never assigned
    #[error("Variable '{name}' is not defined (line {line})")]
    UndefinedVariable { name: String, line: usize },

    /// The configured step budget ran out before the program did
    #[error("Maximum execution steps exceeded ({limit})")]
    StepBudgetExceeded { limit: usize },
}

impl TraceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TraceError::Parse(_) => ErrorKind::Parse,
            TraceError::UndefinedVariable { .. } => ErrorKind::Evaluation,
            TraceError::StepBudgetExceeded { .. } => ErrorKind::ResourceExceeded,
        }
    }

    /// Line number the error points at, if it has one
    pub fn line(&self) -> Option<usize> {
        match self {
            TraceError::Parse(e) => Some(e.line()),
            TraceError::UndefinedVariable { line, .. } => Some(*line),
            TraceError::StepBudgetExceeded { .. } => None,
        }
    }
}
