//! Persistence bundle for a traced program
//!
//! An [`ExportBundle`] carries everything needed to replay a trace without the
//! engine: the original source, the filtered lines that `current_line` refers to, the
//! full snapshot sequence, the configuration, and the export time.

use crate::config::ExecutionConfig;
use crate::interpreter::engine::TraceEngine;
use crate::parser::source::SourceLines;
use crate::snapshot::ExecutionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub source: String,
    pub lines: SourceLines,
    pub states: Vec<ExecutionState>,
    pub config: ExecutionConfig,
    pub exported_at: DateTime<Utc>,
}

impl ExportBundle {
    pub fn new(engine: &TraceEngine) -> Self {
        ExportBundle {
            source: engine.source().to_string(),
            lines: engine.lines().clone(),
            states: engine.snapshots().to_vec(),
            config: engine.config().clone(),
            exported_at: Utc::now(),
        }
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path, json)
    }
}
