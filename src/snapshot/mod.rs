// Snapshot storage and playback for time-travel stepping

use crate::interpreter::errors::TraceError;
use crate::memory::globals::Variable;
use crate::memory::stack::CallFrame;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Program output captured from print statements
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    lines: Vec<String>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one printed value
    pub fn print(&mut self, text: String) {
        self.lines.push(text);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// What a step did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Assignment,
    FunctionCall,
    Condition,
    Loop,
    ConsoleOutput,
    Expression,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Action::Assignment => "assignment",
            Action::FunctionCall => "function call",
            Action::Condition => "condition",
            Action::Loop => "loop",
            Action::ConsoleOutput => "console output",
            Action::Expression => "expression",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Log record of one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub step: usize,
    pub line: usize,
    pub action: Action,
    pub details: String,
    pub timestamp: DateTime<Utc>,
    pub call_stack: Vec<CallFrame>,
    pub variables: Vec<Variable>,
}

/// One log line: `step 3  line 4  assignment: x = 10`
impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "step {:>3}  line {:>3}  {}: {}",
            self.step, self.line, self.action, self.details
        )
    }
}

/// Full interpreter state after one step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionState {
    pub variables: Vec<Variable>,
    pub call_stack: Vec<CallFrame>,
    pub trace: Vec<TraceEntry>,
    pub current_line: usize, // Position among non-blank lines, 0 before the first step
    pub current_step: usize,
    pub is_complete: bool,
    pub error: Option<TraceError>,
    pub output: Vec<String>,
}

impl ExecutionState {
    /// The empty state at step 0
    pub fn initial() -> Self {
        ExecutionState {
            variables: Vec::new(),
            call_stack: Vec::new(),
            trace: Vec::new(),
            current_line: 0,
            current_step: 0,
            is_complete: false,
            error: None,
            output: Vec::new(),
        }
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Trace entry recorded by this step, if the step produced one
    pub fn last_entry(&self) -> Option<&TraceEntry> {
        self.trace
            .last()
            .filter(|entry| entry.step == self.current_step)
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

/// Append-only snapshot history with clamped random access
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    snapshots: Vec<ExecutionState>,
}

impl SnapshotStore {
    /// A store holding only the initial snapshot
    pub fn new() -> Self {
        SnapshotStore {
            snapshots: vec![ExecutionState::initial()],
        }
    }

    /// Add a snapshot to history. Nothing follows a terminal snapshot; returns false
    /// when the snapshot was dropped for that reason.
    pub fn push(&mut self, snapshot: ExecutionState) -> bool {
        if self.is_finished() {
            warn!(
                step = snapshot.current_step,
                "snapshot after a terminal snapshot dropped"
            );
            return false;
        }
        self.snapshots.push(snapshot);
        true
    }

    /// Get a snapshot by step, clamped to the recorded range
    pub fn get(&self, step: isize) -> &ExecutionState {
        let index = usize::try_from(step).unwrap_or(0).min(self.total_steps());
        &self.snapshots[index]
    }

    /// Number of snapshots after the initial one
    pub fn total_steps(&self) -> usize {
        self.snapshots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> &ExecutionState {
        self.get(isize::MAX)
    }

    /// Whether a terminal snapshot has been recorded
    pub fn is_finished(&self) -> bool {
        self.last().is_complete
    }

    pub fn as_slice(&self) -> &[ExecutionState] {
        &self.snapshots
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Position in a snapshot history, used for interactive stepping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackCursor {
    position: usize,
    total_steps: usize,
}

impl PlaybackCursor {
    pub fn new(total_steps: usize) -> Self {
        PlaybackCursor {
            position: 0,
            total_steps,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Step index for a [`SnapshotStore::get`] lookup
    pub fn step(&self) -> isize {
        self.position as isize
    }

    pub fn at_start(&self) -> bool {
        self.position == 0
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.total_steps
    }

    /// Returns false when already at the end
    pub fn step_forward(&mut self) -> bool {
        if self.at_end() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Returns false when already at the start
    pub fn step_backward(&mut self) -> bool {
        if self.at_start() {
            return false;
        }
        self.position -= 1;
        true
    }

    /// Step forward up to `n` times, returning how many steps were taken
    pub fn advance(&mut self, n: usize) -> usize {
        let taken = n.min(self.total_steps - self.position);
        self.position += taken;
        taken
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.total_steps;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(step: usize, is_complete: bool) -> ExecutionState {
        ExecutionState {
            current_step: step,
            current_line: step,
            is_complete,
            ..ExecutionState::initial()
        }
    }

    #[test]
    fn test_store_clamps_lookups() {
        let mut store = SnapshotStore::new();
        store.push(state(1, false));
        store.push(state(2, true));

        assert_eq!(store.total_steps(), 2);
        assert_eq!(store.get(-1).current_step, 0);
        assert_eq!(store.get(1).current_step, 1);
        assert_eq!(store.get(99).current_step, 2);
        assert_eq!(store.get(isize::MIN).current_step, 0);
        assert!(store.is_finished());
    }

    #[test]
    fn test_nothing_follows_terminal_snapshot() {
        let mut store = SnapshotStore::new();
        assert!(store.push(state(1, true)));
        assert!(!store.push(state(2, false)));
        assert_eq!(store.total_steps(), 1);
        assert!(store.last().is_complete);
    }

    #[test]
    fn test_empty_store_has_initial_snapshot() {
        let store = SnapshotStore::new();
        assert_eq!(store.len(), 1);
        assert_eq!(store.total_steps(), 0);
        assert_eq!(store.get(5), &ExecutionState::initial());
    }

    #[test]
    fn test_cursor_stepping() {
        let mut cursor = PlaybackCursor::new(3);
        assert!(!cursor.step_backward());
        assert!(cursor.step_forward());
        assert_eq!(cursor.advance(9), 2);
        assert!(cursor.at_end());
        assert!(!cursor.step_forward());
        assert!(cursor.step_backward());
        assert_eq!(cursor.position(), 2);
        cursor.rewind();
        assert!(cursor.at_start());
        cursor.jump_to_end();
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_trace_entry_display() {
        let entry = TraceEntry {
            step: 2,
            line: 5,
            action: Action::ConsoleOutput,
            details: "console.log(10)".into(),
            timestamp: Utc::now(),
            call_stack: Vec::new(),
            variables: Vec::new(),
        };
        assert_eq!(
            entry.to_string(),
            "step   2  line   5  console output: console.log(10)"
        );
    }

    #[test]
    fn test_output_buffer() {
        let mut out = OutputBuffer::new();
        out.print("10".into());
        out.print("large".into());
        assert_eq!(out.lines(), ["10", "large"]);
    }
}
