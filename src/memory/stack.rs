//! Simulated call stack
//!
//! Frames are display metadata only. A frame is pushed when a known function is
//! called and is never popped, because the tracer has no notion of `return`. The
//! parameters recorded in a frame are copies; the live values sit in the flat
//! [`VariableTable`](super::globals::VariableTable).

use super::globals::Variable;
use super::value::Value;
use serde::{Deserialize, Serialize};

/// Scope label used when no function has been called yet
pub const GLOBAL_SCOPE: &str = "global";

/// Stack frame for a recognised function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallFrame {
    pub function_name: String,
    pub line_number: usize,
    pub parameters: Vec<Variable>,
    /// Always `None`: returns are not detected
    pub return_value: Option<Value>,
}

#[derive(Debug, Clone, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_frame(&mut self, frame: CallFrame) {
        self.frames.push(frame);
    }

    pub fn current_frame(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Scope label for variables: the top frame's function, or `"global"`
    pub fn scope_label(&self) -> &str {
        self.current_frame()
            .map(|f| f.function_name.as_str())
            .unwrap_or(GLOBAL_SCOPE)
    }

    pub fn frames(&self) -> &[CallFrame] {
        &self.frames
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_label_follows_top_frame() {
        let mut stack = CallStack::new();
        assert_eq!(stack.scope_label(), "global");

        stack.push_frame(CallFrame {
            function_name: "add".into(),
            line_number: 4,
            parameters: Vec::new(),
            return_value: None,
        });
        stack.push_frame(CallFrame {
            function_name: "greet".into(),
            line_number: 5,
            parameters: Vec::new(),
            return_value: None,
        });

        assert_eq!(stack.scope_label(), "greet");
        assert_eq!(stack.depth(), 2);
    }
}
