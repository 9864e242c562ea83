// Execution engine for the line tracer

use crate::config::ExecutionConfig;
use crate::export::ExportBundle;
use crate::interpreter::errors::TraceError;
use crate::interpreter::expressions::Evaluator;
use crate::interpreter::statements::Statement;
use crate::memory::globals::{StepChanges, Variable, VariableTable};
use crate::memory::stack::{CallFrame, CallStack};
use crate::memory::value::Value;
use crate::parser::functions::FunctionTable;
use crate::parser::source::SourceLines;
use crate::snapshot::{Action, ExecutionState, OutputBuffer, SnapshotStore, TraceEntry};
use chrono::Utc;
use tracing::{debug, info, warn};

/// A fully traced program.
///
/// Construction runs the whole program and records every snapshot; afterwards the
/// engine is read-only. Errors never escape construction. They end the run and are
/// stored in the last snapshot's `error` field.
#[derive(Debug, Clone)]
pub struct TraceEngine {
    source: String,
    lines: SourceLines,
    functions: FunctionTable,
    config: ExecutionConfig,
    store: SnapshotStore,
}

impl TraceEngine {
    /// Trace `source` without an output sink
    pub fn new(source: &str, config: ExecutionConfig) -> Self {
        Self::build(source, config, None)
    }

    /// Trace `source`, calling `sink` once per printed value in source order
    pub fn with_output_sink<F>(source: &str, config: ExecutionConfig, mut sink: F) -> Self
    where
        F: FnMut(&str),
    {
        Self::build(source, config, Some(&mut sink as &mut dyn FnMut(&str)))
    }

    fn build(source: &str, config: ExecutionConfig, sink: Option<&mut dyn FnMut(&str)>) -> Self {
        if !config.language.is_executable() {
            warn!(
                language = config.language.as_str(),
                "language has no dedicated semantics, tracing with javascript rules"
            );
        }
        if config.max_steps == 0 {
            warn!("max_steps is 0, using a budget of 1");
        }

        let lines = SourceLines::normalize(source);

        let functions = match FunctionTable::build(&lines) {
            Ok(functions) => functions,
            Err(e) => {
                warn!(error = %e, "function table could not be built");
                let line = e.line();
                let mut store = SnapshotStore::new();
                store.push(ExecutionState {
                    current_line: line,
                    current_step: 1,
                    is_complete: true,
                    error: Some(e.into()),
                    ..ExecutionState::initial()
                });
                return TraceEngine {
                    source: source.to_string(),
                    lines,
                    functions: FunctionTable::default(),
                    config,
                    store,
                };
            }
        };

        let mut run = Run::new(&functions, sink);
        run.execute_all(&lines, config.effective_max_steps());
        let store = run.finish();

        info!(
            lines = lines.len(),
            functions = functions.len(),
            steps = store.total_steps(),
            error = store.last().error.is_some(),
            "trace complete"
        );

        TraceEngine {
            source: source.to_string(),
            lines,
            functions,
            config,
            store,
        }
    }

    /// Snapshot at `step`, clamped: negative steps give the initial snapshot and
    /// steps past the end give the last one
    pub fn get_state(&self, step: isize) -> &ExecutionState {
        self.store.get(step)
    }

    /// Number of snapshots after the initial one
    pub fn total_steps(&self) -> usize {
        self.store.total_steps()
    }

    pub fn final_state(&self) -> &ExecutionState {
        self.store.last()
    }

    pub fn snapshots(&self) -> &[ExecutionState] {
        self.store.as_slice()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The non-blank lines that `current_line` indexes into
    pub fn lines(&self) -> &SourceLines {
        &self.lines
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    pub fn export(&self) -> ExportBundle {
        ExportBundle::new(self)
    }
}

/// Mutable interpreter state for a single run
struct Run<'a, 's> {
    functions: &'a FunctionTable,
    sink: Option<&'s mut dyn FnMut(&str)>,
    store: SnapshotStore,
    variables: VariableTable,
    stack: CallStack,
    output: OutputBuffer,
    trace: Vec<TraceEntry>,
}

/// Effect of one executed line, before it is recorded
struct LineEffect {
    action: Action,
    details: String,
    changes: StepChanges,
}

impl LineEffect {
    fn new(action: Action, details: String) -> Self {
        LineEffect {
            action,
            details,
            changes: StepChanges::default(),
        }
    }
}

impl<'a, 's> Run<'a, 's> {
    fn new(functions: &'a FunctionTable, sink: Option<&'s mut dyn FnMut(&str)>) -> Self {
        Run {
            functions,
            sink,
            store: SnapshotStore::new(),
            variables: VariableTable::new(),
            stack: CallStack::new(),
            output: OutputBuffer::new(),
            trace: Vec::new(),
        }
    }

    fn finish(self) -> SnapshotStore {
        self.store
    }

    /// Single linear pass over every non-structural line
    fn execute_all(&mut self, lines: &SourceLines, max_steps: usize) {
        let functions = self.functions;
        let executable: Vec<(usize, Statement)> = lines
            .numbered()
            .filter_map(|(number, text)| {
                Statement::classify(text, number, functions).map(|statement| (number, statement))
            })
            .collect();
        let total = executable.len();

        for (index, (line_number, statement)) in executable.into_iter().enumerate() {
            let step = index + 1;
            let is_last = step == total;

            match self.execute_line(statement, line_number) {
                Ok(effect) => {
                    let budget_hit = step >= max_steps && !is_last;
                    let error =
                        budget_hit.then_some(TraceError::StepBudgetExceeded { limit: max_steps });
                    self.record(step, line_number, effect, is_last || budget_hit, error);
                    if budget_hit {
                        warn!(limit = max_steps, line = line_number, "step budget exceeded");
                        break;
                    }
                }
                Err(e) => {
                    warn!(step, line = line_number, error = %e, "run halted");
                    self.record_failure(step, line_number, e);
                    break;
                }
            }
        }
    }

    fn execute_line(
        &mut self,
        statement: Statement<'_>,
        line_number: usize,
    ) -> Result<LineEffect, TraceError> {
        match statement {
            Statement::Assignment { name, expression } => {
                let value = self.evaluate(expression, line_number)?;
                let details = format!("{} = {}", name, value.to_literal());
                let mut effect = LineEffect::new(Action::Assignment, details);
                let change = self.variables.assign(name, value);
                effect.changes.record(name, change);
                Ok(effect)
            }

            Statement::ConsoleLog { expression } => {
                let value = self.evaluate(expression, line_number)?;
                let printed = value.to_string();
                if let Some(sink) = self.sink.as_deref_mut() {
                    sink(&printed);
                }
                self.output.print(printed);
                Ok(LineEffect::new(
                    Action::ConsoleOutput,
                    format!("console.log({})", value.to_literal()),
                ))
            }

            Statement::Call { name, args } => self.call_function(name, &args, line_number),

            Statement::Condition { condition } => {
                let result = self.evaluate(condition, line_number)?.is_truthy();
                Ok(LineEffect::new(
                    Action::Condition,
                    format!("if ({}) → {}", condition, result),
                ))
            }

            Statement::Loop { clause } => {
                Ok(LineEffect::new(Action::Loop, format!("for ({})", clause)))
            }

            Statement::Expression { text } => {
                Ok(LineEffect::new(Action::Expression, text.to_string()))
            }
        }
    }

    /// Bind arguments to parameters in the global table and push a frame.
    ///
    /// Every argument is evaluated before anything is written, so a failing argument
    /// leaves no partial binding behind.
    fn call_function(
        &mut self,
        name: &str,
        args: &[&str],
        line_number: usize,
    ) -> Result<LineEffect, TraceError> {
        let values = args
            .iter()
            .map(|arg| self.evaluate(arg, line_number))
            .collect::<Result<Vec<_>, _>>()?;

        let params = self
            .functions
            .get(name)
            .map(|def| def.params.clone())
            .unwrap_or_default();

        let rendered: Vec<String> = values.iter().map(Value::to_literal).collect();
        let mut effect = LineEffect::new(
            Action::FunctionCall,
            format!("{}({})", name, rendered.join(", ")),
        );

        let mut bound = Vec::with_capacity(params.len());
        for (i, param) in params.iter().enumerate() {
            let value = values.get(i).cloned().unwrap_or_default();
            let change = self.variables.assign(param, value.clone());
            effect.changes.record(param, change);
            bound.push((param, value));
        }

        let parameters = bound
            .into_iter()
            .map(|(param, value)| Variable::new(param, value, name, &effect.changes))
            .collect();
        self.stack.push_frame(CallFrame {
            function_name: name.to_string(),
            line_number,
            parameters,
            return_value: None,
        });

        Ok(effect)
    }

    fn evaluate(&self, expression: &str, line_number: usize) -> Result<Value, TraceError> {
        Evaluator::new(&self.variables, line_number).evaluate(expression)
    }

    /// Append the trace entry and snapshot for a successful step
    fn record(
        &mut self,
        step: usize,
        line_number: usize,
        effect: LineEffect,
        is_complete: bool,
        error: Option<TraceError>,
    ) {
        let variables = self
            .variables
            .snapshot(self.stack.scope_label(), &effect.changes);
        let call_stack = self.stack.frames().to_vec();

        debug!(
            step,
            line = line_number,
            action = %effect.action,
            details = %effect.details,
            "recorded step"
        );
        self.trace.push(TraceEntry {
            step,
            line: line_number,
            action: effect.action,
            details: effect.details,
            timestamp: Utc::now(),
            call_stack: call_stack.clone(),
            variables: variables.clone(),
        });

        self.store.push(ExecutionState {
            variables,
            call_stack,
            trace: self.trace.clone(),
            current_line: line_number,
            current_step: step,
            is_complete,
            error,
            output: self.output.lines().to_vec(),
        });
    }

    /// Append the terminal snapshot for a step that failed to evaluate
    fn record_failure(&mut self, step: usize, line_number: usize, error: TraceError) {
        self.store.push(ExecutionState {
            variables: self
                .variables
                .snapshot(self.stack.scope_label(), &StepChanges::default()),
            call_stack: self.stack.frames().to_vec(),
            trace: self.trace.clone(),
            current_line: line_number,
            current_step: step,
            is_complete: true,
            error: Some(error),
            output: self.output.lines().to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::errors::ErrorKind;

    fn trace(source: &str) -> TraceEngine {
        TraceEngine::new(source, ExecutionConfig::default())
    }

    #[test]
    fn test_empty_source_has_only_initial_snapshot() {
        let engine = trace("\n   \n");
        assert_eq!(engine.total_steps(), 0);
        assert_eq!(engine.get_state(0), &ExecutionState::initial());
    }

    #[test]
    fn test_unchanged_reassignment_sets_no_flags() {
        let engine = trace("x = 1\nx = 1");
        let x = engine.final_state().variable("x").unwrap();
        assert!(!x.is_new);
        assert!(!x.is_modified);
    }

    #[test]
    fn test_parse_error_becomes_terminal_snapshot() {
        let engine = trace("x = 1\nfunction f(a) {\ny = a");
        assert_eq!(engine.total_steps(), 1);
        let last = engine.final_state();
        assert!(last.is_complete);
        assert_eq!(last.current_line, 2);
        assert_eq!(last.error.as_ref().map(TraceError::kind), Some(ErrorKind::Parse));
        assert!(last.trace.is_empty());
    }

    #[test]
    fn test_failed_call_argument_binds_nothing() {
        let engine = trace("function f(a) {\n}\nf(missing)");
        let last = engine.final_state();
        assert!(last.variables.is_empty());
        assert!(last.call_stack.is_empty());
        assert_eq!(last.current_line, 3);
        assert_eq!(last.current_step, 1);
    }

    #[test]
    fn test_repeated_parameter_is_only_new() {
        let engine = trace("function f(a, a) {\n}\nf(1, 2)");
        let a = engine.final_state().variable("a").unwrap();
        assert_eq!(a.value, Value::Number(2.0));
        assert!(a.is_new);
        assert!(!a.is_modified);
    }

    #[test]
    fn test_function_table_is_exposed() {
        let engine = trace("function add(a, b) {\n}\nfunction show(x)\n{\n}\nadd(1, 2)");
        let names: Vec<&str> = engine
            .functions()
            .definitions()
            .iter()
            .map(|def| def.name.as_str())
            .collect();
        assert_eq!(names, ["add", "show"]);
        assert_eq!(engine.functions().get("show").unwrap().declaration_line, 3);
    }

    #[test]
    fn test_structural_lines_consume_no_step() {
        let engine = trace("function f(a) {\n}\nx = 1\n}\ny = 2");
        assert_eq!(engine.total_steps(), 2);
        assert_eq!(engine.get_state(1).current_line, 3);
        assert_eq!(engine.get_state(2).current_line, 5);
        assert!(engine.get_state(2).is_complete);
    }
}
