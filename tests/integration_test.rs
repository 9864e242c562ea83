// Integration tests for the line tracer

use linetrace::config::ExecutionConfig;
use linetrace::export::ExportBundle;
use linetrace::interpreter::engine::TraceEngine;
use linetrace::interpreter::errors::{ErrorKind, TraceError};
use linetrace::memory::value::{Value, ValueKind};
use linetrace::snapshot::{Action, ExecutionState};

fn trace(source: &str) -> TraceEngine {
    TraceEngine::new(source, ExecutionConfig::default())
}

fn trace_with_budget(source: &str, max_steps: usize) -> TraceEngine {
    TraceEngine::new(source, ExecutionConfig::default().with_max_steps(max_steps))
}

/// Snapshots with every timestamp reset, for comparing two runs
fn without_timestamps(engine: &TraceEngine) -> Vec<ExecutionState> {
    let mut states = engine.snapshots().to_vec();
    for state in &mut states {
        for entry in &mut state.trace {
            entry.timestamp = Default::default();
        }
    }
    states
}

const SAMPLES: &[&str] = &[
    "",
    "x = 10",
    "x = 10\nconsole.log(x)",
    "x = 5\nx = 7",
    "y = z",
    "a = 1\n\n   \nb = a + 1\nconsole(log(b))",
    "function f(a) {\nconsole.log(a)\n}\nf(3)",
    "x = 3\nif (x > 5) {\nconsole.log(\"big\")\n}",
    "function broken(a)\nx = 1",
];

#[test]
fn test_scenario_single_assignment() {
    let engine = trace("x = 10");
    assert_eq!(engine.total_steps(), 1);

    let state = engine.get_state(1);
    assert_eq!(state.variables.len(), 1);
    let x = &state.variables[0];
    assert_eq!(x.name, "x");
    assert_eq!(x.value, Value::Number(10.0));
    assert_eq!(x.kind, ValueKind::Number);
    assert!(x.is_new);
    assert!(!x.is_modified);
    assert!(state.output.is_empty());
    assert!(state.is_complete);
    assert!(state.error.is_none());
}

#[test]
fn test_scenario_console_output() {
    let engine = trace("x = 10\nconsole.log(x)");
    assert_eq!(engine.total_steps(), 2);

    let last = engine.final_state();
    assert_eq!(last.output, ["10"]);
    assert_eq!(last.trace[1].action, Action::ConsoleOutput);
    assert_eq!(last.trace[1].details, "console.log(10)");
    assert_eq!(last.trace[0].details, "x = 10");
}

#[test]
fn test_scenario_reassignment() {
    let engine = trace("x = 5\nx = 7");
    let x = engine.final_state().variable("x").unwrap();
    assert_eq!(x.value, Value::Number(7.0));
    assert!(!x.is_new);
    assert!(x.is_modified);
    assert_eq!(engine.final_state().variables.len(), 1);
}

#[test]
fn test_scenario_undefined_variable_halts() {
    let engine = trace("y = z\nx = 1");
    assert_eq!(engine.total_steps(), 1);

    let last = engine.final_state();
    assert!(last.is_complete);
    assert_eq!(last.current_step, 1);
    assert_eq!(last.current_line, 1);
    assert!(last.trace.is_empty());
    assert!(last.variables.is_empty());

    let error = last.error.as_ref().unwrap();
    assert_eq!(error.kind(), ErrorKind::Evaluation);
    assert_eq!(
        error,
        &TraceError::UndefinedVariable {
            name: "z".into(),
            line: 1
        }
    );
    assert!(!error.to_string().is_empty());
}

#[test]
fn test_scenario_step_budget() {
    let engine = trace_with_budget("a = 1\nb = 2", 1);
    assert_eq!(engine.total_steps(), 1);

    let last = engine.final_state();
    assert!(last.is_complete);
    assert_eq!(
        last.error,
        Some(TraceError::StepBudgetExceeded { limit: 1 })
    );
    assert_eq!(
        last.error_message().unwrap(),
        "Maximum execution steps exceeded (1)"
    );
    assert_eq!(last.error.as_ref().unwrap().kind(), ErrorKind::ResourceExceeded);
    // The step itself still ran
    assert_eq!(last.variable("a").unwrap().value, Value::Number(1.0));
    assert!(last.variable("b").is_none());
}

#[test]
fn test_budget_equal_to_program_length_completes_normally() {
    let engine = trace_with_budget("a = 1\nb = 2", 2);
    assert_eq!(engine.total_steps(), 2);
    assert!(engine.final_state().error.is_none());
    assert!(engine.final_state().is_complete);
}

#[test]
fn test_zero_budget_acts_as_one() {
    let engine = trace_with_budget("a = 1\nb = 2\nc = 3", 0);
    assert_eq!(engine.total_steps(), 1);
    assert_eq!(
        engine.final_state().error,
        Some(TraceError::StepBudgetExceeded { limit: 1 })
    );
}

#[test]
fn test_budget_from_toml_config() {
    let config = ExecutionConfig::from_toml_str("max_steps = 2").unwrap();
    let engine = TraceEngine::new("a = 1\nb = 2\nc = 3", config);
    assert_eq!(engine.total_steps(), 2);
    assert_eq!(
        engine.final_state().error,
        Some(TraceError::StepBudgetExceeded { limit: 2 })
    );
}

#[test]
fn test_snapshot_count_and_initial_state() {
    for source in SAMPLES {
        let engine = trace(source);
        assert_eq!(
            engine.total_steps() + 1,
            engine.snapshots().len(),
            "source: {:?}",
            source
        );
        assert_eq!(engine.get_state(0), &ExecutionState::initial());
        assert!(engine.final_state().is_complete || engine.total_steps() == 0);
    }
}

#[test]
fn test_current_step_matches_index() {
    for source in SAMPLES {
        let engine = trace(source);
        for k in 0..=engine.total_steps() {
            assert_eq!(engine.get_state(k as isize).current_step, k);
        }
    }
}

#[test]
fn test_current_line_without_functions_is_step() {
    let engine = trace("a = 1\nb = 2\n\nconsole.log(a)\nc = a + b");
    for k in 1..=engine.total_steps() {
        assert_eq!(engine.get_state(k as isize).current_line, k);
    }
}

#[test]
fn test_lookup_is_clamped() {
    let engine = trace("a = 1\nb = 2");
    assert_eq!(engine.get_state(-1), engine.get_state(0));
    assert_eq!(engine.get_state(isize::MIN), engine.get_state(0));
    assert_eq!(engine.get_state(99), engine.final_state());
    assert_eq!(engine.get_state(isize::MAX).current_step, 2);
}

#[test]
fn test_runs_are_deterministic() {
    for source in SAMPLES {
        let first = trace(source);
        let second = trace(source);
        assert_eq!(without_timestamps(&first), without_timestamps(&second));
    }
}

#[test]
fn test_change_flags_are_per_step() {
    let engine = trace("x = 1\ny = 2\nx = 3");

    let second = engine.get_state(2);
    assert!(!second.variable("x").unwrap().is_new);
    assert!(second.variable("y").unwrap().is_new);

    let third = engine.get_state(3);
    assert!(third.variable("x").unwrap().is_modified);
    assert!(!third.variable("y").unwrap().is_new);
    assert!(!third.variable("y").unwrap().is_modified);
}

#[test]
fn test_variables_keep_insertion_order() {
    let engine = trace("b = 1\na = 2\nc = 3\nb = 4");
    let names: Vec<&str> = engine
        .final_state()
        .variables
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(names, ["b", "a", "c"]);
}

#[test]
fn test_output_sink_sees_every_print_in_order() {
    let mut seen = Vec::new();
    let engine = TraceEngine::with_output_sink(
        "a = 1\nconsole.log(a)\nconsole.log(\"two\")\nconsole(log(a + 2))",
        ExecutionConfig::default(),
        |text| seen.push(text.to_string()),
    );
    assert_eq!(seen, ["1", "two", "3"]);
    assert_eq!(engine.final_state().output, seen);
}

#[test]
fn test_console_spellings_trace_identically() {
    let direct = trace("x = 4\nconsole.log(x)");
    let nested = trace("x = 4\nconsole(log(x))");

    let a = direct.final_state().last_entry().unwrap();
    let b = nested.final_state().last_entry().unwrap();
    assert_eq!(a.action, b.action);
    assert_eq!(a.details, b.details);
    assert_eq!(direct.final_state().output, nested.final_state().output);
}

#[test]
fn test_function_call_binds_parameters_as_globals() {
    let engine = trace("function add(a, b) {\n}\nadd(2, 3)");
    assert_eq!(engine.total_steps(), 1);

    let last = engine.final_state();
    assert_eq!(last.variable("a").unwrap().value, Value::Number(2.0));
    assert_eq!(last.variable("b").unwrap().value, Value::Number(3.0));
    assert!(last.variables.iter().all(|v| v.scope == "add"));

    let entry = last.last_entry().unwrap();
    assert_eq!(entry.action, Action::FunctionCall);
    assert_eq!(entry.details, "add(2, 3)");

    assert_eq!(last.call_stack.len(), 1);
    let frame = &last.call_stack[0];
    assert_eq!(frame.function_name, "add");
    assert_eq!(frame.line_number, 3);
    assert_eq!(frame.parameters.len(), 2);
    assert!(frame.parameters[0].is_new);
    assert!(frame.return_value.is_none());
}

#[test]
fn test_call_overwrites_global_of_same_name() {
    let engine = trace("a = 5\nfunction f(a) {\n}\nf(7)");
    let a = engine.final_state().variable("a").unwrap();
    assert_eq!(a.value, Value::Number(7.0));
    assert!(a.is_modified);
    assert_eq!(engine.final_state().variables.len(), 1);
}

#[test]
fn test_missing_arguments_are_undefined() {
    let engine = trace("function f(a, b) {\n}\nf(1)");
    let last = engine.final_state();
    assert_eq!(last.variable("b").unwrap().value, Value::Undefined);
    assert_eq!(last.variable("b").unwrap().kind, ValueKind::Undefined);
}

#[test]
fn test_frames_are_never_popped() {
    let engine = trace("function f(a) {\n}\nf(1)\nf(2)\nx = 3");
    let last = engine.final_state();
    assert_eq!(last.call_stack.len(), 2);
    assert_eq!(last.call_stack[1].line_number, 4);
    assert_eq!(last.variable("x").unwrap().scope, "f");
}

#[test]
fn test_function_body_runs_inline_before_call() {
    let engine = trace("function greet(name) {\nconsole.log(\"hi \" + name)\n}\ngreet(\"Ada\")");
    assert_eq!(engine.total_steps(), 2);
    assert_eq!(engine.final_state().output, ["hi name"]);
    assert_eq!(engine.get_state(1).current_line, 2);
    assert_eq!(engine.get_state(2).current_line, 4);
    assert_eq!(
        engine.final_state().variable("name").unwrap().value,
        Value::String("Ada".into())
    );
}

#[test]
fn test_unknown_call_is_plain_expression() {
    let engine = trace("launch(1, 2)");
    let entry = engine.final_state().last_entry().unwrap();
    assert_eq!(entry.action, Action::Expression);
    assert_eq!(entry.details, "launch(1, 2)");
    assert!(engine.final_state().call_stack.is_empty());
}

#[test]
fn test_condition_does_not_branch() {
    let engine = trace("x = 3\nif (x > 5) {\nconsole.log(\"big\")\n}\nconsole.log(\"done\")");
    assert_eq!(engine.total_steps(), 4);

    let last = engine.final_state();
    assert_eq!(last.output, ["big", "done"]);
    assert_eq!(last.trace[1].action, Action::Condition);
    assert_eq!(last.trace[1].details, "if (x > 5) → false");
    assert_eq!(last.current_line, 5);
}

#[test]
fn test_loop_header_does_not_iterate() {
    let engine = trace("for (i = 0; i < 3; i++) {\nconsole.log(i)\n}");
    assert_eq!(engine.total_steps(), 2);

    let first = engine.get_state(1).last_entry().unwrap();
    assert_eq!(first.action, Action::Loop);
    assert_eq!(first.details, "for (i = 0; i < 3; i++)");

    // i was never assigned
    let last = engine.final_state();
    assert_eq!(last.current_line, 2);
    assert_eq!(
        last.error,
        Some(TraceError::UndefinedVariable {
            name: "i".into(),
            line: 2
        })
    );
}

#[test]
fn test_malformed_function_is_reported() {
    let engine = trace("function broken(a)\nx = 1");
    assert_eq!(engine.total_steps(), 1);

    let last = engine.final_state();
    assert_eq!(last.error.as_ref().unwrap().kind(), ErrorKind::Parse);
    assert_eq!(
        last.error_message().unwrap(),
        "Function 'broken' declared at line 1 has no opening brace"
    );
    assert!(last.variables.is_empty());
}

#[test]
fn test_brace_on_next_line_is_structural() {
    let engine = trace("function f(a)\n{\n}\nf(1)");
    assert_eq!(engine.total_steps(), 1);
    assert_eq!(engine.final_state().current_line, 4);
}

#[test]
fn test_non_javascript_language_traces_the_same() {
    let source = "x = 2\nconsole.log(x * 3)";
    let config = ExecutionConfig::default().with_language(linetrace::config::Language::Python);
    let python = TraceEngine::new(source, config);
    assert_eq!(python.final_state().output, ["6"]);
    assert_eq!(without_timestamps(&python), without_timestamps(&trace(source)));
}

#[test]
fn test_export_round_trip_through_file() {
    let engine = trace("x = 1\ny = x + 1\nconsole.log(y)");
    let path = std::env::temp_dir().join(format!(
        "linetrace-export-{}.json",
        std::process::id()
    ));

    engine.export().write_to(&path).expect("export failed");
    let text = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    let bundle = ExportBundle::from_json(&text).unwrap();
    assert_eq!(bundle.states, engine.snapshots());
    assert_eq!(bundle.lines, *engine.lines());
    assert_eq!(bundle.config, *engine.config());
}
