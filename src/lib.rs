//! # Introduction
//!
//! linetrace steps through small JavaScript-style teaching programs one line at a
//! time, capturing a snapshot of variables, call frames, printed output and the trace
//! log after every executed line. The snapshot history is then navigated forward and
//! backward through a terminal UI built with [ratatui](https://docs.rs/ratatui), or
//! exported as JSON.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → SourceLines → FunctionTable → TraceEngine → Snapshots → TUI / export
//! ```
//!
//! 1. [`parser`]: normalises the source into non-blank lines and collects function
//!    declarations.
//! 2. [`interpreter`]: classifies and executes each line, then records an
//!    [`snapshot::ExecutionState`].
//! 3. [`memory`]: the value model, the insertion-ordered variable table and the
//!    call stack.
//! 4. [`snapshot`]: snapshot history with clamped lookup and a playback cursor.
//! 5. [`config`] and [`export`]: TOML configuration and JSON persistence.
//! 6. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Supported subset
//!
//! Assignments, `console.log`, calls to functions declared in the same file,
//! `if (...)` conditions and `for (...)` headers. Literals: numbers, quoted strings,
//! `true`, `false`, `null`, `undefined`. Operators: `+ - * /` and
//! `> < >= <= == !=`, one operator per expression.
//!
//! ```
//! use linetrace::config::ExecutionConfig;
//! use linetrace::interpreter::engine::TraceEngine;
//!
//! let engine = TraceEngine::new("x = 10\ny = x + 5", ExecutionConfig::default());
//! assert_eq!(engine.total_steps(), 2);
//! assert_eq!(engine.final_state().variable("y").unwrap().value.to_string(), "15");
//! ```

pub mod config;
pub mod export;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;
