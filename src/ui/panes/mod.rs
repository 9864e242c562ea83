//! TUI pane rendering modules
//!
//! Each pane renders one part of the snapshot currently on screen.
//!
//! # Pane Modules
//!
//! - [`source`]: filtered source lines with highlighting and the current line
//! - [`variables`]: the global variable table with change markers
//! - [`stack`]: simulated call frames and their bound parameters
//! - [`terminal`]: printed program output
//! - [`trace`]: the step log
//! - [`status`]: status bar with step counter and keybindings
//! - `utils`: shared block, scroll and value formatting helpers
//!
//! # Architecture
//!
//! Each pane module exports a primary `render_*` function and, where the pane keeps
//! state between frames, a scroll state type.

mod utils;

pub mod source;
pub mod stack;
pub mod status;
pub mod terminal;
pub mod trace;
pub mod variables;

// Re-export render functions for convenience
pub use source::{render_source_pane, SourceRenderData, SourceScrollState};
pub use stack::{render_stack_pane, StackRenderData, StackScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
pub use trace::render_trace_pane;
pub use variables::render_variables_pane;
