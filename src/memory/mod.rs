//! Memory model for the line tracer
//!
//! This module provides the state a traced program mutates:
//! - [`value`]: Runtime value representation (Number, String, Boolean, Undefined,
//!   Null, Opaque)
//! - [`globals`]: The single flat variable table and per-step change tracking
//! - [`stack`]: The simulated call stack of [`stack::CallFrame`]s
//!
//! # Scoping
//!
//! There is exactly one namespace per run. Function parameters are written into it
//! directly, and frames on the call stack only label variables with the most recent
//! callee's name.

pub mod globals;
pub mod stack;
pub mod value;
