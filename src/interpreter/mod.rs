//! Line-by-line execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: [`engine::TraceEngine`], which runs a program once and records a
//!   snapshot after every executed line
//! - [`statements`]: classification of a single source line
//! - [`expressions`]: evaluation of the small expression language
//! - [`errors`]: error types stored in terminal snapshots
//!
//! # Execution Model
//!
//! Execution is a single linear pass over the non-blank lines. Conditions are
//! evaluated but never branch, loop headers are recorded but never iterate, and a
//! function call binds its arguments without running the body. Each executed line
//! produces exactly one snapshot.

pub mod engine;
pub mod errors;
pub mod expressions;
pub mod statements;
