//! Shared data model, diagnostics and error types for the memeasm compiler
//!
//! This crate provides the common functionality used across every compiler
//! component:
//! - Error types and handling utilities
//! - Source location tracking
//! - The `Command` / `CommandStream` data model and the static command table
//! - Shared compile-time configuration (`CompileState` and friends)
//! - Diagnostic collection

pub mod command;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod span;
pub mod table;

pub use command::*;
pub use config::*;
pub use diagnostics::*;
pub use error::*;
pub use span::*;
pub use table::*;