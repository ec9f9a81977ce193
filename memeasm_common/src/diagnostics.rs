//! Diagnostic message handling for the memeasm compiler
//!
//! Every semantic error the analyzers raise (see `memeasm_ir`) is recorded
//! against one primary line and, for a handful of messages, one auxiliary
//! "also defined here" line.

use crate::LineNum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for diagnostic messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic message with a primary line and an optional secondary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: LineNum,
    pub extra_line: Option<LineNum>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: impl Into<LineNum>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            line: line.into(),
            extra_line: None,
        }
    }

    pub fn warning(message: impl Into<String>, line: impl Into<LineNum>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line: line.into(),
            extra_line: None,
        }
    }

    pub fn with_extra_line(mut self, line: impl Into<LineNum>) -> Self {
        self.extra_line = Some(line.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({}", self.severity, self.message, self.line)?;
        if let Some(extra) = self.extra_line {
            write!(f, ", also {}", extra)?;
        }
        write!(f, ")")
    }
}

/// Collection of diagnostic messages accumulated over one compilation.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.messages.push(diagnostic);
    }

    /// Record a semantic error at `line`, with no secondary line.
    pub fn error(&mut self, message: impl Into<String>, line: impl Into<LineNum>) {
        self.add(Diagnostic::error(message, line));
    }

    /// Record a semantic error at `line`, carrying one secondary line.
    pub fn error_with_extra(
        &mut self,
        message: impl Into<String>,
        line: impl Into<LineNum>,
        extra_line: impl Into<LineNum>,
    ) {
        self.add(Diagnostic::error(message, line).with_extra_line(extra_line));
    }

    pub fn warning(&mut self, message: impl Into<String>, line: impl Into<LineNum>) {
        self.add(Diagnostic::warning(message, line));
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.severity == Severity::Error).count()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter().filter(|d| d.severity == Severity::Error)
    }
}
