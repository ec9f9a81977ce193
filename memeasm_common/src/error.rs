//! Error handling utilities for the memeasm compiler

use thiserror::Error;

/// The main error type for the memeasm compiler
#[derive(Error, Debug)]
pub enum MemeAsmError {
    #[error("lexical error: {message}")]
    LexError { message: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("{count} semantic error(s) found, aborting before translation")]
    SemanticErrors { count: usize },

    #[error("I/O error: {message}")]
    IoError { message: String },

    #[error("configuration error: {message}")]
    ConfigError { message: String },

    #[error("toolchain error: {message}")]
    ToolchainError { message: String },
}

/// Result type alias for memeasm compiler operations
pub type MemeAsmResult<T> = Result<T, MemeAsmError>;

impl MemeAsmError {
    pub fn lex_error(message: impl Into<String>) -> Self {
        Self::LexError { message: message.into() }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError { message: message.into() }
    }

    pub fn semantic_errors(count: usize) -> Self {
        Self::SemanticErrors { count }
    }

    pub fn io_error(message: impl Into<String>) -> Self {
        Self::IoError { message: message.into() }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError { message: message.into() }
    }

    pub fn toolchain_error(message: impl Into<String>) -> Self {
        Self::ToolchainError { message: message.into() }
    }
}

impl From<std::io::Error> for MemeAsmError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err.to_string())
    }
}
