//! Lexical analysis of memeasm source text
//!
//! Memes are whitespace-delimited phrases, one statement per non-blank
//! line; this crate's only job is splitting source text into those
//! per-line word sequences for `memeasm_parser` to match against the
//! static command table.

pub mod lexer;
pub mod token;

pub use lexer::*;
pub use token::*;
