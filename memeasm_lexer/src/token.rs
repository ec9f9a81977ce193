//! Token definitions for memeasm source text
//!
//! A meme is a sequence of one-statement-per-line phrases; lexing is
//! whitespace splitting plus line tracking, not a general-purpose grammar.

use memeasm_common::LineNum;
use serde::{Deserialize, Serialize};

/// One whitespace-delimited word, carrying the source line it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub word: String,
    pub line: LineNum,
}

impl Token {
    pub fn new(word: impl Into<String>, line: impl Into<LineNum>) -> Self {
        Self { word: word.into(), line: line.into() }
    }
}
