//! Source location tracking for the memeasm compiler
//!
//! Memes are one statement per line, so a location in this language is just
//! a line number; there is no column to track the way a full expression
//! grammar would need.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-based line number in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineNum(pub u32);

impl LineNum {
    pub fn new(line: u32) -> Self {
        Self(line)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LineNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}", self.0)
    }
}

impl From<u32> for LineNum {
    fn from(line: u32) -> Self {
        Self(line)
    }
}
