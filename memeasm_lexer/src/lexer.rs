//! Lexer for memeasm source text (distilled spec §2's upstream collaborator).
//!
//! Splits a source file into non-blank lines, each a whitespace-delimited
//! word sequence. `memeasm_parser` matches these word sequences against the
//! static command table; the lexer itself knows nothing about phrases,
//! opcodes, or parameters.

use crate::Token;
use memeasm_common::LineNum;
use serde::{Deserialize, Serialize};

/// One non-blank source line, already split into words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexedLine {
    pub words: Vec<String>,
    pub line: LineNum,
}

pub struct Lexer;

impl Lexer {
    /// Split `source` into non-blank, whitespace-tokenized lines.
    ///
    /// Blank lines (all whitespace) are dropped entirely rather than kept
    /// as empty statements; line numbers are still 1-based against the
    /// original source, so diagnostics point at the right place even
    /// though blank lines never reach the parser.
    pub fn lex(source: &str) -> Vec<LexedLine> {
        source
            .lines()
            .enumerate()
            .filter_map(|(zero_based, raw_line)| {
                let trimmed = raw_line.trim();
                if trimmed.is_empty() {
                    return None;
                }
                Some(LexedLine {
                    words: trimmed.split_whitespace().map(str::to_string).collect(),
                    line: LineNum::new(zero_based as u32 + 1),
                })
            })
            .collect()
    }

    /// Flatten `lex`'s output into individual word tokens, for callers that
    /// want a token-at-a-time view rather than grouped lines.
    pub fn tokens(source: &str) -> Vec<Token> {
        Self::lex(source)
            .into_iter()
            .flat_map(|line| {
                line.words
                    .into_iter()
                    .map(move |word| Token::new(word, line.line))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_lines_are_dropped_but_numbering_stays_absolute() {
        let lines = Lexer::lex("Stonks\n\n   \nNot stonks");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line.get(), 1);
        assert_eq!(lines[1].line.get(), 4);
    }

    #[test]
    fn line_is_split_on_any_whitespace_run() {
        let lines = Lexer::lex("Who  would\twin x y");
        assert_eq!(lines[0].words, vec!["Who", "would", "win", "x", "y"]);
    }

    #[test]
    fn punctuation_stays_attached_to_its_word() {
        let lines = Lexer::lex("Trust me, I'm an engineer main");
        assert_eq!(
            lines[0].words,
            vec!["Trust", "me,", "I'm", "an", "engineer", "main"]
        );
    }

    #[test]
    fn tokens_flattens_with_each_words_own_line() {
        let tokens = Lexer::tokens("Stonks\nNot stonks");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].line.get(), 1);
        assert_eq!(tokens[1].word, "Not");
        assert_eq!(tokens[2].line.get(), 2);
    }
}
