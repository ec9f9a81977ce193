//! Matches lexed word sequences against the static command table
//! (distilled spec §2's upstream collaborator).
//!
//! One source line maps to at most one `Command`. The table is searched
//! for the longest phrase whose words are a prefix of the line; whatever
//! words remain become the command's parameters.

use memeasm_common::{
    command_table, Command, CommandStream, Diagnostics, PointerSlot, NUMBER_OF_COMMANDS,
    OP_INVALID_SENTINEL,
};
use memeasm_lexer::{LexedLine, Lexer};

pub struct Parser;

impl Parser {
    /// Lex and parse `source` into a `CommandStream`, collecting a
    /// diagnostic for every line that matches no known phrase or supplies
    /// the wrong number of parameters.
    pub fn parse(source: &str) -> (CommandStream, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let mut commands = Vec::new();

        for line in Lexer::lex(source) {
            if let Some(command) = Self::parse_line(&line, &mut diagnostics) {
                commands.push(command);
            }
        }

        (CommandStream::new(commands), diagnostics)
    }

    fn parse_line(line: &LexedLine, diagnostics: &mut Diagnostics) -> Option<Command> {
        let table = command_table();

        // Real source never spells the invalid-command sentinel; it only
        // bounds the table (distilled spec §6).
        let best_match = (0..NUMBER_OF_COMMANDS - 1)
            .filter(|&opcode| opcode != OP_INVALID_SENTINEL)
            .filter_map(|opcode| {
                let entry = table.get(opcode);
                let phrase_words: Vec<&str> = entry.phrase.split_whitespace().collect();
                if line.words.len() >= phrase_words.len()
                    && line.words[..phrase_words.len()]
                        .iter()
                        .zip(phrase_words.iter())
                        .all(|(word, phrase_word)| word == phrase_word)
                {
                    Some((opcode, phrase_words.len()))
                } else {
                    None
                }
            })
            // Table phrases never overlap as proper prefixes of one
            // another, but preferring the longest match keeps this
            // deterministic if that ever changes.
            .max_by_key(|&(_, len)| len);

        let Some((opcode, phrase_len)) = best_match else {
            diagnostics.error(
                format!("Unknown command: \"{}\"", line.words.join(" ")),
                line.line,
            );
            return None;
        };

        let entry = table.get(opcode);
        let remaining = &line.words[phrase_len..];
        if remaining.len() != entry.used_parameters {
            diagnostics.error(
                format!(
                    "\"{}\" expects {} parameter(s), got {}",
                    entry.phrase,
                    entry.used_parameters,
                    remaining.len()
                ),
                line.line,
            );
            return None;
        }

        let mut command = Command::new(opcode, line.line.get());
        for (idx, raw) in remaining.iter().enumerate() {
            let (value, is_pointer) = Self::strip_pointer_brackets(raw);
            command = command.with_param(idx, value);
            if is_pointer {
                command = command.with_pointer(if idx == 0 { PointerSlot::First } else { PointerSlot::Second });
            }
        }

        Some(command)
    }

    /// `[rax]` denotes a memory-indirect operand; strip the brackets and
    /// report whether they were present.
    fn strip_pointer_brackets(word: &str) -> (&str, bool) {
        if let Some(inner) = word.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            (inner, true)
        } else {
            (word, false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_main() {
        let (commands, diagnostics) = Parser::parse("Trust me, I'm an engineer main\nStonks");
        assert!(diagnostics.is_empty());
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].opcode, 0);
        assert_eq!(commands[0].param(0), Some("main"));
        assert_eq!(commands[1].opcode, 2);
    }

    #[test]
    fn unknown_phrase_is_reported_and_dropped() {
        let (commands, diagnostics) = Parser::parse("This is not a real meme");
        assert!(commands.is_empty());
        assert_eq!(diagnostics.error_count(), 1);
        assert!(diagnostics.messages()[0].message.starts_with("Unknown command"));
    }

    #[test]
    fn wrong_parameter_count_is_reported() {
        let (commands, diagnostics) = Parser::parse("Stonks extra");
        assert!(commands.is_empty());
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn bracketed_parameter_sets_pointer_flag() {
        let (commands, diagnostics) = Parser::parse("is actually [rax] 5");
        assert!(diagnostics.is_empty());
        assert_eq!(commands[0].param(0), Some("rax"));
        assert!(commands[0].is_pointer.wraps(0));
    }

    #[test]
    fn who_would_win_parses_two_label_parameters() {
        let (commands, diagnostics) = Parser::parse("Who would win x y");
        assert!(diagnostics.is_empty());
        assert_eq!(commands[0].opcode, 12);
        assert_eq!(commands[0].param(0), Some("x"));
        assert_eq!(commands[0].param(1), Some("y"));
    }
}
