//! Comparison-label analysis (distilled spec §4.2, §4.3).
//!
//! Two independent families share the shape "a compare opcode references a
//! label opcode `compare_opcode + 1`" but differ in how strict the label
//! bookkeeping is. That asymmetry is intentional — see
//! `SamePictureAnalyzer`'s doc comment — and is preserved rather than
//! unified.

use memeasm_common::{CommandStream, Diagnostics};

/// The "who would win?" family: two-parameter comparisons jumping to one of
/// two named labels, each of which must be declared exactly once.
pub struct WhoWouldWinAnalyzer {
    compare_opcode: u8,
}

struct LabelledComparison {
    first: String,
    second: String,
    line: u32,
}

struct LabelDeclaration {
    name: String,
    line: u32,
}

impl WhoWouldWinAnalyzer {
    pub fn new(compare_opcode: u8) -> Self {
        Self { compare_opcode }
    }

    pub fn analyze(&self, commands: &CommandStream, diagnostics: &mut Diagnostics) {
        let label_opcode = self.compare_opcode + 1;
        let mut comparisons = Vec::new();
        let mut labels = Vec::new();

        for command in commands.as_slice() {
            if command.opcode == self.compare_opcode {
                comparisons.push(LabelledComparison {
                    first: command.param(0).unwrap_or_default().to_string(),
                    second: command.param(1).unwrap_or_default().to_string(),
                    line: command.line_num,
                });
            } else if command.opcode == label_opcode {
                labels.push(LabelDeclaration {
                    name: command.param(0).unwrap_or_default().to_string(),
                    line: command.line_num,
                });
            }
        }

        for i in 0..labels.len() {
            for j in (i + 1)..labels.len() {
                if labels[i].name == labels[j].name {
                    diagnostics.error_with_extra(
                        "Comparison jump markers cannot be defined twice",
                        labels[j].line,
                        labels[i].line,
                    );
                }
            }
        }

        for comparison in &comparisons {
            if !labels.iter().any(|l| l.name == comparison.first) {
                diagnostics.error(
                    "No comparison jump marker defined for first parameter",
                    comparison.line,
                );
            }
            if !labels.iter().any(|l| l.name == comparison.second) {
                diagnostics.error(
                    "No comparison jump marker defined for second parameter",
                    comparison.line,
                );
            }
        }
    }
}

/// The "they're the same picture" family: a zero-parameter comparison and a
/// single, unparameterized, effectively-global terminating label.
///
/// Unlike `WhoWouldWinAnalyzer`, this family performs no duplicate-label
/// detection: with zero parameters there is nothing to key a duplicate on
/// beyond "the label opcode appeared more than once", and a second
/// occurrence is treated as a harmless re-declaration rather than an error.
/// This asymmetry with the "who would win" family is deliberate and
/// preserved as-is rather than unified across the two families.
pub struct SamePictureAnalyzer {
    compare_opcode: u8,
}

impl SamePictureAnalyzer {
    pub fn new(compare_opcode: u8) -> Self {
        Self { compare_opcode }
    }

    pub fn analyze(&self, commands: &CommandStream, diagnostics: &mut Diagnostics) {
        let label_opcode = self.compare_opcode + 1;

        // Last occurrence wins; no duplicate check.
        let label_seen = commands
            .as_slice()
            .iter()
            .any(|command| command.opcode == label_opcode);

        if label_seen {
            return;
        }

        for command in commands.as_slice() {
            if command.opcode == self.compare_opcode {
                diagnostics.error(
                    "\"they're the same picture\" wasn't defined anywhere",
                    command.line_num,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memeasm_common::Command;
    use pretty_assertions::assert_eq;

    #[test]
    fn who_would_win_reports_missing_second_parameter_only() {
        let commands = CommandStream::new(vec![
            Command::new(12, 2).with_param(0, "x").with_param(1, "y"),
            Command::new(13, 3).with_param(0, "x"),
        ]);
        let mut diagnostics = Diagnostics::new();
        WhoWouldWinAnalyzer::new(12).analyze(&commands, &mut diagnostics);
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(
            diagnostics.messages()[0].message,
            "No comparison jump marker defined for second parameter"
        );
        assert_eq!(diagnostics.messages()[0].line.get(), 2);
    }

    #[test]
    fn who_would_win_flags_duplicate_label_declarations() {
        let commands = CommandStream::new(vec![
            Command::new(13, 1).with_param(0, "x"),
            Command::new(13, 2).with_param(0, "x"),
        ]);
        let mut diagnostics = Diagnostics::new();
        WhoWouldWinAnalyzer::new(12).analyze(&commands, &mut diagnostics);
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.messages()[0].line.get(), 2);
        assert_eq!(diagnostics.messages()[0].extra_line.map(|l| l.get()), Some(1));
    }

    #[test]
    fn who_would_win_both_missing_parameters_emit_both_errors() {
        let commands = CommandStream::new(vec![Command::new(12, 5).with_param(0, "x").with_param(1, "y")]);
        let mut diagnostics = Diagnostics::new();
        WhoWouldWinAnalyzer::new(12).analyze(&commands, &mut diagnostics);
        assert_eq!(diagnostics.error_count(), 2);
    }

    #[test]
    fn same_picture_missing_label_flags_every_comparison() {
        let commands = CommandStream::new(vec![Command::new(14, 3), Command::new(14, 9)]);
        let mut diagnostics = Diagnostics::new();
        SamePictureAnalyzer::new(14).analyze(&commands, &mut diagnostics);
        assert_eq!(diagnostics.error_count(), 2);
        assert_eq!(diagnostics.messages()[0].line.get(), 3);
        assert_eq!(diagnostics.messages()[1].line.get(), 9);
    }

    #[test]
    fn same_picture_duplicate_labels_are_not_an_error() {
        let commands = CommandStream::new(vec![
            Command::new(14, 1),
            Command::new(15, 2),
            Command::new(15, 4),
        ]);
        let mut diagnostics = Diagnostics::new();
        SamePictureAnalyzer::new(14).analyze(&commands, &mut diagnostics);
        assert!(diagnostics.is_empty());
    }
}
