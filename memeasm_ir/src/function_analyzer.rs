//! Function-boundary analysis (distilled spec §4.1).
//!
//! Checks that every command belongs to some function body, that every
//! function body terminates in a return, that function names are unique,
//! and — in `Executable` mode — that a main function exists.

use memeasm_common::{
    is_return_opcode, role_of, CommandRole, CommandStream, CompileMode, Diagnostics, Platform,
    OP_FUNCTION_DECL,
};

/// A function's transient descriptor, valid only for the duration of one
/// analysis pass.
#[derive(Debug, Clone)]
struct FunctionDescriptor {
    name: String,
    defined_in_line: u32,
    /// Number of body commands up to and including the last return seen,
    /// relative to the declaration (i.e. the cursor advance amount).
    #[allow(dead_code)]
    number_of_commands: usize,
}

pub struct FunctionAnalyzer;

impl FunctionAnalyzer {
    /// Walk `commands`, recording diagnostics into `diagnostics`.
    ///
    /// Mirrors the distilled spec's two-phase shape: a single forward scan
    /// building descriptors, then two whole-array checks (duplicate names,
    /// missing main) once the scan completes.
    pub fn analyze(commands: &CommandStream, mode: CompileMode, platform: Platform, diagnostics: &mut Diagnostics) {
        let slice = commands.as_slice();
        let mut descriptors = Vec::new();
        let mut cursor = 0usize;

        while cursor < slice.len() {
            let command = &slice[cursor];
            if command.opcode != OP_FUNCTION_DECL {
                diagnostics.error("Statement does not belong to any function", command.line_num);
                cursor += 1;
                continue;
            }

            let (descriptor, consumed) = Self::parse_function(slice, cursor, diagnostics);
            descriptors.push(descriptor);
            cursor += consumed;
        }

        Self::check_duplicate_names(&descriptors, diagnostics);
        Self::check_main_exists(&descriptors, mode, platform, diagnostics);
    }

    /// Scan forward from a function declaration at `start`, recording the
    /// index of the *last* return-family command seen before the next
    /// declaration or end of stream. Returns the descriptor and the number
    /// of commands to advance the outer cursor by.
    ///
    /// The cursor always advances all the way to the next declaration (or
    /// stream end), never just past the last return: commands between the
    /// last return and the next declaration are dead code that still
    /// belongs to this function's body, and must not be re-examined by the
    /// outer loop as floating statements.
    fn parse_function(
        commands: &[memeasm_common::Command],
        start: usize,
        diagnostics: &mut Diagnostics,
    ) -> (FunctionDescriptor, usize) {
        let declaration = &commands[start];
        let name = declaration.param(0).unwrap_or_default().to_string();
        let mut last_return_offset: Option<usize> = None;

        let mut i = start + 1;
        while i < commands.len() {
            let command = &commands[i];
            if command.opcode == OP_FUNCTION_DECL {
                if last_return_offset.is_none() {
                    diagnostics.error(
                        "Expected a return statement, but got a new function definition",
                        command.line_num,
                    );
                }
                break;
            }
            if is_return_opcode(command.opcode) {
                last_return_offset = Some(i - start);
            }
            i += 1;
        }

        if last_return_offset.is_none() {
            diagnostics.error("No return statement found", declaration.line_num);
        }

        let number_of_commands = i - start;

        (
            FunctionDescriptor {
                name,
                defined_in_line: declaration.line_num,
                number_of_commands,
            },
            number_of_commands,
        )
    }

    fn check_duplicate_names(descriptors: &[FunctionDescriptor], diagnostics: &mut Diagnostics) {
        for i in 0..descriptors.len() {
            for j in (i + 1)..descriptors.len() {
                if descriptors[i].name == descriptors[j].name {
                    diagnostics.error_with_extra(
                        "Duplicate function definition",
                        descriptors[j].defined_in_line,
                        descriptors[i].defined_in_line,
                    );
                }
            }
        }
    }

    fn check_main_exists(
        descriptors: &[FunctionDescriptor],
        mode: CompileMode,
        platform: Platform,
        diagnostics: &mut Diagnostics,
    ) {
        if mode != CompileMode::Executable {
            return;
        }
        let main_symbol = platform.main_symbol();
        if !descriptors.iter().any(|d| d.name == main_symbol) {
            diagnostics.error("An executable cannot be created if no main-function exists", 1u32);
        }
    }
}

/// Exposed for the translator, which needs to know each return-family
/// command's role without re-deriving opcode arithmetic.
pub fn is_function_boundary(opcode: u8) -> bool {
    matches!(role_of(opcode), CommandRole::FunctionDecl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use memeasm_common::{Command, CommandStream};
    use pretty_assertions::assert_eq;

    fn stream(commands: Vec<Command>) -> CommandStream {
        CommandStream::new(commands)
    }

    #[test]
    fn minimal_main_has_no_diagnostics() {
        let commands = stream(vec![
            Command::new(0, 1).with_param(0, "main"),
            Command::new(2, 2),
        ]);
        let mut diagnostics = Diagnostics::new();
        FunctionAnalyzer::analyze(&commands, CompileMode::Executable, Platform::Linux, &mut diagnostics);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn missing_main_is_flagged_at_line_one() {
        let commands = stream(vec![
            Command::new(0, 1).with_param(0, "foo"),
            Command::new(1, 2),
        ]);
        let mut diagnostics = Diagnostics::new();
        FunctionAnalyzer::analyze(&commands, CompileMode::Executable, Platform::Linux, &mut diagnostics);
        assert_eq!(diagnostics.error_count(), 1);
        let msg = &diagnostics.messages()[0];
        assert_eq!(msg.message, "An executable cannot be created if no main-function exists");
        assert_eq!(msg.line.get(), 1);
    }

    #[test]
    fn duplicate_function_names_reference_both_lines() {
        let commands = stream(vec![
            Command::new(0, 1).with_param(0, "f"),
            Command::new(1, 2),
            Command::new(0, 3).with_param(0, "f"),
            Command::new(1, 4),
        ]);
        let mut diagnostics = Diagnostics::new();
        FunctionAnalyzer::analyze(&commands, CompileMode::ObjectFile, Platform::Linux, &mut diagnostics);
        let dup = diagnostics
            .messages()
            .iter()
            .find(|d| d.message == "Duplicate function definition")
            .expect("duplicate diagnostic");
        assert_eq!(dup.line.get(), 3);
        assert_eq!(dup.extra_line.map(|l| l.get()), Some(1));
    }

    #[test]
    fn floating_statement_is_flagged() {
        let commands = stream(vec![Command::new(5, 1)]);
        let mut diagnostics = Diagnostics::new();
        FunctionAnalyzer::analyze(&commands, CompileMode::ObjectFile, Platform::Linux, &mut diagnostics);
        assert_eq!(diagnostics.messages()[0].message, "Statement does not belong to any function");
        assert_eq!(diagnostics.messages()[0].line.get(), 1);
    }

    #[test]
    fn missing_return_is_flagged_at_declaration_line() {
        let commands = stream(vec![Command::new(0, 7).with_param(0, "f")]);
        let mut diagnostics = Diagnostics::new();
        FunctionAnalyzer::analyze(&commands, CompileMode::ObjectFile, Platform::Linux, &mut diagnostics);
        assert_eq!(diagnostics.messages()[0].message, "No return statement found");
        assert_eq!(diagnostics.messages()[0].line.get(), 7);
    }

    #[test]
    fn new_declaration_before_return_is_flagged_and_body_still_closes() {
        let commands = stream(vec![
            Command::new(0, 1).with_param(0, "f"),
            Command::new(0, 2).with_param(0, "g"),
            Command::new(2, 3),
        ]);
        let mut diagnostics = Diagnostics::new();
        FunctionAnalyzer::analyze(&commands, CompileMode::ObjectFile, Platform::Linux, &mut diagnostics);
        assert!(diagnostics
            .messages()
            .iter()
            .any(|d| d.message == "Expected a return statement, but got a new function definition"
                && d.line.get() == 2));
    }

    #[test]
    fn last_return_wins_dead_code_stays_in_body() {
        // f's body: return, then a dead-code statement, then a second
        // return. The *second* return ends the body; nothing floats.
        let commands = stream(vec![
            Command::new(0, 1).with_param(0, "f"),
            Command::new(2, 2),
            Command::new(10, 3),
            Command::new(2, 4),
        ]);
        let mut diagnostics = Diagnostics::new();
        FunctionAnalyzer::analyze(&commands, CompileMode::ObjectFile, Platform::Linux, &mut diagnostics);
        assert!(diagnostics.is_empty());
    }
}
