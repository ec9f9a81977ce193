//! Semantic analysis and code generation for the memeasm compiler
//!
//! This crate is the compiler's core: [`FunctionAnalyzer`], the two
//! [`WhoWouldWinAnalyzer`]/[`SamePictureAnalyzer`] comparison families, and
//! [`Translator`]. [`compile`] wires the three together the way
//! `memeasm_cli`'s `build` command does: analyze, abort on any diagnostic,
//! otherwise translate.

pub mod comparison_analyzer;
pub mod function_analyzer;
pub mod translator;

pub use comparison_analyzer::{SamePictureAnalyzer, WhoWouldWinAnalyzer};
pub use function_analyzer::FunctionAnalyzer;
pub use translator::{translate, Translator};

use memeasm_common::{
    CompileState, Diagnostics, MemeAsmError, MemeAsmResult, OP_SAME_PICTURE_LABEL,
    OP_WHO_WOULD_WIN_LABEL,
};

/// The fixed opcode conventions this command table uses for the two
/// comparison families (distilled spec §6's concrete table).
pub const WHO_WOULD_WIN_COMPARE_OPCODE: u8 = OP_WHO_WOULD_WIN_LABEL - 1;
pub const SAME_PICTURE_COMPARE_OPCODE: u8 = OP_SAME_PICTURE_LABEL - 1;

/// Run every analyzer over `state.commands`, returning the accumulated
/// diagnostics. Does not translate; callers decide what to do with a
/// non-empty result themselves (`compile` aborts, a `check` subcommand
/// would just report).
pub fn analyze(state: &CompileState) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    FunctionAnalyzer::analyze(&state.commands, state.mode, state.platform, &mut diagnostics);
    WhoWouldWinAnalyzer::new(WHO_WOULD_WIN_COMPARE_OPCODE).analyze(&state.commands, &mut diagnostics);
    SamePictureAnalyzer::new(SAME_PICTURE_COMPARE_OPCODE).analyze(&state.commands, &mut diagnostics);
    diagnostics
}

/// Analyze, then translate if and only if analysis raised no errors.
///
/// Mirrors the distilled spec's error-handling design: semantic errors are
/// accumulated so the caller sees everything in one pass, then compilation
/// aborts before translation runs at all.
pub fn compile(state: &CompileState) -> MemeAsmResult<(String, Diagnostics)> {
    let diagnostics = analyze(state);
    if diagnostics.has_errors() {
        return Err(MemeAsmError::semantic_errors(diagnostics.error_count()));
    }
    Ok((translate(state), diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use memeasm_common::{Command, CommandStream, CompileMode};

    #[test]
    fn compile_succeeds_on_minimal_main() {
        let commands = CommandStream::new(vec![
            Command::new(0, 1).with_param(0, "main"),
            Command::new(2, 2),
        ]);
        let state = CompileState::new(commands, CompileMode::Executable);
        let (assembly, diagnostics) = compile(&state).expect("minimal main compiles");
        assert!(diagnostics.is_empty());
        assert!(assembly.contains(".global main"));
    }

    #[test]
    fn compile_aborts_before_translation_on_semantic_error() {
        let commands = CommandStream::new(vec![Command::new(5, 1)]);
        let state = CompileState::new(commands, CompileMode::ObjectFile);
        let err = compile(&state).expect_err("floating statement is a semantic error");
        assert!(matches!(err, MemeAsmError::SemanticErrors { count: 1 }));
    }
}
