//! Assembly-text emission (distilled spec §4.4).
//!
//! The translator performs no semantic checks — it presumes the
//! `FunctionAnalyzer` and comparison analyzers already accepted the stream.
//! A malformed opcode reaching here is a programming error upstream, not a
//! user-facing diagnostic, so it surfaces as a debug-only `unreachable!`
//! rather than a silently-wrong line of assembly.

use memeasm_common::{
    command_table, CommandTable, CompileState, OptLevel, Platform, TemplateFragment,
    OP_FUNCTION_DECL,
};
use memeasm_common::is_return_opcode;
use std::fmt::Write as _;
use std::time::{SystemTime, UNIX_EPOCH};

const N_SO: u32 = 100;
const N_SLINE: u32 = 68;
const N_FUN: u32 = 36;
const N_LBRAC: u32 = 0xc0;
const N_RBRAC: u32 = 0xe0;

/// Tracks whether the next command's STABS line-label was already emitted
/// ahead of time by a preceding *ignorable* command, replacing a bare
/// boolean flag with a named state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StabsLabelState {
    NeedsLabel,
    LabelPreEmitted,
}

pub struct Translator<'a> {
    state: &'a CompileState,
    table: &'static CommandTable,
    source_path: Option<&'a str>,
}

impl<'a> Translator<'a> {
    pub fn new(state: &'a CompileState) -> Self {
        Self { state, table: command_table(), source_path: None }
    }

    /// Attach the input file's path, used only for the STABS file-info
    /// directive in the prelude.
    pub fn with_source_path(mut self, path: &'a str) -> Self {
        self.source_path = Some(path);
        self
    }

    pub fn translate(&self) -> String {
        let mut out = String::new();
        self.emit_prelude(&mut out);
        self.emit_commands(&mut out);
        self.emit_runtime_helpers(&mut out);
        self.emit_epilogue(&mut out);
        out
    }

    fn emit_prelude(&self, out: &mut String) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = writeln!(out, "# memeasm {} — compiled at {}", env!("CARGO_PKG_VERSION"), timestamp);
        let _ = writeln!(out, ".intel_syntax noprefix");

        for command in self.state.commands.as_slice() {
            if command.opcode == OP_FUNCTION_DECL && command.translate {
                let _ = writeln!(out, ".global {}", command.param(0).unwrap_or_default());
            }
        }

        if self.state.platform == Platform::Windows {
            let _ = writeln!(out, ".extern GetStdHandle");
            let _ = writeln!(out, ".extern WriteFile");
            let _ = writeln!(out, ".extern ReadFile");
        }

        let _ = writeln!(out, "{}", self.section_directive(".data"));
        let _ = writeln!(out, ".LCharacter:\n\t.byte 'a'");
        let _ = writeln!(out, ".Ltmp64:\n\t.zero 8");

        if self.state.use_stabs {
            let path = self.stabs_source_path();
            let _ = writeln!(out, ".stabs \"{path}\", {N_SO}, 0, 0, .Ltext0");
        }

        let _ = writeln!(out, "{}", self.section_directive(".text"));
        let _ = writeln!(out, ".Ltext0:");
    }

    fn stabs_source_path(&self) -> String {
        let path = self.source_path.unwrap_or("<stdin>");
        if path.starts_with('/') {
            path.to_string()
        } else {
            let cwd = std::env::current_dir().unwrap_or_default();
            format!("{}/{}", cwd.display(), path)
        }
    }

    /// macOS spells its data/text sections without the `.section` keyword;
    /// other platforms use the explicit GAS directive.
    fn section_directive(&self, name: &str) -> String {
        match self.state.platform {
            Platform::MacOs => name.to_string(),
            Platform::Linux | Platform::Windows => format!(".section {name}"),
        }
    }

    fn emit_commands(&self, out: &mut String) {
        let commands = &self.state.commands;
        let slice = commands.as_slice();
        let mut current_function_name = String::new();
        let mut label_state = StabsLabelState::NeedsLabel;

        for (i, command) in slice.iter().enumerate() {
            if Some(i) == commands.random_index {
                out.push_str(".LConfusedStonks: ");
            }

            if !command.translate {
                continue;
            }

            self.translate_one(out, slice, i, &mut current_function_name, &mut label_state);
        }
    }

    fn translate_one(
        &self,
        out: &mut String,
        slice: &[memeasm_common::Command],
        i: usize,
        current_function_name: &mut String,
        label_state: &mut StabsLabelState,
    ) {
        let command = &slice[i];
        let opcode = command.opcode;

        // Step 1: O42069 elides everything but function prologues.
        if self.state.opt_level == OptLevel::O42069 && opcode != OP_FUNCTION_DECL {
            return;
        }

        let entry = self.table.get(opcode);

        // Step 2: STABS labelling state machine / function-name tracking.
        if opcode == OP_FUNCTION_DECL {
            *current_function_name = command.param(0).unwrap_or_default().to_string();
        } else if self.state.use_stabs {
            if entry.is_ignorable() {
                if let Some(next) = slice.get(i + 1) {
                    let _ = writeln!(out, ".Lcmd_{}:", next.line_num);
                }
                *label_state = StabsLabelState::LabelPreEmitted;
            } else if *label_state == StabsLabelState::LabelPreEmitted {
                *label_state = StabsLabelState::NeedsLabel;
            } else {
                let _ = writeln!(out, ".Lcmd_{}:", command.line_num);
            }
        }

        // Step 3: template expansion.
        let mut line = String::new();
        for fragment in &entry.fragments {
            match fragment {
                TemplateFragment::Literal(text) => line.push_str(text),
                TemplateFragment::Param(idx) => {
                    let value = command.param(*idx).unwrap_or("");
                    if command.is_pointer.wraps(*idx) {
                        let _ = write!(line, "[{value}]");
                    } else {
                        line.push_str(value);
                    }
                }
            }
        }
        // A multi-line template already bakes its own continuation
        // indentation into its literal `\n\t` runs (see the command table's
        // note on digit-collision-free templates); only the first line
        // needs a tab prefixed here, and function declarations (which
        // render as a label, not an instruction) get none at all.
        if opcode != OP_FUNCTION_DECL {
            let _ = writeln!(out, "\t{line}");
        } else {
            let _ = writeln!(out, "{line}");
        }

        // Step 4: optimisation-level padding.
        match self.state.opt_level {
            OptLevel::O1 => {
                let _ = writeln!(out, "\tnop");
            }
            OptLevel::O2 => {
                let _ = writeln!(out, "\tpush rax");
                let _ = writeln!(out, "\tpop rax");
            }
            OptLevel::O3 => {
                let _ = writeln!(out, "\tmovups [rsp + 8], xmm0");
                let _ = writeln!(out, "\tmovups xmm0, [rsp + 8]");
            }
            OptLevel::Os | OptLevel::None => {}
            OptLevel::O42069 => {
                let _ = writeln!(out, "\txor rax, rax");
                let _ = writeln!(out, "\tret");
            }
        }

        // Step 5: STABS line info.
        if self.state.use_stabs && opcode != OP_FUNCTION_DECL {
            let is_last_or_next_is_decl =
                i + 1 == slice.len() || slice[i + 1].opcode == OP_FUNCTION_DECL;
            if is_return_opcode(opcode) && is_last_or_next_is_decl {
                let _ = writeln!(out, "\t.Lret_{current_function_name}:");
            }
            if !entry.is_ignorable() {
                let _ = writeln!(
                    out,
                    "\t.stabn {N_SLINE}, 0, {0}, .Lcmd_{0}",
                    command.line_num
                );
            }
        }
    }

    fn emit_runtime_helpers(&self, out: &mut String) {
        if self.state.opt_level == OptLevel::O42069 {
            return;
        }
        match self.state.platform {
            Platform::Linux => self.emit_syscall_helpers(out, 1, 0),
            Platform::MacOs => self.emit_syscall_helpers(out, 0x2000004, 0x2000003),
            Platform::Windows => self.emit_winapi_helpers(out),
        }
    }

    fn emit_syscall_helpers(&self, out: &mut String, write_nr: i64, read_nr: i64) {
        let _ = writeln!(
            out,
            "writechar:\n\
             \tpush rcx\n\
             \tpush r11\n\
             \tpush rax\n\
             \tpush rdi\n\
             \tpush rsi\n\
             \tpush rdx\n\
             \tmov rax, {write_nr}\n\
             \tmov rdi, 1\n\
             \tlea rsi, [.LCharacter]\n\
             \tmov rdx, 1\n\
             \tsyscall\n\
             \tpop rdx\n\
             \tpop rsi\n\
             \tpop rdi\n\
             \tpop rax\n\
             \tpop r11\n\
             \tpop rcx\n\
             \tret"
        );
        let _ = writeln!(
            out,
            "readchar:\n\
             \tpush rcx\n\
             \tpush r11\n\
             \tpush rax\n\
             \tpush rdi\n\
             \tpush rsi\n\
             \tpush rdx\n\
             \tmov rax, {read_nr}\n\
             \tmov rdi, 0\n\
             \tlea rsi, [.LCharacter]\n\
             \tmov rdx, 1\n\
             \tsyscall\n\
             \tpop rdx\n\
             \tpop rsi\n\
             \tpop rdi\n\
             \tpop rax\n\
             \tpop r11\n\
             \tpop rcx\n\
             \tret"
        );
    }

    fn emit_winapi_helpers(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "writechar:\n\
             \tsub rsp, 32 + 8\n\
             \tmov rcx, -11\n\
             \tcall GetStdHandle\n\
             \tlea rdx, [.LCharacter]\n\
             \tmov r8, 1\n\
             \tlea r9, [.Ltmp64]\n\
             \tmov [rsp + 32], 0\n\
             \tmov rcx, rax\n\
             \tcall WriteFile\n\
             \tadd rsp, 32 + 8\n\
             \tret"
        );
        let _ = writeln!(
            out,
            "readchar:\n\
             \tsub rsp, 32 + 8\n\
             \tmov rcx, -10\n\
             \tcall GetStdHandle\n\
             \tlea rdx, [.LCharacter]\n\
             \tmov r8, 1\n\
             \tlea r9, [.Ltmp64]\n\
             \tmov [rsp + 32], 0\n\
             \tmov rcx, rax\n\
             \tcall ReadFile\n\
             \tadd rsp, 32 + 8\n\
             \tret"
        );
    }

    fn emit_epilogue(&self, out: &mut String) {
        if self.state.use_stabs {
            for command in self.state.commands.as_slice() {
                if command.opcode == OP_FUNCTION_DECL && command.translate {
                    let name = command.param(0).unwrap_or_default();
                    let _ = writeln!(out, ".stabs \"{name}:F1\", {N_FUN}, 0, 0, {name}");
                    let _ = writeln!(out, ".stabn {N_LBRAC}, 0, 0, {name}");
                    let _ = writeln!(out, ".stabn {N_RBRAC}, 0, 0, .Lret_{name}");
                }
            }
            let _ = writeln!(out, ".LEOF:");
            let _ = writeln!(out, ".stabs \"\", {N_SO}, 0, 0, .LEOF");
        }

        if self.state.opt_level == OptLevel::Os {
            let _ = writeln!(out, ".align 536870912");
        }
    }
}

pub fn translate(state: &CompileState) -> String {
    Translator::new(state).translate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use memeasm_common::{Command, CommandStream, CompileMode};

    fn linux_state(commands: Vec<Command>) -> CompileState {
        CompileState::new(CommandStream::new(commands), CompileMode::Executable)
    }

    #[test]
    fn minimal_main_contains_global_and_runtime_helpers() {
        let state = linux_state(vec![Command::new(0, 1).with_param(0, "main"), Command::new(2, 2)]);
        let text = translate(&state);
        assert!(text.contains(".global main"));
        assert!(text.contains("main:"));
        assert!(text.contains("mov rax, 60"));
        assert!(text.contains("writechar:"));
        assert!(text.contains("readchar:"));
    }

    #[test]
    fn o42069_elides_everything_but_prologue_and_xor_ret() {
        let mut state =
            linux_state(vec![Command::new(0, 1).with_param(0, "main"), Command::new(2, 2)]);
        state.opt_level = OptLevel::O42069;
        let text = translate(&state);
        assert!(text.contains("main:"));
        assert!(text.contains("xor rax, rax"));
        assert!(text.contains("ret"));
        assert!(!text.contains("writechar:"));
        assert!(!text.contains("mov rax, 60"));
    }

    #[test]
    fn pointer_parameter_is_bracket_wrapped() {
        use memeasm_common::PointerSlot;
        let state = linux_state(vec![Command::new(6, 1)
            .with_param(0, "rax")
            .with_param(1, "5")
            .with_pointer(PointerSlot::First)]);
        let text = translate(&state);
        assert!(text.contains("mov [rax], 5"));
    }

    #[test]
    fn confused_stonks_label_prefixes_its_command_inline() {
        let commands = CommandStream::new(vec![Command::new(10, 1)]).with_random_index(0);
        let state = CompileState::new(commands, CompileMode::ObjectFile);
        let text = translate(&state);
        let line = text.lines().find(|l| l.contains("nop")).unwrap();
        assert!(line.starts_with(".LConfusedStonks: "));
    }

    #[test]
    fn stabs_mode_emits_fun_records_in_epilogue() {
        let mut state = linux_state(vec![Command::new(0, 1).with_param(0, "main"), Command::new(2, 2)]);
        state.use_stabs = true;
        let text = translate(&state);
        assert!(text.contains(":F1"));
        assert!(text.contains(".Lret_main:"));
        assert!(text.contains(".LEOF:"));
    }

    #[test]
    fn os_opt_level_emits_the_giant_alignment_directive() {
        let mut state = linux_state(vec![Command::new(0, 1).with_param(0, "main"), Command::new(2, 2)]);
        state.opt_level = OptLevel::Os;
        let text = translate(&state);
        assert!(text.contains(".align 536870912"));
    }

    #[test]
    fn macos_uses_underscore_main_symbol_and_bare_section_names() {
        let mut state =
            linux_state(vec![Command::new(0, 1).with_param(0, "_main"), Command::new(2, 2)]);
        state.platform = Platform::MacOs;
        let text = translate(&state);
        assert!(text.contains(".global _main"));
        assert!(!text.contains(".section .data"));
        assert!(text.contains(".data"));
    }
}
