//! The static command table (distilled spec §3.2, §6).
//!
//! The table is process-wide, immutable data: it is built once behind a
//! `OnceLock` and handed to analyzers and the translator as a `&'static
//! CommandTable`, never threaded through as ambient/global mutable state.

use std::sync::OnceLock;

/// Total number of opcodes, including the two sentinels.
pub const NUMBER_OF_COMMANDS: u8 = 18;

pub const OP_FUNCTION_DECL: u8 = 0;
pub const OP_RETURN_VALUE: u8 = 1;
pub const OP_RETURN_SUCCESS: u8 = 2;
pub const OP_RETURN_FAILURE: u8 = 3;
pub const OP_PRINT_CHAR: u8 = 4;
pub const OP_READ_CHAR: u8 = 5;
pub const OP_ASSIGN: u8 = 6;
pub const OP_ADD: u8 = 7;
pub const OP_SUB: u8 = 8;
pub const OP_MUL: u8 = 9;
pub const OP_NOP: u8 = 10;
pub const OP_BREAKPOINT: u8 = 11;
pub const OP_WHO_WOULD_WIN: u8 = 12;
pub const OP_WHO_WOULD_WIN_LABEL: u8 = 13;
pub const OP_SAME_PICTURE: u8 = 14;
pub const OP_SAME_PICTURE_LABEL: u8 = 15;
pub const OP_DRAW_SENTINEL: u8 = NUMBER_OF_COMMANDS - 2;
pub const OP_INVALID_SENTINEL: u8 = NUMBER_OF_COMMANDS - 1;

/// The translation template, exactly the literal string `int3`, that marks
/// a command as *ignorable* for STABS line-table purposes.
pub const IGNORABLE_TEMPLATE: &str = "int3";

/// A piece of a pre-tokenized translation template: either a literal run of
/// characters or a reference to a parameter slot.
///
/// See the distilled spec's design note on template expansion: rather than
/// re-scanning the template's digit placeholders on every translated
/// command, the table tokenizes each template once at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateFragment {
    Literal(&'static str),
    Param(usize),
}

fn tokenize_template(template: &'static str, used_parameters: usize) -> Vec<TemplateFragment> {
    let mut fragments = Vec::new();
    let mut literal_start = 0;
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_digit() && ((c - b'0') as usize) < used_parameters {
            if literal_start < i {
                fragments.push(TemplateFragment::Literal(&template[literal_start..i]));
            }
            fragments.push(TemplateFragment::Param((c - b'0') as usize));
            literal_start = i + 1;
        }
        i += 1;
    }
    if literal_start < template.len() {
        fragments.push(TemplateFragment::Literal(&template[literal_start..]));
    }
    fragments
}

/// One entry in the command table.
///
/// `phrase` and `allowed_param_types` describe the DSL's surface syntax for
/// `memeasm_parser`'s benefit; the core (`memeasm_ir`) never inspects them.
#[derive(Debug, Clone)]
pub struct CommandTableEntry {
    pub phrase: &'static str,
    pub used_parameters: usize,
    pub allowed_param_types: [ParamTypeMask; 2],
    pub template: &'static str,
    pub fragments: Vec<TemplateFragment>,
}

impl CommandTableEntry {
    /// An ignorable command's translation template is exactly `int3`.
    pub fn is_ignorable(&self) -> bool {
        self.template == IGNORABLE_TEMPLATE
    }
}

bitflags::bitflags! {
    /// Parameter-type mask carried for the parser's benefit; opaque to the core.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamTypeMask: u8 {
        const REGISTER = 0b0001;
        const IMMEDIATE = 0b0010;
        const LABEL = 0b0100;
        const MEMORY = 0b1000;
    }
}

fn entry(
    phrase: &'static str,
    used_parameters: usize,
    types: [ParamTypeMask; 2],
    template: &'static str,
) -> CommandTableEntry {
    CommandTableEntry {
        phrase,
        used_parameters,
        allowed_param_types: types,
        template,
        fragments: tokenize_template(template, used_parameters),
    }
}

const NONE: [ParamTypeMask; 2] = [ParamTypeMask::empty(), ParamTypeMask::empty()];

// NOTE on template literals below: the substitution algorithm (distilled
// spec §4.4.2 step 3) replaces *every* occurrence of a digit character in
// `['0', '0' + used_parameters)`, wherever it appears in the template, not
// just at an intended placeholder position. A template with `used_parameters
// == 2` can therefore never contain a literal '0' or '1' outside the spots
// meant to be substituted. Immediate values that would normally be written
// with those digits (e.g. the exit syscall number 60) are written as
// constant expressions GAS evaluates at assemble time instead (`64-4`),
// sidestepping the collision rather than special-casing it in the
// translator.
fn build_table() -> Vec<CommandTableEntry> {
    use ParamTypeMask as M;
    vec![
        entry("Trust me, I'm an engineer", 1, [M::LABEL, M::empty()], "0:\n\tpush rbp\n\tmov rbp, rsp"),
        entry("Bitconnect, take my investment", 1, [M::REGISTER | M::IMMEDIATE, M::empty()], "mov rax, 64-4\n\tmov rdi, 0\n\tsyscall"),
        entry("Stonks", 0, NONE, "mov rax, 60\n\tmov rdi, 0\n\tsyscall"),
        entry("Not stonks", 0, NONE, "mov rax, 60\n\tmov rdi, 1\n\tsyscall"),
        entry("Speak now or forever hold your peace", 1, [M::REGISTER, M::empty()], "mov al, 0\n\tcall writechar"),
        entry("Penny for your thoughts", 1, [M::REGISTER, M::empty()], "call readchar\n\tmov 0, al"),
        entry("is actually", 2, [M::REGISTER | M::MEMORY, M::REGISTER | M::IMMEDIATE], "mov 0, 1"),
        entry("grows by", 2, [M::REGISTER | M::MEMORY, M::REGISTER | M::IMMEDIATE], "add 0, 1"),
        entry("shrinks by", 2, [M::REGISTER | M::MEMORY, M::REGISTER | M::IMMEDIATE], "sub 0, 1"),
        entry("flexes harder than", 2, [M::REGISTER | M::MEMORY, M::REGISTER | M::IMMEDIATE], "imul 0, 1"),
        entry("This is a triumph", 0, NONE, "nop"),
        entry("Oh no. Oh no no no.", 0, NONE, "int3"),
        entry("Who would win", 2, [M::LABEL, M::LABEL], "je 0\n\tjmp 1"),
        entry("wins this round", 1, [M::LABEL, M::empty()], "0:"),
        entry("Corporate needs you to find the differences", 0, NONE, "je .Lthesamepicture"),
        entry("They're the same picture", 0, NONE, ".Lthesamepicture:"),
        entry("...or draw 25", 0, NONE, "nop"),
        entry("<invalid command>", 0, NONE, ""),
    ]
}

/// The full, process-wide command table, indexed by opcode.
pub struct CommandTable {
    entries: Vec<CommandTableEntry>,
}

impl CommandTable {
    pub fn get(&self, opcode: u8) -> &CommandTableEntry {
        &self.entries[opcode as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

static TABLE: OnceLock<CommandTable> = OnceLock::new();

/// Access the global command table.
pub fn command_table() -> &'static CommandTable {
    TABLE.get_or_init(|| CommandTable { entries: build_table() })
}

/// The family an opcode belongs to, as a tagged variant rather than raw
/// integer arithmetic (distilled spec's design note on opcode arithmetic).
/// `memeasm_ir` pattern-matches on this instead of comparing `u8`s directly,
/// keeping the "opcodes are numerically adjacent" convention isolated to
/// this one function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandRole {
    FunctionDecl,
    Return,
    WhoWouldWinCompare,
    WhoWouldWinLabel,
    SamePictureCompare,
    SamePictureLabel,
    Ordinary,
}

pub fn role_of(opcode: u8) -> CommandRole {
    match opcode {
        OP_FUNCTION_DECL => CommandRole::FunctionDecl,
        OP_RETURN_VALUE | OP_RETURN_SUCCESS | OP_RETURN_FAILURE => CommandRole::Return,
        OP_WHO_WOULD_WIN => CommandRole::WhoWouldWinCompare,
        OP_WHO_WOULD_WIN_LABEL => CommandRole::WhoWouldWinLabel,
        OP_SAME_PICTURE => CommandRole::SamePictureCompare,
        OP_SAME_PICTURE_LABEL => CommandRole::SamePictureLabel,
        _ => CommandRole::Ordinary,
    }
}

/// `true` if `opcode` is one of the three return-family opcodes
/// immediately following the function-declaration opcode, i.e. it lies in
/// `(decl_opcode, decl_opcode + 3]`.
pub fn is_return_opcode(opcode: u8) -> bool {
    matches!(role_of(opcode), CommandRole::Return)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn table_has_eighteen_opcodes() {
        assert_eq!(command_table().len(), NUMBER_OF_COMMANDS as usize);
    }

    #[test]
    fn sentinels_sit_at_the_last_two_slots() {
        let table = command_table();
        assert_eq!(table.get(OP_DRAW_SENTINEL).phrase, "...or draw 25");
        assert_eq!(table.get(OP_INVALID_SENTINEL).phrase, "<invalid command>");
    }

    #[test]
    fn breakpoint_is_the_only_ignorable_command() {
        let table = command_table();
        let ignorable: Vec<u8> = (0..NUMBER_OF_COMMANDS)
            .filter(|&op| table.get(op).is_ignorable())
            .collect();
        assert_eq!(ignorable, vec![OP_BREAKPOINT]);
    }

    #[test]
    fn label_opcodes_follow_their_compare_opcode() {
        assert_eq!(OP_WHO_WOULD_WIN_LABEL, OP_WHO_WOULD_WIN + 1);
        assert_eq!(OP_SAME_PICTURE_LABEL, OP_SAME_PICTURE + 1);
    }

    #[test]
    fn tokenizes_two_parameter_template() {
        let fragments = tokenize_template("mov 0, 1", 2);
        assert_eq!(
            fragments,
            vec![
                TemplateFragment::Literal("mov "),
                TemplateFragment::Param(0),
                TemplateFragment::Literal(", "),
                TemplateFragment::Param(1),
            ]
        );
    }

    #[test]
    fn digit_outside_parameter_range_stays_literal() {
        let fragments = tokenize_template("mov al, 0\n\tcall writechar", 1);
        assert_eq!(
            fragments,
            vec![
                TemplateFragment::Literal("mov al, "),
                TemplateFragment::Param(0),
                TemplateFragment::Literal("\n\tcall writechar"),
            ]
        );
    }

    #[test]
    fn no_table_template_has_a_stray_digit_collision() {
        for opcode in 0..NUMBER_OF_COMMANDS {
            let entry = command_table().get(opcode);
            let param_fragments = entry
                .fragments
                .iter()
                .filter(|f| matches!(f, TemplateFragment::Param(_)))
                .count();
            assert_eq!(
                param_fragments, entry.used_parameters,
                "opcode {opcode} ({:?}) tokenized {param_fragments} param slots, expected {}",
                entry.phrase, entry.used_parameters
            );
        }
    }
}
