//! The `Command` / `CommandStream` data model (distilled spec §3.1).

use serde::{Deserialize, Serialize};

/// Which parameter slot, if any, must be rendered as a memory-indirect
/// operand (wrapped in `[...]`) when translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerSlot {
    None,
    First,
    Second,
}

impl PointerSlot {
    /// `true` if parameter index `idx` (0-based) must be bracket-wrapped.
    pub fn wraps(self, idx: usize) -> bool {
        matches!(
            (self, idx),
            (PointerSlot::First, 0) | (PointerSlot::Second, 1)
        )
    }
}

/// One parsed source statement.
///
/// Commands are immutable once built; analyzers and the translator only
/// ever hold shared (`&[Command]`) views over a `CommandStream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub opcode: u8,
    pub parameters: [Option<String>; 2],
    pub is_pointer: PointerSlot,
    pub line_num: u32,
    /// Emit-enable flag; an upstream optimisation pass may clear this to
    /// elide the command at translation time without removing it from the
    /// stream (so line numbers and function bodies stay stable).
    pub translate: bool,
}

impl Command {
    pub fn new(opcode: u8, line_num: u32) -> Self {
        Self {
            opcode,
            parameters: [None, None],
            is_pointer: PointerSlot::None,
            line_num,
            translate: true,
        }
    }

    pub fn with_param(mut self, idx: usize, value: impl Into<String>) -> Self {
        self.parameters[idx] = Some(value.into());
        self
    }

    pub fn with_pointer(mut self, slot: PointerSlot) -> Self {
        self.is_pointer = slot;
        self
    }

    pub fn not_translated(mut self) -> Self {
        self.translate = false;
        self
    }

    pub fn param(&self, idx: usize) -> Option<&str> {
        self.parameters[idx].as_deref()
    }
}

/// An ordered sequence of parsed commands plus the one auxiliary cursor the
/// translator needs for the `.LConfusedStonks` runtime joke (distilled spec
/// §4.4.2).
#[derive(Debug, Clone, Default)]
pub struct CommandStream {
    commands: Vec<Command>,
    /// Index into `commands` that the translator prefixes with
    /// `.LConfusedStonks:`. `None` disables the feature.
    pub random_index: Option<usize>,
}

impl CommandStream {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands, random_index: None }
    }

    pub fn with_random_index(mut self, index: usize) -> Self {
        self.random_index = Some(index);
        self
    }

    pub fn as_slice(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::ops::Index<usize> for CommandStream {
    type Output = Command;

    fn index(&self, index: usize) -> &Command {
        &self.commands[index]
    }
}
