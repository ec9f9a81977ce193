//! Shared compile-time configuration (distilled spec §3.4).
//!
//! `CompileState` is the one piece of context threaded through every stage
//! of the core: the two analyzers and the translator all borrow it rather
//! than each re-deriving platform/optimisation decisions on their own.

use crate::CommandStream;
use serde::{Deserialize, Serialize};

/// Optimisation level. Ordering is meaningful only in that `O42069` is
/// never reached by incrementing through the others; a caller opts into it
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptLevel {
    None,
    O1,
    O2,
    O3,
    Os,
    /// Elides every command except function prologues, replacing each
    /// function body with `xor rax, rax` / `ret`.
    O42069,
}

impl Default for OptLevel {
    fn default() -> Self {
        OptLevel::None
    }
}

/// Target platform. Governs main-symbol spelling, section-directive syntax,
/// and which runtime-helper variant of `writechar`/`readchar` gets emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    /// Detect the host platform the way `memeasm_cli` does by default,
    /// before any `--target` override is applied.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "macos" => Platform::MacOs,
            "windows" => Platform::Windows,
            _ => Platform::Linux,
        }
    }

    /// The spelling of the entry symbol the translator emits `.global` for.
    pub fn main_symbol(self) -> &'static str {
        match self {
            Platform::MacOs => "_main",
            Platform::Linux | Platform::Windows => "main",
        }
    }
}

/// Whether the translator is asked to produce a final executable or leave
/// linking to a later step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompileMode {
    Executable,
    ObjectFile,
}

/// Everything the core needs besides the command table itself.
///
/// Built once by `memeasm_cli` (or a test) and handed down by shared
/// reference; none of `memeasm_ir`'s analyzers or the translator mutate it.
#[derive(Debug, Clone)]
pub struct CompileState {
    pub commands: CommandStream,
    pub mode: CompileMode,
    pub opt_level: OptLevel,
    pub use_stabs: bool,
    pub platform: Platform,
}

impl CompileState {
    pub fn new(commands: CommandStream, mode: CompileMode) -> Self {
        Self {
            commands,
            mode,
            opt_level: OptLevel::default(),
            use_stabs: false,
            platform: Platform::host(),
        }
    }

    pub fn with_opt_level(mut self, opt_level: OptLevel) -> Self {
        self.opt_level = opt_level;
        self
    }

    pub fn with_stabs(mut self, use_stabs: bool) -> Self {
        self.use_stabs = use_stabs;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macos_uses_underscore_main() {
        assert_eq!(Platform::MacOs.main_symbol(), "_main");
        assert_eq!(Platform::Linux.main_symbol(), "main");
        assert_eq!(Platform::Windows.main_symbol(), "main");
    }

    #[test]
    fn default_opt_level_is_none() {
        let state = CompileState::new(CommandStream::new(Vec::new()), CompileMode::Executable);
        assert_eq!(state.opt_level, OptLevel::None);
        assert!(!state.use_stabs);
    }
}
