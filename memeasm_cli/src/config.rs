//! Configuration types for the memeasm CLI

use memeasm_common::{CompileMode, OptLevel, Platform};
use serde::{Deserialize, Serialize};

/// Build configuration assembled from CLI flags and `memeasm.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub mode: CompileMode,
    pub optimize: OptLevel,
    pub debug_info: bool,
    pub target: Platform,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            mode: CompileMode::Executable,
            optimize: OptLevel::None,
            debug_info: false,
            target: Platform::host(),
        }
    }
}

/// Format configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatConfig {
    pub check_only: bool,
    pub indent_size: u32,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { check_only: false, indent_size: 4 }
    }
}
