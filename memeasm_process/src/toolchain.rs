//! Assembler/linker invocation (distilled spec §6's "downstream invocation
//! of an external assembler/linker", out of scope for the core but needed
//! for `memeasm_cli build` to produce a runnable binary).
//!
//! The translator only ever emits text; turning that text into bytes the
//! OS can execute is entirely this crate's job, and the core never calls
//! into it.

use memeasm_common::{MemeAsmError, MemeAsmResult, Platform};
use std::path::{Path, PathBuf};

use crate::process::ProcessBuilder;

/// Selects the assembler/linker binaries for the target platform.
///
/// Cross-compiling to Windows from a Linux/macOS host uses the MinGW-w64
/// cross toolchain; building natively on each platform uses its own `as`
/// and C compiler driver (GCC or Clang act as a thin assembler+linker
/// frontend, which is simpler than driving `ld` directly with the right
/// CRT startup objects).
pub struct Toolchain {
    platform: Platform,
    assembler: String,
    linker_driver: String,
}

impl Toolchain {
    pub fn for_platform(platform: Platform) -> Self {
        let (assembler, linker_driver) = match platform {
            Platform::Linux | Platform::MacOs => ("as".to_string(), "cc".to_string()),
            Platform::Windows => ("x86_64-w64-mingw32-as".to_string(), "x86_64-w64-mingw32-gcc".to_string()),
        };
        Self { platform, assembler, linker_driver }
    }

    /// Override the assembler binary (e.g. a user-configured cross `as`).
    pub fn with_assembler(mut self, assembler: impl Into<String>) -> Self {
        self.assembler = assembler.into();
        self
    }

    /// Override the linker-driver binary.
    pub fn with_linker_driver(mut self, linker_driver: impl Into<String>) -> Self {
        self.linker_driver = linker_driver.into();
        self
    }

    /// Check that both tools are reachable on `PATH` before doing any work,
    /// so a missing cross-toolchain fails with one clear message instead of
    /// a `std::io::Error` from deep inside `Command::spawn`.
    pub fn check_available(&self) -> MemeAsmResult<()> {
        if !ProcessBuilder::is_on_path(&self.assembler) {
            return Err(MemeAsmError::toolchain_error(format!(
                "assembler '{}' not found on PATH",
                self.assembler
            )));
        }
        if !ProcessBuilder::is_on_path(&self.linker_driver) {
            return Err(MemeAsmError::toolchain_error(format!(
                "linker driver '{}' not found on PATH",
                self.linker_driver
            )));
        }
        Ok(())
    }

    /// Assemble `asm_path` (GAS Intel-syntax text) into an object file at
    /// `object_path`.
    pub fn assemble(&self, asm_path: &Path, object_path: &Path) -> MemeAsmResult<()> {
        log::info!("assembling {} -> {}", asm_path.display(), object_path.display());
        let status = ProcessBuilder::new(&self.assembler)
            .arg("-o")
            .arg(object_path.to_string_lossy().into_owned())
            .arg(asm_path.to_string_lossy().into_owned())
            .run()?;
        if !status.success() {
            return Err(MemeAsmError::toolchain_error(format!(
                "assembler exited with status {:?}",
                status.code()
            )));
        }
        Ok(())
    }

    /// Link `object_path` into an executable at `output_path`.
    ///
    /// Routed through the C compiler driver rather than `ld` directly so
    /// the platform's usual CRT startup objects and default libraries get
    /// linked in automatically.
    pub fn link(&self, object_path: &Path, output_path: &Path) -> MemeAsmResult<()> {
        log::info!("linking {} -> {}", object_path.display(), output_path.display());
        let mut builder = ProcessBuilder::new(&self.linker_driver)
            .arg("-o")
            .arg(output_path.to_string_lossy().into_owned())
            .arg(object_path.to_string_lossy().into_owned())
            .arg("-nostartfiles")
            .arg("-static");
        if self.platform == Platform::MacOs {
            // macOS's linker rejects -static for the default (dynamic) CRT;
            // the hand-written `_main`/syscall bodies need no libc startup
            // code at all, so drop the flag rather than fight ld about it.
            builder = ProcessBuilder::new(&self.linker_driver)
                .arg("-o")
                .arg(output_path.to_string_lossy().into_owned())
                .arg(object_path.to_string_lossy().into_owned())
                .arg("-nostartfiles");
        }
        let status = builder.run()?;
        if !status.success() {
            return Err(MemeAsmError::toolchain_error(format!(
                "linker exited with status {:?}",
                status.code()
            )));
        }
        Ok(())
    }

    /// Assemble and link in one step, via a temporary object file next to
    /// `output_path`.
    pub fn assemble_and_link(&self, asm_path: &Path, output_path: &Path) -> MemeAsmResult<PathBuf> {
        self.check_available()?;
        let object_path = output_path.with_extension("o");
        self.assemble(asm_path, &object_path)?;
        self.link(&object_path, output_path)?;
        Ok(object_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linux_and_macos_use_the_native_as_and_cc() {
        assert_eq!(Toolchain::for_platform(Platform::Linux).assembler, "as");
        assert_eq!(Toolchain::for_platform(Platform::MacOs).linker_driver, "cc");
    }

    #[test]
    fn windows_target_uses_the_mingw_cross_toolchain() {
        let toolchain = Toolchain::for_platform(Platform::Windows);
        assert_eq!(toolchain.assembler, "x86_64-w64-mingw32-as");
        assert_eq!(toolchain.linker_driver, "x86_64-w64-mingw32-gcc");
    }

    #[test]
    fn check_available_reports_a_missing_assembler() {
        let toolchain = Toolchain::for_platform(Platform::Linux).with_assembler("definitely-not-a-real-as");
        assert!(toolchain.check_available().is_err());
    }
}
