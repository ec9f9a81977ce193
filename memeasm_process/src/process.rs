//! A small process-spawning wrapper around `std::process::Command`.
//!
//! `memeasm_cli` never needs to stream a long-running child's output or
//! race it against a timeout — assembling and linking one small `.s` file
//! runs to completion in well under a second — so, unlike some sibling
//! toolchains, this stays a thin builder rather than a signal-aware process
//! supervisor.

use memeasm_common::{MemeAsmError, MemeAsmResult};
use std::path::Path;
use std::process::{Command, Output, Stdio};

/// Exit status of a finished process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
}

impl ExitStatus {
    pub fn new(code: Option<i32>) -> Self {
        Self { code }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Builder for spawning a toolchain subprocess (`as`, `cc`, `ld`, ...).
pub struct ProcessBuilder {
    program: String,
    args: Vec<String>,
    current_dir: Option<std::path::PathBuf>,
}

impl ProcessBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into(), args: Vec::new(), current_dir: None }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn build(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run the process, inheriting stdio, and wait for it to finish.
    pub fn run(self) -> MemeAsmResult<ExitStatus> {
        let program = self.program.clone();
        let status = self
            .build()
            .status()
            .map_err(|e| MemeAsmError::toolchain_error(format!("failed to run '{program}': {e}")))?;
        Ok(ExitStatus::new(status.code()))
    }

    /// Run the process, capturing stdout/stderr instead of inheriting them.
    pub fn output(self) -> MemeAsmResult<Output> {
        let program = self.program.clone();
        self.build()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| MemeAsmError::toolchain_error(format!("failed to run '{program}': {e}")))
    }

    /// `true` if `program` resolves to an executable somewhere on `PATH`.
    pub fn is_on_path(program: &str) -> bool {
        let Some(path_var) = std::env::var_os("PATH") else { return false };
        std::env::split_paths(&path_var).any(|dir| dir.join(program).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_reports_success_only_for_zero() {
        assert!(ExitStatus::new(Some(0)).success());
        assert!(!ExitStatus::new(Some(1)).success());
        assert!(!ExitStatus::new(None).success());
    }

    #[test]
    fn run_captures_a_nonzero_exit_code() {
        let status = ProcessBuilder::new("false").run().expect("false should spawn");
        assert!(!status.success());
    }

    #[test]
    fn output_captures_stdout() {
        let output = ProcessBuilder::new("echo").arg("hi").output().expect("echo should spawn");
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "hi");
    }

    #[test]
    fn missing_program_is_a_toolchain_error() {
        let err = ProcessBuilder::new("definitely-not-a-real-binary-xyz").run();
        assert!(err.is_err());
    }
}
