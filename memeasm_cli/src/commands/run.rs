//! Run command implementation

use anyhow::{Context, Result};
use log::{error, info};
use memeasm_common::CompileMode;
use std::path::PathBuf;
use std::process::Command;

use crate::commands::build;
use crate::config::BuildConfig;
use crate::project::Project;

/// Execute the run command: build an executable, then run it and forward
/// its exit code.
pub fn execute(args: Vec<String>, config: BuildConfig, manifest_path: Option<PathBuf>) -> Result<()> {
    info!("Running memeasm project...");

    let project = Project::find_and_load(manifest_path)?;

    let mut build_config = config;
    build_config.mode = CompileMode::Executable;
    build::execute(build_config, Some(project.root_dir().to_path_buf()))?;

    let executable = project.output_path(CompileMode::Executable);
    if !executable.exists() {
        error!("Executable not found: {}", executable.display());
        return Err(anyhow::anyhow!("Build output not found"));
    }

    info!("Running: {}", executable.display());

    let status = Command::new(&executable)
        .args(&args)
        .status()
        .with_context(|| format!("Failed to execute {}", executable.display()))?;

    if !status.success() {
        let code = status.code().unwrap_or(-1);
        error!("Program exited with code: {}", code);
        std::process::exit(code);
    }

    Ok(())
}
