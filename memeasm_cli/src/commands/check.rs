//! Check command implementation

use anyhow::{Context, Result};
use log::{error, info};
use memeasm_common::{CompileMode, CompileState, Platform, Severity};
use memeasm_ir::analyze;
use memeasm_parser::Parser;
use std::path::PathBuf;

use crate::project::Project;

/// Execute the check command: parse and analyze without translating or
/// invoking the toolchain.
pub fn execute(manifest_path: Option<PathBuf>, target: Option<Platform>) -> Result<()> {
    info!("Checking memeasm project...");

    let project = Project::find_and_load(manifest_path)?;
    info!("Project: {} v{}", project.name(), project.version());

    let source_path = project.main_source_path();
    let source = std::fs::read_to_string(&source_path)
        .with_context(|| format!("Failed to read source file: {}", source_path.display()))?;

    let (commands, parse_diagnostics) = Parser::parse(&source);
    let mut has_errors = parse_diagnostics.has_errors();
    for diagnostic in parse_diagnostics.messages() {
        report(&source_path, diagnostic);
    }

    let platform = target.unwrap_or_else(|| {
        project.config().build.target.unwrap_or_else(Platform::host)
    });
    let state = CompileState::new(commands, CompileMode::Executable).with_platform(platform);

    let diagnostics = analyze(&state);
    has_errors = has_errors || diagnostics.has_errors();
    for diagnostic in diagnostics.messages() {
        report(&source_path, diagnostic);
    }

    if has_errors {
        return Err(anyhow::anyhow!("Check failed"));
    }

    info!("No errors found");
    Ok(())
}

fn report(source_path: &std::path::Path, diagnostic: &memeasm_common::Diagnostic) {
    match diagnostic.severity {
        Severity::Error => error!("{}: {}", source_path.display(), diagnostic),
        Severity::Warning => log::warn!("{}: {}", source_path.display(), diagnostic),
    }
}
