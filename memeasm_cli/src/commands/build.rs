//! Build command implementation

use anyhow::{Context, Result};
use log::{error, info};
use memeasm_common::{CompileMode, CompileState};
use memeasm_ir::{analyze, translate};
use memeasm_parser::Parser;
use memeasm_process::Toolchain;
use std::path::PathBuf;

use crate::config::BuildConfig;
use crate::project::Project;

/// Execute the build command, producing either an executable or an object
/// file next to the project's `target/` directory.
pub fn execute(config: BuildConfig, manifest_path: Option<PathBuf>) -> Result<()> {
    info!("Building memeasm project...");

    let project = Project::find_and_load(manifest_path)?;
    info!("Project: {} v{}", project.name(), project.version());
    info!("Platform: {:?}, optimize: {:?}", config.target, config.optimize);

    std::fs::create_dir_all(project.build_dir()).context("Failed to create build directory")?;

    let assembly = compile_project(&project, &config)?;

    let asm_path = project.assembly_path();
    std::fs::write(&asm_path, &assembly)
        .with_context(|| format!("Failed to write {}", asm_path.display()))?;
    info!("Wrote {}", asm_path.display());

    let output_path = project.output_path(config.mode);
    match config.mode {
        CompileMode::ObjectFile => {
            let toolchain = Toolchain::for_platform(config.target);
            toolchain
                .assemble(&asm_path, &output_path)
                .context("Assembling failed")?;
        }
        CompileMode::Executable => {
            let toolchain = Toolchain::for_platform(config.target);
            toolchain
                .assemble_and_link(&asm_path, &output_path)
                .context("Assembling/linking failed")?;
        }
    }

    info!("Build completed successfully: {}", output_path.display());
    Ok(())
}

/// Lex, parse, analyze and translate the project's single source file.
fn compile_project(project: &Project, config: &BuildConfig) -> Result<String> {
    let source_path = project.main_source_path();
    info!("Compiling {}", source_path.display());

    let source = std::fs::read_to_string(&source_path)
        .with_context(|| format!("Failed to read source file: {}", source_path.display()))?;

    let (commands, parse_diagnostics) = Parser::parse(&source);
    if parse_diagnostics.has_errors() {
        for diagnostic in parse_diagnostics.errors() {
            error!("{}", diagnostic);
        }
        return Err(anyhow::anyhow!(
            "{} parse error(s) found, aborting",
            parse_diagnostics.error_count()
        ));
    }

    let state = CompileState::new(commands, config.mode)
        .with_opt_level(config.optimize)
        .with_stabs(config.debug_info)
        .with_platform(config.target);

    let diagnostics = analyze(&state);
    for diagnostic in diagnostics.messages() {
        if diagnostic.severity == memeasm_common::Severity::Error {
            error!("{}", diagnostic);
        } else {
            log::warn!("{}", diagnostic);
        }
    }
    if diagnostics.has_errors() {
        return Err(anyhow::anyhow!(
            "{} semantic error(s) found, aborting before translation",
            diagnostics.error_count()
        ));
    }

    Ok(translate(&state))
}
