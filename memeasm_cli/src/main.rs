//! memeasm compiler command-line interface
//!
//! This is the entry point for the memeasm compiler and toolchain. It
//! provides cargo-like commands for building, running, testing, and
//! managing memeasm projects.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use memeasm_common::{CompileMode, OptLevel, Platform};
use std::path::PathBuf;

mod commands;
mod config;
mod project;
mod utils;

use commands::*;
use config::BuildConfig;

/// memeasm compiler and toolchain
#[derive(Parser)]
#[command(name = "memeasm")]
#[command(about = "The memeasm compiler and toolchain")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress output
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// `clap::ValueEnum` mirror of `memeasm_common::OptLevel`: the orphan rule
/// blocks implementing `ValueEnum` on a type from another crate directly.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OptLevelArg {
    None,
    O1,
    O2,
    O3,
    Os,
    O42069,
}

impl From<OptLevelArg> for OptLevel {
    fn from(arg: OptLevelArg) -> Self {
        match arg {
            OptLevelArg::None => OptLevel::None,
            OptLevelArg::O1 => OptLevel::O1,
            OptLevelArg::O2 => OptLevel::O2,
            OptLevelArg::O3 => OptLevel::O3,
            OptLevelArg::Os => OptLevel::Os,
            OptLevelArg::O42069 => OptLevel::O42069,
        }
    }
}

/// `clap::ValueEnum` mirror of `memeasm_common::Platform`.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum PlatformArg {
    Linux,
    Macos,
    Windows,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Linux => Platform::Linux,
            PlatformArg::Macos => Platform::MacOs,
            PlatformArg::Windows => Platform::Windows,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the current project
    Build {
        /// Emit a relocatable object file instead of a linked executable
        #[arg(long)]
        object: bool,

        /// Optimisation level
        #[arg(long, value_enum, default_value = "none")]
        opt_level: OptLevelArg,

        /// Emit STABS debug directives
        #[arg(long)]
        debug_info: bool,

        /// Target platform (defaults to the host platform)
        #[arg(long, value_enum)]
        target: Option<PlatformArg>,

        /// Path to the project directory
        #[arg(long)]
        manifest_path: Option<PathBuf>,
    },

    /// Build and run the current project
    Run {
        /// Arguments to pass to the program
        args: Vec<String>,

        /// Optimisation level
        #[arg(long, value_enum, default_value = "none")]
        opt_level: OptLevelArg,

        /// Emit STABS debug directives
        #[arg(long)]
        debug_info: bool,

        /// Target platform (defaults to the host platform)
        #[arg(long, value_enum)]
        target: Option<PlatformArg>,

        /// Path to the project directory
        #[arg(long)]
        manifest_path: Option<PathBuf>,
    },

    /// Check the current project for errors without building
    Check {
        /// Target platform (defaults to the host platform)
        #[arg(long, value_enum)]
        target: Option<PlatformArg>,

        /// Path to the project directory
        #[arg(long)]
        manifest_path: Option<PathBuf>,
    },

    /// Clean build artifacts
    Clean {
        /// Path to the project directory
        #[arg(long)]
        manifest_path: Option<PathBuf>,
    },

    /// Run golden-fixture tests under tests/
    Test {
        /// Filter to run only fixtures whose path contains this pattern
        filter: Option<String>,

        /// Path to the project directory
        #[arg(long)]
        manifest_path: Option<PathBuf>,
    },

    /// Format source code and manifests
    Format {
        /// Check formatting without making changes
        #[arg(long)]
        check: bool,

        /// Specific files or directories to format
        paths: Vec<PathBuf>,
    },

    /// Create a new memeasm project
    Init {
        /// Name of the new project
        name: String,

        /// Directory to create the project in
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if cli.quiet {
        log::LevelFilter::Error
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    match cli.command {
        Commands::Build { object, opt_level, debug_info, target, manifest_path } => {
            let config = BuildConfig {
                mode: if object { CompileMode::ObjectFile } else { CompileMode::Executable },
                optimize: opt_level.into(),
                debug_info,
                target: target.map(Into::into).unwrap_or_else(Platform::host),
            };
            build::execute(config, manifest_path)
        }
        Commands::Run { args, opt_level, debug_info, target, manifest_path } => {
            let config = BuildConfig {
                mode: CompileMode::Executable,
                optimize: opt_level.into(),
                debug_info,
                target: target.map(Into::into).unwrap_or_else(Platform::host),
            };
            run::execute(args, config, manifest_path)
        }
        Commands::Check { target, manifest_path } => check::execute(manifest_path, target.map(Into::into)),
        Commands::Clean { manifest_path } => clean::execute(manifest_path),
        Commands::Test { filter, manifest_path } => test::execute(filter, manifest_path),
        Commands::Format { check, paths } => format::execute(check, paths),
        Commands::Init { name, path } => init::execute(name, path),
    }
}
