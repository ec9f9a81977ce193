//! Test command implementation
//!
//! Runs golden fixtures: each `tests/*.meme` file is parsed and analyzed,
//! and the resulting diagnostics are compared against a sibling
//! `tests/<name>.expected` file (one diagnostic's `Display` output per
//! line). A fixture with no `.expected` file is expected to compile clean.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use memeasm_common::{CompileMode, CompileState};
use memeasm_ir::analyze;
use memeasm_parser::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::project::Project;

#[derive(Debug, Default)]
struct TestStats {
    passed: usize,
    failed: usize,
    total_duration_ns: u64,
}

/// Execute the test command.
pub fn execute(filter: Option<String>, manifest_path: Option<PathBuf>) -> Result<()> {
    let project = Project::find_and_load(manifest_path)?;
    info!("Project: {} v{}", project.name(), project.version());

    let fixtures = find_fixtures(&project)?;
    if fixtures.is_empty() {
        info!("No test fixtures found under tests/");
        return Ok(());
    }

    info!("Found {} test fixtures", fixtures.len());

    let mut stats = TestStats::default();
    for fixture in &fixtures {
        if let Some(pattern) = &filter {
            if !fixture.to_string_lossy().contains(pattern.as_str()) {
                continue;
            }
        }

        debug!("Running fixture {}", fixture.display());
        if run_fixture(fixture, &mut stats)? {
            info!("  ✓ {}", fixture.display());
        } else {
            warn!("  ✗ {}", fixture.display());
        }
    }

    let duration_secs = stats.total_duration_ns as f64 / 1_000_000_000.0;
    println!();
    println!(
        "test result: {}. {} passed; {} failed; finished in {:.2}s",
        if stats.failed == 0 { "ok" } else { "FAILED" },
        stats.passed,
        stats.failed,
        duration_secs
    );

    if stats.failed > 0 {
        return Err(anyhow::anyhow!("{} fixture(s) failed", stats.failed));
    }

    Ok(())
}

/// Returns `true` if the fixture's actual diagnostics matched what was
/// expected, and records the outcome in `stats`.
fn run_fixture(fixture: &Path, stats: &mut TestStats) -> Result<bool> {
    let start = Instant::now();

    let source = std::fs::read_to_string(fixture)
        .with_context(|| format!("Failed to read fixture: {}", fixture.display()))?;

    let (commands, parse_diagnostics) = Parser::parse(&source);
    let mut actual: Vec<String> = parse_diagnostics.messages().iter().map(|d| d.to_string()).collect();

    if parse_diagnostics.is_empty() {
        let state = CompileState::new(commands, CompileMode::Executable);
        let diagnostics = analyze(&state);
        actual.extend(diagnostics.messages().iter().map(|d| d.to_string()));
    }

    let expected_path = fixture.with_extension("expected");
    let expected: Vec<String> = if expected_path.exists() {
        std::fs::read_to_string(&expected_path)
            .with_context(|| format!("Failed to read {}", expected_path.display()))?
            .lines()
            .map(str::to_string)
            .collect()
    } else {
        Vec::new()
    };

    let passed = actual == expected;
    stats.total_duration_ns += start.elapsed().as_nanos() as u64;
    if passed {
        stats.passed += 1;
    } else {
        stats.failed += 1;
        warn!("    expected: {:?}", expected);
        warn!("    actual:   {:?}", actual);
    }

    Ok(passed)
}

fn find_fixtures(project: &Project) -> Result<Vec<PathBuf>> {
    let mut fixtures = Vec::new();

    let tests_dir = project.root_dir().join("tests");
    if tests_dir.exists() {
        for entry in walkdir::WalkDir::new(&tests_dir) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == "meme") {
                fixtures.push(path.to_path_buf());
            }
        }
    }

    fixtures.sort();
    Ok(fixtures)
}
