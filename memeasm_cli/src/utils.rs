//! Utility functions for the memeasm CLI

use anyhow::{Context, Result};
use std::path::Path;

/// Check if a directory contains a memeasm project (has `memeasm.toml`).
pub fn is_memeasm_project(dir: &Path) -> bool {
    dir.join("memeasm.toml").exists()
}

/// Find the root of a memeasm project by walking up the directory tree.
pub fn find_project_root(start_dir: &Path) -> Option<&Path> {
    let mut current = start_dir;

    loop {
        if is_memeasm_project(current) {
            return Some(current);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir_exists(dir: &Path) -> Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// Check if a file has a specific extension.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()).map_or(false, |ext| ext == extension)
}

/// Validate that a string is a valid identifier (used for project names).
pub fn is_valid_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.chars().next().unwrap().is_alphabetic()
        && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Convert a file size in bytes to a human-readable string.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: u64 = 1024;

    if bytes < THRESHOLD {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD as f64 && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD as f64;
        unit_index += 1;
    }

    format!("{:.1} {}", size, UNITS[unit_index])
}
