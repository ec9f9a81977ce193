//! Project management utilities

use anyhow::{Context, Result};
use memeasm_common::{CompileMode, OptLevel, Platform};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Represents a memeasm project rooted at a directory holding `memeasm.toml`.
#[derive(Debug, Clone)]
pub struct Project {
    root_dir: PathBuf,
    config: ProjectConfig,
}

/// Project configuration loaded from `memeasm.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project: ProjectInfo,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub format: FormatSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub version: String,
    pub author: Option<String>,
    pub description: Option<String>,
    /// Entry source file, relative to the project root. Defaults to
    /// `src/main.meme` — one file per project, matching the core's
    /// one-`CompileState`-per-invocation model.
    #[serde(default = "default_main")]
    pub main: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSettings {
    #[serde(default)]
    pub optimize: OptLevel,
    #[serde(default)]
    pub debug_info: bool,
    /// Target platform override; `None` means detect from the host.
    #[serde(default)]
    pub target: Option<Platform>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatSettings {
    #[serde(default = "default_indent")]
    pub indent: u32,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self { optimize: OptLevel::default(), debug_info: false, target: None }
    }
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self { indent: default_indent() }
    }
}

fn default_main() -> String {
    "src/main.meme".to_string()
}

fn default_indent() -> u32 {
    4
}

impl Project {
    /// Find and load a project from the given directory or current directory.
    pub fn find_and_load(manifest_path: Option<PathBuf>) -> Result<Self> {
        let project_dir = if let Some(path) = manifest_path {
            if path.is_file() {
                path.parent()
                    .ok_or_else(|| anyhow::anyhow!("Invalid manifest path"))?
                    .to_path_buf()
            } else {
                path
            }
        } else {
            std::env::current_dir().context("Failed to get current directory")?
        };

        Self::load_from_dir(&project_dir)
    }

    /// Load a project from a specific directory.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join("memeasm.toml");

        if !config_path.exists() {
            return Err(anyhow::anyhow!(
                "No memeasm.toml found in {}. Run 'memeasm init' to create a new project.",
                dir.display()
            ));
        }

        let config_content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: ProjectConfig =
            toml::from_str(&config_content).context("Failed to parse memeasm.toml")?;

        Ok(Self { root_dir: dir.to_path_buf(), config })
    }

    pub fn name(&self) -> &str {
        &self.config.project.name
    }

    pub fn version(&self) -> &str {
        &self.config.project.version
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root_dir.join("target")
    }

    /// The single source file this project compiles.
    pub fn main_source_path(&self) -> PathBuf {
        self.root_dir.join(&self.config.project.main)
    }

    /// Compiled output path for the given compile mode.
    pub fn output_path(&self, mode: CompileMode) -> PathBuf {
        let mut path = self.build_dir().join(&self.config.project.name);
        if mode == CompileMode::ObjectFile {
            path.set_extension("o");
        } else {
            #[cfg(windows)]
            path.set_extension("exe");
        }
        path
    }

    /// The emitted assembly path, sitting next to the final output.
    pub fn assembly_path(&self) -> PathBuf {
        self.build_dir().join(&self.config.project.name).with_extension("s")
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn loads_a_minimal_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("memeasm.toml"),
            "[project]\nname = \"demo\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();

        let project = Project::load_from_dir(dir.path()).expect("loads");
        assert_eq!(project.name(), "demo");
        assert_eq!(project.main_source_path(), dir.path().join("src/main.meme"));
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(Project::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn object_file_output_gets_an_o_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join("memeasm.toml"),
            "[project]\nname = \"demo\"\nversion = \"0.1.0\"\n",
        )
        .unwrap();
        let project = Project::load_from_dir(dir.path()).expect("loads");
        assert_eq!(
            project.output_path(CompileMode::ObjectFile).extension().unwrap(),
            "o"
        );
    }
}
