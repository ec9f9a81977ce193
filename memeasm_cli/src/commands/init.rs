//! Init command implementation

use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Execute the init command.
pub fn execute(name: String, path: Option<PathBuf>) -> Result<()> {
    info!("Creating new memeasm project: {}", name);

    if !is_valid_project_name(&name) {
        return Err(anyhow::anyhow!(
            "Invalid project name '{}'. Project names must be valid identifiers.",
            name
        ));
    }

    let project_dir = if let Some(path) = path {
        path.join(&name)
    } else {
        std::env::current_dir().context("Failed to get current directory")?.join(&name)
    };

    if project_dir.exists() {
        return Err(anyhow::anyhow!("Directory '{}' already exists", project_dir.display()));
    }

    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("Failed to create directory {}", project_dir.display()))?;

    create_project_structure(&project_dir, &name)?;

    info!("Created memeasm project '{}' in {}", name, project_dir.display());
    info!("Run 'cd {}' and 'memeasm build' to get started!", project_dir.display());

    Ok(())
}

fn is_valid_project_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-')
}

fn create_project_structure(project_dir: &PathBuf, name: &str) -> Result<()> {
    let src_dir = project_dir.join("src");
    std::fs::create_dir_all(&src_dir)?;

    let manifest = format!(
        r#"[project]
name = "{}"
version = "0.1.0"
main = "src/main.meme"

[build]
optimize = "None"
debug_info = false
"#,
        name
    );

    std::fs::write(project_dir.join("memeasm.toml"), manifest)?;
    std::fs::write(src_dir.join("main.meme"), main_content())?;

    let gitignore_content = "# memeasm build artifacts\n/target/\n\n# OS files\n.DS_Store\nThumbs.db\n";
    std::fs::write(project_dir.join(".gitignore"), gitignore_content)?;

    let readme_content = format!(
        r#"# {}

A memeasm project.

## Building

```bash
memeasm build
```

## Running

```bash
memeasm run
```
"#,
        name
    );
    std::fs::write(project_dir.join("README.md"), readme_content)?;

    Ok(())
}

fn main_content() -> &'static str {
    r#"Trust me, I'm an engineer main
Stonks
"#
}
