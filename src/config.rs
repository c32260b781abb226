//! User settings loaded from `~/.sprout/config.toml`
//!
//! Every section is optional and defaults independently, so a config file
//! only needs the keys it wants to change:
//!
//! ```toml
//! [project]
//! author = "Ada Lovelace <ada@example.com>"
//! build_system = "poetry"
//!
//! [tools]
//! python = "python3.12"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScaffoldError};
use crate::paths;
use crate::project::BuildSystemKind;

/// All user-tunable settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub project: ProjectDefaults,
    #[serde(default)]
    pub templates: TemplatesSection,
    #[serde(default)]
    pub tools: ToolsSection,
    #[serde(default)]
    pub poetry: PoetrySection,
    #[serde(default)]
    pub setuptools: SetuptoolsSection,
}

/// Metadata defaults stamped into new projects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDefaults {
    /// Author passed to the dependency manager; omitted when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Python version constraint
    #[serde(default = "default_python")]
    pub python: String,
    #[serde(default = "default_license")]
    pub license: String,
    /// Initial package version
    #[serde(default = "default_version")]
    pub version: String,
    /// Write `src/__init__.py` carrying `__version__`
    #[serde(default = "default_true")]
    pub version_marker: bool,
    #[serde(default)]
    pub build_system: BuildSystemKind,
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            author: None,
            python: default_python(),
            license: default_license(),
            version: default_version(),
            version_marker: true,
            build_system: BuildSystemKind::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplatesSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Program names for the external tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsSection {
    #[serde(default = "default_git")]
    pub git: String,
    #[serde(default = "default_python_program")]
    pub python: String,
    #[serde(default = "default_poetry")]
    pub poetry: String,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            git: default_git(),
            python: default_python_program(),
            poetry: default_poetry(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoetrySection {
    #[serde(default = "default_dev_dependencies")]
    pub dev_dependencies: Vec<String>,
}

impl Default for PoetrySection {
    fn default() -> Self {
        Self {
            dev_dependencies: default_dev_dependencies(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetuptoolsSection {
    /// Virtual environment directory, relative to the project root
    #[serde(default = "default_venv_dir")]
    pub venv_dir: String,
    /// Extras installed alongside the editable package
    #[serde(default = "default_extras")]
    pub extras: String,
}

impl Default for SetuptoolsSection {
    fn default() -> Self {
        Self {
            venv_dir: default_venv_dir(),
            extras: default_extras(),
        }
    }
}

fn default_python() -> String {
    "^3.10".to_string()
}
fn default_license() -> String {
    "MIT".to_string()
}
fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_true() -> bool {
    true
}
fn default_git() -> String {
    "git".to_string()
}
fn default_python_program() -> String {
    "python3".to_string()
}
fn default_poetry() -> String {
    "poetry".to_string()
}
fn default_dev_dependencies() -> Vec<String> {
    ["pytest", "black", "flake8", "mypy"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_venv_dir() -> String {
    ".venv".to_string()
}
fn default_extras() -> String {
    "dev".to_string()
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit path must exist. Without one, `~/.sprout/config.toml` is
    /// read if present and defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = paths::config_path();
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    tracing::debug!(path = %path.display(), "no user config, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ScaffoldError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ScaffoldError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
