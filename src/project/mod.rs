//! Project description - the immutable input to every scaffolding stage
//!
//! A [`ProjectSpec`] is built once per run from validated input. Stages read
//! it; none of them mutate it.
//!
//! # Example
//!
//! ```
//! use sprout::project::{BuildSystemKind, NewProject, ProjectSpec};
//!
//! let spec = ProjectSpec::new(NewProject {
//!     name: "demo-app".to_string(),
//!     root: Some("/tmp/demo-app".into()),
//!     description: "hello".to_string(),
//!     build_system: BuildSystemKind::Poetry,
//!     ..Default::default()
//! })?;
//! assert_eq!(spec.normalized_name(), "demo_app");
//! # Ok::<(), sprout::ScaffoldError>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScaffoldError};

/// Dependency-management convention the generated project follows
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystemKind {
    /// Tool-generated manifest, lock and sync
    Poetry,
    /// Rendered manifest, local virtual environment, editable install
    #[default]
    Setuptools,
}

impl fmt::Display for BuildSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poetry => f.write_str("poetry"),
            Self::Setuptools => f.write_str("setuptools"),
        }
    }
}

/// Raw, unvalidated request for a new project
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    /// Target directory; `<cwd>/<name>` when absent
    pub root: Option<PathBuf>,
    pub description: String,
    pub force: bool,
    pub skip_version_control: bool,
    pub build_system: BuildSystemKind,
}

/// Validated project description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    name: String,
    normalized_name: String,
    root: PathBuf,
    description: String,
    force: bool,
    skip_version_control: bool,
    build_system: BuildSystemKind,
}

impl ProjectSpec {
    /// Validate the request and freeze it.
    ///
    /// The name is checked here and never again. A relative root is
    /// anchored at the current directory.
    pub fn new(request: NewProject) -> Result<Self> {
        validate_name(&request.name)?;

        let root = match request.root {
            Some(root) => absolutize(&root)?,
            None => absolutize(Path::new(&request.name))?,
        };

        Ok(Self {
            normalized_name: normalize_name(&request.name),
            name: request.name,
            root,
            description: request.description,
            force: request.force,
            skip_version_control: request.skip_version_control,
            build_system: request.build_system,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Importable package name (`-` replaced by `_`)
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn skip_version_control(&self) -> bool {
        self.skip_version_control
    }

    pub fn build_system(&self) -> BuildSystemKind {
        self.build_system
    }
}

/// Check a project name against the allowed character set.
///
/// Valid iff non-empty and made only of ASCII letters, digits, `-` and `_`.
pub fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidName {
            name: name.to_string(),
        })
    }
}

/// Package directory name for a project name
pub fn normalize_name(name: &str) -> String {
    name.replace('-', "_")
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(ScaffoldError::io("read current directory", "."))?;
    Ok(cwd.join(path))
}
