//! Single source of truth for where sprout keeps its own files.
//!
//! No I/O beyond existence checks, no validation. One file shows the layout.
//!
//! ```text
//! ~/.sprout/
//! ├── config.toml              # User settings (optional)
//! └── templates/               # User template override (optional)
//! ```
//!
//! Bundled templates are compiled in and have no path.

use std::path::{Path, PathBuf};

/// Manifest file every variant ends up with
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Readme written at the project root
pub const README_FILE: &str = "README.md";

/// Package marker inside the source package
pub const PACKAGE_MARKER: &str = "__init__.py";

/// User's sprout home directory: `~/.sprout/`
pub fn sprout_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sprout")
}

/// User config file: `~/.sprout/config.toml`
pub fn config_path() -> PathBuf {
    sprout_home().join("config.toml")
}

/// User template override: `~/.sprout/templates/`
pub fn user_templates_dir() -> PathBuf {
    sprout_home().join("templates")
}

/// Pick a templates directory, if any overrides the bundled set.
///
/// Priority: explicit (flag or env), configured, user override if present.
pub fn resolve_templates_dir(explicit: Option<&Path>, configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit.or(configured) {
        return Some(dir.to_path_buf());
    }
    let user = user_templates_dir();
    user.is_dir().then_some(user)
}

/// Source package directory: `<root>/src/<package>/`
pub fn package_dir(root: &Path, package: &str) -> PathBuf {
    root.join("src").join(package)
}

/// Interpreter inside a virtual environment
pub fn venv_python(venv: &Path) -> PathBuf {
    if cfg!(windows) {
        venv.join("Scripts").join("python.exe")
    } else {
        venv.join("bin").join("python")
    }
}
