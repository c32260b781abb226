//! Source package layout: `src/<package>/__init__.py`

use std::fs::{self, File};
use std::path::PathBuf;

use crate::error::{Result, ScaffoldError};
use crate::paths;
use crate::project::ProjectSpec;

/// Create the package directory and its marker file.
///
/// Existing directories are fine. The marker is always truncated. When
/// `version` is given, `src/__init__.py` is written with `__version__`.
/// Returns the package directory.
pub fn create_source_tree(spec: &ProjectSpec, version: Option<&str>) -> Result<PathBuf> {
    let package = paths::package_dir(spec.root(), spec.normalized_name());
    fs::create_dir_all(&package).map_err(ScaffoldError::io("create directory", &package))?;

    let marker = package.join(paths::PACKAGE_MARKER);
    File::create(&marker).map_err(ScaffoldError::io("create", &marker))?;

    if let Some(version) = version {
        let top = spec.root().join("src").join(paths::PACKAGE_MARKER);
        fs::write(&top, format!("__version__ = \"{version}\"\n"))
            .map_err(ScaffoldError::io("write", &top))?;
    }

    Ok(package)
}
