//! Target directory checks - the only idempotency gate

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, ScaffoldError};

/// What was found at the target root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// Nothing there yet; it will be created
    Missing,
    /// An existing directory, reused under force mode
    Existing,
}

/// Decide whether the root is usable, without touching the filesystem.
///
/// A non-directory is always fatal. An existing directory is only accepted
/// in force mode.
pub fn inspect(root: &Path, force: bool) -> Result<PathState> {
    match fs::metadata(root) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(PathState::Missing),
        Err(e) => Err(ScaffoldError::io("inspect", root)(e)),
        Ok(meta) if !meta.is_dir() => Err(ScaffoldError::NotADirectory {
            path: root.to_path_buf(),
        }),
        Ok(_) if force => Ok(PathState::Existing),
        Ok(_) => Err(ScaffoldError::PathConflict {
            path: root.to_path_buf(),
        }),
    }
}

/// Inspect the root and create it (with parents) when missing.
pub fn resolve(root: &Path, force: bool) -> Result<PathState> {
    let state = inspect(root, force)?;
    match state {
        PathState::Missing => {
            fs::create_dir_all(root).map_err(ScaffoldError::io("create directory", root))?;
            tracing::info!(root = %root.display(), "created project directory");
        }
        PathState::Existing => {
            tracing::warn!(root = %root.display(), "reusing existing directory (force)");
        }
    }
    Ok(state)
}
