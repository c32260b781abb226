//! Error types for scaffolding runs.
//!
//! Every failure a run can hit maps onto one variant here. Nothing is
//! swallowed: a stage either completes or surfaces one of these and the
//! pipeline stops.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The error type for all scaffolding operations.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// Project name contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid project name '{name}': use only ASCII letters, digits, '-' and '_'")]
    InvalidName { name: String },

    /// Target directory exists and force mode is off.
    #[error("{} already exists (pass --force to reuse it)", .path.display())]
    PathConflict { path: PathBuf },

    /// Target path exists but is a file or other non-directory.
    #[error("{} exists and is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    /// Filesystem operation failed.
    #[error("failed to {action} {}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// External tool ran but exited unsuccessfully.
    #[error("{tool} failed: {}", describe_exit(.code))]
    ExternalTool { tool: String, code: Option<i32> },

    /// External tool could not be started at all.
    #[error("failed to launch {tool} ('{program}')")]
    ToolLaunch {
        tool: String,
        program: String,
        #[source]
        source: io::Error,
    },

    /// Required external tool is not on PATH.
    #[error("{tool} not found on PATH (looked for '{program}')")]
    ToolNotFound { tool: String, program: String },

    /// Template source lacks files the plan reads.
    #[error("templates missing from {location}: {}", .names.join(", "))]
    MissingTemplates { location: String, names: Vec<String> },

    /// Config file is missing or malformed.
    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    /// User declined the confirmation prompt.
    #[error("scaffolding cancelled, nothing was written")]
    Cancelled,
}

impl ScaffoldError {
    /// Build a mapper from `io::Error` that records what was attempted and where.
    ///
    /// ```
    /// use sprout::ScaffoldError;
    /// use std::fs;
    ///
    /// let path = std::path::Path::new("/definitely/not/here");
    /// let err = fs::read(path).map_err(ScaffoldError::io("read", path)).unwrap_err();
    /// assert!(err.to_string().contains("/definitely/not/here"));
    /// ```
    pub fn io(action: &'static str, path: impl AsRef<Path>) -> impl FnOnce(io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| Self::Io {
            action,
            path,
            source,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ScaffoldError>;
