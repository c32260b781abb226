//! External process invocation
//!
//! Every tool call names its working directory explicitly. Nothing here
//! touches the process-wide current directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, ScaffoldError};

/// One external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Human label used in errors ("git", "pip", ...)
    pub tool: String,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(tool: impl Into<String>, program: impl Into<String>, cwd: impl AsRef<Path>) -> Self {
        Self {
            tool: tool.into(),
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.as_ref().to_path_buf(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Runs external tools and reports their outcome
pub trait CommandRunner {
    /// Run to completion; non-zero exit is an error.
    fn run(&self, invocation: &Invocation) -> Result<()>;

    /// Locate a program without running it.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Runs real processes, inheriting stdio so tool output reaches the user
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<()> {
        tracing::debug!(
            tool = %invocation.tool,
            cwd = %invocation.cwd.display(),
            "running {invocation}"
        );

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .status()
            .map_err(|source| ScaffoldError::ToolLaunch {
                tool: invocation.tool.clone(),
                program: invocation.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ScaffoldError::ExternalTool {
                tool: invocation.tool.clone(),
                code: status.code(),
            })
        }
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}
