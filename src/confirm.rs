//! Confirmation before the first write
//!
//! The pipeline asks once, after validation and before any mutation.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;

use crate::error::{Result, ScaffoldError};
use crate::project::{BuildSystemKind, ProjectSpec};

/// What is about to happen, shown to the user before anything is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub root: PathBuf,
    pub name: String,
    pub package: String,
    pub build_system: BuildSystemKind,
    pub reuse_existing: bool,
    pub version_control: bool,
}

impl Summary {
    pub fn new(spec: &ProjectSpec, reuse_existing: bool) -> Self {
        Self {
            root: spec.root().to_path_buf(),
            name: spec.name().to_string(),
            package: spec.normalized_name().to_string(),
            build_system: spec.build_system(),
            reuse_existing,
            version_control: !spec.skip_version_control(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Project:      {}", self.name.bold())?;
        writeln!(f, "  Package:      src/{}", self.package)?;
        write!(f, "  Location:     {}", self.root.display())?;
        if self.reuse_existing {
            write!(f, " {}", "(existing, reused)".yellow())?;
        }
        writeln!(f)?;
        writeln!(f, "  Build system: {}", self.build_system)?;
        write!(
            f,
            "  Git:          {}",
            if self.version_control { "init" } else { "skipped" }
        )
    }
}

/// Source of the go/no-go decision
pub trait Confirm {
    fn confirm(&self, summary: &Summary) -> Result<bool>;
}

/// Non-interactive mode: always proceed
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _summary: &Summary) -> Result<bool> {
        Ok(true)
    }
}

/// Prompt on stdout, read the answer from stdin
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, summary: &Summary) -> Result<bool> {
        println!("{summary}");
        print!("Create this project? [Y/n]: ");
        io::stdout()
            .flush()
            .map_err(ScaffoldError::io("write prompt to", "stdout"))?;

        let mut input = String::new();
        io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(ScaffoldError::io("read answer from", "stdin"))?;

        Ok(is_yes(&input))
    }
}

/// Empty answer means yes
pub fn is_yes(answer: &str) -> bool {
    let trimmed = answer.trim().to_lowercase();
    trimmed.is_empty() || trimmed == "y" || trimmed == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::NewProject;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("\n"));
        assert!(is_yes("Y\n"));
        assert!(is_yes(" yes "));
        assert!(!is_yes("n\n"));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn test_summary_mentions_root_name_and_build_system() {
        colored::control::set_override(false);
        let spec = ProjectSpec::new(NewProject {
            name: "my-lib".to_string(),
            root: Some("/tmp/proj".into()),
            skip_version_control: true,
            ..Default::default()
        })
        .unwrap();

        let text = Summary::new(&spec, true).to_string();
        assert!(text.contains("my-lib"));
        assert!(text.contains("/tmp/proj (existing, reused)"));
        assert!(text.contains("setuptools"));
        assert!(text.contains("skipped"));
    }
}
