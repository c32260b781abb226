//! Scaffolding pipeline
//!
//! Order of a run:
//!
//! 1. **Inspect** the target root (no writes)
//! 2. **Plan** the ordered stage list
//! 3. **Preflight**: every template the plan reads must exist and every
//!    tool it runs must be on PATH
//! 4. **Confirm** with the user (skipped in non-interactive mode)
//! 5. **Resolve** the root, creating it if missing
//! 6. **Execute** stages in order, stopping at the first failure
//!
//! The stage list is plain data built by [`plan`]:
//!
//! ```text
//! source-tree → static-files → readme → <build system stages> → git-init
//! ```
//!
//! A failed stage leaves earlier output on disk. Re-running with force is
//! the recovery path.

pub mod layout;
pub mod path;
pub mod stages;
pub mod templates;

use std::collections::BTreeSet;
use std::path::PathBuf;

use colored::Colorize;

pub use self::path::PathState;
pub use self::stages::{Stage, StageContext};
use self::stages::{CopyStaticFiles, CreateSourceTree, WriteReadme};
use self::templates::{TemplateSource, COMMON_STATIC_FILES};

use crate::build_system::get_build_system;
use crate::config::Settings;
use crate::confirm::{Confirm, Summary};
use crate::environment::Tool;
use crate::error::{Result, ScaffoldError};
use crate::git::InitRepository;
use crate::process::CommandRunner;
use crate::project::{BuildSystemKind, ProjectSpec};

/// Build the ordered stage list for a project.
pub fn plan(spec: &ProjectSpec) -> Vec<Box<dyn Stage>> {
    plan_for(spec.build_system(), !spec.skip_version_control())
}

/// Stage list for a build system, with or without version control.
pub fn plan_for(kind: BuildSystemKind, version_control: bool) -> Vec<Box<dyn Stage>> {
    let strategy = get_build_system(kind);

    let mut static_files = COMMON_STATIC_FILES.to_vec();
    static_files.extend_from_slice(strategy.static_files());

    let mut stages: Vec<Box<dyn Stage>> = vec![
        Box::new(CreateSourceTree),
        Box::new(CopyStaticFiles::new(static_files)),
        Box::new(WriteReadme),
    ];
    stages.extend(strategy.stages());

    if version_control {
        stages.push(Box::new(InitRepository));
    }
    tracing::debug!(
        build_system = %strategy.kind(),
        stages = stages.len(),
        "planned stages"
    );
    stages
}

/// Tools the plan needs, deduplicated and in a stable order
pub fn required_tools(stages: &[Box<dyn Stage>]) -> Vec<Tool> {
    stages
        .iter()
        .filter_map(|s| s.requires())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Template files the plan reads
pub fn required_templates(stages: &[Box<dyn Stage>]) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for name in stages.iter().flat_map(|s| s.templates()) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// What a completed run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub root: PathBuf,
    pub reused_existing: bool,
    /// Stage names, in the order they ran
    pub stages: Vec<&'static str>,
}

/// Runs the stage list for one project
pub struct Pipeline<'a> {
    settings: &'a Settings,
    templates: TemplateSource,
    runner: &'a dyn CommandRunner,
    confirm: &'a dyn Confirm,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        settings: &'a Settings,
        templates: TemplateSource,
        runner: &'a dyn CommandRunner,
        confirm: &'a dyn Confirm,
    ) -> Self {
        Self {
            settings,
            templates,
            runner,
            confirm,
        }
    }

    /// Check that every template and tool the stages need can be found.
    pub fn preflight(&self, stages: &[Box<dyn Stage>]) -> Result<()> {
        let missing = self.templates.missing(&required_templates(stages));
        if !missing.is_empty() {
            return Err(ScaffoldError::MissingTemplates {
                location: self.templates.to_string(),
                names: missing.into_iter().map(String::from).collect(),
            });
        }

        for tool in required_tools(stages) {
            let program = tool.program(&self.settings.tools);
            match self.runner.locate(program) {
                Some(found) => {
                    tracing::debug!(tool = tool.label(), path = %found.display(), "tool found");
                }
                None => {
                    return Err(ScaffoldError::ToolNotFound {
                        tool: tool.label().to_string(),
                        program: program.to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Scaffold the project, stopping at the first failure.
    pub fn run(&self, spec: &ProjectSpec) -> Result<Report> {
        let state = path::inspect(spec.root(), spec.force())?;
        let stages = plan(spec);
        self.preflight(&stages)?;

        let summary = Summary::new(spec, state == PathState::Existing);
        if !self.confirm.confirm(&summary)? {
            return Err(ScaffoldError::Cancelled);
        }

        let state = path::resolve(spec.root(), spec.force())?;

        let ctx = StageContext {
            spec,
            settings: self.settings,
            templates: &self.templates,
            runner: self.runner,
        };

        let mut executed = Vec::with_capacity(stages.len());
        for stage in &stages {
            tracing::info!(stage = stage.name(), "running stage");
            stage.run(&ctx).inspect_err(|e| {
                tracing::error!(stage = stage.name(), error = %e, "stage failed");
            })?;
            println!("  {} {}", "✓".green(), stage.describe(spec));
            executed.push(stage.name());
        }

        Ok(Report {
            root: spec.root().to_path_buf(),
            reused_existing: state == PathState::Existing,
            stages: executed,
        })
    }
}
