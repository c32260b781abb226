//! Stage trait and the stages every build system shares

use crate::config::Settings;
use crate::environment::Tool;
use crate::error::Result;
use crate::process::CommandRunner;
use crate::project::ProjectSpec;

use super::layout;
use super::templates::{self, TemplateSource};

/// Everything a stage may read. Stages write only to disk or to tools.
pub struct StageContext<'a> {
    pub spec: &'a ProjectSpec,
    pub settings: &'a Settings,
    pub templates: &'a TemplateSource,
    pub runner: &'a dyn CommandRunner,
}

/// One ordered, side-effecting step
pub trait Stage {
    /// Stable identifier, used in plans and logs
    fn name(&self) -> &'static str;

    /// One line for the progress output
    fn describe(&self, spec: &ProjectSpec) -> String;

    /// External tool that must be on PATH before the run starts
    fn requires(&self) -> Option<Tool> {
        None
    }

    /// Template files this stage reads
    fn templates(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()>;
}

pub struct CreateSourceTree;

impl Stage for CreateSourceTree {
    fn name(&self) -> &'static str {
        "source-tree"
    }

    fn describe(&self, spec: &ProjectSpec) -> String {
        format!("Created source package src/{}", spec.normalized_name())
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()> {
        let project = &ctx.settings.project;
        let version = project.version_marker.then_some(project.version.as_str());
        layout::create_source_tree(ctx.spec, version)?;
        Ok(())
    }
}

pub struct CopyStaticFiles {
    files: Vec<&'static str>,
}

impl CopyStaticFiles {
    pub fn new(files: Vec<&'static str>) -> Self {
        Self { files }
    }
}

impl Stage for CopyStaticFiles {
    fn name(&self) -> &'static str {
        "static-files"
    }

    fn describe(&self, _spec: &ProjectSpec) -> String {
        format!("Copied {}", self.files.join(", "))
    }

    fn templates(&self) -> Vec<&'static str> {
        self.files.clone()
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()> {
        ctx.templates.copy_static_files(&self.files, ctx.spec.root())
    }
}

pub struct WriteReadme;

impl Stage for WriteReadme {
    fn name(&self) -> &'static str {
        "readme"
    }

    fn describe(&self, _spec: &ProjectSpec) -> String {
        "Wrote README.md".to_string()
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()> {
        templates::write_readme(ctx.spec)
    }
}
