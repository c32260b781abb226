use std::fs;

use super::BuildSystem;
use crate::environment::Tool;
use crate::error::{Result, ScaffoldError};
use crate::paths;
use crate::process::Invocation;
use crate::project::{BuildSystemKind, ProjectSpec};
use crate::scaffold::templates::{self, BASE_MANIFEST};
use crate::scaffold::{Stage, StageContext};

/// Poetry writes the manifest itself; we extend it and let Poetry sync
pub struct PoetryStrategy;

impl BuildSystem for PoetryStrategy {
    fn kind(&self) -> BuildSystemKind {
        BuildSystemKind::Poetry
    }

    fn static_files(&self) -> &'static [&'static str] {
        &["poetry.toml"]
    }

    fn stages(&self) -> Vec<Box<dyn Stage>> {
        vec![
            Box::new(PoetryInit),
            Box::new(AppendBaseManifest),
            Box::new(PoetrySync),
        ]
    }
}

/// Build the non-interactive `poetry init` call for a project
pub fn init_invocation(ctx: &StageContext<'_>) -> Invocation {
    let spec = ctx.spec;
    let project = &ctx.settings.project;

    let mut inv = Invocation::new("poetry", Tool::Poetry.program(&ctx.settings.tools), spec.root())
        .args(["init", "--no-interaction"])
        .args(["--name", spec.name()])
        .args(["--description", spec.description()])
        .args(["--python", project.python.as_str()])
        .args(["--license", project.license.as_str()]);

    if let Some(author) = &project.author {
        inv = inv.args(["--author", author.as_str()]);
    }
    for dep in &ctx.settings.poetry.dev_dependencies {
        inv = inv.args(["--dev-dependency", dep.as_str()]);
    }
    inv
}

pub struct PoetryInit;

impl Stage for PoetryInit {
    fn name(&self) -> &'static str {
        "poetry-init"
    }

    fn describe(&self, _spec: &ProjectSpec) -> String {
        "Generated pyproject.toml with poetry init".to_string()
    }

    fn requires(&self) -> Option<Tool> {
        Some(Tool::Poetry)
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()> {
        // poetry init refuses to overwrite a manifest
        let manifest = ctx.spec.root().join(paths::MANIFEST_FILE);
        if ctx.spec.force() && manifest.exists() {
            tracing::warn!(path = %manifest.display(), "removing existing manifest before poetry init");
            fs::remove_file(&manifest).map_err(ScaffoldError::io("remove", &manifest))?;
        }
        ctx.runner.run(&init_invocation(ctx))
    }
}

pub struct AppendBaseManifest;

impl Stage for AppendBaseManifest {
    fn name(&self) -> &'static str {
        "manifest-append"
    }

    fn describe(&self, _spec: &ProjectSpec) -> String {
        format!("Extended pyproject.toml with {BASE_MANIFEST}")
    }

    fn templates(&self) -> Vec<&'static str> {
        vec![BASE_MANIFEST]
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()> {
        templates::append_base_manifest(ctx.templates, ctx.spec.root())
    }
}

pub struct PoetrySync;

impl Stage for PoetrySync {
    fn name(&self) -> &'static str {
        "poetry-sync"
    }

    fn describe(&self, _spec: &ProjectSpec) -> String {
        "Installed dependencies with poetry sync".to_string()
    }

    fn requires(&self) -> Option<Tool> {
        Some(Tool::Poetry)
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()> {
        let inv = Invocation::new(
            "poetry",
            Tool::Poetry.program(&ctx.settings.tools),
            ctx.spec.root(),
        )
        .arg("sync");
        ctx.runner.run(&inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::process::testing::RecordingRunner;
    use crate::project::NewProject;
    use crate::scaffold::templates::TemplateSource;
    use tempfile::TempDir;

    fn spec_in(temp: &TempDir, force: bool) -> ProjectSpec {
        ProjectSpec::new(NewProject {
            name: "demo-app".to_string(),
            root: Some(temp.path().to_path_buf()),
            description: "A demo".to_string(),
            force,
            build_system: BuildSystemKind::Poetry,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_init_invocation_is_non_interactive_with_metadata() {
        let temp = TempDir::new().unwrap();
        let spec = spec_in(&temp, false);
        let mut settings = Settings::default();
        settings.project.author = Some("Ada <ada@example.com>".to_string());
        settings.poetry.dev_dependencies = vec!["pytest".to_string()];
        let templates = TemplateSource::Bundled;
        let runner = RecordingRunner::new();
        let ctx = StageContext {
            spec: &spec,
            settings: &settings,
            templates: &templates,
            runner: &runner,
        };

        let inv = init_invocation(&ctx);
        assert_eq!(inv.cwd, temp.path());
        assert_eq!(
            inv.args,
            [
                "init",
                "--no-interaction",
                "--name",
                "demo-app",
                "--description",
                "A demo",
                "--python",
                "^3.10",
                "--license",
                "MIT",
                "--author",
                "Ada <ada@example.com>",
                "--dev-dependency",
                "pytest",
            ]
        );
    }

    #[test]
    fn test_stages_extend_generated_manifest_then_sync() {
        let temp = TempDir::new().unwrap();
        let spec = spec_in(&temp, false);
        let settings = Settings::default();
        let templates = TemplateSource::Bundled;
        let runner = RecordingRunner::with(|inv| {
            if inv.args.first().map(String::as_str) == Some("init") {
                fs::write(
                    inv.cwd.join("pyproject.toml"),
                    "[project]\nname = \"demo-app\"\n",
                )
                .unwrap();
            }
            Ok(())
        });
        let ctx = StageContext {
            spec: &spec,
            settings: &settings,
            templates: &templates,
            runner: &runner,
        };

        for stage in PoetryStrategy.stages() {
            stage.run(&ctx).unwrap();
        }

        let manifest = fs::read_to_string(temp.path().join("pyproject.toml")).unwrap();
        assert!(manifest.starts_with("[project]\nname = \"demo-app\"\n"));
        assert!(manifest.contains("[tool.black]"));

        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].args, ["sync"]);
        assert!(calls.iter().all(|c| c.cwd == temp.path()));
    }

    #[test]
    fn test_force_removes_stale_manifest_before_init() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("pyproject.toml"), "stale").unwrap();
        let spec = spec_in(&temp, true);
        let settings = Settings::default();
        let templates = TemplateSource::Bundled;
        let runner = RecordingRunner::with(|inv| {
            assert!(!inv.cwd.join("pyproject.toml").exists());
            Ok(())
        });
        let ctx = StageContext {
            spec: &spec,
            settings: &settings,
            templates: &templates,
            runner: &runner,
        };

        PoetryInit.run(&ctx).unwrap();
        assert_eq!(runner.calls().len(), 1);
    }

    #[test]
    fn test_sync_failure_surfaces_exit_code() {
        let temp = TempDir::new().unwrap();
        let spec = spec_in(&temp, false);
        let settings = Settings::default();
        let templates = TemplateSource::Bundled;
        let runner = RecordingRunner::with(|inv| {
            Err(ScaffoldError::ExternalTool {
                tool: inv.tool.clone(),
                code: Some(1),
            })
        });
        let ctx = StageContext {
            spec: &spec,
            settings: &settings,
            templates: &templates,
            runner: &runner,
        };

        let err = PoetrySync.run(&ctx).unwrap_err();
        assert_eq!(err.to_string(), "poetry failed: exit status 1");
    }
}
