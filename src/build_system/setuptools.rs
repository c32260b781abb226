use std::fs;
use std::path::PathBuf;

use super::BuildSystem;
use crate::environment::Tool;
use crate::error::{Result, ScaffoldError};
use crate::paths;
use crate::process::Invocation;
use crate::project::{BuildSystemKind, ProjectSpec};
use crate::scaffold::templates::{self, BASE_MANIFEST, SETUPTOOLS_MANIFEST};
use crate::scaffold::{Stage, StageContext};

/// Rendered manifest, local virtual environment, editable install
pub struct SetuptoolsStrategy;

impl BuildSystem for SetuptoolsStrategy {
    fn kind(&self) -> BuildSystemKind {
        BuildSystemKind::Setuptools
    }

    fn stages(&self) -> Vec<Box<dyn Stage>> {
        vec![
            Box::new(RenderManifest),
            Box::new(CreateVenv),
            Box::new(EditableInstall),
        ]
    }
}

fn venv_dir(ctx: &StageContext<'_>) -> PathBuf {
    ctx.spec.root().join(&ctx.settings.setuptools.venv_dir)
}

pub struct RenderManifest;

impl Stage for RenderManifest {
    fn name(&self) -> &'static str {
        "manifest-render"
    }

    fn describe(&self, _spec: &ProjectSpec) -> String {
        "Rendered pyproject.toml".to_string()
    }

    fn templates(&self) -> Vec<&'static str> {
        vec![SETUPTOOLS_MANIFEST, BASE_MANIFEST]
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()> {
        let rendered = templates::render_manifest(ctx.templates, SETUPTOOLS_MANIFEST, ctx.spec)?;
        let base = ctx.templates.read(BASE_MANIFEST)?;

        let manifest = ctx.spec.root().join(paths::MANIFEST_FILE);
        fs::write(&manifest, templates::append_remaining(&rendered, &base))
            .map_err(ScaffoldError::io("write", &manifest))
    }
}

pub struct CreateVenv;

impl Stage for CreateVenv {
    fn name(&self) -> &'static str {
        "venv"
    }

    fn describe(&self, _spec: &ProjectSpec) -> String {
        "Created virtual environment".to_string()
    }

    fn requires(&self) -> Option<Tool> {
        Some(Tool::Python)
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()> {
        let inv = Invocation::new(
            "venv",
            Tool::Python.program(&ctx.settings.tools),
            ctx.spec.root(),
        )
        .args(["-m", "venv"])
        .arg(ctx.settings.setuptools.venv_dir.as_str());
        ctx.runner.run(&inv)
    }
}

pub struct EditableInstall;

impl Stage for EditableInstall {
    fn name(&self) -> &'static str {
        "editable-install"
    }

    fn describe(&self, _spec: &ProjectSpec) -> String {
        "Installed project in editable mode".to_string()
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()> {
        let python = paths::venv_python(&venv_dir(ctx));
        let extras = &ctx.settings.setuptools.extras;
        let target = if extras.is_empty() {
            ".".to_string()
        } else {
            format!(".[{extras}]")
        };

        let inv = Invocation::new("pip", python.display().to_string(), ctx.spec.root())
            .args(["-m", "pip", "install", "-e"])
            .arg(target);
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

    fn spec_in(temp: &TempDir) -> ProjectSpec {
        ProjectSpec::new(NewProject {
            name: "my-lib".to_string(),
            root: Some(temp.path().to_path_buf()),
            description: "A test".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_manifest_is_rendered_and_extended() {
        let temp = TempDir::new().unwrap();
        let spec = spec_in(&temp);
        let settings = Settings::default();
        let templates = TemplateSource::Bundled;
        let runner = RecordingRunner::new();
        let ctx = StageContext {
            spec: &spec,
            settings: &settings,
            templates: &templates,
            runner: &runner,
        };

        RenderManifest.run(&ctx).unwrap();

        let manifest = fs::read_to_string(temp.path().join("pyproject.toml")).unwrap();
        assert!(manifest.contains("name = \"my-lib\"\n"));
        assert!(manifest.contains("description = \"A test\"\n"));
        assert!(manifest.contains("[tool.black]"));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_venv_then_install_inside_it() {
        let temp = TempDir::new().unwrap();
        let spec = spec_in(&temp);
        let settings = Settings::default();
        let templates = TemplateSource::Bundled;
        let runner = RecordingRunner::new();
        let ctx = StageContext {
            spec: &spec,
            settings: &settings,
            templates: &templates,
            runner: &runner,
        };

        CreateVenv.run(&ctx).unwrap();
        EditableInstall.run(&ctx).unwrap();

        let calls = runner.calls();
        assert_eq!(calls[0].program, "python3");
        assert_eq!(calls[0].args, ["-m", "venv", ".venv"]);
        assert_eq!(
            PathBuf::from(&calls[1].program),
            paths::venv_python(&temp.path().join(".venv"))
        );
        assert_eq!(calls[1].args, ["-m", "pip", "install", "-e", ".[dev]"]);
        assert!(calls.iter().all(|c| c.cwd == temp.path()));
    }

    #[test]
    fn test_missing_template_aborts_render() {
        let temp = TempDir::new().unwrap();
        let empty = TempDir::new().unwrap();
        let spec = spec_in(&temp);
        let settings = Settings::default();
        let templates = TemplateSource::new(empty.path());
        let runner = RecordingRunner::new();
        let ctx = StageContext {
            spec: &spec,
            settings: &settings,
            templates: &templates,
            runner: &runner,
        };

        let err = RenderManifest.run(&ctx).unwrap_err();
        assert!(matches!(err, ScaffoldError::Io { .. }));
        assert!(!temp.path().join("pyproject.toml").exists());
    }
}
