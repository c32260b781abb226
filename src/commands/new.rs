//! Create a new project skeleton

use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;

use sprout::confirm::{AssumeYes, Confirm, StdinConfirm, Summary};
use sprout::process::SystemRunner;
use sprout::scaffold::{self, path, templates::TemplateSource, PathState};
use sprout::{BuildSystemKind, NewProject, Pipeline, ProjectSpec, Settings};

pub struct NewOptions {
    pub name: String,
    pub directory: Option<PathBuf>,
    pub description: String,
    pub no_git: bool,
    pub force: bool,
    pub build_system: Option<BuildSystemKind>,
    pub yes: bool,
    pub dry_run: bool,
    pub templates: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Execute the new command
///
/// # Process
///
/// 1. **Validate**: the name is checked before anything else happens
/// 2. **Inspect**: the target must not exist, unless `--force` and it is a directory
/// 3. **Confirm**: summary plus Y/n prompt, unless `--yes` or stdin is not a terminal
/// 4. **Scaffold**: source tree, static files, README, build system stages, git
///
/// # Errors
///
/// Returns an error if:
/// - The name has characters outside `[A-Za-z0-9_-]`
/// - The target exists (without `--force`) or is not a directory
/// - A required tool is missing, a template is missing, or a tool exits non-zero
/// - The user declines the prompt
pub fn execute(opts: NewOptions) -> Result<()> {
    let settings = Settings::load(opts.config.as_deref())?;

    let spec = ProjectSpec::new(NewProject {
        name: opts.name,
        root: opts.directory,
        description: opts.description,
        force: opts.force,
        skip_version_control: opts.no_git,
        build_system: opts.build_system.unwrap_or(settings.project.build_system),
    })?;

    let templates = TemplateSource::resolve(
        opts.templates.as_deref(),
        settings.templates.dir.as_deref(),
    );
    tracing::debug!(source = %templates, "using templates");

    if opts.dry_run {
        return print_plan(&spec, &templates);
    }

    let interactive = !opts.yes && atty::is(atty::Stream::Stdin);
    let confirm: &dyn Confirm = if interactive {
        &StdinConfirm
    } else {
        tracing::info!("non-interactive, skipping confirmation");
        &AssumeYes
    };

    println!("🌱 Scaffolding {}...", spec.name().bold());
    let pipeline = Pipeline::new(&settings, templates, &SystemRunner, confirm);
    let report = pipeline.run(&spec)?;

    println!(
        "\n✨ Created {} in {} ({} stages)",
        spec.name().bold(),
        report.root.display(),
        report.stages.len()
    );
    print_next_steps(&spec, &settings);
    Ok(())
}

fn print_plan(spec: &ProjectSpec, templates: &TemplateSource) -> Result<()> {
    let state = path::inspect(spec.root(), spec.force())?;
    let stages = scaffold::plan(spec);

    println!("{}", Summary::new(spec, state == PathState::Existing));
    println!("  Templates:    {templates}");
    println!("\nStages:");
    for (i, stage) in stages.iter().enumerate() {
        println!("  {}. {}", i + 1, stage.name());
    }

    let missing = templates.missing(&scaffold::required_templates(&stages));
    if !missing.is_empty() {
        println!("\n{} missing templates: {}", "⚠️".yellow(), missing.join(", "));
    }
    println!("\n(dry run, nothing written)");
    Ok(())
}

fn print_next_steps(spec: &ProjectSpec, settings: &Settings) {
    println!("\nNext steps:");
    println!("  cd {}", spec.root().display());
    match spec.build_system() {
        BuildSystemKind::Setuptools => {
            let activate = if cfg!(windows) {
                format!("{}\\Scripts\\activate", settings.setuptools.venv_dir)
            } else {
                format!("source {}/bin/activate", settings.setuptools.venv_dir)
            };
            println!("  {activate}");
        }
        BuildSystemKind::Poetry => println!("  poetry run pytest"),
    }
}
