use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use sprout::environment::{Environment, Tool};
use sprout::scaffold::{self, templates::TemplateSource};
use sprout::{BuildSystemKind, Settings};

#[derive(Serialize)]
struct HealthCheck {
    status: String, // "healthy", "warning", "critical"
    environment: Environment,
    templates_dir: String,
    missing_templates: Vec<MissingTemplates>,
    recommendations: Vec<String>,
}

#[derive(Serialize)]
struct MissingTemplates {
    build_system: BuildSystemKind,
    files: Vec<String>,
}

/// Check that new projects can be created. Returns the process exit code.
pub fn execute(json_output: bool, config: Option<&Path>, templates: Option<&Path>) -> Result<i32> {
    let settings = Settings::load(config)?;
    let templates = TemplateSource::resolve(
        templates,
        settings.templates.dir.as_deref(),
    );
    let environment = Environment::detect(&settings.tools);

    let missing_templates: Vec<MissingTemplates> = [BuildSystemKind::Setuptools, BuildSystemKind::Poetry]
        .into_iter()
        .map(|kind| {
            let wanted = scaffold::required_templates(&scaffold::plan_for(kind, true));
            MissingTemplates {
                build_system: kind,
                files: templates.missing(&wanted).into_iter().map(String::from).collect(),
            }
        })
        .filter(|m| !m.files.is_empty())
        .collect();

    let mut recommendations = Vec::new();
    let mut critical = !missing_templates.is_empty();
    if critical {
        recommendations.push(format!("Restore the missing files in {templates}"));
    }
    if !environment.is_available(Tool::Python) {
        critical = true;
        recommendations.push(format!(
            "Install Python or set [tools].python (looked for '{}')",
            settings.tools.python
        ));
    }
    if !environment.is_available(Tool::Git) {
        recommendations.push("Install git or scaffold with --no-git".to_string());
    }
    if !environment.is_available(Tool::Poetry) {
        recommendations.push("Install poetry to use --build-system poetry".to_string());
    }

    let status = if critical {
        "critical"
    } else if recommendations.is_empty() {
        "healthy"
    } else {
        "warning"
    };

    let check = HealthCheck {
        status: status.to_string(),
        environment,
        templates_dir: templates.to_string(),
        missing_templates,
        recommendations,
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&check)?);
    } else {
        print_human(&check);
    }

    Ok(if critical { 1 } else { 0 })
}

fn print_human(check: &HealthCheck) {
    println!("🏥 Checking sprout environment...\n");

    println!("Tools:");
    for (name, info) in &check.environment.tools {
        if info.available {
            let version = info.version.as_deref().unwrap_or("unknown version");
            println!("  {} {name}: {version}", "✓".green());
        } else {
            println!("  {} {name}: not found ('{}')", "✗".red(), info.program);
        }
    }

    println!("\nTemplates: {}", check.templates_dir);
    if check.missing_templates.is_empty() {
        println!("  {} complete", "✓".green());
    }
    for missing in &check.missing_templates {
        println!(
            "  {} {}: missing {}",
            "✗".red(),
            missing.build_system,
            missing.files.join(", ")
        );
    }

    if !check.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &check.recommendations {
            println!("  • {rec}");
        }
    }

    let status = match check.status.as_str() {
        "healthy" => check.status.green(),
        "warning" => check.status.yellow(),
        _ => check.status.red(),
    };
    println!("\nStatus: {status}");
}
