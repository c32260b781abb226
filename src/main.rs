use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sprout::BuildSystemKind;

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Bootstrap a ready-to-develop Python project", long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: ~/.sprout/config.toml)
    #[arg(long, global = true, env = "SPROUT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project
    New {
        /// Project name (letters, digits, '-' and '_')
        name: String,

        /// Target directory (default: ./<NAME>)
        directory: Option<PathBuf>,

        /// One-line project description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Skip git init
        #[arg(long)]
        no_git: bool,

        /// Reuse the target directory if it already exists
        #[arg(long)]
        force: bool,

        /// Build system convention (default from config, else setuptools)
        #[arg(short, long, value_enum)]
        build_system: Option<BuildSystemKind>,

        /// Don't ask for confirmation
        #[arg(short, long, env = "SPROUT_NONINTERACTIVE")]
        yes: bool,

        /// Show what would be done, then exit
        #[arg(long)]
        dry_run: bool,

        /// Templates directory
        #[arg(long, env = "SPROUT_TEMPLATES")]
        templates: Option<PathBuf>,
    },

    /// Check external tools and templates
    Doctor {
        /// Output results as JSON
        #[arg(short, long)]
        json: bool,

        /// Templates directory
        #[arg(long, env = "SPROUT_TEMPLATES")]
        templates: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::New {
            name,
            directory,
            description,
            no_git,
            force,
            build_system,
            yes,
            dry_run,
            templates,
        } => {
            commands::new::execute(commands::new::NewOptions {
                name,
                directory,
                description,
                no_git,
                force,
                build_system,
                yes,
                dry_run,
                templates,
                config: cli.config,
            })?;
        }
        Commands::Doctor { json, templates } => {
            let exit_code =
                commands::doctor::execute(json, cli.config.as_deref(), templates.as_deref())?;
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
