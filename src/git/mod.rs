//! Version control initialization
//!
//! Runs last so the repository starts out over a complete tree. Committing
//! is left to the user.

use std::path::Path;

use crate::environment::Tool;
use crate::error::Result;
use crate::process::{CommandRunner, Invocation};
use crate::project::ProjectSpec;
use crate::scaffold::{Stage, StageContext};

/// Run `git init` inside `root`
pub fn init_repo(runner: &dyn CommandRunner, program: &str, root: &Path) -> Result<()> {
    runner.run(&Invocation::new("git", program, root).arg("init"))
}

pub struct InitRepository;

impl Stage for InitRepository {
    fn name(&self) -> &'static str {
        "git-init"
    }

    fn describe(&self, _spec: &ProjectSpec) -> String {
        "Initialized git repository".to_string()
    }

    fn requires(&self) -> Option<Tool> {
        Some(Tool::Git)
    }

    fn run(&self, ctx: &StageContext<'_>) -> Result<()> {
        init_repo(
            ctx.runner,
            Tool::Git.program(&ctx.settings.tools),
            ctx.spec.root(),
        )
    }
}
