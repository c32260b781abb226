use serde::Serialize;
use std::collections::BTreeMap;
use std::process::Command;

use crate::config::ToolsSection;

/// External tools a scaffolding run may call
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tool {
    Git,
    Python,
    Poetry,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Git, Tool::Python, Tool::Poetry];

    pub fn label(self) -> &'static str {
        match self {
            Tool::Git => "git",
            Tool::Python => "python",
            Tool::Poetry => "poetry",
        }
    }

    /// Configured program for this tool
    pub fn program(self, tools: &ToolsSection) -> &str {
        match self {
            Tool::Git => &tools.git,
            Tool::Python => &tools.python,
            Tool::Poetry => &tools.poetry,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub program: String,
    pub available: bool,
    pub version: Option<String>,
    pub path: Option<String>,
}

/// Snapshot of the external tools on this machine
#[derive(Debug, Clone, Serialize)]
pub struct Environment {
    pub os: String,
    pub arch: String,
    pub tools: BTreeMap<String, ToolInfo>,
}

impl Environment {
    pub fn detect(tools: &ToolsSection) -> Self {
        let tools = Tool::ALL
            .iter()
            .map(|tool| (tool.label().to_string(), detect_tool(tool.program(tools))))
            .collect();

        Environment {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tools,
        }
    }

    pub fn is_available(&self, tool: Tool) -> bool {
        self.tools
            .get(tool.label())
            .is_some_and(|info| info.available)
    }
}

fn detect_tool(program: &str) -> ToolInfo {
    let mut info = ToolInfo {
        program: program.to_string(),
        available: false,
        version: None,
        path: None,
    };

    if let Ok(path) = which::which(program) {
        info.available = true;
        info.path = Some(path.display().to_string());

        if let Ok(output) = Command::new(program).arg("--version").output() {
            // Older pythons print the version on stderr
            let raw = if output.stdout.is_empty() {
                output.stderr
            } else {
                output.stdout
            };
            let text = String::from_utf8_lossy(&raw);
            info.version = text.lines().next().map(|l| l.trim().to_string());
        }
    }

    info
}
