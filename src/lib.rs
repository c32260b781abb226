pub mod build_system;
pub mod config;
pub mod confirm;
pub mod environment;
pub mod error;
pub mod git;
pub mod paths;
pub mod process;
pub mod project;
pub mod scaffold;

// Re-export commonly used types
pub use config::Settings;
pub use error::{Result, ScaffoldError};
pub use project::{BuildSystemKind, NewProject, ProjectSpec};
pub use scaffold::{Pipeline, Report};
