pub mod poetry;
pub mod setuptools;

use crate::project::BuildSystemKind;
use crate::scaffold::Stage;

/// A dependency-management convention
///
/// Contributes the stages that run after the common ones, plus any extra
/// static files the convention needs.
pub trait BuildSystem {
    fn kind(&self) -> BuildSystemKind;

    /// Extra templates copied verbatim alongside the common ones
    fn static_files(&self) -> &'static [&'static str] {
        &[]
    }

    /// Variant stages, in execution order
    fn stages(&self) -> Vec<Box<dyn Stage>>;
}

/// Get the strategy for a build system
pub fn get_build_system(kind: BuildSystemKind) -> Box<dyn BuildSystem> {
    match kind {
        BuildSystemKind::Poetry => Box::new(poetry::PoetryStrategy),
        BuildSystemKind::Setuptools => Box::new(setuptools::SetuptoolsStrategy),
    }
}
