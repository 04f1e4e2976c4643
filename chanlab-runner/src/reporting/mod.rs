//! Reporting and artifact export.

pub mod artifacts;

pub use artifacts::{ArtifactManager, ArtifactPaths};
