// File: testing-framework/src/utilities/mod.rs
//
// Testing Utilities
//
// Failure artifacts and their replay helpers.

/// Failure artifact collection for run debugging and reproduction
pub mod artifacts;

/// Artifact replay utilities for reproducing failed runs
pub mod replay;

// Re-export commonly used utilities
pub use artifacts::{ArtifactCollector, CaptureReporter, RunArtifact};
pub use replay::{get_replay_command, load_artifact, print_artifact_summary, validate_artifact};
