//! manifest-resolver - Dependency resolution for Gradle build manifests
//!
//! Reads the declarative part of a `build.gradle.kts` or `build.gradle` script,
//! validates every declared Maven coordinate and builds the flat resolution set.
//! Two declarations of one artifact with different versions are a conflict:
//! no transitive metadata exists to arbitrate between them.
//!
//! # Architecture
//!
//! - **manifest**: Build script parsing and canonical rendering
//! - **coordinate**: Maven coordinates and their validation rules
//! - **resolve**: Resolution set, conflict detection and reports
//! - **config**: Optional user configuration (~/.config/manifest-resolver)

// Core modules
pub mod coordinate;
pub mod error;
pub mod manifest;
pub mod resolve;

// Ambient
pub mod config;
pub mod logging;

// Re-exports
pub use coordinate::{ArtifactKey, Coordinate};
pub use error::{ResolverError, Result};
pub use manifest::Manifest;
pub use resolve::{resolve, Resolution, ResolveOptions};
