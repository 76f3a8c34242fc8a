//! Flat dependency resolution
//!
//! Builds the resolution set of a manifest: one entry per `group:artifact`
//! key, in first-declaration order. No transitive metadata is available, so
//! two declarations of the same artifact with different versions cannot be
//! arbitrated and are reported as a conflict instead of letting the last
//! declaration win.

pub mod report;

pub use report::{OutputFormat, Report};

use crate::coordinate::{self, ArtifactKey, Coordinate};
use crate::manifest::{Dependency, Manifest};
use crate::{ResolverError, Result};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Options for a resolution run
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Configurations whose dependencies are left out of the resolution
    pub exclude_configurations: Vec<String>,
}

impl ResolveOptions {
    fn includes(&self, dependency: &Dependency) -> bool {
        !self
            .exclude_configurations
            .iter()
            .any(|c| *c == dependency.configuration)
    }
}

/// One resolved artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub coordinate: Coordinate,

    /// Configurations that declare the artifact, in declaration order
    pub configurations: Vec<String>,

    /// Lines of every declaration
    pub lines: Vec<usize>,
}

/// The resolved dependency set
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    entries: Vec<ResolvedDependency>,
    index: HashMap<ArtifactKey, usize>,
}

impl Resolution {
    /// Build the resolution set, failing on the first conflicting declaration
    pub fn build<'a>(dependencies: impl IntoIterator<Item = &'a Dependency>) -> Result<Self> {
        let mut resolution = Resolution::default();

        for dep in dependencies {
            let key = dep.coordinate.key();

            match resolution.index.get(&key) {
                Some(&i) => {
                    let entry = &mut resolution.entries[i];
                    if entry.coordinate.version != dep.coordinate.version {
                        return Err(ResolverError::Conflict {
                            key: key.to_string(),
                            first_version: entry.coordinate.version.clone(),
                            first_line: entry.lines.first().copied().unwrap_or_default(),
                            second_version: dep.coordinate.version.clone(),
                            second_line: dep.line,
                        });
                    }

                    warn!(
                        coordinate = %dep.coordinate,
                        line = dep.line,
                        "Duplicate declaration merged"
                    );
                    if !entry.configurations.contains(&dep.configuration) {
                        entry.configurations.push(dep.configuration.clone());
                    }
                    entry.lines.push(dep.line);
                }
                None => {
                    debug!(key = %key, version = %dep.coordinate.version, "Resolved");
                    resolution.index.insert(key, resolution.entries.len());
                    resolution.entries.push(ResolvedDependency {
                        coordinate: dep.coordinate.clone(),
                        configurations: vec![dep.configuration.clone()],
                        lines: vec![dep.line],
                    });
                }
            }
        }

        Ok(resolution)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolved entries in first-declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedDependency> {
        self.entries.iter()
    }

    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> {
        self.entries.iter().map(|e| &e.coordinate)
    }

    pub fn get(&self, key: &ArtifactKey) -> Option<&ResolvedDependency> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// The chosen version for `group:artifact`
    pub fn version_of(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.coordinate.key().as_str() == key)
            .map(|e| e.coordinate.version.as_str())
    }

    /// Mapping from artifact key to chosen version
    pub fn versions(&self) -> impl Iterator<Item = (ArtifactKey, &str)> {
        self.entries
            .iter()
            .map(|e| (e.coordinate.key(), e.coordinate.version.as_str()))
    }
}

/// Every conflicting declaration, each paired with the first declaration of its artifact
pub fn conflicts<'a>(dependencies: impl IntoIterator<Item = &'a Dependency>) -> Vec<ResolverError> {
    let mut first: HashMap<ArtifactKey, &Dependency> = HashMap::new();
    let mut found = Vec::new();

    for dep in dependencies {
        let key = dep.coordinate.key();
        match first.get(&key) {
            Some(prev) if prev.coordinate.version != dep.coordinate.version => {
                found.push(ResolverError::Conflict {
                    key: key.to_string(),
                    first_version: prev.coordinate.version.clone(),
                    first_line: prev.line,
                    second_version: dep.coordinate.version.clone(),
                    second_line: dep.line,
                });
            }
            Some(_) => {}
            None => {
                first.insert(key, dep);
            }
        }
    }

    found
}

/// Validate and resolve a manifest, stopping at the first error
pub fn resolve(manifest: &Manifest, options: &ResolveOptions) -> Result<Resolution> {
    let included: Vec<&Dependency> = manifest
        .dependencies()
        .iter()
        .filter(|d| options.includes(d))
        .collect();

    let skipped = manifest.dependencies().len() - included.len();
    if skipped > 0 {
        debug!(skipped, "Excluded dependencies by configuration");
    }

    for dep in &included {
        coordinate::validator::validate_dependency(dep)?;
    }

    let resolution = Resolution::build(included)?;
    info!(resolved = resolution.len(), "Resolution complete");
    Ok(resolution)
}

/// Collect every problem in a manifest: invalid coordinates first, then conflicts
pub fn diagnose(manifest: &Manifest, options: &ResolveOptions) -> Vec<ResolverError> {
    let included: Vec<&Dependency> = manifest
        .dependencies()
        .iter()
        .filter(|d| options.includes(d))
        .collect();

    let mut problems: Vec<ResolverError> = match coordinate::validate_all(included.iter().copied()) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.into_iter().map(ResolverError::from).collect(),
    };
    problems.extend(conflicts(included));
    problems
}
