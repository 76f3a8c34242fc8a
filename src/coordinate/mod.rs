//! Dependency coordinates
//!
//! A coordinate is the `group:artifact:version` triple that identifies one
//! module in a Maven-layout repository. The shape (three non-empty segments)
//! is checked when a coordinate is split from its notation; field contents
//! are checked by the [`validator`].

pub mod validator;

pub use validator::{validate, validate_all, CoordinateError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a notation could not be split into a coordinate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("expected group:artifact:version, found {0} segment(s)")]
    SegmentCount(usize),

    #[error("{0} segment is empty")]
    EmptySegment(&'static str),
}

/// A `group:artifact:version` triple
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// The version-less key this coordinate resolves under
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(&self.group_id, &self.artifact_id)
    }

    /// Package URL for the coordinate, e.g. `pkg:maven/log4j/log4j@1.2.17`
    pub fn purl(&self) -> String {
        format!(
            "pkg:maven/{}/{}@{}",
            self.group_id, self.artifact_id, self.version
        )
    }
}

impl FromStr for Coordinate {
    type Err = ShapeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let segments: Vec<&str> = s.split(':').collect();
        if segments.len() != 3 {
            return Err(ShapeError::SegmentCount(segments.len()));
        }

        for (segment, name) in segments.iter().zip(["group", "artifact", "version"]) {
            if segment.is_empty() {
                return Err(ShapeError::EmptySegment(name));
            }
        }

        Ok(Coordinate::new(segments[0], segments[1], segments[2]))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// Type-safe `group:artifact` key
///
/// Two coordinates with the same key name the same artifact; resolution keeps
/// at most one version per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    pub fn new(group_id: &str, artifact_id: &str) -> Self {
        Self(format!("{}:{}", group_id, artifact_id))
    }

    /// Get the underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
