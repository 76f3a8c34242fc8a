//! Manifest parsing for Gradle build scripts
//!
//! Parses the declarative subset of a `build.gradle.kts` (Kotlin DSL) or
//! `build.gradle` (Groovy DSL) script that names the project coordinates,
//! plugins, repositories and module dependencies.
//!
//! # Example Manifest
//!
//! ```text
//! plugins {
//!     java
//! }
//!
//! group = "com.example"
//! version = "1.0-SNAPSHOT"
//!
//! repositories {
//!     mavenCentral()
//! }
//!
//! dependencies {
//!     implementation("org.slf4j:slf4j-api:2.0.7")
//!     implementation("log4j:log4j:1.2.17")
//! }
//! ```

mod lexer;
mod parser;
pub mod render;

pub use parser::{ParseOptions, STANDARD_CONFIGURATIONS};
pub use render::render;

use crate::coordinate::Coordinate;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A parsed build manifest
///
/// Built once by [`Manifest::parse`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    group: Option<String>,
    version: Option<String>,
    plugins: Vec<Plugin>,
    repositories: Vec<Repository>,
    dependencies: Vec<Dependency>,
}

impl Manifest {
    /// Project group, e.g. `com.example`
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Project version, e.g. `1.0-SNAPSHOT`
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Repositories in declaration order
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Module dependencies in declaration order
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Declared coordinates in declaration order
    pub fn coordinates(&self) -> impl Iterator<Item = &Coordinate> {
        self.dependencies.iter().map(|d| &d.coordinate)
    }

    /// Repository URLs in declaration order
    pub fn repository_urls(&self) -> impl Iterator<Item = &str> {
        self.repositories.iter().map(|r| r.url.as_str())
    }

    /// Look up a plugin by id
    pub fn plugin(&self, id: &str) -> Option<&Plugin> {
        self.plugins.iter().find(|p| p.id == id)
    }
}

/// A plugin applied in the `plugins { }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plugin {
    /// Plugin id (e.g. "java", "org.jetbrains.kotlin.jvm")
    pub id: String,

    /// Requested plugin version; core plugins have none
    pub version: Option<String>,

    /// False for `apply false` declarations
    pub apply: bool,
}

impl Plugin {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            apply: true,
        }
    }
}

/// How a repository was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryKind {
    MavenCentral,
    Google,
    GradlePluginPortal,
    MavenLocal,
    /// Explicit `maven { url … }` repository
    Maven,
}

/// A Maven-layout repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub url: String,
    pub kind: RepositoryKind,
}

impl Repository {
    pub const MAVEN_CENTRAL_URL: &'static str = "https://repo.maven.apache.org/maven2/";
    pub const GOOGLE_URL: &'static str = "https://dl.google.com/dl/android/maven2/";
    pub const GRADLE_PLUGIN_PORTAL_URL: &'static str = "https://plugins.gradle.org/m2/";

    pub fn maven_central() -> Self {
        Self {
            name: "MavenRepo".to_string(),
            url: Self::MAVEN_CENTRAL_URL.to_string(),
            kind: RepositoryKind::MavenCentral,
        }
    }

    pub fn google() -> Self {
        Self {
            name: "Google".to_string(),
            url: Self::GOOGLE_URL.to_string(),
            kind: RepositoryKind::Google,
        }
    }

    pub fn gradle_plugin_portal() -> Self {
        Self {
            name: "Gradle Central Plugin Repository".to_string(),
            url: Self::GRADLE_PLUGIN_PORTAL_URL.to_string(),
            kind: RepositoryKind::GradlePluginPortal,
        }
    }

    /// The local Maven cache under `~/.m2/repository`
    pub fn maven_local() -> Self {
        let url = dirs::home_dir()
            .and_then(|home| url::Url::from_directory_path(home.join(".m2").join("repository")).ok())
            .map(|u| u.to_string())
            .unwrap_or_else(|| "file:///.m2/repository/".to_string());

        Self {
            name: "MavenLocal".to_string(),
            url,
            kind: RepositoryKind::MavenLocal,
        }
    }

    pub fn maven(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            kind: RepositoryKind::Maven,
        }
    }
}

/// A module dependency declared in the `dependencies { }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Gradle configuration (e.g. "implementation", "testImplementation")
    pub configuration: String,

    pub coordinate: Coordinate,

    /// 1-based line of the declaration
    pub line: usize,
}

impl Dependency {
    pub fn new(configuration: impl Into<String>, coordinate: Coordinate, line: usize) -> Self {
        Self {
            configuration: configuration.into(),
            coordinate,
            line,
        }
    }
}

/// Build script dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `build.gradle.kts`
    #[default]
    Kotlin,
    /// `build.gradle`
    Groovy,
}

impl Dialect {
    /// Pick the dialect from a manifest file name: `.gradle` is Groovy, anything else Kotlin
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("gradle") => Dialect::Groovy,
            _ => Dialect::Kotlin,
        }
    }
}

impl FromStr for Dialect {
    type Err = crate::ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kotlin" | "kts" | "gradle-kotlin" => Ok(Dialect::Kotlin),
            "groovy" | "gradle-groovy" => Ok(Dialect::Groovy),
            _ => Err(crate::ResolverError::Other(format!(
                "Invalid dialect: {}. Must be one of: kotlin, groovy",
                s
            ))),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Kotlin => write!(f, "kotlin"),
            Dialect::Groovy => write!(f, "groovy"),
        }
    }
}
