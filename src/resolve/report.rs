//! Resolution output
//!
//! Text output is one coordinate per line. JSON output carries the manifest
//! summary, a `scanned` count block and one entry per resolved artifact with
//! its package URL.

use super::Resolution;
use crate::manifest::Manifest;
use crate::{ResolverError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format for resolution results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ResolverError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ResolverError::Other(format!(
                "Invalid format: {}. Must be one of: text, json",
                s
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Dependency counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scanned {
    pub total: usize,
    pub direct: usize,
    /// Always zero: manifests carry no transitive metadata
    pub transitive: usize,
}

/// One resolved artifact in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Package URL, e.g. `pkg:maven/log4j/log4j@1.2.17`
    #[serde(rename = "ref")]
    pub reference: String,
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub configurations: Vec<String>,
}

/// Machine-readable resolution report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub manifest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub repositories: Vec<String>,
    pub scanned: Scanned,
    pub dependencies: Vec<ReportEntry>,
}

impl Report {
    pub fn new(source: impl Into<String>, manifest: &Manifest, resolution: &Resolution) -> Self {
        let dependencies: Vec<ReportEntry> = resolution
            .iter()
            .map(|r| ReportEntry {
                reference: r.coordinate.purl(),
                group: r.coordinate.group_id.clone(),
                artifact: r.coordinate.artifact_id.clone(),
                version: r.coordinate.version.clone(),
                configurations: r.configurations.clone(),
            })
            .collect();

        Self {
            manifest: source.into(),
            group: manifest.group().map(str::to_string),
            version: manifest.version().map(str::to_string),
            repositories: manifest.repository_urls().map(str::to_string).collect(),
            scanned: Scanned {
                total: dependencies.len(),
                direct: dependencies.len(),
                transitive: 0,
            },
            dependencies,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render the resolved coordinates, one per line
pub fn text(resolution: &Resolution) -> String {
    resolution
        .coordinates()
        .map(|c| format!("{}\n", c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{resolve, ResolveOptions};

    const MANIFEST: &str = r#"
        group = "com.example"
        repositories { mavenCentral() }
        dependencies {
            implementation("org.slf4j:slf4j-api:2.0.7")
            implementation("log4j:log4j:1.2.17")
            testImplementation("log4j:log4j:1.2.17")
        }
    "#;

    fn resolved() -> (Manifest, Resolution) {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        let resolution = resolve(&manifest, &ResolveOptions::default()).unwrap();
        (manifest, resolution)
    }

    #[test]
    fn test_text_output() {
        let (_, resolution) = resolved();
        assert_eq!(
            text(&resolution),
            "org.slf4j:slf4j-api:2.0.7\nlog4j:log4j:1.2.17\n"
        );
    }

    #[test]
    fn test_report_contents() {
        let (manifest, resolution) = resolved();
        let report = Report::new("build.gradle.kts", &manifest, &resolution);

        assert_eq!(report.group.as_deref(), Some("com.example"));
        assert!(report.version.is_none());
        assert_eq!(
            report.scanned,
            Scanned {
                total: 2,
                direct: 2,
                transitive: 0
            }
        );
        assert_eq!(report.dependencies[1].reference, "pkg:maven/log4j/log4j@1.2.17");
        assert_eq!(
            report.dependencies[1].configurations,
            vec!["implementation", "testImplementation"]
        );
    }

    #[test]
    fn test_report_json_shape() {
        let (manifest, resolution) = resolved();
        let json = Report::new("build.gradle.kts", &manifest, &resolution)
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["scanned"]["total"], 2);
        assert_eq!(value["scanned"]["transitive"], 0);
        assert_eq!(value["dependencies"][0]["ref"], "pkg:maven/org.slf4j/slf4j-api@2.0.7");
        assert_eq!(
            value["repositories"][0],
            "https://repo.maven.apache.org/maven2/"
        );
        assert!(value.get("version").is_none());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
