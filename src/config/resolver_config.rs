//! Resolver configuration file handling
//!
//! Loads and manages the ~/.config/manifest-resolver/config.yaml file.

use crate::manifest::ParseOptions;
use crate::resolve::{OutputFormat, ResolveOptions};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolver configuration
///
/// Every field is optional in the YAML file; a missing file behaves like an
/// empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Default output format for `resolve` (text, json)
    #[serde(default)]
    pub format: OutputFormat,

    /// Custom dependency configurations accepted besides the standard Gradle ones
    #[serde(default)]
    pub extra_configurations: Vec<String>,

    /// Configurations whose dependencies are left out of resolution
    #[serde(default)]
    pub exclude_configurations: Vec<String>,
}

impl ResolverConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the default path, falling back to defaults if it does not exist
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::new());
        }
        Self::load(&path)
    }

    /// Load configuration from a specific path
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(crate::ResolverError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        tracing::info!(path = %path.display(), "Loading resolver configuration");

        let content = fs::read_to_string(path)?;
        let config: Self = if content.trim().is_empty() {
            Self::new()
        } else {
            serde_yaml::from_str(&content)?
        };

        tracing::debug!(
            format = %config.format,
            extra = config.extra_configurations.len(),
            excluded = config.exclude_configurations.len(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Saving resolver configuration");

        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;

        Ok(())
    }

    /// Get the default config path (~/.config/manifest-resolver/config.yaml)
    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".config");
        path.push("manifest-resolver");
        path.push("config.yaml");
        path
    }

    /// Parser options derived from this configuration
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            extra_configurations: self.extra_configurations.clone(),
        }
    }

    /// Resolution options derived from this configuration
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            exclude_configurations: self.exclude_configurations.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        let config = ResolverConfig {
            format: OutputFormat::Json,
            extra_configurations: vec!["integrationTestImplementation".to_string()],
            exclude_configurations: vec!["testImplementation".to_string()],
        };
        config.save(path).unwrap();

        let loaded = ResolverConfig::load(path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.yaml");

        ResolverConfig::new().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "exclude_configurations:\n  - kapt\n").unwrap();

        let loaded = ResolverConfig::load(temp_file.path()).unwrap();
        assert_eq!(loaded.format, OutputFormat::Text);
        assert!(loaded.extra_configurations.is_empty());
        assert_eq!(loaded.exclude_configurations, vec!["kapt"]);
    }

    #[test]
    fn test_empty_file_is_default() {
        let temp_file = NamedTempFile::new().unwrap();
        let loaded = ResolverConfig::load(temp_file.path()).unwrap();
        assert_eq!(loaded, ResolverConfig::default());
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "format: xml\n").unwrap();

        let result = ResolverConfig::load(temp_file.path());
        assert!(matches!(result, Err(crate::ResolverError::Yaml(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ResolverConfig::load("/nonexistent/config.yaml");
        assert!(matches!(result, Err(crate::ResolverError::Config(_))));
    }

    #[test]
    fn test_default_path() {
        let path = ResolverConfig::default_path();
        assert!(path.ends_with("manifest-resolver/config.yaml"));
    }

    #[test]
    fn test_options() {
        let config = ResolverConfig {
            extra_configurations: vec!["shadow".to_string()],
            exclude_configurations: vec!["testImplementation".to_string()],
            ..Default::default()
        };

        assert!(config.parse_options().is_known_configuration("shadow"));
        assert_eq!(
            config.resolve_options().exclude_configurations,
            vec!["testImplementation"]
        );
    }

    #[test]
    fn test_serialization() {
        let yaml = serde_yaml::to_string(&ResolverConfig::new()).unwrap();
        assert!(yaml.contains("format: text"));
        assert!(yaml.contains("extra_configurations: []"));
    }
}
