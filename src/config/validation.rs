//! Configuration validation
//!
//! Validates resolver configuration for correctness:
//! - Configuration names are identifiers
//! - No duplicate entries
//! - Excluded configurations are known

use super::resolver_config::ResolverConfig;
use crate::manifest::STANDARD_CONFIGURATIONS;
use crate::ResolverError;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref CONFIGURATION_NAME: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub context: Option<String>,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: None,
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref ctx) = self.context {
            write!(f, "[{}] {}: {}", ctx, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Validation result
pub type ValidationResult = std::result::Result<(), Vec<ValidationError>>;

/// Validate a resolver configuration
pub fn validate_config(config: &ResolverConfig) -> ValidationResult {
    let mut errors = Vec::new();

    validate_names(
        "extra_configurations",
        &config.extra_configurations,
        &mut errors,
    );
    validate_names(
        "exclude_configurations",
        &config.exclude_configurations,
        &mut errors,
    );

    for name in &config.extra_configurations {
        if STANDARD_CONFIGURATIONS.contains(&name.as_str()) {
            errors.push(
                ValidationError::new(
                    "extra_configurations",
                    "Already a standard configuration",
                )
                .with_context(name.clone()),
            );
        }
    }

    let options = config.parse_options();
    for name in &config.exclude_configurations {
        if !options.is_known_configuration(name) {
            errors.push(
                ValidationError::new(
                    "exclude_configurations",
                    "Unknown configuration. Add it to extra_configurations or fix the name",
                )
                .with_context(name.clone()),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_names(field: &str, names: &[String], errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for name in names {
        if !CONFIGURATION_NAME.is_match(name) {
            errors.push(
                ValidationError::new(field, "Invalid configuration name")
                    .with_context(name.clone()),
            );
        }
        if !seen.insert(name) {
            errors.push(ValidationError::new(
                field,
                format!("Duplicate configuration: {}", name),
            ));
        }
    }
}

/// Validate configuration and return a Result
pub fn validate_config_result(config: &ResolverConfig) -> crate::Result<()> {
    validate_config(config).map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        ResolverError::Config(format!(
            "Configuration validation failed:\n  - {}",
            messages.join("\n  - ")
        ))
    })
}
