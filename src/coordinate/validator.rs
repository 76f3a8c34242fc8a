//! Coordinate validation
//!
//! Checks the fields of a coordinate once its shape is known:
//! - group and artifact use the characters Maven repositories accept
//! - version is non-empty, free of disallowed characters and semantic-version-like
//!
//! Dynamic versions (`1.+`, `latest.release`) and ranges are rejected.

use super::Coordinate;
use crate::manifest::Dependency;
use crate::ResolverError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NAME_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").unwrap();
    static ref VERSION_PATTERN: Regex =
        Regex::new(r"^[0-9]+(\.[0-9]+)*([._+\-][A-Za-z0-9]+)*$").unwrap();
}

/// Validation error details for one coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateError {
    /// The offending coordinate, rendered as `group:artifact:version`
    pub coordinate: String,
    /// Field that failed (`group`, `artifact` or `version`)
    pub field: &'static str,
    pub reason: String,
    /// Manifest line of the declaration, when known
    pub line: Option<usize>,
}

impl CoordinateError {
    fn new(coordinate: &Coordinate, field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            coordinate: coordinate.to_string(),
            field,
            reason: reason.into(),
            line: None,
        }
    }

    fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl std::fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(
                f,
                "line {}: {} ({}): {}",
                line, self.coordinate, self.field, self.reason
            ),
            None => write!(f, "{} ({}): {}", self.coordinate, self.field, self.reason),
        }
    }
}

impl From<CoordinateError> for ResolverError {
    fn from(err: CoordinateError) -> Self {
        ResolverError::InvalidCoordinate {
            coordinate: err.coordinate,
            line: err.line.unwrap_or(0),
            reason: format!("{}: {}", err.field, err.reason),
        }
    }
}

/// Validation result over many coordinates
pub type ValidationResult = std::result::Result<(), Vec<CoordinateError>>;

/// Validate a single coordinate
pub fn validate(coordinate: &Coordinate) -> std::result::Result<(), CoordinateError> {
    validate_name(coordinate, "group", &coordinate.group_id)?;
    validate_name(coordinate, "artifact", &coordinate.artifact_id)?;
    validate_version(coordinate)
}

/// Validate every dependency, collecting all failures
pub fn validate_all<'a>(dependencies: impl IntoIterator<Item = &'a Dependency>) -> ValidationResult {
    let errors: Vec<CoordinateError> = dependencies
        .into_iter()
        .filter_map(|dep| {
            validate(&dep.coordinate)
                .err()
                .map(|e| e.at_line(dep.line))
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a dependency, stopping at the first failure
pub fn validate_dependency(dependency: &Dependency) -> crate::Result<()> {
    validate(&dependency.coordinate)
        .map_err(|e| ResolverError::from(e.at_line(dependency.line)))
}

fn validate_name(
    coordinate: &Coordinate,
    field: &'static str,
    value: &str,
) -> std::result::Result<(), CoordinateError> {
    if value.is_empty() {
        return Err(CoordinateError::new(coordinate, field, format!("{} is empty", field)));
    }

    if !NAME_PATTERN.is_match(value) {
        let reason = match first_disallowed(value, |c| {
            c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
        }) {
            Some(c) => format!("contains disallowed character '{}'", c),
            None => format!("'{}' must start with a letter, digit or underscore", value),
        };
        return Err(CoordinateError::new(coordinate, field, reason));
    }

    Ok(())
}

fn validate_version(coordinate: &Coordinate) -> std::result::Result<(), CoordinateError> {
    let version = coordinate.version.as_str();

    if version.is_empty() {
        return Err(CoordinateError::new(coordinate, "version", "version is empty"));
    }

    if let Some(c) = first_disallowed(version, |c| {
        c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_')
    }) {
        return Err(CoordinateError::new(
            coordinate,
            "version",
            format!("contains disallowed character '{}'", c),
        ));
    }

    if !VERSION_PATTERN.is_match(version) {
        return Err(CoordinateError::new(
            coordinate,
            "version",
            format!("'{}' is not a semantic-version-like string", version),
        ));
    }

    Ok(())
}

fn first_disallowed(value: &str, allowed: impl Fn(char) -> bool) -> Option<char> {
    value.chars().find(|c| !allowed(*c))
}
