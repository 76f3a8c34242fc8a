//! Configuration system
//!
//! Loads ~/.config/manifest-resolver/config.yaml with support for:
//! - Default output format
//! - Custom dependency configurations accepted by the parser
//! - Configurations left out of resolution

mod resolver_config;
pub mod validation;

pub use resolver_config::ResolverConfig;
pub use validation::{validate_config, validate_config_result, ValidationError};
