//! manifest-resolver - Dependency resolution for Gradle build manifests
//!
//! Main entry point for the manifest-resolver CLI.

use clap::{Parser, Subcommand};
use manifest_resolver::config::{self, ResolverConfig};
use manifest_resolver::manifest::{self, Dialect, Manifest};
use manifest_resolver::resolve::{self, report, OutputFormat, Report};
use manifest_resolver::ResolverError;
use std::path::{Path, PathBuf};
use std::process;

/// manifest-resolver - Resolve and validate Gradle build manifests
#[derive(Parser, Debug)]
#[command(name = "manifest-resolver")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/manifest-resolver/config.yaml)
    #[arg(short, long, env = "MANIFEST_RESOLVER_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the dependencies of a manifest and print the chosen coordinates
    Resolve {
        /// Manifest file (build.gradle.kts or build.gradle)
        file: PathBuf,

        /// Output format (text, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Leave out dependencies declared in this configuration (repeatable)
        #[arg(short = 'x', long = "exclude")]
        exclude: Vec<String>,
    },

    /// Report every invalid coordinate and version conflict in a manifest
    Validate {
        /// Manifest file (build.gradle.kts or build.gradle)
        file: PathBuf,
    },

    /// Print the canonical form of a manifest
    Render {
        /// Manifest file (build.gradle.kts or build.gradle)
        file: PathBuf,

        /// Output dialect (kotlin, groovy); defaults to the input's
        #[arg(short, long)]
        dialect: Option<String>,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing configuration
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    // Initialize logging
    if let Err(e) = manifest_resolver::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> manifest_resolver::Result<()> {
    match cli.command {
        Commands::Init { force } => handle_init_command(&cli.config, force),
        Commands::Resolve {
            file,
            format,
            exclude,
        } => handle_resolve_command(&load_config(&cli.config)?, &file, format.as_deref(), exclude),
        Commands::Validate { file } => handle_validate_command(&load_config(&cli.config)?, &file),
        Commands::Render { file, dialect } => {
            handle_render_command(&load_config(&cli.config)?, &file, dialect.as_deref())
        }
    }
}

fn load_config(config_path: &Option<String>) -> manifest_resolver::Result<ResolverConfig> {
    let config = if let Some(path) = config_path {
        ResolverConfig::load(path)?
    } else {
        ResolverConfig::load_default()?
    };

    config::validate_config_result(&config)?;

    tracing::info!(format = %config.format, "Configuration loaded");
    Ok(config)
}

fn handle_resolve_command(
    config: &ResolverConfig,
    file: &Path,
    format: Option<&str>,
    exclude: Vec<String>,
) -> manifest_resolver::Result<()> {
    let format = match format {
        Some(f) => f.parse::<OutputFormat>()?,
        None => config.format,
    };

    let manifest = Manifest::from_file_with(file, &config.parse_options())?;

    let mut options = config.resolve_options();
    options.exclude_configurations.extend(exclude);

    let resolution = resolve::resolve(&manifest, &options)?;

    match format {
        OutputFormat::Text => print!("{}", report::text(&resolution)),
        OutputFormat::Json => {
            let report = Report::new(file.display().to_string(), &manifest, &resolution);
            println!("{}", report.to_json()?);
        }
    }

    Ok(())
}

fn handle_validate_command(config: &ResolverConfig, file: &Path) -> manifest_resolver::Result<()> {
    let manifest = Manifest::from_file_with(file, &config.parse_options())?;
    let problems = resolve::diagnose(&manifest, &config.resolve_options());

    if problems.is_empty() {
        println!(
            "✓ {}: {} dependencies, no problems found",
            file.display(),
            manifest.dependencies().len()
        );
        return Ok(());
    }

    for problem in &problems {
        eprintln!("  - {}", problem);
    }

    Err(ResolverError::Other(format!(
        "{} problem(s) found in {}",
        problems.len(),
        file.display()
    )))
}

fn handle_render_command(
    config: &ResolverConfig,
    file: &Path,
    dialect: Option<&str>,
) -> manifest_resolver::Result<()> {
    let dialect = match dialect {
        Some(d) => d.parse::<Dialect>()?,
        None => Dialect::from_path(file),
    };

    let manifest = Manifest::from_file_with(file, &config.parse_options())?;
    print!("{}", manifest::render(&manifest, dialect));

    Ok(())
}

fn handle_init_command(config_path: &Option<String>, force: bool) -> manifest_resolver::Result<()> {
    let config_file = if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        ResolverConfig::default_path()
    };

    // Check if already initialized
    if config_file.exists() && !force {
        println!("Configuration already exists at {}", config_file.display());
        println!();
        println!("To overwrite it, run:");
        println!("  manifest-resolver init --force");
        return Ok(());
    }

    // Create parent directory if needed
    if let Some(parent) = config_file.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ResolverError::Config(format!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let config = ResolverConfig::new();
    config.save(&config_file)?;

    println!("✓ Created configuration at {}", config_file.display());
    println!();
    println!("Next steps:");
    println!("  1. Add custom dependency configurations under extra_configurations");
    println!("  2. Resolve a manifest:");
    println!("     manifest-resolver resolve build.gradle.kts");

    Ok(())
}
