//! Integration tests for manifest-resolver
//!
//! These tests verify the full workflow from manifest file through resolution,
//! plus the exit codes of the built binary.

use manifest_resolver::config::{validate_config, ResolverConfig};
use manifest_resolver::manifest::{render, Dialect, Manifest};
use manifest_resolver::resolve::{self, OutputFormat, Report, ResolveOptions};
use manifest_resolver::{Coordinate, ResolverError};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("build.gradle.kts")
}

/// Helper to write a manifest into a temp dir
fn write_manifest(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

mod pipeline_tests {
    use super::*;

    #[test]
    fn test_fixture_resolves() {
        let manifest = Manifest::from_file(&fixture()).unwrap();
        let resolution = resolve::resolve(&manifest, &ResolveOptions::default()).unwrap();

        let coords: Vec<String> = resolution.coordinates().map(|c| c.to_string()).collect();
        assert_eq!(
            coords,
            vec![
                "org.jetbrains.kotlin:kotlin-stdlib:1.9.0",
                "org.apache.commons:commons-lang3:3.12.0",
                "org.slf4j:slf4j-api:2.0.7",
                "log4j:log4j:1.2.17",
            ]
        );
        assert_eq!(
            resolution.get(&"log4j:log4j:1.2.17".parse::<Coordinate>().unwrap().key())
                .map(|r| r.lines.clone()),
            Some(vec![16])
        );
    }

    #[test]
    fn test_fixture_report() {
        let manifest = Manifest::from_file(&fixture()).unwrap();
        let resolution = resolve::resolve(&manifest, &ResolveOptions::default()).unwrap();
        let report = Report::new("build.gradle.kts", &manifest, &resolution);

        assert_eq!(report.group.as_deref(), Some("com.example"));
        assert_eq!(report.version.as_deref(), Some("1.0-SNAPSHOT"));
        assert_eq!(report.scanned.total, 4);
        assert_eq!(report.scanned.direct, 4);
        assert_eq!(report.scanned.transitive, 0);
        assert_eq!(report.dependencies[3].reference, "pkg:maven/log4j/log4j@1.2.17");
    }

    #[test]
    fn test_conflict_names_artifact() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            "build.gradle.kts",
            "dependencies {\n    implementation(\"org.slf4j:slf4j-api:2.0.7\")\n    implementation(\"org.slf4j:slf4j-api:2.0.8\")\n}\n",
        );

        let manifest = Manifest::from_file(&path).unwrap();
        let err = resolve::resolve(&manifest, &ResolveOptions::default()).unwrap_err();
        assert!(matches!(err, ResolverError::Conflict { ref key, .. } if key == "org.slf4j:slf4j-api"));
    }

    #[test]
    fn test_malformed_line_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            "build.gradle.kts",
            "dependencies {\n    implementation(\"org.apache.commons\")\n}\n",
        );

        let err = Manifest::from_file(&path).unwrap_err();
        assert!(matches!(err, ResolverError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Manifest::from_file(Path::new("/nonexistent/build.gradle.kts")).unwrap_err();
        assert!(matches!(err, ResolverError::Io(_)));
        assert!(err.to_string().contains("/nonexistent/build.gradle.kts"));
    }

    #[test]
    fn test_render_round_trip_from_file() {
        let manifest = Manifest::from_file(&fixture()).unwrap();

        for dialect in [Dialect::Kotlin, Dialect::Groovy] {
            let reparsed = Manifest::parse(&render(&manifest, dialect)).unwrap();
            let before: Vec<&Coordinate> = manifest.coordinates().collect();
            let after: Vec<&Coordinate> = reparsed.coordinates().collect();
            assert_eq!(before, after, "round trip through {}", dialect);
        }
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_config_creation_and_save() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let config = ResolverConfig {
            format: OutputFormat::Json,
            extra_configurations: vec!["shadow".to_string()],
            exclude_configurations: vec!["shadow".to_string()],
        };
        assert!(validate_config(&config).is_ok());

        config.save(&config_path).unwrap();

        let loaded = ResolverConfig::load(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_drives_parse_and_resolve() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_manifest(
            &temp_dir,
            "build.gradle.kts",
            "dependencies {\n    implementation(\"a:b:1.0\")\n    shadow(\"a:b:2.0\")\n}\n",
        );

        // shadow is not a standard configuration
        assert!(Manifest::from_file(&path).is_err());

        let config = ResolverConfig {
            extra_configurations: vec!["shadow".to_string()],
            exclude_configurations: vec!["shadow".to_string()],
            ..Default::default()
        };
        let manifest = Manifest::from_file_with(&path, &config.parse_options()).unwrap();
        let resolution = resolve::resolve(&manifest, &config.resolve_options()).unwrap();
        assert_eq!(resolution.version_of("a:b"), Some("1.0"));
    }
}

mod cli_tests {
    use super::*;

    /// Run the binary with an isolated home directory
    fn run(home: &TempDir, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_manifest-resolver"))
            .args(args)
            .env("HOME", home.path())
            .env_remove("MANIFEST_RESOLVER_CONFIG")
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    #[test]
    fn test_resolve_success_exit_code() {
        let home = TempDir::new().unwrap();
        let fixture = fixture();
        let output = run(&home, &["resolve", fixture.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(0));
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert_eq!(stdout.lines().count(), 4);
        assert!(stdout.lines().any(|l| l == "log4j:log4j:1.2.17"));
    }

    #[test]
    fn test_resolve_json() {
        let home = TempDir::new().unwrap();
        let fixture = fixture();
        let output = run(&home, &["resolve", fixture.to_str().unwrap(), "--format", "json"]);

        assert_eq!(output.status.code(), Some(0));
        let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["scanned"]["total"], 4);
        assert_eq!(value["dependencies"][2]["artifact"], "slf4j-api");
    }

    #[test]
    fn test_resolve_conflict_exit_code() {
        let home = TempDir::new().unwrap();
        let path = write_manifest(
            &home,
            "build.gradle.kts",
            "dependencies {\n    implementation(\"org.slf4j:slf4j-api:2.0.7\")\n    implementation(\"org.slf4j:slf4j-api:2.0.8\")\n}\n",
        );
        let output = run(&home, &["resolve", path.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(1));
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Error: Conflicting versions for org.slf4j:slf4j-api"));
    }

    #[test]
    fn test_resolve_parse_error_exit_code() {
        let home = TempDir::new().unwrap();
        let path = write_manifest(
            &home,
            "build.gradle.kts",
            "dependencies {\n    implementation(\"org.apache.commons\")\n}\n",
        );
        let output = run(&home, &["resolve", path.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Parse error at line 2"));
    }

    #[test]
    fn test_resolve_invalid_coordinate_exit_code() {
        let home = TempDir::new().unwrap();
        let path = write_manifest(
            &home,
            "build.gradle.kts",
            "dependencies {\n    implementation(\"com.example:lib:1.0 beta\")\n}\n",
        );
        let output = run(&home, &["resolve", path.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Invalid coordinate"));
    }

    #[test]
    fn test_resolve_missing_file_exit_code() {
        let home = TempDir::new().unwrap();
        let output = run(&home, &["resolve", "/nonexistent/build.gradle.kts"]);
        assert_eq!(output.status.code(), Some(1));
    }

    #[test]
    fn test_validate_reports_all_problems() {
        let home = TempDir::new().unwrap();
        let path = write_manifest(
            &home,
            "build.gradle.kts",
            "dependencies {\n    implementation(\"a:b:1.+\")\n    implementation(\"c:d:1.0\")\n    implementation(\"c:d:2.0\")\n}\n",
        );
        let output = run(&home, &["validate", path.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("Invalid coordinate a:b:1.+"));
        assert!(stderr.contains("Conflicting versions for c:d"));
        assert!(stderr.contains("Error: 2 problem(s) found"));
    }

    #[test]
    fn test_validate_clean_manifest() {
        let home = TempDir::new().unwrap();
        let fixture = fixture();
        let output = run(&home, &["validate", fixture.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(0));
    }

    #[test]
    fn test_render_groovy() {
        let home = TempDir::new().unwrap();
        let fixture = fixture();
        let output = run(
            &home,
            &["render", fixture.to_str().unwrap(), "--dialect", "groovy"],
        );

        assert_eq!(output.status.code(), Some(0));
        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.contains("    implementation 'log4j:log4j:1.2.17'\n"));
    }

    #[test]
    fn test_init_then_exclude_via_config() {
        let home = TempDir::new().unwrap();
        let config_path = home.path().join("custom").join("config.yaml");
        let config_arg = config_path.to_str().unwrap();

        let output = run(&home, &["--config", config_arg, "init"]);
        assert_eq!(output.status.code(), Some(0));
        assert_eq!(
            ResolverConfig::load(&config_path).unwrap(),
            ResolverConfig::default()
        );

        let config = ResolverConfig {
            exclude_configurations: vec!["testImplementation".to_string()],
            ..Default::default()
        };
        config.save(&config_path).unwrap();

        let path = write_manifest(
            &home,
            "build.gradle.kts",
            "dependencies {\n    implementation(\"a:b:1.0\")\n    testImplementation(\"a:b:2.0\")\n}\n",
        );
        let output = run(&home, &["--config", config_arg, "resolve", path.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(0));
        assert_eq!(String::from_utf8(output.stdout).unwrap(), "a:b:1.0\n");
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let home = TempDir::new().unwrap();
        let fixture = fixture();
        let output = run(
            &home,
            &["--config", "/nonexistent/config.yaml", "resolve", fixture.to_str().unwrap()],
        );
        assert_eq!(output.status.code(), Some(1));
    }
}
