/// End-to-end tests for config file loading and CLI option merging.
///
/// These tests exercise the full flow from config file on disk through CLI invocation
/// to correct output, using `assert_cmd` and `tempfile` for isolated test environments.
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Auto-discovery
// ============================================================================

#[test]
fn test_discovered_config_sets_output_target() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        temp_dir.path(),
        "bom-convert.config.yml",
        "output_format: xml\noutput_version: \"1.1\"\n",
    );

    cargo_bin_cmd!("bom-convert")
        .current_dir(temp_dir.path())
        .arg("-i")
        .arg(fixture_path("bom-1.3.json"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("http://cyclonedx.org/schema/bom/1.1"));
}

#[test]
fn test_cli_flags_override_discovered_config() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        temp_dir.path(),
        "bom-convert.config.yml",
        "output_format: xml\noutput_version: \"1.1\"\n",
    );

    cargo_bin_cmd!("bom-convert")
        .current_dir(temp_dir.path())
        .arg("-i")
        .arg(fixture_path("bom-1.3.json"))
        .args(["-f", "json", "-s", "1.2"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"specVersion\": \"1.2\""));
}

#[test]
fn test_config_input_format_applies_to_stdin() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        temp_dir.path(),
        "bom-convert.config.yml",
        "input_format: csv\noutput_format: json\n",
    );
    let csv = fs::read_to_string(fixture_path("components.csv")).unwrap();

    cargo_bin_cmd!("bom-convert")
        .current_dir(temp_dir.path())
        .write_stdin(csv)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"name\": \"serde\""));
}

// ============================================================================
// Explicit --config
// ============================================================================

#[test]
fn test_explicit_config_path() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        "custom.yml",
        "output_format: spdxtag\noutput_version: SPDX-2.1\n",
    );

    cargo_bin_cmd!("bom-convert")
        .arg("-i")
        .arg(fixture_path("bom-1.3.json"))
        .arg("-c")
        .arg(&config)
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("SPDXVersion: SPDX-2.1"));
}

#[test]
fn test_explicit_config_missing_is_application_error() {
    cargo_bin_cmd!("bom-convert")
        .arg("-i")
        .arg(fixture_path("bom-1.3.json"))
        .args(["-f", "json", "-c", "/nonexistent/bom-convert.config.yml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to read config file"));
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_invalid_config_value_is_application_error() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        temp_dir.path(),
        "bom-convert.config.yml",
        "output_format: yaml\n",
    );

    cargo_bin_cmd!("bom-convert")
        .current_dir(temp_dir.path())
        .arg("-i")
        .arg(fixture_path("bom-1.3.json"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid config: output_format"));
}

#[test]
fn test_invalid_yaml_is_application_error() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        temp_dir.path(),
        "bom-convert.config.yml",
        "output_format: [unclosed\n",
    );

    cargo_bin_cmd!("bom-convert")
        .current_dir(temp_dir.path())
        .arg("-i")
        .arg(fixture_path("bom-1.3.json"))
        .args(["-f", "json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_unknown_config_field_warns() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        temp_dir.path(),
        "bom-convert.config.yml",
        "output_format: json\nexclude_packages: [pip]\n",
    );

    cargo_bin_cmd!("bom-convert")
        .current_dir(temp_dir.path())
        .arg("-i")
        .arg(fixture_path("bom-1.3.json"))
        .assert()
        .code(0)
        .stderr(predicate::str::contains(
            "Unknown config field 'exclude_packages'",
        ));
}

#[test]
fn test_list_formats_ignores_broken_config() {
    let temp_dir = TempDir::new().unwrap();
    write_config(
        temp_dir.path(),
        "bom-convert.config.yml",
        "output_format: yaml\n",
    );

    cargo_bin_cmd!("bom-convert")
        .current_dir(temp_dir.path())
        .arg("--list-formats")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("xml/1.3"));
}
