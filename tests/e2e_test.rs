/// End-to-end tests for the CLI
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// Exit code tests for CLI
mod exit_code_tests {
    use super::*;

    /// Exit code 0: Success - normal conversion
    #[test]
    fn test_exit_code_success() {
        cargo_bin_cmd!("bom-convert")
            .args(["-i", "tests/fixtures/bom-1.3.json", "-f", "xml"])
            .assert()
            .code(0);
    }

    /// Exit code 0: --help should return success
    #[test]
    fn test_exit_code_help() {
        cargo_bin_cmd!("bom-convert").arg("--help").assert().code(0);
    }

    /// Exit code 0: --version should return success
    #[test]
    fn test_exit_code_version() {
        cargo_bin_cmd!("bom-convert").arg("--version").assert().code(0);
    }

    /// Exit code 2: Invalid arguments
    #[test]
    fn test_exit_code_invalid_argument() {
        cargo_bin_cmd!("bom-convert")
            .arg("--invalid-option")
            .assert()
            .code(2);
    }

    /// Exit code 2: Invalid output format value
    #[test]
    fn test_exit_code_invalid_format() {
        cargo_bin_cmd!("bom-convert")
            .args(["-i", "tests/fixtures/bom-1.3.json", "-f", "yaml"])
            .assert()
            .code(2);
    }

    /// Exit code 1: Unsupported (format, version) pair
    #[test]
    fn test_exit_code_unsupported_pair() {
        cargo_bin_cmd!("bom-convert")
            .args(["-i", "tests/fixtures/bom-1.3.json", "-f", "csv", "-s", "1.0"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Unsupported BOM format: csv/1.0"));
    }

    /// Exit code 1: Schema version requested for tag-value output
    #[test]
    fn test_exit_code_schema_version_for_spdx() {
        cargo_bin_cmd!("bom-convert")
            .args(["-i", "tests/fixtures/bom-1.3.json", "-f", "spdxtag", "-s", "1.3"])
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Unsupported BOM format: spdxtag/1.3"));
    }

    /// Exit code 1: Input format cannot be detected
    #[test]
    fn test_exit_code_undetectable_input() {
        cargo_bin_cmd!("bom-convert")
            .args(["-i", "tests/fixtures/report.bom", "-f", "json"])
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("Unsupported BOM format: unsupported"))
            .stderr(predicate::str::contains("--input-format"));
    }

    /// Exit code 1: Requested version is newer than the newest known
    #[test]
    fn test_exit_code_upgrade_rejected() {
        cargo_bin_cmd!("bom-convert")
            .args(["-i", "tests/fixtures/bom-1.2.xml", "-f", "json", "-s", "1.4"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("newer than the newest"));
    }

    /// Exit code 1: Malformed input
    #[test]
    fn test_exit_code_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("broken.json");
        fs::write(&input, "{ \"bomFormat\": ").unwrap();

        cargo_bin_cmd!("bom-convert")
            .arg("-i")
            .arg(&input)
            .args(["-f", "xml"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Failed to parse json BOM"));
    }

    /// Exit code 3: Application error - missing input file
    #[test]
    fn test_exit_code_application_error_missing_input() {
        cargo_bin_cmd!("bom-convert")
            .args(["-i", "/nonexistent/path/bom.json", "-f", "xml"])
            .assert()
            .code(3);
    }

    /// Exit code 3: Application error - output directory does not exist
    #[test]
    fn test_exit_code_application_error_missing_output_dir() {
        cargo_bin_cmd!("bom-convert")
            .args([
                "-i",
                "tests/fixtures/bom-1.3.json",
                "-o",
                "/nonexistent/dir/out.xml",
            ])
            .assert()
            .code(3);
    }
}

#[test]
fn test_list_formats() {
    cargo_bin_cmd!("bom-convert")
        .arg("--list-formats")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("json/1.2"))
        .stdout(predicate::str::contains("xml/1.0"))
        .stdout(predicate::str::contains("spdxtag/SPDX-2.2"))
        .stdout(predicate::str::contains("csv/1.3"))
        .stdout(predicate::str::contains("csv/1.0").not());
}

#[test]
fn test_json_1_3_to_xml_1_0_on_stdout() {
    cargo_bin_cmd!("bom-convert")
        .args([
            "-i",
            "tests/fixtures/bom-1.3.json",
            "-f",
            "xml",
            "-s",
            "1.0",
        ])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("http://cyclonedx.org/schema/bom/1.0"))
        .stdout(predicate::str::contains("<name>serde</name>"))
        .stdout(predicate::str::contains("build-only-marker").not())
        .stdout(predicate::str::contains("compositions").not())
        .stderr(predicate::str::contains("Converted json input to xml/1.0"));
}

#[test]
fn test_output_file_format_detected_from_extension() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out.csv");

    cargo_bin_cmd!("bom-convert")
        .args(["-i", "tests/fixtures/bom-1.2.xml", "-o"])
        .arg(&output)
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());

    let csv = fs::read_to_string(&output).unwrap();
    assert!(csv.starts_with("Type,BomRef,"));
    assert!(csv.contains("tomcat-catalina"));
}

#[test]
fn test_stdin_with_explicit_input_format() {
    let csv = fs::read_to_string("tests/fixtures/components.csv").unwrap();

    cargo_bin_cmd!("bom-convert")
        .args(["--input-format", "csv", "-f", "json", "-s", "1.2"])
        .write_stdin(csv)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"specVersion\": \"1.2\""))
        .stdout(predicate::str::contains("acme, the app"));
}

#[test]
fn test_stdin_without_input_format_is_rejected() {
    cargo_bin_cmd!("bom-convert")
        .args(["-f", "json"])
        .write_stdin("{}")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--input-format"));
}

#[test]
fn test_spdx_round_trip_through_cli() {
    let temp_dir = TempDir::new().unwrap();
    let spdx = temp_dir.path().join("bom.spdx");

    cargo_bin_cmd!("bom-convert")
        .args(["-i", "tests/fixtures/bom-1.3.json", "-f", "spdxtag", "-s", "2.1", "-o"])
        .arg(&spdx)
        .assert()
        .code(0);

    let content = fs::read_to_string(&spdx).unwrap();
    assert!(content.starts_with("SPDXVersion: SPDX-2.1"));

    cargo_bin_cmd!("bom-convert")
        .arg("-i")
        .arg(&spdx)
        .args(["-f", "json"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"name\": \"serde\""))
        .stdout(predicate::str::contains("urn:uuid:3e671687-395b-41f5-a30f-a58921a69b79"));
}
