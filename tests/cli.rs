use assert_cmd::Command;

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.assert().success();
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("anntier 0.3.0\n");
}

// Validate subcommand tests

#[test]
fn validate_valid_transcription_succeeds() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args(["validate", "tests/fixtures/sample_valid.json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Validation passed"));
}

#[test]
fn validate_invalid_transcription_fails() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args(["validate", "tests/fixtures/sample_invalid.json"]);
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("error(s)"));
}

#[test]
fn validate_reports_overlap() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args(["validate", "tests/fixtures/sample_invalid.json"]);
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("OverlappingAnnotations"));
}

#[test]
fn validate_reports_dangling_link() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args(["validate", "tests/fixtures/sample_invalid.json"]);
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("DanglingLink"));
}

#[test]
fn validate_reports_duplicate_tier_name() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args(["validate", "tests/fixtures/sample_invalid.json"]);
    cmd.assert()
        .failure()
        .stdout(predicates::str::contains("DuplicateTierName"));
}

#[test]
fn validate_warnings_pass_by_default() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args(["validate", "tests/fixtures/sample_warnings.json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("EmptyTier"));
}

#[test]
fn validate_strict_promotes_warnings() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args(["validate", "tests/fixtures/sample_warnings.json", "--strict"]);
    cmd.assert().failure();
}

#[test]
fn validate_json_output_format() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args([
        "validate",
        "tests/fixtures/sample_valid.json",
        "--output",
        "json",
    ]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("\"error_count\": 0"))
        .stdout(predicates::str::contains("\"warning_count\": 0"));
}

#[test]
fn validate_unsupported_output_fails() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args([
        "validate",
        "tests/fixtures/sample_valid.json",
        "--output",
        "not-a-format",
    ]);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Unsupported output format"));
}

#[test]
fn validate_nonexistent_file_fails() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args(["validate", "nonexistent_file.json"]);
    cmd.assert().failure();
}

#[test]
fn validate_malformed_json_reports_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("malformed.json");
    std::fs::write(&path, "{\"name\": \"broken\", \"tiers\": [{").unwrap();

    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.arg("validate").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Failed to parse"));
}

#[test]
fn validate_rejects_invalid_interval_at_parse_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inverted.json");
    let json = std::fs::read_to_string("tests/fixtures/sample_valid.json")
        .unwrap()
        .replacen("\"midpoint\": 0.0", "\"midpoint\": 99.0", 1);
    std::fs::write(&path, json).unwrap();

    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.arg("validate").arg(&path);
    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Failed to parse"));
}

// Inspect subcommand tests

#[test]
fn inspect_lists_tiers() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args(["inspect", "tests/fixtures/sample_valid.json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("3 tier(s)"))
        .stdout(predicates::str::contains("'Phonemes'"))
        .stdout(predicates::str::contains("'Tokens'"))
        .stdout(predicates::str::contains("TimeAlignment"));
}

#[test]
fn inspect_shows_extents() {
    let mut cmd = Command::cargo_bin("anntier").unwrap();
    cmd.args(["inspect", "tests/fixtures/sample_valid.json"]);
    cmd.assert()
        .success()
        .stdout(predicates::str::contains("[0.000, 2.000]"));
}
