use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn apigw() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_apigw"));
    cmd.env_remove("AKAMAI_EDGERC")
        .env_remove("AKAMAI_EDGERC_SECTION")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_command() {
    let output = apigw().arg("--help").output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("apigw"));
    assert!(stdout.contains("activate"));
}

#[test]
fn test_update_with_missing_file_fails_before_network() {
    let temp_dir = TempDir::new().unwrap();
    let output = apigw()
        .args(["update", "--name", "Demo", "API", "--file"])
        .arg(temp_dir.path().join("missing.yaml"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a valid file"));
}

#[test]
fn test_update_with_unknown_format_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("openapi.yaml");
    fs::write(&file, "openapi: 3.0.0\npaths: {}\n").unwrap();

    let output = apigw()
        .args(["update", "--name", "Demo", "--file"])
        .arg(&file)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot determine definition format"));
}

#[test]
fn test_missing_credentials_section_fails() {
    let temp_dir = TempDir::new().unwrap();
    let edgerc = temp_dir.path().join(".edgerc");
    fs::write(
        &edgerc,
        "[default]\nhost = h\nclient_token = c\nclient_secret = s\naccess_token = a\n",
    )
    .unwrap();

    let output = apigw()
        .arg("--config")
        .arg(&edgerc)
        .args(["--section", "ci", "status", "--name", "Demo"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[ci]"));
}

#[test]
fn test_activate_rejects_unknown_network() {
    let output = apigw()
        .args(["activate", "--name", "Demo", "--network", "preprod", "--email", "a@b.c"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}
