//! Binary behaviour: exit codes, diagnostics, and flags.

#![cfg(unix)]

mod common;

use assert_cmd::Command;
use common::{StubTool, Workspace, EXPECTED_BACKEND};
use predicates::str::contains;

const ENV_VARS: [&str; 14] = [
    "TFBOOTSTRAP_BOOTSTRAP_DIR",
    "TFBOOTSTRAP_INFRASTRUCTURE_DIR",
    "TFBOOTSTRAP_TOOL",
    "TFBOOTSTRAP_TOOL_PATH",
    "TFBOOTSTRAP_OUTPUT_FILE",
    "TFBOOTSTRAP_FORMAT",
    "TFBOOTSTRAP_STATE_KEY",
    "TFBOOTSTRAP_NO_ENCRYPT",
    "TFBOOTSTRAP_BUCKET_OUTPUT",
    "TFBOOTSTRAP_REGION_OUTPUT",
    "TFBOOTSTRAP_LOCK_TABLE_OUTPUT",
    "TFBOOTSTRAP_SKIP_PROVISION",
    "TFBOOTSTRAP_DRY_RUN",
    "TF_IN_AUTOMATION",
];

/// The binary run from the infrastructure directory with a clean environment.
fn bare_cmd(ws: &Workspace) -> Command {
    let mut cmd = Command::cargo_bin("tfbootstrap").unwrap();
    cmd.current_dir(&ws.infrastructure).env_remove("RUST_LOG");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn cmd(ws: &Workspace, stub: &StubTool) -> Command {
    let tool_path = stub.install(&ws.root);
    let mut cmd = bare_cmd(ws);
    cmd.arg("--tool-path").arg(tool_path);
    cmd
}

#[test]
fn generates_backend() {
    let ws = Workspace::new();

    cmd(&ws, &StubTool::default())
        .assert()
        .success()
        .stdout(contains("Generated"))
        .stdout(contains("backend.tf"));

    assert_eq!(ws.read_backend(), EXPECTED_BACKEND);
}

#[test]
fn missing_bootstrap_exits_one() {
    let ws = Workspace::without_bootstrap();

    cmd(&ws, &StubTool::default())
        .assert()
        .code(1)
        .stderr(contains("Error: [validate]"))
        .stderr(contains("bootstrap"));

    assert!(!ws.backend_file().exists());
}

#[test]
fn apply_failure_exits_one() {
    let ws = Workspace::new();
    let stub = StubTool {
        apply_code: 1,
        ..Default::default()
    };

    cmd(&ws, &stub)
        .assert()
        .code(1)
        .stderr(contains("Error: [provision] apply failed"));

    assert!(!ws.backend_file().exists());
}

#[test]
fn dry_run_prints_backend() {
    let ws = Workspace::new();

    cmd(&ws, &StubTool::default())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(EXPECTED_BACKEND);

    assert!(!ws.backend_file().exists());
}

#[test]
fn custom_state_key_and_encrypt() {
    let ws = Workspace::new();

    cmd(&ws, &StubTool::default())
        .args(["--state-key", "prod/app.tfstate", "--no-encrypt"])
        .assert()
        .success();

    let backend = ws.read_backend();
    assert!(backend.contains("key            = \"prod/app.tfstate\""));
    assert!(backend.contains("encrypt        = false"));
}

#[test]
fn relative_tool_path_resolves_from_working_directory() {
    let ws = Workspace::new();
    let tools = ws.infrastructure.join("tools");
    std::fs::create_dir(&tools).unwrap();
    StubTool::default().install(&tools);

    bare_cmd(&ws)
        .args(["--tool-path", "./tools/terraform"])
        .assert()
        .success()
        .stdout(contains("Generated"));

    assert_eq!(ws.read_backend(), EXPECTED_BACKEND);
    assert_eq!(
        common::stub_calls(&tools),
        vec![
            "init",
            "apply -auto-approve",
            "output -raw tf_state_bucket_name",
            "output -raw region",
            "output -raw tf_state_lock_table",
        ]
    );
}

#[test]
fn flags_read_from_environment() {
    let ws = Workspace::new();

    cmd(&ws, &StubTool::default())
        .env("TFBOOTSTRAP_STATE_KEY", "env/app.tfstate")
        .env("TFBOOTSTRAP_NO_ENCRYPT", "true")
        .env("TFBOOTSTRAP_DRY_RUN", "true")
        .assert()
        .success()
        .stdout(contains("key            = \"env/app.tfstate\""))
        .stdout(contains("encrypt        = false"));

    assert!(!ws.backend_file().exists());
}
