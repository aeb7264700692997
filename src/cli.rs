//! Subprocess helpers for driving the provisioning tool.

use crate::{BootstrapError, Result};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

fn build_command(program: &str, args: &[&str], cwd: &Path, env: &[(&str, &str)]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.current_dir(cwd);
    cmd.stdin(Stdio::null());

    for (key, value) in env {
        cmd.env(key, value);
    }

    cmd
}

fn spawn_error(program: &str, e: std::io::Error) -> BootstrapError {
    if e.kind() == std::io::ErrorKind::NotFound {
        BootstrapError::ToolNotInstalled(format!("{} command not found", program))
    } else {
        BootstrapError::Io(e)
    }
}

fn describe(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Executes a command in `cwd` and returns stdout as a string.
///
/// Used for commands whose output is consumed, such as `output -raw`.
///
/// # Errors
///
/// - [`BootstrapError::ToolNotInstalled`] if the program is not found
/// - [`BootstrapError::CommandFailed`] if the exit code is non-zero or the
///   output is not valid UTF-8
pub async fn run_command(
    program: &str,
    args: &[&str],
    cwd: &Path,
    env: &[(&str, &str)],
) -> Result<String> {
    log::debug!("running `{}` in {}", describe(program, args), cwd.display());

    let mut cmd = build_command(program, args, cwd, env);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().await.map_err(|e| spawn_error(program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BootstrapError::CommandFailed(format!(
            "`{}` failed with exit code {}: {}",
            describe(program, args),
            output.status.code().unwrap_or(-1),
            stderr.trim()
        )));
    }

    String::from_utf8(output.stdout).map_err(|e| {
        BootstrapError::CommandFailed(format!("invalid UTF-8 in command output: {}", e))
    })
}

/// Executes a command in `cwd` with stdout and stderr passed through to the
/// console.
///
/// Used for long-running steps like `init` and `apply` whose progress the
/// operator should see.
///
/// # Errors
///
/// - [`BootstrapError::ToolNotInstalled`] if the program is not found
/// - [`BootstrapError::CommandFailed`] if the exit code is non-zero
pub async fn run_streaming(
    program: &str,
    args: &[&str],
    cwd: &Path,
    env: &[(&str, &str)],
) -> Result<()> {
    log::debug!("running `{}` in {}", describe(program, args), cwd.display());

    let mut cmd = build_command(program, args, cwd, env);
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::inherit());

    let status = cmd.status().await.map_err(|e| spawn_error(program, e))?;

    if !status.success() {
        return Err(BootstrapError::CommandFailed(format!(
            "`{}` failed with exit code {}",
            describe(program, args),
            status.code().unwrap_or(-1)
        )));
    }

    Ok(())
}

/// Checks if a command-line tool is available.
///
/// Programs given as a path are checked on the filesystem; bare names are
/// looked up on `PATH`.
pub async fn check_command_exists(program: &str) -> Result<bool> {
    if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
        return Ok(Path::new(program).is_file());
    }

    let status = Command::new("which")
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(BootstrapError::Io)?;

    Ok(status.success())
}
