//! Terraform / OpenTofu provisioner.
//!
//! Drives the `terraform` (or `tofu`) command-line tool. Both accept the
//! same subcommands:
//!
//! - `init`
//! - `apply -auto-approve`
//! - `output -raw <name>`
//!
//! `TF_IN_AUTOMATION` is set on every invocation so the tool skips hints
//! meant for interactive use.

use crate::cli::{check_command_exists, run_command, run_streaming};
use crate::{BootstrapError, Config, Provisioner, Result, ToolKind};
use async_trait::async_trait;
use std::path::Path;

const AUTOMATION_ENV: [(&str, &str); 1] = [("TF_IN_AUTOMATION", "1")];

/// Provisioner backed by the Terraform or OpenTofu CLI.
pub struct TerraformProvisioner {
    tool: ToolKind,
    program: String,
}

impl TerraformProvisioner {
    /// Creates a provisioner from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            tool: config.tool,
            program: config.program(),
        }
    }

    /// Program that will be executed.
    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Provisioner for TerraformProvisioner {
    fn name(&self) -> &str {
        match self.tool {
            ToolKind::Terraform => "terraform",
            ToolKind::OpenTofu => "opentofu",
        }
    }

    async fn check_installed(&self) -> Result<()> {
        if !check_command_exists(&self.program).await? {
            return Err(BootstrapError::ToolNotInstalled(format!(
                "{} command not found - install {} or pass --tool-path",
                self.program, self.tool
            )));
        }
        Ok(())
    }

    async fn initialize(&mut self, dir: &Path) -> Result<()> {
        run_streaming(&self.program, &["init"], dir, &AUTOMATION_ENV)
            .await
            .map_err(|e| match e {
                BootstrapError::ToolNotInstalled(_) => e,
                other => BootstrapError::provisioning("init", other),
            })
    }

    async fn apply(&mut self, dir: &Path) -> Result<()> {
        run_streaming(&self.program, &["apply", "-auto-approve"], dir, &AUTOMATION_ENV)
            .await
            .map_err(|e| match e {
                BootstrapError::ToolNotInstalled(_) => e,
                other => BootstrapError::provisioning("apply", other),
            })
    }

    async fn read_output(&self, dir: &Path, name: &str) -> Result<String> {
        run_command(&self.program, &["output", "-raw", name], dir, &AUTOMATION_ENV)
            .await
            .map_err(|e| BootstrapError::output_capture(name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_from_config() {
        let config = Config::new("/infra");
        let tool = TerraformProvisioner::new(&config);
        assert_eq!(tool.program(), "terraform");
        assert_eq!(tool.name(), "terraform");

        let config = Config::new("/infra").with_tool(ToolKind::OpenTofu);
        let tool = TerraformProvisioner::new(&config);
        assert_eq!(tool.program(), "tofu");
        assert_eq!(tool.name(), "opentofu");
    }

    #[tokio::test]
    async fn test_missing_tool_path() {
        let config = Config::new("/infra").with_tool_path("/nonexistent/bin/terraform");
        let tool = TerraformProvisioner::new(&config);

        let result = tool.check_installed().await;
        assert!(matches!(result, Err(BootstrapError::ToolNotInstalled(_))));
    }

    #[tokio::test]
    async fn test_output_failure_maps_to_capture_error() {
        // `false` ignores its arguments and exits 1.
        let config = Config::new("/infra").with_tool_path("false");
        let tool = TerraformProvisioner::new(&config);

        let dir = std::env::temp_dir();
        let result = tool.read_output(&dir, "region").await;
        assert!(matches!(
            result,
            Err(BootstrapError::OutputCapture { ref name, .. }) if name == "region"
        ));
    }

    #[tokio::test]
    async fn test_apply_failure_maps_to_provisioning_error() {
        let config = Config::new("/infra").with_tool_path("false");
        let mut tool = TerraformProvisioner::new(&config);

        let dir = std::env::temp_dir();
        let result = tool.apply(&dir).await;
        assert!(matches!(
            result,
            Err(BootstrapError::Provisioning { ref step, .. }) if step == "apply"
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_utf8_output_maps_to_capture_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("terraform");
        std::fs::write(&script, "#!/bin/sh\nprintf '\\377'\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = Config::new("/infra").with_tool_path(&script);
        let tool = TerraformProvisioner::new(&config);

        let result = tool.read_output(dir.path(), "tf_state_bucket_name").await;
        assert!(matches!(
            result,
            Err(BootstrapError::OutputCapture { ref name, ref reason })
                if name == "tf_state_bucket_name" && reason.contains("UTF-8")
        ));
    }
}
