//! Provisioner trait definition.
//!
//! [`Provisioner`] is the seam between the generator and the external
//! infrastructure tool. The real implementation shells out to Terraform or
//! OpenTofu; tests substitute the in-memory mock.

use crate::Result;
use async_trait::async_trait;
use std::path::Path;

/// Provisioner drives an infrastructure-as-code tool against a module
/// directory.
///
/// Every call blocks until the underlying operation finishes. Implementations
/// do not retry; the tool is assumed idempotent so a failed run is simply
/// rerun by the operator.
///
/// # Example
///
/// ```no_run
/// use tfbootstrap::{Config, Provisioner};
/// use tfbootstrap::provisioners::terraform::TerraformProvisioner;
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() -> tfbootstrap::Result<()> {
///     let config = Config::new("/work/infrastructure");
///     let mut tool = TerraformProvisioner::new(&config);
///     tool.check_installed().await?;
///
///     let dir = Path::new("/work/bootstrap");
///     tool.initialize(dir).await?;
///     tool.apply(dir).await?;
///     let bucket = tool.read_output(dir, "tf_state_bucket_name").await?;
///
///     println!("bucket: {}", bucket);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Returns the provisioner name (e.g., "terraform", "opentofu", "mock").
    fn name(&self) -> &str;

    /// Verifies the tool is available before any step runs.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::ToolNotInstalled`](crate::BootstrapError::ToolNotInstalled)
    /// if the tool cannot be found.
    async fn check_installed(&self) -> Result<()>;

    /// Initializes the module in `dir` (`init`).
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Provisioning`](crate::BootstrapError::Provisioning)
    /// if the tool exits non-zero.
    async fn initialize(&mut self, dir: &Path) -> Result<()>;

    /// Applies the module in `dir` without prompting (`apply -auto-approve`).
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Provisioning`](crate::BootstrapError::Provisioning)
    /// if the tool exits non-zero.
    async fn apply(&mut self, dir: &Path) -> Result<()>;

    /// Reads a single named output as raw text (`output -raw <name>`).
    ///
    /// The value is returned exactly as printed; callers trim it.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::OutputCapture`](crate::BootstrapError::OutputCapture)
    /// if the tool exits non-zero or prints non-UTF-8 text.
    async fn read_output(&self, dir: &Path, name: &str) -> Result<String>;
}
