//! Mock provisioner for testing.
//!
//! Holds outputs in memory, records every call, and supports error
//! injection so generator failure paths can be exercised without a real
//! tool.

use crate::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A recorded provisioner call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `initialize(dir)`
    Initialize(PathBuf),
    /// `apply(dir)`
    Apply(PathBuf),
    /// `read_output(dir, name)`
    ReadOutput(PathBuf, String),
}

/// Mock provisioner for testing.
///
/// # Example
///
/// ```
/// use tfbootstrap::provisioners::mock::MockProvisioner;
/// use tfbootstrap::{BootstrapError, Provisioner};
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() -> tfbootstrap::Result<()> {
///     let mut tool = MockProvisioner::new();
///     tool.set_output("region", " eu-west-1\n").await;
///
///     let dir = Path::new("/bootstrap");
///     assert_eq!(tool.read_output(dir, "region").await?, " eu-west-1\n");
///
///     tool.apply_error = Some(BootstrapError::CommandFailed("exit 1".to_string()));
///     assert!(tool.apply(dir).await.is_err());
///     Ok(())
/// }
/// ```
pub struct MockProvisioner {
    outputs: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<MockCall>>>,

    /// Report the tool as not installed from `check_installed()`
    pub not_installed: bool,
    /// Error to return from `initialize()`
    pub init_error: Option<BootstrapError>,
    /// Error to return from `apply()`
    pub apply_error: Option<BootstrapError>,
    /// Error to return from `read_output()`
    pub output_error: Option<BootstrapError>,
}

impl MockProvisioner {
    /// Creates a new mock provisioner with no outputs.
    pub fn new() -> Self {
        Self {
            outputs: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            not_installed: false,
            init_error: None,
            apply_error: None,
            output_error: None,
        }
    }

    /// Creates a mock pre-populated with the three default bootstrap outputs.
    pub async fn with_outputs(bucket: &str, region: &str, lock_table: &str) -> Self {
        let mock = Self::new();
        let names = OutputNames::default();
        mock.set_output(names.bucket, bucket).await;
        mock.set_output(names.region, region).await;
        mock.set_output(names.lock_table, lock_table).await;
        mock
    }

    /// Sets the raw text returned for an output.
    pub async fn set_output(&self, name: impl Into<String>, value: impl Into<String>) {
        let mut outputs = self.outputs.write().await;
        outputs.insert(name.into(), value.into());
    }

    /// Returns every call made so far, in order.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.read().await.clone()
    }

    async fn record(&self, call: MockCall) {
        self.calls.write().await.push(call);
    }
}

impl Default for MockProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provisioner for MockProvisioner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn check_installed(&self) -> Result<()> {
        if self.not_installed {
            return Err(BootstrapError::ToolNotInstalled("mock".to_string()));
        }
        Ok(())
    }

    async fn initialize(&mut self, dir: &Path) -> Result<()> {
        self.record(MockCall::Initialize(dir.to_path_buf())).await;
        if let Some(ref err) = self.init_error {
            return Err(BootstrapError::provisioning("init", err));
        }
        Ok(())
    }

    async fn apply(&mut self, dir: &Path) -> Result<()> {
        self.record(MockCall::Apply(dir.to_path_buf())).await;
        if let Some(ref err) = self.apply_error {
            return Err(BootstrapError::provisioning("apply", err));
        }
        Ok(())
    }

    async fn read_output(&self, dir: &Path, name: &str) -> Result<String> {
        self.record(MockCall::ReadOutput(dir.to_path_buf(), name.to_string()))
            .await;
        if let Some(ref err) = self.output_error {
            return Err(BootstrapError::output_capture(name, err));
        }

        let outputs = self.outputs.read().await;
        outputs
            .get(name)
            .cloned()
            .ok_or_else(|| BootstrapError::output_capture(name, "output not found"))
    }
}
