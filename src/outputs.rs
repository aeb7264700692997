//! Captured bootstrap outputs.

use crate::validation::validate_output_value;
use crate::{OutputNames, Provisioner, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The three values read from the bootstrap module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapOutputs {
    /// State bucket name
    pub bucket: String,
    /// Region of the bucket and lock table
    pub region: String,
    /// Lock table name
    pub lock_table: String,
}

impl BootstrapOutputs {
    /// Builds outputs from already-trimmed values, validating each one.
    pub fn new(
        names: &OutputNames,
        bucket: impl Into<String>,
        region: impl Into<String>,
        lock_table: impl Into<String>,
    ) -> Result<Self> {
        let outputs = Self {
            bucket: bucket.into(),
            region: region.into(),
            lock_table: lock_table.into(),
        };

        validate_output_value(&names.bucket, &outputs.bucket)?;
        validate_output_value(&names.region, &outputs.region)?;
        validate_output_value(&names.lock_table, &outputs.lock_table)?;

        Ok(outputs)
    }
}

/// Reads the bucket, region, and lock table outputs from `dir`.
///
/// Each value is trimmed of surrounding whitespace and must be non-empty.
///
/// # Errors
///
/// Returns [`BootstrapError::OutputCapture`](crate::BootstrapError::OutputCapture)
/// naming the first output that could not be read or was unusable.
pub async fn capture<P>(provisioner: &P, dir: &Path, names: &OutputNames) -> Result<BootstrapOutputs>
where
    P: Provisioner + ?Sized,
{
    let bucket = read_trimmed(provisioner, dir, &names.bucket).await?;
    let region = read_trimmed(provisioner, dir, &names.region).await?;
    let lock_table = read_trimmed(provisioner, dir, &names.lock_table).await?;

    BootstrapOutputs::new(names, bucket, region, lock_table)
}

async fn read_trimmed<P>(provisioner: &P, dir: &Path, name: &str) -> Result<String>
where
    P: Provisioner + ?Sized,
{
    let raw = provisioner.read_output(dir, name).await?;
    let value = raw.trim().to_string();
    log::debug!("captured output {} = {}", name, value);
    Ok(value)
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::provisioners::mock::MockProvisioner;
    use crate::BootstrapError;

    #[tokio::test]
    async fn test_capture_trims_whitespace() {
        let tool = MockProvisioner::with_outputs(" mybucket\n", "\tus-west-2 ", "locks\r\n").await;

        let outputs = capture(&tool, Path::new("/bootstrap"), &OutputNames::default())
            .await
            .unwrap();

        assert_eq!(outputs.bucket, "mybucket");
        assert_eq!(outputs.region, "us-west-2");
        assert_eq!(outputs.lock_table, "locks");
    }

    #[tokio::test]
    async fn test_capture_rejects_blank_output() {
        let tool = MockProvisioner::with_outputs("mybucket", "   \n", "locks").await;

        let result = capture(&tool, Path::new("/bootstrap"), &OutputNames::default()).await;
        match result {
            Err(BootstrapError::OutputCapture { name, .. }) => assert_eq!(name, "region"),
            other => panic!("Expected `OutputCapture` error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_capture_custom_names() {
        let tool = MockProvisioner::new();
        tool.set_output("state_bucket", "b").await;
        tool.set_output("aws_region", "r").await;
        tool.set_output("lock", "l").await;

        let names = OutputNames {
            bucket: "state_bucket".to_string(),
            region: "aws_region".to_string(),
            lock_table: "lock".to_string(),
        };
        let outputs = capture(&tool, Path::new("/bootstrap"), &names).await.unwrap();

        assert_eq!(outputs.bucket, "b");
        assert_eq!(outputs.region, "r");
        assert_eq!(outputs.lock_table, "l");
    }
}
