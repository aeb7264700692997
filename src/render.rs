//! Rendering of the S3 backend block.
//!
//! Rendering is pure: the same outputs and settings always produce the same
//! bytes.

use crate::{BackendSettings, BootstrapOutputs, OutputFormat, Result};
use serde::Serialize;

/// Settings of an `s3` backend block, in the order they are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3Backend<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    pub region: &'a str,
    pub encrypt: bool,
    pub dynamodb_table: &'a str,
}

impl<'a> S3Backend<'a> {
    pub fn new(outputs: &'a BootstrapOutputs, settings: &'a BackendSettings) -> Self {
        Self {
            bucket: &outputs.bucket,
            key: &settings.state_key,
            region: &outputs.region,
            encrypt: settings.encrypt,
            dynamodb_table: &outputs.lock_table,
        }
    }

    /// Renders the block in HCL syntax.
    ///
    /// ```
    /// use tfbootstrap::render::S3Backend;
    ///
    /// let block = S3Backend {
    ///     bucket: "b",
    ///     key: "k",
    ///     region: "r",
    ///     encrypt: true,
    ///     dynamodb_table: "t",
    /// };
    /// assert!(block.to_hcl().contains("dynamodb_table = \"t\""));
    /// ```
    pub fn to_hcl(&self) -> String {
        format!(
            concat!(
                "terraform {{\n",
                "  backend \"s3\" {{\n",
                "    bucket         = \"{bucket}\"\n",
                "    key            = \"{key}\"\n",
                "    region         = \"{region}\"\n",
                "    encrypt        = {encrypt}\n",
                "    dynamodb_table = \"{table}\"\n",
                "  }}\n",
                "}}\n",
            ),
            bucket = self.bucket,
            key = self.key,
            region = self.region,
            encrypt = self.encrypt,
            table = self.dynamodb_table,
        )
    }

    /// Renders the block in Terraform JSON syntax.
    pub fn to_json(&self) -> Result<String> {
        let document = JsonDocument {
            terraform: JsonTerraform {
                backend: JsonBackend { s3: self },
            },
        };
        let mut rendered = serde_json::to_string_pretty(&document)?;
        rendered.push('\n');
        Ok(rendered)
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    terraform: JsonTerraform<'a>,
}

#[derive(Serialize)]
struct JsonTerraform<'a> {
    backend: JsonBackend<'a>,
}

#[derive(Serialize)]
struct JsonBackend<'a> {
    s3: &'a S3Backend<'a>,
}

/// Renders the backend file contents in the requested format.
pub fn render(
    format: OutputFormat,
    outputs: &BootstrapOutputs,
    settings: &BackendSettings,
) -> Result<String> {
    let block = S3Backend::new(outputs, settings);
    match format {
        OutputFormat::Hcl => Ok(block.to_hcl()),
        OutputFormat::Json => block.to_json(),
    }
}
