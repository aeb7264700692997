//! tfbootstrap - generate a Terraform S3 backend from bootstrap outputs.
//!
//! Remote state needs a bucket and a lock table before any other module can
//! use it. tfbootstrap applies the bootstrap module that creates them, reads
//! back its outputs, and writes the `backend "s3"` block the rest of the
//! infrastructure uses.
//!
//! # Features
//!
//! - **Explicit configuration**: every path and setting lives in [`Config`]
//! - **Pluggable tool**: Terraform and OpenTofu behind the [`Provisioner`] trait
//! - **Atomic writes**: the backend file is replaced, never left half-written
//! - **Test double**: an in-memory mock provisioner with error injection
//!
//! # Quick Start
//!
//! ```no_run
//! use tfbootstrap::provisioners::terraform::TerraformProvisioner;
//! use tfbootstrap::{Config, Generator};
//!
//! #[tokio::main]
//! async fn main() -> tfbootstrap::Result<()> {
//!     let config = Config::from_current_dir()?;
//!     let tool = TerraformProvisioner::new(&config);
//!
//!     let generated = Generator::new(config, tool).run().await?;
//!     println!("Generated {}", generated.path.display());
//!     Ok(())
//! }
//! ```
//!
//! # Generated file
//!
//! ```text
//! terraform {
//!   backend "s3" {
//!     bucket         = "<bucket>"
//!     key            = "terraform_state/statefile.tfstate"
//!     region         = "<region>"
//!     encrypt        = true
//!     dynamodb_table = "<lock_table>"
//!   }
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Notes |
//! |---------|---------|-------|
//! | `mock` | yes | In-memory [`provisioners::mock::MockProvisioner`] |

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod outputs;
pub mod provisioner;
pub mod provisioners;
pub mod render;
pub mod validation;
pub mod writer;

pub use config::{BackendSettings, Config, OutputFormat, OutputNames, ToolKind};
pub use error::{BootstrapError, Result};
pub use generator::{GeneratedBackend, Generator};
pub use outputs::BootstrapOutputs;
pub use provisioner::Provisioner;
