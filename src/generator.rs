//! The backend generation pipeline.
//!
//! Steps run strictly in order and the first failure aborts the run:
//!
//! 1. validate the configured directories
//! 2. `init` + `apply` the bootstrap module (unless skipped)
//! 3. capture the bucket, region, and lock table outputs
//! 4. render the backend block
//! 5. atomically write it into the infrastructure directory (unless dry run)

use crate::outputs::{capture, BootstrapOutputs};
use crate::render::render;
use crate::writer::write_atomic;
use crate::{Config, Provisioner, Result};
use std::path::PathBuf;

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBackend {
    /// Where the file was written (or would be, for a dry run)
    pub path: PathBuf,
    /// Captured outputs
    pub outputs: BootstrapOutputs,
    /// Rendered file contents
    pub contents: String,
    /// Whether the file was actually written
    pub written: bool,
}

/// Runs the pipeline against a provisioner.
pub struct Generator<P: Provisioner> {
    config: Config,
    provisioner: P,
}

impl<P: Provisioner> Generator<P> {
    /// Creates a generator; nothing runs until [`Generator::run`].
    pub fn new(config: Config, provisioner: P) -> Self {
        Self {
            config,
            provisioner,
        }
    }

    /// Configuration this generator was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Provisioner driven by this generator.
    pub fn provisioner(&self) -> &P {
        &self.provisioner
    }

    /// Executes every step and returns what was generated.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; see
    /// [`BootstrapError::stage`](crate::BootstrapError::stage) for which step
    /// failed. No file is written unless every earlier step succeeded.
    pub async fn run(&mut self) -> Result<GeneratedBackend> {
        self.config.validate()?;
        log::info!(
            "bootstrap directory: {}, infrastructure directory: {}",
            self.config.bootstrap_dir.display(),
            self.config.infrastructure_dir.display()
        );

        self.provision().await?;

        let outputs = capture(
            &self.provisioner,
            &self.config.bootstrap_dir,
            &self.config.output_names,
        )
        .await?;
        log::info!(
            "captured bucket={} region={} lock_table={}",
            outputs.bucket,
            outputs.region,
            outputs.lock_table
        );

        let contents = render(self.config.format, &outputs, &self.config.backend)?;
        let path = self.config.output_path();

        if self.config.dry_run {
            log::info!("dry run, not writing {}", path.display());
            return Ok(GeneratedBackend {
                path,
                outputs,
                contents,
                written: false,
            });
        }

        let path = write_atomic(&path, contents.clone()).await?;
        log::info!("wrote {}", path.display());

        Ok(GeneratedBackend {
            path,
            outputs,
            contents,
            written: true,
        })
    }

    async fn provision(&mut self) -> Result<()> {
        if self.config.skip_provision {
            log::info!("skipping provisioning of bootstrap resources");
            return Ok(());
        }

        self.provisioner.check_installed().await?;

        let dir = &self.config.bootstrap_dir;
        log::info!("{}: init", self.provisioner.name());
        self.provisioner.initialize(dir).await?;
        log::info!("{}: apply", self.provisioner.name());
        self.provisioner.apply(dir).await?;
        Ok(())
    }
}
