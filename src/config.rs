//! Configuration for a generator run.
//!
//! All paths and settings are resolved once at startup and carried in
//! [`Config`]; nothing downstream reads the working directory or the
//! environment on its own.

use crate::validation::validate_output_name;
use crate::{BootstrapError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default state file key inside the bucket.
pub const DEFAULT_STATE_KEY: &str = "terraform_state/statefile.tfstate";

/// Provisioning tool flavour.
///
/// OpenTofu accepts the same subcommands as Terraform, so both are driven by
/// the same provisioner; only the program name differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// HashiCorp Terraform (`terraform`)
    Terraform,
    /// OpenTofu (`tofu`)
    OpenTofu,
}

impl ToolKind {
    /// Program name looked up on `PATH`.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Terraform => "terraform",
            Self::OpenTofu => "tofu",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terraform => write!(f, "terraform"),
            Self::OpenTofu => write!(f, "opentofu"),
        }
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "terraform" | "tf" => Ok(Self::Terraform),
            "opentofu" | "tofu" => Ok(Self::OpenTofu),
            other => Err(format!("unknown provisioning tool: {}", other)),
        }
    }
}

/// Syntax of the generated backend file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Native HCL syntax (`backend.tf`)
    #[default]
    Hcl,
    /// Terraform JSON syntax (`backend.tf.json`)
    Json,
}

impl OutputFormat {
    /// File name used when none is configured.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::Hcl => "backend.tf",
            Self::Json => "backend.tf.json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hcl => write!(f, "hcl"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hcl" | "tf" => Ok(Self::Hcl),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// Names of the bootstrap outputs to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// Output holding the state bucket name
    pub bucket: String,
    /// Output holding the region
    pub region: String,
    /// Output holding the lock table name
    pub lock_table: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            bucket: "tf_state_bucket_name".to_string(),
            region: "region".to_string(),
            lock_table: "tf_state_lock_table".to_string(),
        }
    }
}

impl OutputNames {
    /// All three names in capture order.
    pub fn all(&self) -> [&str; 3] {
        [&self.bucket, &self.region, &self.lock_table]
    }
}

/// Fixed literals written into the backend block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    /// State object key inside the bucket
    pub state_key: String,
    /// Server-side encryption flag
    pub encrypt: bool,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            state_key: DEFAULT_STATE_KEY.to_string(),
            encrypt: true,
        }
    }
}

/// Configuration for a generator run.
///
/// ```
/// use tfbootstrap::{Config, OutputFormat, ToolKind};
///
/// let config = Config::new("/work/infrastructure")
///     .with_tool(ToolKind::OpenTofu)
///     .with_format(OutputFormat::Json);
///
/// assert_eq!(config.output_path().to_str(), Some("/work/infrastructure/backend.tf.json"));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Provisioning tool flavour
    pub tool: ToolKind,

    /// Explicit path to the tool binary (overrides `PATH` lookup)
    pub tool_path: Option<PathBuf>,

    /// Directory holding the bootstrap module
    pub bootstrap_dir: PathBuf,

    /// Directory receiving the backend file
    pub infrastructure_dir: PathBuf,

    /// Backend file name (default depends on `format`)
    pub output_file: Option<String>,

    /// Backend file syntax
    pub format: OutputFormat,

    /// Output names to capture
    pub output_names: OutputNames,

    /// Literal backend settings
    pub backend: BackendSettings,

    /// Skip `init`/`apply` and only read outputs
    pub skip_provision: bool,

    /// Render without writing
    pub dry_run: bool,
}

impl Config {
    /// Creates a configuration rooted at the given infrastructure directory.
    ///
    /// The bootstrap directory defaults to the sibling `../bootstrap`.
    pub fn new(infrastructure_dir: impl Into<PathBuf>) -> Self {
        let infrastructure_dir = infrastructure_dir.into();
        let bootstrap_dir = infrastructure_dir.join("..").join("bootstrap");

        Self {
            tool: ToolKind::Terraform,
            tool_path: None,
            bootstrap_dir,
            infrastructure_dir,
            output_file: None,
            format: OutputFormat::default(),
            output_names: OutputNames::default(),
            backend: BackendSettings::default(),
            skip_provision: false,
            dry_run: false,
        }
    }

    /// Creates a configuration rooted at the process working directory.
    pub fn from_current_dir() -> Result<Self> {
        Ok(Self::new(working_dir()?))
    }

    /// Sets the bootstrap directory.
    pub fn with_bootstrap_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.bootstrap_dir = dir.into();
        self
    }

    /// Sets the provisioning tool flavour.
    pub fn with_tool(mut self, tool: ToolKind) -> Self {
        self.tool = tool;
        self
    }

    /// Sets an explicit tool binary path.
    pub fn with_tool_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tool_path = Some(path.into());
        self
    }

    /// Sets the backend file name.
    pub fn with_output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = Some(name.into());
        self
    }

    /// Sets the backend file syntax.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the output names to capture.
    pub fn with_output_names(mut self, names: OutputNames) -> Self {
        self.output_names = names;
        self
    }

    /// Sets the state object key.
    pub fn with_state_key(mut self, key: impl Into<String>) -> Self {
        self.backend.state_key = key.into();
        self
    }

    /// Sets the encryption flag.
    pub fn with_encrypt(mut self, encrypt: bool) -> Self {
        self.backend.encrypt = encrypt;
        self
    }

    /// Skips `init`/`apply`.
    pub fn with_skip_provision(mut self, skip: bool) -> Self {
        self.skip_provision = skip;
        self
    }

    /// Renders without writing.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Anchors a relative tool path at `base`.
    ///
    /// The tool runs with the bootstrap directory as its working directory,
    /// so a path like `./tools/terraform` has to be fixed before spawning.
    /// Bare program names are left alone for `PATH` lookup.
    pub fn resolve_tool_path(mut self, base: &Path) -> Self {
        self.tool_path = self.tool_path.take().map(|path| {
            let is_bare_name = {
                let raw = path.to_string_lossy();
                !raw.contains('/') && !raw.contains(std::path::MAIN_SEPARATOR)
            };
            if path.is_relative() && !is_bare_name {
                base.join(&path)
            } else {
                path
            }
        });
        self
    }

    /// Program to execute for the provisioning tool.
    pub fn program(&self) -> String {
        match &self.tool_path {
            Some(path) => path.display().to_string(),
            None => self.tool.program().to_string(),
        }
    }

    /// Backend file name after applying the format default.
    pub fn output_file_name(&self) -> &str {
        self.output_file
            .as_deref()
            .unwrap_or_else(|| self.format.default_file_name())
    }

    /// Full path of the backend file.
    pub fn output_path(&self) -> PathBuf {
        self.infrastructure_dir.join(self.output_file_name())
    }

    /// Validates the configuration and the filesystem it points at.
    ///
    /// # Errors
    ///
    /// - [`BootstrapError::MissingDirectory`] if either directory is absent
    /// - [`BootstrapError::InvalidConfig`] for a bad file name, state key, or
    ///   output name
    pub fn validate(&self) -> Result<()> {
        require_dir(&self.bootstrap_dir)?;
        require_dir(&self.infrastructure_dir)?;

        let file_name = self.output_file_name();
        if file_name.is_empty()
            || file_name == "."
            || file_name == ".."
            || file_name.contains(['/', '\\'])
        {
            return Err(BootstrapError::InvalidConfig(format!(
                "output file must be a plain file name, got '{}'",
                file_name
            )));
        }

        if self.backend.state_key.trim().is_empty() {
            return Err(BootstrapError::InvalidConfig(
                "state key cannot be empty".to_string(),
            ));
        }

        for name in self.output_names.all() {
            validate_output_name(name)?;
        }

        Ok(())
    }
}

/// Returns the process working directory.
///
/// # Errors
///
/// Returns [`BootstrapError::InvalidConfig`] if it cannot be determined
/// (for example, it was deleted).
pub fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        BootstrapError::InvalidConfig(format!("cannot determine working directory: {}", e))
    })
}

fn require_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(BootstrapError::MissingDirectory(path.to_path_buf()))
    }
}
