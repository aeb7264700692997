//! Error types for backend generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`BootstrapError`].
pub type Result<T> = std::result::Result<T, BootstrapError>;

/// Errors that can occur while generating a backend configuration.
///
/// Every variant is terminal: the generator never retries, it reports the
/// failing stage and exits non-zero.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// A required working directory does not exist.
    #[error("directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// The configuration is internally inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The provisioning tool could not be found.
    #[error("provisioning tool not installed: {0}")]
    ToolNotInstalled(String),

    /// `init` or `apply` failed.
    #[error("{step} failed: {reason}")]
    Provisioning {
        /// Provisioning step ("init", "apply")
        step: String,
        /// What went wrong
        reason: String,
    },

    /// Reading a named output failed or produced an unusable value.
    #[error("could not capture output '{name}': {reason}")]
    OutputCapture {
        /// Output name
        name: String,
        /// What went wrong
        reason: String,
    },

    /// Writing the backend file failed.
    #[error("failed to write {}: {source}", .path.display())]
    FileWrite {
        /// Target path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Command exited non-zero.
    #[error("command execution failed: {0}")]
    CommandFailed(String),

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BootstrapError {
    /// Creates a provisioning error for the given step.
    pub fn provisioning(step: impl Into<String>, reason: impl ToString) -> Self {
        Self::Provisioning {
            step: step.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an output capture error for the given output name.
    ///
    /// # Example
    ///
    /// ```
    /// use tfbootstrap::BootstrapError;
    ///
    /// let err = BootstrapError::output_capture("region", "empty value");
    /// assert_eq!(err.to_string(), "could not capture output 'region': empty value");
    /// ```
    pub fn output_capture(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::OutputCapture {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a file write error for the given path.
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Names the pipeline stage this error belongs to.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MissingDirectory(_) | Self::InvalidConfig(_) => "validate",
            Self::ToolNotInstalled(_) | Self::Provisioning { .. } => "provision",
            Self::OutputCapture { .. } => "capture",
            Self::FileWrite { .. } => "write",
            Self::CommandFailed(_) | Self::Io(_) | Self::Json(_) | Self::Other(_) => "internal",
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
