//! Atomic replacement of the backend file.
//!
//! Content is first written to a temp file next to the target, synced, and
//! then renamed over the target. A [`StagedFile`] that is dropped without
//! [`StagedFile::commit`] removes its temp file, leaving the previous target
//! (or its absence) untouched.

use crate::{BootstrapError, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fully written content waiting to replace `target`.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    target: PathBuf,
}

impl StagedFile {
    /// Writes `contents` to a temp file in the target's directory.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::FileWrite`] if the temp file cannot be
    /// created, written, or synced.
    pub fn stage(target: impl Into<PathBuf>, contents: &[u8]) -> Result<Self> {
        let target = target.into();
        let dir = parent_dir(&target);

        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut temp = tempfile::Builder::new()
            .prefix(&format!(".{}.", file_name))
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| BootstrapError::file_write(&target, e))?;

        write_synced(&mut temp, contents).map_err(|e| BootstrapError::file_write(&target, e))?;

        Ok(Self { temp, target })
    }

    /// Path of the staged temp file.
    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }

    /// Path the content will be moved to.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Atomically renames the staged file over the target.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::FileWrite`] if the rename fails; the temp
    /// file is removed in that case.
    pub fn commit(self) -> Result<PathBuf> {
        let Self { temp, target } = self;

        temp.persist(&target)
            .map_err(|e| BootstrapError::file_write(&target, e.error))?;

        // Make the rename itself durable where the platform allows it.
        let synced = File::open(parent_dir(&target)).and_then(|dir| dir.sync_all());
        if let Err(e) = synced {
            log::debug!("could not sync directory of {}: {}", target.display(), e);
        }

        Ok(target)
    }
}

fn write_synced(temp: &mut NamedTempFile, contents: &[u8]) -> std::io::Result<()> {
    temp.write_all(contents)?;
    temp.flush()?;
    temp.as_file().sync_all()
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Replaces `target` with `contents` atomically.
pub async fn write_atomic(target: &Path, contents: String) -> Result<PathBuf> {
    let staged_target = target.to_path_buf();
    tokio::task::spawn_blocking(move || {
        StagedFile::stage(staged_target, contents.as_bytes())?.commit()
    })
    .await
    .map_err(|e| write_task_failed(target, e))?
}

fn write_task_failed(target: &Path, e: tokio::task::JoinError) -> BootstrapError {
    BootstrapError::file_write(target, std::io::Error::other(format!("write task failed: {}", e)))
}
