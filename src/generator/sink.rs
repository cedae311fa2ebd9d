//! Output sinks.
//!
//! A sink persists one rendered artifact under a path relative to the output
//! root. Writes are create-or-overwrite; there is no merge with prior output.

use crate::error::{GenError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destination for generated artifacts.
pub trait Sink {
    /// Store `contents` at `path`, replacing anything already there.
    fn write(&mut self, path: &Path, contents: &str) -> Result<()>;
}

/// Writes artifacts below a root directory, creating directories as needed.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    /// Sink rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsSink { root: root.into() }
    }

    /// The output root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Sink for FsSink {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            // create_dir_all succeeds on existing directories
            fs::create_dir_all(parent).map_err(|source| GenError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&full, contents).map_err(|source| GenError::Io {
            path: full.clone(),
            source,
        })?;
        debug!(path = %full.display(), bytes = contents.len(), "wrote artifact");
        Ok(())
    }
}

/// Keeps artifacts in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Written artifacts
    pub files: BTreeMap<PathBuf, String>,
}

impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents written at `path`, if any.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }
}

impl Sink for MemorySink {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

/// Logs what would be written without touching the file system.
#[derive(Debug, Clone, Default)]
pub struct DryRunSink {
    /// Paths that would have been written, in write order
    pub paths: Vec<PathBuf>,
}

impl Sink for DryRunSink {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        info!(path = %path.display(), bytes = contents.len(), "dry run: would write");
        self.paths.push(path.to_path_buf());
        Ok(())
    }
}
