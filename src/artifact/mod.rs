//! Atomic artifact publication
//!
//! All planning artifacts are staged into a temporary directory next to
//! the output directory and renamed into place only after every one of
//! them rendered successfully. A failure mid-translation therefore
//! never leaves a half-written manifest or environment file behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from artifact publication
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A set of named artifacts staged in memory until published.
#[derive(Debug, Default)]
pub struct ArtifactSet {
    files: Vec<(String, String)>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage one artifact body under a file name.
    pub fn add(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        self.files.push((name.into(), contents.into()));
    }

    /// Names of the staged artifacts, in add order.
    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Publish all staged artifacts into `outdir`.
    ///
    /// Files are first written into a temp dir on the same filesystem,
    /// then renamed to their final paths, so readers of `outdir` never
    /// observe a partially written artifact.
    pub fn publish(&self, outdir: &Path) -> Result<Vec<PathBuf>, ArtifactError> {
        fs::create_dir_all(outdir)?;
        let staging = tempfile::tempdir_in(outdir)?;

        let mut staged = Vec::new();
        for (name, contents) in &self.files {
            let path = staging.path().join(name);
            fs::write(&path, contents)?;
            staged.push((path, outdir.join(name)));
        }

        let mut published = Vec::new();
        for (from, to) in staged {
            fs::rename(&from, &to)?;
            tracing::debug!(path = %to.display(), "published artifact");
            published.push(to);
        }
        Ok(published)
    }
}
