//! Document I/O and intermediate file staging

use crate::types::*;
use lopdf::Document;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Prefix of staging directories
const STAGING_PREFIX: &str = "pocketbook-";

/// Load a single PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Save a document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        doc.compress();
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, BookletError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// A private, uniquely named directory for intermediate documents.
///
/// The directory and everything in it is removed when the value is dropped,
/// so an early return from any stage still cleans up.
pub(crate) struct StagingArea {
    dir: TempDir,
}

impl StagingArea {
    /// Create a staging directory inside `root`
    pub(crate) fn new_in(root: impl AsRef<Path>) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(root)?;
        Ok(Self { dir })
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path for an intermediate file inside the staging directory
    pub(crate) fn file(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Remove the directory, reporting failures instead of ignoring them
    pub(crate) fn close(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}
