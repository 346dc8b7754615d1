use crate::error::{ReleaseError, Result};
use crate::manifest::{Manifest, ManifestStore};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Manifest stored as a UTF-8 JSON file
///
/// Saves go through a temporary file in the same directory that is then
/// renamed over the target, so readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct FileManifestStore {
    path: PathBuf,
}

impl FileManifestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileManifestStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ManifestStore for FileManifestStore {
    fn load(&self) -> Result<Manifest> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            ReleaseError::manifest(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        Manifest::from_json(&text)
    }

    fn save(&mut self, manifest: &Manifest) -> Result<()> {
        let text = manifest.to_json()?;
        let dir = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let write_err = |e: std::io::Error| {
            ReleaseError::manifest(format!("cannot write {}: {}", self.path.display(), e))
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        // The temporary file starts out private; take over the manifest's mode
        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_err)?;
        }
        tmp.write_all(text.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %self.path.display(), version = manifest.version(), "manifest saved");
        Ok(())
    }
}
