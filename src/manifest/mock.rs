use crate::error::{ReleaseError, Result};
use crate::manifest::{Manifest, ManifestStore};

/// In-memory manifest for testing without touching the filesystem
///
/// Keeps the serialised text, exactly as a file store would, and every
/// version ever saved.
#[derive(Debug, Clone)]
pub struct MemoryManifestStore {
    text: String,
    saved_versions: Vec<String>,
    /// Saves still allowed to succeed; `None` means unlimited
    saves_left: Option<usize>,
}

impl MemoryManifestStore {
    pub fn new(text: impl Into<String>) -> Self {
        MemoryManifestStore {
            text: text.into(),
            saved_versions: Vec::new(),
            saves_left: None,
        }
    }

    /// Make every subsequent save fail
    pub fn failing_saves(self) -> Self {
        self.failing_saves_after(0)
    }

    /// Let `count` saves succeed, then fail every later one
    pub fn failing_saves_after(mut self, count: usize) -> Self {
        self.saves_left = Some(count);
        self
    }

    /// Current document text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Versions written so far, in order
    pub fn saved_versions(&self) -> &[String] {
        &self.saved_versions
    }
}

impl ManifestStore for MemoryManifestStore {
    fn load(&self) -> Result<Manifest> {
        Manifest::from_json(&self.text)
    }

    fn save(&mut self, manifest: &Manifest) -> Result<()> {
        match self.saves_left.as_mut() {
            Some(0) => return Err(ReleaseError::manifest("store is read-only")),
            Some(left) => *left -= 1,
            None => {}
        }
        self.text = manifest.to_json()?;
        self.saved_versions.push(manifest.version().to_string());
        Ok(())
    }
}
