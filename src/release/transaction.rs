//! Snapshot-and-restore bookkeeping for one publish run.

use crate::error::Result;
use crate::manifest::{Manifest, ManifestStore, DEV_DEPENDENCIES_FIELD};
use std::fmt;

/// Workflow position of a publish run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Building,
    AwaitingConfirmation,
    Publishing,
    Committing,
    Done,
    RollingBack,
    Cancelled,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Building => "building",
            Phase::AwaitingConfirmation => "awaiting confirmation",
            Phase::Publishing => "publishing",
            Phase::Committing => "committing",
            Phase::Done => "done",
            Phase::RollingBack => "rolling back",
            Phase::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Pre-mutation snapshot plus the working copy of the manifest
///
/// Never persisted. `apply` is the only step that mutates; `rollback` and
/// `restore_dev_dependencies` undo it.
#[derive(Debug)]
pub struct ReleaseTransaction {
    original: Manifest,
    working: Manifest,
    target_version: String,
    phase: Phase,
}

impl ReleaseTransaction {
    pub fn begin(manifest: Manifest, target_version: impl Into<String>) -> Self {
        ReleaseTransaction {
            working: manifest.clone(),
            original: manifest,
            target_version: target_version.into(),
            phase: Phase::Idle,
        }
    }

    pub fn original_version(&self) -> &str {
        self.original.version()
    }

    pub fn target_version(&self) -> &str {
        &self.target_version
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn working(&self) -> &Manifest {
        &self.working
    }

    pub fn enter(&mut self, phase: Phase) {
        tracing::info!(from = %self.phase, to = %phase, "release phase");
        self.phase = phase;
    }

    /// Write the target version and drop `devDependencies`
    ///
    /// The working copy only changes once the save succeeded.
    pub fn apply<S: ManifestStore>(&mut self, store: &mut S) -> Result<()> {
        let mut next = self.working.clone();
        next.set_version(&self.target_version);
        next.remove_dev_dependencies();
        store.save(&next)?;
        self.working = next;
        Ok(())
    }

    pub fn commit(&mut self) {
        self.enter(Phase::Done);
    }

    /// Put the original version back if the stored one differs
    ///
    /// The working copy is reset either way, so later saves never carry the
    /// target version. An unreadable manifest counts as differing.
    pub fn rollback<S: ManifestStore>(&mut self, store: &mut S) -> Result<()> {
        self.enter(Phase::RollingBack);

        let original = self.original.version().to_string();
        self.working.set_version(&original);

        let differs = match store.load() {
            Ok(stored) => stored.version() != original,
            Err(e) => {
                tracing::warn!("cannot read manifest during rollback: {}", e);
                true
            }
        };

        if differs {
            tracing::info!(version = %original, "restoring manifest version");
            store.save(&self.working)?;
        }
        Ok(())
    }

    /// Write `devDependencies` back if they were dropped
    ///
    /// Returns whether anything was written.
    pub fn restore_dev_dependencies<S: ManifestStore>(&mut self, store: &mut S) -> Result<bool> {
        let removed = match (self.original.dev_dependencies(), self.working.dev_dependencies()) {
            (Some(original), None) => original.clone(),
            _ => return Ok(false),
        };

        self.working
            .restore_field(DEV_DEPENDENCIES_FIELD, removed, &self.original);
        store.save(&self.working)?;
        tracing::debug!("devDependencies restored");
        Ok(true)
    }
}
