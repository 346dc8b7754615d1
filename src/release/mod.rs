//! Release workflow orchestration
//!
//! Sequences clean, build, confirmation, publish and commit. Each external
//! command runs to completion before the next starts. Once the manifest has
//! been rewritten, any failure puts the original version back, and
//! `devDependencies` are always written back before `publish` returns.

pub mod transaction;

pub use transaction::{Phase, ReleaseTransaction};

use crate::config::{CommandsConfig, Config};
use crate::domain::{bump_with_label, BumpType, Version};
use crate::error::{ReleaseError, Result};
use crate::manifest::ManifestStore;
use crate::process::{parse_step, CommandRunner};
use crate::ui::{self, formatter, MenuOption, Prompter};

/// Configured command groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Clean,
    Build,
    Publish,
    Commit,
}

impl Step {
    pub fn title(&self) -> &'static str {
        match self {
            Step::Clean => "Clean",
            Step::Build => "Build",
            Step::Publish => "Publish",
            Step::Commit => "Commit and push",
        }
    }

    fn lines<'a>(&self, commands: &'a CommandsConfig) -> &'a [String] {
        match self {
            Step::Clean => &commands.clean,
            Step::Build => &commands.build,
            Step::Publish => &commands.publish,
            Step::Commit => &commands.commit,
        }
    }
}

/// How the target version is derived from the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishRequest {
    pub bump_type: BumpType,
    pub prerelease: bool,
    pub prerelease_only: bool,
}

impl PublishRequest {
    /// Plain release: bump the base version, no candidate suffix
    pub fn release(bump_type: BumpType) -> Self {
        PublishRequest {
            bump_type,
            prerelease: false,
            prerelease_only: false,
        }
    }

    /// First release candidate on top of a base bump
    pub fn first_candidate(bump_type: BumpType) -> Self {
        PublishRequest {
            bump_type,
            prerelease: true,
            prerelease_only: false,
        }
    }

    /// Next release candidate of the version already in the manifest
    pub fn next_candidate() -> Self {
        PublishRequest {
            bump_type: BumpType::Patch,
            prerelease: true,
            prerelease_only: true,
        }
    }
}

/// How a publish run ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Published { version: String },
    Cancelled,
}

/// Drives the clean / build / publish workflow
pub struct ReleaseOrchestrator<S, R, P> {
    config: Config,
    store: S,
    runner: R,
    prompter: P,
}

impl<S, R, P> ReleaseOrchestrator<S, R, P>
where
    S: ManifestStore,
    R: CommandRunner,
    P: Prompter,
{
    pub fn new(config: Config, store: S, runner: R, prompter: P) -> Self {
        ReleaseOrchestrator {
            config,
            store,
            runner,
            prompter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    pub fn prompter_mut(&mut self) -> &mut P {
        &mut self.prompter
    }

    /// Version currently stored in the manifest
    pub fn current_version(&self) -> Result<Version> {
        Version::parse(self.store.load()?.version())
    }

    /// Run the clean step only
    pub fn clean(&mut self) -> Result<()> {
        self.run_step(Step::Clean, None, None)
    }

    /// Run clean then build against the untouched manifest
    pub fn build(&mut self) -> Result<()> {
        self.run_step(Step::Clean, None, None)?;
        self.run_step(Step::Build, None, None)
    }

    /// Compute the version `request` would publish, without side effects
    pub fn target_version(&self, request: PublishRequest) -> Result<String> {
        let manifest = self.store.load()?;
        let target = bump_with_label(
            manifest.version(),
            request.bump_type,
            request.prerelease,
            request.prerelease_only,
            &self.config.prerelease_label,
        )?;

        semver::Version::parse(&target).map_err(|e| {
            ReleaseError::version(format!("'{}' is not a valid semantic version: {}", target, e))
        })?;
        Ok(target)
    }

    /// Build, confirm, publish and commit a new version
    ///
    /// Cancelling at the confirmation leaves the manifest untouched and
    /// returns `Ok(ReleaseOutcome::Cancelled)`. Any other failure is returned
    /// after the manifest version has been rolled back.
    pub fn publish(&mut self, request: PublishRequest) -> Result<ReleaseOutcome> {
        let target = self.target_version(request)?;
        let mut txn = ReleaseTransaction::begin(self.store.load()?, target);

        ui::display_status(&format!(
            "Preparing release {} → {}",
            txn.original_version(),
            txn.target_version()
        ));

        let result = match self.drive(&mut txn) {
            Err(e) if !e.is_cancelled() => {
                if let Err(rollback_err) = txn.rollback(&mut self.store) {
                    ui::display_error(&format!(
                        "Failed to restore version {}: {}",
                        txn.original_version(),
                        rollback_err
                    ));
                }
                Err(e)
            }
            other => other,
        };

        match txn.restore_dev_dependencies(&mut self.store) {
            Ok(true) => ui::display_success("Restored devDependencies"),
            Ok(false) => {}
            Err(e) => ui::display_error(&format!("Failed to restore devDependencies: {}", e)),
        }

        result
    }

    fn drive(&mut self, txn: &mut ReleaseTransaction) -> Result<ReleaseOutcome> {
        txn.enter(Phase::Building);
        self.build()?;

        txn.enter(Phase::AwaitingConfirmation);
        let otp = match self.confirm(txn) {
            Ok(otp) => otp,
            Err(e) if e.is_cancelled() => {
                txn.enter(Phase::Cancelled);
                ui::display_status("Publish cancelled, nothing was changed");
                return Ok(ReleaseOutcome::Cancelled);
            }
            Err(e) => return Err(e),
        };

        txn.apply(&mut self.store)?;
        ui::display_success(&format!("Manifest set to {}", txn.target_version()));

        txn.enter(Phase::Publishing);
        self.run_step(Step::Publish, None, otp.as_deref())?;

        txn.enter(Phase::Committing);
        let version = txn.target_version().to_string();
        self.run_step(Step::Commit, Some(&version), None)?;

        txn.commit();
        ui::display_success(&format!("Published {}", version));
        Ok(ReleaseOutcome::Published { version })
    }

    /// Ask to go ahead; returns the one-time password if one is configured
    fn confirm(&mut self, txn: &ReleaseTransaction) -> Result<Option<String>> {
        let question = formatter::version_change(txn.original_version(), txn.target_version());
        let options = [
            MenuOption::new("yes", format!("Yes, publish {}", txn.target_version())),
            MenuOption::new("no", "No, cancel"),
        ];

        if self.prompter.select(Some(&question), &options)? != "yes" {
            return Err(ReleaseError::Cancelled);
        }

        if !self.config.publish.otp_prompt {
            return Ok(None);
        }

        let code = self.prompter.query("One-time password (leave empty to skip):")?;
        let code = code.trim();
        Ok((!code.is_empty()).then(|| code.to_string()))
    }

    fn run_step(&mut self, step: Step, version: Option<&str>, otp: Option<&str>) -> Result<()> {
        let commands = parse_step(step.lines(&self.config.commands))?;
        let cwd = self.config.root_dir();

        ui::display_step(step.title());
        for command in commands {
            let command = match version {
                Some(version) => command.with_version(version),
                None => command,
            };
            let command = match otp {
                Some(code) => command.with_arg(format!("--otp={}", code)),
                None => command,
            };

            tracing::info!(step = step.title(), command = %command, "running");
            self.runner.run_streamed(&command, &cwd)?;
        }
        Ok(())
    }
}
