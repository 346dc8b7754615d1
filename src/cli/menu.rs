use std::fmt;
use std::str::FromStr;

use crate::domain::{BumpType, Version};
use crate::error::{ReleaseError, Result};
use crate::manifest::ManifestStore;
use crate::process::CommandRunner;
use crate::release::{PublishRequest, ReleaseOrchestrator, ReleaseOutcome};
use crate::ui::{self, MenuOption, Prompter};

/// Top-level menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Publish,
    Build,
    Clean,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Publish, Action::Build, Action::Clean];

    pub fn key(&self) -> &'static str {
        match self {
            Action::Publish => "publish",
            Action::Build => "build",
            Action::Clean => "clean",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Action {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.key() == s)
            .ok_or_else(|| ReleaseError::prompt(format!("unknown action '{}'", s)))
    }
}

/// What an interactive run accomplished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    Published(String),
    Built,
    Cleaned,
    Cancelled,
}

/// Ask for the top-level action
pub fn choose_action<P: Prompter>(prompter: &mut P) -> Result<Action> {
    let options: Vec<MenuOption> = Action::ALL
        .iter()
        .map(|action| MenuOption::plain(action.key()))
        .collect();
    prompter.select(Some("What do you want to do?"), &options)?.parse()
}

/// Ask how to derive the next version
///
/// Picking the release-candidate entry on a version that already is a
/// candidate advances its counter directly; otherwise a base bump type is
/// asked for to pair with the first candidate.
pub fn choose_publish_request<P: Prompter>(
    prompter: &mut P,
    current: &Version,
    label: &str,
) -> Result<PublishRequest> {
    let options: Vec<MenuOption> = BumpType::ALL
        .iter()
        .map(|bump_type| MenuOption::plain(bump_type.key()))
        .collect();
    let question = format!("Version type (current {})", current);
    let bump_type: BumpType = prompter.select(Some(&question), &options)?.parse()?;

    if bump_type != BumpType::Rc {
        return Ok(PublishRequest::release(bump_type));
    }

    if current.is_candidate(label) {
        return Ok(PublishRequest::next_candidate());
    }

    let base_options: Vec<MenuOption> = BumpType::BASE
        .iter()
        .map(|bump_type| MenuOption::plain(bump_type.key()))
        .collect();
    let base: BumpType = prompter
        .select(Some("Base version type for the first release candidate"), &base_options)?
        .parse()?;
    Ok(PublishRequest::first_candidate(base))
}

/// Present the menus and run the chosen workflow
///
/// Escape in any menu surfaces as [ReleaseError::Cancelled], except at the
/// publish confirmation, which reports [MenuOutcome::Cancelled].
pub fn run<S, R, P>(orchestrator: &mut ReleaseOrchestrator<S, R, P>) -> Result<MenuOutcome>
where
    S: ManifestStore,
    R: CommandRunner,
    P: Prompter,
{
    match choose_action(orchestrator.prompter_mut())? {
        Action::Clean => {
            orchestrator.clean()?;
            ui::display_success("Clean finished");
            Ok(MenuOutcome::Cleaned)
        }
        Action::Build => {
            orchestrator.build()?;
            ui::display_success("Build finished");
            Ok(MenuOutcome::Built)
        }
        Action::Publish => {
            let current = orchestrator.current_version()?;
            let label = orchestrator.config().prerelease_label.clone();
            let request = choose_publish_request(orchestrator.prompter_mut(), &current, &label)?;
            tracing::debug!(?request, "publish requested");

            match orchestrator.publish(request)? {
                ReleaseOutcome::Published { version } => Ok(MenuOutcome::Published(version)),
                ReleaseOutcome::Cancelled => Ok(MenuOutcome::Cancelled),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::ScriptedPrompter;

    #[test]
    fn test_action_keys_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.key().parse::<Action>().unwrap(), action);
        }
        assert!("deploy".parse::<Action>().is_err());
    }

    #[test]
    fn test_plain_bump_request() {
        let mut prompter = ScriptedPrompter::choosing(&["minor"]);
        let request =
            choose_publish_request(&mut prompter, &Version::new(1, 2, 3), "rc").unwrap();
        assert_eq!(request, PublishRequest::release(BumpType::Minor));
    }

    #[test]
    fn test_rc_on_candidate_skips_base_question() {
        let mut prompter = ScriptedPrompter::choosing(&["rc"]);
        let current = Version::parse("1.2.4-rc.1").unwrap();
        let request = choose_publish_request(&mut prompter, &current, "rc").unwrap();
        assert_eq!(request, PublishRequest::next_candidate());
        assert_eq!(prompter.asked().len(), 1);
    }

    #[test]
    fn test_rc_on_release_asks_for_base() {
        let mut prompter = ScriptedPrompter::choosing(&["rc", "major"]);
        let request =
            choose_publish_request(&mut prompter, &Version::new(1, 2, 3), "rc").unwrap();
        assert_eq!(request, PublishRequest::first_candidate(BumpType::Major));
        assert_eq!(prompter.asked().len(), 2);
    }

    #[test]
    fn test_base_menu_never_offers_rc() {
        let mut prompter = ScriptedPrompter::choosing(&["rc", "rc"]);
        let err = choose_publish_request(&mut prompter, &Version::new(1, 0, 0), "rc").unwrap_err();
        assert!(err.to_string().contains("not offered"));
    }

    #[test]
    fn test_foreign_prerelease_label_is_not_a_candidate() {
        let mut prompter = ScriptedPrompter::choosing(&["rc", "patch"]);
        let current = Version::parse("1.0.0-beta.2").unwrap();
        let request = choose_publish_request(&mut prompter, &current, "rc").unwrap();
        assert_eq!(request, PublishRequest::first_candidate(BumpType::Patch));
    }
}
