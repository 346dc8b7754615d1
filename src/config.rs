use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the current directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "pkg-release.toml";

/// Pause before exit when no configuration could be loaded
pub const DEFAULT_EXIT_DELAY_MS: u64 = 300;

/// Placeholder replaced by the target version inside command lines
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Represents the complete configuration for pkg-release.
///
/// Contains the package location, the release-candidate label and the
/// command lines run for each workflow step.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Working directory for commands and the manifest
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Manifest path, relative to `root`
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default = "default_prerelease_label")]
    pub prerelease_label: String,

    /// Pause before the process exits, in milliseconds
    #[serde(default = "default_exit_delay_ms")]
    pub exit_delay_ms: u64,

    #[serde(default)]
    pub commands: CommandsConfig,

    #[serde(default)]
    pub publish: PublishConfig,
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_prerelease_label() -> String {
    crate::domain::DEFAULT_LABEL.to_string()
}

fn default_exit_delay_ms() -> u64 {
    DEFAULT_EXIT_DELAY_MS
}

fn default_clean() -> Vec<String> {
    vec!["npm run clean".to_string(), "npm install".to_string()]
}

fn default_build() -> Vec<String> {
    vec!["npm run build".to_string()]
}

fn default_publish() -> Vec<String> {
    vec!["npm publish --access public".to_string()]
}

fn default_commit() -> Vec<String> {
    vec![
        "git commit -am \"release: v{version}\"".to_string(),
        "git push".to_string(),
    ]
}

/// Command lines for each workflow step.
///
/// Each line is split shell-style into program and arguments. A step runs
/// its lines in order and stops at the first failure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CommandsConfig {
    /// Removes generated artifacts and reinstalls dependencies
    #[serde(default = "default_clean")]
    pub clean: Vec<String>,

    /// Regenerates the build output
    #[serde(default = "default_build")]
    pub build: Vec<String>,

    /// Publishes the package with public access
    #[serde(default = "default_publish")]
    pub publish: Vec<String>,

    /// Commits the manifest and pushes; `{version}` is substituted
    #[serde(default = "default_commit")]
    pub commit: Vec<String>,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        CommandsConfig {
            clean: default_clean(),
            build: default_build(),
            publish: default_publish(),
            commit: default_commit(),
        }
    }
}

/// Publish step options.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PublishConfig {
    /// Ask for a one-time password before publishing
    #[serde(default)]
    pub otp_prompt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: None,
            manifest: default_manifest(),
            prerelease_label: default_prerelease_label(),
            exit_delay_ms: default_exit_delay_ms(),
            commands: CommandsConfig::default(),
            publish: PublishConfig::default(),
        }
    }
}

impl Config {
    /// Directory commands run in
    pub fn root_dir(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Manifest location under the root directory
    pub fn manifest_path(&self) -> PathBuf {
        self.root_dir().join(&self.manifest)
    }

    /// Reject configurations the workflow cannot run with
    pub fn validate(&self) -> Result<()> {
        let label = &self.prerelease_label;
        if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ReleaseError::config(format!(
                "prerelease_label '{}' must be non-empty and alphanumeric",
                label
            )));
        }

        let steps = [
            ("clean", &self.commands.clean),
            ("build", &self.commands.build),
            ("publish", &self.commands.publish),
            ("commit", &self.commands.commit),
        ];
        for (name, lines) in steps {
            if lines.iter().all(|line| line.trim().is_empty()) {
                return Err(ReleaseError::config(format!(
                    "commands.{} must contain at least one command",
                    name
                )));
            }
        }

        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `pkg-release.toml` in current directory
/// 3. `pkg-release.toml` in user config directory
/// 4. Default configuration if no file found
///
/// A config found via a custom path or the current directory uses the file's
/// directory as default root, and resolves a relative `root` against it. The
/// user-level config is resolved against the current directory.
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config = if let Some(path) = config_path {
        load_config_file(path, true)?
    } else if local.exists() {
        load_config_file(&local, true)?
    } else if let Some(global) = dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
    {
        load_config_file(&global, false)?
    } else {
        Config::default()
    };

    config.validate()?;
    Ok(config)
}

/// With `anchored`, the file's directory is the default root; otherwise the
/// current directory is.
fn load_config_file(path: &Path, anchored: bool) -> Result<Config> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    let mut config: Config = toml::from_str(&config_str)
        .map_err(|e| ReleaseError::config(format!("cannot parse {}: {}", path.display(), e)))?;

    let base = path
        .parent()
        .filter(|dir| anchored && !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    config.root = Some(match config.root.take() {
        Some(root) if root.is_absolute() => root,
        Some(root) => base.join(root),
        None => base,
    });

    Ok(config)
}
