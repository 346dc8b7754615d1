use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pkg_release::cli::{self, MenuOutcome};
use pkg_release::config::{self, Config, DEFAULT_EXIT_DELAY_MS};
use pkg_release::manifest::FileManifestStore;
use pkg_release::process::SystemRunner;
use pkg_release::release::ReleaseOrchestrator;
use pkg_release::ui::{self, TerminalPrompter};
use pkg_release::ReleaseError;

/// Environment variable holding the log filter
const LOG_ENV: &str = "PKG_RELEASE_LOG";

#[derive(clap::Parser)]
#[command(
    name = "pkg-release",
    version,
    about = "Interactively clean, build and publish a package"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();
    init_tracing();

    let config = config::load_config(args.config.as_deref());
    let exit_delay = config
        .as_ref()
        .map(|cfg| cfg.exit_delay_ms)
        .unwrap_or(DEFAULT_EXIT_DELAY_MS);

    let result = config.map_err(anyhow::Error::from).and_then(run);
    report(result);

    println!();
    thread::sleep(Duration::from_millis(exit_delay));
    std::process::exit(0);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(config: Config) -> Result<MenuOutcome> {
    if !console::Term::stdout().is_term() {
        bail!("pkg-release needs an interactive terminal");
    }

    tracing::debug!(root = %config.root_dir().display(), "configuration loaded");
    let store = FileManifestStore::new(config.manifest_path());
    let mut orchestrator =
        ReleaseOrchestrator::new(config, store, SystemRunner::new(), TerminalPrompter::new());

    Ok(cli::run(&mut orchestrator)?)
}

fn report(result: Result<MenuOutcome>) {
    match result {
        Ok(MenuOutcome::Published(version)) => {
            println!(
                "\n{} Released {}",
                console::style("✓").green(),
                console::style(version).bold()
            );
        }
        Ok(MenuOutcome::Built | MenuOutcome::Cleaned | MenuOutcome::Cancelled) => {}
        Err(e) => {
            let cancelled = e
                .downcast_ref::<ReleaseError>()
                .is_some_and(ReleaseError::is_cancelled);
            if cancelled {
                ui::display_status("Cancelled");
            } else {
                ui::display_error(&format!("{:#}", e));
            }
        }
    }
}
