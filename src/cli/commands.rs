//! Command dispatch: maps parsed CLI commands onto launcher services

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{Outcome, RemoveOutcome};
use crate::cli::args::{Cli, Commands};
use crate::cli::output;
use crate::cli::CliResult;
use crate::config::Settings;
use crate::domain::RunMode;
use crate::infrastructure::{InfraError, ServiceContainer};

/// Command names and descriptions shown by `help`.
const USAGE: [(&str, &str); 10] = [
    ("run-local [args...]", "start with the local LLM (profile from backend file)"),
    ("run-external [args...]", "start against an external LLM provider"),
    ("build-local [args...]", "build images for local mode"),
    ("build-external [args...]", "build images for external mode"),
    ("stop", "stop the running stack"),
    ("restart", "restart the running stack"),
    ("status", "show running containers"),
    ("logs [service]", "follow logs of the running stack"),
    ("remove", "remove containers and volumes of this project"),
    ("help", "show this help and the current configuration"),
];

/// Resolve settings for the requested project directory and run the command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("get current dir", e))?,
    };
    debug!("execute_command: project_dir={}", project_dir.display());

    let settings = match Settings::load(&project_dir) {
        Ok(settings) => settings,
        // help must work even when the configuration is broken
        Err(e) if matches!(cli.command, None | Some(Commands::Help)) => {
            output::warning(&e);
            Settings {
                project_dir,
                ..Settings::default()
            }
        }
        Err(e) => return Err(e.into()),
    };
    let container = ServiceContainer::new(settings);
    dispatch(cli.command.as_ref(), &container)
}

/// Run one command against a wired-up container.
pub fn dispatch(command: Option<&Commands>, container: &ServiceContainer) -> CliResult<()> {
    match command {
        Some(Commands::RunLocal { args }) => run(container, RunMode::Local, args),
        Some(Commands::RunExternal { args }) => run(container, RunMode::External, args),
        Some(Commands::BuildLocal { args }) => build(container, RunMode::Local, args),
        Some(Commands::BuildExternal { args }) => build(container, RunMode::External, args),
        Some(Commands::Stop) => {
            report(container.launcher.stop(), "Stopped");
            Ok(())
        }
        Some(Commands::Restart) => {
            report(container.launcher.restart(), "Restarted");
            Ok(())
        }
        Some(Commands::Status) => {
            if container.launcher.status() == Outcome::NothingRunning {
                output::info("No running services found.");
            }
            Ok(())
        }
        Some(Commands::Logs { service }) => logs(container, service.as_deref()),
        Some(Commands::Remove) => remove(container),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Help) | None => {
            help(container);
            Ok(())
        }
    }
}

#[instrument(skip(container))]
fn run(container: &ServiceContainer, mode: RunMode, args: &[String]) -> CliResult<()> {
    let inv = container.launcher.prepare(mode, "up", args)?;

    let settings = &container.settings;
    let title = match mode {
        RunMode::Local => format!(
            "Starting {} with local LLM ({})",
            settings.project_name(),
            inv.profiles
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        RunMode::External => format!(
            "Starting {} with external LLM provider",
            settings.project_name()
        ),
    };
    output::banner(
        &title,
        &[
            ("Web UI", settings.urls.ui.as_str()),
            ("Dispatcher", settings.urls.dispatcher.as_str()),
        ],
    );
    output::detail(&format!("fragments: {}", inv.fragments));

    container.launcher.start(mode, &inv)?;
    Ok(())
}

#[instrument(skip(container))]
fn build(container: &ServiceContainer, mode: RunMode, args: &[String]) -> CliResult<()> {
    output::header(&format!("Building images for {} mode", mode));
    container.launcher.build(mode, args)?;
    output::success(&format!("Build finished ({} mode)", mode));
    Ok(())
}

fn report(outcome: Outcome, verb: &str) {
    match outcome {
        Outcome::Done(mode) => output::success(&format!("{} services ({} mode)", verb, mode)),
        Outcome::NothingRunning => output::info("No running services found."),
    }
}

fn logs(container: &ServiceContainer, service: Option<&str>) -> CliResult<()> {
    match container.launcher.logs(service)? {
        Outcome::Done(mode) => debug!("logs: followed {} mode", mode),
        Outcome::NothingRunning => output::info("No running services found."),
    }
    Ok(())
}

fn remove(container: &ServiceContainer) -> CliResult<()> {
    match container.launcher.remove()? {
        RemoveOutcome::Declined => output::info("Aborted, nothing removed."),
        RemoveOutcome::Removed {
            containers,
            volumes,
        } => output::success(&format!(
            "Removed project {} ({} containers, {} volumes)",
            container.settings.project_name(),
            containers,
            volumes
        )),
    }
    Ok(())
}

/// Print commands and the configuration they would use. Never fails.
fn help(container: &ServiceContainer) {
    let settings = &container.settings;
    let config = &container.project_config;

    output::header("Usage: launchpad [-v] [-C <project-dir>] <command>");
    for (name, description) in USAGE {
        output::usage_line(name, description);
    }
    output::info("");

    output::header("Current configuration");
    output::field("project", &settings.project_name());
    output::field("directory", &settings.project_dir.display());
    match config.backend() {
        Ok(backend) => output::field("backend", &backend),
        Err(e) => {
            output::field("backend", "invalid");
            output::warning(&e);
        }
    }

    let toggles = config.toggles();
    let enabled: Vec<&str> = toggles.enabled().collect();
    output::field(
        "services",
        &if enabled.is_empty() {
            "(none)".to_string()
        } else {
            enabled.join(", ")
        },
    );
    output::field("local", &config.fragments(RunMode::Local));
    output::field("external", &config.fragments(RunMode::External));

    let presence = if config.credentials_present() {
        "present"
    } else {
        "missing"
    };
    output::field("credentials", &format!("{} ({})", settings.files.credentials.display(), presence));

    match container.session.load() {
        Some(session) => output::field(
            "last started",
            &format!("{} at {} on {}", session.mode, session.started_at, session.host),
        ),
        None => output::field("last started", "(unknown)"),
    }
}
