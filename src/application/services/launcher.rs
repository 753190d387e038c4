//! Compose dispatch: run, build, stop, restart, status, logs, remove
//!
//! Single-path commands (run/build) propagate docker failures. Commands acting
//! on "whatever is running" probe the modes in session order and swallow
//! failures of the non-active mode.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::services::{ProjectConfigService, SessionService};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{project_label_filter, Backend, ComposeInvocation, RunMode, Session};
use crate::infrastructure::traits::{CommandOutput, CommandRunner, Prompter};

/// Result of a probe command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command succeeded against this mode's fragment set.
    Done(RunMode),
    /// Neither fragment set had anything to act on.
    NothingRunning,
}

/// Result of `remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Declined,
    Removed { containers: usize, volumes: usize },
}

/// Dispatches launcher verbs to `docker compose`.
pub struct LauncherService {
    cmd: Arc<dyn CommandRunner>,
    prompter: Arc<dyn Prompter>,
    config: Arc<ProjectConfigService>,
    session: Arc<SessionService>,
    settings: Arc<Settings>,
}

impl LauncherService {
    pub fn new(
        cmd: Arc<dyn CommandRunner>,
        prompter: Arc<dyn Prompter>,
        config: Arc<ProjectConfigService>,
        session: Arc<SessionService>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            cmd,
            prompter,
            config,
            session,
            settings,
        }
    }

    // ============================================================
    // Invocation building
    // ============================================================

    fn invocation(&self, mode: RunMode, verb: &str) -> ComposeInvocation {
        ComposeInvocation::new(
            &self.settings.project_name(),
            &self.settings.project_dir,
            self.config.fragments(mode),
            verb,
        )
    }

    /// Check prerequisites and build the invocation for `run-*` / `build-*`.
    ///
    /// Local mode requires a valid backend selector (used as profile),
    /// external mode requires the credentials file.
    pub fn prepare(
        &self,
        mode: RunMode,
        verb: &str,
        extra_args: &[String],
    ) -> ApplicationResult<ComposeInvocation> {
        let inv = match mode {
            RunMode::Local => {
                let backend = self.config.backend()?;
                self.invocation(mode, verb).with_profile(backend)
            }
            RunMode::External => {
                self.config.require_credentials()?;
                self.invocation(mode, verb)
            }
        };
        Ok(inv.with_args(extra_args.iter().cloned()))
    }

    /// Invocation used when probing a mode: local includes the configured
    /// profile so profiled services are matched too.
    fn probe_invocation(&self, mode: RunMode, verb: &str) -> ComposeInvocation {
        let inv = self.invocation(mode, verb);
        match mode {
            RunMode::Local => match self.config.backend() {
                Ok(backend) => inv.with_profile(backend),
                Err(e) => {
                    warn!("probing local mode without profile: {}", e);
                    inv
                }
            },
            RunMode::External => inv,
        }
    }

    /// Probe order: recorded session mode first, then the other one.
    pub fn probe_order(&self) -> [RunMode; 2] {
        Session::probe_order(self.session.load().as_ref())
    }

    // ============================================================
    // Process execution
    // ============================================================

    fn execute(&self, inv: &ComposeInvocation) -> ApplicationResult<()> {
        let args = inv.to_args();
        debug!("execute: {} {}", self.settings.docker_bin, args.join(" "));
        let status = self
            .cmd
            .run_attached(&self.settings.docker_bin, &args)
            .map_err(|e| ApplicationError::OperationFailed {
                context: format!("spawn {}", self.settings.docker_bin),
                source: Box::new(e),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ApplicationError::ExternalTool {
                command: format!("{} compose {}", self.settings.docker_bin, inv.verb),
                code: status.code,
            })
        }
    }

    /// Run attached, reporting success without propagating failures.
    fn try_attached(&self, inv: &ComposeInvocation) -> bool {
        let args = inv.to_args();
        match self.cmd.run_attached(&self.settings.docker_bin, &args) {
            Ok(status) if status.success() => true,
            Ok(status) => {
                debug!("try_attached: {} exited with {:?}", inv.verb, status.code);
                false
            }
            Err(e) => {
                warn!("cannot run {}: {}", self.settings.docker_bin, e);
                false
            }
        }
    }

    /// Run captured; `None` on spawn failure or non-zero exit.
    fn try_captured(&self, args: &[String]) -> Option<CommandOutput> {
        match self.cmd.run(&self.settings.docker_bin, args) {
            Ok(out) if out.success() => Some(out),
            Ok(out) => {
                debug!(
                    "try_captured: {:?} exited with {:?}: {}",
                    args,
                    out.code,
                    out.stderr.trim()
                );
                None
            }
            Err(e) => {
                warn!("cannot run {}: {}", self.settings.docker_bin, e);
                None
            }
        }
    }

    // ============================================================
    // Single-path commands
    // ============================================================

    /// Record the session, then start a prepared `up` invocation.
    ///
    /// Attached `up` blocks while the stack runs, so the record is written
    /// first. An interrupted attach keeps it; any other failure puts the
    /// previous record back.
    pub fn start(&self, mode: RunMode, inv: &ComposeInvocation) -> ApplicationResult<()> {
        let previous = self.session.load();
        self.session.record(mode)?;
        match self.execute(inv) {
            Ok(()) => Ok(()),
            Err(e) if is_interrupted(&e) => {
                debug!("start: {} mode interrupted, keeping session", mode);
                Err(e)
            }
            Err(e) => {
                self.session.restore(previous.as_ref())?;
                Err(e)
            }
        }
    }

    /// `run-local` / `run-external`.
    #[instrument(skip(self))]
    pub fn run(&self, mode: RunMode, extra_args: &[String]) -> ApplicationResult<()> {
        let inv = self.prepare(mode, "up", extra_args)?;
        self.start(mode, &inv)
    }

    /// `build-local` / `build-external`.
    #[instrument(skip(self))]
    pub fn build(&self, mode: RunMode, extra_args: &[String]) -> ApplicationResult<()> {
        let inv = self.prepare(mode, "build", extra_args)?;
        self.execute(&inv)
    }

    // ============================================================
    // Probe commands
    // ============================================================

    fn probe(&self, verb: &str) -> Outcome {
        for mode in self.probe_order() {
            let inv = self.probe_invocation(mode, verb);
            if self.try_attached(&inv) {
                debug!("probe: {} succeeded in {} mode", verb, mode);
                return Outcome::Done(mode);
            }
        }
        Outcome::NothingRunning
    }

    #[instrument(skip(self))]
    pub fn stop(&self) -> Outcome {
        self.probe("stop")
    }

    #[instrument(skip(self))]
    pub fn restart(&self) -> Outcome {
        self.probe("restart")
    }

    #[instrument(skip(self))]
    pub fn status(&self) -> Outcome {
        self.probe("ps")
    }

    /// First mode with running containers, by `ps -q`.
    pub fn active_mode(&self) -> Option<RunMode> {
        self.probe_order().into_iter().find(|&mode| {
            let args = self
                .probe_invocation(mode, "ps")
                .with_args(["-q"])
                .to_args();
            self.try_captured(&args)
                .map(|out| !out.stdout.trim().is_empty())
                .unwrap_or(false)
        })
    }

    /// Follow logs of the active mode, optionally for one service.
    #[instrument(skip(self))]
    pub fn logs(&self, service: Option<&str>) -> ApplicationResult<Outcome> {
        let Some(mode) = self.active_mode() else {
            return Ok(Outcome::NothingRunning);
        };
        let mut inv = self.probe_invocation(mode, "logs").with_args(["-f"]);
        if let Some(service) = service {
            inv = inv.with_args([service]);
        }
        // Interrupting `logs -f` ends it with a non-zero code; that is the normal exit.
        if !self.try_attached(&inv) {
            debug!("logs: follow ended without success");
        }
        Ok(Outcome::Done(mode))
    }

    // ============================================================
    // Remove
    // ============================================================

    /// Tear down everything belonging to this project after confirmation.
    ///
    /// Containers and volumes are selected by the compose project label.
    /// All docker failures are tolerated so a second run is a no-op.
    #[instrument(skip(self))]
    pub fn remove(&self) -> ApplicationResult<RemoveOutcome> {
        let project = self.settings.project_name();
        let question = format!(
            "Remove all containers and volumes of project '{}'? Data in volumes will be lost.",
            project
        );
        let confirmed = self
            .prompter
            .confirm(&question)
            .map_err(|e| ApplicationError::OperationFailed {
                context: "read confirmation".to_string(),
                source: Box::new(e),
            })?;
        if !confirmed {
            debug!("remove: declined");
            return Ok(RemoveOutcome::Declined);
        }

        for mode in [RunMode::Local, RunMode::External] {
            let mut inv = self
                .invocation(mode, "down")
                .with_args(["--volumes", "--remove-orphans"]);
            if mode == RunMode::Local {
                inv = inv.with_profile(Backend::Ollama).with_profile(Backend::Vllm);
            }
            if self.try_captured(&inv.to_args()).is_none() {
                debug!("remove: down in {} mode failed, continuing", mode);
            }
        }

        let filter = project_label_filter(&project);
        let containers = self.list_ids(&["ps", "-aq", "--filter", filter.as_str()]);
        if !containers.is_empty() {
            self.force_remove(&["rm", "-f"], &containers);
        }

        let volumes = self.list_ids(&["volume", "ls", "-q", "--filter", filter.as_str()]);
        if !volumes.is_empty() {
            self.force_remove(&["volume", "rm", "-f"], &volumes);
        }

        for volume in self.settings.fallback_volume_names() {
            if volumes.contains(&volume) {
                continue;
            }
            let args = strings(&["volume", "rm", "-f", volume.as_str()]);
            if self.try_captured(&args).is_some() {
                debug!("remove: fallback volume {} gone", volume);
            }
        }

        self.session.clear()?;

        Ok(RemoveOutcome::Removed {
            containers: containers.len(),
            volumes: volumes.len(),
        })
    }

    fn list_ids(&self, args: &[&str]) -> Vec<String> {
        self.try_captured(&strings(args))
            .map(|out| {
                out.stdout
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn force_remove(&self, base: &[&str], ids: &[String]) {
        let mut args = strings(base);
        args.extend(ids.iter().cloned());
        if self.try_captured(&args).is_none() {
            warn!("could not remove all of: {}", ids.join(" "));
        }
    }
}

/// Exit by SIGINT (130) or by a signal without code: the user ended an attached `up`.
fn is_interrupted(err: &ApplicationError) -> bool {
    matches!(
        err,
        ApplicationError::ExternalTool {
            code: Some(130) | None,
            ..
        }
    )
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}
