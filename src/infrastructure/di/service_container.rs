//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{LauncherService, ProjectConfigService, SessionService};
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, Prompter, RealCommandRunner, RealFileSystem, StdinPrompter,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    pub project_config: Arc<ProjectConfigService>,
    pub session: Arc<SessionService>,
    pub launcher: LauncherService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            Arc::new(StdinPrompter),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        let settings = Arc::new(settings);
        let project_config = Arc::new(ProjectConfigService::new(fs.clone(), settings.clone()));
        let session = Arc::new(SessionService::new(fs, settings.clone()));
        let launcher = LauncherService::new(
            cmd,
            prompter,
            project_config.clone(),
            session.clone(),
            settings.clone(),
        );

        Self {
            settings,
            project_config,
            session,
            launcher,
        }
    }
}
