//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner, Prompter)
//! but are themselves concrete structs, not traits.

mod launcher;
mod project_config;
mod session;

pub use launcher::{LauncherService, Outcome, RemoveOutcome};
pub use project_config::ProjectConfigService;
pub use session::SessionService;
