//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::exitcode;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::MissingPrerequisite { .. } => exitcode::NOINPUT,
                    ApplicationError::Config { .. } => exitcode::CONFIG,
                    ApplicationError::Domain(DomainError::UnknownBackend(_)) => exitcode::CONFIG,
                    ApplicationError::ExternalTool { code, .. } => match code {
                        Some(c) if *c != 0 => *c,
                        _ => exitcode::SOFTWARE,
                    },
                    ApplicationError::OperationFailed { .. } => exitcode::SOFTWARE,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_missing_prerequisite_when_exit_code_then_noinput() {
        let err: CliError = ApplicationError::MissingPrerequisite {
            path: PathBuf::from(".env"),
            remediation: String::new(),
        }
        .into();
        assert_eq!(err.exit_code(), exitcode::NOINPUT);
    }

    #[test]
    fn given_external_tool_failure_when_exit_code_then_passes_docker_code() {
        let err: CliError = ApplicationError::ExternalTool {
            command: "docker compose up".into(),
            code: Some(17),
        }
        .into();
        assert_eq!(err.exit_code(), 17);

        let signalled: CliError = ApplicationError::ExternalTool {
            command: "docker compose up".into(),
            code: None,
        }
        .into();
        assert_eq!(signalled.exit_code(), exitcode::SOFTWARE);
    }

    #[test]
    fn given_bad_backend_when_exit_code_then_config() {
        let err: CliError =
            ApplicationError::from(DomainError::UnknownBackend("x".into())).into();
        assert_eq!(err.exit_code(), exitcode::CONFIG);
    }
}
