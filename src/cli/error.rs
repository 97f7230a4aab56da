//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl CliError {
    /// True when `.` could not be resolved to a single cygport file.
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            CliError::Infra(InfraError::Application(ApplicationError::Domain(e))) if e.is_resolution()
        )
    }

    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Infra(e) => match e {
                InfraError::Io { .. } => crate::exitcode::IOERR,
                InfraError::Application(ApplicationError::Domain(d)) if d.is_resolution() => {
                    crate::exitcode::FAILURE
                }
                InfraError::Application(ApplicationError::Config { .. }) => {
                    crate::exitcode::CONFIG
                }
                InfraError::Application(ApplicationError::OperationFailed { .. }) => {
                    crate::exitcode::IOERR
                }
                InfraError::Application(ApplicationError::Domain(_)) => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use std::path::PathBuf;

    #[test]
    fn given_resolution_error_then_exit_code_is_one() {
        let err = CliError::from(ApplicationError::from(DomainError::NoCandidate {
            dir: PathBuf::from("/work"),
            suffix: "cygport".into(),
        }));
        assert!(err.is_resolution());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn given_config_error_then_exit_code_is_config() {
        let err = CliError::from(ApplicationError::Config {
            message: "parse".into(),
        });
        assert!(!err.is_resolution());
        assert_eq!(err.exit_code(), crate::exitcode::CONFIG);
    }

    #[test]
    fn given_io_error_then_exit_code_is_ioerr() {
        let err = CliError::from(InfraError::io(
            "read current directory",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        ));
        assert_eq!(err.exit_code(), crate::exitcode::IOERR);
    }
}
