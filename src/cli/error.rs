//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

impl From<TreeError> for CliError {
    fn from(e: TreeError) -> Self {
        CliError::Application(ApplicationError::Domain(e))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(TreeError::NotAMember(_)) => crate::exitcode::NOINPUT,
                ApplicationError::Domain(_) | ApplicationError::Parse { .. } => {
                    crate::exitcode::DATAERR
                }
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn given_error_kinds_when_mapping_then_sysexits_codes() {
        let missing: CliError = TreeError::NotAMember("x".into()).into();
        assert_eq!(missing.exit_code(), crate::exitcode::NOINPUT);

        let parse = CliError::Application(ApplicationError::Parse {
            path: PathBuf::from("rel.txt"),
            line: 3,
            message: "bad".into(),
        });
        assert_eq!(parse.exit_code(), crate::exitcode::DATAERR);
        assert_eq!(parse.to_string(), "rel.txt:3: bad");

        let config = CliError::Application(ApplicationError::Config {
            message: "nope".into(),
        });
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);
    }
}
