use thiserror::Error;

use super::service::TaskServiceError;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Service(#[from] TaskServiceError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// - 11: config error
    /// - 20: terminal / IO error
    /// - 30: validation error
    /// - 40: not found
    /// - 50: network / uncategorized
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 11,
            CliError::Io(_) | CliError::Command(_) => 20,
            CliError::Service(TaskServiceError::Validation(_)) => 30,
            CliError::Service(TaskServiceError::NotFound(_)) => 40,
            CliError::Service(TaskServiceError::Network(_)) => 50,
            CliError::Anyhow(_) => 50,
        }
    }
}
