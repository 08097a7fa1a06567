use pricelens_core::{CoreError, FetchError, SessionError, SourceError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to fetch stock data: {0}")]
    Fetch(#[from] FetchError),

    #[error("source error: {0}")]
    Source(#[from] SourceError),

    #[error("{0}")]
    MissingPrerequisite(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 2,
            Self::Fetch(_) => 3,
            Self::Source(_) => 3,
            Self::MissingPrerequisite(_) => 4,
            Self::Serialization(_) => 5,
            Self::Io(_) => 10,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "cli.validation",
            Self::Config(_) => "cli.config",
            Self::Fetch(_) => "cli.fetch",
            Self::Source(_) => "cli.source",
            Self::MissingPrerequisite(_) => "cli.missing_prerequisite",
            Self::Serialization(_) => "cli.serialization",
            Self::Io(_) => "cli.io",
        }
    }
}

impl From<SessionError> for CliError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Fetch(fetch) => Self::Fetch(fetch),
            other => Self::MissingPrerequisite(other.to_string()),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(validation) => Self::Validation(validation),
            CoreError::Serialization(serialization) => Self::Serialization(serialization),
        }
    }
}
