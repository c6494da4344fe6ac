use thiserror::Error;

/// Why a single entry could not be processed by a stage
///
/// Service and validation failures leave the entry in its prior state so
/// the next run retries it; filesystem failures abort the stage.
#[derive(Debug, Error)]
pub enum EntryError {
    /// Network, auth or rate-limit failure of an external service
    #[error("service error: {0:#}")]
    Service(anyhow::Error),

    /// Data that does not match the expected schema
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("filesystem error: {0:#}")]
    Io(anyhow::Error),
}

impl From<std::io::Error> for EntryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.into())
    }
}

impl EntryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Whether the stage must stop instead of moving to the next entry
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
