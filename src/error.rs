use thiserror::Error;

/// Anything a collaborator reports through its completion is carried unchanged.
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Usage error: {0}")]
    Usage(String),
    #[error("{method} doesn't exist in {collection}")]
    MissingMethod { method: String, collection: String },
    #[error("{method} cannot be called more than once in the same chain")]
    DuplicateResult { method: String },
    #[error("Collaborator error: {0}")]
    Collaborator(#[source] CollaboratorError),
    #[error("Execution error: {0}")]
    Execution(String),
}

pub type Result<T> = std::result::Result<T, ChainError>;

impl ChainError {
    /// True when the error was raised before any asynchronous work started.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }
}
