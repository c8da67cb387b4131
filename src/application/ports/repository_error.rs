use crate::domain::{JobId, JobStateError};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("serialization failed: {0}")]
    Serialization(String),
    #[error("job not found: {0}")]
    NotFound(JobId),
    /// An update mutator refused the transition; the stored record is untouched.
    #[error(transparent)]
    InvalidTransition(#[from] JobStateError),
}
