/// Storage failures surfaced by the user and event repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("query failed: {0}")]
    QueryFailed(String),
    #[error("stored row is unreadable: {0}")]
    CorruptRow(String),
    #[error("no such record: {0}")]
    NotFound(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
}
