use thiserror::Error;

/// Service-layer error, covering every mutation path in the absence/cover/
/// duty engine (spec §7). Variant names describe the *kind*, not a
/// particular failing call, so every service can share one type.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Bad input; surfaced with a field-level message, no persistence occurs.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Token cache empty/expired; surfaced as a re-auth prompt, non-fatal
    /// for the flow that triggered it (archive/notify is skipped).
    #[error("authentication required: {0}")]
    AuthRequired(String),

    /// Uniqueness violation on a pending leave or assignment slot; surfaced
    /// as a warning pointing at the existing row.
    #[error("conflicts with an existing row: {0}")]
    ConflictDuplicate(String),

    /// Drive/email/webhook/availability failure; logged, never rolled back,
    /// retried at the next trigger. Carries the already-committed outcome
    /// so callers can still report success with a `warnings` field.
    #[error("transient I/O failure: {0}")]
    TransientIo(String),

    /// Database unreachable, filesystem unwritable — surfaced as 5xx.
    #[error("fatal service error: {0}")]
    Fatal(String),
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(err: sea_orm::DbErr) -> Self {
        ServiceError::Fatal(err.to_string())
    }
}

impl From<db::error::RepoError> for ServiceError {
    fn from(err: db::error::RepoError) -> Self {
        match err {
            db::error::RepoError::NotFound => ServiceError::Validation("not found".into()),
            db::error::RepoError::Duplicate(msg) => ServiceError::ConflictDuplicate(msg),
            db::error::RepoError::Db(e) => ServiceError::Fatal(e.to_string()),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
