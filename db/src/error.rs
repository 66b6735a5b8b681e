use sea_orm::DbErr;
use thiserror::Error;

/// Database-layer error kind, mapped by the `api` crate's `AppError` onto
/// the five error kinds in the error-handling design (Validation,
/// AuthRequired, ConflictDuplicate, TransientIO, Fatal).
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("record not found")]
    NotFound,

    #[error("duplicate row: {0}")]
    Duplicate(String),

    #[error("database error: {0}")]
    Db(#[from] DbErr),
}
