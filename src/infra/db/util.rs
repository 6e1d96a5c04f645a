use crate::application::repos::RepoError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const NOT_NULL_VIOLATION: &str = "23502";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";
const QUERY_CANCELED: &str = "57014";

/// Maps driver errors onto repository errors by Postgres SQLSTATE.
///
/// A foreign-key violation means the owning registration disappeared while
/// the write was in flight, so it surfaces as `NotFound` rather than as an
/// integrity failure.
pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        sqlx::Error::Database(db) => {
            let code = db.code().map(|code| code.into_owned());
            match code.as_deref() {
                Some(UNIQUE_VIOLATION) => RepoError::Duplicate {
                    constraint: db.constraint().unwrap_or("unknown").to_string(),
                },
                Some(FOREIGN_KEY_VIOLATION) => RepoError::NotFound,
                Some(INVALID_TEXT_REPRESENTATION) | Some(NOT_NULL_VIOLATION) => {
                    RepoError::InvalidInput {
                        message: db.message().to_string(),
                    }
                }
                Some(CHECK_VIOLATION) => RepoError::Integrity {
                    message: db.message().to_string(),
                },
                Some(QUERY_CANCELED) => RepoError::Timeout,
                _ => RepoError::from_persistence(db),
            }
        }
        other => RepoError::from_persistence(other),
    }
}
