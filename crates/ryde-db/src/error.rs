use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// The UNIQUE index on `email` rejected the write.
    #[error("email already registered")]
    DuplicateEmail,

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("DB lock poisoned")]
    LockPoisoned,

    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                DbError::DuplicateEmail
            }
            _ => DbError::Sqlite(err),
        }
    }
}
