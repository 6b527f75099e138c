use acctno::{InvalidReason, StoreError};
use rusqlite::ErrorCode;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Allocation, formatting, or the collision retry loop failed.
    #[error(transparent)]
    Issuance(#[from] acctno::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A lookup was attempted with a malformed identifier. The database was
    /// not queried.
    #[error("invalid account number: {0}")]
    InvalidAccountNumber(#[from] InvalidReason),

    #[error("invalid account request: {reason}")]
    InvalidRequest { reason: String },

    #[error("account not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Returns `true` when retrying the whole request is expected to succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Issuance(err) => err.is_retryable(),
            Self::Database(err) => matches!(classify(err), Some(StoreError::Busy)),
            _ => false,
        }
    }

    /// Wraps a failure to take the write lock; a busy database becomes the
    /// same [`acctno::Error::LockTimeout`] the sequence store reports.
    pub(crate) fn from_lock(err: rusqlite::Error) -> Self {
        match classify(&err) {
            Some(StoreError::Busy) => Self::Issuance(acctno::Error::LockTimeout),
            _ => Self::Database(err),
        }
    }

    pub(crate) fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }
}

/// Maps the SQLite failures the issuer reacts to onto [`StoreError`].
///
/// Returns `None` for everything else.
pub(crate) fn classify(err: &rusqlite::Error) -> Option<StoreError> {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return None;
    };
    match failure.code {
        ErrorCode::ConstraintViolation
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            Some(StoreError::UniqueViolation)
        }
        ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => Some(StoreError::Busy),
        _ => None,
    }
}

/// Converts a SQLite failure into the error shape the issuer expects.
pub(crate) fn to_store_error(err: rusqlite::Error) -> StoreError {
    classify(&err).unwrap_or_else(|| StoreError::backend(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    fn failure(code: i32) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(ffi::Error::new(code), None)
    }

    #[test]
    fn unique_violation() {
        let err = to_store_error(failure(ffi::SQLITE_CONSTRAINT_UNIQUE));
        assert!(matches!(err, StoreError::UniqueViolation));
    }

    #[test]
    fn other_constraints_are_not_collisions() {
        let err = to_store_error(failure(ffi::SQLITE_CONSTRAINT_NOTNULL));
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn busy_and_locked() {
        assert!(matches!(
            to_store_error(failure(ffi::SQLITE_BUSY)),
            StoreError::Busy
        ));
        assert!(matches!(
            to_store_error(failure(ffi::SQLITE_LOCKED)),
            StoreError::Busy
        ));
        assert!(Error::Database(failure(ffi::SQLITE_BUSY)).is_retryable());
        assert!(matches!(
            Error::from_lock(failure(ffi::SQLITE_BUSY)),
            Error::Issuance(acctno::Error::LockTimeout)
        ));
        assert!(matches!(
            Error::from_lock(failure(ffi::SQLITE_IOERR)),
            Error::Database(_)
        ));
        assert!(!Error::Database(failure(ffi::SQLITE_CORRUPT)).is_retryable());
    }
}
