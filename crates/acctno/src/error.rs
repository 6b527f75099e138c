//! Error types for account number issuance.
//!
//! Two families live here:
//!
//! - [`Error`] is raised by issuance: allocation, formatting, configuration,
//!   and store failures. Every variant aborts the enclosing transaction.
//! - [`StoreError`] is what a durable store reports back through the
//!   [`SequenceStore`] seam and the persist callback of [`Issuer::issue`].
//!
//! Validation never raises. A rejected identifier is ordinary input and is
//! reported as an [`InvalidReason`] inside a [`ValidationResult`].
//!
//! [`SequenceStore`]: crate::SequenceStore
//! [`Issuer::issue`]: crate::Issuer::issue
//! [`InvalidReason`]: crate::InvalidReason
//! [`ValidationResult`]: crate::ValidationResult

use crate::ScopeKey;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that issuing an account number can produce.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Sequence allocation was attempted outside a transaction.
    ///
    /// The counter bump and the account insert that consumes it must commit or
    /// roll back together. Seeing this means the caller has to be
    /// restructured; retrying will not help.
    #[error("no active transaction: sequence allocation must share the account insert transaction")]
    TransactionRequired,

    /// The scope already issued its last six-digit sequence.
    #[error("sequence exhausted for scope {scope}")]
    SequenceExhausted { scope: ScopeKey },

    /// The check-digit base contained something other than `A-Z` or `0-9`.
    ///
    /// Formatting only ever feeds validated components into the calculator,
    /// so this signals a bug upstream.
    #[error("failed to compute check digits for {base:?}")]
    ChecksumComputationFailed { base: String },

    /// Every attempt collided with an identifier that already exists.
    #[error("identifier issuance failed after {attempts} attempts")]
    IdentifierIssuanceFailed { attempts: u32 },

    /// The store gave up waiting for a lock.
    #[error("timed out waiting for the sequence lock")]
    LockTimeout,

    /// A configuration value was rejected at construction time.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A calendar year that does not fit the four-digit period field.
    #[error("year {year} does not fit a four-digit period")]
    InvalidPeriod { year: i32 },

    /// Any other failure reported by the durable store.
    #[error("store error: {0}")]
    Store(#[source] StoreError),
}

impl Error {
    /// Returns `true` when retrying the whole account-creation request is
    /// expected to succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::IdentifierIssuanceFailed { .. } | Self::LockTimeout
        )
    }

    /// Returns `true` for programming errors that no retry can fix.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::TransactionRequired | Self::ChecksumComputationFailed { .. }
        )
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Busy => Self::LockTimeout,
            other => Self::Store(other),
        }
    }
}

/// Failures reported by a durable store.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum StoreError {
    /// The insert hit the uniqueness constraint on the account number.
    #[error("unique constraint violated")]
    UniqueViolation,

    /// A lock could not be acquired within the configured timeout.
    #[error("store is busy")]
    Busy,

    /// Backend-specific failure.
    #[error(transparent)]
    Backend(Box<dyn core::error::Error + Send + Sync + 'static>),
}

impl StoreError {
    pub fn backend(err: impl Into<Box<dyn core::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Backend(err.into())
    }
}
