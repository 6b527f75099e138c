use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    AccountNumber, AccountType, Error, IssuerConfig, Period, PeriodSource, Result, ScopeKey,
    SequenceStore, StoreError, format, next_sequence,
};

/// Coordinates allocation, formatting, and persistence of new account numbers.
///
/// An issuer holds only immutable configuration, so it is cheap to clone and
/// safe to share between request handlers. All mutable state lives in the
/// store handle passed to [`Issuer::issue`].
///
/// ## Collision handling
///
/// The store bumps its counter atomically, so two transactions in the same
/// scope never see the same sequence. The uniqueness constraint on the
/// account number column is the backstop: if the insert still collides (for
/// example with a row written by an older, non-atomic issuer) the issuer
/// allocates a fresh sequence and tries again, up to
/// [`IssuerConfig::max_attempts`] times.
#[derive(Clone, Debug, Default)]
pub struct Issuer {
    config: Arc<IssuerConfig>,
}

impl Issuer {
    pub fn new(config: IssuerConfig) -> Self {
        Self::from_shared(Arc::new(config))
    }

    pub fn from_shared(config: Arc<IssuerConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    /// The counter key an issuance of `account_type` in `period` draws from.
    pub fn scope_for(&self, account_type: AccountType, period: Period) -> ScopeKey {
        let type_code = self.config.type_codes().code_for(account_type);
        self.config.scope().key(period, type_code)
    }

    /// Issues one account number and persists it through `persist`.
    ///
    /// `store` must be inside the transaction that also inserts the account
    /// row. `persist` receives the store back together with the candidate
    /// number and should insert the owning row, reporting a duplicate as
    /// [`StoreError::UniqueViolation`].
    ///
    /// # Errors
    ///
    /// - [`Error::TransactionRequired`] if `store` is outside a transaction.
    /// - [`Error::SequenceExhausted`] when the scope is full. Not retried.
    /// - [`Error::IdentifierIssuanceFailed`] after `max_attempts` collisions.
    /// - [`Error::LockTimeout`] or [`Error::Store`] for any other store
    ///   failure, including one raised by `persist`.
    ///
    /// Every error leaves the transaction in a state the caller must roll back.
    ///
    /// # Example
    ///
    /// ```
    /// use acctno::{AccountType, Issuer, Period, ScopeKey, SequenceStore, StoreError};
    /// use std::collections::HashMap;
    ///
    /// #[derive(Default)]
    /// struct Counters(HashMap<String, u32>);
    ///
    /// impl SequenceStore for Counters {
    ///     fn in_transaction(&self) -> bool {
    ///         true
    ///     }
    ///
    ///     fn increment(&mut self, scope: &ScopeKey, ceiling: u32) -> Result<Option<u32>, StoreError> {
    ///         let value = self.0.entry(scope.to_string()).or_insert(0);
    ///         if *value >= ceiling {
    ///             return Ok(None);
    ///         }
    ///         *value += 1;
    ///         Ok(Some(*value))
    ///     }
    /// }
    ///
    /// let issuer = Issuer::default();
    /// let mut counters = Counters::default();
    /// let number = issuer
    ///     .issue(&mut counters, AccountType::Checking, Period::new(2025).unwrap(), |_, _| Ok(()))
    ///     .unwrap();
    /// assert_eq!(number.as_str(), "FTSC202500000121");
    /// ```
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, store, persist), err)
    )]
    pub fn issue<S, F>(
        &self,
        store: &mut S,
        account_type: AccountType,
        period: Period,
        mut persist: F,
    ) -> Result<AccountNumber>
    where
        S: SequenceStore + ?Sized,
        F: FnMut(&mut S, &AccountNumber) -> Result<(), StoreError>,
    {
        let type_code = self.config.type_codes().code_for(account_type);
        let scope = self.config.scope().key(period, type_code);
        let max_attempts = self.config.max_attempts();

        for _attempt in 1..=max_attempts {
            let sequence = next_sequence(store, &scope)?;
            let number = format(self.config.institution(), type_code, period, sequence)?;

            match persist(store, &number) {
                Ok(()) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(%number, attempt = _attempt, "issued account number");
                    return Ok(number);
                }
                Err(StoreError::UniqueViolation) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        %number,
                        attempt = _attempt,
                        max_attempts,
                        "account number already taken, allocating again"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(Error::IdentifierIssuanceFailed {
            attempts: max_attempts,
        })
    }

    /// Like [`Issuer::issue`], reading the period from `clock`.
    ///
    /// # Errors
    ///
    /// See [`Issuer::issue`]; additionally [`Error::InvalidPeriod`] if the
    /// clock reports a year that does not have four digits.
    pub fn issue_now<S, F, P>(
        &self,
        store: &mut S,
        account_type: AccountType,
        clock: &P,
        persist: F,
    ) -> Result<AccountNumber>
    where
        S: SequenceStore + ?Sized,
        F: FnMut(&mut S, &AccountNumber) -> Result<(), StoreError>,
        P: PeriodSource + ?Sized,
    {
        let period = clock.current_period()?;
        self.issue(store, account_type, period, persist)
    }
}

#[cfg(test)]
mod tests;
