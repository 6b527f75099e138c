#[cfg(feature = "tracing")]
use tracing::instrument;

use acctno::{AccountNumber, Issuer, Period, PeriodSource, ScopeKey, SystemPeriod};
use chrono::Utc;

use crate::{
    Account, AccountStatus, Error, NewAccount, Result, SqliteSequences, SqliteStore, accounts,
    sequences,
};

/// Opens, looks up, and deactivates accounts.
///
/// Each call to [`AccountService::create_account`] is one `BEGIN IMMEDIATE`
/// transaction holding the counter bump, every collision retry, and the final
/// insert.
#[derive(Debug)]
pub struct AccountService<P = SystemPeriod> {
    store: SqliteStore,
    issuer: Issuer,
    clock: P,
}

impl AccountService {
    pub fn new(store: SqliteStore, issuer: Issuer) -> Self {
        Self::with_clock(store, issuer, SystemPeriod)
    }
}

impl<P> AccountService<P>
where
    P: PeriodSource,
{
    pub fn with_clock(store: SqliteStore, issuer: Issuer, clock: P) -> Self {
        Self {
            store,
            issuer,
            clock,
        }
    }

    pub fn issuer(&self) -> &Issuer {
        &self.issuer
    }

    pub fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Opens an account numbered in the current period.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] before anything is written.
    /// - [`Error::Issuance`] for allocation failures, including
    ///   `IdentifierIssuanceFailed` after repeated collisions.
    /// - [`Error::Database`] for other SQLite failures.
    ///
    /// Nothing is persisted on error, the counter bump included.
    pub fn create_account(&mut self, request: &NewAccount) -> Result<Account> {
        let period = self.clock.current_period()?;
        self.create_account_in(request, period)
    }

    /// Opens an account numbered in `period`.
    ///
    /// # Errors
    ///
    /// See [`AccountService::create_account`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, request), fields(account_type = %request.account_type), err)
    )]
    pub fn create_account_in(&mut self, request: &NewAccount, period: Period) -> Result<Account> {
        request.validate()?;

        let now = Utc::now();
        let tx = self.store.begin()?;
        let mut id = 0;
        let number = self.issuer.issue(
            &mut SqliteSequences::new(&tx),
            request.account_type,
            period,
            |seqs, number| {
                id = accounts::insert_account(seqs.connection(), number, request, now)?;
                Ok(())
            },
        )?;
        tx.commit()?;

        #[cfg(feature = "tracing")]
        tracing::info!(%number, id, "account created");

        Ok(Account {
            id,
            account_number: number,
            name: request.name.trim().to_owned(),
            account_type: request.account_type,
            currency: request.currency.clone(),
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Finds an account by its number.
    ///
    /// The candidate is validated first; a malformed number never reaches
    /// the database.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAccountNumber`], [`Error::NotFound`], or
    /// [`Error::Database`].
    pub fn lookup(&self, candidate: &str) -> Result<Account> {
        let number = AccountNumber::parse(candidate)?;
        accounts::find_by_number(self.store.conn(), &number)?
            .ok_or_else(|| Error::NotFound(number.to_string()))
    }

    /// Marks an active account inactive and returns the updated row.
    ///
    /// # Errors
    ///
    /// Same as [`AccountService::lookup`]; an account that is already
    /// inactive is reported as [`Error::NotFound`].
    pub fn deactivate(&mut self, candidate: &str) -> Result<Account> {
        let number = AccountNumber::parse(candidate)?;
        if !accounts::set_status(
            self.store.conn(),
            &number,
            AccountStatus::Active,
            AccountStatus::Inactive,
            Utc::now(),
        )? {
            return Err(Error::NotFound(number.to_string()));
        }

        #[cfg(feature = "tracing")]
        tracing::info!(%number, "account deactivated");

        self.lookup(number.as_str())
    }

    /// Last sequence issued in `scope`.
    ///
    /// # Errors
    ///
    /// Propagates SQLite failures.
    pub fn counter_value(&self, scope: &ScopeKey) -> Result<Option<u32>> {
        Ok(sequences::counter_value(self.store.conn(), scope)?)
    }
}
