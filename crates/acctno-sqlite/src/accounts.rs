use core::{fmt, str::FromStr};

use acctno::{AccountNumber, AccountType, StoreError};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, types::Type};

use crate::{Error, Result, error::to_store_error};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl AccountStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown account status {0:?}")]
pub struct UnknownAccountStatus(pub String);

impl FromStr for AccountStatus {
    type Err = UnknownAccountStatus;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            _ => Err(UnknownAccountStatus(s.to_owned())),
        }
    }
}

/// A request to open an account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        account_type: AccountType,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            account_type,
            currency: currency.into(),
        }
    }

    /// Checks the holder name and currency before any number is issued.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] if the trimmed name is not 2 to 50
    /// characters long, or the currency is not three upper-case letters.
    pub fn validate(&self) -> Result<()> {
        let name_len = self.name.trim().chars().count();
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
            return Err(Error::invalid_request(format!(
                "name must be {NAME_MIN_CHARS} to {NAME_MAX_CHARS} characters, got {name_len}"
            )));
        }
        let currency = self.currency.as_bytes();
        if currency.len() != 3 || !currency.iter().all(u8::is_ascii_uppercase) {
            return Err(Error::invalid_request(format!(
                "currency must be a three-letter code, got {:?}",
                self.currency
            )));
        }
        Ok(())
    }
}

/// A stored account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub account_number: AccountNumber,
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const SELECT_ACCOUNT: &str = "
SELECT id, account_number, name, account_type, currency, status, created_at, updated_at
FROM accounts
WHERE account_number = ?1";

impl Account {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let number: String = row.get(1)?;
        let account_type: String = row.get(3)?;
        let status: String = row.get(5)?;
        Ok(Self {
            id: row.get(0)?,
            account_number: AccountNumber::parse(&number).map_err(|e| conversion(1, e))?,
            name: row.get(2)?,
            account_type: account_type.parse().map_err(|e| conversion(3, e))?,
            currency: row.get(4)?,
            status: status.parse().map_err(|e| conversion(5, e))?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

fn conversion(
    idx: usize,
    err: impl core::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

/// Inserts the account row for a freshly issued number.
///
/// Reports a duplicate number as [`StoreError::UniqueViolation`]. SQLite
/// aborts only the failed statement, so the surrounding transaction stays
/// usable for the next attempt.
pub fn insert_account(
    conn: &Connection,
    number: &AccountNumber,
    request: &NewAccount,
    now: DateTime<Utc>,
) -> core::result::Result<i64, StoreError> {
    conn.prepare_cached(
        "INSERT INTO accounts
             (account_number, name, account_type, currency, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            number.as_str(),
            request.name.trim(),
            request.account_type.as_str(),
            request.currency,
            AccountStatus::Active.as_str(),
            now,
        ])
    })
    .map(|_| conn.last_insert_rowid())
    .map_err(to_store_error)
}

/// Loads the account owning `number`.
pub fn find_by_number(
    conn: &Connection,
    number: &AccountNumber,
) -> rusqlite::Result<Option<Account>> {
    conn.query_row(SELECT_ACCOUNT, [number.as_str()], Account::from_row)
        .optional()
}

/// Moves the account owning `number` from status `from` to `to`.
///
/// Returns `false`, leaving the row untouched, if there is no such account
/// or its current status is not `from`.
pub fn set_status(
    conn: &Connection,
    number: &AccountNumber,
    from: AccountStatus,
    to: AccountStatus,
    now: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE accounts SET status = ?1, updated_at = ?2
         WHERE account_number = ?3 AND status = ?4",
        params![to.as_str(), now, number.as_str(), from.as_str()],
    )?;
    Ok(changed == 1)
}
