#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, Result, ScopeKey, Sequence, StoreError};

/// Durable storage for per-scope sequence counters.
///
/// Implementations are handles bound to one database transaction (or to a
/// connection that may or may not be inside one). The counter row for a scope
/// must be bumped atomically by the store itself, e.g. with a single
/// `INSERT .. ON CONFLICT DO UPDATE .. RETURNING` statement or a row lock taken
/// before the read. Reading the current maximum and adding one in application
/// code is not safe across processes.
///
/// After an insert fails with [`StoreError::UniqueViolation`] the handle must
/// remain usable, so the issuer can allocate again inside the same
/// transaction.
pub trait SequenceStore {
    /// Whether a transaction is currently open on this handle.
    fn in_transaction(&self) -> bool;

    /// Atomically bumps the counter for `scope` and returns the new value.
    ///
    /// A scope seen for the first time starts at `1`. Returns `Ok(None)`
    /// without modifying anything when the counter already equals `ceiling`.
    fn increment(&mut self, scope: &ScopeKey, ceiling: u32)
    -> Result<Option<u32>, StoreError>;
}

/// Allocates the next sequence number for `scope`.
///
/// # Errors
///
/// - [`Error::TransactionRequired`] if `store` is not inside a transaction.
/// - [`Error::SequenceExhausted`] if the scope already issued `999999`.
/// - [`Error::LockTimeout`] or [`Error::Store`] for store failures.
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(store)))]
pub fn next_sequence<S>(store: &mut S, scope: &ScopeKey) -> Result<Sequence>
where
    S: SequenceStore + ?Sized,
{
    if !store.in_transaction() {
        return Err(Error::TransactionRequired);
    }
    store
        .increment(scope, Sequence::MAX.get())?
        .and_then(Sequence::new)
        .ok_or_else(|| Error::SequenceExhausted {
            scope: scope.clone(),
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    /// In-memory counters with an explicit transaction flag and a set of
    /// "already persisted" account numbers.
    #[derive(Default)]
    pub(crate) struct MockStore {
        pub(crate) in_tx: bool,
        pub(crate) counters: HashMap<String, u32>,
        pub(crate) taken: HashSet<String>,
        pub(crate) busy: bool,
    }

    impl MockStore {
        pub(crate) fn in_tx() -> Self {
            Self {
                in_tx: true,
                ..Self::default()
            }
        }

        pub(crate) fn persist(&mut self, number: &str) -> Result<(), StoreError> {
            if self.taken.insert(number.to_owned()) {
                Ok(())
            } else {
                Err(StoreError::UniqueViolation)
            }
        }
    }

    impl SequenceStore for MockStore {
        fn in_transaction(&self) -> bool {
            self.in_tx
        }

        fn increment(
            &mut self,
            scope: &ScopeKey,
            ceiling: u32,
        ) -> Result<Option<u32>, StoreError> {
            if self.busy {
                return Err(StoreError::Busy);
            }
            let counter = self.counters.entry(scope.as_str().to_owned()).or_insert(0);
            if *counter >= ceiling {
                return Ok(None);
            }
            *counter += 1;
            Ok(Some(*counter))
        }
    }

    #[test]
    fn requires_a_transaction() {
        let mut store = MockStore::default();
        let err = next_sequence(&mut store, &ScopeKey::from_raw("2025")).unwrap_err();
        assert!(matches!(err, Error::TransactionRequired));
        assert!(store.counters.is_empty());
    }

    #[test]
    fn starts_at_one_and_increments() {
        let mut store = MockStore::in_tx();
        let scope = ScopeKey::from_raw("2025");
        for expected in 1..=5 {
            assert_eq!(next_sequence(&mut store, &scope).unwrap().get(), expected);
        }
    }

    #[test]
    fn scopes_are_independent() {
        let mut store = MockStore::in_tx();
        let a = ScopeKey::from_raw("2025-C");
        let b = ScopeKey::from_raw("2025-S");
        assert_eq!(next_sequence(&mut store, &a).unwrap().get(), 1);
        assert_eq!(next_sequence(&mut store, &a).unwrap().get(), 2);
        assert_eq!(next_sequence(&mut store, &b).unwrap().get(), 1);
    }

    #[test]
    fn exhausted_scope() {
        let mut store = MockStore::in_tx();
        store.counters.insert("2025".to_owned(), 999_998);
        let scope = ScopeKey::from_raw("2025");
        assert_eq!(next_sequence(&mut store, &scope).unwrap(), Sequence::MAX);
        let err = next_sequence(&mut store, &scope).unwrap_err();
        assert!(matches!(err, Error::SequenceExhausted { scope: s } if s.as_str() == "2025"));
        assert_eq!(store.counters["2025"], 999_999);
    }

    #[test]
    fn busy_store_times_out() {
        let mut store = MockStore::in_tx();
        store.busy = true;
        let err = next_sequence(&mut store, &ScopeKey::from_raw("2025")).unwrap_err();
        assert!(matches!(err, Error::LockTimeout));
    }
}
