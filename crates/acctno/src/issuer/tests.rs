use std::collections::HashSet;

use crate::{
    AccountType, Error, FixedPeriod, IssuerConfig, Period, ScopeStrategy, StoreError, validate,
};

use super::Issuer;
use crate::store::tests::MockStore;

fn y2025() -> Period {
    Period::new(2025).unwrap()
}

fn persist(store: &mut MockStore, number: &crate::AccountNumber) -> Result<(), StoreError> {
    store.persist(number.as_str())
}

#[test]
fn issues_valid_numbers_for_every_type() {
    let issuer = Issuer::default();
    let mut store = MockStore::in_tx();
    let expected = [
        (AccountType::Checking, "FTSC202500000121"),
        (AccountType::Savings, "FTSS202500000291"),
        (AccountType::CreditCard, "FTSD202500000362"),
    ];
    for (ty, number) in expected {
        let issued = issuer.issue(&mut store, ty, y2025(), persist).unwrap();
        assert_eq!(issued.as_str(), number);
        assert!(validate(issued.as_str()).valid);
        assert_eq!(issued.account_type(issuer.config().type_codes()), Some(ty));
    }
}

#[test]
fn sequential_issuance_is_gapless() {
    let issuer = Issuer::default();
    let mut store = MockStore::in_tx();
    let sequences: Vec<u32> = (0..50)
        .map(|_| {
            issuer
                .issue(&mut store, AccountType::Savings, y2025(), persist)
                .unwrap()
                .sequence()
        })
        .collect();
    assert_eq!(sequences, (1..=50).collect::<Vec<_>>());
}

#[test]
fn per_type_scope_keeps_separate_pools() {
    let config = IssuerConfig::default().with_scope(ScopeStrategy::PeriodAndType);
    let issuer = Issuer::new(config);
    let mut store = MockStore::in_tx();
    let c = issuer
        .issue(&mut store, AccountType::Checking, y2025(), persist)
        .unwrap();
    let s = issuer
        .issue(&mut store, AccountType::Savings, y2025(), persist)
        .unwrap();
    assert_eq!(c.sequence(), 1);
    assert_eq!(s.sequence(), 1);
    assert_ne!(c, s);
    assert_eq!(
        issuer.scope_for(AccountType::Savings, y2025()).as_str(),
        "2025-S"
    );
}

#[test]
fn retries_after_a_collision() {
    let issuer = Issuer::default();
    let mut store = MockStore::in_tx();
    store.taken.insert("FTSC202500000121".to_owned());

    let issued = issuer
        .issue(&mut store, AccountType::Checking, y2025(), persist)
        .unwrap();
    assert_eq!(issued.as_str(), "FTSC202500000218");
    assert_eq!(store.counters["2025"], 2);
}

#[test]
fn gives_up_after_max_attempts() {
    let issuer = Issuer::default();
    let mut store = MockStore::in_tx();
    let mut calls = 0;
    let err = issuer
        .issue(&mut store, AccountType::Checking, y2025(), |_, _| {
            calls += 1;
            Err(StoreError::UniqueViolation)
        })
        .unwrap_err();
    assert!(matches!(err, Error::IdentifierIssuanceFailed { attempts: 3 }));
    assert!(err.is_retryable());
    assert_eq!(calls, 3);
    assert_eq!(store.counters["2025"], 3);
}

#[test]
fn other_persist_errors_are_not_retried() {
    let issuer = Issuer::default();
    let mut store = MockStore::in_tx();
    let mut calls = 0;
    let err = issuer
        .issue(&mut store, AccountType::Checking, y2025(), |_, _| {
            calls += 1;
            Err(StoreError::backend("disk full"))
        })
        .unwrap_err();
    assert!(matches!(err, Error::Store(StoreError::Backend(_))));
    assert_eq!(calls, 1);
}

#[test]
fn requires_a_transaction() {
    let issuer = Issuer::default();
    let mut store = MockStore::default();
    let err = issuer
        .issue(&mut store, AccountType::Checking, y2025(), persist)
        .unwrap_err();
    assert!(matches!(err, Error::TransactionRequired));
    assert!(err.is_fatal());
    assert!(store.taken.is_empty());
}

#[test]
fn exhaustion_is_not_retried() {
    let issuer = Issuer::default();
    let mut store = MockStore::in_tx();
    store.counters.insert("2025".to_owned(), 999_999);
    let err = issuer
        .issue(&mut store, AccountType::Checking, y2025(), persist)
        .unwrap_err();
    assert!(matches!(err, Error::SequenceExhausted { .. }));
    assert!(!err.is_retryable());
}

#[test]
fn issue_now_reads_the_clock() {
    let issuer = Issuer::default();
    let mut store = MockStore::in_tx();
    let clock = FixedPeriod(Period::new(2031).unwrap());
    let number = issuer
        .issue_now(&mut store, AccountType::CreditCard, &clock, persist)
        .unwrap();
    assert_eq!(number.period(), 2031);
}

#[test]
fn distinct_across_periods() {
    let issuer = Issuer::default();
    let mut store = MockStore::in_tx();
    let mut seen = HashSet::new();
    for year in [2024, 2025, 2026] {
        for ty in AccountType::ALL {
            let number = issuer
                .issue(&mut store, ty, Period::new(year).unwrap(), persist)
                .unwrap();
            assert!(seen.insert(number));
        }
    }
    assert_eq!(seen.len(), 9);
}
