use core::{fmt, str::FromStr};

use crate::{Period, TypeCode};

/// How sequence numbers are partitioned.
///
/// The type code is part of every account number, so both strategies yield
/// globally unique identifiers. They differ in how quickly a pool runs out and
/// in whether checking and savings accounts opened in the same year share one
/// counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScopeStrategy {
    /// One pool per year shared by every account type.
    #[default]
    Period,
    /// One pool per year and type code.
    PeriodAndType,
}

impl ScopeStrategy {
    /// Derives the counter key for an issuance.
    pub fn key(self, period: Period, type_code: TypeCode) -> ScopeKey {
        match self {
            Self::Period => ScopeKey(period.to_string()),
            Self::PeriodAndType => ScopeKey(format!("{period}-{type_code}")),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Period => "period",
            Self::PeriodAndType => "period-type",
        }
    }
}

impl fmt::Display for ScopeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown scope strategy {0:?} (expected period or period-type)")]
pub struct UnknownScopeStrategy(pub String);

impl FromStr for ScopeStrategy {
    type Err = UnknownScopeStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "period" | "year" => Ok(Self::Period),
            "period-type" | "period_type" | "year-type" => Ok(Self::PeriodAndType),
            _ => Err(UnknownScopeStrategy(s.to_owned())),
        }
    }
}

/// Key of one sequence counter row, e.g. `2025` or `2025-C`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeKey(String);

impl ScopeKey {
    /// Wraps a key read back from storage.
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
