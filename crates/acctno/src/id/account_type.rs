use core::{fmt, str::FromStr};

/// The kinds of account that can be opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
}

impl AccountType {
    pub const ALL: [Self; 3] = [Self::Checking, Self::Savings, Self::CreditCard];

    /// Canonical upper-case name, as stored alongside the account.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "CHECKING",
            Self::Savings => "SAVINGS",
            Self::CreditCard => "CREDIT_CARD",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown account type {0:?} (expected checking, savings or credit-card)")]
pub struct UnknownAccountType(pub String);

impl FromStr for AccountType {
    type Err = UnknownAccountType;

    /// Parses the canonical name case-insensitively; `-` and `_` are
    /// interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "CHECKING" => Ok(Self::Checking),
            "SAVINGS" => Ok(Self::Savings),
            "CREDIT_CARD" => Ok(Self::CreditCard),
            _ => Err(UnknownAccountType(s.to_owned())),
        }
    }
}
