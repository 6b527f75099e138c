//! Serde support for [`AccountNumber`].
//!
//! Account numbers serialize as their 16-character string. Deserializing runs
//! the full validator, so a payload with a bad checksum fails to decode
//! instead of producing an untrusted value.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::AccountNumber;

impl Serialize for AccountNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AccountNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AccountNumberVisitor;

        impl de::Visitor<'_> for AccountNumberVisitor {
            type Value = AccountNumber;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 16-character account number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                AccountNumber::parse(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AccountNumberVisitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::{AccountNumber, AccountType};

    #[test]
    fn serializes_as_string() {
        let number = AccountNumber::parse("FTSC202500155806").unwrap();
        let json = serde_json::to_string(&number).unwrap();
        assert_eq!(json, "\"FTSC202500155806\"");
        let back: AccountNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, number);
    }

    #[test]
    fn rejects_bad_checksum() {
        let err = serde_json::from_str::<AccountNumber>("\"FTSC202500155800\"").unwrap_err();
        assert!(err.to_string().contains("check digits do not match"));
    }

    #[test]
    fn account_type_names() {
        assert_eq!(
            serde_json::to_string(&AccountType::CreditCard).unwrap(),
            "\"CREDIT_CARD\""
        );
        assert_eq!(
            serde_json::from_str::<AccountType>("\"SAVINGS\"").unwrap(),
            AccountType::Savings
        );
    }
}
