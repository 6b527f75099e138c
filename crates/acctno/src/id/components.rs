use core::fmt;

use crate::{Error, Result};

/// Three upper-case ASCII letters identifying the issuing institution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstitutionCode([u8; 3]);

impl InstitutionCode {
    pub const LEN: usize = 3;

    /// Validates and wraps an institution code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] unless `code` is exactly three
    /// upper-case ASCII letters.
    pub fn new(code: &str) -> Result<Self> {
        let bytes: [u8; Self::LEN] = code.as_bytes().try_into().map_err(|_| {
            Error::invalid_config(format!("institution code {code:?} must be 3 letters"))
        })?;
        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(Error::invalid_config(format!(
                "institution code {code:?} must be upper-case A-Z"
            )));
        }
        Ok(Self(bytes))
    }

    pub(crate) const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: only upper-case ASCII letters are ever stored
        unsafe { core::str::from_utf8_unchecked(&self.0) }
    }
}

impl fmt::Display for InstitutionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single upper-case ASCII letter encoding the account type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeCode(u8);

impl TypeCode {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] unless `code` is in `A..=Z`.
    pub fn new(code: char) -> Result<Self> {
        if code.is_ascii_uppercase() {
            Ok(Self(code as u8))
        } else {
            Err(Error::invalid_config(format!(
                "type code {code:?} must be an upper-case letter"
            )))
        }
    }

    pub(crate) const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub const fn as_byte(self) -> u8 {
        self.0
    }

    pub const fn as_char(self) -> char {
        self.0 as char
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The four-digit issuance year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period(u16);

impl Period {
    pub const MIN: Self = Self(1000);
    pub const MAX: Self = Self(9999);

    /// Returns `None` unless `year` has exactly four digits.
    pub const fn new(year: u16) -> Option<Self> {
        if year >= Self::MIN.0 && year <= Self::MAX.0 {
            Some(Self(year))
        } else {
            None
        }
    }

    /// Converts a calendar year as reported by a clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPeriod`] for years outside `1000..=9999`.
    pub fn from_year(year: i32) -> Result<Self> {
        u16::try_from(year)
            .ok()
            .and_then(Self::new)
            .ok_or(Error::InvalidPeriod { year })
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A six-digit sequence number in `1..=999_999`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sequence(u32);

impl Sequence {
    pub const MIN: Self = Self(1);
    pub const MAX: Self = Self(999_999);

    pub const fn new(value: u32) -> Option<Self> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:06}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn institution_code_rules() {
        assert_eq!(InstitutionCode::new("FTS").unwrap().as_str(), "FTS");
        for bad in ["FT", "FTSX", "fts", "F1S", ""] {
            assert!(
                matches!(InstitutionCode::new(bad), Err(Error::InvalidConfig { .. })),
                "{bad}"
            );
        }
    }

    #[test]
    fn type_code_rules() {
        assert_eq!(TypeCode::new('C').unwrap().as_char(), 'C');
        assert!(TypeCode::new('c').is_err());
        assert!(TypeCode::new('1').is_err());
        assert!(TypeCode::new('É').is_err());
    }

    #[test]
    fn period_bounds() {
        assert_eq!(Period::new(2025).unwrap().to_string(), "2025");
        assert!(Period::new(999).is_none());
        assert!(Period::new(10_000).is_none());
        assert!(matches!(
            Period::from_year(-4),
            Err(Error::InvalidPeriod { year: -4 })
        ));
        assert_eq!(Period::from_year(2031).unwrap().get(), 2031);
    }

    #[test]
    fn sequence_bounds_and_padding() {
        assert!(Sequence::new(0).is_none());
        assert!(Sequence::new(1_000_000).is_none());
        assert_eq!(Sequence::new(1558).unwrap().to_string(), "001558");
        assert_eq!(Sequence::MAX.to_string(), "999999");
    }
}
