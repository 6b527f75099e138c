use core::{fmt, str::FromStr};

use crate::{
    AccountType, CheckDigits, InstitutionCode, InvalidReason, TypeCode, TypeCodes,
    validate::check_layout,
};

/// A 16-character, self-validating account number.
///
/// ```text
///  FTS   C   2025   001558   06
///  |     |   |      |        |
///  |     |   |      |        +-- check digits (2, mod-97 over the first 14)
///  |     |   |      +----------- sequence (6, zero padded)
///  |     |   +------------------ period (4, issuance year)
///  |     +---------------------- type code (1)
///  +---------------------------- institution code (3)
/// ```
///
/// Values of this type are immutable and can only be obtained from
/// [`format`](crate::format()) or by parsing, so holding one proves that the
/// layout and the check digits are correct.
///
/// # Example
///
/// ```
/// use acctno::AccountNumber;
///
/// let number: AccountNumber = "FTSC202500155806".parse().unwrap();
/// assert_eq!(number.institution().as_str(), "FTS");
/// assert_eq!(number.type_code().as_char(), 'C');
/// assert_eq!(number.period(), 2025);
/// assert_eq!(number.sequence(), 1558);
/// assert_eq!(number.check_digits().to_string(), "06");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountNumber([u8; 16]);

impl AccountNumber {
    /// Total length of the canonical string.
    pub const LEN: usize = 16;
    /// Length of the part covered by the check digits.
    pub const BASE_LEN: usize = 14;

    pub(crate) const INSTITUTION: core::ops::Range<usize> = 0..3;
    pub(crate) const TYPE_CODE: usize = 3;
    pub(crate) const PERIOD: core::ops::Range<usize> = 4..8;
    pub(crate) const SEQUENCE: core::ops::Range<usize> = 8..14;
    pub(crate) const CHECK: core::ops::Range<usize> = 14..16;

    /// Wraps bytes that already passed layout and checksum validation.
    pub(crate) const fn from_checked(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Parses and validates a candidate account number.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvalidReason`] found.
    pub fn parse(candidate: &str) -> Result<Self, InvalidReason> {
        let bytes: [u8; Self::LEN] =
            candidate
                .as_bytes()
                .try_into()
                .map_err(|_| InvalidReason::InvalidLength {
                    len: candidate.len(),
                })?;
        check_layout(&bytes)?;
        Ok(Self(bytes))
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: construction only admits ASCII letters and digits
        unsafe { core::str::from_utf8_unchecked(&self.0) }
    }

    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    pub fn institution(&self) -> InstitutionCode {
        let mut code = [0; InstitutionCode::LEN];
        code.copy_from_slice(&self.0[Self::INSTITUTION]);
        InstitutionCode::from_bytes(code)
    }

    pub fn type_code(&self) -> TypeCode {
        TypeCode::from_byte(self.0[Self::TYPE_CODE])
    }

    /// Resolves the type code through a configured mapping.
    pub fn account_type(&self, codes: &TypeCodes) -> Option<AccountType> {
        codes.account_type_for(self.type_code())
    }

    /// Issuance year. Not range-checked beyond being four digits.
    pub fn period(&self) -> u16 {
        // at most 9999
        decimal(&self.0[Self::PERIOD]) as u16
    }

    /// Sequence number. Not range-checked beyond being six digits.
    pub fn sequence(&self) -> u32 {
        decimal(&self.0[Self::SEQUENCE])
    }

    pub fn check_digits(&self) -> CheckDigits {
        CheckDigits::from_ascii(self.0[Self::CHECK.start], self.0[Self::CHECK.start + 1])
    }

    /// The 14-character part the check digits are computed over.
    pub fn base(&self) -> &str {
        &self.as_str()[..Self::BASE_LEN]
    }
}

fn decimal(digits: &[u8]) -> u32 {
    digits
        .iter()
        .fold(0, |acc, &d| acc * 10 + u32::from(d - b'0'))
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccountNumber").field(&self.as_str()).finish()
    }
}

impl AsRef<str> for AccountNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for AccountNumber {
    type Err = InvalidReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for AccountNumber {
    type Error = InvalidReason;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AccountNumber> for String {
    fn from(number: AccountNumber) -> Self {
        number.as_str().to_owned()
    }
}
