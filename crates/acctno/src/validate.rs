use crate::{AccountNumber, checksum::check_digits_of};

/// Why a candidate account number was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum InvalidReason {
    /// The candidate is not exactly 16 bytes long.
    #[error("expected 16 characters, found {len}")]
    InvalidLength { len: usize },

    /// A letter where a digit belongs, a digit where a letter belongs, or
    /// anything outside `A-Z0-9`.
    #[error("unexpected character at offset {offset}")]
    InvalidCharacter { offset: usize },

    /// The trailing two digits do not match the recomputed check digits.
    #[error("check digits do not match")]
    InvalidChecksum,

    /// Well-formed, but issued under a different institution code.
    #[error("institution code is not ours")]
    UnknownInstitution,

    /// Well-formed, but the type code maps to no account type.
    #[error("unknown account type code")]
    UnknownTypeCode,
}

/// Outcome of [`validate`].
///
/// An invalid identifier is expected user input, so this is a plain value
/// rather than an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: Option<InvalidReason>,
}

impl ValidationResult {
    pub const VALID: Self = Self {
        valid: true,
        reason: None,
    };

    pub const fn invalid(reason: InvalidReason) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn into_result(self) -> Result<(), InvalidReason> {
        match self.reason {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }
}

impl From<Result<(), InvalidReason>> for ValidationResult {
    fn from(res: Result<(), InvalidReason>) -> Self {
        match res {
            Ok(()) => Self::VALID,
            Err(reason) => Self::invalid(reason),
        }
    }
}

/// Checks a candidate account number.
///
/// Rules, in order: the length is exactly 16; offsets `0..4` are `A-Z` and
/// offsets `4..16` are `0-9`; the trailing two digits equal the check digits
/// recomputed over the first 14 characters. Lower-case letters are rejected
/// rather than folded.
///
/// # Example
///
/// ```
/// use acctno::{InvalidReason, validate};
///
/// assert!(validate("FTSC202500155806").valid);
///
/// let res = validate("FTSC202500155800");
/// assert!(!res.valid);
/// assert_eq!(res.reason, Some(InvalidReason::InvalidChecksum));
/// ```
pub fn validate(candidate: &str) -> ValidationResult {
    let bytes = candidate.as_bytes();
    match <&[u8; AccountNumber::LEN]>::try_from(bytes) {
        Ok(bytes) => check_layout(bytes).into(),
        Err(_) => ValidationResult::invalid(InvalidReason::InvalidLength { len: bytes.len() }),
    }
}

pub(crate) fn check_layout(bytes: &[u8; AccountNumber::LEN]) -> Result<(), InvalidReason> {
    for (offset, byte) in bytes.iter().enumerate() {
        let expected_letter = offset <= AccountNumber::TYPE_CODE;
        let ok = if expected_letter {
            byte.is_ascii_uppercase()
        } else {
            byte.is_ascii_digit()
        };
        if !ok {
            return Err(InvalidReason::InvalidCharacter { offset });
        }
    }

    let (base, check) = bytes.split_at(AccountNumber::BASE_LEN);
    match check_digits_of(base) {
        Some(expected) if expected.to_ascii() == check => Ok(()),
        _ => Err(InvalidReason::InvalidChecksum),
    }
}
