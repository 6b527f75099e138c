use core::fmt;

use num_bigint::BigUint;

use crate::{Error, Result};

const MODULUS: u32 = 97;
const COMPLEMENT: u32 = 98;

/// Two decimal check digits produced by the ISO 7064 mod-97 scheme.
///
/// The value always lies in `2..=98` and is rendered zero-padded to exactly
/// two characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CheckDigits(u8);

impl CheckDigits {
    /// Returns the numeric value of the check digits.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the two ASCII digits, most significant first.
    pub const fn to_ascii(self) -> [u8; 2] {
        [b'0' + self.0 / 10, b'0' + self.0 % 10]
    }

    /// Reads two ASCII digits that are already known to be `0-9`.
    pub(crate) const fn from_ascii(tens: u8, ones: u8) -> Self {
        Self((tens - b'0') * 10 + (ones - b'0'))
    }
}

impl fmt::Display for CheckDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// Computes the mod-97 check digits of `base`.
///
/// Every letter `A..=Z` is transliterated to `10..=35`, digits pass through,
/// and `"00"` is appended. The resulting numeral is read as an arbitrary
/// precision integer `N` and the check digits are `98 - (N mod 97)`.
///
/// # Errors
///
/// Returns [`Error::ChecksumComputationFailed`] if `base` is empty or holds
/// anything other than uppercase ASCII letters and digits.
///
/// # Example
///
/// ```
/// use acctno::compute_check_digits;
///
/// let digits = compute_check_digits("FTSC2025001558").unwrap();
/// assert_eq!(digits.to_string(), "06");
/// ```
pub fn compute_check_digits(base: &str) -> Result<CheckDigits> {
    check_digits_of(base.as_bytes()).ok_or_else(|| Error::ChecksumComputationFailed {
        base: base.to_owned(),
    })
}

/// Byte-level calculator shared by the formatter and the validator.
pub(crate) fn check_digits_of(base: &[u8]) -> Option<CheckDigits> {
    let numeral = transliterate(base)?;
    let n = BigUint::parse_bytes(&numeral, 10)?;
    let remainder = u32::try_from(&(n % MODULUS)).ok()?;
    let value = u8::try_from(COMPLEMENT - remainder).ok()?;
    Some(CheckDigits(value))
}

fn transliterate(base: &[u8]) -> Option<Vec<u8>> {
    if base.is_empty() {
        return None;
    }
    let mut out = Vec::with_capacity(base.len() * 2 + 2);
    for &byte in base {
        match byte {
            b'0'..=b'9' => out.push(byte),
            b'A'..=b'Z' => {
                let value = byte - b'A' + 10;
                out.push(b'0' + value / 10);
                out.push(b'0' + value % 10);
            }
            _ => return None,
        }
    }
    out.extend_from_slice(b"00");
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_identifier() {
        let digits = compute_check_digits("FTSC2025001558").unwrap();
        assert_eq!(digits.value(), 6);
        assert_eq!(digits.to_string(), "06");
        assert_eq!(digits.to_ascii(), *b"06");
    }

    #[test]
    fn pinned_values() {
        let cases = [
            ("FTSS2025001558", "79"),
            ("FTSC2025000001", "21"),
            ("FTSC2025000002", "18"),
            ("FTSS2025000001", "94"),
            ("FTSD2025000001", "68"),
            ("FTSC2025999999", "43"),
            ("FTSC2024000001", "05"),
        ];
        for (base, expected) in cases {
            assert_eq!(
                compute_check_digits(base).unwrap().to_string(),
                expected,
                "{base}"
            );
        }
    }

    #[test]
    fn transliteration_maps_letters_to_two_digits() {
        assert_eq!(transliterate(b"A9Z").unwrap(), b"1093500".to_vec());
    }

    #[test]
    fn numeral_exceeds_u64() {
        // 4 letters and 10 digits become 18 digits plus the "00" suffix.
        let numeral = transliterate(b"FTSC2025001558").unwrap();
        assert_eq!(numeral.len(), 20);
        assert!(BigUint::parse_bytes(&numeral, 10).unwrap() > BigUint::from(u64::MAX));
    }

    #[test]
    fn digits_only_base() {
        // 1200 mod 97 = 36
        assert_eq!(compute_check_digits("12").unwrap().value(), 62);
    }

    #[test]
    fn ninety_eight_is_a_legal_result() {
        // "97" + "00" = 9700, which is divisible by 97.
        let digits = compute_check_digits("97").unwrap();
        assert_eq!(digits.value(), 98);
        assert_eq!(digits.to_string(), "98");
    }

    #[test]
    fn single_digit_results_are_zero_padded() {
        // 9500 mod 97 = 91
        let digits = compute_check_digits("95").unwrap();
        assert_eq!(digits.value(), 7);
        assert_eq!(digits.to_string(), "07");
    }

    #[test]
    fn rejects_lowercase_and_symbols() {
        for base in ["ftsc2025001558", "FTS-2025", "FTS C", "", "FTSÇ"] {
            let err = compute_check_digits(base).unwrap_err();
            assert!(
                matches!(&err, Error::ChecksumComputationFailed { base: b } if b == base),
                "{base}: {err:?}"
            );
        }
    }
}
