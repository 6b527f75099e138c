use crate::{
    AccountNumber, Error, InstitutionCode, Period, Result, Sequence, TypeCode,
    checksum::check_digits_of,
};

/// Assembles an account number from its components.
///
/// The base is `institution + type_code + period + sequence`, with the
/// sequence zero-padded to six digits; the mod-97 check digits of that base
/// are appended. Pure, performs no I/O.
///
/// # Errors
///
/// Returns [`Error::ChecksumComputationFailed`] if the check digits cannot be
/// computed. The component types only admit valid characters, so this does
/// not happen in practice.
///
/// # Example
///
/// ```
/// use acctno::{InstitutionCode, Period, Sequence, TypeCode, format, validate};
///
/// let number = format(
///     InstitutionCode::new("FTS").unwrap(),
///     TypeCode::new('C').unwrap(),
///     Period::new(2025).unwrap(),
///     Sequence::new(1558).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(number.as_str(), "FTSC202500155806");
/// assert!(validate(number.as_str()).valid);
/// ```
pub fn format(
    institution: InstitutionCode,
    type_code: TypeCode,
    period: Period,
    sequence: Sequence,
) -> Result<AccountNumber> {
    let mut buf = [0u8; AccountNumber::LEN];
    buf[AccountNumber::INSTITUTION].copy_from_slice(institution.as_bytes());
    buf[AccountNumber::TYPE_CODE] = type_code.as_byte();
    write_decimal(&mut buf[AccountNumber::PERIOD], u32::from(period.get()));
    write_decimal(&mut buf[AccountNumber::SEQUENCE], sequence.get());

    let base = &buf[..AccountNumber::BASE_LEN];
    let check = check_digits_of(base).ok_or_else(|| Error::ChecksumComputationFailed {
        base: String::from_utf8_lossy(base).into_owned(),
    })?;
    buf[AccountNumber::CHECK].copy_from_slice(&check.to_ascii());

    Ok(AccountNumber::from_checked(buf))
}

/// Right-aligned, zero-padded decimal into a fixed-width slot.
fn write_decimal(slot: &mut [u8], mut value: u32) {
    for digit in slot.iter_mut().rev() {
        *digit = b'0' + (value % 10) as u8;
        value /= 10;
    }
}
