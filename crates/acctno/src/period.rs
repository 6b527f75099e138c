use crate::{Period, Result};

/// A source for the current issuance period.
///
/// This abstraction lets the issuer read the wall clock in production and a
/// pinned year in tests.
///
/// # Example
///
/// ```
/// use acctno::{FixedPeriod, Period, PeriodSource};
///
/// let clock = FixedPeriod(Period::new(2025).unwrap());
/// assert_eq!(clock.current_period().unwrap().get(), 2025);
/// ```
pub trait PeriodSource {
    /// Returns the period new identifiers are issued under.
    fn current_period(&self) -> Result<Period>;
}

/// Always reports the same period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedPeriod(pub Period);

impl PeriodSource for FixedPeriod {
    fn current_period(&self) -> Result<Period> {
        Ok(self.0)
    }
}

/// Reads the current UTC calendar year.
#[cfg_attr(docsrs, doc(cfg(feature = "clock")))]
#[cfg(feature = "clock")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemPeriod;

#[cfg(feature = "clock")]
impl PeriodSource for SystemPeriod {
    fn current_period(&self) -> Result<Period> {
        use chrono::Datelike;
        Period::from_year(chrono::Utc::now().year())
    }
}

#[cfg(all(test, feature = "clock"))]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn system_period_is_this_year() {
        let year = chrono::Utc::now().year();
        let period = SystemPeriod.current_period().unwrap();
        // tolerate a new year starting between the two reads
        assert!(i32::from(period.get()) - year <= 1);
        assert!(i32::from(period.get()) >= year);
    }
}
