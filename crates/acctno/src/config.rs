use crate::{
    AccountType, Error, InstitutionCode, InvalidReason, Result, ScopeStrategy, TypeCode,
    ValidationResult, validate,
};

pub const DEFAULT_INSTITUTION: &str = "FTS";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fixed mapping between account types and their one-letter codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeCodes {
    checking: TypeCode,
    savings: TypeCode,
    credit_card: TypeCode,
}

impl TypeCodes {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if two account types share a code.
    pub fn new(checking: TypeCode, savings: TypeCode, credit_card: TypeCode) -> Result<Self> {
        if checking == savings || checking == credit_card || savings == credit_card {
            return Err(Error::invalid_config(format!(
                "type codes must be distinct, got {checking}/{savings}/{credit_card}"
            )));
        }
        Ok(Self {
            checking,
            savings,
            credit_card,
        })
    }

    /// The exhaustive match is the whole mapping: every account type has a
    /// code, so there is no unmapped case at runtime.
    pub const fn code_for(&self, account_type: AccountType) -> TypeCode {
        match account_type {
            AccountType::Checking => self.checking,
            AccountType::Savings => self.savings,
            AccountType::CreditCard => self.credit_card,
        }
    }

    pub fn account_type_for(&self, code: TypeCode) -> Option<AccountType> {
        AccountType::ALL
            .into_iter()
            .find(|ty| self.code_for(*ty) == code)
    }
}

impl Default for TypeCodes {
    fn default() -> Self {
        Self {
            checking: TypeCode::from_byte(b'C'),
            savings: TypeCode::from_byte(b'S'),
            credit_card: TypeCode::from_byte(b'D'),
        }
    }
}

/// Immutable issuance settings, loaded once at process start.
///
/// Share it behind an [`Arc`](std::sync::Arc) (see
/// [`Issuer::from_shared`](crate::Issuer::from_shared)) instead of cloning
/// it into globals.
///
/// # Example
///
/// ```
/// use acctno::{InstitutionCode, IssuerConfig, ScopeStrategy};
///
/// let config = IssuerConfig::new(InstitutionCode::new("FTS").unwrap())
///     .with_scope(ScopeStrategy::PeriodAndType)
///     .with_max_attempts(5)
///     .unwrap();
/// assert_eq!(config.max_attempts(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuerConfig {
    institution: InstitutionCode,
    type_codes: TypeCodes,
    scope: ScopeStrategy,
    max_attempts: u32,
}

impl IssuerConfig {
    pub fn new(institution: InstitutionCode) -> Self {
        Self {
            institution,
            type_codes: TypeCodes::default(),
            scope: ScopeStrategy::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_type_codes(mut self, type_codes: TypeCodes) -> Self {
        self.type_codes = type_codes;
        self
    }

    pub fn with_scope(mut self, scope: ScopeStrategy) -> Self {
        self.scope = scope;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for zero attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Result<Self> {
        if max_attempts == 0 {
            return Err(Error::invalid_config("max attempts must be at least 1"));
        }
        self.max_attempts = max_attempts;
        Ok(self)
    }

    pub const fn institution(&self) -> InstitutionCode {
        self.institution
    }

    pub const fn type_codes(&self) -> &TypeCodes {
        &self.type_codes
    }

    pub const fn scope(&self) -> ScopeStrategy {
        self.scope
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Validates an identifier that claims to come from this institution.
    ///
    /// Runs [`validate`] and additionally requires our institution code and a
    /// type code that maps to an account type.
    pub fn validate_policy(&self, candidate: &str) -> ValidationResult {
        let res = validate(candidate);
        if !res.valid {
            return res;
        }
        let bytes = candidate.as_bytes();
        if bytes[..InstitutionCode::LEN] != self.institution.as_bytes()[..] {
            return ValidationResult::invalid(InvalidReason::UnknownInstitution);
        }
        let code = TypeCode::from_byte(bytes[InstitutionCode::LEN]);
        if self.type_codes.account_type_for(code).is_none() {
            return ValidationResult::invalid(InvalidReason::UnknownTypeCode);
        }
        ValidationResult::VALID
    }
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self::new(InstitutionCode::from_bytes(*b"FTS"))
    }
}
