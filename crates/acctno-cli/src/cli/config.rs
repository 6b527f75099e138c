use std::{path::PathBuf, time::Duration};

use acctno::{
    AccountType, DEFAULT_INSTITUTION, DEFAULT_MAX_ATTEMPTS, InstitutionCode, IssuerConfig,
    ScopeStrategy,
};
use acctno_sqlite::SqliteConfig;
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

/// Command-line arguments of the `acctno` binary.
///
/// Global settings can be given as flags, as environment variables, or in a
/// `.env` file next to the working directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "acctno",
    version,
    about = "Issue, validate, and look up self-validating account numbers"
)]
pub struct CliArgs {
    /// Path of the SQLite database holding accounts and sequence counters.
    ///
    /// Environment variable: `ACCTNO_DATABASE`
    #[arg(long, global = true, env = "ACCTNO_DATABASE", default_value = "acctno.db")]
    pub database: PathBuf,

    /// Three upper-case letters identifying the issuing institution.
    ///
    /// Environment variable: `ACCTNO_INSTITUTION`
    #[arg(long, global = true, env = "ACCTNO_INSTITUTION", default_value_t = String::from(DEFAULT_INSTITUTION))]
    pub institution: String,

    /// How sequence numbers are partitioned: `period` (one pool per year) or
    /// `period-type` (one pool per year and account type).
    ///
    /// Environment variable: `ACCTNO_SCOPE`
    #[arg(long, global = true, env = "ACCTNO_SCOPE", default_value_t = ScopeStrategy::Period)]
    pub scope: ScopeStrategy,

    /// Allocation attempts per account before giving up on collisions.
    ///
    /// Environment variable: `ACCTNO_MAX_ATTEMPTS`
    #[arg(long, global = true, env = "ACCTNO_MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Milliseconds to wait for the database write lock.
    ///
    /// Environment variable: `ACCTNO_LOCK_TIMEOUT_MS`
    #[arg(long, global = true, env = "ACCTNO_LOCK_TIMEOUT_MS", default_value_t = 5_000)]
    pub lock_timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the database schema.
    Init,

    /// Open accounts and print their numbers, one per line.
    Issue {
        /// checking, savings, or credit-card
        #[arg(long = "type", short = 't')]
        account_type: AccountType,

        /// Account holder name (2 to 50 characters).
        #[arg(long, default_value = "Account Holder")]
        name: String,

        /// ISO 4217 currency code.
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Number of accounts to open.
        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Issue under this year instead of the current one.
        #[arg(long)]
        period: Option<u16>,
    },

    /// Check account numbers; exits with status 1 if any is invalid.
    Validate {
        /// Also require this institution's code and a known type code.
        #[arg(long)]
        strict: bool,

        #[arg(required = true)]
        numbers: Vec<String>,
    },

    /// Show the stored account for a number.
    Lookup { number: String },

    /// Print the two check digits for a 14-character base.
    CheckDigits { base: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: PathBuf,
    pub issuer: IssuerConfig,
    pub sqlite: SqliteConfig,
    pub command: Command,
}

impl TryFrom<CliArgs> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let institution = InstitutionCode::new(&args.institution)
            .with_context(|| format!("ACCTNO_INSTITUTION ({:?}) is invalid", args.institution))?;

        if args.max_attempts == 0 {
            bail!("ACCTNO_MAX_ATTEMPTS must be greater than 0");
        }

        if args.lock_timeout_ms == 0 {
            bail!("ACCTNO_LOCK_TIMEOUT_MS must be greater than 0");
        }

        if let Command::Issue { count, .. } = &args.command {
            if *count == 0 {
                bail!("--count must be greater than 0");
            }
        }

        let issuer = IssuerConfig::new(institution)
            .with_scope(args.scope)
            .with_max_attempts(args.max_attempts)?;

        Ok(Self {
            database: args.database,
            issuer,
            sqlite: SqliteConfig {
                busy_timeout: Duration::from_millis(args.lock_timeout_ms),
                ..SqliteConfig::default()
            },
            command: args.command,
        })
    }
}
