use std::{io::Write, process::ExitCode};

use acctno::{Issuer, Period, compute_check_digits, validate};
use acctno_sqlite::{Account, AccountService, NewAccount, SqliteStore};
use anyhow::Context;

use super::config::{AppConfig, Command};

/// Executes the parsed subcommand, writing its output to `out`.
pub fn run(config: AppConfig, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    match &config.command {
        Command::Init => init(&config, out),
        Command::Issue {
            account_type,
            name,
            currency,
            count,
            period,
        } => {
            let request = NewAccount::new(name.as_str(), *account_type, currency.as_str());
            issue(&config, &request, *count, *period, out)
        }
        Command::Validate { strict, numbers } => validate_all(&config, *strict, numbers, out),
        Command::Lookup { number } => lookup(&config, number, out),
        Command::CheckDigits { base } => check_digits(base, out),
    }
}

fn open_store(config: &AppConfig) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore::open(&config.database, &config.sqlite)
        .with_context(|| format!("failed to open {}", config.database.display()))?;
    store.migrate().context("failed to create schema")?;
    Ok(store)
}

/// Opens a database that `init` or `issue` already created, leaving the schema
/// alone.
fn open_existing_store(config: &AppConfig) -> anyhow::Result<SqliteStore> {
    SqliteStore::open_existing(&config.database, &config.sqlite).with_context(|| {
        format!(
            "failed to open {} (run `acctno init` first)",
            config.database.display()
        )
    })
}

fn init(config: &AppConfig, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    open_store(config)?;
    tracing::info!(database = %config.database.display(), "schema ready");
    writeln!(out, "initialized {}", config.database.display())?;
    Ok(ExitCode::SUCCESS)
}

fn issue(
    config: &AppConfig,
    request: &NewAccount,
    count: u32,
    period: Option<u16>,
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    let period = period
        .map(|year| Period::from_year(i32::from(year)))
        .transpose()?;
    let issuer = Issuer::new(config.issuer.clone());
    let mut service = AccountService::new(open_store(config)?, issuer);

    for n in 1..=count {
        let account = match period {
            Some(period) => service.create_account_in(request, period),
            None => service.create_account(request),
        }
        .with_context(|| format!("failed to open account {n} of {count}"))?;
        writeln!(out, "{}", account.account_number)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn validate_all(
    config: &AppConfig,
    strict: bool,
    numbers: &[String],
    out: &mut impl Write,
) -> anyhow::Result<ExitCode> {
    let mut all_valid = true;
    for number in numbers {
        let res = if strict {
            config.issuer.validate_policy(number)
        } else {
            validate(number)
        };
        match res.reason {
            None => writeln!(out, "{number}\tvalid")?,
            Some(reason) => {
                all_valid = false;
                writeln!(out, "{number}\tinvalid: {reason}")?;
            }
        }
    }
    Ok(if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn lookup(config: &AppConfig, number: &str, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let issuer = Issuer::new(config.issuer.clone());
    let service = AccountService::new(open_existing_store(config)?, issuer);
    let account = service.lookup(number)?;
    print_account(&account, config, out)?;
    Ok(ExitCode::SUCCESS)
}

fn print_account(
    account: &Account,
    config: &AppConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let number = &account.account_number;
    let type_code = number.type_code();
    let issued_as = number
        .account_type(config.issuer.type_codes())
        .map_or_else(|| format!("unknown ({type_code})"), |ty| ty.to_string());

    writeln!(out, "number:      {number}")?;
    writeln!(out, "institution: {}", number.institution())?;
    writeln!(out, "type code:   {type_code} ({issued_as})")?;
    writeln!(out, "period:      {}", number.period())?;
    writeln!(out, "sequence:    {}", number.sequence())?;
    writeln!(out, "name:        {}", account.name)?;
    writeln!(out, "type:        {}", account.account_type)?;
    writeln!(out, "currency:    {}", account.currency)?;
    writeln!(out, "status:      {}", account.status)?;
    writeln!(out, "created:     {}", account.created_at.to_rfc3339())?;
    writeln!(out, "updated:     {}", account.updated_at.to_rfc3339())?;
    Ok(())
}

fn check_digits(base: &str, out: &mut impl Write) -> anyhow::Result<ExitCode> {
    let digits = compute_check_digits(base)?;
    writeln!(out, "{digits}")?;
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::config::CliArgs;
    use clap::Parser;

    struct Harness {
        dir: tempfile::TempDir,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn db(&self) -> std::path::PathBuf {
            self.dir.path().join("acctno.db")
        }

        fn try_run(&self, args: &[&str]) -> anyhow::Result<(ExitCode, String)> {
            let db = self.db();
            let argv = ["acctno", "--database", db.to_str().unwrap()]
                .into_iter()
                .chain(args.iter().copied());
            let config = AppConfig::try_from(CliArgs::try_parse_from(argv)?)?;
            let mut out = Vec::new();
            let code = run(config, &mut out)?;
            Ok((code, String::from_utf8(out)?))
        }

        fn run(&self, args: &[&str]) -> (ExitCode, String) {
            self.try_run(args).unwrap()
        }
    }

    #[test]
    fn check_digits_prints_two_digits() {
        let (code, out) = Harness::new().run(&["check-digits", "FTSC2025001558"]);
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(out, "06\n");
    }

    #[test]
    fn issue_then_lookup() {
        let harness = Harness::new();
        let (_, out) = harness.run(&["init"]);
        assert!(out.starts_with("initialized "));

        let (code, out) = harness.run(&[
            "issue", "--type", "checking", "--period", "2025", "--count", "2",
        ]);
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(out, "FTSC202500000121\nFTSC202500000218\n");

        let (code, out) = harness.run(&["lookup", "FTSC202500000218"]);
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(out.contains("sequence:    2\n"));
        assert!(out.contains("type code:   C (CHECKING)\n"));
        assert!(out.contains("status:      ACTIVE\n"));
    }

    #[test]
    fn validate_reports_each_number() {
        let (code, out) = Harness::new().run(&["validate", "FTSC202500155806"]);
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(out, "FTSC202500155806\tvalid\n");

        let (code, out) =
            Harness::new().run(&["validate", "FTSC202500155806", "FTSC202500155800"]);
        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.ends_with("FTSC202500155800\tinvalid: check digits do not match\n"));
    }

    #[test]
    fn lookup_does_not_create_a_database() {
        let harness = Harness::new();
        let err = harness
            .try_run(&["lookup", "FTSC202500000121"])
            .unwrap_err();
        assert!(err.to_string().contains("acctno init"), "{err:#}");
        assert!(!harness.db().exists());
    }
}
