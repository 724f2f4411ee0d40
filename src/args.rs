//! These structs provide the CLI interface for the wallet CLI.

use crate::commands::OutputFormat;
use crate::summary::MonthSelector;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// wallet: A command-line tool for summarizing your ticket wallet.
///
/// The purpose of this program is to fetch your ticket balance and transactions from the tickets
/// REST API and turn them into the data behind the tickets screen: how many tickets moved in each
/// of the last six months, and how they split across categories.
///
/// Set WALLET_IN_TEST_MODE to any non-empty value to run against built-in sample data instead of
/// the API.
#[derive(Debug, Parser, Clone)]
#[command(version)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration files.
    ///
    /// This is the first command you should run. You need the base URL of the tickets REST API
    /// and, to fetch real data, an access token for it.
    ///
    /// - Decide what directory you want to store data in and pass this as --wallet-home. By
    ///   default, it will be $HOME/wallet.
    ///
    /// - Pass the base URL of the API as --api-url.
    ///
    /// - Pass your access token as --token. It is stored in $WALLET_HOME/.secrets/token.json and
    ///   only your user can read it. Run init again to replace it.
    Init(InitArgs),
    /// Fetch the statement and print the six month summary.
    Summary(SummaryArgs),
    /// Fetch the statement and report records that the summary leaves out.
    Check(CheckArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where wallet configuration and secrets are held. Defaults to ~/wallet
    #[arg(long, env = "WALLET_HOME", default_value_t = default_wallet_home())]
    wallet_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, wallet_home: PathBuf) -> Self {
        Self {
            log_level,
            wallet_home: wallet_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn wallet_home(&self) -> &DisplayPath {
        &self.wallet_home
    }
}

/// (Not shown): Args for the `wallet init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the tickets REST API, e.g. https://api.example.com/v1
    #[arg(long)]
    api_url: String,

    /// The bearer token used to call the API.
    #[arg(long)]
    token: Option<String>,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Where to read the statement from and which date to anchor the window on. Shared by `summary`
/// and `check`.
#[derive(Debug, Parser, Clone, Default)]
pub struct StatementArgs {
    /// Read the statement from this JSON file instead of calling the API.
    #[arg(long)]
    input: Option<PathBuf>,

    /// The date whose month ends the six month window, as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    reference_date: Option<NaiveDate>,
}

impl StatementArgs {
    pub fn new(input: Option<PathBuf>, reference_date: Option<NaiveDate>) -> Self {
        Self {
            input,
            reference_date,
        }
    }

    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.reference_date
    }
}

/// (Not shown): Args for the `wallet summary` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct SummaryArgs {
    #[clap(flatten)]
    statement: StatementArgs,

    /// The month to highlight: "latest", an index from 0 (oldest) to 5 (latest), or YYYY-MM.
    #[arg(long, default_value_t = MonthSelector::Latest)]
    month: MonthSelector,

    /// The output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

impl SummaryArgs {
    pub fn new(statement: StatementArgs, month: MonthSelector, format: OutputFormat) -> Self {
        Self {
            statement,
            month,
            format,
        }
    }

    pub fn statement(&self) -> &StatementArgs {
        &self.statement
    }

    pub fn month(&self) -> MonthSelector {
        self.month
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

/// (Not shown): Args for the `wallet check` command.
#[derive(Debug, Parser, Clone)]
pub struct CheckArgs {
    #[clap(flatten)]
    statement: StatementArgs,

    /// The output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

impl CheckArgs {
    pub fn new(statement: StatementArgs, format: OutputFormat) -> Self {
        Self { statement, format }
    }

    pub fn statement(&self) -> &StatementArgs {
        &self.statement
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

fn default_wallet_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("wallet"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --wallet-home or WALLET_HOME instead of relying on the default \
                wallet home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("wallet")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::YearMonth;

    #[test]
    fn test_parse_summary() {
        let args = Args::try_parse_from([
            "wallet",
            "--wallet-home",
            "/tmp/w",
            "summary",
            "--input",
            "statement.json",
            "--reference-date",
            "2024-03-20",
            "--month",
            "2024-01",
            "--format",
            "table",
        ])
        .unwrap();
        assert_eq!(args.common().wallet_home().path(), Path::new("/tmp/w"));
        let Command::Summary(summary) = args.command() else {
            panic!("expected the summary command");
        };
        assert_eq!(
            summary.statement().input(),
            Some(Path::new("statement.json"))
        );
        assert_eq!(
            summary.statement().reference_date(),
            NaiveDate::from_ymd_opt(2024, 3, 20)
        );
        assert_eq!(
            summary.month(),
            MonthSelector::Month(YearMonth::new(2024, 1).unwrap())
        );
        assert_eq!(summary.format(), OutputFormat::Table);
    }

    #[test]
    fn test_summary_defaults() {
        let args = Args::try_parse_from(["wallet", "summary"]).unwrap();
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
        let Command::Summary(summary) = args.command() else {
            panic!("expected the summary command");
        };
        assert_eq!(summary.month(), MonthSelector::Latest);
        assert_eq!(summary.format(), OutputFormat::Json);
        assert!(summary.statement().input().is_none());
    }

    #[test]
    fn test_parse_month_index_and_check() {
        let args = Args::try_parse_from(["wallet", "summary", "--month", "2"]).unwrap();
        let Command::Summary(summary) = args.command() else {
            panic!("expected the summary command");
        };
        assert_eq!(summary.month(), MonthSelector::Index(2));

        let args = Args::try_parse_from(["wallet", "check"]).unwrap();
        let Command::Check(check) = args.command() else {
            panic!("expected the check command");
        };
        assert_eq!(check.format(), OutputFormat::Table);
    }

    #[test]
    fn test_bad_reference_date_is_rejected() {
        assert!(Args::try_parse_from(["wallet", "summary", "--reference-date", "20/03/2024"])
            .is_err());
    }

    #[test]
    fn test_init_requires_api_url() {
        assert!(Args::try_parse_from(["wallet", "init"]).is_err());
        let args =
            Args::try_parse_from(["wallet", "init", "--api-url", "https://x.io", "--token", "t"])
                .unwrap();
        let Command::Init(init) = args.command() else {
            panic!("expected the init command");
        };
        assert_eq!(init.api_url(), "https://x.io");
        assert_eq!(init.token(), Some("t"));
    }
}
