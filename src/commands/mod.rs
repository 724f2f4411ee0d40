//! Command handlers for the wallet CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod check;
mod init;
mod summary;

use crate::api::{self, Mode, Source};
use crate::args::StatementArgs;
use crate::config::CONFIG_JSON;
use crate::error::{ErrorType, IntoResult};
use crate::model::{CategoryPalette, TicketStatement};
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info};

pub use check::{check, CheckReport};
pub use init::init;
pub use summary::{render, summary, WalletReport};

/// The output type for a command. This allows the command to return a consistent message,
/// optionally structured data, and optionally rendered text meant for stdout.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,

    /// Text that is the product of the command, e.g. a rendered report.
    #[serde(skip)]
    output: Option<String>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

/// How `wallet summary` and `wallet check` write their results to stdout.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON with camelCase keys.
    #[default]
    Json,
    /// Aligned, human-readable text.
    Table,
    /// One CSV row per monthly bucket and per category.
    Csv,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
            output: None,
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
            output: None,
        }
    }

    /// Attach text that `print` writes to stdout.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Get the text meant for stdout.
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// Write the output (if any) to stdout, the message to `info!` and the structured data (if it
    /// exists) as JSON to `debug!`.
    pub fn print(&self) {
        if let Some(output) = self.output() {
            println!("{output}");
        }
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// A statement together with the settings used to summarize it.
struct Fetched {
    statement: TicketStatement,
    reference_date: NaiveDate,
    palette: CategoryPalette,
}

/// Loads the config (when it is needed or available), picks the wallet for `args` and `mode`, and
/// fetches the statement. `today` is used when no reference date was given.
async fn fetch_statement(
    wallet_home: &Path,
    mode: Mode,
    args: &StatementArgs,
    today: NaiveDate,
) -> Result<Fetched> {
    let reference_date = args.reference_date().unwrap_or(today);
    let (config, source) = match (args.input(), mode) {
        (Some(input), _) => (
            optional_config(wallet_home).await?,
            Source::File(input.to_path_buf()),
        ),
        (None, Mode::Test) => (optional_config(wallet_home).await?, Source::Remote(mode)),
        (None, Mode::Rest) => (
            Some(
                Config::load(wallet_home)
                    .await
                    .pub_result(ErrorType::Config)?,
            ),
            Source::Remote(mode),
        ),
    };

    let palette = config
        .as_ref()
        .map(|c| c.palette().clone())
        .unwrap_or_default();
    let mut wallet = api::wallet(config.as_ref(), source, reference_date)
        .await
        .pub_result(ErrorType::Api)?;
    let statement = wallet.get_statement().await?;
    debug!(
        "Fetched {} transactions, reference date {reference_date}",
        statement.transactions.len()
    );

    Ok(Fetched {
        statement,
        reference_date,
        palette,
    })
}

/// Loads the config if the wallet home has one. A home that exists but holds a broken config is
/// still an error.
async fn optional_config(wallet_home: &Path) -> Result<Option<Config>> {
    if !wallet_home.join(CONFIG_JSON).is_file() {
        debug!(
            "No config found in {}, using the default palette",
            wallet_home.display()
        );
        return Ok(None);
    }
    Config::load(wallet_home)
        .await
        .map(Some)
        .pub_result(ErrorType::Config)
}
