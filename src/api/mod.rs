//! Sources of ticket statements.
//!
//! The `Wallet` trait is the seam between the CLI and wherever the balance and transactions come
//! from: the REST API, a JSON file on disk or the seeded in-memory `TestWallet`.

mod file_wallet;
mod rest;
mod test_wallet;
mod token;

use crate::model::TicketStatement;
use crate::{Config, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

pub use file_wallet::FileWallet;
pub use rest::RestWallet;
pub use test_wallet::TestWallet;
pub use token::AccessToken;

/// When this environment variable is set and non-empty, `Mode::from_env` returns `Mode::Test`.
pub const TEST_MODE_ENV: &str = "WALLET_IN_TEST_MODE";

/// Fetches the ticket statement of the authenticated user.
#[async_trait::async_trait]
pub trait Wallet: Send {
    /// Returns the current balance together with the transactions behind it.
    async fn get_statement(&mut self) -> Result<TicketStatement>;
}

/// Selects where statements are fetched from.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Use the REST API configured in `config.json`.
    #[default]
    Rest,
    /// Use the seeded, in-memory `TestWallet`.
    Test,
}

impl Mode {
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Rest,
        }
    }
}

/// Where a statement should be loaded from when running a command.
#[derive(Debug, Clone)]
pub enum Source {
    /// Use `Mode` to choose between the REST API and the test wallet.
    Remote(Mode),
    /// Read the statement from a JSON file.
    File(PathBuf),
}

/// Creates the `Wallet` for `source`. `anchor` is only used by the test wallet to place its seed
/// data relative to the reference date.
pub async fn wallet(
    config: Option<&Config>,
    source: Source,
    anchor: NaiveDate,
) -> Result<Box<dyn Wallet>> {
    match source {
        Source::File(path) => Ok(Box::new(FileWallet::new(path))),
        Source::Remote(Mode::Test) => Ok(Box::new(TestWallet::seeded(anchor))),
        Source::Remote(Mode::Rest) => {
            let config = config.ok_or_else(|| {
                anyhow::anyhow!("A wallet home is needed to reach the REST API, run 'wallet init'")
            })?;
            Ok(Box::new(RestWallet::new(config).await?))
        }
    }
}
