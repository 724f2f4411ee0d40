//! Summaries of a ticket wallet: six months of ticket movement and a per-category breakdown,
//! built from the balance-and-transactions statement served by the tickets REST API.
//!
//! The aggregation lives in [`summary`] and is pure. Fetching, configuration and the CLI commands
//! wrap it.

mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod summary;
mod utils;

#[cfg(test)]
mod test;

pub use api::{
    wallet, AccessToken, FileWallet, Mode, RestWallet, Source, TestWallet, Wallet, TEST_MODE_ENV,
};
pub use config::Config;
pub use error::{error_type, CategorizedError, Error, ErrorType, IntoResult, Result};
