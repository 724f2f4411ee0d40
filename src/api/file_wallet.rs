//! Reads a statement that was saved to disk, e.g. with `curl`, instead of calling the API.

use crate::api::Wallet;
use crate::error::{ErrorType, IntoResult};
use crate::model::TicketStatement;
use crate::{utils, Result};
use std::path::PathBuf;
use tracing::debug;

/// A `Wallet` backed by a JSON file with the same shape as the REST response.
#[derive(Debug, Clone)]
pub struct FileWallet {
    path: PathBuf,
}

impl FileWallet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl Wallet for FileWallet {
    async fn get_statement(&mut self) -> Result<TicketStatement> {
        debug!("Reading statement from {}", self.path.display());
        let json = utils::read(&self.path).await.pub_result(ErrorType::Config)?;
        TicketStatement::from_json(&json).pub_result(ErrorType::Payload)
    }
}
