//! Implements the `Wallet` trait against the tickets REST API.

use crate::api::{AccessToken, Wallet};
use crate::error::{ErrorType, IntoResult};
use crate::model::TicketStatement;
use crate::{Config, Result};
use anyhow::{anyhow, Context};
use reqwest::StatusCode;
use tracing::{debug, trace};
use url::Url;

/// Calls `GET {api_url}/{statement_path}` with the stored bearer token.
pub struct RestWallet {
    client: reqwest::Client,
    url: Url,
    token: AccessToken,
}

impl RestWallet {
    /// Loads the access token and builds an HTTP client with the configured timeout.
    pub async fn new(config: &Config) -> Result<Self> {
        let token_path = config.token_path();
        let token = AccessToken::load(&token_path)
            .await
            .with_context(|| {
                format!(
                    "No usable access token at {}, run 'wallet init --token' to store one",
                    token_path.display()
                )
            })
            .pub_result(ErrorType::Auth)?;
        Self::with_token(config.statement_url().clone(), token, config.timeout())
    }

    pub(crate) fn with_token(
        url: Url,
        token: AccessToken,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Unable to build the HTTP client")
            .pub_result(ErrorType::Api)?;
        Ok(Self { client, url, token })
    }
}

#[async_trait::async_trait]
impl Wallet for RestWallet {
    async fn get_statement(&mut self) -> Result<TicketStatement> {
        debug!("Fetching statement from {}", self.url);
        let response = self
            .client
            .get(self.url.clone())
            .bearer_auth(self.token.secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.url))
            .pub_result(ErrorType::Api)?;

        let status = response.status();
        trace!("{} responded with {status}", self.url);
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(anyhow!(
                    "The API rejected the access token ({status}), store a new one with \
                    'wallet init --token'"
                ))
                .pub_result(ErrorType::Auth);
            }
            s if !s.is_success() => {
                return Err(anyhow!("The API responded with {status}")).pub_result(ErrorType::Api);
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .context("Unable to read the response body")
            .pub_result(ErrorType::Api)?;
        TicketStatement::from_json(&body).pub_result(ErrorType::Payload)
    }
}
