use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the wallet home directory and:
/// - Creates an initial `config.json` file using `api_url` along with default settings. An
///   existing `config.json` keeps its other settings and only gets the new `api_url`.
/// - Stores `token`, if given, at `.secrets/token.json` with owner-only permissions
///
/// # Arguments
/// - `wallet_home` - The directory that will be the root of the data directory, e.g. `$HOME/wallet`
/// - `api_url` - The base URL of the tickets REST API, e.g. `https://api.example.com/v1`
/// - `token` - The bearer token used to call the API. It can be stored later by running `init`
///   again.
///
/// # Errors
/// - Returns an error if `api_url` is invalid or any file operations fail.
pub async fn init(wallet_home: &Path, api_url: &str, token: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(wallet_home, api_url, token)
        .await
        .context("Unable to create the wallet directory and configs")
        .pub_result(ErrorType::Config)?;
    let message = match token {
        Some(_) => format!(
            "Successfully created the wallet directory at {}",
            config.root().display()
        ),
        None => format!(
            "Successfully created the wallet directory at {}. No token was given, store one \
            with 'wallet init --token' before fetching a summary",
            config.root().display()
        ),
    };
    Ok(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AccessToken;
    use crate::error::error_type;
    use crate::test::TestEnv;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_home() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("wallet");
        let out = init(&home, "https://api.example.com", Some("secret"))
            .await
            .unwrap();
        assert!(out.message().starts_with("Successfully"));

        let config = Config::load(&home).await.unwrap();
        let token = AccessToken::load(config.token_path()).await.unwrap();
        assert_eq!(token.secret(), "secret");
    }

    #[tokio::test]
    async fn test_init_bad_url_is_config_error() {
        let dir = TempDir::new().unwrap();
        let err = init(dir.path(), "::", None).await.unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Config));
    }

    #[tokio::test]
    async fn test_init_again_replaces_token_and_keeps_palette() {
        let mut env = TestEnv::new().await;
        env.set_palette("Eventos", "#000000").await;

        init(env.root(), "https://api.example.com", Some("fresh"))
            .await
            .unwrap();

        let config = Config::load(env.root()).await.unwrap();
        assert_eq!(config.api_url(), "https://api.example.com");
        assert_eq!(config.palette().color_for("Eventos"), "#000000");
        let token = AccessToken::load(config.token_path()).await.unwrap();
        assert_eq!(token.secret(), "fresh");
    }
}
