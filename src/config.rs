//! Configuration file handling for the wallet CLI.
//!
//! The configuration file is stored at `$WALLET_HOME/config.json` and contains the location of the
//! tickets REST API, the request timeout, the path to the stored access token and any category
//! color overrides.

use crate::api::AccessToken;
use crate::model::CategoryPalette;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

const APP_NAME: &str = "wallet";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const TOKEN_JSON: &str = "token.json";
pub(crate) const CONFIG_JSON: &str = "config.json";
const STATEMENT_PATH: &str = "tickets/transactions";
const TIMEOUT_SECS: u64 = 30;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$WALLET_HOME` and from there it loads `$WALLET_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    statement_url: Url,
    palette: CategoryPalette,
}

impl Config {
    /// Creates the wallet home directory and:
    /// - Creates an initial `config.json` file using `api_url` along with default settings, or, if
    ///   one already exists, updates its `api_url` and keeps every other setting
    /// - Stores `token`, if given, in the secrets directory
    ///
    /// # Errors
    /// - Returns an error if `api_url` is not a valid URL or any file operation fails.
    pub async fn create(
        dir: impl Into<PathBuf>,
        api_url: &str,
        token: Option<&str>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the wallet home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;

        let config_path = root.join(CONFIG_JSON);
        let mut config_file = if config_path.is_file() {
            debug!("Updating the existing config file {}", config_path.display());
            ConfigFile::load(&config_path).await?
        } else {
            ConfigFile::default()
        };
        config_file.api_url = api_url.to_string();
        let statement_url = config_file.statement_url()?;
        let palette = CategoryPalette::default()
            .with_overrides(&config_file.palette)
            .with_context(|| format!("Invalid palette in {}", config_path.display()))?;
        config_file.save(&config_path).await?;

        let config = Self {
            root,
            secrets,
            config_path,
            statement_url,
            palette,
            config_file,
        };

        if let Some(token) = token {
            AccessToken::new(token)
                .save(config.token_path())
                .await
                .context("Unable to store the access token")?;
        }

        Ok(config)
    }

    /// This will
    /// - validate that `wallet_home` and its config file exist
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(wallet_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = wallet_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Wallet home is missing, run 'wallet init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;
        let statement_url = config_file.statement_url()?;
        let palette = CategoryPalette::default()
            .with_overrides(&config_file.palette)
            .with_context(|| format!("Invalid palette in {}", config_path.display()))?;

        Ok(Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
            statement_url,
            palette,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn secrets(&self) -> &Path {
        &self.secrets
    }

    pub fn api_url(&self) -> &str {
        &self.config_file.api_url
    }

    /// The full URL of the balance-and-transactions endpoint.
    pub fn statement_url(&self) -> &Url {
        &self.statement_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config_file.timeout_secs)
    }

    /// The category palette with any overrides from the config file applied.
    pub fn palette(&self) -> &CategoryPalette {
        &self.palette
    }

    /// Returns the stored `token_path` if it is absolute, otherwise resolves it against the wallet
    /// home.
    pub fn token_path(&self) -> PathBuf {
        let p = self.config_file.token_path();
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "wallet",
///   "config_version": 1,
///   "api_url": "https://api.example.com/v1/",
///   "statement_path": "tickets/transactions",
///   "timeout_secs": 30,
///   "token_path": ".secrets/token.json",
///   "palette": { "Eventos": "#FF6384" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "wallet"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the tickets REST API
    api_url: String,

    /// Path of the balance-and-transactions endpoint, relative to `api_url`
    #[serde(default = "default_statement_path")]
    statement_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,

    /// Path to the access token file (optional, relative to the wallet home or absolute)
    /// Defaults to $WALLET_HOME/.secrets/token.json if not specified
    #[serde(skip_serializing_if = "Option::is_none", default)]
    token_path: Option<PathBuf>,

    /// Category name to `#RRGGBB` color overrides
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    palette: BTreeMap<String, String>,
}

fn default_statement_path() -> String {
    STATEMENT_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    TIMEOUT_SECS
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: String::new(),
            statement_path: default_statement_path(),
            timeout_secs: TIMEOUT_SECS,
            token_path: None,
            palette: BTreeMap::new(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or has the wrong app_name
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.timeout_secs > 0,
            "Invalid timeout_secs in config file: must be greater than zero"
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }

    /// Gets the token path. If None, defaults to `.secrets/token.json`.
    fn token_path(&self) -> PathBuf {
        self.token_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(SECRETS).join(TOKEN_JSON))
    }

    /// Joins `statement_path` onto `api_url`, treating `api_url` as a directory.
    fn statement_url(&self) -> Result<Url> {
        let mut base = Url::parse(&self.api_url)
            .with_context(|| format!("Invalid api_url '{}'", self.api_url))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            bail!("The api_url '{}' must be an http or https URL", self.api_url);
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(self.statement_path.trim_start_matches('/'))
            .with_context(|| format!("Invalid statement_path '{}'", self.statement_path))
    }
}
