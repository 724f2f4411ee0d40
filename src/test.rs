//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::{utils, Config};
use std::path::Path;
use tempfile::TempDir;

/// Test environment that sets up a wallet home directory with a config file but no token.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a wallet home pointing at an API that is never called.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("wallet");
        let config = Config::create(&root, "http://127.0.0.1:9/api", None)
            .await
            .unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    pub fn root(&self) -> &Path {
        self.config.root()
    }

    /// Adds a palette override to `config.json` and reloads the config.
    pub async fn set_palette(&mut self, category: &str, color: &str) {
        let path = self.config.config_path().to_path_buf();
        let mut json: serde_json::Value =
            serde_json::from_str(&utils::read(&path).await.unwrap()).unwrap();
        json["palette"][category] = serde_json::Value::from(color);
        utils::write(&path, serde_json::to_string_pretty(&json).unwrap())
            .await
            .unwrap();
        self.config = Config::load(self.root()).await.unwrap();
    }
}

#[tokio::test]
async fn test_env_palette_override() {
    let mut env = TestEnv::new().await;
    env.set_palette("Eventos", "#010203").await;
    assert_eq!(env.config().palette().color_for("Eventos"), "#010203");
    assert!(env.config().token_path().starts_with(env.root()));
}
