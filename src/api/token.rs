//! The bearer token used to call the tickets REST API, stored at `.secrets/token.json`.

use crate::{utils, Result};
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::path::Path;

/// Example:
/// ```json
/// { "access_token": "eyJhbGciOi..." }
/// ```
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AccessToken {
    access_token: String,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into().trim().to_string(),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let token: Self = utils::deserialize(path)
            .await
            .context("Unable to deserialize the token JSON file")?;
        ensure!(
            !token.access_token.is_empty(),
            "The token file at {} holds an empty access_token",
            path.display()
        );
        Ok(token)
    }

    /// Writes the token as JSON, readable only by the owner.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize token to JSON")?;
        utils::write(path, json).await?;
        utils::restrict_permissions(path)
    }

    pub fn secret(&self) -> &str {
        &self.access_token
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .finish()
    }
}
