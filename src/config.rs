//! Configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::{AppError, Result};

const KEYRING_SERVICE: &str = "star-relay";

fn default_poll_interval_seconds() -> u64 {
    60
}

fn default_request_timeout_seconds() -> u64 {
    30
}

/// Nested Slack configuration.
///
/// The API token is loaded at runtime via OS keychain or environment
/// variable, never from the TOML file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SlackConfig {
    /// Workspace subdomain used to build archive permalinks
    /// (`https://{team_domain}.slack.com/...`).
    pub team_domain: String,
    /// User token authorized for the star feed and the identity lookups
    /// (populated at runtime).
    #[serde(skip)]
    pub token: String,
}

/// Nested Asana configuration: fixed task-routing ids.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct AsanaConfig {
    /// Workspace gid every task is created in.
    pub workspace_id: String,
    /// Assignee gid for every created task.
    pub assignee_id: String,
    /// Project gid every task is filed under.
    pub project_id: String,
    /// Personal access token (populated at runtime).
    #[serde(skip)]
    pub token: String,
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Slack-side settings.
    pub slack: SlackConfig,
    /// Asana-side settings.
    pub asana: AsanaConfig,
    /// Seconds between poll cycles.
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,
    /// Upper bound on any single HTTP request.
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Poll interval as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Load provider credentials from OS keychain with env-var fallback.
    ///
    /// Tries the `star-relay` keyring service first, then falls back to
    /// the `SLACK_TOKEN` / `ASANA_TOKEN` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if neither keychain nor env vars
    /// provide a required token.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.slack.token = load_credential("slack_token", "SLACK_TOKEN").await?;
        self.asana.token = load_credential("asana_token", "ASANA_TOKEN").await?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("slack.team_domain", &self.slack.team_domain),
            ("asana.workspace_id", &self.asana.workspace_id),
            ("asana.assignee_id", &self.asana.assignee_id),
            ("asana.project_id", &self.asana.project_id),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(AppError::Config(format!("{field} must not be empty")));
            }
        }

        if self.poll_interval_seconds == 0 {
            return Err(AppError::Config(
                "poll_interval_seconds must be greater than zero".into(),
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err(AppError::Config(
                "request_timeout_seconds must be greater than zero".into(),
            ));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<String> {
    let key = keyring_key.to_owned();

    // Keyring is synchronous I/O, so it runs on the blocking pool.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(value),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    env::var(env_key).map_err(|_| {
        AppError::Config(format!(
            "credential {keyring_key} not found in keychain or {env_key} env var"
        ))
    })
}
