// fastmask-client/src/config.rs
use crate::error::{Error, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fastmail JMAP discovery endpoint
pub const FASTMAIL_SESSION_URL: &str = "https://api.fastmail.com/.well-known/jmap";

pub const USERNAME_ENV: &str = "FM_USERNAME";
pub const TOKEN_ENV: &str = "FM_ME_TOKEN";
/// Set to `true`, `1` or `t` to skip loading `.env` from the working directory
pub const SKIP_DOTENV_ENV: &str = "FASTMASK_SKIP_DOTENV";

/// Username and API token for bearer authentication. Both are guaranteed
/// non-empty once constructed.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    token: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let token = token.into();

        if username.trim().is_empty() || token.trim().is_empty() {
            return Err(Error::Credential(format!(
                "No username/token found. Pass --username/--token or set {} and {}",
                USERNAME_ENV, TOKEN_ENV
            )));
        }

        Ok(Self { username, token })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Optional `config.toml` under the user's config directory
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub username: Option<String>,
    /// API token with the masked email scope
    #[serde(default)]
    pub token: Option<String>,
    /// Override for the JMAP discovery endpoint
    #[serde(default)]
    pub session_url: Option<String>,
}

impl Config {
    /// Load the config file, falling back to defaults when it does not exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_dir()?.join("config.toml");

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::from_file(&config_path)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    fn config_dir() -> Result<PathBuf> {
        let base_dirs = BaseDirs::new()
            .ok_or_else(|| Error::Config("Cannot determine config directory".to_string()))?;
        Ok(base_dirs.config_dir().join("fastmask"))
    }

    pub fn session_url(&self) -> &str {
        self.session_url.as_deref().unwrap_or(FASTMAIL_SESSION_URL)
    }

    /// Build credentials, preferring explicit values (flags or environment)
    /// over the config file
    pub fn credentials(&self, username: Option<String>, token: Option<String>) -> Result<Credentials> {
        let username = non_empty(username)
            .or_else(|| self.username.clone())
            .unwrap_or_default();
        let token = non_empty(token)
            .or_else(|| self.token.clone())
            .unwrap_or_default();
        Credentials::new(username, token)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Load `.env` from the working directory unless disabled by
/// `FASTMASK_SKIP_DOTENV`. Variables already set in the environment win.
pub fn load_dotenv() -> Option<PathBuf> {
    let skip = std::env::var(SKIP_DOTENV_ENV)
        .map(|v| is_truthy(&v))
        .unwrap_or(false);
    if skip {
        debug!("skipping .env loading");
        return None;
    }
    dotenvy::dotenv().ok()
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "t")
}
