//! Shared configuration for the comfocloud CLI.
//!
//! TOML profiles, refresh-token resolution (env + keyring + plaintext),
//! and translation to `comfocloud_core::HubConfig`. The OAuth2
//! authorization-code + PKCE helpers live in [`oauth`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use comfocloud_core::{HubConfig, TlsMode};

pub mod oauth;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no refresh token configured for profile '{profile}' -- run `comfocloud login` first")]
    NoCredentials { profile: String },

    #[error("keyring access failed: {0}")]
    Keyring(String),

    #[error("OAuth2 flow failed: {0}")]
    OAuth(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    30
}

/// A named account profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Cloud API base URL (defaults to the production endpoint).
    pub api_url: Option<String>,

    /// Default device id for commands that take one.
    pub device: Option<u32>,

    /// Environment variable name containing a refresh token.
    pub refresh_token_env: Option<String>,

    /// Refresh token in plaintext (prefer keyring or env var).
    pub refresh_token: Option<String>,

    /// OAuth2 client id override.
    pub client_id: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,

    /// Override poll interval (seconds).
    pub poll_interval: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "comfocloud", "comfocloud").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("comfocloud");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("COMFO_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Refresh-token resolution ────────────────────────────────────────

const KEYRING_SERVICE: &str = "comfocloud";

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/refresh-token"))
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Resolve a refresh token from the credential chain:
/// profile's env var, then system keyring, then plaintext in the profile.
pub fn resolve_refresh_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    if let Some(ref env_name) = profile.refresh_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(token) = entry.get_password() {
            return Ok(SecretString::from(token));
        }
    }

    if let Some(ref token) = profile.refresh_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.to_owned(),
    })
}

/// Store a refresh token in the system keyring.
pub fn store_refresh_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    use secrecy::ExposeSecret;
    keyring_entry(profile_name)?
        .set_password(token.expose_secret())
        .map_err(|e| ConfigError::Keyring(e.to_string()))
}

/// Remove a stored refresh token, ignoring "not found".
pub fn clear_refresh_token(profile_name: &str) -> Result<(), ConfigError> {
    match keyring_entry(profile_name)?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(ConfigError::Keyring(e.to_string())),
    }
}

// ── HubConfig translation ───────────────────────────────────────────

/// Build a [`HubConfig`] from a profile plus a resolved access token.
pub fn resolve_hub_config(
    profile: &Profile,
    defaults: &Defaults,
    access_token: SecretString,
) -> Result<HubConfig, ConfigError> {
    let api_url = profile
        .api_url
        .as_deref()
        .unwrap_or(comfocloud_core::DEFAULT_BASE_URL)
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("{e}"),
        })?;

    let tls = profile
        .ca_cert
        .as_ref()
        .map_or(TlsMode::System, |path| TlsMode::CustomCa(path.clone()));

    Ok(HubConfig {
        api_url,
        access_token,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        poll_interval: Duration::from_secs(
            profile.poll_interval.unwrap_or(defaults.poll_interval),
        ),
    })
}
