//! Profile selection and access-token resolution for the CLI.
//!
//! Layers `GlobalOpts` overrides on top of the shared config crate:
//! pick the active profile, turn its stored refresh token into a live
//! access token, and build the `HubConfig` the core consumes.

use secrecy::SecretString;
use tracing::debug;

use comfocloud_config::{
    Config, Profile, oauth, resolve_hub_config, resolve_refresh_token, store_refresh_token,
};
use comfocloud_core::{DeviceId, HubConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name: CLI flag/env wins, then the config
/// file's `default_profile`, then `"default"`.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Take the active profile out of the config, or synthesize an empty
/// one when the implicit "default" profile was never written.
pub fn take_profile(cfg: &mut Config, name: &str) -> Result<Profile, CliError> {
    if let Some(profile) = cfg.profiles.remove(name) {
        return Ok(profile);
    }
    if name == "default" {
        return Ok(Profile::default());
    }
    Err(CliError::ProfileNotFound {
        name: name.to_owned(),
        path: comfocloud_config::config_path().display().to_string(),
    })
}

/// OAuth settings for a profile (client id may be overridden).
pub fn oauth_settings(profile: &Profile) -> oauth::OAuthSettings {
    let mut settings = oauth::OAuthSettings::default();
    if let Some(ref client_id) = profile.client_id {
        settings.client_id.clone_from(client_id);
    }
    settings
}

/// Obtain an access token: the `--token` flag wins; otherwise the
/// stored refresh token is traded for a fresh one. A rotated refresh
/// token is written back to the keyring.
pub async fn resolve_access_token(
    global: &GlobalOpts,
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, CliError> {
    if let Some(ref token) = global.token {
        return Ok(SecretString::from(token.clone()));
    }

    let refresh_token = resolve_refresh_token(profile, profile_name)?;
    let tokens = oauth::refresh_access_token(&oauth_settings(profile), &refresh_token).await?;

    if let Some(ref rotated) = tokens.refresh_token {
        if let Err(e) = store_refresh_token(profile_name, rotated) {
            debug!(error = %e, "could not persist rotated refresh token");
        }
    }

    Ok(tokens.access_token)
}

/// Build the final `HubConfig` from profile + defaults + CLI overrides.
pub fn build_hub_config(
    global: &GlobalOpts,
    profile: &Profile,
    defaults: &comfocloud_config::Defaults,
    access_token: SecretString,
) -> Result<HubConfig, CliError> {
    let mut config = resolve_hub_config(profile, defaults, access_token)?;

    if let Some(ref api_url) = global.api_url {
        config.api_url = api_url.parse().map_err(|_| CliError::Validation {
            field: "api-url".into(),
            reason: format!("invalid URL: {api_url}"),
        })?;
    }
    if let Some(timeout) = global.timeout {
        config.timeout = std::time::Duration::from_secs(timeout);
    }

    Ok(config)
}

/// The profile's default device, if configured.
pub fn profile_device(profile: &Profile) -> Option<DeviceId> {
    profile.device.map(DeviceId)
}
