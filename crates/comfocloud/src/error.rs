//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use comfocloud_config::ConfigError;
use comfocloud_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication required")]
    #[diagnostic(
        code(comfocloud::auth_required),
        help(
            "Your cloud credentials have expired.\n\
             Run: comfocloud login"
        )
    )]
    AuthRequired { message: String },

    #[error("No refresh token configured for profile '{profile}'")]
    #[diagnostic(
        code(comfocloud::no_credentials),
        help(
            "Authorize once with: comfocloud login\n\
             Or pass an access token via --token / COMFO_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    // ── Devices / data ───────────────────────────────────────────────
    #[error("Device '{identifier}' not found")]
    #[diagnostic(
        code(comfocloud::not_found),
        help("Run: comfocloud devices to see your registered devices")
    )]
    DeviceNotFound { identifier: String },

    #[error("No device id given and the account has {count} devices")]
    #[diagnostic(
        code(comfocloud::ambiguous_device),
        help(
            "Pass a device id, or set `device = <id>` in your profile.\n\
             Run: comfocloud devices to list them."
        )
    )]
    AmbiguousDevice { count: usize },

    #[error("Device data is not available yet")]
    #[diagnostic(
        code(comfocloud::not_ready),
        help("The first poll has not completed. Try again in a moment.")
    )]
    NotReady,

    // ── Cloud ────────────────────────────────────────────────────────
    #[error("Cloud update failed: {message}")]
    #[diagnostic(
        code(comfocloud::update_failed),
        help("The cloud or your connection is misbehaving; this is usually transient.")
    )]
    UpdateFailed { message: String },

    #[error("Cloud API error: {message}")]
    #[diagnostic(code(comfocloud::api_error))]
    ApiError { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(comfocloud::timeout),
        help("Increase timeout with --timeout or check your connectivity.")
    )]
    Timeout { seconds: u64 },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(comfocloud::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(comfocloud::profile_not_found),
        help("Check [profiles.{name}] in your config file: {path}")
    )]
    ProfileNotFound { name: String, path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(comfocloud::config))]
    Config { message: String },

    // ── OAuth ────────────────────────────────────────────────────────
    #[error("Authorization flow failed: {message}")]
    #[diagnostic(
        code(comfocloud::oauth),
        help("Re-run `comfocloud login` and paste the full redirect URL.")
    )]
    OAuth { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(comfocloud::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthRequired { .. } | Self::NoCredentials { .. } | Self::OAuth { .. } => {
                exit_code::AUTH
            }
            Self::DeviceNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::AmbiguousDevice { .. } => exit_code::USAGE,
            Self::UpdateFailed { .. } => exit_code::CONNECTION,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::AuthenticationRequired { message } => CliError::AuthRequired { message },

            CoreError::UpdateFailed { message } => CliError::UpdateFailed { message },

            CoreError::NotYetAvailable => CliError::NotReady,

            CoreError::FieldMissing { key } => CliError::ApiError {
                message: format!("field '{key}' missing from device data"),
            },

            CoreError::InvalidValue { key } => CliError::ApiError {
                message: format!("field '{key}' has an unexpected value"),
            },

            CoreError::OperationFailed { message } => CliError::ApiError { message },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::DeviceNotFound { id } => CliError::DeviceNotFound {
                identifier: id.to_string(),
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },

            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },

            ConfigError::OAuth(message) => CliError::OAuth { message },

            ConfigError::Keyring(message) => CliError::Config {
                message: format!("keyring: {message}"),
            },

            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
