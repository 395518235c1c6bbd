use thiserror::Error;

/// Top-level error type for the `comfocloud-api` crate.
///
/// Covers every failure mode of the cloud API surface: expired or
/// rejected credentials, transport problems, structured API errors,
/// and response bodies we cannot make sense of. `comfocloud-core`
/// maps these into its own taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The access token was rejected (expired, revoked, or invalid).
    #[error("Access token rejected -- re-authorization required")]
    AuthenticationExpired,

    /// The token could not be used at all (e.g. not a valid header value).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Cloud API ───────────────────────────────────────────────────
    /// Structured error returned by the cloud API.
    #[error("Cloud API error (HTTP {status}): {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: u16,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates the access token has
    /// expired and the caller must run the re-authorization flow.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationExpired | Self::Authentication { .. }
        )
    }

    /// Extract the API error code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
