// ── Core error types ──
//
// User-facing errors from comfocloud-core. Consumers never see raw HTTP
// status codes or JSON parse failures directly -- the
// `From<comfocloud_api::Error>` impl translates transport-layer errors
// into the polling taxonomy: authentication-required vs. transient
// update failure.

use thiserror::Error;

use comfocloud_api::DeviceId;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Polling taxonomy ─────────────────────────────────────────────
    /// Credentials have expired. Not retried internally -- the caller
    /// must run the re-authorization flow; every scheduled fetch will
    /// keep failing this way until it does.
    #[error("Authentication required: {message}")]
    AuthenticationRequired { message: String },

    /// A poll cycle failed (network, timeout, malformed or incomplete
    /// data). The previous snapshot is retained; the caller's scheduler
    /// decides when to try again.
    #[error("Update failed: {message}")]
    UpdateFailed { message: String },

    /// No snapshot yet -- the first successful fetch has not completed.
    #[error("Device data not yet available")]
    NotYetAvailable,

    // ── Entity errors ────────────────────────────────────────────────
    /// A descriptor's key is absent from the snapshot. Isolated to the
    /// one entity reading it; siblings and the snapshot are unaffected.
    #[error("Field '{key}' missing from device data")]
    FieldMissing { key: &'static str },

    /// A descriptor's key is present but its value has an unexpected type.
    #[error("Field '{key}' has an unexpected value type")]
    InvalidValue { key: &'static str },

    // ── Command errors ───────────────────────────────────────────────
    #[error("Operation failed: {message}")]
    OperationFailed { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Lookup / configuration ───────────────────────────────────────
    #[error("Device not found: {id}")]
    DeviceNotFound { id: DeviceId },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Translate an API error raised by a settings command.
    ///
    /// Same auth-first classification as polling, but non-auth failures
    /// are operation failures rather than transient update failures.
    pub(crate) fn from_command(err: comfocloud_api::Error) -> Self {
        if err.is_auth_expired() {
            CoreError::AuthenticationRequired {
                message: err.to_string(),
            }
        } else {
            CoreError::OperationFailed {
                message: err.to_string(),
            }
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<comfocloud_api::Error> for CoreError {
    fn from(err: comfocloud_api::Error) -> Self {
        if err.is_auth_expired() {
            CoreError::AuthenticationRequired {
                message: err.to_string(),
            }
        } else {
            CoreError::UpdateFailed {
                message: err.to_string(),
            }
        }
    }
}
