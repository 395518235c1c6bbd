// ── Runtime hub configuration ──
//
// Describes *how* to reach the cloud for one account. Carries the
// access token and connection tuning, but never touches disk -- the
// CLI constructs a `HubConfig` from its profile layer and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use comfocloud_api::TlsMode;

/// How often each device coordinator polls the cloud.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Configuration for connecting one account's devices.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Cloud API base URL.
    pub api_url: Url,
    /// OAuth2 access token for the account.
    pub access_token: SecretString,
    /// TLS verification strategy.
    pub tls: TlsMode,
    /// Transport-level request timeout.
    pub timeout: Duration,
    /// Poll interval per device coordinator.
    pub poll_interval: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            api_url: comfocloud_api::client::DEFAULT_BASE_URL
                .parse()
                .expect("default base URL is valid"),
            access_token: SecretString::from(String::new()),
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
