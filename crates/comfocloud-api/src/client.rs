// Hand-crafted async HTTP client for the Zehnder ComfoAirQ cloud API.
//
// Base path: /cloud/api/v2.1/
// Auth: OAuth2 bearer token in the Authorization header

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::{DeviceDetails, DeviceId, DeviceState, DevicesResponse};

/// Default base URL of the production cloud API.
pub const DEFAULT_BASE_URL: &str = "https://zehnder-prod-we-apim.azure-api.net/cloud/api/v2.1/";

// ── Error response shape from the cloud API ──────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Zehnder cloud API.
///
/// Holds a connection pool shared by every coordinator polling through
/// it; cloning is cheap. The client consumes a ready access token --
/// obtaining and refreshing tokens is the caller's concern.
#[derive(Clone)]
pub struct CloudClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CloudClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an OAuth2 access token and transport config.
    ///
    /// Injects `Authorization: Bearer ...` as a sensitive default
    /// header on every request.
    pub fn from_token(
        base_url: &str,
        access_token: &SecretString,
        transport: &crate::TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!(
            "Bearer {}",
            access_token.expose_secret()
        ))
        .map_err(|e| Error::Authentication {
            message: format!("invalid access token header value: {e}"),
        })?;
        bearer.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Parse the base URL and guarantee a trailing slash so relative
    /// joins keep the full path.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"devices/123/state"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Error::AuthenticationExpired;
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// List the device ids registered to the authenticated account.
    pub async fn get_devices(&self) -> Result<Vec<DeviceId>, Error> {
        let resp: DevicesResponse = self.get("devices").await?;
        Ok(resp.devices)
    }

    /// Fetch the live state (telemetry + settings) for one device.
    pub async fn get_device_state(&self, id: DeviceId) -> Result<DeviceState, Error> {
        self.get(&format!("devices/{id}/state")).await
    }

    /// Fetch the identity/capability details for one device.
    pub async fn get_device_details(&self, id: DeviceId) -> Result<DeviceDetails, Error> {
        self.get(&format!("devices/{id}/details")).await
    }

    /// Push a settings patch to one device.
    ///
    /// The cloud accepts partial patch objects, e.g.
    /// `{"setVentilationPreset": {"value": 2}}` or
    /// `{"forceBypass": {"seconds": 3600}}`.
    pub async fn set_device_settings(
        &self,
        id: DeviceId,
        patch: &serde_json::Value,
    ) -> Result<(), Error> {
        self.put_no_response(&format!("devices/{id}/settings"), patch)
            .await
    }
}
