// ── OAuth2 authorization-code + PKCE helpers ──
//
// The Zehnder cloud authenticates through an Azure B2C tenant as a
// public client: no client secret, PKCE required, and the API scope is
// the client id itself plus `offline_access` for a refresh token.
// Nothing here opens a browser -- the CLI prints the authorization URL
// and collects the redirect back from the user.

use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, CsrfToken, PkceCodeChallenge, PkceCodeVerifier,
    RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};
use secrecy::SecretString;
use url::Url;

use crate::ConfigError;

/// Authorization endpoint of the production B2C tenant.
pub const DEFAULT_AUTHORIZE_URL: &str = "https://zehndergroupauth.b2clogin.com/zehndergroupauth.onmicrosoft.com/b2c_1_signin_developerportal/oauth2/v2.0/authorize";

/// Token endpoint of the production B2C tenant.
pub const DEFAULT_TOKEN_URL: &str = "https://zehndergroupauth.b2clogin.com/zehndergroupauth.onmicrosoft.com/B2C_1_signin_developerportal/oauth2/v2.0/token";

/// Developer-portal client id (a public client -- no secret).
pub const DEFAULT_CLIENT_ID: &str = "76c86940-8437-4819-9449-8b7e2a372a07";

/// Loopback redirect the CLI asks the user to copy back from.
pub const DEFAULT_REDIRECT_URL: &str = "http://localhost:8145/callback";

// ── Settings ────────────────────────────────────────────────────────

/// Endpoint and client configuration for the flow.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub authorize_url: String,
    pub token_url: String,
    pub client_id: String,
    pub redirect_url: String,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            authorize_url: DEFAULT_AUTHORIZE_URL.into(),
            token_url: DEFAULT_TOKEN_URL.into(),
            client_id: DEFAULT_CLIENT_ID.into(),
            redirect_url: DEFAULT_REDIRECT_URL.into(),
        }
    }
}

impl OAuthSettings {
    fn client(&self) -> Result<BasicClient, ConfigError> {
        let auth_url = AuthUrl::new(self.authorize_url.clone())
            .map_err(|e| ConfigError::OAuth(format!("invalid authorize URL: {e}")))?;
        let token_url = TokenUrl::new(self.token_url.clone())
            .map_err(|e| ConfigError::OAuth(format!("invalid token URL: {e}")))?;
        let redirect_url = RedirectUrl::new(self.redirect_url.clone())
            .map_err(|e| ConfigError::OAuth(format!("invalid redirect URL: {e}")))?;

        Ok(
            BasicClient::new(
                ClientId::new(self.client_id.clone()),
                None,
                auth_url,
                Some(token_url),
            )
            .set_redirect_uri(redirect_url),
        )
    }

    /// The B2C tenant scopes API access by the client id itself;
    /// `offline_access` yields the refresh token we persist.
    fn scope(&self) -> Scope {
        Scope::new(format!("{} offline_access", self.client_id))
    }
}

// ── Flow steps ──────────────────────────────────────────────────────

/// A prepared authorization request: the URL to visit plus the secrets
/// needed to finish the exchange.
pub struct AuthRequest {
    pub url: Url,
    pub state: CsrfToken,
    pub verifier: PkceCodeVerifier,
}

/// Tokens returned by a successful exchange or refresh.
pub struct TokenSet {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub expires_in: Option<std::time::Duration>,
}

/// Build the authorization URL with a fresh PKCE challenge.
pub fn authorization_request(settings: &OAuthSettings) -> Result<AuthRequest, ConfigError> {
    let client = settings.client()?;
    let (challenge, verifier) = PkceCodeChallenge::new_random_sha256();

    let (url, state) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(settings.scope())
        .set_pkce_challenge(challenge)
        .url();

    Ok(AuthRequest {
        url,
        state,
        verifier,
    })
}

/// Exchange an authorization code (plus the PKCE verifier from the
/// matching [`AuthRequest`]) for tokens.
pub async fn exchange_code(
    settings: &OAuthSettings,
    code: String,
    verifier: PkceCodeVerifier,
) -> Result<TokenSet, ConfigError> {
    let client = settings.client()?;

    let response = client
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(verifier)
        .request_async(async_http_client)
        .await
        .map_err(|e| ConfigError::OAuth(e.to_string()))?;

    Ok(token_set(&response))
}

/// Trade a stored refresh token for a fresh access token.
pub async fn refresh_access_token(
    settings: &OAuthSettings,
    refresh_token: &SecretString,
) -> Result<TokenSet, ConfigError> {
    use secrecy::ExposeSecret;

    let client = settings.client()?;

    let response = client
        .exchange_refresh_token(&RefreshToken::new(refresh_token.expose_secret().to_owned()))
        .request_async(async_http_client)
        .await
        .map_err(|e| ConfigError::OAuth(e.to_string()))?;

    Ok(token_set(&response))
}

fn token_set(response: &oauth2::basic::BasicTokenResponse) -> TokenSet {
    TokenSet {
        access_token: SecretString::from(response.access_token().secret().clone()),
        refresh_token: response
            .refresh_token()
            .map(|t| SecretString::from(t.secret().clone())),
        expires_in: response.expires_in(),
    }
}

/// Pull the `code` query parameter out of a pasted redirect URL, or
/// accept a bare code as-is.
pub fn extract_code(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if let Ok(url) = Url::parse(trimmed) {
        return url
            .query_pairs()
            .find(|(k, _)| k == "code")
            .map(|(_, v)| v.into_owned());
    }
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn authorization_url_carries_pkce_and_scope() {
        let request = authorization_request(&OAuthSettings::default()).unwrap();

        let pairs: Vec<(String, String)> = request
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(pairs.iter().any(|(k, _)| k == "code_challenge"));
        assert!(
            pairs
                .iter()
                .any(|(k, v)| k == "code_challenge_method" && v == "S256")
        );
        assert!(
            pairs
                .iter()
                .any(|(k, v)| k == "scope" && v.contains("offline_access"))
        );
    }

    #[test]
    fn extract_code_handles_urls_and_bare_codes() {
        assert_eq!(
            extract_code("http://localhost:8145/callback?code=abc123&state=xyz"),
            Some("abc123".into())
        );
        assert_eq!(extract_code("  raw-code  "), Some("raw-code".into()));
        assert_eq!(extract_code(""), None);
    }
}
