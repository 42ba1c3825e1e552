//! Per-tenant OAuth2 authorization-code flow with PKCE (S256), as the X
//! platform implements it.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use url::Url;

use crate::config::TwitterConfig;
use crate::models::application::Application;
use crate::models::user_twitter::TwitterToken;
use crate::twitter_api::TwitterApiError;

/// Scopes requested for every binding. `offline.access` yields the refresh
/// token that keeps engagement checks working past the first expiry.
pub const OAUTH_SCOPES: [&str; 5] = [
    "tweet.read",
    "users.read",
    "follows.read",
    "like.read",
    "offline.access",
];

const PKCE_VERIFIER_LENGTH: usize = 64;

/// Fallback token lifetime when the platform omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 7200;

/// The PKCE code verifier held server-side between the authorize redirect
/// and the callback.
#[derive(Debug, Clone)]
pub struct PkceVerifier(pub String);

impl PkceVerifier {
    pub fn generate() -> Self {
        let verifier: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(PKCE_VERIFIER_LENGTH)
            .map(char::from)
            .collect();
        PkceVerifier(verifier)
    }

    /// S256 challenge: base64url(sha256(verifier)), no padding.
    pub fn challenge(&self) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(self.0.as_bytes()))
    }
}

/// OAuth2 client bound to one tenant's X app credentials.
#[derive(Debug, Clone)]
pub struct OAuth2Client {
    http: reqwest::Client,
    authorize_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    callback: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl OAuth2Client {
    pub fn new(config: &TwitterConfig, application: &Application, callback: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            authorize_url: config.authorize_url.clone(),
            token_url: config.token_url.clone(),
            client_id: application.twitter_client_id.clone(),
            client_secret: application.twitter_client_secret.clone(),
            callback: callback.to_string(),
        }
    }

    pub fn callback(&self) -> &str {
        &self.callback
    }

    /// Builds the authorize URL the end user is redirected to, together with
    /// the PKCE verifier that must be held until the callback.
    pub fn generate_auth_url(
        &self,
        state: &str,
    ) -> Result<(String, PkceVerifier), TwitterApiError> {
        let verifier = PkceVerifier::generate();

        let mut url = Url::parse(&self.authorize_url)
            .map_err(|e| TwitterApiError::InvalidEndpoint(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.callback)
            .append_pair("scope", &OAUTH_SCOPES.join(" "))
            .append_pair("state", state)
            .append_pair("code_challenge", &verifier.challenge())
            .append_pair("code_challenge_method", "s256");

        Ok((url.to_string(), verifier))
    }

    /// Exchanges the authorization code for a token blob.
    pub async fn exchange_code(
        &self,
        code: &str,
        verifier: &PkceVerifier,
    ) -> Result<TwitterToken, TwitterApiError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.callback),
            ("code_verifier", &verifier.0),
            ("client_id", &self.client_id),
        ];
        self.token_request(&params).await
    }

    /// Trades a refresh token for a fresh access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TwitterToken, TwitterApiError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.client_id),
        ];
        self.token_request(&params).await
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TwitterToken, TwitterApiError> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(params)
            .send()
            .await
            .map_err(|e| TwitterApiError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TwitterApiError::ExternalService(status_text(
                response.status(),
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TwitterApiError::ExternalService(e.to_string()))?;

        let expires_in = token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        Ok(TwitterToken {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now().timestamp_millis() + expires_in * 1000,
        })
    }
}

pub(crate) fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_db::test_application;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base: &str) -> TwitterConfig {
        TwitterConfig {
            authorize_url: format!("{base}/i/oauth2/authorize"),
            token_url: format!("{base}/2/oauth2/token"),
            api_base_url: base.to_string(),
        }
    }

    #[test]
    fn test_pkce_challenge_known_vector() {
        // RFC 7636 appendix B
        let verifier = PkceVerifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk".to_string());
        assert_eq!(
            verifier.challenge(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_auth_url_carries_pkce_and_state() {
        let app = test_application(1, "acme");
        let client = OAuth2Client::new(
            &test_config("https://example.com"),
            &app,
            "https://app.example.com/cb",
        );

        let (url, verifier) = client.generate_auth_url("1_user-1").unwrap();
        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let get = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("response_type"), "code");
        assert_eq!(get("state"), "1_user-1");
        assert_eq!(get("code_challenge_method"), "s256");
        assert_eq!(get("code_challenge"), verifier.challenge());
        assert!(get("scope").contains("offline.access"));
    }

    #[tokio::test]
    async fn test_exchange_code_parses_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/oauth2/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "access-1",
                "refresh_token": "refresh-1",
                "expires_in": 7200
            })))
            .expect(1)
            .mount(&server)
            .await;

        let app = test_application(1, "acme");
        let client = OAuth2Client::new(&test_config(&server.uri()), &app, "https://cb");
        let verifier = PkceVerifier::generate();

        let token = client.exchange_code("the-code", &verifier).await.unwrap();
        assert_eq!(token.access_token, "access-1");
        assert_eq!(token.refresh_token.as_deref(), Some("refresh-1"));
        assert!(token.expires_at > Utc::now().timestamp_millis());
    }

    #[tokio::test]
    async fn test_token_error_carries_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/2/oauth2/token"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        let app = test_application(1, "acme");
        let client = OAuth2Client::new(&test_config(&server.uri()), &app, "https://cb");

        let err = client
            .refresh_token("stale")
            .await
            .unwrap_err();
        assert!(matches!(err, TwitterApiError::ExternalService(ref text) if text == "Bad Request"));
    }
}
