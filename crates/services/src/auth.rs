//! OAuth2 access tokens for Google APIs (Firestore REST, FCM HTTP v1).
//!
//! Resolution mirrors what Google client libraries do by default: an
//! explicit token, then a service account key file, then the metadata
//! server of the compute environment the service runs on.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use campus_crush_config::GoogleSettings;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";
/// Bearer accepted by the Firestore emulator for unrestricted access.
pub const EMULATOR_TOKEN: &str = "owner";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Cannot read credentials file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid service account key: {0}")]
    InvalidKey(#[from] serde_json::Error),
    #[error("JWT signing failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Token request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Token endpoint returned {status}: {message}")]
    Exchange { status: u16, message: String },
}

/// Supplies the bearer token attached to outgoing Google API requests.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// A fixed token, e.g. one minted out of band or the emulator's `owner`.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl ServiceAccountKey {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn new(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            token: response.access_token,
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now
    }
}

async fn read_token_response(response: reqwest::Response) -> Result<TokenResponse, AuthError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AuthError::Exchange {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}

/// Exchanges a self-signed JWT assertion for an access token.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    token_uri: String,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// `token_uri` from the key file wins over `fallback_token_uri`.
    pub fn new(key: ServiceAccountKey, fallback_token_uri: &str, client: reqwest::Client) -> Self {
        let token_uri = key
            .token_uri
            .clone()
            .unwrap_or_else(|| fallback_token_uri.to_string());
        Self {
            key,
            token_uri,
            client,
            cached: Mutex::new(None),
        }
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Signs the RS256 assertion sent to the token endpoint.
    pub fn sign_assertion(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: CLOUD_PLATFORM_SCOPE,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&header, &claims, &key)?)
    }

    async fn fetch(&self, now: DateTime<Utc>) -> Result<CachedToken, AuthError> {
        let assertion = self.sign_assertion(now)?;
        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let token = read_token_response(response).await?;
        info!(
            client_email = %self.key.client_email,
            expires_in = token.expires_in,
            "Obtained service account access token"
        );
        Ok(CachedToken::new(token, now))
    }
}

#[async_trait]
impl AccessTokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.token.clone());
        }

        let fresh = self.fetch(now).await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

/// Default service account of the hosting compute environment.
pub struct MetadataServerTokenSource {
    url: String,
    client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl MetadataServerTokenSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_url(METADATA_TOKEN_URL, client)
    }

    pub fn with_url(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AccessTokenSource for MetadataServerTokenSource {
    async fn access_token(&self) -> Result<String, AuthError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.token.clone());
        }

        let response = self
            .client
            .get(&self.url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await?;
        let fresh = CachedToken::new(read_token_response(response).await?, now);
        debug!(expires_at = %fresh.expires_at, "Obtained metadata server access token");
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}

/// Picks the credential source for Google APIs from settings.
pub fn token_source_from_settings(
    settings: &GoogleSettings,
    client: reqwest::Client,
) -> Result<Arc<dyn AccessTokenSource>, AuthError> {
    if let Some(token) = settings.access_token.as_deref().filter(|t| !t.is_empty()) {
        return Ok(Arc::new(StaticToken::new(token)));
    }

    if let Some(path) = settings.credentials_path.as_deref().filter(|p| !p.is_empty()) {
        let key = ServiceAccountKey::from_file(path)?;
        info!(client_email = %key.client_email, "Using service account credentials");
        return Ok(Arc::new(ServiceAccountTokenSource::new(
            key,
            &settings.token_uri,
            client,
        )));
    }

    info!("Using metadata server credentials");
    Ok(Arc::new(MetadataServerTokenSource::new(client)))
}
