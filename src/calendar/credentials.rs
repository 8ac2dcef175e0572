use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::{AuthMethod, Config};
use crate::error::{credentials_error, CalResult};

/// OAuth scope required for full event management
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Default token endpoint for both grant flows
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Seconds of validity a token must have left to be reused
const EXPIRY_SLACK_SECS: i64 = 60;

/// Source of bearer tokens for calendar API calls.
///
/// The client asks for a token before every request; implementations cache
/// and refresh however their grant flow requires.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn access_token(&self) -> CalResult<String>;
}

/// Build the provider the configuration selects
pub fn provider_from_config(config: &Config) -> CalResult<Arc<dyn CredentialProvider>> {
    match config.auth_method {
        AuthMethod::ServiceAccount => {
            let provider = ServiceAccountProvider::from_key_file(&config.service_account_key_path)?;
            Ok(Arc::new(provider))
        }
        AuthMethod::Oauth => Ok(Arc::new(InstalledFlowProvider::new(
            config.google_client_id.clone(),
            config.google_client_secret.clone(),
            config.token_cache_path.clone(),
        ))),
    }
}

/// Fields of a downloaded service account key file the JWT grant needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Subset of the token endpoint response both grant flows read
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

/// Server-to-server credentials backed by a signed JWT grant.
///
/// Tokens are cached in memory and re-requested once they get within a
/// minute of expiry.
#[derive(Debug)]
pub struct ServiceAccountProvider {
    key: ServiceAccountKey,
    client: Client,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountProvider {
    /// Load a key file an operator downloaded from the cloud console
    pub fn from_key_file(path: impl AsRef<Path>) -> CalResult<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            credentials_error(&format!(
                "Failed to read service account key {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let key: ServiceAccountKey = serde_json::from_str(&raw)
            .map_err(|e| credentials_error(&format!("Failed to parse service account key: {}", e)))?;

        Ok(Self::new(key))
    }

    pub fn new(key: ServiceAccountKey) -> Self {
        Self {
            key,
            client: Client::new(),
            cached: RwLock::new(None),
        }
    }

    /// Sign an assertion and exchange it for a fresh access token
    async fn request_token(&self) -> CalResult<CachedToken> {
        let now = Utc::now().timestamp();
        let claims = JwtClaims {
            iss: &self.key.client_email,
            scope: CALENDAR_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + 3600,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| credentials_error(&format!("Invalid service account private key: {}", e)))?;

        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| credentials_error(&format!("Failed to sign token assertion: {}", e)))?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| credentials_error(&format!("Failed to request access token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(credentials_error(&format!(
                "Token request failed: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| credentials_error(&format!("Failed to parse token response: {}", e)))?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}

#[async_trait]
impl CredentialProvider for ServiceAccountProvider {
    async fn access_token(&self) -> CalResult<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > Utc::now().timestamp() + EXPIRY_SLACK_SECS {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        debug!("Obtained service account access token");
        *self.cached.write().await = Some(token);

        Ok(access_token)
    }
}

/// On-disk shape of the consent flow's token cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Persist a token where the providers will look for it, creating the
/// parent directory on first use
pub fn store_token(path: &Path, token: &StoredToken) -> CalResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let raw = serde_json::to_string_pretty(token)?;
    std::fs::write(path, raw)?;

    Ok(())
}

/// Per-user credentials obtained once through the browser consent flow.
///
/// The cache file is read on every call so a token stored by the
/// get_calendar_token binary is picked up without restarting anything.
#[derive(Debug)]
pub struct InstalledFlowProvider {
    client_id: String,
    client_secret: String,
    cache_path: PathBuf,
    token_uri: String,
    client: Client,
}

impl InstalledFlowProvider {
    pub fn new(client_id: String, client_secret: String, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            client_id,
            client_secret,
            cache_path: cache_path.into(),
            token_uri: DEFAULT_TOKEN_URI.to_string(),
            client: Client::new(),
        }
    }

    /// Point the refresh exchange at a different endpoint, for tests
    #[allow(dead_code)]
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    fn read_cache(&self) -> CalResult<StoredToken> {
        let raw = std::fs::read_to_string(&self.cache_path).map_err(|_| {
            credentials_error(&format!(
                "No token cache at {}. Run the get_calendar_token binary to authorize first.",
                self.cache_path.display()
            ))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            credentials_error(&format!(
                "Failed to parse token cache at {}: {}. Run the get_calendar_token binary to authorize again.",
                self.cache_path.display(),
                e
            ))
        })
    }

    /// Trade the refresh token for a new access token
    async fn refresh(&self, token: &StoredToken) -> CalResult<StoredToken> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", token.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| credentials_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(credentials_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let refreshed: TokenResponse = response
            .json()
            .await
            .map_err(|e| credentials_error(&format!("Failed to parse token response: {}", e)))?;

        // The endpoint does not echo the refresh token back, keep the original
        Ok(StoredToken {
            access_token: refreshed.access_token,
            refresh_token: token.refresh_token.clone(),
            expires_at: Utc::now().timestamp() + refreshed.expires_in,
        })
    }
}

#[async_trait]
impl CredentialProvider for InstalledFlowProvider {
    async fn access_token(&self) -> CalResult<String> {
        let token = self.read_cache()?;

        // Check if the stored token is still usable
        if token.expires_at > Utc::now().timestamp() + EXPIRY_SLACK_SECS {
            return Ok(token.access_token);
        }

        info!("Cached access token expired, refreshing");
        let refreshed = self.refresh(&token).await?;
        store_token(&self.cache_path, &refreshed)?;

        Ok(refreshed.access_token)
    }
}
