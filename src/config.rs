use crate::error::{env_error, CalResult, Error};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::str::FromStr;

/// Calendar used when none is configured
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Timezone applied to drafts that carry no explicit zone
pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Page size for upcoming-event listings
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// On-disk location of the OAuth token cache
pub const DEFAULT_TOKEN_CACHE_PATH: &str = "config/calendar_token.json";

/// Optional settings file; environment variables take precedence over it
const SETTINGS_FILE: &str = "config/calman.toml";

/// Credential strategy used against the calendar API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Server-to-server JWT grant signed with a service account key file
    ServiceAccount,
    /// OAuth installed-app flow backed by an on-disk token cache
    Oauth,
}

impl FromStr for AuthMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "service_account" => Ok(AuthMethod::ServiceAccount),
            "oauth" => Ok(AuthMethod::Oauth),
            other => Err(Error::Config(format!(
                "Unknown AUTH_METHOD '{}' (expected 'service_account' or 'oauth')",
                other
            ))),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Calendar to operate on
    pub calendar_id: String,
    /// Default IANA timezone for drafts without an explicit zone
    pub time_zone: String,
    /// Maximum number of events returned by a listing
    pub max_results: u32,
    /// Which credential strategy to use
    pub auth_method: AuthMethod,
    /// Path to the service account key JSON file (service_account auth)
    pub service_account_key_path: String,
    /// OAuth client ID (oauth auth)
    pub google_client_id: String,
    /// OAuth client secret (oauth auth)
    pub google_client_secret: String,
    /// On-disk OAuth token cache location
    pub token_cache_path: String,
}

/// Settings that may come from the optional TOML file
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    calendar_id: Option<String>,
    time_zone: Option<String>,
    max_results: Option<u32>,
    token_cache_path: Option<String>,
}

impl Config {
    /// Load configuration from environment and the optional settings file
    pub fn load() -> CalResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Read the settings file if present; missing or malformed files fall
        // back to built-in defaults
        let mut file_settings = FileSettings::default();
        if let Ok(content) = fs::read_to_string(SETTINGS_FILE) {
            if let Ok(parsed) = toml::from_str::<FileSettings>(&content) {
                file_settings = parsed;
            }
        }

        let calendar_id = env::var("GOOGLE_CALENDAR_ID")
            .ok()
            .or(file_settings.calendar_id)
            .unwrap_or_else(|| String::from(DEFAULT_CALENDAR_ID));

        let time_zone = env::var("CALENDAR_TIME_ZONE")
            .ok()
            .or(file_settings.time_zone)
            .unwrap_or_else(|| String::from(DEFAULT_TIME_ZONE));

        let max_results = match env::var("CALENDAR_MAX_RESULTS") {
            Ok(value) => value
                .parse::<u32>()
                .map_err(|_| env_error("Invalid CALENDAR_MAX_RESULTS format"))?,
            Err(_) => file_settings.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
        };

        // The credential strategy is an explicit operator decision
        let auth_method = env::var("AUTH_METHOD")
            .map_err(|_| env_error("AUTH_METHOD"))?
            .parse::<AuthMethod>()?;

        // Only the selected strategy's settings are required
        let service_account_key_path = match auth_method {
            AuthMethod::ServiceAccount => env::var("SERVICE_ACCOUNT_KEY_PATH")
                .map_err(|_| env_error("SERVICE_ACCOUNT_KEY_PATH"))?,
            AuthMethod::Oauth => env::var("SERVICE_ACCOUNT_KEY_PATH").unwrap_or_default(),
        };

        let (google_client_id, google_client_secret) = match auth_method {
            AuthMethod::Oauth => (
                env::var("GOOGLE_CLIENT_ID").map_err(|_| env_error("GOOGLE_CLIENT_ID"))?,
                env::var("GOOGLE_CLIENT_SECRET").map_err(|_| env_error("GOOGLE_CLIENT_SECRET"))?,
            ),
            AuthMethod::ServiceAccount => (
                env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
                env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            ),
        };

        let token_cache_path = env::var("TOKEN_CACHE_PATH")
            .ok()
            .or(file_settings.token_cache_path)
            .unwrap_or_else(|| String::from(DEFAULT_TOKEN_CACHE_PATH));

        Ok(Config {
            calendar_id,
            time_zone,
            max_results,
            auth_method,
            service_account_key_path,
            google_client_id,
            google_client_secret,
            token_cache_path,
        })
    }
}
