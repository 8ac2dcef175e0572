use calman::calendar::credentials::{store_token, StoredToken, CALENDAR_SCOPE, DEFAULT_TOKEN_URI};
use calman::config::Config;
use calman::error::{credentials_error, other_error, CalResult};
use chrono::Utc;
use serde::Deserialize;
use std::path::Path;
use url::Url;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const REDIRECT_URI: &str = "http://localhost:8080";
const CALLBACK_ADDR: &str = "0.0.0.0:8080";

#[derive(Deserialize)]
struct CodeExchangeResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

#[tokio::main]
async fn main() -> CalResult<()> {
    // Load configuration
    let config = Config::load()?;

    if config.google_client_id.is_empty() || config.google_client_secret.is_empty() {
        return Err(credentials_error(
            "GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set to run the consent flow",
        ));
    }

    // Generate random state for security
    let state = uuid::Uuid::new_v4().to_string();

    // Construct authorization URL
    let mut auth_url = Url::parse(AUTH_ENDPOINT)
        .map_err(|e| other_error(&format!("Failed to parse URL: {}", e)))?;
    auth_url
        .query_pairs_mut()
        .append_pair("client_id", &config.google_client_id)
        .append_pair("redirect_uri", REDIRECT_URI)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", CALENDAR_SCOPE)
        .append_pair("state", &state);

    // Open browser for authorization
    println!("Opening browser for Google Calendar authorization...");
    if webbrowser::open(auth_url.as_str()).is_err() {
        println!("Could not open a browser, visit this URL manually:\n{}", auth_url);
    }

    // Start local server to receive the callback
    let server = tiny_http::Server::http(CALLBACK_ADDR)
        .map_err(|e| other_error(&format!("Failed to start callback server: {}", e)))?;
    println!("Waiting for authorization callback...");

    // Handle the callback
    let request = server.recv()?;
    let callback = Url::parse(&format!("{}{}", REDIRECT_URI, request.url()))
        .map_err(|e| other_error(&format!("Failed to parse callback URL: {}", e)))?;

    let mut code = None;
    let mut returned_state = None;
    for (key, value) in callback.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.to_string()),
            "state" => returned_state = Some(value.to_string()),
            _ => {}
        }
    }

    let code = code.ok_or_else(|| other_error("No authorization code found in callback"))?;

    // The callback must echo the state we sent, anything else is not our flow
    if returned_state.as_deref() != Some(state.as_str()) {
        return Err(other_error("State mismatch in callback, aborting"));
    }

    // Exchange code for tokens
    let client = reqwest::Client::new();

    let response = client
        .post(DEFAULT_TOKEN_URI)
        .form(&[
            ("client_id", config.google_client_id.as_str()),
            ("client_secret", config.google_client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", REDIRECT_URI),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        let error_text = response.text().await?;
        return Err(other_error(&format!("Failed to get token: {}", error_text)));
    }

    let token_data: CodeExchangeResponse = response.json().await?;

    let refresh_token = token_data.refresh_token.ok_or_else(|| {
        credentials_error("Token response did not include a refresh token, run the flow again")
    })?;

    // Calculate expiry
    let expires_in = token_data.expires_in.unwrap_or(3600);
    let expires_at = Utc::now().timestamp() + expires_in;

    let token = StoredToken {
        access_token: token_data.access_token,
        refresh_token,
        expires_at,
    };
    store_token(Path::new(&config.token_cache_path), &token)?;

    // Send success response to browser
    let response =
        tiny_http::Response::from_string("Authorization successful! You can close this window.");
    request.respond(response)?;

    println!("Token saved to {}", config.token_cache_path);

    Ok(())
}
