use chrono::Utc;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use super::credentials::CredentialProvider;
use super::mapper;
use super::models::EventPayload;
use crate::error::{remote_error, CalResult};

/// Production calendar API base
const DEFAULT_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Listing envelope, tolerating a response with no items at all
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    items: Vec<EventPayload>,
}

/// Thin client for one calendar's events collection.
///
/// Every call fetches a bearer token from the credential provider first,
/// so an expired token refreshes transparently mid-session.
pub struct CalendarClient {
    client: Client,
    credentials: Arc<dyn CredentialProvider>,
    calendar_id: String,
    base_url: String,
}

impl CalendarClient {
    pub fn new(credentials: Arc<dyn CredentialProvider>, calendar_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            credentials,
            calendar_id: calendar_id.into(),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API base, for tests
    #[allow(dead_code)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Insert a new event and return the stored record
    pub async fn create_event(&self, request: &EventPayload) -> CalResult<EventPayload> {
        let access_token = self.credentials.access_token().await?;
        let url = self.events_url()?;

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(request)
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to create event: {}", e)))?;

        let response = check_status(response, "Failed to create event").await?;

        let created: EventPayload = response
            .json()
            .await
            .map_err(|e| remote_error(&format!("Failed to parse event response: {}", e)))?;

        info!("Created calendar event {}", created.id);
        Ok(created)
    }

    /// Fetch a single event by its identifier
    pub async fn get_event(&self, event_id: &str) -> CalResult<EventPayload> {
        let access_token = self.credentials.access_token().await?;
        let url = self.event_url(event_id)?;

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to fetch event: {}", e)))?;

        let response = check_status(response, "Failed to fetch event").await?;

        response
            .json()
            .await
            .map_err(|e| remote_error(&format!("Failed to parse event response: {}", e)))
    }

    /// Overwrite the descriptive fields of an existing event.
    ///
    /// The current record is fetched first and the request applied on top
    /// of it, so the identifier, the reminder policy and any provider
    /// fields this crate does not model survive the write.
    pub async fn update_event(
        &self,
        event_id: &str,
        request: &EventPayload,
    ) -> CalResult<EventPayload> {
        let mut current = self.get_event(event_id).await?;
        mapper::apply_request(&mut current, request);

        let access_token = self.credentials.access_token().await?;
        let url = self.event_url(event_id)?;

        let response = self
            .client
            .put(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&current)
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to update event: {}", e)))?;

        let response = check_status(response, "Failed to update event").await?;

        let updated: EventPayload = response
            .json()
            .await
            .map_err(|e| remote_error(&format!("Failed to parse event response: {}", e)))?;

        info!("Updated calendar event {}", event_id);
        Ok(updated)
    }

    /// Remove an event permanently
    pub async fn delete_event(&self, event_id: &str) -> CalResult<()> {
        let access_token = self.credentials.access_token().await?;
        let url = self.event_url(event_id)?;

        let response = self
            .client
            .delete(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to delete event: {}", e)))?;

        check_status(response, "Failed to delete event").await?;

        info!("Deleted calendar event {}", event_id);
        Ok(())
    }

    /// List events starting from now, soonest first.
    ///
    /// Recurring events come back as their single occurrences, which is
    /// what makes ordering by start time possible.
    pub async fn get_upcoming_events(&self, max_results: u32) -> CalResult<Vec<EventPayload>> {
        let access_token = self.credentials.access_token().await?;

        let mut url = self.events_url()?;
        url.query_pairs_mut()
            .append_pair("timeMin", &Utc::now().to_rfc3339())
            .append_pair("maxResults", &max_results.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| remote_error(&format!("Failed to fetch events: {}", e)))?;

        let response = check_status(response, "Failed to fetch events").await?;

        let listing: ListResponse = response
            .json()
            .await
            .map_err(|e| remote_error(&format!("Failed to parse events response: {}", e)))?;

        debug!("Fetched {} upcoming events", listing.items.len());
        Ok(listing.items)
    }

    fn events_url(&self) -> CalResult<Url> {
        let url_str = format!("{}/calendars/{}/events", self.base_url, self.calendar_id);
        Url::parse(&url_str).map_err(|e| remote_error(&format!("Failed to parse URL: {}", e)))
    }

    fn event_url(&self, event_id: &str) -> CalResult<Url> {
        let url_str = format!(
            "{}/calendars/{}/events/{}",
            self.base_url, self.calendar_id, event_id
        );
        Url::parse(&url_str).map_err(|e| remote_error(&format!("Failed to parse URL: {}", e)))
    }
}

/// Surface a non-success response as a remote error with the body attached
async fn check_status(response: Response, context: &str) -> CalResult<Response> {
    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(remote_error(&format!(
            "{}: HTTP {} - {}",
            context, status, error_body
        )));
    }

    Ok(response)
}
