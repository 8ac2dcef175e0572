use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// User-entered, unvalidated event data from the input boundary
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub summary: String,
    pub location: Option<String>,
    pub description: Option<String>,
    /// Wall-clock start as typed; the zone qualifier is applied by the mapper
    pub start: NaiveDateTime,
    /// Wall-clock end as typed, must not precede `start`
    pub end: NaiveDateTime,
    /// Raw attendee entries; blank ones are discarded during mapping
    pub attendees: Vec<String>,
    /// IANA zone identifier; the configured default applies when absent
    pub time_zone: Option<String>,
}

/// Start or end of an event on the wire: a precise timestamp or an all-day date
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A single attendee entry on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAttendee {
    pub email: String,
}

/// Reminder policy carried by an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReminders {
    pub use_default: bool,
    #[serde(default)]
    pub overrides: Vec<ReminderOverride>,
}

/// One reminder override: delivery method plus lead time in minutes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderOverride {
    pub method: String,
    pub minutes: i64,
}

/// Event resource as the provider sends and accepts it.
///
/// Only the fields this application reads or writes are typed. Everything
/// else the provider includes round-trips through `extra`, so a full-record
/// overwrite sends back exactly what was fetched apart from the overwritten
/// fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<EventAttendee>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<EventReminders>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Flattened, UI-ready projection of a remote event used for listing
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRecord {
    pub id: String,
    pub summary: String,
    /// Precise timestamp when the provider gave one, otherwise the all-day date
    pub start: String,
    pub location: String,
    pub description: String,
    /// Attendee emails joined with ", "
    pub attendees: String,
    pub link: Option<String>,
}
