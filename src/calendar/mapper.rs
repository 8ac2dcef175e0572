use super::models::{
    DisplayRecord, EventAttendee, EventDateTime, EventDraft, EventPayload, EventReminders,
    ReminderOverride,
};
use super::time::{resolve_zone, to_zoned_rfc3339};
use crate::error::{validation_error, CalResult};

/// Lead time of the fixed email reminder, in minutes
pub const EMAIL_REMINDER_MINUTES: i64 = 24 * 60;

/// Lead time of the fixed popup reminder, in minutes
pub const POPUP_REMINDER_MINUTES: i64 = 10;

/// Literal used for absent optional fields in a display record
pub const MISSING_FIELD_PLACEHOLDER: &str = "N/A";

/// Build the insert/update request body from a draft.
///
/// Validates the draft before any remote call happens: the summary must be
/// non-empty after trimming, the end must not precede the start, and the
/// draft's zone (or the configured default) must resolve. Timestamps are
/// rendered as timezone-qualified ISO-8601 with the zone name alongside,
/// attendees are trimmed with blank entries discarded, and the fixed
/// reminder policy is attached.
pub fn to_request(draft: &EventDraft, default_time_zone: &str) -> CalResult<EventPayload> {
    let summary = draft.summary.trim();
    if summary.is_empty() {
        return Err(validation_error("Event summary must not be empty"));
    }

    if draft.end < draft.start {
        return Err(validation_error("Event end must not be before its start"));
    }

    let zone_name = draft.time_zone.as_deref().unwrap_or(default_time_zone);
    let zone = resolve_zone(zone_name)?;

    let attendees: Vec<EventAttendee> = draft
        .attendees
        .iter()
        .map(|entry| entry.trim())
        .filter(|entry| !entry.is_empty())
        .map(|entry| EventAttendee {
            email: entry.to_string(),
        })
        .collect();

    Ok(EventPayload {
        summary: Some(summary.to_string()),
        location: draft.location.clone(),
        description: draft.description.clone(),
        start: Some(EventDateTime {
            date_time: Some(to_zoned_rfc3339(draft.start, zone)?),
            time_zone: Some(zone_name.to_string()),
            date: None,
        }),
        end: Some(EventDateTime {
            date_time: Some(to_zoned_rfc3339(draft.end, zone)?),
            time_zone: Some(zone_name.to_string()),
            date: None,
        }),
        attendees: Some(attendees),
        reminders: Some(fixed_reminders()),
        ..Default::default()
    })
}

/// Flatten a provider payload into a display record.
///
/// Never fails: the start prefers the precise timestamp and falls back to
/// the all-day date, absent location/description become "N/A", and the
/// attendee emails are joined with ", ".
pub fn from_response(payload: &EventPayload) -> DisplayRecord {
    let start = payload
        .start
        .as_ref()
        .and_then(|when| when.date_time.clone().or_else(|| when.date.clone()))
        .unwrap_or_default();

    let attendees = payload
        .attendees
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|attendee| attendee.email.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    DisplayRecord {
        id: payload.id.clone(),
        summary: payload.summary.clone().unwrap_or_default(),
        start,
        location: payload
            .location
            .clone()
            .unwrap_or_else(|| MISSING_FIELD_PLACEHOLDER.to_string()),
        description: payload
            .description
            .clone()
            .unwrap_or_else(|| MISSING_FIELD_PLACEHOLDER.to_string()),
        attendees,
        link: payload.html_link.clone(),
    }
}

/// Flatten a listing, preserving the provider-given order
pub fn list_upcoming(items: &[EventPayload]) -> Vec<DisplayRecord> {
    items.iter().map(from_response).collect()
}

/// Full-record overwrite used by the update path.
///
/// Replaces exactly the fields a draft supplies (summary, location,
/// description, start, end and attendees) on a freshly fetched payload.
/// The identifier, the reminder policy and every round-tripped provider
/// field stay untouched.
pub fn apply_request(existing: &mut EventPayload, request: &EventPayload) {
    existing.summary = request.summary.clone();
    existing.location = request.location.clone();
    existing.description = request.description.clone();
    existing.start = request.start.clone();
    existing.end = request.end.clone();
    existing.attendees = request.attendees.clone();
}

fn fixed_reminders() -> EventReminders {
    EventReminders {
        use_default: false,
        overrides: vec![
            ReminderOverride {
                method: "email".to_string(),
                minutes: EMAIL_REMINDER_MINUTES,
            },
            ReminderOverride {
                method: "popup".to_string(),
                minutes: POPUP_REMINDER_MINUTES,
            },
        ],
    }
}
