use calman::calendar::mapper;
use calman::calendar::models::{
    EventAttendee, EventDateTime, EventDraft, EventPayload, EventReminders, ReminderOverride,
};
use calman::calendar::time::parse_datetime;
use calman::error::Error;
use serde_json::json;

/// Draft used as a baseline by most tests; individual tests override fields
fn standup_draft() -> EventDraft {
    EventDraft {
        summary: "Standup".to_string(),
        location: Some("Room 4".to_string()),
        description: Some("Daily sync".to_string()),
        start: parse_datetime("2024-01-15T09:30:00").unwrap(),
        end: parse_datetime("2024-01-15T09:45:00").unwrap(),
        attendees: vec![
            "alice@example.com".to_string(),
            " ".to_string(),
            "bob@example.com".to_string(),
        ],
        time_zone: Some("America/New_York".to_string()),
    }
}

/// Test that a full draft maps to the expected wire shape
#[test]
fn test_to_request_standup() {
    let request = mapper::to_request(&standup_draft(), "UTC").unwrap();

    // Descriptive fields pass through unchanged
    assert_eq!(request.summary.as_deref(), Some("Standup"));
    assert_eq!(request.location.as_deref(), Some("Room 4"));
    assert_eq!(request.description.as_deref(), Some("Daily sync"));

    // Mid-January is EST, so the offset is -05:00
    let start = request.start.unwrap();
    assert_eq!(start.date_time.as_deref(), Some("2024-01-15T09:30:00-05:00"));
    assert_eq!(start.time_zone.as_deref(), Some("America/New_York"));
    assert_eq!(start.date, None);

    let end = request.end.unwrap();
    assert_eq!(end.date_time.as_deref(), Some("2024-01-15T09:45:00-05:00"));

    // The blank attendee entry is dropped, the rest kept in order
    let attendees = request.attendees.unwrap();
    assert_eq!(
        attendees,
        vec![
            EventAttendee {
                email: "alice@example.com".to_string()
            },
            EventAttendee {
                email: "bob@example.com".to_string()
            },
        ]
    );

    // The request never carries an identifier
    assert!(request.id.is_empty());
}

/// Test that only non-blank attendee entries survive the mapping
#[test]
fn test_to_request_drops_empty_attendees() {
    let draft = EventDraft {
        summary: "Standup".to_string(),
        location: None,
        description: None,
        start: parse_datetime("2024-01-01T09:00:00").unwrap(),
        end: parse_datetime("2024-01-01T09:30:00").unwrap(),
        attendees: vec!["a@x.com".to_string(), String::new(), String::new()],
        time_zone: None,
    };

    let request = mapper::to_request(&draft, "UTC").unwrap();

    assert_eq!(
        request.attendees.unwrap(),
        vec![EventAttendee {
            email: "a@x.com".to_string()
        }]
    );
}

/// Test that every request carries the fixed reminder policy
#[test]
fn test_to_request_attaches_fixed_reminders() {
    let request = mapper::to_request(&standup_draft(), "UTC").unwrap();

    let reminders = request.reminders.unwrap();
    assert!(!reminders.use_default);
    assert_eq!(
        reminders.overrides,
        vec![
            ReminderOverride {
                method: "email".to_string(),
                minutes: 24 * 60,
            },
            ReminderOverride {
                method: "popup".to_string(),
                minutes: 10,
            },
        ]
    );
}

/// Test that the summary is trimmed and must not be blank
#[test]
fn test_to_request_rejects_blank_summary() {
    let mut draft = standup_draft();
    draft.summary = "   ".to_string();

    let err = mapper::to_request(&draft, "UTC").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let mut draft = standup_draft();
    draft.summary = "  Standup  ".to_string();
    let request = mapper::to_request(&draft, "UTC").unwrap();
    assert_eq!(request.summary.as_deref(), Some("Standup"));
}

/// Test that an end before the start is rejected but an equal one is fine
#[test]
fn test_to_request_rejects_end_before_start() {
    let mut draft = standup_draft();
    draft.end = parse_datetime("2024-01-15T09:00:00").unwrap();
    assert!(matches!(
        mapper::to_request(&draft, "UTC"),
        Err(Error::Validation(_))
    ));

    // A zero-length event is allowed
    let mut draft = standup_draft();
    draft.end = draft.start;
    assert!(mapper::to_request(&draft, "UTC").is_ok());
}

/// Test that an unresolvable zone fails validation before any remote call
#[test]
fn test_to_request_rejects_unknown_zone() {
    let mut draft = standup_draft();
    draft.time_zone = Some("Not/AZone".to_string());
    assert!(matches!(
        mapper::to_request(&draft, "UTC"),
        Err(Error::Validation(_))
    ));

    // The configured default is validated the same way
    let mut draft = standup_draft();
    draft.time_zone = None;
    assert!(mapper::to_request(&draft, "Not/AZone").is_err());
}

/// Test that a draft without a zone falls back to the configured default
#[test]
fn test_to_request_uses_default_zone() {
    let mut draft = standup_draft();
    draft.time_zone = None;

    let request = mapper::to_request(&draft, "UTC").unwrap();
    let start = request.start.unwrap();
    assert_eq!(start.date_time.as_deref(), Some("2024-01-15T09:30:00+00:00"));
    assert_eq!(start.time_zone.as_deref(), Some("UTC"));
}

/// Test the wire shape of a serialized request
#[test]
fn test_request_serializes_to_camel_case() {
    let request = mapper::to_request(&standup_draft(), "UTC").unwrap();
    let value = serde_json::to_value(&request).unwrap();

    assert_eq!(
        value["start"]["dateTime"],
        json!("2024-01-15T09:30:00-05:00")
    );
    assert_eq!(value["start"]["timeZone"], json!("America/New_York"));
    assert_eq!(value["reminders"]["useDefault"], json!(false));
    assert_eq!(value["reminders"]["overrides"][0]["minutes"], json!(1440));

    // Absent fields are omitted, not sent as null
    assert!(value.get("id").is_none());
    assert!(value.get("htmlLink").is_none());
}

/// Test the flattening of a fully populated response
#[test]
fn test_from_response_full_record() {
    let payload: EventPayload = serde_json::from_value(json!({
        "id": "evt123",
        "summary": "Planning",
        "location": "Room 4",
        "description": "Quarterly planning",
        "start": { "dateTime": "2024-02-01T10:00:00+02:00", "timeZone": "Europe/Helsinki" },
        "end": { "dateTime": "2024-02-01T11:00:00+02:00", "timeZone": "Europe/Helsinki" },
        "attendees": [
            { "email": "alice@example.com" },
            { "email": "bob@example.com" }
        ],
        "htmlLink": "https://calendar.example/evt123"
    }))
    .unwrap();

    let record = mapper::from_response(&payload);
    assert_eq!(record.id, "evt123");
    assert_eq!(record.summary, "Planning");
    assert_eq!(record.start, "2024-02-01T10:00:00+02:00");
    assert_eq!(record.location, "Room 4");
    assert_eq!(record.description, "Quarterly planning");
    assert_eq!(record.attendees, "alice@example.com, bob@example.com");
    assert_eq!(record.link.as_deref(), Some("https://calendar.example/evt123"));
}

/// Test the all-day fallback and the placeholders for absent fields
#[test]
fn test_from_response_sparse_record() {
    let payload: EventPayload = serde_json::from_value(json!({
        "id": "evt456",
        "start": { "date": "2024-01-01" }
    }))
    .unwrap();

    let record = mapper::from_response(&payload);
    assert_eq!(record.id, "evt456");
    assert_eq!(record.summary, "");
    assert_eq!(record.start, "2024-01-01");
    assert_eq!(record.location, "N/A");
    assert_eq!(record.description, "N/A");
    assert_eq!(record.attendees, "");
    assert_eq!(record.link, None);
}

/// Test that a precise timestamp wins over an all-day date when both exist
#[test]
fn test_from_response_prefers_date_time() {
    let payload = EventPayload {
        id: "evt789".to_string(),
        start: Some(EventDateTime {
            date_time: Some("2024-03-01T08:00:00+00:00".to_string()),
            date: Some("2024-03-01".to_string()),
            time_zone: None,
        }),
        ..Default::default()
    };

    let record = mapper::from_response(&payload);
    assert_eq!(record.start, "2024-03-01T08:00:00+00:00");
}

/// Test that an event with no start at all still flattens
#[test]
fn test_from_response_missing_start() {
    let payload = EventPayload {
        id: "evt000".to_string(),
        ..Default::default()
    };

    let record = mapper::from_response(&payload);
    assert_eq!(record.start, "");
}

/// Test that a listing maps element-wise and keeps the provider order
#[test]
fn test_list_upcoming_preserves_order() {
    let items = vec![
        EventPayload {
            id: "first".to_string(),
            summary: Some("First".to_string()),
            ..Default::default()
        },
        EventPayload {
            id: "second".to_string(),
            summary: Some("Second".to_string()),
            ..Default::default()
        },
    ];

    let records = mapper::list_upcoming(&items);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "first");
    assert_eq!(records[1].id, "second");

    assert!(mapper::list_upcoming(&[]).is_empty());
}

/// Test that applying a request overwrites the descriptive fields only
#[test]
fn test_apply_request_preserves_unmodeled_fields() {
    let mut existing: EventPayload = serde_json::from_value(json!({
        "id": "evt123",
        "etag": "\"33\"",
        "status": "confirmed",
        "summary": "Old title",
        "location": "Old room",
        "start": { "dateTime": "2024-02-01T10:00:00+02:00", "timeZone": "Europe/Helsinki" },
        "end": { "dateTime": "2024-02-01T11:00:00+02:00", "timeZone": "Europe/Helsinki" },
        "reminders": { "useDefault": false, "overrides": [ { "method": "email", "minutes": 1440 } ] },
        "htmlLink": "https://calendar.example/evt123"
    }))
    .unwrap();

    let mut draft = standup_draft();
    draft.summary = "New title".to_string();
    draft.location = None;
    let request = mapper::to_request(&draft, "UTC").unwrap();

    mapper::apply_request(&mut existing, &request);

    // Overwritten fields; a location the draft no longer carries is cleared
    assert_eq!(existing.summary.as_deref(), Some("New title"));
    assert_eq!(
        existing.start.as_ref().unwrap().date_time.as_deref(),
        Some("2024-01-15T09:30:00-05:00")
    );
    assert_eq!(existing.attendees.as_ref().unwrap().len(), 2);
    assert_eq!(existing.location, None);

    // Preserved fields
    assert_eq!(existing.id, "evt123");
    assert_eq!(
        existing.html_link.as_deref(),
        Some("https://calendar.example/evt123")
    );
    assert_eq!(
        existing.reminders,
        Some(EventReminders {
            use_default: false,
            overrides: vec![ReminderOverride {
                method: "email".to_string(),
                minutes: 1440,
            }],
        })
    );
    assert_eq!(existing.extra.get("etag"), Some(&json!("\"33\"")));
    assert_eq!(existing.extra.get("status"), Some(&json!("confirmed")));

    // The applied record round-trips with the preserved fields intact
    let value = serde_json::to_value(&existing).unwrap();
    assert_eq!(value["id"], json!("evt123"));
    assert_eq!(value["etag"], json!("\"33\""));
    assert_eq!(value["summary"], json!("New title"));
}
