use crate::error::{validation_error, CalResult};
use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Resolve an IANA timezone identifier
pub fn resolve_zone(name: &str) -> CalResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| validation_error(&format!("Unknown timezone: {}", name)))
}

/// Qualify a wall-clock time with a zone and render it as ISO-8601 with offset
pub fn to_zoned_rfc3339(local: NaiveDateTime, zone: Tz) -> CalResult<String> {
    match zone.from_local_datetime(&local) {
        chrono::LocalResult::Single(dt) => Ok(dt.to_rfc3339()),
        chrono::LocalResult::Ambiguous(_, _) => Err(validation_error(&format!(
            "Ambiguous local time {} in {}",
            local, zone
        ))),
        chrono::LocalResult::None => Err(validation_error(&format!(
            "Local time {} does not exist in {}",
            local, zone
        ))),
    }
}

/// Parse datetime input in `YYYY-MM-DDTHH:MM[:SS]` form
pub fn parse_datetime(input: &str) -> CalResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M"))
        .map_err(|_| {
            validation_error(&format!(
                "Invalid datetime '{}' (expected YYYY-MM-DDTHH:MM[:SS])",
                input
            ))
        })
}
