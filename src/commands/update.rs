use owo_colors::OwoColorize;

use crate::calendar::models::EventDraft;
use crate::calendar::{mapper, CalendarClient};
use crate::config::Config;
use crate::error::CalResult;

pub async fn run(
    client: &CalendarClient,
    config: &Config,
    event_id: &str,
    draft: EventDraft,
) -> CalResult<()> {
    let request = mapper::to_request(&draft, &config.time_zone)?;
    let updated = client.update_event(event_id, &request).await?;

    let link = updated.html_link.unwrap_or_default();
    println!("{}", format!("Event updated: {}", link).green());

    Ok(())
}
