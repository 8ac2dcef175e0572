use owo_colors::OwoColorize;

use crate::calendar::models::EventDraft;
use crate::calendar::{mapper, CalendarClient};
use crate::config::Config;
use crate::error::CalResult;

pub async fn run(client: &CalendarClient, config: &Config, draft: EventDraft) -> CalResult<()> {
    let request = mapper::to_request(&draft, &config.time_zone)?;
    let created = client.create_event(&request).await?;

    let link = created.html_link.unwrap_or_default();
    println!("{}", format!("Event created: {}", link).green());

    Ok(())
}
