use owo_colors::OwoColorize;

use crate::calendar::{mapper, CalendarClient};
use crate::error::CalResult;

const EMPTY_NOTICE: &str = "No upcoming events found.";

pub async fn run(client: &CalendarClient, max_results: u32) -> CalResult<()> {
    let events = client.get_upcoming_events(max_results).await?;
    let records = mapper::list_upcoming(&events);

    if records.is_empty() {
        println!("{}", EMPTY_NOTICE.dimmed());
        return Ok(());
    }

    for record in &records {
        super::print_record(record);
        println!();
    }

    Ok(())
}
