use owo_colors::OwoColorize;

use crate::calendar::CalendarClient;
use crate::error::CalResult;

pub async fn run(client: &CalendarClient, event_id: &str) -> CalResult<()> {
    client.delete_event(event_id).await?;

    println!("{}", "Event deleted successfully.".green());

    Ok(())
}
