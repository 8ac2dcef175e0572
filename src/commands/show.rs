use crate::calendar::{mapper, CalendarClient};
use crate::error::CalResult;

pub async fn run(client: &CalendarClient, event_id: &str) -> CalResult<()> {
    let event = client.get_event(event_id).await?;
    let record = mapper::from_response(&event);

    super::print_record(&record);

    Ok(())
}
