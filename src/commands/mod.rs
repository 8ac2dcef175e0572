mod create;
mod delete;
mod list;
mod show;
mod update;

use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;

use crate::calendar::models::{DisplayRecord, EventDraft};
use crate::calendar::time::parse_datetime;
use crate::calendar::{provider_from_config, CalendarClient};
use crate::config::Config;
use crate::error::CalResult;

#[derive(Parser)]
#[command(name = "calman")]
#[command(about = "Manage Google Calendar events from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Event fields shared by the create and update commands
#[derive(Args)]
struct DraftArgs {
    /// Event title
    summary: String,

    /// Start time (YYYY-MM-DDTHH:MM, seconds optional)
    #[arg(short, long)]
    start: String,

    /// End time (YYYY-MM-DDTHH:MM, seconds optional)
    #[arg(short, long)]
    end: String,

    /// Where the event takes place
    #[arg(short, long)]
    location: Option<String>,

    /// Longer free-form description
    #[arg(short, long)]
    description: Option<String>,

    /// Comma-separated attendee emails
    #[arg(short, long)]
    attendees: Option<String>,

    /// IANA timezone overriding the configured default
    #[arg(long)]
    time_zone: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new event
    Create(DraftArgs),

    /// Overwrite the descriptive fields of an existing event
    Update {
        /// Identifier of the event to update
        event_id: String,

        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Delete an event permanently
    Delete {
        /// Identifier of the event to delete
        event_id: String,
    },

    /// List upcoming events, soonest first
    List {
        /// Cap on the number of events shown
        #[arg(short, long)]
        max_results: Option<u32>,
    },

    /// Show one event in full
    Show {
        /// Identifier of the event to show
        event_id: String,
    },
}

/// Build the shared client and dispatch to the selected command
pub async fn run(cli: Cli, config: Config) -> CalResult<()> {
    let credentials = provider_from_config(&config)?;
    let client = CalendarClient::new(credentials, config.calendar_id.clone());

    match cli.command {
        Commands::Create(args) => {
            let draft = build_draft(args)?;
            create::run(&client, &config, draft).await
        }
        Commands::Update { event_id, draft } => {
            let draft = build_draft(draft)?;
            update::run(&client, &config, &event_id, draft).await
        }
        Commands::Delete { event_id } => delete::run(&client, &event_id).await,
        Commands::List { max_results } => {
            let max_results = max_results.unwrap_or(config.max_results);
            list::run(&client, max_results).await
        }
        Commands::Show { event_id } => show::run(&client, &event_id).await,
    }
}

/// Turn command line arguments into a draft, parsing the timestamps
fn build_draft(args: DraftArgs) -> CalResult<EventDraft> {
    Ok(EventDraft {
        summary: args.summary,
        location: args.location.filter(|value| !value.trim().is_empty()),
        description: args.description.filter(|value| !value.trim().is_empty()),
        start: parse_datetime(&args.start)?,
        end: parse_datetime(&args.end)?,
        attendees: split_attendees(args.attendees.as_deref()),
        time_zone: args.time_zone,
    })
}

/// Split a comma-separated attendee flag; trimming happens downstream
fn split_attendees(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| value.split(',').map(|entry| entry.to_string()).collect())
        .unwrap_or_default()
}

/// Print one event the same way in listings and single lookups
fn print_record(record: &DisplayRecord) {
    println!("{}  {}", record.start.dimmed(), record.summary.bold());
    println!("  id: {}", record.id);
    println!("  location: {}", record.location);
    println!("  description: {}", record.description);
    if !record.attendees.is_empty() {
        println!("  attendees: {}", record.attendees);
    }
    if let Some(link) = &record.link {
        println!("  {}", link.dimmed());
    }
}
