mod calendar;
mod commands;
mod config;
mod error;
mod startup;

use clap::Parser;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    let cli = commands::Cli::parse();

    // Load configuration
    let config = startup::load_config()?;

    commands::run(cli, config).await?;

    Ok(())
}
