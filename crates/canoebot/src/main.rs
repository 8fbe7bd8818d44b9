//! Canoebot CLI binary.
//!
//! This binary provides command-line access to the booking cache:
//! - List facilities and their time slots
//! - Look up availability for a facility and date
//! - Serve text commands with a scheduled background refresh

use canoebot::{
    BookingCache, ObservabilityConfig, SrcConfig, SrcWebsite, init_observability,
    shutdown_observability,
};
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, list_facilities, list_slots, query, serve};

    // Load .env before anything reads RUST_LOG
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let mut observability = ObservabilityConfig::default().with_json_logs(cli.json_logs);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    init_observability(&observability)?;

    let config = match &cli.config {
        Some(path) => SrcConfig::from_file(path)?,
        None => SrcConfig::load()?,
    };
    let cache = BookingCache::new(
        config.facilities()?,
        SrcWebsite::new(config.cache())?,
        config.cache().clone(),
    );

    // Execute the requested command
    match cli.command {
        Commands::Facilities => list_facilities(&cache),
        Commands::Query {
            facility,
            date,
            refresh,
        } => query(cache, &facility, date.as_deref(), refresh).await?,
        Commands::Slots { facility } => list_slots(cache, &facility).await?,
        Commands::Serve => serve(cache).await?,
    }

    shutdown_observability();
    Ok(())
}
