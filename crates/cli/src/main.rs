//! Travel Buddy CLI - book hotels and taxis from the terminal
//!
//! Walks through the booking questions one step at a time, in English or
//! French, with typed or "spoken" answers, and submits to the booking API.

mod commands;
mod config;
mod output;
mod repl;
mod speech;

use std::sync::Arc;

use anyhow::Result;
use booking_client::BookingApiClient;
use booking_wizard::{BookingSession, BookingType, Locale};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::speech::{ConsoleSpeaker, TranscriptFeed};

/// Travel Buddy - hotel and taxi booking assistant
#[derive(Parser)]
#[command(name = "buddy")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Book hotels and taxis step by step, typed or spoken")]
#[command(long_about = r#"
Travel Buddy walks you through a hotel or taxi booking one question at a time
and sends it to the booking service.

Examples:
  buddy                        # Start the assistant
  buddy --book hotel           # Jump straight into a hotel booking
  buddy --lang fr --voice      # French prompts, answer with /say or /voice
  buddy config --set server.url=https://api.example.com
"#)]
struct Cli {
    /// Booking API base URL
    #[arg(long, env = "TRAVEL_BUDDY_API")]
    server: Option<String>,

    /// Bearer token for the booking API
    #[arg(long, env = "TRAVEL_BUDDY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Display language (en or fr)
    #[arg(short, long)]
    lang: Option<String>,

    /// Open a booking right away (hotel or taxi)
    #[arg(short, long)]
    book: Option<String>,

    /// Accept voice answers typed at the /voice prompt or with /say
    #[arg(long)]
    voice: bool,

    /// Do not read prompts aloud
    #[arg(long)]
    mute: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration management
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set a configuration value (key=value)
        #[arg(long)]
        set: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "buddy={0},booking_wizard={0},booking_client={0},warn",
                    log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let mut config = config::Config::load()?;

    if let Some(Commands::Config { show, set }) = cli.command {
        match set {
            Some(kv) if !show => commands::set_config(&kv)?,
            _ => commands::show_config(&config)?,
        }
        return Ok(());
    }

    // Command-line flags win over the config file
    if let Some(server) = cli.server {
        config.server.url = server;
    }
    if cli.token.is_some() {
        config.server.token = cli.token;
    }
    if let Some(lang) = cli.lang.as_deref() {
        config.wizard.locale = lang.parse::<Locale>().map_err(anyhow::Error::msg)?;
    }
    if cli.mute {
        config.wizard.muted = true;
    }
    let open = cli
        .book
        .as_deref()
        .map(|b| b.parse::<BookingType>().map_err(anyhow::Error::msg))
        .transpose()?;

    // Create API client
    let api = BookingApiClient::new(&config.server.url).with_token(config.server.token.clone());
    info!("Using booking API at {}", api.base_url());

    let mut session = BookingSession::new(config.wizard.clone(), Arc::new(api))
        .with_speaker(Arc::new(ConsoleSpeaker));
    let feed = cli.voice.then(TranscriptFeed::new);
    if let Some(feed) = &feed {
        session = session.with_recognizer(Arc::new(feed.clone()));
    }

    // Start interactive REPL
    let mut repl = repl::BuddyRepl::new(session, config, feed)?;
    repl.run(open).await?;

    Ok(())
}
