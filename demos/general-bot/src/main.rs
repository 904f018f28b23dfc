//! General Bot
//!
//! Runs the demo controllers against the console client. Events are read
//! from stdin as JSON lines; outbound calls are logged.
//!
//! ```bash
//! cargo run --package general-bot -- --config demos/general-bot/herald.toml \
//!     < demos/general-bot/events.jsonl
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use herald::prelude::*;
use tracing::info;

use general_bot::console::{ConsoleClient, stdin_events};
use general_bot::controllers;

#[derive(Debug, Parser)]
#[command(version, about = "Herald demo bot reading JSON-lines events from stdin")]
struct Args {
    /// Configuration file (defaults to herald.toml in the usual locations).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile, e.g. `production`.
    #[arg(short, long)]
    profile: Option<String>,

    /// Default channel of the single console guild.
    #[arg(long, default_value_t = 1)]
    channel: Snowflake,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = HeraldRuntime::builder();
    if let Some(path) = &args.config {
        builder = builder.config_file(path);
    }
    if let Some(profile) = &args.profile {
        builder = builder.profile(profile);
    }
    let mut runtime = builder.build()?;

    for controller in controllers() {
        runtime.register_boxed(controller);
    }
    info!(controllers = runtime.controller_count(), "Controllers registered");

    let client = ConsoleClient::new().with_guild(Guild {
        id: 1,
        name: "console".to_string(),
        default_channel_id: Some(args.channel),
    });

    runtime.run(Arc::new(client), stdin_events()).await?;

    Ok(())
}
