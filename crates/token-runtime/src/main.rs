//! # Token Runtime
//!
//! Deploys a backupable token and logs every event it publishes.
//!
//! ## Startup Sequence
//!
//! 1. Install the tracing subscriber (`RUST_LOG`, default `info`)
//! 2. Load `BTK_*` configuration and the deployer address
//! 3. Deploy the token with the system clock and k256 recovery
//! 4. Stream events as JSON until Ctrl+C
//!
//! ## Environment
//!
//! `BTK_DEPLOYER` (required), `BTK_EVENT_RETENTION` (optional cap on the
//! in-memory event history) plus the token variables read by
//! `TokenConfig::from_env`.

use anyhow::{Context, Result};
use backupable_token::adapters::event_log::DEFAULT_CHANNEL_CAPACITY;
use backupable_token::prelude::*;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Runtime configuration.
#[derive(Debug)]
struct RuntimeConfig {
    token: TokenConfig,
    deployer: Address,
    event_retention: Option<usize>,
}

/// Load configuration from the environment.
fn load_config() -> Result<RuntimeConfig> {
    let token = TokenConfig::from_env().context("reading BTK_* token configuration")?;
    let deployer = std::env::var("BTK_DEPLOYER")
        .context("BTK_DEPLOYER must be set to the 0x-hex deployer address")?
        .trim()
        .parse::<Address>()
        .context("parsing BTK_DEPLOYER")?;
    let event_retention = std::env::var("BTK_EVENT_RETENTION")
        .ok()
        .map(|value| value.trim().parse::<usize>())
        .transpose()
        .context("parsing BTK_EVENT_RETENTION")?;

    Ok(RuntimeConfig {
        token,
        deployer,
        event_retention,
    })
}

/// Forward published events to the log until the channel closes.
async fn stream_events(mut events: tokio::sync::broadcast::Receiver<LoggedEvent>) {
    loop {
        match events.recv().await {
            Ok(logged) => match serde_json::to_string(&logged) {
                Ok(json) => info!(target: "token_events", "{json}"),
                Err(e) => warn!(sequence = logged.sequence, error = %e, "Unserializable event"),
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Event stream lagged; see history for missed events");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!(version = backupable_token::VERSION, "Starting token runtime");

    let config = load_config()?;
    let log = Arc::new(match config.event_retention {
        Some(retention) => EventLog::with_retention(DEFAULT_CHANNEL_CAPACITY, retention),
        None => EventLog::new(),
    });
    let streamer = tokio::spawn(stream_events(log.subscribe()));

    let token = BackupableTokenService::deploy(
        config.token,
        config.deployer,
        SystemClock,
        K256Recovery,
        log.clone(),
    )
    .context("deploying token")?;

    info!(
        name = %token.name(),
        symbol = %token.symbol(),
        supply = %format_units(token.total_supply(), token.decimals()),
        domain_tag = %token.domain().tag(),
        "Token is live. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    info!(stats = ?token.stats(), events = log.published(), "Shutting down");
    drop(token);
    drop(log);
    streamer.await.context("event streamer panicked")?;
    Ok(())
}
