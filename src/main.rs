//! Assistant widget client
//!
//! Drives the site assistant's guided dialogue, free-text chat and
//! quick-action menu against the `/assistant/*` HTTP endpoints, hosted
//! in a terminal.

mod backend;
mod config;
mod dialogue;
mod terminal;
mod widget;

use backend::HttpBackend;
use config::ClientConfig;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use widget::DialogueDriver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "assistant_widget=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ClientConfig::from_env();
    tracing::info!(
        base_url = %config.base_url,
        user_id = ?config.user_id,
        auto_prompt_secs = config.auto_prompt_delay.as_secs(),
        "Starting assistant widget"
    );

    let backend = Arc::new(HttpBackend::new(&config.base_url)?);
    let driver = Arc::new(DialogueDriver::new(
        backend,
        config.user_id,
        config.auto_prompt_delay,
    ));

    driver.refresh_visibility().await;
    if driver.is_visible() {
        driver.schedule_auto_prompt();
    }

    terminal::run(driver).await?;
    Ok(())
}
