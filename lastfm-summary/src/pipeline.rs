use crate::aggregate::aggregate_by_artist;
use crate::config::Config;
use crate::export::{output_path, write_csv};
use crate::lastfm::LastFmClient;
use crate::report::{ReportWindow, TOP_N};
use crate::telegram::{TelegramClient, notify};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};

/// One fetch, aggregate, export, notify cycle. Stops at the first failing step.
pub async fn run(config: &Config) -> Result<()> {
    run_with_clock(config, Local::now).await
}

/// Same as [`run`], reading the end of the report window from `now`.
pub async fn run_with_clock<F>(config: &Config, now: F) -> Result<()>
where
    F: Fn() -> DateTime<Local>,
{
    let window = ReportWindow::starting(config.report.from)?;
    let username = &config.user_credentials.username;

    let lastfm = LastFmClient::new(&config.endpoints.lastfm, &config.api_credentials.api_key)
        .context("Failed to init Last.fm client")?;
    let tracks = lastfm.fetch_tracks_since(username, window.from_utc()).await?;
    tracing::info!(
        "Fetched {} tracks since {}.",
        tracks.len(),
        window.from().date_naive()
    );

    let aggregate = aggregate_by_artist(&tracks);

    tracing::info!("Top Artists:");
    for (i, entry) in aggregate.iter().take(TOP_N).enumerate() {
        tracing::info!("{}. {}: {} plays", i + 1, entry.artist, entry.plays);
    }

    let path = output_path(&config.report.output_dir, username, window.year());
    write_csv(&aggregate, &path)?;

    // The window closes when the message goes out, not when the fetch finished.
    let label = window.label(now());
    let telegram = TelegramClient::new(&config.endpoints.telegram, &config.telegram.bot_token)
        .context("Failed to init Telegram client")?;
    notify(&telegram, &config.telegram.chat_id, &aggregate, &label).await?;

    Ok(())
}
