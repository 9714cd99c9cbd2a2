use crate::config::ChatId;
use crate::models::ArtistCount;
use crate::report::TOP_N;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub struct TelegramClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub async fn send_message(&self, chat_id: &ChatId, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);

        let response = self
            .client
            .post(&url)
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            // the URL carries the bot token
            .map_err(reqwest::Error::without_url)
            .context("Failed to send Telegram request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read Telegram response")?;

        match serde_json::from_str::<BotResponse>(&body) {
            Ok(reply) if reply.ok && status.is_success() => Ok(()),
            Ok(reply) => bail!(
                "Telegram sendMessage to {chat_id} failed ({status}): {}",
                reply.description.as_deref().unwrap_or("no description")
            ),
            Err(_) => bail!("Telegram sendMessage to {chat_id} failed with status: {status}"),
        }
    }
}

/// Title line followed by at most [`TOP_N`] numbered entries.
pub fn format_summary(artists: &[ArtistCount], window_label: &str) -> String {
    let mut lines = vec![format!("🎧 Last.fm {window_label} Top 20 Sanatçı 🎵")];
    for (i, entry) in artists.iter().take(TOP_N).enumerate() {
        lines.push(format!("{}. {} — {} çalma", i + 1, entry.artist, entry.plays));
    }
    lines.join("\n")
}

pub async fn notify(
    client: &TelegramClient,
    chat_id: &ChatId,
    artists: &[ArtistCount],
    window_label: &str,
) -> Result<()> {
    let message = format_summary(artists, window_label);
    client.send_message(chat_id, &message).await?;
    tracing::info!("Telegram message sent");
    Ok(())
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a ChatId,
    text: &'a str,
}

#[derive(Deserialize)]
struct BotResponse {
    ok: bool,
    description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const LABEL: &str = "2025-01-01 - 2025-03-09";

    #[test]
    fn formats_title_and_numbered_lines() {
        let message = format_summary(
            &[ArtistCount::new("A", 2), ArtistCount::new("B", 1)],
            LABEL,
        );

        assert_eq!(
            message,
            "🎧 Last.fm 2025-01-01 - 2025-03-09 Top 20 Sanatçı 🎵\n\
             1. A — 2 çalma\n\
             2. B — 1 çalma"
        );
    }

    #[test]
    fn empty_aggregate_gives_title_only() {
        let message = format_summary(&[], LABEL);

        assert_eq!(message, "🎧 Last.fm 2025-01-01 - 2025-03-09 Top 20 Sanatçı 🎵");
    }

    #[test]
    fn truncates_to_top_twenty() {
        let artists: Vec<_> = (0..25)
            .map(|i| ArtistCount::new(format!("Artist {i}"), 100 - i))
            .collect();

        let message = format_summary(&artists, LABEL);
        let lines: Vec<&str> = message.lines().collect();

        assert_eq!(lines.len(), 1 + TOP_N);
        for (i, line) in lines[1..].iter().enumerate() {
            assert_eq!(
                *line,
                format!("{}. Artist {i} — {} çalma", i + 1, 100 - i as u64)
            );
        }
        assert!(!message.contains("Artist 20"));
    }

    #[tokio::test]
    async fn send_message_posts_chat_and_text() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/bot123:abc/sendMessage")
                    .json_body(json!({ "chat_id": -100200300, "text": "hello" }));
                then.status(200)
                    .json_body(json!({ "ok": true, "result": { "message_id": 1 } }));
            })
            .await;

        let client = TelegramClient::new(server.base_url(), "123:abc").unwrap();
        client
            .send_message(&ChatId::Id(-100200300), "hello")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn channel_username_is_sent_as_string() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/bot123:abc/sendMessage")
                    .json_body(json!({ "chat_id": "@chan", "text": "hi" }));
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        let client = TelegramClient::new(format!("{}/", server.base_url()), "123:abc").unwrap();
        client
            .send_message(&ChatId::Username("@chan".to_string()), "hi")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_message_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/bot123:abc/sendMessage");
                then.status(400).json_body(json!({
                    "ok": false,
                    "error_code": 400,
                    "description": "Bad Request: chat not found"
                }));
            })
            .await;

        let client = TelegramClient::new(server.base_url(), "123:abc").unwrap();
        let err = client
            .send_message(&ChatId::Id(1), "hello")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("chat not found"));
    }

    #[tokio::test]
    async fn not_ok_reply_with_ok_status_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/bot123:abc/sendMessage");
                then.status(200).json_body(json!({
                    "ok": false,
                    "description": "Forbidden: bot was kicked from the group chat"
                }));
            })
            .await;

        let client = TelegramClient::new(server.base_url(), "123:abc").unwrap();
        let err = client
            .send_message(&ChatId::Id(1), "hello")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("bot was kicked"));
    }

    #[tokio::test]
    async fn transport_error_hides_bot_token() {
        let client = TelegramClient::new("http://127.0.0.1:1", "123456:SUPERSECRETTOKEN").unwrap();
        let err = client
            .send_message(&ChatId::Id(1), "hello")
            .await
            .unwrap_err();

        let report = format!("{err:?}");
        assert!(report.contains("Failed to send Telegram request"));
        assert!(!report.contains("SUPERSECRETTOKEN"));
    }

    #[tokio::test]
    async fn notify_sends_formatted_summary() {
        let server = MockServer::start_async().await;
        let expected = format_summary(&[ArtistCount::new("A", 2)], LABEL);
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/bot123:abc/sendMessage")
                    .json_body(json!({ "chat_id": 7, "text": expected }));
                then.status(200).json_body(json!({ "ok": true }));
            })
            .await;

        let client = TelegramClient::new(server.base_url(), "123:abc").unwrap();
        notify(&client, &ChatId::Id(7), &[ArtistCount::new("A", 2)], LABEL)
            .await
            .unwrap();

        mock.assert_async().await;
    }
}
