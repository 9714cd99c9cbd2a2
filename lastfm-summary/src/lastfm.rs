use crate::models::ListeningEvent;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use reqwest::header;
use serde::Deserialize;

const USER_AGENT: &str = concat!("lastfm-summary/", env!("CARGO_PKG_VERSION"));
const TRACKS_PER_PAGE: u32 = 200;

pub struct LastFmClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl LastFmClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(USER_AGENT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Every completed scrobble of `username` at or after `from`, newest first.
    pub async fn fetch_tracks_since(
        &self,
        username: &str,
        from: DateTime<Utc>,
    ) -> Result<Vec<ListeningEvent>> {
        tracing::info!("Fetching tracks...");
        let from_ts = from.timestamp();

        let first = self.fetch_page(username, from_ts, 1).await?;
        let total_pages: u32 = first
            .attr
            .total_pages
            .parse()
            .context("Invalid totalPages in Last.fm response")?;
        tracing::debug!("Total pages: {total_pages}");

        let mut events = Vec::new();
        collect_events(first.track.into_vec(), &mut events)?;

        for page in 2..=total_pages {
            tracing::debug!("Fetching page {page}/{total_pages}");
            let response = self.fetch_page(username, from_ts, page).await?;
            collect_events(response.track.into_vec(), &mut events)?;
        }

        Ok(events)
    }

    async fn fetch_page(&self, username: &str, from_ts: i64, page: u32) -> Result<RecentTracks> {
        let limit = TRACKS_PER_PAGE.to_string();
        let page = page.to_string();
        let from = from_ts.to_string();

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("method", "user.getrecenttracks"),
                ("user", username),
                ("api_key", self.api_key.as_str()),
                ("format", "json"),
                ("limit", limit.as_str()),
                ("page", page.as_str()),
                ("from", from.as_str()),
            ])
            .send()
            .await
            // the URL carries the api key
            .map_err(reqwest::Error::without_url)
            .context("Failed to send Last.fm request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Failed to read Last.fm response")?;

        // Last.fm reports errors in the body, sometimes with a 200 status.
        if let Ok(err) = serde_json::from_str::<ApiError>(&body) {
            bail!("Last.fm API error {}: {}", err.error, err.message);
        }
        if !status.is_success() {
            bail!("Last.fm request failed with status: {status}");
        }

        let parsed: LastFmResponse =
            serde_json::from_str(&body).context("Failed to decode Last.fm response")?;
        Ok(parsed.recenttracks)
    }
}

fn collect_events(tracks: Vec<Track>, events: &mut Vec<ListeningEvent>) -> Result<()> {
    for track in tracks {
        if track.is_now_playing() {
            continue;
        }
        let Some(date) = track.date else {
            continue;
        };

        let uts: i64 = date
            .uts
            .parse()
            .with_context(|| format!("Invalid scrobble timestamp: {}", date.uts))?;
        let played_at = DateTime::from_timestamp(uts, 0)
            .with_context(|| format!("Scrobble timestamp out of range: {uts}"))?;

        events.push(ListeningEvent {
            artist: track.artist.text,
            track: track.name,
            album: track.album.map(|a| a.text).filter(|a| !a.is_empty()),
            played_at,
        });
    }
    Ok(())
}

// --- Serde Structs ---

#[derive(Debug, Deserialize)]
struct ApiError {
    error: u32,
    message: String,
}

#[derive(Debug, Deserialize)]
struct LastFmResponse {
    recenttracks: RecentTracks,
}

#[derive(Debug, Deserialize)]
struct RecentTracks {
    #[serde(default)]
    track: OneOrMany<Track>,
    #[serde(rename = "@attr")]
    attr: PageAttributes,
}

#[derive(Debug, Deserialize)]
struct PageAttributes {
    #[serde(rename = "totalPages")]
    total_pages: String,
}

/// A page holding a single track comes back as an object instead of an array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
struct Track {
    artist: TextNode,
    album: Option<TextNode>,
    name: String,
    date: Option<DateInfo>,
    #[serde(rename = "@attr")]
    attr: Option<TrackAttributes>,
}

impl Track {
    fn is_now_playing(&self) -> bool {
        self.attr
            .as_ref()
            .and_then(|a| a.nowplaying.as_deref())
            .is_some_and(|v| v == "true")
    }
}

#[derive(Debug, Deserialize)]
struct TextNode {
    #[serde(rename = "#text")]
    text: String,
}

#[derive(Debug, Deserialize)]
struct DateInfo {
    uts: String,
}

#[derive(Debug, Deserialize)]
struct TrackAttributes {
    nowplaying: Option<String>,
}
