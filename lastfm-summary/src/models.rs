use chrono::{DateTime, Utc};

/// A single completed scrobble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListeningEvent {
    pub artist: String,
    pub track: String,
    pub album: Option<String>,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistCount {
    pub artist: String,
    pub plays: u64,
}

impl ArtistCount {
    pub fn new(artist: impl Into<String>, plays: u64) -> Self {
        Self {
            artist: artist.into(),
            plays,
        }
    }
}
