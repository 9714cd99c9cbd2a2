use crate::models::{ArtistCount, ListeningEvent};
use std::collections::HashMap;

/// Play counts per artist, most played first.
///
/// Artist names are compared byte for byte: no case folding and no Unicode
/// normalization. Artists with equal counts keep the order in which they
/// were first seen.
pub fn aggregate_by_artist(events: &[ListeningEvent]) -> Vec<ArtistCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ArtistCount> = Vec::new();

    for event in events {
        match index.get(event.artist.as_str()) {
            Some(&i) => counts[i].plays += 1,
            None => {
                index.insert(&event.artist, counts.len());
                counts.push(ArtistCount::new(event.artist.as_str(), 1));
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    counts.sort_by(|a, b| b.plays.cmp(&a.plays));
    counts
}
