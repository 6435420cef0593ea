//! Sample data used across the integration tests

use std::time::Duration;

use cadence::commands::music::audio_sources::track_metadata::TrackMetadata;

/// A resolvable track with a playable URL.
pub fn track(title: &str) -> TrackMetadata {
    TrackMetadata {
        title: title.to_string(),
        author: Some("Fixture Artist".to_string()),
        url: Some(format!("https://www.youtube.com/watch?v={title}")),
        duration: Some(Duration::from_secs(180)),
        thumbnail: None,
        requested_by: Some("tester".to_string()),
    }
}

/// An ordered list of resolvable tracks.
pub fn playlist(titles: &[&str]) -> Vec<TrackMetadata> {
    titles.iter().map(|title| track(title)).collect()
}
