//! Defines the `TrackMetadata` struct, a unified representation of track
//! information from the audio sources, and the parsing of `yt-dlp` output.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::process::Output;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use url::Url;

use crate::commands::music::utils::music_manager::MusicError;

/// Lazily initialized, thread-safe cache for storing fetched `TrackMetadata`.
/// Uses the track's URL as the key. `DashMap` allows concurrent reads/writes.
pub static AUDIO_CACHE: LazyLock<Arc<DashMap<Url, TrackMetadata>>> =
    LazyLock::new(|| Arc::new(DashMap::new()));

/// Unified representation of metadata for a playable track. Immutable once
/// produced by resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackMetadata {
    /// The title of the track.
    pub title: String,
    /// The artist or uploader, if known.
    pub author: Option<String>,
    /// The direct URL to the track, if available (e.g., YouTube video URL).
    pub url: Option<String>,
    /// The duration of the track, if available.
    #[serde(with = "humantime_serde")]
    pub duration: Option<Duration>,
    /// URL to a thumbnail image for the track, if available.
    pub thumbnail: Option<String>,
    /// The name of the user who requested the track.
    pub requested_by: Option<String>,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown Track".to_string(),
            author: None,
            url: None,
            duration: None,
            thumbnail: None,
            requested_by: None,
        }
    }
}

impl TrackMetadata {
    /// Creates `TrackMetadata` from `yt-dlp` output, adding the requestor's name.
    pub fn from_youtube(output: Output, requested_by: String) -> Result<Self, MusicError> {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut metadata = Self::from_json_line(stdout.trim())?;
        metadata.requested_by = Some(requested_by);
        Ok(metadata)
    }

    /// Parses a single `yt-dlp --dump-json` object into `TrackMetadata`.
    ///
    /// Fields that are missing get defaults; a track without a URL is kept
    /// (the player refuses to play it later). Successfully parsed tracks
    /// with a URL land in the cache.
    pub fn from_json_line(line: &str) -> Result<Self, MusicError> {
        let metadata_json: serde_json::Value = serde_json::from_str(line).map_err(|e| {
            MusicError::AudioSourceError(format!("Failed to parse video metadata: {}", e))
        })?;

        let title = metadata_json["title"]
            .as_str()
            .unwrap_or("Unknown Title")
            .to_string();

        let author = metadata_json["uploader"]
            .as_str()
            .or_else(|| metadata_json["channel"].as_str())
            .map(|s| s.to_string());

        let duration = metadata_json["duration"]
            .as_f64()
            .map(Duration::from_secs_f64);

        let thumbnail = metadata_json["thumbnail"].as_str().map(|s| s.to_string());

        let url_str = metadata_json["webpage_url"].as_str().map(|s| s.to_string());

        let metadata = TrackMetadata {
            title,
            author,
            url: url_str.clone(),
            duration,
            thumbnail,
            requested_by: None,
        };

        // If a valid URL was extracted, cache the metadata under it.
        if let Some(url) = url_str {
            if let Ok(url) = Url::parse(&url) {
                AUDIO_CACHE.insert(url, metadata.clone());
            }
        }

        Ok(metadata)
    }

    /// Cached metadata for a URL that was resolved earlier.
    pub fn cached(url: &Url) -> Option<TrackMetadata> {
        AUDIO_CACHE.get(url).map(|entry| entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    /// A complete yt-dlp JSON object maps onto every metadata field.
    #[test]
    fn test_from_json_line_full_object() {
        let line = r#"{
            "title": "Test Song",
            "uploader": "Test Artist",
            "duration": 245.0,
            "thumbnail": "https://img.example/thumb.jpg",
            "webpage_url": "https://www.youtube.com/watch?v=test12345ab"
        }"#;

        let metadata = TrackMetadata::from_json_line(line).unwrap();

        assert_eq!(metadata.title, "Test Song");
        assert_eq!(metadata.author.as_deref(), Some("Test Artist"));
        assert_eq!(metadata.duration, Some(Duration::from_secs(245)));
        assert_eq!(
            metadata.url.as_deref(),
            Some("https://www.youtube.com/watch?v=test12345ab")
        );
        assert_eq!(metadata.requested_by, None);
    }

    /// Missing fields fall back to defaults instead of failing the parse.
    #[test]
    fn test_from_json_line_sparse_object() {
        let metadata = TrackMetadata::from_json_line(r#"{"duration": 10}"#).unwrap();

        assert_eq!(metadata.title, "Unknown Title");
        assert_eq!(metadata.author, None);
        assert_eq!(metadata.url, None);
        assert_eq!(metadata.duration, Some(Duration::from_secs(10)));
    }

    /// The uploader field wins over the channel field for the author.
    #[test]
    fn test_from_json_line_author_fallback() {
        let metadata =
            TrackMetadata::from_json_line(r#"{"title": "x", "channel": "Chan"}"#).unwrap();
        assert_eq!(metadata.author.as_deref(), Some("Chan"));

        let metadata = TrackMetadata::from_json_line(
            r#"{"title": "x", "uploader": "Up", "channel": "Chan"}"#,
        )
        .unwrap();
        assert_eq!(metadata.author.as_deref(), Some("Up"));
    }

    /// Garbage output from the subprocess is a typed source error.
    #[test]
    fn test_from_json_line_rejects_garbage() {
        assert_matches!(
            TrackMetadata::from_json_line("ERROR: video unavailable"),
            Err(MusicError::AudioSourceError(_))
        );
    }

    /// Parsed tracks with a URL become retrievable through the cache.
    #[test]
    fn test_parsed_tracks_are_cached() {
        let line = r#"{
            "title": "Cached Song",
            "webpage_url": "https://www.youtube.com/watch?v=cachehit0000"
        }"#;
        TrackMetadata::from_json_line(line).unwrap();

        let url = Url::parse("https://www.youtube.com/watch?v=cachehit0000").unwrap();
        let cached = TrackMetadata::cached(&url).unwrap();
        assert_eq!(cached.title, "Cached Song");
    }
}
