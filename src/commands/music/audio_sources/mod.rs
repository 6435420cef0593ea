//! This module defines the structure and traits for handling audio sources.
//! YouTube (via `yt-dlp`) is the only provider right now; the `AudioApi`
//! trait keeps the seam open for more.

/// Submodule defining the `TrackMetadata` struct used across audio sources.
pub mod track_metadata;
/// Submodule implementing the `AudioApi` trait for YouTube.
pub mod youtube;

use std::sync::LazyLock;

use serenity::async_trait;
use tracing::warn;
use url::Url;

use crate::commands::music::utils::music_manager::MusicError;
use track_metadata::TrackMetadata;
use youtube::YoutubeApi;

/// A specialized `Result` type for operations within the `audio_sources` module.
pub type AudioSourceResult<T> = Result<T, MusicError>;

/// What a user query resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An ordered playlist; appended to the queue without prompting.
    Playlist(Vec<TrackMetadata>),
    /// Individual candidates: one for a direct URL, up to five for a
    /// plain-text search.
    Tracks(Vec<TrackMetadata>),
}

/// Lazily initialized list of available `AudioApi` implementations, tried
/// in order against URLs.
pub static AUDIO_APIS: LazyLock<[Box<dyn AudioApi>; 1]> =
    LazyLock::new(|| [Box::new(YoutubeApi)]);

/// Trait defining the common interface for audio source APIs.
/// Requires `Send + Sync` to be safely used across async tasks.
#[async_trait]
pub trait AudioApi: Send + Sync {
    /// Checks if the given URL is recognized by this audio API implementation.
    fn is_valid_url(&self, url: &str) -> bool;

    /// Fetch metadata for a track or playlist URL.
    async fn get_metadata(
        &self,
        url: &str,
        requestor_name: String,
    ) -> Result<Resolution, MusicError>;
}

/// A utility struct for turning user queries into resolved tracks.
pub struct AudioSource;

impl AudioSource {
    /// Performs a basic check if the input string can be parsed as a URL.
    pub fn is_url(input: &str) -> bool {
        Url::parse(input).is_ok()
    }

    /// Resolve a user query (URL or search text) into tracks.
    ///
    /// Every lookup or subprocess failure surfaces as `NoTracksFound`; the
    /// detail is logged here and the caller only renders user feedback.
    pub async fn resolve(query: &str, requested_by: String) -> AudioSourceResult<Resolution> {
        let query = Self::normalize_query(query);

        let result = if Self::is_url(query) {
            Self::resolve_url(query, requested_by).await
        } else {
            YoutubeApi::from_search(query, requested_by).map(Resolution::Tracks)
        };

        match result {
            Ok(Resolution::Playlist(tracks)) if tracks.is_empty() => {
                Err(MusicError::NoTracksFound)
            }
            Ok(Resolution::Tracks(tracks)) if tracks.is_empty() => Err(MusicError::NoTracksFound),
            Ok(resolution) => Ok(resolution),
            Err(e) => {
                warn!("failed to resolve '{}': {}", query, e);
                Err(MusicError::NoTracksFound)
            }
        }
    }

    /// Queries pasted from chat are often wrapped in <> to suppress the
    /// link preview; unwrap them before URL detection.
    fn normalize_query(query: &str) -> &str {
        query.trim().trim_start_matches('<').trim_end_matches('>')
    }

    async fn resolve_url(url: &str, requested_by: String) -> AudioSourceResult<Resolution> {
        for api_handler in AUDIO_APIS.iter() {
            if api_handler.is_valid_url(url) {
                return api_handler.get_metadata(url, requested_by).await;
            }
        }
        Err(MusicError::AudioSourceError(format!(
            "Unable to resolve URL to valid provider: {}",
            url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Plain text is not a URL; proper URLs are.
    #[test]
    fn test_is_url() {
        assert!(AudioSource::is_url("https://youtube.com/watch?v=abc123"));
        assert!(!AudioSource::is_url("never gonna give you up"));
    }

    /// A URL no provider recognises resolves to the user-facing "no tracks
    /// found" condition, not an internal error.
    #[tokio::test]
    async fn test_unknown_provider_surfaces_as_no_tracks() {
        let result = AudioSource::resolve("https://example.com/song.mp3", "tester".into()).await;
        assert_matches!(result, Err(MusicError::NoTracksFound));
    }

    /// Angle-bracket wrapping from chat clients is stripped before URL
    /// detection.
    #[test]
    fn test_angle_brackets_are_stripped() {
        let stripped = AudioSource::normalize_query(" <https://example.com/song.mp3> ");
        assert_eq!(stripped, "https://example.com/song.mp3");
        assert!(AudioSource::is_url(stripped));
    }
}
