//! Implements the `AudioApi` trait for fetching metadata from YouTube.
//! Uses the `yt-dlp` command-line tool for extracting information.

use std::process::Command;

use serenity::async_trait;
use tracing::info;
use url::Url;

use super::{AudioApi, Resolution, track_metadata::TrackMetadata};
use crate::commands::music::utils::music_manager::MusicError;

/// How many search results are offered for interactive choice.
pub const SEARCH_RESULTS: usize = 5;

/// The main struct implementing YouTube API logic (via `yt-dlp`).
#[derive(Default)]
pub struct YoutubeApi;

#[async_trait]
impl AudioApi for YoutubeApi {
    /// Delegates to the `is_youtube_url` helper function.
    fn is_valid_url(&self, url: &str) -> bool {
        YoutubeApi::is_youtube_url(url)
    }

    /// Fetches metadata for a video or playlist URL. Playlists resolve to
    /// every entry in order; single videos resolve to one candidate.
    async fn get_metadata(
        &self,
        url: &str,
        requestor_name: String,
    ) -> Result<Resolution, MusicError> {
        if Self::is_playlist_url(url) {
            let tracks = Self::from_playlist(url, requestor_name)?;
            Ok(Resolution::Playlist(tracks))
        } else {
            let track = Self::from_url(url, requestor_name)?;
            Ok(Resolution::Tracks(vec![track]))
        }
    }
}

impl YoutubeApi {
    /// Checks if the input string is a YouTube URL (watch page, playlist,
    /// or youtu.be short link).
    pub fn is_youtube_url(query: &str) -> bool {
        match Url::parse(query) {
            Ok(url) => {
                url.host_str().is_some_and(|host| {
                    host == "www.youtube.com" || host == "youtube.com" || host == "m.youtube.com"
                }) && (url.path().starts_with("/watch") || url.path().starts_with("/playlist"))
                    || url.host_str() == Some("youtu.be")
            }
            Err(_) => false,
        }
    }

    /// Checks whether a URL names a playlist rather than a single video.
    pub fn is_playlist_url(url: &str) -> bool {
        match Url::parse(url) {
            Ok(url) => {
                url.path().starts_with("/playlist")
                    || url.query_pairs().any(|(key, _)| key == "list")
            }
            Err(_) => false,
        }
    }

    /// Fetches metadata for a single video URL. Served from the cache when
    /// the same URL was resolved before.
    pub fn from_url(url: &str, requested_by: String) -> Result<TrackMetadata, MusicError> {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(mut cached) = TrackMetadata::cached(&parsed) {
                cached.requested_by = Some(requested_by);
                return Ok(cached);
            }
        }

        info!("Creating YouTube audio source for URL: {}", url);

        let metadata_output = Command::new("yt-dlp")
            .args([
                "-j",            // Output as JSON
                "--no-playlist", // Don't process playlists
                url,
            ])
            .output()
            .map_err(|e| {
                MusicError::AudioSourceError(format!("Failed to get video metadata: {}", e))
            })?;

        TrackMetadata::from_youtube(metadata_output, requested_by)
    }

    /// Fetches metadata for every entry of a playlist URL, in order.
    pub fn from_playlist(url: &str, requested_by: String) -> Result<Vec<TrackMetadata>, MusicError> {
        info!("Creating YouTube audio sources for playlist: {}", url);

        let metadata_output = Command::new("yt-dlp")
            .args(["-j", url])
            .output()
            .map_err(|e| {
                MusicError::AudioSourceError(format!("Failed to get playlist metadata: {}", e))
            })?;

        Self::parse_lines(&String::from_utf8_lossy(&metadata_output.stdout), requested_by)
    }

    /// Fetches the first few YouTube search results for a search term.
    /// Uses `yt-dlp` with the `ytsearch:` prefix.
    pub fn from_search(
        search_term: &str,
        requested_by: String,
    ) -> Result<Vec<TrackMetadata>, MusicError> {
        info!("Creating audio sources from search term: {}", search_term);
        let search_param = format!("ytsearch{}:{}", SEARCH_RESULTS, search_term);

        let metadata_output = Command::new("yt-dlp")
            .args(["-j", "--no-playlist", &search_param])
            .output()
            .map_err(|e| {
                MusicError::AudioSourceError(format!("Failed to get video metadata: {}", e))
            })?;

        Self::parse_lines(&String::from_utf8_lossy(&metadata_output.stdout), requested_by)
    }

    // yt-dlp emits one JSON object per line, one line per video.
    fn parse_lines(stdout: &str, requested_by: String) -> Result<Vec<TrackMetadata>, MusicError> {
        let mut tracks = Vec::new();
        for line in stdout.lines().filter(|line| !line.trim().is_empty()) {
            let mut metadata = TrackMetadata::from_json_line(line)?;
            metadata.requested_by = Some(requested_by.clone());
            tracks.push(metadata);
        }
        Ok(tracks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("https://www.youtube.com/watch?v=dQw4w9WgXcQ", true ; "watch page")]
    #[test_case("https://youtube.com/watch?v=dQw4w9WgXcQ", true ; "bare host")]
    #[test_case("https://m.youtube.com/watch?v=dQw4w9WgXcQ", true ; "mobile host")]
    #[test_case("https://youtu.be/dQw4w9WgXcQ", true ; "short link")]
    #[test_case("https://www.youtube.com/playlist?list=PL1234567890", true ; "playlist page")]
    #[test_case("https://example.com/watch?v=dQw4w9WgXcQ", false ; "wrong host")]
    #[test_case("not a url", false ; "not a url")]
    fn test_is_youtube_url(input: &str, expected: bool) {
        assert_eq!(YoutubeApi::is_youtube_url(input), expected);
    }

    #[test_case("https://www.youtube.com/playlist?list=PL1234567890", true ; "playlist path")]
    #[test_case("https://www.youtube.com/watch?v=abc&list=PL1234567890", true ; "watch with list param")]
    #[test_case("https://www.youtube.com/watch?v=abc", false ; "plain video")]
    fn test_is_playlist_url(input: &str, expected: bool) {
        assert_eq!(YoutubeApi::is_playlist_url(input), expected);
    }

    /// Multi-line yt-dlp output becomes one track per line, each tagged
    /// with the requesting user.
    #[test]
    fn test_parse_lines_tags_requestor() {
        let stdout = concat!(
            r#"{"title": "First", "webpage_url": "https://www.youtube.com/watch?v=first0000000"}"#,
            "\n",
            r#"{"title": "Second", "webpage_url": "https://www.youtube.com/watch?v=second000000"}"#,
            "\n",
        );

        let tracks = YoutubeApi::parse_lines(stdout, "tester".to_string()).unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].title, "First");
        assert_eq!(tracks[1].title, "Second");
        assert!(tracks.iter().all(|t| t.requested_by.as_deref() == Some("tester")));
    }

    /// Blank lines in subprocess output are skipped, not parse errors.
    #[test]
    fn test_parse_lines_skips_blank_lines() {
        let stdout = "\n\n{\"title\": \"Only\"}\n\n";
        let tracks = YoutubeApi::parse_lines(stdout, "tester".to_string()).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].title, "Only");
    }
}
