//! Embed rendering for every typed outcome the music commands can report.
//! Commands never format text inline; they hand the outcome (or the error
//! condition) to one of these functions.

use poise::{CreateReply, serenity_prelude as serenity};
use serenity::all::{CreateEmbed, CreateEmbedFooter};
use serenity::model::id::ChannelId;
use std::time::Duration;

use super::{format_duration, music_manager::MusicError};
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;

const COLOR_OK: u32 = 0x00ff00;
const COLOR_ERROR: u32 = 0xff0000;

fn success(description: impl Into<String>) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .description(description.into())
            .color(COLOR_OK),
    )
}

fn failure(description: impl Into<String>) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .description(description.into())
            .color(COLOR_ERROR),
    )
}

/// Create a progress bar for the current track
fn format_progress_bar(position: Duration, total: Duration) -> String {
    const BAR_LENGTH: usize = 15;
    let progress = if total.as_secs() == 0 {
        0.0
    } else {
        (position.as_secs_f64() / total.as_secs_f64()).min(1.0)
    };

    let filled = (progress * BAR_LENGTH as f64).round() as usize;
    let empty = BAR_LENGTH - filled;

    format!("▬{}🔘{}▬", "▬".repeat(filled), "▬".repeat(empty))
}

/// Render every named error condition as user feedback.
pub fn music_error(err: &MusicError) -> CreateReply {
    let description = match err {
        MusicError::QueueEmpty => ":no_entry_sign: Sorry! The queue is **empty**!".to_string(),
        MusicError::NoTracksFound => {
            ":no_entry_sign: Sorry! I couldn't find any **tracks** for that!".to_string()
        }
        MusicError::AlreadyConnected => {
            ":no_entry_sign: Sorry, I am already **in** a voice channel.".to_string()
        }
        MusicError::NoVoiceChannel | MusicError::UserNotInVoiceChannel => {
            ":no_entry_sign: Sorry, you are not currently **in** a voice channel.".to_string()
        }
        MusicError::AlreadyPaused => {
            ":pause_button: The player is already in that **state**!".to_string()
        }
        MusicError::NoMoreTracks => {
            ":no_entry_sign: Sorry! There are no more **tracks** in the queue!".to_string()
        }
        MusicError::NoPreviousTracks => {
            ":no_entry_sign: Sorry! There are no **previous** tracks in the queue!".to_string()
        }
        MusicError::VolumeTooLow => ":loud_sound: The volume must be higher than **0%**".to_string(),
        MusicError::VolumeTooHigh => {
            ":loud_sound: The volume must be less than **150%**".to_string()
        }
        MusicError::MaxVolume => ":sound: The volume is at the **max** level (150%)".to_string(),
        MusicError::MinVolume => {
            ":sound: The volume is at the **minimum** level (0%)".to_string()
        }
        MusicError::InvalidTimeString => {
            ":no_entry_sign: I don't understand that **time**! Try `1:30`, `90` or `90s`."
                .to_string()
        }
        other => format!(":no_entry_sign: {}", other),
    };

    failure(description)
}

pub fn joined(channel: ChannelId) -> CreateReply {
    success(format!(":wave: Just joined <#{}>! What's up?", channel))
}

pub fn left() -> CreateReply {
    success(":wave: Just **left** your voice channel!")
}

pub fn added_to_queue(metadata: &TrackMetadata) -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .description(format!(
                ":notes: Just added **{}** to the queue!",
                metadata.title
            ))
            .footer(CreateEmbedFooter::new(
                "Tip: you can check the current queue with /queue",
            ))
            .color(COLOR_OK),
    )
}

pub fn playlist_added(count: usize) -> CreateReply {
    success(format!(":notes: Just added **{}** tracks to the queue!", count))
}

pub fn now_streaming(metadata: &TrackMetadata) -> CreateReply {
    success(format!(":notes: Now playing **{}**!", metadata.title))
}

pub fn paused() -> CreateReply {
    success(":pause_button: **Paused** the song!")
}

pub fn already_paused() -> CreateReply {
    failure(":pause_button: The song is already **paused**!")
}

pub fn resumed() -> CreateReply {
    success(":play_pause: **Resumed** the song!")
}

pub fn not_paused() -> CreateReply {
    failure(":play_pause: The song is not **paused**!")
}

pub fn stopped() -> CreateReply {
    failure(":no_entry_sign: **Stopped** the song!")
}

pub fn skipped() -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .description(":play_pause: Playing the **next** song in the queue!")
            .footer(CreateEmbedFooter::new(
                "Tip: you can check the current queue with /queue",
            ))
            .color(COLOR_OK),
    )
}

pub fn previous_track() -> CreateReply {
    success(":rewind: Playing the **previous** song in the queue!")
}

pub fn skipped_to(index: usize) -> CreateReply {
    success(format!(":notes: Playing the track in position **{}**", index))
}

pub fn shuffled() -> CreateReply {
    CreateReply::default().embed(
        CreateEmbed::new()
            .description("**Shuffled** the queue!")
            .footer(CreateEmbedFooter::new(
                "Tip: you can check the new order with /queue",
            ))
            .color(COLOR_OK),
    )
}

pub fn repeat_mode_set(mode: &str) -> CreateReply {
    let description = match mode {
        "song" => ":repeat: Looping the **currently** playing song!".to_string(),
        "queue" => ":repeat: Looping the **queue**!".to_string(),
        _ => ":no_entry_sign: **Stopped** the loop!".to_string(),
    };

    CreateReply::default().embed(
        CreateEmbed::new()
            .description(description)
            .footer(CreateEmbedFooter::new(
                "Available options for repeat: stop, song and queue",
            ))
            .color(COLOR_OK),
    )
}

pub fn invalid_repeat_mode() -> CreateReply {
    failure(":no_entry_sign: That is not a repeat mode! Try `stop`, `song` or `queue`.")
}

pub fn volume_set(volume: u16) -> CreateReply {
    success(format!(":loud_sound: Volume set to **{}%**", volume))
}

pub fn seeked(position: Duration) -> CreateReply {
    success(format!(
        ":fast_forward: **Seeked** the song to `{}`!",
        format_duration(position)
    ))
}

pub fn replaying() -> CreateReply {
    success(":repeat: **Replaying** the song!")
}

pub fn nothing_playing() -> CreateReply {
    failure(":no_entry_sign: Sorry! There is no song **playing** at the moment!")
}

/// The now-playing card: title, artist, and played/total time with a
/// progress bar when the duration is known.
pub fn now_playing(metadata: &TrackMetadata, position: Duration) -> CreateReply {
    let mut embed = CreateEmbed::new()
        .title(":notes: Now playing")
        .field("Title", metadata.title.clone(), false)
        .field(
            "Artist",
            metadata.author.clone().unwrap_or_else(|| "Unknown".to_string()),
            false,
        )
        .color(COLOR_OK);

    embed = match metadata.duration {
        Some(duration) => embed.field(
            ":alarm_clock: Duration played",
            format!(
                "{} `{}/{}`",
                format_progress_bar(position, duration),
                format_duration(position),
                format_duration(duration)
            ),
            false,
        ),
        None => embed.field(
            ":alarm_clock: Duration played",
            format!("`{}`", format_duration(position)),
            false,
        ),
    };

    CreateReply::default().embed(embed)
}

/// The queue card: the current track plus the next `show` upcoming ones.
pub fn queue_view(
    current: Option<&TrackMetadata>,
    upcoming: &[TrackMetadata],
    show: usize,
) -> CreateReply {
    let mut embed = CreateEmbed::new()
        .title("Here's the current queue")
        .color(COLOR_OK)
        .field(
            ":notes: Currently playing",
            current
                .map(|t| t.title.clone())
                .unwrap_or_else(|| "No track is **currently** playing!".to_string()),
            false,
        );

    if !upcoming.is_empty() {
        embed = embed.field(
            "What's next",
            upcoming
                .iter()
                .take(show)
                .map(|t| t.title.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            false,
        );
    }

    CreateReply::default().embed(embed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// The bar pins to the rails at the start and the end of a track.
    #[test]
    fn test_progress_bar_rails() {
        let total = Duration::from_secs(100);

        let start = format_progress_bar(Duration::ZERO, total);
        assert!(start.starts_with("▬🔘"));

        let end = format_progress_bar(total, total);
        assert!(end.ends_with("🔘▬"));
    }

    /// Positions past the reported duration stay clamped to a full bar.
    #[test]
    fn test_progress_bar_clamps_overrun() {
        let total = Duration::from_secs(100);
        let overrun = format_progress_bar(Duration::from_secs(250), total);
        let full = format_progress_bar(total, total);
        assert_eq!(overrun, full);
    }
}
