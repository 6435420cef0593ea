//! Per-guild player state machine. Owns the queue and a connection to the
//! audio backend, and implements every guarded transition: connect and
//! teardown, adding tracks, advancing on track-end events, pause and
//! resume, seeking, volume bounds, and the skip family.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serenity::model::id::{ChannelId, GuildId};
use tracing::{debug, info};

use super::backend::AudioBackend;
use super::music_manager::MusicError;
use super::queue::Queue;
use super::track_picker::{MAX_CHOICES, TrackPicker};
use crate::commands::music::audio_sources::Resolution;
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;

const MAX_VOLUME: u16 = 150;
const VOLUME_STEP: u16 = 10;

/// Accepted seek targets: "M:SS", "Mm", "MmSS", "MmSSs", or bare seconds
/// with an optional trailing "s".
static SEEK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d{1,3}):([0-5]?\d)|(\d{1,3})m(?:([0-5]?\d)s?)?|(\d{1,4})s?)$")
        .expect("seek grammar is a valid regex")
});

/// Parse a user-supplied seek target into a duration.
pub(crate) fn parse_seek_time(input: &str) -> Result<Duration, MusicError> {
    let captures = SEEK_TIME
        .captures(input.trim())
        .ok_or(MusicError::InvalidTimeString)?;

    let seconds = if let (Some(minutes), Some(seconds)) = (captures.get(1), captures.get(2)) {
        parse_number(minutes)? * 60 + parse_number(seconds)?
    } else if let Some(minutes) = captures.get(3) {
        let seconds = captures.get(4).map(parse_number).transpose()?.unwrap_or(0);
        parse_number(minutes)? * 60 + seconds
    } else if let Some(seconds) = captures.get(5) {
        parse_number(seconds)?
    } else {
        return Err(MusicError::InvalidTimeString);
    };

    Ok(Duration::from_secs(seconds))
}

fn parse_number(m: regex::Match<'_>) -> Result<u64, MusicError> {
    m.as_str()
        .parse()
        .map_err(|_| MusicError::InvalidTimeString)
}

/// What an `add_tracks` call did, for the caller to render.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// A whole playlist was appended silently.
    Playlist(usize),
    /// A single track was appended.
    Single(TrackMetadata),
    /// The interactive choice expired; nothing was added.
    Abandoned,
}

/// The playback state machine for one guild.
pub struct Player<B> {
    guild_id: GuildId,
    queue: Queue,
    backend: B,
    channel: Option<ChannelId>,
    playing: bool,
    paused: bool,
    volume: u16,
}

impl<B: AudioBackend> Player<B> {
    pub fn new(guild_id: GuildId, backend: B) -> Self {
        Self {
            guild_id,
            queue: Queue::new(),
            backend,
            channel: None,
            playing: false,
            paused: false,
            volume: 100,
        }
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Queue {
        &mut self.queue
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    pub fn channel(&self) -> Option<ChannelId> {
        self.channel
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn volume(&self) -> u16 {
        self.volume
    }

    /// Open the audio connection to the given channel.
    ///
    /// The caller resolves the channel (an explicit argument or the
    /// invoking user's current one); `None` means no channel could be
    /// determined.
    pub async fn connect(&mut self, channel: Option<ChannelId>) -> Result<ChannelId, MusicError> {
        if self.channel.is_some() {
            return Err(MusicError::AlreadyConnected);
        }

        let channel = channel.ok_or(MusicError::NoVoiceChannel)?;
        self.backend.connect(channel).await?;
        self.channel = Some(channel);
        info!("connected to channel {} in guild {}", channel, self.guild_id);
        Ok(channel)
    }

    /// Destroy the audio connection. Safe to call at any time, in any
    /// state; tearing down a torn-down player is a no-op.
    pub async fn teardown(&mut self) -> Result<(), MusicError> {
        self.backend.disconnect().await?;
        self.channel = None;
        self.playing = false;
        self.paused = false;
        info!("player for guild {} torn down", self.guild_id);
        Ok(())
    }

    /// Append resolved tracks to the queue.
    ///
    /// Playlists go in whole and silently; a single resolved track goes in
    /// directly; several search candidates go through the caller's picker
    /// (bounded, timed) and only the chosen one is appended. Afterwards,
    /// playback starts automatically if the player is idle and the cursor
    /// points at a track.
    pub async fn add_tracks(
        &mut self,
        resolution: Resolution,
        picker: &dyn TrackPicker,
    ) -> Result<AddOutcome, MusicError> {
        let outcome = match resolution {
            Resolution::Playlist(tracks) => {
                if tracks.is_empty() {
                    return Err(MusicError::NoTracksFound);
                }
                let count = tracks.len();
                self.queue.add(tracks);
                info!("appended a playlist of {} tracks in guild {}", count, self.guild_id);
                AddOutcome::Playlist(count)
            }
            Resolution::Tracks(mut tracks) => {
                if tracks.is_empty() {
                    return Err(MusicError::NoTracksFound);
                }
                if tracks.len() == 1 {
                    let track = tracks.remove(0);
                    self.queue.add([track.clone()]);
                    AddOutcome::Single(track)
                } else {
                    let shown = &tracks[..tracks.len().min(MAX_CHOICES)];
                    match picker.pick(shown).await {
                        Some(index) if index < shown.len() => {
                            let track = shown[index].clone();
                            self.queue.add([track.clone()]);
                            AddOutcome::Single(track)
                        }
                        _ => {
                            debug!("track choice abandoned in guild {}", self.guild_id);
                            AddOutcome::Abandoned
                        }
                    }
                }
            }
        };

        // The cursor can rest past the end here (finished queue, or an
        // abandoned choice), so check for a current track before starting.
        if !self.playing && matches!(self.queue.current_track(), Ok(Some(_))) {
            self.start_playback().await?;
        }

        Ok(outcome)
    }

    /// Play the track under the cursor.
    pub async fn start_playback(&mut self) -> Result<(), MusicError> {
        let track = self
            .queue
            .current_track()?
            .cloned()
            .ok_or(MusicError::QueueEmpty)?;
        self.play_now(&track).await
    }

    /// Play a track immediately, bypassing the queue. Connects first when
    /// necessary (using the caller-resolved channel) and preempts whatever
    /// is currently playing.
    pub async fn stream(
        &mut self,
        channel: Option<ChannelId>,
        track: TrackMetadata,
    ) -> Result<(), MusicError> {
        if self.channel.is_none() {
            let channel = channel.ok_or(MusicError::NoVoiceChannel)?;
            self.backend.connect(channel).await?;
            self.channel = Some(channel);
        }

        if self.playing {
            self.backend.stop().await?;
        }

        self.play_now(&track).await
    }

    /// React to a terminal track event: move the cursor and play whatever
    /// comes next. An empty queue and a finished queue both end playback
    /// quietly.
    pub async fn advance(&mut self) -> Result<(), MusicError> {
        let next = match self.queue.get_next_track() {
            Ok(next) => next.cloned(),
            Err(MusicError::QueueEmpty) => return Ok(()),
            Err(e) => return Err(e),
        };

        match next {
            Some(track) => self.play_now(&track).await,
            None => {
                debug!("queue finished in guild {}", self.guild_id);
                self.playing = false;
                Ok(())
            }
        }
    }

    /// Replay the current track without moving the cursor.
    pub async fn repeat_track(&mut self) -> Result<(), MusicError> {
        let track = self
            .queue
            .current_track()?
            .cloned()
            .ok_or(MusicError::QueueEmpty)?;
        self.play_now(&track).await
    }

    pub async fn pause(&mut self) -> Result<(), MusicError> {
        if self.paused {
            return Err(MusicError::AlreadyPaused);
        }
        self.backend.set_pause(true).await?;
        self.paused = true;
        Ok(())
    }

    pub async fn resume(&mut self) -> Result<(), MusicError> {
        if !self.paused {
            return Err(MusicError::AlreadyPaused);
        }
        self.backend.set_pause(false).await?;
        self.paused = false;
        Ok(())
    }

    /// Stop playback and rewind the cursor to the first track. The queue
    /// contents are kept.
    pub async fn stop(&mut self) -> Result<(), MusicError> {
        self.queue.empty();
        self.backend.stop().await
    }

    /// Skip to the next track by stopping the current one; the track-end
    /// event then advances the cursor.
    pub async fn skip(&mut self) -> Result<(), MusicError> {
        if self.queue.upcoming()?.is_empty() {
            return Err(MusicError::NoMoreTracks);
        }
        self.backend.stop().await
    }

    /// Go back one track. The cursor is rewound by two so that the forced
    /// advance from the stop lands exactly one track back.
    pub async fn previous(&mut self) -> Result<(), MusicError> {
        if self.queue.history()?.is_empty() {
            return Err(MusicError::NoPreviousTracks);
        }
        self.queue.set_position(self.queue.position() - 2);
        self.backend.stop().await
    }

    /// Jump to the given 1-based queue index. The cursor is parked two
    /// below the target to compensate for the forced advance.
    pub async fn skip_to(&mut self, index: usize) -> Result<(), MusicError> {
        if self.queue.is_empty() {
            return Err(MusicError::QueueEmpty);
        }
        if index > self.queue.len() {
            return Err(MusicError::NoMoreTracks);
        }
        self.queue.set_position(index as isize - 2);
        self.backend.stop().await
    }

    /// Seek within the current track to a user-supplied time string.
    pub async fn seek(&mut self, position: &str) -> Result<Duration, MusicError> {
        if self.queue.is_empty() {
            return Err(MusicError::QueueEmpty);
        }
        let target = parse_seek_time(position)?;
        self.backend.seek(target).await?;
        Ok(target)
    }

    /// Restart the current track from the beginning.
    pub async fn replay(&mut self) -> Result<(), MusicError> {
        if self.queue.is_empty() {
            return Err(MusicError::QueueEmpty);
        }
        self.backend.seek(Duration::ZERO).await
    }

    /// Set an absolute volume in percent.
    pub async fn set_volume(&mut self, volume: i64) -> Result<u16, MusicError> {
        if volume < 0 {
            return Err(MusicError::VolumeTooLow);
        }
        if volume > i64::from(MAX_VOLUME) {
            return Err(MusicError::VolumeTooHigh);
        }
        self.apply_volume(volume as u16).await
    }

    /// Raise the volume by one step. Already being at the ceiling is
    /// reported, not silently clamped.
    pub async fn volume_up(&mut self) -> Result<u16, MusicError> {
        if self.volume == MAX_VOLUME {
            return Err(MusicError::MaxVolume);
        }
        self.apply_volume((self.volume + VOLUME_STEP).min(MAX_VOLUME))
            .await
    }

    /// Lower the volume by one step. Already being at the floor is
    /// reported, not silently clamped.
    pub async fn volume_down(&mut self) -> Result<u16, MusicError> {
        if self.volume == 0 {
            return Err(MusicError::MinVolume);
        }
        self.apply_volume(self.volume.saturating_sub(VOLUME_STEP))
            .await
    }

    /// The current track together with the backend's position readout.
    pub async fn now_playing(&self) -> Result<(TrackMetadata, Duration), MusicError> {
        if !self.playing {
            return Err(MusicError::AlreadyPaused);
        }
        let track = self
            .queue
            .current_track()?
            .cloned()
            .ok_or(MusicError::QueueEmpty)?;
        let position = self.backend.position().await?;
        Ok((track, position))
    }

    async fn apply_volume(&mut self, volume: u16) -> Result<u16, MusicError> {
        self.backend.set_volume(volume).await?;
        self.volume = volume;
        Ok(volume)
    }

    async fn play_now(&mut self, track: &TrackMetadata) -> Result<(), MusicError> {
        self.backend.play(track).await?;
        self.playing = true;
        self.paused = false;
        info!("now playing '{}' in guild {}", track.title, self.guild_id);
        Ok(())
    }
}
