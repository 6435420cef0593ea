//! The audio backend seam. The player drives playback exclusively through
//! the `AudioBackend` trait; the production implementation wraps songbird
//! and feeds terminal track events back through an mpsc channel.

use std::sync::Arc;
use std::time::Duration;

use serenity::async_trait;
use serenity::model::id::{ChannelId, GuildId};
use songbird::error::JoinError;
use songbird::input::YoutubeDl;
use songbird::tracks::TrackHandle;
use songbird::{Event, Songbird, TrackEvent};
use tokio::sync::mpsc;
use tracing::debug;

use super::event_handlers::TrackEventNotifier;
use super::music_manager::MusicError;
use crate::HTTP_CLIENT;
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;

/// Terminal track events reported by the audio backend. All three kinds
/// drive the same advancement path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    TrackEnded,
    TrackStuck,
    TrackErrored,
}

pub type PlayerEventSender = mpsc::UnboundedSender<(GuildId, PlayerEvent)>;
pub type PlayerEventReceiver = mpsc::UnboundedReceiver<(GuildId, PlayerEvent)>;

/// Playback primitives the player needs from an audio backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioBackend: Send + Sync {
    async fn connect(&mut self, channel: ChannelId) -> Result<(), MusicError>;

    /// Tear down the voice connection. Not being connected is not an error.
    async fn disconnect(&mut self) -> Result<(), MusicError>;

    async fn play(&mut self, track: &TrackMetadata) -> Result<(), MusicError>;

    async fn stop(&mut self) -> Result<(), MusicError>;

    async fn set_pause(&mut self, paused: bool) -> Result<(), MusicError>;

    async fn seek(&mut self, position: Duration) -> Result<(), MusicError>;

    /// Apply a volume in percent (0 to 150).
    async fn set_volume(&mut self, volume: u16) -> Result<(), MusicError>;

    /// Current play position of the active track.
    async fn position(&self) -> Result<Duration, MusicError>;
}

/// Songbird-backed implementation, one per guild player.
pub struct SongbirdBackend {
    songbird: Arc<Songbird>,
    guild_id: GuildId,
    events: PlayerEventSender,
    handle: Option<TrackHandle>,
    volume: u16,
}

impl SongbirdBackend {
    pub fn new(songbird: Arc<Songbird>, guild_id: GuildId, events: PlayerEventSender) -> Self {
        Self {
            songbird,
            guild_id,
            events,
            handle: None,
            volume: 100,
        }
    }

    fn active_handle(&self) -> Result<&TrackHandle, MusicError> {
        self.handle
            .as_ref()
            .ok_or_else(|| MusicError::ControlError("no active track".to_string()))
    }
}

#[async_trait]
impl AudioBackend for SongbirdBackend {
    async fn connect(&mut self, channel: ChannelId) -> Result<(), MusicError> {
        self.songbird
            .join(self.guild_id, channel)
            .await
            .map(|_| ())
            .map_err(|e| MusicError::JoinError(e.to_string()))
    }

    async fn disconnect(&mut self) -> Result<(), MusicError> {
        self.handle = None;
        match self.songbird.remove(self.guild_id).await {
            Ok(()) => Ok(()),
            // Removing a call that never existed keeps teardown idempotent.
            Err(JoinError::NoCall) => Ok(()),
            Err(e) => Err(MusicError::JoinError(e.to_string())),
        }
    }

    async fn play(&mut self, track: &TrackMetadata) -> Result<(), MusicError> {
        let url = track.url.clone().ok_or_else(|| {
            MusicError::AudioSourceError(format!("track '{}' has no playable URL", track.title))
        })?;
        let call = self
            .songbird
            .get(self.guild_id)
            .ok_or(MusicError::NotConnected)?;

        let input = YoutubeDl::new(HTTP_CLIENT.clone(), url);
        let handle = {
            let mut call = call.lock().await;
            call.play_input(input.into())
        };

        // Control errors on a brand-new handle only occur while the driver
        // is mid-teardown; the notifiers below handle the cleanup path.
        let _ = handle.set_volume(self.volume as f32 / 100.0);
        let _ = handle.add_event(
            Event::Track(TrackEvent::End),
            TrackEventNotifier::new(self.guild_id, PlayerEvent::TrackEnded, self.events.clone()),
        );
        let _ = handle.add_event(
            Event::Track(TrackEvent::Error),
            TrackEventNotifier::new(self.guild_id, PlayerEvent::TrackErrored, self.events.clone()),
        );

        debug!("playing '{}' in guild {}", track.title, self.guild_id);
        self.handle = Some(handle);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), MusicError> {
        if let Some(handle) = self.handle.take() {
            let _ = handle.stop();
        }
        Ok(())
    }

    async fn set_pause(&mut self, paused: bool) -> Result<(), MusicError> {
        let handle = self.active_handle()?;
        let result = if paused { handle.pause() } else { handle.play() };
        result.map_err(|e| MusicError::ControlError(e.to_string()))
    }

    async fn seek(&mut self, position: Duration) -> Result<(), MusicError> {
        let handle = self.active_handle()?;
        handle
            .seek_async(position)
            .await
            .map(|_| ())
            .map_err(|e| MusicError::ControlError(e.to_string()))
    }

    async fn set_volume(&mut self, volume: u16) -> Result<(), MusicError> {
        self.volume = volume;
        if let Some(handle) = &self.handle {
            let _ = handle.set_volume(volume as f32 / 100.0);
        }
        Ok(())
    }

    async fn position(&self) -> Result<Duration, MusicError> {
        let handle = self.active_handle()?;
        let info = handle
            .get_info()
            .await
            .map_err(|e| MusicError::ControlError(e.to_string()))?;
        Ok(info.position)
    }
}
