//! Voice-infrastructure helpers, the typed error set, and the explicit
//! per-guild player registry.

use std::sync::Arc;

use dashmap::DashMap;
use poise::serenity_prelude as serenity;
use serenity::client::Context as SerenityContext;
use serenity::model::id::{ChannelId, GuildId};
use songbird::Songbird;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error};

use super::backend::{AudioBackend, PlayerEvent, SongbirdBackend};
use super::player::Player;
use super::queue::RepeatMode;
use crate::Context;

/// Errors that can occur during music operations. Every precondition
/// violation in the player and queue maps to one of these, so the command
/// layer can pattern-match and render user feedback.
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("The queue is empty")]
    QueueEmpty,

    #[error("No tracks found for that query")]
    NoTracksFound,

    #[error("Already connected to a voice channel")]
    AlreadyConnected,

    #[error("No voice channel to connect to")]
    NoVoiceChannel,

    #[error("The player is already in that state")]
    AlreadyPaused,

    #[error("No more tracks in the queue")]
    NoMoreTracks,

    #[error("No previous tracks in the queue")]
    NoPreviousTracks,

    #[error("The volume must not be below 0%")]
    VolumeTooLow,

    #[error("The volume must not exceed 150%")]
    VolumeTooHigh,

    #[error("The volume is already at the maximum")]
    MaxVolume,

    #[error("The volume is already at the minimum")]
    MinVolume,

    #[error("Unrecognised time, use minutes:seconds or plain seconds")]
    InvalidTimeString,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("Audio source error: {0}")]
    AudioSourceError(String),

    #[error("Playback control failed: {0}")]
    ControlError(String),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// The player variant used by the live bot.
pub type GuildPlayer = Player<SongbirdBackend>;

/// Voice-infrastructure helpers shared by the command handlers.
pub struct MusicManager;

impl MusicManager {
    /// Get the Songbird voice client from the context
    pub async fn get_songbird(ctx: &SerenityContext) -> MusicResult<Arc<Songbird>> {
        songbird::get(ctx).await.ok_or(MusicError::NoVoiceManager)
    }

    /// Get the voice channel ID that the user is currently in
    pub fn get_user_voice_channel(
        ctx: &SerenityContext,
        guild_id: GuildId,
        user_id: serenity::UserId,
    ) -> MusicResult<ChannelId> {
        let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;

        let voice_state = guild
            .voice_states
            .get(&user_id)
            .ok_or(MusicError::UserNotInVoiceChannel)?;

        voice_state
            .channel_id
            .ok_or(MusicError::UserNotInVoiceChannel)
    }

    /// Fetch (or lazily create) the player for the invoking guild.
    pub async fn player_for(ctx: &Context<'_>) -> MusicResult<Arc<Mutex<GuildPlayer>>> {
        let guild_id = ctx.guild_id().ok_or(MusicError::NotInGuild)?;
        let songbird = Self::get_songbird(ctx.serenity_context()).await?;
        let data = ctx.data();

        Ok(data.players.get_or_create(guild_id, || {
            SongbirdBackend::new(songbird, guild_id, data.events.clone())
        }))
    }
}

/// Explicit per-guild player map, owned by the bot's shared data and
/// injected into command handlers. Also routes backend track events to the
/// owning player.
pub struct PlayerRegistry<B: AudioBackend> {
    players: DashMap<GuildId, Arc<Mutex<Player<B>>>>,
}

impl<B: AudioBackend> PlayerRegistry<B> {
    pub fn new() -> Self {
        Self {
            players: DashMap::new(),
        }
    }

    pub fn get(&self, guild_id: GuildId) -> Option<Arc<Mutex<Player<B>>>> {
        self.players.get(&guild_id).map(|entry| entry.clone())
    }

    pub fn get_or_create(
        &self,
        guild_id: GuildId,
        make: impl FnOnce() -> B,
    ) -> Arc<Mutex<Player<B>>> {
        self.players
            .entry(guild_id)
            .or_insert_with(|| Arc::new(Mutex::new(Player::new(guild_id, make()))))
            .clone()
    }

    /// Drop a guild's player. Called on teardown so entries never leak.
    pub fn remove(&self, guild_id: GuildId) -> Option<Arc<Mutex<Player<B>>>> {
        self.players.remove(&guild_id).map(|(_, player)| player)
    }

    /// Route a terminal track event to its player. All event kinds drive
    /// the same policy: replay when the queue repeats the song, advance
    /// otherwise.
    pub async fn dispatch(&self, guild_id: GuildId, event: PlayerEvent) {
        let Some(player) = self.get(guild_id) else {
            debug!("dropping {:?} for guild {} without a player", event, guild_id);
            return;
        };

        let mut player = player.lock().await;
        let result = if player.queue().repeat_mode() == RepeatMode::Song {
            player.repeat_track().await
        } else {
            player.advance().await
        };

        if let Err(e) = result {
            error!("failed to handle {:?} for guild {}: {}", event, guild_id, e);
        }
    }
}

impl<B: AudioBackend> Default for PlayerRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}
