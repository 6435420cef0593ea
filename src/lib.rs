//! Cadence is a Discord music bot built around a per-guild playback queue
//! and player state machine. Commands resolve text queries to streaming
//! tracks, and the songbird driver reports track endings back into the
//! players through a routing channel.

use std::sync::{Arc, LazyLock};

pub mod commands;
pub mod events;

use commands::music::utils::backend::{PlayerEventSender, SongbirdBackend};
use commands::music::utils::music_manager::PlayerRegistry;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type CommandResult = Result<(), Error>;

/// Process-wide HTTP client, shared by every audio input.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

// User data, which is stored and accessible in all command invocations
pub struct Data {
    /// Per-guild players, created lazily and removed on teardown.
    pub players: Arc<PlayerRegistry<SongbirdBackend>>,
    /// Where backends report terminal track events; handed to every
    /// backend this process creates.
    pub events: PlayerEventSender,
}
