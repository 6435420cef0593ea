//! Routing of terminal track events. Songbird reports them per track
//! handle; a notifier forwards each one, tagged with its guild, into a
//! channel that a single router task drains into the player registry.

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use serenity::async_trait;
use serenity::model::id::GuildId;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::backend::{PlayerEvent, PlayerEventReceiver, PlayerEventSender, SongbirdBackend};
use super::music_manager::PlayerRegistry;

/// Attached to every played track, once per terminal event kind.
pub struct TrackEventNotifier {
    guild_id: GuildId,
    kind: PlayerEvent,
    events: PlayerEventSender,
}

impl TrackEventNotifier {
    pub fn new(guild_id: GuildId, kind: PlayerEvent, events: PlayerEventSender) -> Self {
        Self {
            guild_id,
            kind,
            events,
        }
    }
}

#[async_trait]
impl songbird::EventHandler for TrackEventNotifier {
    async fn act(&self, ctx: &songbird::EventContext<'_>) -> Option<songbird::Event> {
        if let songbird::EventContext::Track(_) = ctx {
            debug!("{:?} for guild {}", self.kind, self.guild_id);
            if self.events.send((self.guild_id, self.kind)).is_err() {
                warn!(
                    "event router is gone, dropping {:?} for guild {}",
                    self.kind, self.guild_id
                );
            }
        }
        None
    }
}

/// Spawn the task that feeds backend track events into the registry.
pub fn spawn_event_router(
    registry: Arc<PlayerRegistry<SongbirdBackend>>,
    mut events: PlayerEventReceiver,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some((guild_id, event)) = events.recv().await {
            registry.dispatch(guild_id, event).await;
        }
        debug!("player event channel closed, router exiting");
    })
}
