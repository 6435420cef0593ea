//! Gateway event handling outside of commands: the ready notice and the
//! voice-state watcher that tears players down once their channel empties
//! of human members.

use poise::serenity_prelude as serenity;
use serenity::model::voice::VoiceState;
use tracing::{error, info};

use crate::{Data, Error};

/// Dispatch the gateway events the bot cares about.
pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("{} is connected and ready", data_about_bot.user.name);
        }
        serenity::FullEvent::VoiceStateUpdate { old, new } => {
            handle_voice_state_update(ctx, data, old.as_ref(), new).await;
        }
        _ => {}
    }

    Ok(())
}

/// Tear the guild's player down once the channel it was serving has no
/// human members left.
async fn handle_voice_state_update(
    ctx: &serenity::Context,
    data: &Data,
    old: Option<&VoiceState>,
    new: &VoiceState,
) {
    // Only a non-bot user leaving (or switching) a channel matters.
    if new.member.as_ref().is_some_and(|member| member.user.bot) {
        return;
    }
    let Some(old) = old else { return };
    let (Some(guild_id), Some(channel_id)) = (old.guild_id, old.channel_id) else {
        return;
    };
    if new.channel_id == Some(channel_id) {
        return;
    }

    // The cache guard cannot be held across an await, so count first.
    let humans_left = {
        let Some(guild) = ctx.cache.guild(guild_id) else {
            return;
        };
        guild
            .voice_states
            .values()
            .filter(|state| state.channel_id == Some(channel_id))
            .filter(|state| state.member.as_ref().is_none_or(|member| !member.user.bot))
            .count()
    };
    if humans_left > 0 {
        return;
    }

    if let Some(player) = data.players.remove(guild_id) {
        info!(
            "voice channel {} emptied, tearing down player for guild {}",
            channel_id, guild_id
        );
        if let Err(e) = player.lock().await.teardown().await {
            error!("failed to tear down player for guild {}: {}", guild_id, e);
        }
    }
}
