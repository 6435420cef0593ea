use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicError};

/// Leave the voice channel
#[poise::command(slash_command, category = "Music")]
pub async fn leave(ctx: Context<'_>) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    // Tearing down a player that never existed is fine; the registry entry
    // goes away either way.
    if let Some(player) = ctx.data().players.remove(guild_id) {
        if let Err(err) = player.lock().await.teardown().await {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    }

    ctx.send(embedded_messages::left()).await?;
    Ok(())
}
