use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicManager};

/// Skip to the next song in the queue
#[poise::command(slash_command, category = "Music")]
pub async fn skip(ctx: Context<'_>) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    // Stopping the track is enough; the track-end event advances the queue.
    let result = { player.lock().await.skip().await };
    match result {
        Ok(()) => ctx.send(embedded_messages::skipped()).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
