use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicManager};

/// Play the previous song in the queue
#[poise::command(slash_command, category = "Music")]
pub async fn previous(ctx: Context<'_>) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let result = { player.lock().await.previous().await };
    match result {
        Ok(()) => ctx.send(embedded_messages::previous_track()).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
