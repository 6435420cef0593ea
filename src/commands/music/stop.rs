use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicManager};

/// Stop the song and rewind the queue to the start
#[poise::command(slash_command, category = "Music")]
pub async fn stop(ctx: Context<'_>) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let result = { player.lock().await.stop().await };
    match result {
        Ok(()) => ctx.send(embedded_messages::stopped()).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
