use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicManager};

/// Restart the current song from the beginning
#[poise::command(slash_command, category = "Music")]
pub async fn replay(ctx: Context<'_>) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let result = { player.lock().await.replay().await };
    match result {
        Ok(()) => ctx.send(embedded_messages::replaying()).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
