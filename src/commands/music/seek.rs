use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicManager};

/// Seek to a point in the current song
#[poise::command(slash_command, category = "Music")]
pub async fn seek(
    ctx: Context<'_>,
    #[description = "Target time, like 1:30, 90 or 90s"] position: String,
) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let result = { player.lock().await.seek(&position).await };
    match result {
        Ok(target) => ctx.send(embedded_messages::seeked(target)).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
