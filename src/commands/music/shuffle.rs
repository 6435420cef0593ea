use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicManager};

/// Shuffle the upcoming tracks in the queue
#[poise::command(slash_command, category = "Music")]
pub async fn shuffle(ctx: Context<'_>) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let result = { player.lock().await.queue_mut().shuffle() };
    match result {
        Ok(()) => ctx.send(embedded_messages::shuffled()).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
