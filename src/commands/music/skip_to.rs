use super::*;
use crate::commands::music::utils::{
    embedded_messages,
    music_manager::{MusicError, MusicManager},
};

/// Jump to a queue position and play it
#[poise::command(slash_command, rename = "skipto", category = "Music")]
pub async fn skip_to(
    ctx: Context<'_>,
    #[description = "Queue position to jump to (1-based)"] index: i64,
) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let Ok(index) = usize::try_from(index) else {
        ctx.send(embedded_messages::music_error(&MusicError::NoMoreTracks))
            .await?;
        return Ok(());
    };

    let result = { player.lock().await.skip_to(index).await };
    match result {
        Ok(()) => ctx.send(embedded_messages::skipped_to(index)).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
