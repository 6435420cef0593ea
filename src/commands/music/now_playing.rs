use super::*;
use crate::commands::music::utils::{
    embedded_messages,
    music_manager::{MusicError, MusicManager},
};

/// Show the currently playing song
#[poise::command(slash_command, rename = "nowplaying", category = "Music")]
pub async fn now_playing(ctx: Context<'_>) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let result = { player.lock().await.now_playing().await };
    match result {
        Ok((track, position)) => {
            ctx.send(embedded_messages::now_playing(&track, position))
                .await?
        }
        Err(MusicError::AlreadyPaused) => ctx.send(embedded_messages::nothing_playing()).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
