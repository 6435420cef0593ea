use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicManager};

/// Adjust the playback volume
#[poise::command(slash_command, category = "Music", subcommands("set", "up", "down"))]
pub async fn volume(_ctx: Context<'_>) -> CommandResult {
    // Never called; Discord always invokes a subcommand.
    Ok(())
}

/// Set the volume to an exact percentage (0 to 150)
#[poise::command(slash_command)]
pub async fn set(
    ctx: Context<'_>,
    #[description = "Volume percentage"] level: i64,
) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let result = { player.lock().await.set_volume(level).await };
    match result {
        Ok(volume) => ctx.send(embedded_messages::volume_set(volume)).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}

/// Turn the volume up a notch
#[poise::command(slash_command)]
pub async fn up(ctx: Context<'_>) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let result = { player.lock().await.volume_up().await };
    match result {
        Ok(volume) => ctx.send(embedded_messages::volume_set(volume)).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}

/// Turn the volume down a notch
#[poise::command(slash_command)]
pub async fn down(ctx: Context<'_>) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let result = { player.lock().await.volume_down().await };
    match result {
        Ok(volume) => ctx.send(embedded_messages::volume_set(volume)).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
