use super::*;
use crate::commands::music::utils::{embedded_messages, music_manager::MusicManager};

/// Loop the current song, the whole queue, or stop looping
#[poise::command(slash_command, category = "Music")]
pub async fn repeat(
    ctx: Context<'_>,
    #[description = "stop, song or queue"] mode: String,
) -> CommandResult {
    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    // The queue itself silently ignores unknown names; user input is
    // validated here at the command boundary.
    if !matches!(mode.as_str(), "stop" | "song" | "queue") {
        ctx.send(embedded_messages::invalid_repeat_mode()).await?;
        return Ok(());
    }

    player.lock().await.queue_mut().set_repeat_mode(&mode);
    ctx.send(embedded_messages::repeat_mode_set(&mode)).await?;

    Ok(())
}
