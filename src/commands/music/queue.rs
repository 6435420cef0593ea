use super::*;
use crate::commands::music::utils::{
    embedded_messages,
    music_manager::{MusicError, MusicManager},
};

/// View the current music queue
#[poise::command(slash_command, category = "Music")]
pub async fn queue(
    ctx: Context<'_>,
    #[description = "How many upcoming tracks to show"] show: Option<u32>,
) -> CommandResult {
    let show = show.unwrap_or(10) as usize;

    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let reply = {
        let player = player.lock().await;
        match (player.queue().current_track(), player.queue().upcoming()) {
            (Ok(current), Ok(upcoming)) => embedded_messages::queue_view(current, upcoming, show),
            // Both accessors only fail on an empty queue.
            _ => embedded_messages::music_error(&MusicError::QueueEmpty),
        }
    };
    ctx.send(reply).await?;

    Ok(())
}
