use super::*;
use crate::commands::music::audio_sources::{AudioSource, Resolution};
use crate::commands::music::utils::{
    embedded_messages,
    music_manager::{MusicError, MusicManager},
};
use tracing::info;

/// Stream a song right away, preempting whatever is playing
#[poise::command(slash_command, category = "Music")]
pub async fn stream(
    ctx: Context<'_>,
    #[description = "URL or search query"] query: String,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    info!("Received stream command with query: {}", query);

    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    // Audio resolution can take a while.
    ctx.defer().await?;

    let resolution = match AudioSource::resolve(&query, ctx.author().name.clone()).await {
        Ok(resolution) => resolution,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    // Streaming always takes the first hit, playlist or not.
    let track = match resolution {
        Resolution::Playlist(tracks) | Resolution::Tracks(tracks) => tracks.into_iter().next(),
    };
    let Some(track) = track else {
        ctx.send(embedded_messages::music_error(&MusicError::NoTracksFound))
            .await?;
        return Ok(());
    };

    let channel =
        MusicManager::get_user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id)
            .ok();

    let result = { player.lock().await.stream(channel, track.clone()).await };
    match result {
        Ok(()) => ctx.send(embedded_messages::now_streaming(&track)).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
