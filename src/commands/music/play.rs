use super::*;
use crate::commands::music::audio_sources::AudioSource;
use crate::commands::music::utils::{
    embedded_messages,
    music_manager::{MusicError, MusicManager},
    player::AddOutcome,
    track_picker::SelectMenuPicker,
};
use tracing::info;

/// Play a song from YouTube: a URL, a playlist, or a search query
#[poise::command(slash_command, category = "Music")]
pub async fn play(
    ctx: Context<'_>,
    #[description = "URL or search query"] query: Option<String>,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;
    info!("Received play command with query: {:?}", query);

    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    // Audio resolution might take a while.
    ctx.defer().await?;

    // Join the invoker's channel when not yet connected.
    {
        let mut player = player.lock().await;
        if !player.is_connected() {
            let channel = MusicManager::get_user_voice_channel(
                ctx.serenity_context(),
                guild_id,
                ctx.author().id,
            )
            .ok();
            if let Err(err) = player.connect(channel).await {
                ctx.send(embedded_messages::music_error(&err)).await?;
                return Ok(());
            }
        }
    }

    // A bare /play only complains when there is nothing queued at all.
    let Some(query) = query else {
        let queue_empty = player.lock().await.queue().is_empty();
        if queue_empty {
            ctx.send(embedded_messages::music_error(&MusicError::QueueEmpty))
                .await?;
        }
        return Ok(());
    };

    let resolution = match AudioSource::resolve(&query, ctx.author().name.clone()).await {
        Ok(resolution) => resolution,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    let picker = SelectMenuPicker { ctx };
    let outcome = { player.lock().await.add_tracks(resolution, &picker).await };

    match outcome {
        Ok(AddOutcome::Single(track)) => {
            ctx.send(embedded_messages::added_to_queue(&track)).await?;
        }
        Ok(AddOutcome::Playlist(count)) => {
            ctx.send(embedded_messages::playlist_added(count)).await?;
        }
        // The picker already edited its prompt into a timeout notice.
        Ok(AddOutcome::Abandoned) => {}
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
        }
    }

    Ok(())
}
