use super::*;
use crate::commands::music::utils::{
    embedded_messages,
    music_manager::{MusicError, MusicManager},
};
use poise::serenity_prelude as serenity;

/// Join a voice channel
#[poise::command(slash_command, category = "Music")]
pub async fn join(
    ctx: Context<'_>,
    #[description = "Voice channel to join (defaults to yours)"]
    #[channel_types("Voice")]
    channel: Option<serenity::GuildChannel>,
) -> CommandResult {
    let guild_id = ctx.guild_id().ok_or_else(|| {
        Box::new(MusicError::NotInGuild) as Box<dyn std::error::Error + Send + Sync>
    })?;

    let player = match MusicManager::player_for(&ctx).await {
        Ok(player) => player,
        Err(err) => {
            ctx.send(embedded_messages::music_error(&err)).await?;
            return Ok(());
        }
    };

    // An explicit channel argument wins over the invoker's current one.
    let channel = channel.map(|channel| channel.id).or_else(|| {
        MusicManager::get_user_voice_channel(ctx.serenity_context(), guild_id, ctx.author().id)
            .ok()
    });

    let result = { player.lock().await.connect(channel).await };
    match result {
        Ok(channel) => ctx.send(embedded_messages::joined(channel)).await?,
        Err(err) => ctx.send(embedded_messages::music_error(&err)).await?,
    };

    Ok(())
}
