//! Bounded interactive track choice. The player only sees the capability
//! trait; the Discord implementation renders a select menu and waits on a
//! component interaction with a fixed timeout.

use std::time::Duration;

use poise::CreateReply;
use serenity::all::{
    ComponentInteractionCollector, ComponentInteractionDataKind, CreateActionRow, CreateEmbed,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption,
};
use serenity::async_trait;
use tracing::warn;

use super::format_duration;
use crate::Context;
use crate::commands::music::audio_sources::track_metadata::TrackMetadata;

/// Upper bound on the number of candidates offered for selection.
pub const MAX_CHOICES: usize = 5;

/// How long the prompt stays open before the choice is abandoned.
pub const CHOICE_TIMEOUT: Duration = Duration::from_secs(60);

/// Capability to let the invoking user pick one track out of a short
/// candidate list. Returns the chosen index, or `None` when the prompt
/// times out or fails; callers must leave the queue untouched in that case.
#[async_trait]
pub trait TrackPicker: Send + Sync {
    async fn pick(&self, candidates: &[TrackMetadata]) -> Option<usize>;
}

/// Discord implementation: a select menu answered by the invoking user only.
pub struct SelectMenuPicker<'a> {
    pub ctx: Context<'a>,
}

#[async_trait]
impl TrackPicker for SelectMenuPicker<'_> {
    async fn pick(&self, candidates: &[TrackMetadata]) -> Option<usize> {
        let ctx = self.ctx;

        let options: Vec<CreateSelectMenuOption> = candidates
            .iter()
            .enumerate()
            .map(|(i, track)| {
                let mut label = format!("{}. {}", i + 1, track.title);
                label.truncate(100);
                let description = match (&track.author, track.duration) {
                    (Some(author), Some(duration)) => {
                        format!("{} ({})", author, format_duration(duration))
                    }
                    (Some(author), None) => author.clone(),
                    (None, Some(duration)) => format_duration(duration),
                    (None, None) => "Unknown".to_string(),
                };
                CreateSelectMenuOption::new(label, i.to_string()).description(description)
            })
            .collect();

        let menu = CreateSelectMenu::new("track_pick", CreateSelectMenuKind::String { options })
            .placeholder("Pick a song from the list");

        let listing = candidates
            .iter()
            .enumerate()
            .map(|(i, track)| format!("**{}.** {}", i + 1, track.title))
            .collect::<Vec<_>>()
            .join("\n");

        let reply = ctx
            .send(
                CreateReply::default()
                    .embed(
                        CreateEmbed::new()
                            .title("Pick a song from the list!")
                            .description(listing)
                            .color(0x00ff00),
                    )
                    .components(vec![CreateActionRow::SelectMenu(menu)]),
            )
            .await
            .ok()?;
        let message = reply.message().await.ok()?;

        let interaction = ComponentInteractionCollector::new(ctx.serenity_context().shard.clone())
            .message_id(message.id)
            .author_id(ctx.author().id)
            .timeout(CHOICE_TIMEOUT)
            .await;

        match interaction {
            Some(interaction) => {
                let index = match &interaction.data.kind {
                    ComponentInteractionDataKind::StringSelect { values } => {
                        values.first().and_then(|v| v.parse::<usize>().ok())?
                    }
                    _ => return None,
                };

                let ack = interaction
                    .create_response(
                        ctx.http(),
                        CreateInteractionResponse::UpdateMessage(
                            CreateInteractionResponseMessage::new().components(Vec::new()),
                        ),
                    )
                    .await;
                if let Err(e) = ack {
                    warn!("failed to acknowledge track selection: {}", e);
                }

                Some(index)
            }
            None => {
                let timeout = CreateReply::default()
                    .embed(
                        CreateEmbed::new()
                            .description(
                                ":no_entry_sign: Timeout! You were too late to pick a song.",
                            )
                            .color(0xff0000),
                    )
                    .components(Vec::new());
                if let Err(e) = reply.edit(ctx, timeout).await {
                    warn!("failed to expire track selection prompt: {}", e);
                }
                None
            }
        }
    }
}
