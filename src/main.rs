use ::serenity::all::ClientBuilder;
use dotenv::dotenv;
use poise::serenity_prelude as serenity;
use std::env;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cadence::commands::music::{
    join::*, leave::*, now_playing::*, pause::*, play::*, previous::*, queue::*, repeat::*,
    replay::*, resume::*, seek::*, shuffle::*, skip::*, skip_to::*, stop::*, stream::*, volume::*,
};
use cadence::commands::music::utils::event_handlers;
use cadence::commands::music::utils::music_manager::PlayerRegistry;
use cadence::{CommandResult, Context, Data, Error, events};

#[poise::command(slash_command, category = "General")]
async fn help(
    ctx: Context<'_>,
    #[description = "Specific command to show help about"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    command: Option<String>,
) -> CommandResult {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            show_context_menu_commands: true,
            ..Default::default()
        },
    )
    .await
    .map_err(|e| e.into())
}

#[poise::command(prefix_command, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), Error> {
    poise::builtins::register_application_commands_buttons(ctx)
        .await
        .map_err(|e| e.into())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize logging with debug level for our crate
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cadence=debug,warn")),
        )
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true)
        .with_ansi(true)
        .pretty()
        .init();

    dotenv().ok();

    let token = env::var("DISCORD_TOKEN").expect("Missing DISCORD_TOKEN");

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::GUILD_VOICE_STATES;

    let commands = vec![
        // Default commands
        register(),
        help(),
        // Session commands
        join(),
        leave(),
        // Queueing commands
        play(),
        stream(),
        queue(),
        now_playing(),
        // Playback commands
        pause(),
        resume(),
        stop(),
        skip(),
        previous(),
        skip_to(),
        shuffle(),
        repeat(),
        seek(),
        replay(),
        volume(),
    ];

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands,
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::handle_event(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                // The registry and the event channel outlive every command;
                // one router task drains track events into the players.
                let players = Arc::new(PlayerRegistry::new());
                let (events_tx, events_rx) = mpsc::unbounded_channel();
                event_handlers::spawn_event_router(players.clone(), events_rx);

                Ok(Data {
                    players,
                    events: events_tx,
                })
            })
        });

    let client_builder = ClientBuilder::new(token, intents).framework(framework.build());

    build_and_start_client(client_builder).await
}

async fn build_and_start_client(client_builder: ClientBuilder) -> Result<(), Error> {
    use songbird::SerenityInit;

    let mut client = client_builder.register_songbird().await?;
    client.start().await.map_err(Into::into)
}
