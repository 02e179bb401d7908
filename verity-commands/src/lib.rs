pub mod verification;

use tracing::info;
use twilight_http::Client;
use twilight_model::{
    application::{command::Command, interaction::InteractionData},
    gateway::payload::incoming::InteractionCreate,
    id::{Id, marker::ApplicationMarker},
};

use verity_core::Context;

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub definition: fn() -> anyhow::Result<Command>,
}

pub const COMMANDS: &[CommandMeta] = &[
    verification::check_verifications::META,
    // Add new commands here
];

/// Build the schema of every slash command the bot serves.
pub fn command_definitions() -> anyhow::Result<Vec<Command>> {
    COMMANDS.iter().map(|meta| (meta.definition)()).collect()
}

/// Overwrite the bot's global slash commands and return how many were synced.
pub async fn register_commands(
    http: &Client,
    application_id: Id<ApplicationMarker>,
) -> anyhow::Result<usize> {
    let commands = command_definitions()?;

    let synced = http
        .interaction(application_id)
        .set_global_commands(&commands)
        .await?
        .model()
        .await?;

    Ok(synced.len())
}

pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let Some(InteractionData::ApplicationCommand(data)) = interaction.data.as_ref() else {
        return Ok(());
    };

    info!(
        command = %data.name,
        guild_id = ?interaction.guild_id.map(Id::get),
        user_id = ?interaction.author_id().map(Id::get),
        "slash command received"
    );

    match data.name.as_str() {
        name if name == verification::check_verifications::META.name => {
            verification::check_verifications::run(ctx.clone(), &interaction, data).await?
        }
        // Add new commands here
        _ => {}
    }

    Ok(())
}
