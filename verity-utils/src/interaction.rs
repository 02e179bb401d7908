use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    application::interaction::{
        Interaction,
        application_command::{CommandDataOption, CommandOptionValue},
    },
    channel::message::AllowedMentions,
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{
        Id,
        marker::{ApplicationMarker, InteractionMarker},
    },
};

use verity_core::source::ResponseSink;

/// Responds to one application-command interaction: a deferred
/// acknowledgement followed by any number of follow-up messages.
#[derive(Clone)]
pub struct InteractionResponder {
    http: Arc<Client>,
    application_id: Id<ApplicationMarker>,
    interaction_id: Id<InteractionMarker>,
    token: String,
}

impl InteractionResponder {
    pub fn new(http: Arc<Client>, interaction: &Interaction) -> Self {
        Self {
            http,
            application_id: interaction.application_id,
            interaction_id: interaction.id,
            token: interaction.token.clone(),
        }
    }
}

#[async_trait]
impl ResponseSink for InteractionResponder {
    async fn defer(&self) -> anyhow::Result<()> {
        let response = InteractionResponse {
            kind: InteractionResponseType::DeferredChannelMessageWithSource,
            data: None,
        };

        self.http
            .interaction(self.application_id)
            .create_response(self.interaction_id, &self.token, &response)
            .await?;

        Ok(())
    }

    /// Follow-ups never ping anyone, even when quoted message bodies contain
    /// `@everyone` or role mentions.
    async fn followup(&self, content: &str) -> anyhow::Result<()> {
        let no_pings = AllowedMentions::default();

        self.http
            .interaction(self.application_id)
            .create_followup(&self.token)
            .content(content)
            .allowed_mentions(Some(&no_pings))
            .await?;

        Ok(())
    }
}

/// Look up a string option by name.
pub fn string_option<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match &option.value {
            CommandOptionValue::String(value) => Some(value.as_str()),
            _ => None,
        })
}

/// Look up a boolean option by name.
pub fn bool_option(options: &[CommandDataOption], name: &str) -> Option<bool> {
    options
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match option.value {
            CommandOptionValue::Boolean(value) => Some(value),
            _ => None,
        })
}
