use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use tracing::{debug, warn};
use twilight_http::Client;
use twilight_model::{
    channel::{Channel, ChannelType, Message},
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker, MessageMarker},
    },
};

use verity_core::{
    error::SourceError,
    model::{Author, HistoryMessage},
    source::{ChannelLookup, MessageSource},
};

/// Largest page the channel messages endpoint serves per request.
pub const MAX_MESSAGES_PER_REQUEST: usize = 100;

const DELETED_USER_NAME: &str = "Deleted User";
const DELETED_USER_PREFIX: &str = "deleted_user_";

/// Message history of one guild channel, read through the HTTP API.
#[derive(Clone)]
pub struct ChannelHistory {
    http: Arc<Client>,
    channel_id: Id<ChannelMarker>,
}

impl ChannelHistory {
    pub fn new(http: Arc<Client>, channel_id: Id<ChannelMarker>) -> Self {
        Self { http, channel_id }
    }

    async fn fetch_batch(
        &self,
        limit: u16,
        before: Option<Id<MessageMarker>>,
    ) -> Result<Vec<Message>, SourceError> {
        let response = match before {
            Some(before_id) => {
                self.http
                    .channel_messages(self.channel_id)
                    .before(before_id)
                    .limit(limit)
                    .await?
            }
            None => {
                self.http
                    .channel_messages(self.channel_id)
                    .limit(limit)
                    .await?
            }
        };

        Ok(response.model().await?)
    }
}

#[async_trait]
impl MessageSource for ChannelHistory {
    async fn history(
        &self,
        limit: usize,
        before: Option<u64>,
    ) -> Result<Vec<HistoryMessage>, SourceError> {
        let batches = collect_page(
            limit,
            before,
            |count, cursor| self.fetch_batch(count as u16, cursor.and_then(Id::new_checked)),
            |message: &Message| message.id.get(),
        )
        .await?;

        let page: Vec<HistoryMessage> = batches.iter().filter_map(history_message).collect();

        debug!(
            channel_id = self.channel_id.get(),
            fetched = page.len(),
            "history page fetched"
        );

        Ok(page)
    }
}

/// Assemble one logical page of up to `limit` items out of as many sequential
/// batch requests as the per-request cap requires.
///
/// Each batch is requested strictly before the last item of the previous one.
/// A batch shorter than requested means the history ended.
pub async fn collect_page<T, F, Fut>(
    limit: usize,
    before: Option<u64>,
    mut fetch: F,
    id_of: impl Fn(&T) -> u64,
) -> Result<Vec<T>, SourceError>
where
    F: FnMut(usize, Option<u64>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, SourceError>>,
{
    let mut page = Vec::with_capacity(limit.min(MAX_MESSAGES_PER_REQUEST));
    let mut cursor = before;

    while page.len() < limit {
        let requested = (limit - page.len()).min(MAX_MESSAGES_PER_REQUEST);
        let batch = fetch(requested, cursor).await?;
        let batch_len = batch.len();

        if let Some(last) = batch.last() {
            cursor = Some(id_of(last));
        }
        page.extend(batch);

        if batch_len < requested {
            break;
        }
    }

    Ok(page)
}

/// Convert a platform message, dropping author identities that no longer resolve.
///
/// Returns `None` only when the timestamp is out of range.
pub fn history_message(message: &Message) -> Option<HistoryMessage> {
    let Some(created_at) = DateTime::from_timestamp_micros(message.timestamp.as_micros()) else {
        warn!(
            message_id = message.id.get(),
            "message timestamp out of range"
        );
        return None;
    };

    let author = (!is_deleted_user_name(&message.author.name)).then(|| Author {
        id: message.author.id.get(),
        name: message.author.name.clone(),
    });

    Some(HistoryMessage {
        id: message.id.get(),
        author,
        created_at,
        content: message.content.clone(),
        embed_count: message.embeds.len(),
    })
}

/// Whether a username marks an account that was deleted.
pub fn is_deleted_user_name(name: &str) -> bool {
    name.is_empty() || name == DELETED_USER_NAME || name.starts_with(DELETED_USER_PREFIX)
}

/// Channels of the guild an interaction was invoked in.
#[derive(Clone)]
pub struct GuildChannels {
    http: Arc<Client>,
    guild_id: Id<GuildMarker>,
}

impl GuildChannels {
    pub fn new(http: Arc<Client>, guild_id: Id<GuildMarker>) -> Self {
        Self { http, guild_id }
    }
}

/// Whether a channel carries readable message history.
pub fn has_message_history(channel: &Channel) -> bool {
    matches!(
        channel.kind,
        ChannelType::GuildText
            | ChannelType::GuildAnnouncement
            | ChannelType::GuildVoice
            | ChannelType::PublicThread
            | ChannelType::PrivateThread
    )
}

#[async_trait]
impl ChannelLookup for GuildChannels {
    type Source = ChannelHistory;

    async fn find_by_name(&self, name: &str) -> Result<Option<ChannelHistory>, SourceError> {
        let channels = self
            .http
            .guild_channels(self.guild_id)
            .await?
            .model()
            .await?;

        Ok(channels
            .into_iter()
            .filter(has_message_history)
            .find(|channel| channel.name.as_deref() == Some(name))
            .map(|channel| ChannelHistory::new(Arc::clone(&self.http), channel.id)))
    }
}
