use async_trait::async_trait;

use crate::error::SourceError;
use crate::model::HistoryMessage;

/// Reverse-chronological message history of a single channel.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch up to `limit` messages strictly older than `before` (or the newest
    /// messages when `before` is `None`), newest first.
    ///
    /// An empty page means the history is exhausted.
    async fn history(
        &self,
        limit: usize,
        before: Option<u64>,
    ) -> Result<Vec<HistoryMessage>, SourceError>;
}

/// Resolves a channel of the invoking guild by its name.
#[async_trait]
pub trait ChannelLookup: Send + Sync {
    type Source: MessageSource;

    async fn find_by_name(&self, name: &str) -> Result<Option<Self::Source>, SourceError>;
}

/// Delivery side of a deferred command invocation.
#[async_trait]
pub trait ResponseSink: Send + Sync {
    /// Acknowledge the invocation so follow-ups can be sent later.
    async fn defer(&self) -> anyhow::Result<()>;

    async fn followup(&self, content: &str) -> anyhow::Result<()>;
}
