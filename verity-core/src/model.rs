use chrono::{DateTime, Utc};

/// Identity of a message author that still resolves to a real account.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Author {
    pub id: u64,
    pub name: String,
}

/// A single fetched message, detached from the platform model.
#[derive(Clone, Debug)]
pub struct HistoryMessage {
    pub id: u64,
    /// `None` when the author account was deleted or has no usable name.
    pub author: Option<Author>,
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub embed_count: usize,
}
