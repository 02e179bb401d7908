//! In-memory history source shared by the pipeline tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use verity_core::{
    error::SourceError,
    model::{Author, HistoryMessage},
    source::MessageSource,
};

pub fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn author(id: u64, name: &str) -> Author {
    Author {
        id,
        name: name.to_owned(),
    }
}

pub fn message(
    id: u64,
    author: Option<Author>,
    created_at: DateTime<Utc>,
    content: &str,
) -> HistoryMessage {
    HistoryMessage {
        id,
        author,
        created_at,
        content: content.to_owned(),
        embed_count: 0,
    }
}

/// Serves a fixed newest-first history and records every cursor it was asked for.
pub struct PagedSource {
    messages: Vec<HistoryMessage>,
    requests: Mutex<Vec<Option<u64>>>,
    fail_after: Option<usize>,
}

impl PagedSource {
    pub fn new(messages: Vec<HistoryMessage>) -> Self {
        Self {
            messages,
            requests: Mutex::new(Vec::new()),
            fail_after: None,
        }
    }

    /// Fail every request after the first `successes` ones.
    pub fn failing_after(mut self, successes: usize) -> Self {
        self.fail_after = Some(successes);
        self
    }

    pub fn requests(&self) -> Vec<Option<u64>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSource for PagedSource {
    async fn history(
        &self,
        limit: usize,
        before: Option<u64>,
    ) -> Result<Vec<HistoryMessage>, SourceError> {
        let served = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(before);
            requests.len() - 1
        };

        if self.fail_after.is_some_and(|successes| served >= successes) {
            return Err("history endpoint unavailable".into());
        }

        let start = match before {
            Some(id) => self
                .messages
                .iter()
                .position(|message| message.id == id)
                .map_or(self.messages.len(), |position| position + 1),
            None => 0,
        };

        Ok(self.messages.iter().skip(start).take(limit).cloned().collect())
    }
}
