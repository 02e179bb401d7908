use std::{collections::HashMap, sync::OnceLock};

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use verity_core::{
    AuditError,
    config::DEFAULT_HISTORY_PAGE_SIZE,
    model::{Author, HistoryMessage},
    source::MessageSource,
};

/// Replacement for every inline user mention.
pub const MENTION_PLACEHOLDER: &str = "@user";
/// Appended once per embed carried by a message.
pub const EMBED_OMITTED_MARKER: &str = "\n[Embed content omitted]";

fn mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<@!?(\d+)>").expect("mention pattern is valid"))
}

#[derive(Clone, Debug)]
pub struct ScanOptions {
    /// Messages strictly newer than this are skipped.
    pub before: Option<DateTime<Utc>>,
    /// The first message strictly older than this ends the scan.
    pub after: Option<DateTime<Utc>>,
    pub author_id: Option<u64>,
    pub page_size: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            before: None,
            after: None,
            author_id: None,
            page_size: DEFAULT_HISTORY_PAGE_SIZE,
        }
    }
}

/// Cleaned message bodies of one author, in the order they were discovered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthorRecord {
    pub author: Author,
    pub messages: Vec<String>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanStop {
    /// The source returned an empty page.
    Exhausted,
    /// A message older than the lower boundary was reached.
    LowerBoundary,
}

/// Pagination state, only mutated while a page is being processed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScanState {
    /// Id of the last examined message; the next page is fetched before it.
    pub cursor: Option<u64>,
    pub last_timestamp_seen: Option<DateTime<Utc>>,
    pub pages: usize,
}

impl ScanState {
    fn observe(&mut self, message: &HistoryMessage) {
        self.cursor = Some(message.id);
        self.last_timestamp_seen = Some(message.created_at);
    }

    /// Whether the last examined message lies before the lower boundary.
    ///
    /// False when nothing has been examined yet.
    pub fn crossed_lower_boundary(&self, after: Option<DateTime<Utc>>) -> bool {
        matches!(
            (self.last_timestamp_seen, after),
            (Some(seen), Some(after)) if seen < after
        )
    }
}

#[derive(Clone, Debug)]
pub struct ScanOutcome {
    pub records: Vec<AuthorRecord>,
    pub stop: ScanStop,
    pub state: ScanState,
}

#[derive(Default)]
struct AuthorIndex {
    records: Vec<AuthorRecord>,
    positions: HashMap<u64, usize>,
}

impl AuthorIndex {
    fn append(&mut self, author: &Author, body: String) {
        let position = match self.positions.get(&author.id) {
            Some(&position) => position,
            None => {
                self.records.push(AuthorRecord {
                    author: author.clone(),
                    messages: Vec::new(),
                });
                let position = self.records.len() - 1;
                self.positions.insert(author.id, position);
                position
            }
        };

        self.records[position].messages.push(body);
    }
}

/// Walk a channel history backwards page by page and group cleaned bodies per author.
///
/// Pages are fetched one at a time. A failed fetch aborts the whole scan and
/// discards everything gathered so far.
pub async fn scan<S>(source: &S, options: &ScanOptions) -> Result<ScanOutcome, AuditError>
where
    S: MessageSource + ?Sized,
{
    let mut state = ScanState::default();
    let mut authors = AuthorIndex::default();

    let stop = loop {
        let page = source
            .history(options.page_size, state.cursor)
            .await
            .map_err(AuditError::SourceUnavailable)?;

        if page.is_empty() {
            break ScanStop::Exhausted;
        }

        state.pages += 1;
        process_page(&page, options, &mut state, &mut authors);

        if state.crossed_lower_boundary(options.after) {
            break ScanStop::LowerBoundary;
        }
    };

    debug!(
        pages = state.pages,
        authors = authors.records.len(),
        ?stop,
        "history scan finished"
    );

    Ok(ScanOutcome {
        records: authors.records,
        stop,
        state,
    })
}

fn process_page(
    page: &[HistoryMessage],
    options: &ScanOptions,
    state: &mut ScanState,
    authors: &mut AuthorIndex,
) {
    for message in page {
        state.observe(message);

        // Pages arrive newest first, so nothing after this point can be newer.
        if options
            .after
            .is_some_and(|after| message.created_at < after)
        {
            return;
        }

        let Some(author) = message.author.as_ref() else {
            continue;
        };

        if options.author_id.is_some_and(|wanted| author.id != wanted) {
            continue;
        }

        if options
            .before
            .is_some_and(|before| message.created_at > before)
        {
            continue;
        }

        authors.append(author, normalize_body(message));
    }
}

/// Replace mentions with a placeholder and mark omitted embeds.
pub fn normalize_body(message: &HistoryMessage) -> String {
    let mut body = mention_pattern()
        .replace_all(&message.content, MENTION_PLACEHOLDER)
        .into_owned();

    for _ in 0..message.embed_count {
        body.push_str(EMBED_OMITTED_MARKER);
    }

    body
}
