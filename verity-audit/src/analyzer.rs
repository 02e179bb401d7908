use std::sync::OnceLock;

use regex::Regex;

use verity_core::model::Author;

use crate::scanner::AuthorRecord;

/// Marker shown for authors whose dates all agree.
pub const CONSISTENT_MARKER: &str = "✅";
/// Marker shown for authors with conflicting dates.
pub const INCONSISTENT_MARKER: &str = "❌";

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\b(\d{1,4}[/-]\d{1,2}[/-]\d{1,4})\b").expect("date pattern is valid")
    })
}

/// Verdict for one author who posted at least two messages with dates in them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AnalysisResult {
    pub author: Author,
    pub message_count: usize,
    /// 1-indexed cleaned bodies, in record order.
    pub entries: Vec<(usize, String)>,
    pub consistent: bool,
}

impl AnalysisResult {
    pub fn status_marker(&self) -> &'static str {
        if self.consistent {
            CONSISTENT_MARKER
        } else {
            INCONSISTENT_MARKER
        }
    }
}

/// Every date-like token of `body`, left to right.
pub fn extract_dates(body: &str) -> impl Iterator<Item = &str> {
    date_pattern()
        .captures_iter(body)
        .filter_map(|captures| captures.get(1))
        .map(|found| found.as_str())
}

/// True when every token is textually identical to the first one.
pub fn dates_consistent<S: AsRef<str>>(dates: &[S]) -> bool {
    match dates.split_first() {
        Some((first, rest)) => rest.iter().all(|date| date.as_ref() == first.as_ref()),
        None => true,
    }
}

/// Classify each author record, keeping only the ones worth reporting.
pub fn analyze(records: &[AuthorRecord], only_inconsistent: bool) -> Vec<AnalysisResult> {
    records
        .iter()
        .filter_map(|record| analyze_record(record, only_inconsistent))
        .collect()
}

fn analyze_record(record: &AuthorRecord, only_inconsistent: bool) -> Option<AnalysisResult> {
    if record.messages.len() < 2 {
        return None;
    }

    let dates: Vec<&str> = record
        .messages
        .iter()
        .flat_map(|body| extract_dates(body))
        .collect();

    if dates.is_empty() {
        return None;
    }

    let consistent = dates_consistent(&dates);
    if only_inconsistent && consistent {
        return None;
    }

    Some(AnalysisResult {
        author: record.author.clone(),
        message_count: record.messages.len(),
        entries: record
            .messages
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, body)| (index + 1, body))
            .collect(),
        consistent,
    })
}
