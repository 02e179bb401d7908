//! History scan, date-consistency analysis and report chunking for
//! verification audits.

/// Per-author date extraction and consistency verdicts.
pub mod analyzer;
/// Line-preserving report splitting.
pub mod chunker;
/// Report text rendering.
pub mod report;
/// Paginated backwards history walk.
pub mod scanner;

#[cfg(test)]
mod testing;

use tracing::info;

use verity_core::{AuditError, source::MessageSource};

pub use analyzer::{AnalysisResult, analyze};
pub use chunker::chunk_report;
pub use report::{empty_result_message, render_report};
pub use scanner::{AuthorRecord, ScanOptions, ScanOutcome, ScanState, ScanStop, scan};

/// What a finished audit should send back.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AuditReport {
    /// Report text split into deliverable messages.
    Chunks(Vec<String>),
    /// Nothing matched; carries the informational wording.
    Empty(&'static str),
}

/// Run the full scan → analyze → render → chunk pipeline over one channel.
pub async fn run_audit<S>(
    source: &S,
    options: &ScanOptions,
    only_inconsistent: bool,
    chunk_length: usize,
) -> Result<AuditReport, AuditError>
where
    S: MessageSource + ?Sized,
{
    let outcome = scan(source, options).await?;
    let results = analyze(&outcome.records, only_inconsistent);

    info!(
        pages = outcome.state.pages,
        authors = outcome.records.len(),
        reported = results.len(),
        stop = ?outcome.stop,
        "verification audit complete"
    );

    if results.is_empty() {
        return Ok(AuditReport::Empty(empty_result_message(only_inconsistent)));
    }

    let report = render_report(&results);
    Ok(AuditReport::Chunks(chunk_report(&report, chunk_length)))
}
