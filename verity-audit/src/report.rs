use std::fmt::Write as _;

use crate::analyzer::AnalysisResult;

pub const NO_INCONSISTENT_MESSAGE: &str = "No users with inconsistent date patterns found.";
pub const NO_RESULTS_MESSAGE: &str = "No users with 2 or more messages containing date patterns found within the specified date range.";

/// Informational reply used when the analysis produced nothing to report.
pub fn empty_result_message(only_inconsistent: bool) -> &'static str {
    if only_inconsistent {
        NO_INCONSISTENT_MESSAGE
    } else {
        NO_RESULTS_MESSAGE
    }
}

/// Render analysis results as one Discord-markdown report.
///
/// Every author block ends with a blank line, so an empty slice renders as
/// an empty string.
pub fn render_report(results: &[AnalysisResult]) -> String {
    let mut report = String::new();

    for result in results {
        let _ = writeln!(
            report,
            "{} **{}** (`{}`): **{} messages**",
            result.status_marker(),
            result.author.name,
            result.author.id,
            result.message_count
        );

        for (index, body) in &result.entries {
            let _ = writeln!(report, "    `{index})` {body}");
        }

        report.push('\n');
    }

    report
}
