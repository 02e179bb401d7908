use thiserror::Error;

/// Boxed error raised by a history or delivery collaborator.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("verification channel '{0}' not found")]
    ChannelNotFound(String),

    #[error("message history unavailable")]
    SourceUnavailable(#[source] SourceError),

    #[error("invalid `{option}` value '{value}', expected {expected}")]
    InvalidArgument {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("scan did not finish within {secs}s")]
    ScanTimedOut { secs: u64 },
}
