use std::sync::Arc;

use twilight_http::Client;

/// Environment-driven runtime settings.
pub mod config;
/// Typed failures of a verification audit.
pub mod error;
/// Platform-independent message history types.
pub mod model;
/// Collaborator traits the audit pipeline is driven through.
pub mod source;

pub use config::Settings;
pub use error::AuditError;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub settings: Arc<Settings>,
}

impl Context {
    /// Create a new application context.
    pub fn new(http: Arc<Client>, settings: Settings) -> Self {
        Self {
            http,
            settings: Arc::new(settings),
        }
    }
}
