//! Travel agent - an HTTP travel planning assistant
//!
//! This library turns travel preferences, follow-up questions and change
//! requests into prompts for an AI completion service and serves the
//! resulting plans over a small JSON API.

pub mod agent;
pub mod api;
pub mod completion;
pub mod config;
pub mod error;
pub mod models;
pub mod prompts;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use agent::{Operation, TravelAgent};
pub use completion::{ChatCompletionsClient, CompletionError, CompletionService};
pub use config::TravelAgentConfig;
pub use error::TravelAgentError;
pub use models::{ModifyRequest, QuestionRequest, TravelPreferences, TripDates};
pub use prompts::TravelPrompt;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelAgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
