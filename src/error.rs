//! Error types and handling for the travel agent service

use thiserror::Error;

use crate::completion::CompletionError;

/// Main error type for the travel agent service
#[derive(Error, Debug)]
pub enum TravelAgentError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Request input that cannot be turned into a prompt
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The completion service failed while generating a plan
    #[error("Error generating travel plan: {source}")]
    Generation {
        #[source]
        source: CompletionError,
    },

    /// The completion service failed while answering a question
    #[error("Error answering question: {source}")]
    Question {
        #[source]
        source: CompletionError,
    },

    /// The completion service failed while modifying a plan
    #[error("Error modifying plan: {source}")]
    Modification {
        #[source]
        source: CompletionError,
    },
}

impl TravelAgentError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True when the caller sent something we refuse to forward
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, TravelAgentError::Validation { .. })
    }

    /// True when the completion service is the party that failed
    #[must_use]
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            TravelAgentError::Generation { .. }
                | TravelAgentError::Question { .. }
                | TravelAgentError::Modification { .. }
        )
    }
}
