//! Completion service integration
//!
//! The travel agent never talks to a model directly. Everything goes through
//! [`CompletionService`]: one system prompt and one user prompt in, one block
//! of text out. Each call is independent; no conversation state is kept.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

mod chat;
mod error;

pub use chat::ChatCompletionsClient;
pub use error::CompletionError;

use crate::config::CompletionConfig;

/// Stateless text completion capability
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send a single prompt and return the generated text
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, CompletionError>;

    /// Human readable name used in logs
    fn name(&self) -> &str;
}

/// Create the completion client described by the configuration
///
/// A missing API key does not stop the server from starting: every completion
/// then fails with [`CompletionError::MissingApiKey`] while `GET /` keeps answering.
pub fn create_client(config: &CompletionConfig) -> Result<Arc<dyn CompletionService>, CompletionError> {
    debug!(base_url = %config.base_url, model = %config.model, "create_client: called");
    match ChatCompletionsClient::from_config(config) {
        Ok(client) => Ok(Arc::new(client)),
        Err(CompletionError::MissingApiKey(api_key_env)) => {
            warn!(
                "No API key in {}, completion requests will fail until the service is restarted with it set",
                api_key_env
            );
            Ok(Arc::new(MissingKeyService { api_key_env }))
        }
        Err(e) => Err(e),
    }
}

/// Placeholder service used when no API key could be resolved
struct MissingKeyService {
    api_key_env: String,
}

#[async_trait]
impl CompletionService for MissingKeyService {
    async fn complete(&self, _system_prompt: &str, _prompt: &str) -> Result<String, CompletionError> {
        Err(CompletionError::MissingApiKey(self.api_key_env.clone()))
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}
