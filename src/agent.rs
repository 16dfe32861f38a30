//! Travel agent operations
//!
//! Each operation builds one prompt, makes exactly one completion call and
//! passes the text through untouched. Completion failures are logged here and
//! surfaced as the operation's own error so the HTTP layer can report them.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram};
use tracing::{error, info, instrument, warn};

use crate::completion::{CompletionError, CompletionService};
use crate::models::{ModifyRequest, QuestionRequest, TravelPreferences};
use crate::prompts::{SYSTEM_PROMPT, TravelPrompt};
use crate::{Result, TravelAgentError};

/// The three things the agent can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GeneratePlan,
    AnswerQuestion,
    ModifyPlan,
}

impl Operation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::GeneratePlan => "generate_plan",
            Operation::AnswerQuestion => "answer_question",
            Operation::ModifyPlan => "modify_plan",
        }
    }

    /// Wrap a completion failure in this operation's error
    #[must_use]
    pub fn failure(self, source: CompletionError) -> TravelAgentError {
        match self {
            Operation::GeneratePlan => TravelAgentError::Generation { source },
            Operation::AnswerQuestion => TravelAgentError::Question { source },
            Operation::ModifyPlan => TravelAgentError::Modification { source },
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

struct AgentMetrics {
    completions: Counter<u64>,
    duration: Histogram<f64>,
}

impl AgentMetrics {
    fn new() -> Self {
        let meter = opentelemetry::global::meter("travel-agent");
        Self {
            completions: meter
                .u64_counter("travel_agent.completions")
                .with_description("Completion calls by operation and outcome")
                .build(),
            duration: meter
                .f64_histogram("travel_agent.completion.duration")
                .with_description("Completion call latency")
                .with_unit("s")
                .build(),
        }
    }

    fn record(&self, operation: Operation, outcome: &'static str, elapsed_secs: f64) {
        let attributes = [
            KeyValue::new("operation", operation.as_str()),
            KeyValue::new("outcome", outcome),
        ];
        self.completions.add(1, &attributes);
        self.duration.record(elapsed_secs, &attributes);
    }
}

/// Turns travel requests into completion calls
pub struct TravelAgent {
    completion: Arc<dyn CompletionService>,
    metrics: AgentMetrics,
}

impl TravelAgent {
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self {
            completion,
            metrics: AgentMetrics::new(),
        }
    }

    /// Generate a complete itinerary for the given preferences
    #[instrument(skip_all, fields(destination = %preferences.destination))]
    pub async fn generate_travel_plan(&self, preferences: &TravelPreferences) -> Result<String> {
        self.run(preferences).await
    }

    /// Answer a question in the context of an existing plan
    #[instrument(skip_all, fields(destination = %request.destination))]
    pub async fn answer_question(&self, request: &QuestionRequest) -> Result<String> {
        self.run(request).await
    }

    /// Apply free-form modifications to an existing plan
    #[instrument(skip_all, fields(plan_len = request.travel_plan.len()))]
    pub async fn modify_plan(&self, request: &ModifyRequest) -> Result<String> {
        self.run(request).await
    }

    async fn run<P: TravelPrompt + Sync>(&self, request: &P) -> Result<String> {
        let operation = P::OPERATION;
        let prompt = request.build_prompt()?;

        let start_time = Instant::now();
        let outcome = self.completion.complete(&SYSTEM_PROMPT, &prompt).await;
        let elapsed = start_time.elapsed().as_secs_f64();

        match outcome {
            Ok(text) => {
                self.metrics.record(operation, "ok", elapsed);
                info!(
                    %operation,
                    service = self.completion.name(),
                    response_len = text.len(),
                    "Completion succeeded in {:.3}s",
                    elapsed
                );
                Ok(text)
            }
            Err(source) => {
                self.metrics.record(operation, "error", elapsed);
                if source.is_rate_limit() {
                    warn!(
                        %operation,
                        retry_after = ?source.retry_after(),
                        "Completion service is rate limiting requests"
                    );
                }
                error!(%operation, service = self.completion.name(), "Completion failed: {}", source);
                Err(operation.failure(source))
            }
        }
    }
}
