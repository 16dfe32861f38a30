//! Follow-up requests that operate on an existing travel plan

use serde::{Deserialize, Serialize};

/// Body of `/answer-question`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
    pub destination: String,
    /// Plan text produced by an earlier `/generate-plan` call
    pub travel_plan: String,
}

/// Body of `/modify-plan`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifyRequest {
    pub travel_plan: String,
    /// Free-form description of the wanted changes
    pub modifications: String,
}
